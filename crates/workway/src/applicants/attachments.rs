use std::fs;
use std::path::{Path, PathBuf};

use mime::Mime;
use serde::{Deserialize, Serialize};

/// Upload extensions accepted at the boundary, matching the form's CV and
/// photo pickers.
pub const ALLOWED_EXTENSIONS: [&str; 7] = ["txt", "pdf", "png", "jpg", "jpeg", "doc", "docx"];

/// Opaque pointer to stored binary content: the sanitized name within the
/// store's flat namespace. Held by an [`super::domain::Applicant`], never the
/// bytes themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentRef(pub String);

/// Raw upload as received at the boundary: bytes plus the original filename
/// and declared content type. An applicant with no upload never produces one
/// of these; absence, not an empty attachment, is "no file".
#[derive(Debug, Clone)]
pub struct AttachmentUpload {
    pub original_filename: String,
    pub declared_type: Mime,
    pub bytes: Vec<u8>,
}

/// Storage seam so the service can be exercised against failing stores.
///
/// Write-only by contract: attachments are stored once and retrieved through
/// the reference itself (the HTTP layer streams the file back by name).
pub trait AttachmentStore: Send + Sync {
    fn save(&self, upload: &AttachmentUpload) -> Result<AttachmentRef, AttachmentWriteError>;
}

/// Error raised when attachment bytes could not be persisted. Aborts the
/// enclosing insert; no partial write stays visible.
#[derive(Debug, thiserror::Error)]
pub enum AttachmentWriteError {
    #[error("failed to persist attachment '{filename}': {source}")]
    Io {
        filename: String,
        source: std::io::Error,
    },
}

/// File-backed attachment store owning one flat directory.
///
/// Collision policy: an existing sanitized name is never overwritten; the new
/// file gets a numeric disambiguating suffix (`report.pdf`, `report-1.pdf`,
/// ...). Applied identically for CV and image uploads.
pub struct FileAttachmentStore {
    root: PathBuf,
}

impl FileAttachmentStore {
    /// Open the store rooted at `root`, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, std::io::Error> {
        let root = root.into();
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    /// Directory the references resolve against.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn available_name(&self, sanitized: &str) -> String {
        if !self.root.join(sanitized).exists() {
            return sanitized.to_string();
        }
        let (stem, extension) = match sanitized.rsplit_once('.') {
            Some((stem, extension)) if !stem.is_empty() => (stem, Some(extension)),
            _ => (sanitized, None),
        };
        let mut counter = 1u32;
        loop {
            let candidate = match extension {
                Some(extension) => format!("{stem}-{counter}.{extension}"),
                None => format!("{stem}-{counter}"),
            };
            if !self.root.join(&candidate).exists() {
                return candidate;
            }
            counter += 1;
        }
    }
}

impl AttachmentStore for FileAttachmentStore {
    fn save(&self, upload: &AttachmentUpload) -> Result<AttachmentRef, AttachmentWriteError> {
        let sanitized = sanitize_filename(&upload.original_filename);
        let name = self.available_name(&sanitized);
        let target = self.root.join(&name);
        // Write to a temp path in the same directory and rename into place so
        // a failed write never leaves a readable partial file under `name`.
        let temp = self.root.join(format!("{name}.part"));
        let io_error = |source| AttachmentWriteError::Io {
            filename: name.clone(),
            source,
        };
        fs::write(&temp, &upload.bytes).map_err(io_error)?;
        if let Err(source) = fs::rename(&temp, &target) {
            let _ = fs::remove_file(&temp);
            return Err(io_error(source));
        }
        Ok(AttachmentRef(name))
    }
}

/// Strip directory components and any character outside the safe set, so a
/// hostile filename cannot traverse out of the store or collide with
/// store-internal files. An empty result falls back to `upload`.
pub fn sanitize_filename(original: &str) -> String {
    let base = original.rsplit(['/', '\\']).next().unwrap_or(original);
    let cleaned: String = base
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();
    let cleaned = cleaned.trim_matches('.');
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Extension screen applied at the boundary before the store is invoked.
pub fn has_allowed_extension(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(_, extension)| {
            ALLOWED_EXTENSIONS.contains(&extension.to_ascii_lowercase().as_str())
        })
        .unwrap_or(false)
}
