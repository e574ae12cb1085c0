use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::applicants::attachments::{
    AttachmentRef, AttachmentStore, AttachmentUpload, AttachmentWriteError,
};
use crate::applicants::domain::{ApplicantId, ApplicantSubmission};
use crate::applicants::repository::{
    ApplicantCollection, ApplicantDocument, CollectionError, MemoryCollection,
};
use crate::applicants::service::ApplicantService;

pub(super) fn submission(name: &str) -> ApplicantSubmission {
    ApplicantSubmission {
        name: name.to_string(),
        email: format!("{}@example.com", name.to_ascii_lowercase().replace(' ', ".")),
        birthday: "12-08-2000".to_string(),
        origin: "Pakistan".to_string(),
        company: Some("BMW".to_string()),
        special_field: "IT".to_string(),
        languages: vec!["english".to_string(), "german".to_string()],
        tools: vec!["GitLab".to_string(), "Docker".to_string()],
    }
}

pub(super) fn pdf_upload(filename: &str, bytes: &[u8]) -> AttachmentUpload {
    AttachmentUpload {
        original_filename: filename.to_string(),
        declared_type: mime::APPLICATION_PDF,
        bytes: bytes.to_vec(),
    }
}

/// Attachment store double that echoes the original filename as the
/// reference without touching disk.
#[derive(Default)]
pub(super) struct NullAttachmentStore;

impl AttachmentStore for NullAttachmentStore {
    fn save(&self, upload: &AttachmentUpload) -> Result<AttachmentRef, AttachmentWriteError> {
        Ok(AttachmentRef(upload.original_filename.clone()))
    }
}

/// Attachment store double that fails every write, for atomicity tests.
pub(super) struct FailingAttachmentStore;

impl AttachmentStore for FailingAttachmentStore {
    fn save(&self, upload: &AttachmentUpload) -> Result<AttachmentRef, AttachmentWriteError> {
        Err(AttachmentWriteError::Io {
            filename: upload.original_filename.clone(),
            source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
        })
    }
}

/// Collection double whose every operation reports the store as unreachable.
pub(super) struct UnavailableCollection;

impl ApplicantCollection for UnavailableCollection {
    fn insert(&self, _document: ApplicantDocument) -> Result<ApplicantId, CollectionError> {
        Err(CollectionError::Unavailable("connection refused".to_string()))
    }

    fn fetch(&self, _id: &ApplicantId) -> Result<Option<crate::applicants::Applicant>, CollectionError> {
        Err(CollectionError::Unavailable("connection refused".to_string()))
    }

    fn fetch_by_name(
        &self,
        _name: &str,
    ) -> Result<Option<crate::applicants::Applicant>, CollectionError> {
        Err(CollectionError::Unavailable("connection refused".to_string()))
    }

    fn find(
        &self,
        _filter: &crate::applicants::Filter,
    ) -> Result<Vec<crate::applicants::Applicant>, CollectionError> {
        Err(CollectionError::Unavailable("connection refused".to_string()))
    }
}

pub(super) fn build_service() -> (
    Arc<ApplicantService<MemoryCollection, NullAttachmentStore>>,
    Arc<MemoryCollection>,
) {
    let collection = Arc::new(MemoryCollection::default());
    let service = Arc::new(ApplicantService::new(
        collection.clone(),
        Arc::new(NullAttachmentStore),
    ));
    (service, collection)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("body is json")
}
