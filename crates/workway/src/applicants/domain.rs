use serde::{Deserialize, Serialize};

use super::attachments::AttachmentRef;

/// Identifier wrapper for persisted applicants. Assigned by the collection on
/// insert, unique across all records, never reused.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ApplicantId(pub String);

/// Caller-supplied payload for a new applicant, before the collection assigns
/// an id and before any attachment has been stored.
///
/// `languages` and `tools` arrive as proper token sequences; comma splitting
/// is the boundary's job. Ordering and duplicates are caller-determined and
/// preserved as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantSubmission {
    pub name: String,
    pub email: String,
    /// Day-month-year text (e.g. "12-08-2000"). Stored as given; not
    /// validated as a calendar date.
    pub birthday: String,
    pub origin: String,
    /// Absent is distinct from empty: `None` means "no company", and an
    /// empty company string is rejected by [`ApplicantSubmission::validate`].
    #[serde(default)]
    pub company: Option<String>,
    pub special_field: String,
    pub languages: Vec<String>,
    pub tools: Vec<String>,
}

impl ApplicantSubmission {
    /// Check the non-empty-text invariants on the required fields. Values are
    /// trimmed for the check only; stored text stays exactly as supplied.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let required = [
            ("name", &self.name),
            ("email", &self.email),
            ("birthday", &self.birthday),
            ("origin", &self.origin),
            ("special_field", &self.special_field),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ValidationError::EmptyField(field));
            }
        }
        if let Some(company) = &self.company {
            if company.trim().is_empty() {
                return Err(ValidationError::EmptyField("company"));
            }
        }
        Ok(())
    }
}

/// The canonical record for one candidate. Retrieval always yields the full
/// shape: every key is present, optional ones as explicit `None`.
///
/// Records are immutable after insert; there is no update or delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Applicant {
    pub id: ApplicantId,
    pub name: String,
    pub email: String,
    pub birthday: String,
    pub origin: String,
    pub company: Option<String>,
    pub special_field: String,
    pub languages: Vec<String>,
    pub tools: Vec<String>,
    pub cv_reference: Option<AttachmentRef>,
    pub image_reference: Option<AttachmentRef>,
}

/// Error raised when a submission breaks the entity invariants.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("field '{0}' must be non-empty text")]
    EmptyField(&'static str),
}
