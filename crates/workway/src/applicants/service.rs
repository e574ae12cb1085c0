use std::sync::Arc;

use tracing::{debug, info};

use super::attachments::{AttachmentStore, AttachmentUpload, AttachmentWriteError};
use super::domain::{Applicant, ApplicantId, ApplicantSubmission, ValidationError};
use super::query::{translate, Filter, QueryError};
use super::repository::{ApplicantCollection, ApplicantDocument, CollectionError};

/// Service composing the attachment store and the document collection.
///
/// Constructed once at process start with an injected collection handle; no
/// ambient global store.
pub struct ApplicantService<C, S> {
    collection: Arc<C>,
    attachments: Arc<S>,
}

impl<C, S> ApplicantService<C, S>
where
    C: ApplicantCollection + 'static,
    S: AttachmentStore + 'static,
{
    pub fn new(collection: Arc<C>, attachments: Arc<S>) -> Self {
        Self {
            collection,
            attachments,
        }
    }

    /// Persist a new applicant and return the assigned id.
    ///
    /// Attachments are stored first, CV then image; any attachment failure
    /// aborts before a document is created, so no record can reference a
    /// write that never happened.
    pub fn insert(
        &self,
        submission: ApplicantSubmission,
        cv: Option<AttachmentUpload>,
        image: Option<AttachmentUpload>,
    ) -> Result<ApplicantId, ApplicantServiceError> {
        submission.validate()?;

        let cv_reference = cv
            .as_ref()
            .map(|upload| self.attachments.save(upload))
            .transpose()?;
        let image_reference = image
            .as_ref()
            .map(|upload| self.attachments.save(upload))
            .transpose()?;

        let document = ApplicantDocument::new(submission, cv_reference, image_reference);
        let id = self.collection.insert(document)?;
        info!(applicant_id = %id.0, "applicant stored");
        Ok(id)
    }

    /// Fetch one applicant by exact id.
    pub fn get(&self, id: &ApplicantId) -> Result<Applicant, ApplicantServiceError> {
        let applicant = self
            .collection
            .fetch(id)?
            .ok_or(CollectionError::NotFound)?;
        Ok(applicant)
    }

    /// Fetch one applicant by exact full-name match.
    ///
    /// Name is not guaranteed unique; when several records share a name the
    /// collection picks one deterministically. Use [`Self::search`] for all
    /// matches.
    pub fn get_by_name(&self, name: &str) -> Result<Applicant, ApplicantServiceError> {
        let applicant = self
            .collection
            .fetch_by_name(name)?
            .ok_or(CollectionError::NotFound)?;
        Ok(applicant)
    }

    /// Run a single `(field, value)` search through the query translator.
    pub fn search(&self, field: &str, value: &str) -> Result<Vec<Applicant>, ApplicantServiceError> {
        let filter = translate(field, value)?;
        let matches = self.collection.find(&filter)?;
        debug!(field, value, matched = matches.len(), "applicant search");
        Ok(matches)
    }

    /// Every record, in the collection's stable snapshot order.
    pub fn list(&self) -> Result<Vec<Applicant>, ApplicantServiceError> {
        Ok(self.collection.find(&Filter::All)?)
    }
}

/// Error raised by the applicant service. Each variant is a distinguishable
/// signal the boundary maps to a status code; nothing is swallowed.
#[derive(Debug, thiserror::Error)]
pub enum ApplicantServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Attachment(#[from] AttachmentWriteError),
    #[error(transparent)]
    Collection(#[from] CollectionError),
    #[error(transparent)]
    Query(#[from] QueryError),
}
