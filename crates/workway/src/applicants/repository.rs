use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use super::attachments::AttachmentRef;
use super::domain::{Applicant, ApplicantId, ApplicantSubmission};
use super::query::Filter;

/// Full record as handed to the collection: every declared attribute present,
/// optional ones as explicit absence, no partial documents. The collection
/// assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicantDocument {
    #[serde(flatten)]
    pub fields: ApplicantSubmission,
    pub cv_reference: Option<AttachmentRef>,
    pub image_reference: Option<AttachmentRef>,
}

impl ApplicantDocument {
    pub fn new(
        fields: ApplicantSubmission,
        cv_reference: Option<AttachmentRef>,
        image_reference: Option<AttachmentRef>,
    ) -> Self {
        Self {
            fields,
            cv_reference,
            image_reference,
        }
    }

    /// Rehydrate the stored document into the full entity shape.
    pub fn hydrate(self, id: ApplicantId) -> Applicant {
        let ApplicantSubmission {
            name,
            email,
            birthday,
            origin,
            company,
            special_field,
            languages,
            tools,
        } = self.fields;
        Applicant {
            id,
            name,
            email,
            birthday,
            origin,
            company,
            special_field,
            languages,
            tools,
            cv_reference: self.cv_reference,
            image_reference: self.image_reference,
        }
    }
}

/// Storage seam over the backing document collection so the service can be
/// exercised in isolation. Each insert is a single-document create, atomic at
/// this layer; no multi-record transactions.
pub trait ApplicantCollection: Send + Sync {
    fn insert(&self, document: ApplicantDocument) -> Result<ApplicantId, CollectionError>;
    fn fetch(&self, id: &ApplicantId) -> Result<Option<Applicant>, CollectionError>;
    fn fetch_by_name(&self, name: &str) -> Result<Option<Applicant>, CollectionError>;
    fn find(&self, filter: &Filter) -> Result<Vec<Applicant>, CollectionError>;
}

/// Error enumeration for collection failures. `NotFound` is distinct from a
/// transport failure so callers can render "no such applicant".
#[derive(Debug, thiserror::Error)]
pub enum CollectionError {
    #[error("applicant not found")]
    NotFound,
    #[error("document store unavailable: {0}")]
    Unavailable(String),
}

/// In-memory document collection with the contract the service expects from a
/// hosted document store: the store assigns ids, ids are never reused, and
/// iteration order is stable for a given data snapshot (ascending id).
#[derive(Default)]
pub struct MemoryCollection {
    sequence: AtomicU64,
    documents: Mutex<BTreeMap<ApplicantId, ApplicantDocument>>,
}

impl MemoryCollection {
    fn next_id(&self) -> ApplicantId {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        // Zero-padded so the BTreeMap's lexicographic order is issue order.
        ApplicantId(format!("apl-{sequence:06}"))
    }
}

impl ApplicantCollection for MemoryCollection {
    fn insert(&self, document: ApplicantDocument) -> Result<ApplicantId, CollectionError> {
        let id = self.next_id();
        let mut guard = self.documents.lock().expect("collection mutex poisoned");
        guard.insert(id.clone(), document);
        Ok(id)
    }

    fn fetch(&self, id: &ApplicantId) -> Result<Option<Applicant>, CollectionError> {
        let guard = self.documents.lock().expect("collection mutex poisoned");
        Ok(guard
            .get(id)
            .cloned()
            .map(|document| document.hydrate(id.clone())))
    }

    fn fetch_by_name(&self, name: &str) -> Result<Option<Applicant>, CollectionError> {
        let guard = self.documents.lock().expect("collection mutex poisoned");
        // Name carries no uniqueness invariant; the lowest id wins so the
        // pick is deterministic. Callers needing all matches use find.
        Ok(guard
            .iter()
            .find(|(_, document)| document.fields.name == name)
            .map(|(id, document)| document.clone().hydrate(id.clone())))
    }

    fn find(&self, filter: &Filter) -> Result<Vec<Applicant>, CollectionError> {
        let guard = self.documents.lock().expect("collection mutex poisoned");
        Ok(guard
            .iter()
            .map(|(id, document)| document.clone().hydrate(id.clone()))
            .filter(|applicant| filter.matches(applicant))
            .collect())
    }
}
