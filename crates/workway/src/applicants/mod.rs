//! Applicant persistence and query layer.
//!
//! The entity model lives in [`domain`], the backing document collection in
//! [`repository`], attachment storage in [`attachments`], and the mapping
//! from `(field, value)` search requests onto storage filters in [`query`].
//! [`service`] composes the pieces; [`router`] exposes them over HTTP.

pub mod attachments;
pub mod domain;
pub mod query;
pub mod repository;
pub mod router;
pub mod service;

#[cfg(test)]
mod tests;

pub use attachments::{
    AttachmentRef, AttachmentStore, AttachmentUpload, AttachmentWriteError, FileAttachmentStore,
};
pub use domain::{Applicant, ApplicantId, ApplicantSubmission, ValidationError};
pub use query::{translate, Filter, QueryError, QueryField};
pub use repository::{ApplicantCollection, ApplicantDocument, CollectionError, MemoryCollection};
pub use router::applicant_router;
pub use service::{ApplicantService, ApplicantServiceError};
