//! Applicant registry core.
//!
//! Records job applicants, associates optional uploaded attachments (CV,
//! photo) with each record, and answers exact-match and membership searches
//! over the stored fields. The HTTP service in `services/api` is a thin shell
//! around the [`applicants`] module.

pub mod applicants;
pub mod config;
pub mod error;
pub mod telemetry;
