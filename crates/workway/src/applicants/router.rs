use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::attachments::{has_allowed_extension, AttachmentStore, AttachmentUpload};
use super::domain::{ApplicantId, ApplicantSubmission};
use super::repository::{ApplicantCollection, CollectionError};
use super::service::{ApplicantService, ApplicantServiceError};

/// Router builder exposing the applicant boundary operations.
pub fn applicant_router<C, S>(service: Arc<ApplicantService<C, S>>) -> Router
where
    C: ApplicantCollection + 'static,
    S: AttachmentStore + 'static,
{
    Router::new()
        .route("/applicant", post(insert_handler::<C, S>))
        .route("/applicant/:applicant_id", get(get_handler::<C, S>))
        .route("/applicant/by-name/:name", get(get_by_name_handler::<C, S>))
        .route("/applicants", get(list_handler::<C, S>))
        .route("/applicants/search", get(search_handler::<C, S>))
        .with_state(service)
}

/// Text fields and file parts collected off the multipart form before the
/// core is invoked.
#[derive(Default)]
struct InsertForm {
    name: Option<String>,
    email: Option<String>,
    birthday: Option<String>,
    origin: Option<String>,
    company: Option<String>,
    special_field: Option<String>,
    languages: Vec<String>,
    tools: Vec<String>,
    cv: Option<AttachmentUpload>,
    image: Option<AttachmentUpload>,
}

pub(crate) async fn insert_handler<C, S>(
    State(service): State<Arc<ApplicantService<C, S>>>,
    mut multipart: Multipart,
) -> Response
where
    C: ApplicantCollection + 'static,
    S: AttachmentStore + 'static,
{
    let mut form = InsertForm::default();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                return client_error(
                    StatusCode::BAD_REQUEST,
                    format!("malformed multipart body: {err}"),
                )
            }
        };
        let Some(field_name) = field.name().map(ToString::to_string) else {
            continue;
        };

        if field_name == "cv_file" || field_name == "img_file" {
            let original_filename = field.file_name().unwrap_or("upload").to_string();
            let declared_type = field
                .content_type()
                .and_then(|raw| raw.parse::<mime::Mime>().ok())
                .unwrap_or(mime::APPLICATION_OCTET_STREAM);
            let bytes = match field.bytes().await {
                Ok(bytes) => bytes.to_vec(),
                Err(err) => {
                    return client_error(
                        StatusCode::BAD_REQUEST,
                        format!("failed to read upload '{original_filename}': {err}"),
                    )
                }
            };
            // Browsers send an empty file part when nothing was selected;
            // that is "no file", not an empty attachment.
            if bytes.is_empty() {
                continue;
            }
            if !has_allowed_extension(&original_filename) {
                return client_error(
                    StatusCode::UNPROCESSABLE_ENTITY,
                    format!("unsupported attachment type for '{original_filename}'"),
                );
            }
            let upload = AttachmentUpload {
                original_filename,
                declared_type,
                bytes,
            };
            if field_name == "cv_file" {
                form.cv = Some(upload);
            } else {
                form.image = Some(upload);
            }
            continue;
        }

        let value = match field.text().await {
            Ok(value) => value,
            Err(err) => {
                return client_error(
                    StatusCode::BAD_REQUEST,
                    format!("failed to read field '{field_name}': {err}"),
                )
            }
        };
        match field_name.as_str() {
            "name" => form.name = Some(value),
            "email" => form.email = Some(value),
            "birthday" => form.birthday = Some(value),
            "origin" => form.origin = Some(value),
            // Empty company text means "no company" at this boundary.
            "company" => {
                form.company = if value.trim().is_empty() {
                    None
                } else {
                    Some(value)
                }
            }
            "special_field" => form.special_field = Some(value),
            "languages" => form.languages = split_tokens(&value),
            "tools" => form.tools = split_tokens(&value),
            _ => {}
        }
    }

    // Missing text fields become empty strings and fail validation in the
    // core rather than being guessed at here.
    let submission = ApplicantSubmission {
        name: form.name.unwrap_or_default(),
        email: form.email.unwrap_or_default(),
        birthday: form.birthday.unwrap_or_default(),
        origin: form.origin.unwrap_or_default(),
        company: form.company,
        special_field: form.special_field.unwrap_or_default(),
        languages: form.languages,
        tools: form.tools,
    };

    match service.insert(submission, form.cv, form.image) {
        Ok(id) => (StatusCode::CREATED, axum::Json(json!({ "id": id.0 }))).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_handler<C, S>(
    State(service): State<Arc<ApplicantService<C, S>>>,
    Path(applicant_id): Path<String>,
) -> Response
where
    C: ApplicantCollection + 'static,
    S: AttachmentStore + 'static,
{
    match service.get(&ApplicantId(applicant_id)) {
        Ok(applicant) => (StatusCode::OK, axum::Json(applicant)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn get_by_name_handler<C, S>(
    State(service): State<Arc<ApplicantService<C, S>>>,
    Path(name): Path<String>,
) -> Response
where
    C: ApplicantCollection + 'static,
    S: AttachmentStore + 'static,
{
    match service.get_by_name(&name) {
        Ok(applicant) => (StatusCode::OK, axum::Json(applicant)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn list_handler<C, S>(
    State(service): State<Arc<ApplicantService<C, S>>>,
) -> Response
where
    C: ApplicantCollection + 'static,
    S: AttachmentStore + 'static,
{
    match service.list() {
        Ok(applicants) => (StatusCode::OK, axum::Json(applicants)).into_response(),
        Err(err) => error_response(err),
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchParams {
    #[serde(default)]
    query_field: Option<String>,
    #[serde(default)]
    query_value: Option<String>,
}

pub(crate) async fn search_handler<C, S>(
    State(service): State<Arc<ApplicantService<C, S>>>,
    Query(params): Query<SearchParams>,
) -> Response
where
    C: ApplicantCollection + 'static,
    S: AttachmentStore + 'static,
{
    let (Some(field), Some(value)) = (params.query_field, params.query_value) else {
        return client_error(StatusCode::BAD_REQUEST, "missing query field or value".into());
    };
    match service.search(&field, &value) {
        Ok(applicants) => (StatusCode::OK, axum::Json(applicants)).into_response(),
        Err(err) => error_response(err),
    }
}

/// Comma splitting is this boundary's responsibility; the core only ever sees
/// token sequences. Tokens are trimmed and empty ones dropped.
fn split_tokens(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn error_response(err: ApplicantServiceError) -> Response {
    let status = match &err {
        ApplicantServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ApplicantServiceError::Query(_) => StatusCode::BAD_REQUEST,
        ApplicantServiceError::Collection(CollectionError::NotFound) => StatusCode::NOT_FOUND,
        ApplicantServiceError::Collection(CollectionError::Unavailable(_)) => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        ApplicantServiceError::Attachment(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, axum::Json(json!({ "error": err.to_string() }))).into_response()
}

fn client_error(status: StatusCode, message: String) -> Response {
    (status, axum::Json(json!({ "error": message }))).into_response()
}
