use std::sync::Arc;

use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use workway::applicants::{
    applicant_router, ApplicantCollection, ApplicantService, AttachmentStore,
};

use crate::infra::AppState;

pub(crate) fn service_routes<C, S>(service: Arc<ApplicantService<C, S>>) -> axum::Router
where
    C: ApplicantCollection + 'static,
    S: AttachmentStore + 'static,
{
    applicant_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/uploads/:filename", axum::routing::get(attachment_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Retrieval-by-reference for stored attachments: streams the file named by
/// an applicant's `cv_reference`/`image_reference` back to the caller.
pub(crate) async fn attachment_endpoint(
    Extension(state): Extension<AppState>,
    Path(filename): Path<String>,
) -> impl IntoResponse {
    if !is_valid_reference(&filename) {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid attachment reference" })),
        )
            .into_response();
    }

    let path = state.upload_dir.join(&filename);
    match tokio::fs::read(&path).await {
        Ok(bytes) => {
            let content_type = mime_guess::from_path(&filename).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, content_type.to_string())],
                bytes,
            )
                .into_response()
        }
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "no such attachment" })),
        )
            .into_response(),
        Err(err) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": err.to_string() })),
        )
            .into_response(),
    }
}

/// Stored references are sanitized flat names; anything with separators or
/// parent markers cannot be one of ours.
fn is_valid_reference(filename: &str) -> bool {
    !filename.is_empty() && !filename.contains(['/', '\\']) && !filename.contains("..")
}
