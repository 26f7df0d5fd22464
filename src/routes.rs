use std::sync::Arc;

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

use crate::{
    error::AppError,
    resolver::{invalidate_cascade, normalize_path},
    state,
};

#[derive(Deserialize)]
pub struct RevalidateParams {
    secret: Option<String>,
    path: Option<String>,
}

#[derive(Deserialize)]
pub struct UploadParams {
    secret: Option<String>,
    filename: Option<String>,
}

fn authorize(state: &state::State, secret: Option<&str>) -> Result<(), AppError> {
    let secret = secret.unwrap_or_default();

    if secret.is_empty() || secret != state.config.revalidate_secret {
        return Err(AppError::InvalidToken);
    }

    Ok(())
}

// Secret check first, path validation second: nothing touches the store or
// the cache until both pass.
async fn run_revalidation(
    state: &state::State,
    params: RevalidateParams,
) -> Result<String, AppError> {
    authorize(state, params.secret.as_deref())?;

    let path = params
        .path
        .as_deref()
        .and_then(normalize_path)
        .ok_or(AppError::MissingPath)?;

    let marked = invalidate_cascade(state.content.as_ref(), state.cache.as_ref(), &path).await?;
    info!("Marked {} paths stale starting at {path}", marked.len());

    Ok(path)
}

/// Body-based trigger: `POST /revalidate` with `{ secret, path }`.
pub async fn revalidate_handler(
    State(state): State<Arc<state::State>>,
    Json(params): Json<RevalidateParams>,
) -> Response {
    match run_revalidation(&state, params).await {
        Ok(path) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "revalidated": true,
                "path": path,
                "date": Utc::now().to_rfc3339(),
            })),
        )
            .into_response(),
        Err(e) => (
            e.status(),
            Json(json!({ "success": false, "message": e.to_string() })),
        )
            .into_response(),
    }
}

/// Query-string trigger: `GET /revalidate?secret=...&path=...`.
pub async fn revalidate_query_handler(
    State(state): State<Arc<state::State>>,
    Query(params): Query<RevalidateParams>,
) -> Result<Json<Value>, AppError> {
    run_revalidation(&state, params).await?;

    Ok(Json(json!({ "revalidated": true })))
}

/// Upload proxy: `POST /upload?secret=...&filename=...` with the file bytes
/// as the request body. Returns the public URL of the stored object.
pub async fn upload_handler(
    State(state): State<Arc<state::State>>,
    Query(params): Query<UploadParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, AppError> {
    authorize(&state, params.secret.as_deref())?;

    let filename = params
        .filename
        .map(|f| f.trim().to_string())
        .filter(|f| !f.is_empty())
        .ok_or(AppError::MissingFilename)?;

    if body.is_empty() {
        return Err(AppError::EmptyBody);
    }

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream");

    let url = state
        .storage
        .put(&filename, content_type, body)
        .await
        .map_err(|e| AppError::InternalError(Box::new(e)))?;

    info!("Uploaded {filename} ({content_type})");

    Ok(Json(json!({ "url": url })))
}

pub async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}
