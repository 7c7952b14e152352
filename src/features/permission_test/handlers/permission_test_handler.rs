//! Probe handlers.
//!
//! Error handling is intentionally asymmetric: `list_objects` propagates
//! backend failures as a 502 JSON error, while the four single-object probes
//! swallow them and answer 200 with the error text as the body. Callers of
//! those four cannot tell success from failure by status code alone.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use tracing::warn;

use crate::core::error::Result;
use crate::features::permission_test::services::PermissionTestService;
use crate::modules::storage::StorageError;

/// Render a backend status like `OK` or `NoContent`
pub fn status_name(code: u16) -> String {
    StatusCode::from_u16(code)
        .ok()
        .and_then(|status| status.canonical_reason())
        .map(|reason| reason.replace([' ', '-'], ""))
        .unwrap_or_else(|| code.to_string())
}

/// Full error text including every cause in the chain
fn describe(operation: &str, err: StorageError) -> String {
    let text = format!("{:#}", anyhow::Error::new(err));
    warn!("{} probe failed: {}", operation, text);
    text
}

/// List objects under the probe prefix
///
/// Follows continuation tokens until the listing is complete. Backend
/// errors are returned as a 502 response.
#[utoipa::path(
    get,
    path = "/weatherforecast/get",
    tag = "permission-test",
    responses(
        (status = 200, description = "One \"key = K size = S\" line per object", body = Vec<String>),
        (status = 502, description = "Backend rejected the listing")
    )
)]
pub async fn list_objects(
    State(service): State<Arc<PermissionTestService>>,
) -> Result<Json<Vec<String>>> {
    let output = service.list().await?;
    Ok(Json(output))
}

/// Upload the sample text to the fixed key
#[utoipa::path(
    get,
    path = "/weatherforecast/upload",
    tag = "permission-test",
    responses(
        (status = 200, description = "Backend status name, or the error text on failure", body = String, content_type = "text/plain")
    )
)]
pub async fn upload_object(State(service): State<Arc<PermissionTestService>>) -> String {
    match service.upload().await {
        Ok(status) => status_name(status),
        Err(e) => describe("Upload", e),
    }
}

/// Copy the fixed key to `PERMISSION-TEST/file-copied.txt`
#[utoipa::path(
    get,
    path = "/weatherforecast/copy",
    tag = "permission-test",
    responses(
        (status = 200, description = "Backend status name, or the error text on failure", body = String, content_type = "text/plain")
    )
)]
pub async fn copy_object(State(service): State<Arc<PermissionTestService>>) -> String {
    match service.copy().await {
        Ok(status) => status_name(status),
        Err(e) => describe("Copy", e),
    }
}

/// Download the fixed key as text
#[utoipa::path(
    get,
    path = "/weatherforecast/download",
    tag = "permission-test",
    responses(
        (status = 200, description = "Object body, or the error text on failure", body = String, content_type = "text/plain")
    )
)]
pub async fn download_object(State(service): State<Arc<PermissionTestService>>) -> String {
    match service.download().await {
        Ok(body) => body,
        Err(e) => describe("Download", e),
    }
}

/// Delete the fixed key
#[utoipa::path(
    get,
    path = "/weatherforecast/delete",
    tag = "permission-test",
    responses(
        (status = 200, description = "Backend status name, or the error text on failure", body = String, content_type = "text/plain")
    )
)]
pub async fn delete_object(State(service): State<Arc<PermissionTestService>>) -> String {
    match service.delete().await {
        Ok(status) => status_name(status),
        Err(e) => describe("Delete", e),
    }
}
