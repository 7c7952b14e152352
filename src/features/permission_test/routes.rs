use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::permission_test::handlers;
use crate::features::permission_test::services::PermissionTestService;

/// Create routes for the permission test feature
///
/// Note: every probe is a GET and requires no authentication.
pub fn routes(service: Arc<PermissionTestService>) -> Router {
    Router::new()
        .route("/weatherforecast/get", get(handlers::list_objects))
        .route("/weatherforecast/upload", get(handlers::upload_object))
        .route("/weatherforecast/copy", get(handlers::copy_object))
        .route("/weatherforecast/download", get(handlers::download_object))
        .route("/weatherforecast/delete", get(handlers::delete_object))
        .with_state(service)
}
