use utoipa::{Modify, OpenApi};

use crate::features::permission_test::handlers as permission_test_handlers;

#[derive(OpenApi)]
#[openapi(
    paths(
        permission_test_handlers::list_objects,
        permission_test_handlers::upload_object,
        permission_test_handlers::copy_object,
        permission_test_handlers::download_object,
        permission_test_handlers::delete_object,
    ),
    tags(
        (name = "permission-test", description = "Object-storage permission probes against a fixed key"),
    ),
    info(
        title = "S3 Permission Probe API",
        version = "0.1.0",
        description = "Checks which object-storage operations the configured credentials allow",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
