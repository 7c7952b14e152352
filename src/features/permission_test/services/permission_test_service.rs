use std::sync::Arc;

use futures::StreamExt;
use tracing::{debug, info};

use crate::core::config::S3Settings;
use crate::modules::storage::{ObjectStore, ObjectStoreFactory, StorageError, StorageObjectRef};
use crate::shared::constants::{
    COPIED_FILE_KEY, FILE_KEY, LIST_PREFIX, SAMPLE_CONTENT, SAMPLE_CONTENT_TYPE,
    TITLE_METADATA_KEY,
};

/// Runs the permission probes against the configured bucket.
///
/// Every operation builds its own client handle from the settings snapshot;
/// handles are never cached or shared between requests.
pub struct PermissionTestService {
    settings: Arc<S3Settings>,
    factory: Arc<dyn ObjectStoreFactory>,
}

impl PermissionTestService {
    pub fn new(settings: Arc<S3Settings>, factory: Arc<dyn ObjectStoreFactory>) -> Self {
        Self { settings, factory }
    }

    async fn client(&self) -> Result<Box<dyn ObjectStore>, StorageError> {
        self.factory.create(&self.settings).await
    }

    fn fixed_object(&self, key: &str) -> StorageObjectRef {
        StorageObjectRef::new(self.settings.bucket_name.clone(), key)
    }

    /// List every object under the probe prefix, following continuation tokens
    ///
    /// # Returns
    /// One `"key = {key} size = {size}"` line per object, in backend order
    pub async fn list(&self) -> Result<Vec<String>, StorageError> {
        let client = self.client().await?;

        let mut output = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let page = client.list_page(LIST_PREFIX, continuation_token).await?;

            output.extend(
                page.entries
                    .iter()
                    .map(|entry| format!("key = {} size = {}", entry.key, entry.size)),
            );

            debug!(
                "Next continuation token: {}",
                page.continuation_token.as_deref().unwrap_or("")
            );

            if !page.is_truncated {
                break;
            }

            continuation_token = Some(
                page.continuation_token
                    .ok_or(StorageError::MissingContinuationToken)?,
            );
        }

        info!("Listed {} objects under '{}'", output.len(), LIST_PREFIX);
        Ok(output)
    }

    /// Overwrite the fixed key with the sample content
    pub async fn upload(&self) -> Result<u16, StorageError> {
        let client = self.client().await?;
        client
            .put_object(FILE_KEY, SAMPLE_CONTENT.as_bytes(), SAMPLE_CONTENT_TYPE)
            .await
    }

    /// Copy the fixed key to its sibling within the same bucket
    pub async fn copy(&self) -> Result<u16, StorageError> {
        let client = self.client().await?;
        client
            .copy_object(
                &self.fixed_object(FILE_KEY),
                &self.fixed_object(COPIED_FILE_KEY),
            )
            .await
    }

    /// Fetch the fixed key and return its body as text
    ///
    /// The title metadata and content type are logged, not returned. The
    /// download (and with it the response stream) is dropped on every exit
    /// path, including a failure partway through the body.
    pub async fn download(&self) -> Result<String, StorageError> {
        let client = self.client().await?;
        let mut download = client.get_object(FILE_KEY).await?;

        info!(
            "Object metadata, Title: {}",
            download
                .metadata
                .get(TITLE_METADATA_KEY)
                .map(String::as_str)
                .unwrap_or("")
        );
        info!(
            "Content type: {}",
            download.content_type.as_deref().unwrap_or("")
        );

        let mut body = Vec::new();
        while let Some(chunk) = download.body.next().await {
            body.extend_from_slice(&chunk?);
        }

        Ok(String::from_utf8_lossy(&body).into_owned())
    }

    /// Delete the fixed key
    pub async fn delete(&self) -> Result<u16, StorageError> {
        let client = self.client().await?;
        client.delete_object(FILE_KEY).await
    }
}
