//! S3 client backed by the rust-s3 crate
//!
//! A new [`S3Client`] is built for every request by [`S3ClientFactory`], so
//! the credentials in effect are always the ones in the current settings.

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream;
use s3::creds::Credentials;
use s3::serde_types::ListBucketResult;
use s3::{Bucket, Region};
use tracing::debug;

use super::error::StorageError;
use super::object_store::{
    ListingEntry, ListingPage, ObjectDownload, ObjectStore, ObjectStoreFactory, StorageObjectRef,
};
use crate::core::config::{CredentialMode, S3Settings};

const USER_METADATA_PREFIX: &str = "x-amz-meta-";

/// Object store handle for one bucket
pub struct S3Client {
    bucket: Box<Bucket>,
}

impl S3Client {
    /// Build a client from settings, resolving credentials as configured
    pub async fn connect(settings: &S3Settings) -> Result<Self, StorageError> {
        let credentials = match settings.credential_mode() {
            CredentialMode::Explicit {
                access_key_id,
                secret_access_key,
            } => Credentials::new(Some(access_key_id), Some(secret_access_key), None, None, None)
                .map_err(|e| StorageError::Credentials(e.into()))?,
            CredentialMode::Ambient => {
                // Profile files and instance metadata are read with blocking I/O
                tokio::task::spawn_blocking(Credentials::default)
                    .await
                    .map_err(|e| StorageError::Credentials(e.into()))?
                    .map_err(|e| StorageError::Credentials(e.into()))?
            }
        };

        let region = Region::Custom {
            region: settings.region.clone(),
            endpoint: settings.endpoint_url(),
        };

        let bucket = Bucket::new(&settings.bucket_name, region, credentials).map_err(|e| {
            StorageError::Client {
                bucket: settings.bucket_name.clone(),
                source: e.into(),
            }
        })?;

        let bucket = if settings.path_style {
            bucket.with_path_style()
        } else {
            bucket
        };

        Ok(Self { bucket })
    }
}

/// Fail on anything outside 2xx; rust-s3 is built without `fail-on-err`
fn ensure_success(operation: &'static str, status: u16, body: &[u8]) -> Result<u16, StorageError> {
    if (200..300).contains(&status) {
        Ok(status)
    } else {
        Err(StorageError::UnexpectedStatus {
            operation,
            status,
            body: String::from_utf8_lossy(body).into_owned(),
        })
    }
}

/// Encode each path segment of a copy source key, keeping separators
fn encode_copy_source(key: &str) -> String {
    key.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Map one ListObjectsV2 result onto the backend-neutral page
fn listing_page(result: ListBucketResult) -> ListingPage {
    ListingPage {
        entries: result
            .contents
            .into_iter()
            .map(|object| ListingEntry {
                key: object.key,
                size: object.size,
            })
            .collect(),
        continuation_token: result.next_continuation_token,
        is_truncated: result.is_truncated,
    }
}

/// Split response headers into content type and `x-amz-meta-*` entries
fn split_headers(headers: HashMap<String, String>) -> (Option<String>, HashMap<String, String>) {
    let mut content_type = None;
    let mut metadata = HashMap::new();

    for (name, value) in headers {
        let name = name.to_ascii_lowercase();
        if name == "content-type" {
            content_type = Some(value);
        } else if name.starts_with(USER_METADATA_PREFIX) {
            metadata.insert(name, value);
        }
    }

    (content_type, metadata)
}

/// Wrap a buffered GetObject response as a single-chunk download
fn object_download(status: u16, headers: HashMap<String, String>, body: Bytes) -> ObjectDownload {
    let (content_type, metadata) = split_headers(headers);

    ObjectDownload {
        status,
        content_type,
        metadata,
        body: Box::pin(stream::once(async move { Ok(body) })),
    }
}

#[async_trait]
impl ObjectStore for S3Client {
    async fn list_page(
        &self,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> Result<ListingPage, StorageError> {
        let (result, status) = self
            .bucket
            .list_page(prefix.to_string(), None, continuation_token, None, None)
            .await
            .map_err(|e| StorageError::request("ListObjectsV2", e))?;
        ensure_success("ListObjectsV2", status, &[])?;

        Ok(listing_page(result))
    }

    async fn put_object(
        &self,
        key: &str,
        body: &[u8],
        content_type: &str,
    ) -> Result<u16, StorageError> {
        let response = self
            .bucket
            .put_object_with_content_type(key, body, content_type)
            .await
            .map_err(|e| StorageError::request("PutObject", e))?;

        debug!("PutObject '{}' -> {}", key, response.status_code());
        ensure_success("PutObject", response.status_code(), response.bytes())
    }

    async fn copy_object(
        &self,
        source: &StorageObjectRef,
        destination: &StorageObjectRef,
    ) -> Result<u16, StorageError> {
        let bucket = self.bucket.name();
        if source.bucket != bucket || destination.bucket != bucket {
            return Err(StorageError::CrossBucketCopy {
                from: source.to_string(),
                to: destination.to_string(),
                bucket,
            });
        }

        let status = self
            .bucket
            .copy_object_internal(encode_copy_source(&source.key), &destination.key)
            .await
            .map_err(|e| StorageError::request("CopyObject", e))?;

        debug!("CopyObject '{}' -> '{}': {}", source, destination, status);
        ensure_success("CopyObject", status, &[])
    }

    async fn get_object(&self, key: &str) -> Result<ObjectDownload, StorageError> {
        let response = self
            .bucket
            .get_object(key)
            .await
            .map_err(|e| StorageError::request("GetObject", e))?;

        let status = ensure_success("GetObject", response.status_code(), response.bytes())?;

        Ok(object_download(
            status,
            response.headers(),
            response.bytes().clone(),
        ))
    }

    async fn delete_object(&self, key: &str) -> Result<u16, StorageError> {
        let response = self
            .bucket
            .delete_object(key)
            .await
            .map_err(|e| StorageError::request("DeleteObject", e))?;

        debug!("DeleteObject '{}' -> {}", key, response.status_code());
        ensure_success("DeleteObject", response.status_code(), response.bytes())
    }
}

/// Factory producing [`S3Client`] handles
#[derive(Debug, Default, Clone, Copy)]
pub struct S3ClientFactory;

#[async_trait]
impl ObjectStoreFactory for S3ClientFactory {
    async fn create(&self, settings: &S3Settings) -> Result<Box<dyn ObjectStore>, StorageError> {
        Ok(Box::new(S3Client::connect(settings).await?))
    }
}
