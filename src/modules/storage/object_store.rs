//! Backend-neutral view of the object-storage operations the service consumes.

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;

use super::error::StorageError;
use crate::core::config::S3Settings;

/// A single stored object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageObjectRef {
    pub bucket: String,
    pub key: String,
}

impl StorageObjectRef {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }
}

impl fmt::Display for StorageObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub key: String,
    pub size: u64,
}

/// One page of a paginated listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingPage {
    pub entries: Vec<ListingEntry>,
    pub continuation_token: Option<String>,
    pub is_truncated: bool,
}

/// Body stream of a fetched object
pub type ObjectBody = BoxStream<'static, Result<Bytes, StorageError>>;

/// Response of a get-object call.
///
/// Owns the body stream; dropping the value releases the underlying response.
pub struct ObjectDownload {
    pub status: u16,
    pub content_type: Option<String>,
    /// User metadata keyed by full header name, e.g. `x-amz-meta-title`
    pub metadata: HashMap<String, String>,
    pub body: ObjectBody,
}

impl fmt::Debug for ObjectDownload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectDownload")
            .field("status", &self.status)
            .field("content_type", &self.content_type)
            .field("metadata", &self.metadata)
            .finish_non_exhaustive()
    }
}

/// Client handle bound to a single bucket
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch one listing page under `prefix`, resuming from `continuation_token`
    async fn list_page(
        &self,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> Result<ListingPage, StorageError>;

    /// Write `body` to `key` as `content_type`, returning the HTTP status code
    async fn put_object(
        &self,
        key: &str,
        body: &[u8],
        content_type: &str,
    ) -> Result<u16, StorageError>;

    /// Server-side copy, returning the HTTP status code
    async fn copy_object(
        &self,
        source: &StorageObjectRef,
        destination: &StorageObjectRef,
    ) -> Result<u16, StorageError>;

    async fn get_object(&self, key: &str) -> Result<ObjectDownload, StorageError>;

    /// Delete `key`, returning the HTTP status code
    async fn delete_object(&self, key: &str) -> Result<u16, StorageError>;
}

/// Builds a fresh client handle from settings
#[async_trait]
pub trait ObjectStoreFactory: Send + Sync {
    async fn create(&self, settings: &S3Settings) -> Result<Box<dyn ObjectStore>, StorageError>;
}
