//! In-memory object store used by handler and service tests.

use std::collections::HashMap;
use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::{self, StreamExt};

use crate::core::config::S3Settings;
use crate::modules::storage::object_store::{ListingEntry, ListingPage, ObjectDownload};
use crate::modules::storage::{ObjectStore, ObjectStoreFactory, StorageError, StorageObjectRef};

pub const TEST_BUCKET: &str = "probe-bucket";

pub fn test_settings() -> S3Settings {
    S3Settings {
        access_key_id: Some("AKIDEXAMPLE".to_string()),
        secret_access_key: Some("secret".to_string()),
        region: "us-east-1".to_string(),
        bucket_name: TEST_BUCKET.to_string(),
        endpoint: None,
        path_style: false,
    }
}

pub fn page(entries: &[(&str, u64)], token: Option<&str>, is_truncated: bool) -> ListingPage {
    ListingPage {
        entries: entries
            .iter()
            .map(|(key, size)| ListingEntry {
                key: key.to_string(),
                size: *size,
            })
            .collect(),
        continuation_token: token.map(str::to_string),
        is_truncated,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FakeOp {
    Connect,
    List,
    Put,
    Copy,
    Get,
    Delete,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    List {
        prefix: String,
        continuation_token: Option<String>,
    },
    Put {
        bucket: String,
        key: String,
        body: Vec<u8>,
        content_type: String,
    },
    Copy {
        source: StorageObjectRef,
        destination: StorageObjectRef,
    },
    Get {
        key: String,
    },
    Delete {
        bucket: String,
        key: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct FakeObject {
    pub chunks: Vec<Bytes>,
    pub content_type: Option<String>,
    pub metadata: HashMap<String, String>,
    /// Yield an error after this many chunks
    pub fail_after: Option<usize>,
}

impl FakeObject {
    pub fn text(body: &str) -> Self {
        Self {
            chunks: vec![Bytes::copy_from_slice(body.as_bytes())],
            content_type: Some("text/plain".to_string()),
            ..Default::default()
        }
    }
}

#[derive(Default)]
struct FakeState {
    pages: Vec<ListingPage>,
    objects: HashMap<String, FakeObject>,
    failures: HashMap<FakeOp, String>,
    calls: Vec<Call>,
}

/// Shared state behind every handle the fake factory hands out
#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<FakeState>,
    body_released: Arc<AtomicBool>,
}

impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Pages are served in order, one per list call
    pub fn with_pages(self: Arc<Self>, pages: Vec<ListingPage>) -> Arc<Self> {
        self.state.lock().unwrap().pages = pages;
        self
    }

    pub fn with_object(self: Arc<Self>, key: &str, object: FakeObject) -> Arc<Self> {
        self.state
            .lock()
            .unwrap()
            .objects
            .insert(key.to_string(), object);
        self
    }

    pub fn failing(self: Arc<Self>, op: FakeOp, message: &str) -> Arc<Self> {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(op, message.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn object(&self, key: &str) -> Option<FakeObject> {
        self.state.lock().unwrap().objects.get(key).cloned()
    }

    /// Whether the last served body stream has been dropped
    pub fn body_released(&self) -> bool {
        self.body_released.load(Ordering::SeqCst)
    }

    fn check(&self, op: FakeOp, operation: &'static str) -> Result<(), StorageError> {
        match self.state.lock().unwrap().failures.get(&op) {
            Some(message) => Err(StorageError::request(
                operation,
                io::Error::other(message.clone()),
            )),
            None => Ok(()),
        }
    }

    fn record(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

struct ReleaseGuard(Arc<AtomicBool>);

impl Drop for ReleaseGuard {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

pub struct FakeObjectStore {
    backend: Arc<FakeBackend>,
    bucket: String,
}

#[async_trait]
impl ObjectStore for FakeObjectStore {
    async fn list_page(
        &self,
        prefix: &str,
        continuation_token: Option<String>,
    ) -> Result<ListingPage, StorageError> {
        self.backend.record(Call::List {
            prefix: prefix.to_string(),
            continuation_token,
        });
        self.backend.check(FakeOp::List, "ListObjectsV2")?;

        let state = self.backend.state.lock().unwrap();
        let served = state
            .calls
            .iter()
            .filter(|c| matches!(c, Call::List { .. }))
            .count();
        Ok(state.pages.get(served - 1).cloned().unwrap_or_default())
    }

    async fn put_object(
        &self,
        key: &str,
        body: &[u8],
        content_type: &str,
    ) -> Result<u16, StorageError> {
        self.backend.record(Call::Put {
            bucket: self.bucket.clone(),
            key: key.to_string(),
            body: body.to_vec(),
            content_type: content_type.to_string(),
        });
        self.backend.check(FakeOp::Put, "PutObject")?;

        let object = FakeObject {
            chunks: vec![Bytes::copy_from_slice(body)],
            content_type: Some(content_type.to_string()),
            ..Default::default()
        };
        self.backend
            .state
            .lock()
            .unwrap()
            .objects
            .insert(key.to_string(), object);
        Ok(200)
    }

    async fn copy_object(
        &self,
        source: &StorageObjectRef,
        destination: &StorageObjectRef,
    ) -> Result<u16, StorageError> {
        self.backend.record(Call::Copy {
            source: source.clone(),
            destination: destination.clone(),
        });
        self.backend.check(FakeOp::Copy, "CopyObject")?;

        let mut state = self.backend.state.lock().unwrap();
        match state.objects.get(&source.key).cloned() {
            Some(object) => {
                state.objects.insert(destination.key.clone(), object);
                Ok(200)
            }
            None => Err(StorageError::UnexpectedStatus {
                operation: "CopyObject",
                status: 404,
                body: "NoSuchKey".to_string(),
            }),
        }
    }

    async fn get_object(&self, key: &str) -> Result<ObjectDownload, StorageError> {
        self.backend.record(Call::Get {
            key: key.to_string(),
        });
        self.backend.check(FakeOp::Get, "GetObject")?;

        let object = self
            .backend
            .object(key)
            .ok_or_else(|| StorageError::UnexpectedStatus {
                operation: "GetObject",
                status: 404,
                body: "NoSuchKey".to_string(),
            })?;

        self.backend.body_released.store(false, Ordering::SeqCst);
        let guard = ReleaseGuard(Arc::clone(&self.backend.body_released));

        let mut items: Vec<Result<Bytes, StorageError>> = Vec::new();
        for (index, chunk) in object.chunks.into_iter().enumerate() {
            if object.fail_after == Some(index) {
                break;
            }
            items.push(Ok(chunk));
        }
        if object.fail_after.is_some() {
            items.push(Err(StorageError::request(
                "GetObject",
                io::Error::new(io::ErrorKind::ConnectionReset, "connection reset"),
            )));
        }

        let body = stream::iter(items)
            .map(move |item| {
                let _held = &guard;
                item
            })
            .boxed();

        Ok(ObjectDownload {
            status: 200,
            content_type: object.content_type,
            metadata: object.metadata,
            body,
        })
    }

    async fn delete_object(&self, key: &str) -> Result<u16, StorageError> {
        self.backend.record(Call::Delete {
            bucket: self.bucket.clone(),
            key: key.to_string(),
        });
        self.backend.check(FakeOp::Delete, "DeleteObject")?;

        self.backend.state.lock().unwrap().objects.remove(key);
        Ok(204)
    }
}

/// Hands out [`FakeObjectStore`] handles bound to the settings' bucket
pub struct FakeStoreFactory {
    pub backend: Arc<FakeBackend>,
}

impl FakeStoreFactory {
    pub fn new(backend: Arc<FakeBackend>) -> Arc<Self> {
        Arc::new(Self { backend })
    }
}

#[async_trait]
impl ObjectStoreFactory for FakeStoreFactory {
    async fn create(&self, settings: &S3Settings) -> Result<Box<dyn ObjectStore>, StorageError> {
        if let Some(message) = self
            .backend
            .state
            .lock()
            .unwrap()
            .failures
            .get(&FakeOp::Connect)
        {
            return Err(StorageError::Credentials(
                io::Error::other(message.clone()).into(),
            ));
        }

        Ok(Box::new(FakeObjectStore {
            backend: Arc::clone(&self.backend),
            bucket: settings.bucket_name.clone(),
        }))
    }
}
