//! Storage module for object-storage access
//!
//! Exposes the [`ObjectStore`] seam the handlers depend on, plus the
//! rust-s3 backed client and the factory that builds one per request.

mod error;
pub mod object_store;
mod s3_client;

pub use error::StorageError;
pub use object_store::{ObjectStore, ObjectStoreFactory, StorageObjectRef};
pub use s3_client::S3ClientFactory;
