use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while talking to the object-storage backend
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to resolve S3 credentials")]
    Credentials(#[source] BoxError),

    #[error("Failed to create S3 client for bucket '{bucket}'")]
    Client {
        bucket: String,
        #[source]
        source: BoxError,
    },

    #[error("S3 {operation} request failed")]
    Request {
        operation: &'static str,
        #[source]
        source: BoxError,
    },

    #[error("S3 {operation} returned status {status}: {body}")]
    UnexpectedStatus {
        operation: &'static str,
        status: u16,
        body: String,
    },

    #[error("Listing is truncated but no continuation token was returned")]
    MissingContinuationToken,

    #[error("Cannot copy '{from}' to '{to}': both sides must be in bucket '{bucket}'")]
    CrossBucketCopy {
        from: String,
        to: String,
        bucket: String,
    },
}

impl StorageError {
    pub fn request(operation: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Request {
            operation,
            source: source.into(),
        }
    }
}
