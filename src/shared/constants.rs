// =============================================================================
// PERMISSION TEST OBJECTS
// =============================================================================

/// Key every single-object probe operates on
pub const FILE_KEY: &str = "PERMISSION-TEST/file.txt";

/// Destination key of the copy probe
pub const COPIED_FILE_KEY: &str = "PERMISSION-TEST/file-copied.txt";

/// Prefix the listing probe walks
pub const LIST_PREFIX: &str = "PERMISSION-TEST";

/// Body written by the upload probe
pub const SAMPLE_CONTENT: &str = "sample text";

/// Content type the upload probe stores the sample under
pub const SAMPLE_CONTENT_TYPE: &str = "text/plain";

/// User metadata entry logged by the download probe
pub const TITLE_METADATA_KEY: &str = "x-amz-meta-title";
