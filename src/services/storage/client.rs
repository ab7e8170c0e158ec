//! Asset store interface used by the art handlers (upload / download / delete).
use async_trait::async_trait;
use axum::body::Bytes;
use thiserror::Error;

/// Result type for asset store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage-layer errors.
///
/// Note:
/// - Kept independent from `AppError`; handlers decide between 404 and 502.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Object as read back from the store.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredAsset {
    pub bytes: Bytes,
    pub content_type: Option<String>,
}

/// A minimal object store interface.
///
/// Keys are the internal art id (`art.id.to_string()`), one object per art.
/// Implementations are shared as `Arc<dyn AssetStore>`.
#[async_trait]
pub trait AssetStore: Send + Sync + 'static {
    // Returns the backend name (for logging).
    fn backend_name(&self) -> &'static str;

    // Store (or overwrite) an object, publicly readable.
    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> StorageResult<()>;

    async fn get(&self, key: &str) -> StorageResult<StoredAsset>;

    // Delete an object. Deleting a missing key is not an error (S3 semantics).
    async fn delete(&self, key: &str) -> StorageResult<()>;
}
