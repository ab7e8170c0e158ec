//! In-process asset store (local development / tests).
use std::collections::HashMap;

use async_trait::async_trait;
use axum::body::Bytes;
use tokio::sync::RwLock;

use crate::services::storage::client::{AssetStore, StorageError, StorageResult, StoredAsset};

#[derive(Debug, Default)]
pub struct MemoryAssetStore {
    objects: RwLock<HashMap<String, StoredAsset>>,
}

impl MemoryAssetStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AssetStore for MemoryAssetStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> StorageResult<()> {
        let asset = StoredAsset {
            bytes,
            content_type: Some(content_type.to_owned()),
        };
        self.objects.write().await.insert(key.to_owned(), asset);
        Ok(())
    }

    async fn get(&self, key: &str) -> StorageResult<StoredAsset> {
        self.objects
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_owned()))
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.objects.write().await.remove(key);
        Ok(())
    }
}
