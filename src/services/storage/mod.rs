pub mod client;
pub mod memory;
pub mod s3;

use std::sync::Arc;

pub use client::{AssetStore, StorageError, StoredAsset};
pub use memory::MemoryAssetStore;
pub use s3::S3AssetStore;

use crate::config::{AssetBackend, Config};

/// Build the asset store selected by `ASSET_BACKEND`.
pub async fn build_asset_store(config: &Config) -> Arc<dyn AssetStore> {
    let store: Arc<dyn AssetStore> = match config.asset_backend {
        AssetBackend::S3 => Arc::new(
            S3AssetStore::connect(
                &config.s3_bucket,
                &config.s3_region,
                config.s3_endpoint.as_deref(),
            )
            .await,
        ),
        AssetBackend::Memory => Arc::new(MemoryAssetStore::new()),
    };

    tracing::info!(backend = store.backend_name(), "asset store ready");
    store
}
