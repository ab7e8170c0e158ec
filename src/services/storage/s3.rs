//! S3 (or S3-compatible) asset store.
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::{
    Client,
    error::DisplayErrorContext,
    primitives::ByteStream,
    types::ObjectCannedAcl,
};
use axum::body::Bytes;

use crate::services::storage::client::{AssetStore, StorageError, StorageResult, StoredAsset};

#[derive(Clone, Debug)]
pub struct S3AssetStore {
    client: Client,
    bucket: String,
}

impl S3AssetStore {
    /// Build a client from the default AWS credential chain.
    ///
    /// `endpoint` switches to path-style addressing for S3-compatible stores (MinIO etc.).
    pub async fn connect(bucket: &str, region: &str, endpoint: Option<&str>) -> Self {
        let sdk_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_owned()))
            .load()
            .await;

        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }

        Self {
            client: Client::from_conf(builder.build()),
            bucket: bucket.to_owned(),
        }
    }
}

fn backend<E: std::error::Error>(err: E) -> StorageError {
    StorageError::Backend(DisplayErrorContext(err).to_string())
}

#[async_trait]
impl AssetStore for S3AssetStore {
    fn backend_name(&self) -> &'static str {
        "s3"
    }

    async fn put(&self, key: &str, bytes: Bytes, content_type: &str) -> StorageResult<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .acl(ObjectCannedAcl::PublicRead)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(backend)?;

        Ok(())
    }

    async fn get(&self, key: &str) -> StorageResult<StoredAsset> {
        let output = self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|err| match err.as_service_error() {
                Some(service) if service.is_no_such_key() => StorageError::NotFound(key.to_owned()),
                _ => backend(err),
            })?;

        let content_type = output.content_type().map(str::to_owned);
        let bytes = output.body.collect().await.map_err(backend)?.into_bytes();

        Ok(StoredAsset {
            bytes,
            content_type,
        })
    }

    async fn delete(&self, key: &str) -> StorageResult<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(backend)?;

        Ok(())
    }
}
