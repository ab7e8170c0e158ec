/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - db: PgPool, id_codec: IdCodec, auth: BearerStrategy, assets: AssetStore
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use url::Url;

use crate::services::{
    auth::{BearerStrategy, Principal},
    id_codec::IdCodec,
    storage::AssetStore,
};

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub id_codec: IdCodec,
    pub auth: Arc<BearerStrategy<Principal>>,
    pub assets: Arc<dyn AssetStore>,
    /// Always ends with `/`; asset URLs are `asset_base_url.join(key)`.
    pub asset_base_url: Url,
}

impl AppState {
    pub fn new(
        db: sqlx::PgPool,
        id_codec: IdCodec,
        auth: Arc<BearerStrategy<Principal>>,
        assets: Arc<dyn AssetStore>,
        asset_base_url: Url,
    ) -> Self {
        Self {
            db,
            id_codec,
            auth,
            assets,
            asset_base_url,
        }
    }

    /// Public URL of the asset stored under `key`.
    pub fn asset_url(&self, key: &str) -> String {
        self.asset_base_url
            .join(key)
            .map(String::from)
            .unwrap_or_else(|_| format!("{}{}", self.asset_base_url, key))
    }
}
