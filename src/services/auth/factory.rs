/// Factory: build the bearer strategy from application `Config`.
use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::error::AppError;
use crate::services::auth::{
    AccessTokenDecoder, BearerOptions, BearerStrategy, Principal, UserTokenVerifier,
};

pub fn build_bearer_strategy(
    config: &Config,
    db: PgPool,
) -> Result<Arc<BearerStrategy<Principal>>, AppError> {
    let decoder = AccessTokenDecoder::new(
        &config.access_jwt_public_key_pem,
        &config.auth_issuer,
        &config.auth_audience,
        config.access_token_leeway_seconds,
    )
    .map_err(|e| {
        tracing::error!(error = %e, "failed to build access token decoder");
        AppError::Internal
    })?;

    let options = BearerOptions::default()
        .realm(config.auth_realm.as_str())
        .scope(config.auth_scope.clone());

    Ok(Arc::new(BearerStrategy::with_options(
        options,
        UserTokenVerifier::new(decoder, db),
    )))
}
