//! Application verifier: JWT access token → user row → `Principal`.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::json;
use sqlx::PgPool;
use uuid::Uuid;

use crate::repos::user_repo;
use crate::services::auth::access_jwt::AccessTokenDecoder;
use crate::services::auth::bearer::{AuthRequest, TokenVerifier, Verification, VerifyError};

/// The authenticated user, as handlers see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Principal {
    pub user_id: Uuid,
    pub user_name: String,
}

#[derive(Debug, Clone)]
pub struct UserTokenVerifier {
    decoder: AccessTokenDecoder,
    db: PgPool,
}

impl UserTokenVerifier {
    pub fn new(decoder: AccessTokenDecoder, db: PgPool) -> Self {
        Self { decoder, db }
    }
}

#[async_trait]
impl TokenVerifier<Principal> for UserTokenVerifier {
    async fn verify(&self, _request: Option<&AuthRequest>, token: &str) -> Verification<Principal> {
        let verified = match self.decoder.decode(token) {
            Ok(verified) => verified,
            Err(err) => {
                tracing::debug!(error = %err, "access token rejected");
                return Verification::rejected_because(err.client_description());
            }
        };

        match user_repo::get(&self.db, verified.user_id).await {
            Ok(Some(user)) => {
                let principal = Principal {
                    user_id: user.id,
                    user_name: user.user_name,
                };
                match verified.scope {
                    Some(scope) => Verification::accepted_with(principal, json!({ "scope": scope })),
                    None => Verification::accepted(principal),
                }
            }
            Ok(None) => Verification::rejected_because("unknown user"),
            Err(err) => Verification::Error(VerifyError::with_source("user lookup failed", err)),
        }
    }
}
