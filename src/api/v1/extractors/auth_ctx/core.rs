use axum::extract::FromRequestParts;
use axum::http::{StatusCode, request::Parts};

use crate::services::auth::Principal;
use crate::services::auth::bearer::Authenticated;

use super::AuthCtx;

/// Handler で、 AuthCtx を受け取るための extractor
/// middleware が Authenticated<Principal> を request.extensions() に insert 済みである前提
/// 見つからない場合は 401 を返す（認証がかかってない・ミドルウェア未設定）
pub struct AuthCtxExtractor(pub AuthCtx);

impl<S> FromRequestParts<S> for AuthCtxExtractor
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Authenticated<Principal>>()
            .cloned()
            .map(|authenticated| AuthCtxExtractor(AuthCtx::from(authenticated)))
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}
