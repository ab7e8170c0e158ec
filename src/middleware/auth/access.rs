//! Bearer authentication → `Authenticated<P>` を extensions に入れる
//!
//! - body から token を読む必要があるのは JSON / form の時だけ (それ以外の body は触らない)
//! - body の上限は handler と同じ DefaultBodyLimit (超えたら 413、credential の 400 とは別)
//! - strategy の結果を HTTP に写す:
//!   - success   → extensions に insert して次へ
//!   - 400       → bare な bad request (challenge なし)
//!   - challenge → 401 + WWW-Authenticate
//!   - error     → 500 (challenge にはしない)

use std::sync::Arc;

use axum::{
    Router,
    body::{Body, Bytes},
    extract::{FromRequest, State},
    http::Request,
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use crate::error::AppError;
use crate::services::auth::bearer::{
    AuthFailure, AuthOutcome, AuthRequest, BearerStrategy, BodyKind,
};

/// Apply bearer authentication to every route of `router`.
///
/// 例：
/// ```ignore
/// let arts = middleware::auth::access::apply(arts, state.auth.clone());
/// ```
pub fn apply<S, P>(router: Router<S>, strategy: Arc<BearerStrategy<P>>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
    P: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(strategy, access_middleware::<P>))
}

async fn access_middleware<P>(
    State(strategy): State<Arc<BearerStrategy<P>>>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError>
where
    P: Clone + Send + Sync + 'static,
{
    let (parts, body) = req.into_parts();
    let view = AuthRequest::new(parts.method.clone(), parts.uri.clone(), parts.headers.clone());

    // body は一度読むと消えるので、読んだ bytes から作り直して後段に渡す
    let (view, body) = match BodyKind::from_headers(&parts.headers) {
        Some(kind) => {
            // Bytes extractor honours DefaultBodyLimit from the request extensions
            let buffered = Request::from_parts(parts.clone(), body);
            let bytes = match Bytes::from_request(buffered, &()).await {
                Ok(bytes) => bytes,
                Err(rejection) => return Ok(rejection.into_response()),
            };
            (view.with_body(kind.parse(&bytes)), Body::from(bytes))
        }
        None => (view, body),
    };

    let mut req = Request::from_parts(parts, body);

    match strategy.authenticate(&view).await {
        AuthOutcome::Success(authenticated) => {
            req.extensions_mut().insert(authenticated);
            Ok(next.run(req).await)
        }
        AuthOutcome::Fail(AuthFailure::BadRequest(reason)) => {
            Err(AppError::bad_request("INVALID_REQUEST", reason.to_string()))
        }
        AuthOutcome::Fail(AuthFailure::Challenge(challenge)) => {
            Err(AppError::unauthorized(challenge))
        }
        AuthOutcome::Error(err) => {
            tracing::error!(error = %err, "bearer authentication errored");
            Err(AppError::Internal)
        }
    }
}
