//! Bearer token strategy (RFC 6750).
//!
//! Decision sequence for one request:
//! 1. find the token in exactly one of: `Authorization` header, body `access_token`,
//!    query `access_token`
//! 2. hand it to the [`TokenVerifier`] once
//! 3. map the verifier's answer to [`AuthOutcome`]
//!
//! The strategy is immutable after construction and shared across requests via `Arc`.

use std::{fmt, sync::Arc};

use axum::http::{StatusCode, header};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use super::challenge::{Challenge, DEFAULT_REALM, INVALID_TOKEN};
use super::request::{ACCESS_TOKEN_FIELD, AuthRequest};
use super::verifier::{Rejection, TokenVerifier, Verification, VerifyError};
use super::token_fingerprint;

#[derive(Debug, Error)]
pub enum StrategyError {
    #[error("bearer strategy requires a verifier")]
    MissingVerifier,
}

/// Where a credential was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    Header,
    Body,
    Query,
}

impl fmt::Display for TokenSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header => write!(f, "authorization header"),
            Self::Body => write!(f, "request body"),
            Self::Query => write!(f, "query string"),
        }
    }
}

/// Credential placement the strategy refuses to interpret (HTTP 400).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MalformedCredentials {
    #[error("authorization header must be `<scheme> <credentials>`")]
    AuthorizationParts,
    #[error("authorization header is not valid UTF-8")]
    AuthorizationEncoding,
    #[error("access token supplied in both {first} and {second}")]
    Ambiguous {
        first: TokenSource,
        second: TokenSource,
    },
}

/// Scope accepted by [`BearerOptions::scope`]: one string or a list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scope(Vec<String>);

impl From<&str> for Scope {
    fn from(scope: &str) -> Self {
        if scope.is_empty() {
            Self(Vec::new())
        } else {
            Self(vec![scope.to_owned()])
        }
    }
}

impl From<String> for Scope {
    fn from(scope: String) -> Self {
        Self::from(scope.as_str())
    }
}

impl From<Vec<String>> for Scope {
    fn from(scope: Vec<String>) -> Self {
        Self(scope)
    }
}

impl From<&[&str]> for Scope {
    fn from(scope: &[&str]) -> Self {
        Self(scope.iter().map(|s| s.to_string()).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Scope {
    fn from(scope: [&str; N]) -> Self {
        Self::from(&scope[..])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerOptions {
    pub realm: String,
    pub scope: Vec<String>,
    /// Hand the request view to the verifier along with the token.
    pub pass_request: bool,
}

impl Default for BearerOptions {
    fn default() -> Self {
        Self {
            realm: DEFAULT_REALM.to_owned(),
            scope: Vec::new(),
            pass_request: false,
        }
    }
}

impl BearerOptions {
    pub fn realm(mut self, realm: impl Into<String>) -> Self {
        self.realm = realm.into();
        self
    }

    pub fn scope(mut self, scope: impl Into<Scope>) -> Self {
        self.scope = scope.into().0;
        self
    }

    pub fn pass_request(mut self, pass_request: bool) -> Self {
        self.pass_request = pass_request;
        self
    }

    fn normalized(mut self) -> Self {
        if self.realm.is_empty() {
            self.realm = DEFAULT_REALM.to_owned();
        }
        self
    }
}

/// Authenticated principal plus whatever the verifier attached (e.g. token scope).
#[derive(Debug, Clone, PartialEq)]
pub struct Authenticated<P> {
    pub principal: P,
    pub info: Option<Value>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AuthFailure {
    /// Bare 400, no challenge.
    BadRequest(MalformedCredentials),
    /// 401 with `WWW-Authenticate`.
    Challenge(Challenge),
}

impl AuthFailure {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Challenge(_) => StatusCode::UNAUTHORIZED,
        }
    }
}

/// Exactly one of these is produced per `authenticate` call.
#[derive(Debug)]
pub enum AuthOutcome<P> {
    Success(Authenticated<P>),
    Fail(AuthFailure),
    Error(VerifyError),
}

pub struct BearerStrategy<P> {
    options: BearerOptions,
    verifier: Arc<dyn TokenVerifier<P>>,
}

impl<P> fmt::Debug for BearerStrategy<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BearerStrategy")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl<P> BearerStrategy<P>
where
    P: Send + 'static,
{
    pub const NAME: &'static str = "bearer";

    pub fn new(verifier: impl TokenVerifier<P> + 'static) -> Self {
        Self::with_options(BearerOptions::default(), verifier)
    }

    pub fn with_options(options: BearerOptions, verifier: impl TokenVerifier<P> + 'static) -> Self {
        Self {
            options: options.normalized(),
            verifier: Arc::new(verifier),
        }
    }

    pub fn builder() -> BearerStrategyBuilder<P> {
        BearerStrategyBuilder {
            options: BearerOptions::default(),
            verifier: None,
        }
    }

    pub fn options(&self) -> &BearerOptions {
        &self.options
    }

    /// Unparameterized challenge for requests that carried no token.
    pub fn challenge(&self) -> Challenge {
        Challenge::new(self.options.realm.as_str()).with_scope(&self.options.scope)
    }

    fn invalid_token(&self, rejection: Option<&Rejection>) -> Challenge {
        let challenge = self.challenge().with_error(INVALID_TOKEN);
        match rejection.and_then(Rejection::message) {
            Some(message) => challenge.with_description(message),
            None => challenge,
        }
    }

    pub async fn authenticate(&self, request: &AuthRequest) -> AuthOutcome<P> {
        let token = match extract_token(request) {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!(strategy = Self::NAME, "no bearer token presented");
                return AuthOutcome::Fail(AuthFailure::Challenge(self.challenge()));
            }
            Err(reason) => {
                debug!(strategy = Self::NAME, %reason, "malformed bearer credentials");
                return AuthOutcome::Fail(AuthFailure::BadRequest(reason));
            }
        };

        let fingerprint = token_fingerprint(token);
        let passed = self.options.pass_request.then_some(request);

        match self.verifier.verify(passed, token).await {
            Verification::Error(err) => {
                warn!(strategy = Self::NAME, token = %fingerprint, error = %err, "token verification errored");
                AuthOutcome::Error(err)
            }
            Verification::Rejected(rejection) => {
                debug!(strategy = Self::NAME, token = %fingerprint, ?rejection, "token rejected");
                AuthOutcome::Fail(AuthFailure::Challenge(
                    self.invalid_token(rejection.as_ref()),
                ))
            }
            Verification::Accepted { principal, info } => {
                debug!(strategy = Self::NAME, token = %fingerprint, "token accepted");
                AuthOutcome::Success(Authenticated { principal, info })
            }
        }
    }
}

pub struct BearerStrategyBuilder<P> {
    options: BearerOptions,
    verifier: Option<Arc<dyn TokenVerifier<P>>>,
}

impl<P> BearerStrategyBuilder<P>
where
    P: Send + 'static,
{
    pub fn options(mut self, options: BearerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn realm(mut self, realm: impl Into<String>) -> Self {
        self.options = self.options.realm(realm);
        self
    }

    pub fn scope(mut self, scope: impl Into<Scope>) -> Self {
        self.options = self.options.scope(scope);
        self
    }

    pub fn pass_request(mut self, pass_request: bool) -> Self {
        self.options = self.options.pass_request(pass_request);
        self
    }

    pub fn verifier(mut self, verifier: impl TokenVerifier<P> + 'static) -> Self {
        self.verifier = Some(Arc::new(verifier));
        self
    }

    pub fn build(self) -> Result<BearerStrategy<P>, StrategyError> {
        let verifier = self.verifier.ok_or(StrategyError::MissingVerifier)?;
        Ok(BearerStrategy {
            options: self.options.normalized(),
            verifier,
        })
    }
}

/// Locate the bearer token.
///
/// - `Ok(Some(token))`: exactly one source supplied a token
/// - `Ok(None)`: no token anywhere
/// - `Err(_)`: malformed header, or more than one source
pub fn extract_token(request: &AuthRequest) -> Result<Option<&str>, MalformedCredentials> {
    let mut found: Option<(TokenSource, &str)> = None;

    if let Some(value) = request.headers.get(header::AUTHORIZATION) {
        // obs-text is allowed; only bytes that are not UTF-8 are refused
        let value = std::str::from_utf8(value.as_bytes())
            .map_err(|_| MalformedCredentials::AuthorizationEncoding)?;

        if !value.is_empty() {
            let parts: Vec<&str> = value.split(' ').collect();
            let &[scheme, credentials] = parts.as_slice() else {
                return Err(MalformedCredentials::AuthorizationParts);
            };
            if scheme.eq_ignore_ascii_case("bearer") && !credentials.is_empty() {
                found = Some((TokenSource::Header, credentials));
            }
        }
    }

    for (source, candidate) in [
        (TokenSource::Body, request.body_field(ACCESS_TOKEN_FIELD)),
        (TokenSource::Query, request.query_field(ACCESS_TOKEN_FIELD)),
    ] {
        let Some(candidate) = candidate else {
            continue;
        };
        if let Some((first, _)) = found {
            return Err(MalformedCredentials::Ambiguous {
                first,
                second: source,
            });
        }
        found = Some((source, candidate));
    }

    Ok(found.map(|(_, token)| token))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::http::{HeaderMap, HeaderValue, Method, Uri};
    use serde_json::json;

    use super::*;
    use crate::services::auth::bearer::verifier::{verify_fn, verify_request_fn};

    fn request(authorization: Option<&str>, body: Option<Value>, uri: &'static str) -> AuthRequest {
        let mut headers = HeaderMap::new();
        if let Some(value) = authorization {
            headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        }
        AuthRequest::new(Method::GET, Uri::from_static(uri), headers).with_body(body)
    }

    /// Strategy whose verifier accepts every token as the principal and counts calls.
    fn echo_strategy(options: BearerOptions) -> (BearerStrategy<String>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let strategy = BearerStrategy::with_options(
            options,
            verify_fn(move |token: String| {
                counter.fetch_add(1, Ordering::SeqCst);
                async move { Verification::accepted(token) }
            }),
        );
        (strategy, calls)
    }

    fn challenge_of<P>(outcome: AuthOutcome<P>) -> String {
        match outcome {
            AuthOutcome::Fail(AuthFailure::Challenge(challenge)) => challenge.to_string(),
            AuthOutcome::Fail(other) => panic!("expected challenge, got {other:?}"),
            AuthOutcome::Success(_) => panic!("expected challenge, got success"),
            AuthOutcome::Error(err) => panic!("expected challenge, got error {err}"),
        }
    }

    #[test]
    fn extracts_token_from_bearer_header() {
        let req = request(Some("Bearer abc.def.ghi"), None, "/");
        assert_eq!(extract_token(&req), Ok(Some("abc.def.ghi")));

        let req = request(Some("bEaReR xyz"), None, "/");
        assert_eq!(extract_token(&req), Ok(Some("xyz")));
    }

    #[test]
    fn other_scheme_leaves_token_unset() {
        let req = request(Some("Basic dXNlcjpwYXNz"), None, "/");
        assert_eq!(extract_token(&req), Ok(None));

        // another scheme does not block body/query tokens
        let req = request(Some("Basic dXNlcjpwYXNz"), None, "/?access_token=q");
        assert_eq!(extract_token(&req), Ok(Some("q")));
    }

    #[test]
    fn header_with_wrong_part_count_is_malformed() {
        for value in ["Bearer", "Bearer a b", "Bearer  a", "token"] {
            let req = request(Some(value), None, "/?access_token=q");
            assert_eq!(
                extract_token(&req),
                Err(MalformedCredentials::AuthorizationParts),
                "header {value:?}"
            );
        }
    }

    #[test]
    fn non_ascii_header_token_is_passed_through() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes("Bearer tökén".as_bytes()).unwrap(),
        );
        let req = AuthRequest::new(Method::GET, Uri::from_static("/"), headers);
        assert_eq!(extract_token(&req), Ok(Some("tökén")));

        let mut headers = HeaderMap::new();
        headers.insert(
            header::AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xff\xfe").unwrap(),
        );
        let req = AuthRequest::new(Method::GET, Uri::from_static("/"), headers);
        assert_eq!(
            extract_token(&req),
            Err(MalformedCredentials::AuthorizationEncoding)
        );
    }

    #[test]
    fn body_and_query_tokens_are_extracted() {
        let req = request(None, Some(json!({ "access_token": "from-body" })), "/");
        assert_eq!(extract_token(&req), Ok(Some("from-body")));

        let req = request(None, None, "/?access_token=from-query");
        assert_eq!(extract_token(&req), Ok(Some("from-query")));
    }

    #[test]
    fn more_than_one_source_is_ambiguous() {
        let cases = [
            (
                request(Some("Bearer h"), Some(json!({ "access_token": "b" })), "/"),
                TokenSource::Header,
                TokenSource::Body,
            ),
            (
                request(Some("Bearer h"), None, "/?access_token=q"),
                TokenSource::Header,
                TokenSource::Query,
            ),
            (
                request(None, Some(json!({ "access_token": "b" })), "/?access_token=q"),
                TokenSource::Body,
                TokenSource::Query,
            ),
        ];

        for (req, first, second) in cases {
            assert_eq!(
                extract_token(&req),
                Err(MalformedCredentials::Ambiguous { first, second })
            );
        }
    }

    #[tokio::test]
    async fn ambiguous_or_malformed_requests_never_reach_verifier() {
        let (strategy, calls) = echo_strategy(BearerOptions::default());

        for req in [
            request(Some("Bearer h"), None, "/?access_token=q"),
            request(Some("Bearer h"), Some(json!({ "access_token": "b" })), "/"),
            request(Some("Bearer a b"), None, "/"),
        ] {
            match strategy.authenticate(&req).await {
                AuthOutcome::Fail(failure @ AuthFailure::BadRequest(_)) => {
                    assert_eq!(failure.status(), StatusCode::BAD_REQUEST)
                }
                other => panic!("expected bad request, got {other:?}"),
            }
        }

        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn missing_token_yields_plain_challenge() {
        let (strategy, calls) = echo_strategy(BearerOptions::default());
        let outcome = strategy.authenticate(&request(None, None, "/")).await;

        assert_eq!(challenge_of(outcome), r#"Bearer realm="Users""#);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let (strategy, _) = echo_strategy(
            BearerOptions::default()
                .realm("API")
                .scope(["read", "write"]),
        );
        let outcome = strategy.authenticate(&request(None, None, "/")).await;
        assert_eq!(
            challenge_of(outcome),
            r#"Bearer realm="API", scope="read write""#
        );
    }

    #[tokio::test]
    async fn rejected_token_yields_invalid_token_challenge() {
        let strategy: BearerStrategy<String> =
            BearerStrategy::new(verify_fn(|_token: String| async {
                Verification::rejected_because("bad token")
            }));
        let outcome = strategy
            .authenticate(&request(Some("Bearer abc"), None, "/"))
            .await;

        assert_eq!(
            challenge_of(outcome),
            r#"Bearer realm="Users", error="invalid_token", error_description="bad token""#
        );
    }

    #[tokio::test]
    async fn rejection_info_message_becomes_description() {
        let strategy: BearerStrategy<String> =
            BearerStrategy::new(verify_fn(|_token: String| async {
                Verification::rejected_with_info(json!({ "message": "token revoked" }))
            }));
        let outcome = strategy
            .authenticate(&request(None, None, "/?access_token=abc"))
            .await;

        assert_eq!(
            challenge_of(outcome),
            r#"Bearer realm="Users", error="invalid_token", error_description="token revoked""#
        );

        let strategy: BearerStrategy<String> =
            BearerStrategy::new(verify_fn(|_token: String| async {
                Verification::rejected_with_info(json!("token revoked"))
            }));
        let outcome = strategy
            .authenticate(&request(Some("Bearer abc"), None, "/"))
            .await;

        assert_eq!(
            challenge_of(outcome),
            r#"Bearer realm="Users", error="invalid_token", error_description="token revoked""#
        );

        let strategy: BearerStrategy<String> =
            BearerStrategy::new(verify_fn(|_token: String| async { Verification::rejected() }));
        let outcome = strategy
            .authenticate(&request(Some("Bearer abc"), None, "/"))
            .await;

        assert_eq!(
            challenge_of(outcome),
            r#"Bearer realm="Users", error="invalid_token""#
        );
    }

    #[tokio::test]
    async fn accepted_token_carries_principal_and_info() {
        let strategy: BearerStrategy<Value> =
            BearerStrategy::new(verify_fn(|_token: String| async {
                Verification::accepted_with(json!({ "id": 1 }), json!({ "scope": "read" }))
            }));
        let outcome = strategy
            .authenticate(&request(Some("Bearer abc"), None, "/"))
            .await;

        match outcome {
            AuthOutcome::Success(authenticated) => {
                assert_eq!(authenticated.principal, json!({ "id": 1 }));
                assert_eq!(authenticated.info, Some(json!({ "scope": "read" })));
            }
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn verifier_error_is_not_a_challenge() {
        let strategy: BearerStrategy<String> =
            BearerStrategy::new(verify_fn(|_token: String| async {
                Verification::Error(VerifyError::new("user store unavailable"))
            }));
        let outcome = strategy
            .authenticate(&request(Some("Bearer abc"), None, "/"))
            .await;

        match outcome {
            AuthOutcome::Error(err) => assert_eq!(err.to_string(), "user store unavailable"),
            other => panic!("expected error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn verifier_is_called_once_with_the_token() {
        let (strategy, calls) = echo_strategy(BearerOptions::default());
        let outcome = strategy
            .authenticate(&request(None, Some(json!({ "access_token": "body-token" })), "/"))
            .await;

        match outcome {
            AuthOutcome::Success(authenticated) => {
                assert_eq!(authenticated.principal, "body-token")
            }
            other => panic!("expected success, got {other:?}"),
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn pass_request_controls_what_verifier_sees() {
        let verifier = || {
            verify_request_fn(|req: Option<AuthRequest>, token: String| async move {
                let seen = req.map(|r| r.uri.path().to_owned()).unwrap_or_default();
                Verification::accepted(format!("{seen}|{token}"))
            })
        };

        let with_request = BearerStrategy::<String>::builder()
            .pass_request(true)
            .verifier(verifier())
            .build()
            .unwrap();
        let without_request = BearerStrategy::<String>::builder()
            .verifier(verifier())
            .build()
            .unwrap();

        let req = request(Some("Bearer t"), None, "/arts");
        match with_request.authenticate(&req).await {
            AuthOutcome::Success(a) => assert_eq!(a.principal, "/arts|t"),
            other => panic!("unexpected {other:?}"),
        }
        match without_request.authenticate(&req).await {
            AuthOutcome::Success(a) => assert_eq!(a.principal, "|t"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn builder_requires_verifier() {
        let result = BearerStrategy::<String>::builder().realm("API").build();
        assert!(matches!(result, Err(StrategyError::MissingVerifier)));
    }

    #[test]
    fn options_are_normalized() {
        let (strategy, _) = echo_strategy(BearerOptions::default().realm("").scope("read"));
        assert_eq!(strategy.options().realm, "Users");
        assert_eq!(strategy.options().scope, vec!["read".to_string()]);

        let (strategy, _) = echo_strategy(BearerOptions::default().scope(""));
        assert!(strategy.options().scope.is_empty());
        assert_eq!(strategy.challenge().to_string(), r#"Bearer realm="Users""#);
    }
}
