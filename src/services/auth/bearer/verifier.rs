//! Verifier seam: who owns the token, and is it still good?
//!
//! The bearer strategy only extracts credentials. Deciding whether a token is valid
//! (JWT checks, user lookup, ...) lives behind [`TokenVerifier`].

use std::{error::Error as StdError, future::Future};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use super::request::AuthRequest;

/// Verifier failed to reach a decision (backend down, etc.). Not a client error.
#[derive(Debug, Error)]
#[error("{message}")]
pub struct VerifyError {
    message: String,
    #[source]
    source: Option<Box<dyn StdError + Send + Sync>>,
}

impl VerifyError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            source: None,
        }
    }

    pub fn with_source(
        message: impl Into<String>,
        source: impl StdError + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

/// Why a token was refused.
#[derive(Debug, Clone, PartialEq)]
pub enum Rejection {
    Reason(String),
    /// Structured info; a bare string, or its `message` string field, is surfaced to the client.
    Info(Value),
}

impl Rejection {
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Reason(reason) => Some(reason),
            Self::Info(Value::String(message)) => Some(message),
            Self::Info(info) => info.get("message").and_then(Value::as_str),
        }
    }
}

/// Outcome of a single verification.
#[derive(Debug)]
pub enum Verification<P> {
    Error(VerifyError),
    Rejected(Option<Rejection>),
    Accepted { principal: P, info: Option<Value> },
}

impl<P> Verification<P> {
    pub fn accepted(principal: P) -> Self {
        Self::Accepted {
            principal,
            info: None,
        }
    }

    pub fn accepted_with(principal: P, info: Value) -> Self {
        Self::Accepted {
            principal,
            info: Some(info),
        }
    }

    pub fn rejected() -> Self {
        Self::Rejected(None)
    }

    pub fn rejected_because(reason: impl Into<String>) -> Self {
        Self::Rejected(Some(Rejection::Reason(reason.into())))
    }

    pub fn rejected_with_info(info: Value) -> Self {
        Self::Rejected(Some(Rejection::Info(info)))
    }
}

/// Validates a bearer token and resolves the principal it belongs to.
///
/// `request` is `Some` only when the strategy was configured with `pass_request`.
#[async_trait]
pub trait TokenVerifier<P>: Send + Sync {
    async fn verify(&self, request: Option<&AuthRequest>, token: &str) -> Verification<P>;
}

/// Adapter for `Fn(token) -> Future<Output = Verification<P>>`.
pub struct FnVerifier<F>(F);

pub fn verify_fn<F>(f: F) -> FnVerifier<F> {
    FnVerifier(f)
}

#[async_trait]
impl<P, F, Fut> TokenVerifier<P> for FnVerifier<F>
where
    P: Send + 'static,
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Verification<P>> + Send + 'static,
{
    async fn verify(&self, _request: Option<&AuthRequest>, token: &str) -> Verification<P> {
        (self.0)(token.to_owned()).await
    }
}

/// Adapter for `Fn(request, token) -> Future<Output = Verification<P>>`.
pub struct RequestFnVerifier<F>(F);

pub fn verify_request_fn<F>(f: F) -> RequestFnVerifier<F> {
    RequestFnVerifier(f)
}

#[async_trait]
impl<P, F, Fut> TokenVerifier<P> for RequestFnVerifier<F>
where
    P: Send + 'static,
    F: Fn(Option<AuthRequest>, String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Verification<P>> + Send + 'static,
{
    async fn verify(&self, request: Option<&AuthRequest>, token: &str) -> Verification<P> {
        (self.0)(request.cloned(), token.to_owned()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rejection_message_prefers_reason_then_info_message() {
        assert_eq!(
            Rejection::Reason("bad token".into()).message(),
            Some("bad token")
        );
        assert_eq!(
            Rejection::Info(json!({ "message": "revoked", "code": 7 })).message(),
            Some("revoked")
        );
        assert_eq!(Rejection::Info(json!({ "code": 7 })).message(), None);
        assert_eq!(Rejection::Info(json!({ "message": 7 })).message(), None);
        assert_eq!(Rejection::Info(json!("revoked")).message(), Some("revoked"));
    }

    #[test]
    fn verify_error_keeps_source() {
        let io = std::io::Error::other("connection reset");
        let err = VerifyError::with_source("user lookup failed", io);

        assert_eq!(err.to_string(), "user lookup failed");
        assert_eq!(
            err.source().map(|s| s.to_string()).as_deref(),
            Some("connection reset")
        );
    }

    #[tokio::test]
    async fn request_fn_receives_request_when_given() {
        let verifier = verify_request_fn(|req: Option<AuthRequest>, token: String| async move {
            match req {
                Some(req) => Verification::accepted(format!("{} {}", req.method, token)),
                None => Verification::rejected(),
            }
        });

        let req = AuthRequest::default();
        match verifier.verify(Some(&req), "abc").await {
            Verification::Accepted { principal, .. } => assert_eq!(principal, "GET abc"),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(matches!(
            verifier.verify(None, "abc").await,
            Verification::Rejected(None)
        ));
    }
}
