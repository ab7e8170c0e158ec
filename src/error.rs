/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body / WWW-Authenticate)
 * - RepoError / StorageError / IdCodecError / GeoError を統一的に変換
 */
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;
use crate::services::auth::bearer::Challenge;
use crate::services::geo::GeoError;
use crate::services::id_codec::IdCodecError;
use crate::services::storage::StorageError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("unauthorized")]
    Unauthorized { challenge: Challenge },
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("upstream storage failure")]
    Upstream,
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn unauthorized(challenge: Challenge) -> Self {
        Self::Unauthorized { challenge }
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }
}

fn challenge_header(challenge: &Challenge) -> HeaderValue {
    // descriptions come from verifiers; fall back to the bare challenge if they are not header-safe
    HeaderValue::from_str(&challenge.to_string())
        .or_else(|_| HeaderValue::from_str(&Challenge::new(challenge.realm()).to_string()))
        .unwrap_or_else(|_| HeaderValue::from_static("Bearer"))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut www_authenticate = None;

        let (status, code, message) = match self {
            AppError::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            AppError::Unauthorized { challenge } => {
                www_authenticate = Some(challenge_header(&challenge));
                let message = challenge.description().unwrap_or("unauthorized").to_owned();
                (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", message)
            }
            AppError::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{resource} not found."),
            ),
            AppError::Upstream => (
                StatusCode::BAD_GATEWAY,
                "UPSTREAM_ERROR",
                "asset storage unavailable".into(),
            ),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        let mut response = (status, Json(body)).into_response();
        if let Some(value) = www_authenticate {
            response.headers_mut().insert(header::WWW_AUTHENTICATE, value);
        }
        response
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::MissingReference => AppError::not_found("art"),
            RepoError::Db(err) => {
                tracing::error!(error = ?err, "database error");
                AppError::Internal
            }
        }
    }
}

impl From<StorageError> for AppError {
    fn from(e: StorageError) -> Self {
        match e {
            StorageError::NotFound(_) => AppError::not_found("asset"),
            StorageError::Backend(err) => {
                tracing::error!(error = %err, "asset storage error");
                AppError::Upstream
            }
        }
    }
}

impl From<GeoError> for AppError {
    fn from(e: GeoError) -> Self {
        AppError::bad_request("INVALID_COORDINATES", e.to_string())
    }
}

impl From<IdCodecError> for AppError {
    fn from(e: IdCodecError) -> Self {
        match e {
            // Client supplied a malformed public id (e.g. /arts/{id})
            IdCodecError::DecodeInvalidFormat | IdCodecError::DecodeOutOfRange => {
                AppError::bad_request("INVALID_PUBLIC_ID", "invalid id")
            }

            // These indicate server-side config / programming errors
            _ => AppError::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::bearer::challenge::INVALID_TOKEN;

    #[test]
    fn unauthorized_sets_www_authenticate() {
        let challenge = Challenge::new("Users")
            .with_error(INVALID_TOKEN)
            .with_description("token expired");
        let response = AppError::unauthorized(challenge).into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.headers()[header::WWW_AUTHENTICATE],
            r#"Bearer realm="Users", error="invalid_token", error_description="token expired""#
        );
    }

    #[test]
    fn non_header_safe_description_falls_back_to_bare_challenge() {
        let challenge = Challenge::new("Users")
            .with_error(INVALID_TOKEN)
            .with_description("line\nbreak");
        let response = AppError::unauthorized(challenge).into_response();

        assert_eq!(
            response.headers()[header::WWW_AUTHENTICATE],
            r#"Bearer realm="Users""#
        );
    }

    #[test]
    fn maps_storage_and_geo_errors() {
        let not_found = AppError::from(StorageError::NotFound("1".into())).into_response();
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

        let upstream = AppError::from(StorageError::Backend("timeout".into())).into_response();
        assert_eq!(upstream.status(), StatusCode::BAD_GATEWAY);

        let geo = AppError::from(GeoError::Latitude(91.0)).into_response();
        assert_eq!(geo.status(), StatusCode::BAD_REQUEST);
    }
}
