use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use serde::Deserialize;
use std::{error::Error as StdError, fmt};
use uuid::Uuid;

// Errors returned by access-token decoding + strict claim validation.
#[derive(Debug)]
pub enum AccessJwtError {
    InvalidKey(jsonwebtoken::errors::Error),
    Jwt(jsonwebtoken::errors::Error),
    EmptyClaim(&'static str),
    InvalidSubUuid,
}

impl AccessJwtError {
    /// Text safe to hand back to the client in `error_description`.
    pub fn client_description(&self) -> &'static str {
        match self {
            Self::Jwt(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => "token expired",
            _ => "invalid token",
        }
    }
}

impl fmt::Display for AccessJwtError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidKey(e) => write!(f, "invalid ed25519 public key pem: {}", e),
            Self::Jwt(e) => write!(f, "jwt verification failed: {}", e),
            Self::EmptyClaim(name) => write!(f, "empty '{}' claim", name),
            Self::InvalidSubUuid => write!(f, "invalid 'sub' (expected UUID)"),
        }
    }
}

impl StdError for AccessJwtError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        match self {
            Self::InvalidKey(e) | Self::Jwt(e) => Some(e),
            _ => None,
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AccessJwtError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        Self::Jwt(e)
    }
}

/// Access token (JWT) claims.
///
/// NOTE:
/// - `aud` can be string or array; `Validation::set_audience` checks it, so we don't keep it.
/// - `scope` is space-separated (RFC 8693 style).
#[derive(Debug, Clone, Deserialize)]
struct AccessTokenClaims {
    iss: String,
    sub: String,
    #[serde(default)]
    scope: Option<String>,
}

/// Decoded, validated access token as the app uses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedAccessToken {
    pub user_id: Uuid,
    pub scope: Option<String>,
}

/// EdDSA (Ed25519) access-token decoder.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct AccessTokenDecoder {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl fmt::Debug for AccessTokenDecoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("AccessTokenDecoder")
            .field("validation", &self.validation)
            .finish()
    }
}

impl AccessTokenDecoder {
    pub fn new(
        public_key_pem: &str,
        issuer: &str,
        audience: &str,
        leeway_seconds: u64,
    ) -> Result<Self, AccessJwtError> {
        let decoding_key = DecodingKey::from_ed_pem(public_key_pem.as_bytes())
            .map_err(AccessJwtError::InvalidKey)?;

        let mut validation = Validation::new(Algorithm::EdDSA);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);
        validation.leeway = leeway_seconds;

        Ok(Self {
            decoding_key,
            validation,
        })
    }

    /// Signature + `exp`/`iss`/`aud` (jsonwebtoken), then non-empty `iss`/`sub` and UUID `sub`.
    pub fn decode(&self, token: &str) -> Result<VerifiedAccessToken, AccessJwtError> {
        let claims =
            jsonwebtoken::decode::<AccessTokenClaims>(token, &self.decoding_key, &self.validation)?
                .claims;

        if claims.iss.trim().is_empty() {
            return Err(AccessJwtError::EmptyClaim("iss"));
        }
        if claims.sub.trim().is_empty() {
            return Err(AccessJwtError::EmptyClaim("sub"));
        }

        // Project convention: subject is a UUID
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AccessJwtError::InvalidSubUuid)?;

        Ok(VerifiedAccessToken {
            user_id,
            scope: claims.scope.filter(|s| !s.trim().is_empty()),
        })
    }
}
