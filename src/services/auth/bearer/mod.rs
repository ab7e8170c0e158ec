/*!
 * Bearer token authentication
 *
 * Responsibility:
 * - request から bearer token を取り出す (header / body / query のどれか 1 箇所)
 * - 検証は TokenVerifier に委譲し、結果を AuthOutcome (success / fail / error) に変換する
 * - challenge (WWW-Authenticate) の組み立て
 *
 * Public API:
 * - BearerStrategy / BearerOptions
 * - TokenVerifier / Verification
 * - AuthRequest
 * - Challenge
 */
use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use sha2::{Digest, Sha256};

pub mod challenge;
pub mod request;
pub mod strategy;
pub mod verifier;

pub use challenge::Challenge;
pub use request::{AuthRequest, BodyKind};
pub use strategy::{AuthFailure, AuthOutcome, Authenticated, BearerOptions, BearerStrategy};
pub use verifier::{TokenVerifier, Verification, VerifyError};

/// Short, non-reversible token id for logs. Raw tokens never go to logs.
pub fn token_fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    let mut fingerprint = URL_SAFE_NO_PAD.encode(digest);
    fingerprint.truncate(8);
    fingerprint
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_and_short() {
        let a = token_fingerprint("secret-token");
        assert_eq!(a.len(), 8);
        assert_eq!(a, token_fingerprint("secret-token"));
        assert_ne!(a, token_fingerprint("other-token"));
        assert!(!a.contains("secret"));
    }
}
