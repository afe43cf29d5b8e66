//! JWT issuing and verification.
//!
//! The token's only identity claim is the user id. Verification proves the
//! signature and expiry; it does not confirm the user still exists — that is
//! the caller's concern when it matters.

use std::path::PathBuf;

use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::distr::Alphanumeric;
use rand::{Rng, rng};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::AuthError;

/// Token lifetime: 24 hours.
const TOKEN_EXPIRY_SECS: i64 = 24 * 60 * 60;

/// Claims embedded in an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject — user id.
    pub sub: i64,
    /// Issued at (unix timestamp).
    pub iat: i64,
    /// Expiry (unix timestamp).
    pub exp: i64,
}

/// Issue a signed token (HS256) for a user id.
pub fn issue(user_id: i64, secret: &[u8]) -> Result<String, AuthError> {
    let now = Utc::now();
    let claims = TokenClaims {
        sub: user_id,
        iat: now.timestamp(),
        exp: (now + Duration::seconds(TOKEN_EXPIRY_SECS)).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| AuthError::TokenError(format!("jwt encode: {e}")))
}

/// Verify a token, returning the embedded user id.
pub fn verify(token: &str, secret: &[u8]) -> Result<i64, AuthError> {
    let key = DecodingKey::from_secret(secret);
    let mut validation = Validation::default();
    validation.validate_exp = true;
    decode::<TokenClaims>(token, &key, &validation)
        .map(|data| data.claims.sub)
        .map_err(|_| AuthError::InvalidToken)
}

/// Resolve the signing secret: env var `JWT_SECRET` → persisted file.
pub fn resolve_jwt_secret() -> String {
    if let Ok(secret) = std::env::var("JWT_SECRET")
        && !secret.is_empty()
    {
        return secret;
    }
    // Generate and persist
    let secret_path = jwt_secret_path();
    if let Ok(existing) = std::fs::read_to_string(&secret_path) {
        let trimmed = existing.trim();
        if !trimmed.is_empty() {
            return trimmed.to_string();
        }
    }
    let secret: String = rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect();
    if let Some(parent) = secret_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let _ = std::fs::write(&secret_path, &secret);
    info!(path = %secret_path.display(), "generated new JWT secret");
    secret
}

/// Path to the persisted signing secret.
fn jwt_secret_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mealshare")
        .join("jwt-secret")
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"test-secret";

    #[test]
    fn issue_then_verify_roundtrips_the_user_id() {
        let token = issue(42, SECRET).expect("issue");
        let user_id = verify(&token, SECRET).expect("verify");
        assert_eq!(42, user_id);
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let token = issue(42, SECRET).expect("issue");
        assert!(matches!(
            verify(&token, b"other-secret"),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(matches!(
            verify("not-a-token", SECRET),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now();
        let claims = TokenClaims {
            sub: 42,
            iat: (now - Duration::hours(2)).timestamp(),
            exp: (now - Duration::hours(1)).timestamp(),
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .expect("encode");
        assert!(matches!(
            verify(&token, SECRET),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn tampered_payload_is_rejected() {
        let token = issue(42, SECRET).expect("issue");
        let mut parts: Vec<&str> = token.split('.').collect();
        let other = issue(43, SECRET).expect("issue");
        let other_parts: Vec<&str> = other.split('.').collect();
        parts[1] = other_parts[1];
        let forged = parts.join(".");
        assert!(matches!(
            verify(&forged, SECRET),
            Err(AuthError::InvalidToken)
        ));
    }
}
