//! Password hashing via bcrypt.
//!
//! Hashing and verification are deliberately slow; both run on the blocking
//! pool so unrelated requests keep progressing.

use super::AuthError;

/// bcrypt cost factor.
const BCRYPT_COST: u32 = 10;

/// Hash a password with bcrypt (cost 10).
pub async fn hash_password(password: &str) -> Result<String, AuthError> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(&password, BCRYPT_COST))
        .await
        .map_err(|e| AuthError::Internal(format!("hash task: {e}")))?
        .map_err(|e| AuthError::Internal(format!("bcrypt hash: {e}")))
}

/// Verify a password against a bcrypt hash.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let password = password.to_owned();
    let hash = hash.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::verify(&password, &hash))
        .await
        .map_err(|e| AuthError::Internal(format!("verify task: {e}")))?
        .map_err(|e| AuthError::Internal(format!("bcrypt verify: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn digest_never_equals_plaintext() {
        let digest = hash_password("Secret123").await.expect("hash");
        assert_ne!("Secret123", digest);
        assert!(digest.starts_with("$2"));
    }

    #[tokio::test]
    async fn verify_accepts_the_original_password() {
        let digest = hash_password("Secret123").await.expect("hash");
        assert!(verify_password("Secret123", &digest).await.expect("verify"));
        assert!(!verify_password("Secret124", &digest).await.expect("verify"));
    }
}
