//! Authentication service — login and registration flows.

use sqlx::PgPool;
use tracing::info;

use mealshare_core::auth::{jwt, password};
use mealshare_core::users::models::{NewUser, User};
use mealshare_core::users::queries;

use crate::error::{AppError, AppResult};
use crate::models::{LoginData, LoginRequest, RegisterRequest};

/// Authenticate with email + password; issue a token on success.
///
/// An unknown email answers "User not found"; a known email with a wrong
/// password answers invalid-credential.
pub async fn login(pool: &PgPool, req: &LoginRequest, secret: &[u8]) -> AppResult<LoginData> {
    let Some((user, digest)) = queries::fetch_credential(pool, &req.email_address).await? else {
        return Err(AppError::NotFound("User not found".into()));
    };

    if !password::verify_password(&req.password, &digest).await? {
        return Err(AppError::Unauthorized("Invalid password".into()));
    }

    let token = jwt::issue(user.id, secret)?;
    info!(user_id = user.id, "user logged in");

    Ok(LoginData { user, token })
}

/// Register a new user account, returning the canonical stored profile.
pub async fn register(pool: &PgPool, req: RegisterRequest) -> AppResult<User> {
    req.validate()?;

    let password_hash = password::hash_password(&req.password).await?;

    let user = queries::create_user(
        pool,
        NewUser {
            first_name: req.first_name,
            last_name: req.last_name,
            street: req.street,
            city: req.city,
            phone_number: req.phone_number,
            email_address: req.email_address,
            password_hash,
            is_active: req.is_active.unwrap_or(true),
        },
    )
    .await?;

    info!(user_id = user.id, "registered new user");
    Ok(user)
}
