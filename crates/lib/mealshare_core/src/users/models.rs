//! User domain models.
//!
//! `User` is the public shape: it never carries the credential digest, so it
//! can be serialized into responses (meal details, rosters) as-is.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Public user profile.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    pub city: String,
    pub phone_number: Option<String>,
    pub email_address: String,
    pub is_active: bool,
}

/// Payload for creating a user. The password is already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub street: String,
    pub city: String,
    pub phone_number: Option<String>,
    pub email_address: String,
    pub password_hash: String,
    pub is_active: bool,
}

/// Partial update; `None` fields retain their prior values.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub phone_number: Option<String>,
    pub email_address: Option<String>,
    pub password_hash: Option<String>,
    pub is_active: Option<bool>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none()
            && self.last_name.is_none()
            && self.street.is_none()
            && self.city.is_none()
            && self.phone_number.is_none()
            && self.email_address.is_none()
            && self.password_hash.is_none()
            && self.is_active.is_none()
    }
}

/// Directory listing filters.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email_address: Option<String>,
    pub is_active: Option<bool>,
}
