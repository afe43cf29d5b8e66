//! User accounts: registration, directory, profile, owner-checked mutation.

pub mod models;
pub mod queries;

use thiserror::Error;

use crate::store::StoreError;

/// User operation errors.
#[derive(Debug, Error)]
pub enum UserError {
    #[error("no user found with id {0}")]
    NotFound(i64),

    #[error("not authorized to modify user {0}")]
    Forbidden(i64),

    #[error("email address already registered")]
    EmailTaken,

    #[error(transparent)]
    Store(StoreError),
}

impl From<StoreError> for UserError {
    fn from(e: StoreError) -> Self {
        match e {
            // The only unique constraint on users is the email address.
            StoreError::Conflict { .. } => UserError::EmailTaken,
            other => UserError::Store(other),
        }
    }
}
