//! Meal lifecycle: create, read, update, delete.
//!
//! A meal is exclusively owned by the user that created it (`cook_id`,
//! immutable after creation). All mutations go through guarded conditional
//! statements; see [`crate::guard`].

pub mod models;
pub mod queries;

use thiserror::Error;

use crate::guard::GuardError;
use crate::store::StoreError;

/// Meal operation errors.
#[derive(Debug, Error)]
pub enum MealError {
    #[error("no meal found with id {0}")]
    NotFound(i64),

    #[error("not the owner of meal {0}")]
    Forbidden(i64),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl MealError {
    pub(crate) fn from_guard(e: GuardError, meal_id: i64) -> Self {
        match e {
            GuardError::NotFound => MealError::NotFound(meal_id),
            GuardError::Forbidden => MealError::Forbidden(meal_id),
            GuardError::Store(store) => MealError::Store(store),
        }
    }
}
