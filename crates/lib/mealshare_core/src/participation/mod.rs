//! Participation ledger: the many-to-many roster between users and meals.
//!
//! A roster fact is owned by the participating user alone; it is created by
//! sign-up, destroyed by unregister, and never mutated. The store enforces
//! at most one active fact per (meal, user) pair.

pub mod queries;

use thiserror::Error;

use crate::store::StoreError;

/// Roster operation errors. The two miss causes stay distinct so callers can
/// report "meal not found" and "no participation record" differently.
#[derive(Debug, Error)]
pub enum ParticipationError {
    #[error("no meal found with id {0}")]
    MealNotFound(i64),

    #[error("no participation found for user {user_id} on meal {meal_id}")]
    NotSignedUp { meal_id: i64, user_id: i64 },

    #[error("no participant found with id {user_id} for meal {meal_id}")]
    ParticipantNotFound { meal_id: i64, user_id: i64 },

    #[error("user {user_id} is already signed up for meal {meal_id}")]
    AlreadySignedUp { meal_id: i64, user_id: i64 },

    #[error("meal {0} is full")]
    MealFull(i64),

    #[error(transparent)]
    Store(#[from] StoreError),
}
