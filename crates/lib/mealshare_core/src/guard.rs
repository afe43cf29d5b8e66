//! Ownership guard for mutations on owned resources.
//!
//! Update and delete statements on owned rows carry the ownership predicate in
//! their own WHERE clause (`… WHERE id = $1 AND cook_id = $2`), so a hit
//! proves existence and ownership in a single store call — there is no window
//! between an ownership read and the mutation. This module classifies a miss.

use std::future::Future;

use thiserror::Error;

use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum GuardError {
    #[error("resource not found")]
    NotFound,

    #[error("resource is owned by another user")]
    Forbidden,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Classify the outcome of a guarded mutation.
///
/// `rows_affected` comes from the conditional statement; `exists` probes the
/// row by id alone. Existence decides before ownership: a caller probing a
/// nonexistent id gets `NotFound`, never `Forbidden`, whoever they are.
pub async fn require_owned<F, Fut>(rows_affected: u64, exists: F) -> Result<(), GuardError>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<bool, StoreError>>,
{
    if rows_affected > 0 {
        return Ok(());
    }
    if exists().await? {
        Err(GuardError::Forbidden)
    } else {
        Err(GuardError::NotFound)
    }
}
