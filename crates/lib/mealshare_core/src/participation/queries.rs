//! Roster database queries.

use sqlx::PgPool;

use super::ParticipationError;
use crate::meals::queries::meal_exists;
use crate::store::StoreError;
use crate::users::models::User;

const USER_COLUMNS: &str =
    "u.id, u.first_name, u.last_name, u.street, u.city, u.phone_number, \
     u.email_address, u.is_active";

/// Sign a user up for a meal.
///
/// Capacity is a hard invariant: the transaction locks the meal row, counts
/// the roster, and inserts only while there is room, so two concurrent
/// sign-ups for the last seat serialize on the row lock. A duplicate
/// (meal, user) pair trips the primary key and is reported as such; the
/// roster is unchanged.
pub async fn sign_up(
    pool: &PgPool,
    meal_id: i64,
    user_id: i64,
) -> Result<(), ParticipationError> {
    let mut tx = pool.begin().await.map_err(StoreError::from)?;

    let capacity = sqlx::query_scalar::<_, i32>(
        "SELECT max_participants FROM meals WHERE id = $1 FOR UPDATE",
    )
    .bind(meal_id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(StoreError::from)?;

    let Some(capacity) = capacity else {
        return Err(ParticipationError::MealNotFound(meal_id));
    };

    let taken = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM meal_participants WHERE meal_id = $1",
    )
    .bind(meal_id)
    .fetch_one(&mut *tx)
    .await
    .map_err(StoreError::from)?;

    if taken >= i64::from(capacity) {
        return Err(ParticipationError::MealFull(meal_id));
    }

    sqlx::query("INSERT INTO meal_participants (meal_id, user_id) VALUES ($1, $2)")
        .bind(meal_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await
        .map_err(|e| match StoreError::from(e) {
            StoreError::Conflict { .. } => {
                ParticipationError::AlreadySignedUp { meal_id, user_id }
            }
            other => ParticipationError::Store(other),
        })?;

    tx.commit().await.map_err(StoreError::from)?;
    Ok(())
}

/// Remove a user's own participation fact. Meal existence decides first, so
/// the caller can distinguish a missing meal from a missing sign-up.
pub async fn unregister(
    pool: &PgPool,
    meal_id: i64,
    user_id: i64,
) -> Result<(), ParticipationError> {
    if !meal_exists(pool, meal_id).await? {
        return Err(ParticipationError::MealNotFound(meal_id));
    }

    let result = sqlx::query(
        "DELETE FROM meal_participants WHERE meal_id = $1 AND user_id = $2",
    )
    .bind(meal_id)
    .bind(user_id)
    .execute(pool)
    .await
    .map_err(StoreError::from)?;

    if result.rows_affected() == 0 {
        return Err(ParticipationError::NotSignedUp { meal_id, user_id });
    }
    Ok(())
}

/// The roster of a meal, public profile fields only. An existing meal with
/// nobody signed up is an empty roster, not an error.
pub async fn list_participants(
    pool: &PgPool,
    meal_id: i64,
) -> Result<Vec<User>, ParticipationError> {
    if !meal_exists(pool, meal_id).await? {
        return Err(ParticipationError::MealNotFound(meal_id));
    }

    let participants = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} \
         FROM meal_participants mp \
         JOIN users u ON u.id = mp.user_id \
         WHERE mp.meal_id = $1 \
         ORDER BY mp.signed_up_at",
    ))
    .bind(meal_id)
    .fetch_all(pool)
    .await
    .map_err(StoreError::from)?;
    Ok(participants)
}

/// One participant's public profile on a meal's roster.
pub async fn get_participant(
    pool: &PgPool,
    meal_id: i64,
    user_id: i64,
) -> Result<User, ParticipationError> {
    if !meal_exists(pool, meal_id).await? {
        return Err(ParticipationError::MealNotFound(meal_id));
    }

    let participant = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} \
         FROM meal_participants mp \
         JOIN users u ON u.id = mp.user_id \
         WHERE mp.meal_id = $1 AND mp.user_id = $2",
    ))
    .bind(meal_id)
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(StoreError::from)?;

    participant.ok_or(ParticipationError::ParticipantNotFound { meal_id, user_id })
}
