//! User database queries.

use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use super::UserError;
use super::models::{NewUser, User, UserFilter, UserUpdate};
use crate::store::StoreError;

const USER_COLUMNS: &str =
    "id, first_name, last_name, street, city, phone_number, email_address, is_active";

/// Create a user, returning the canonical stored row.
pub async fn create_user(pool: &PgPool, new_user: NewUser) -> Result<User, UserError> {
    let user_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO users \
           (first_name, last_name, street, city, phone_number, email_address, password_hash, is_active) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8) \
         RETURNING id",
    )
    .bind(&new_user.first_name)
    .bind(&new_user.last_name)
    .bind(&new_user.street)
    .bind(&new_user.city)
    .bind(&new_user.phone_number)
    .bind(&new_user.email_address)
    .bind(&new_user.password_hash)
    .bind(new_user.is_active)
    .fetch_one(pool)
    .await
    .map_err(StoreError::from)?;

    fetch_user(pool, user_id)
        .await?
        .ok_or(UserError::NotFound(user_id))
}

/// Fetch a user by id.
pub async fn fetch_user(pool: &PgPool, user_id: i64) -> Result<Option<User>, StoreError> {
    let row = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = $1"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Check whether a user exists.
pub async fn user_exists(pool: &PgPool, user_id: i64) -> Result<bool, StoreError> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
            .bind(user_id)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

#[derive(FromRow)]
struct CredentialRow {
    #[sqlx(flatten)]
    user: User,
    password_hash: String,
}

/// Fetch a user and their credential digest by email, for login.
pub async fn fetch_credential(
    pool: &PgPool,
    email_address: &str,
) -> Result<Option<(User, String)>, StoreError> {
    let row = sqlx::query_as::<_, CredentialRow>(&format!(
        "SELECT {USER_COLUMNS}, password_hash FROM users WHERE email_address = $1"
    ))
    .bind(email_address)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(|r| (r.user, r.password_hash)))
}

/// List users, optionally narrowed by directory filters.
pub async fn list_users(pool: &PgPool, filter: &UserFilter) -> Result<Vec<User>, StoreError> {
    let mut qb = QueryBuilder::<Postgres>::new(format!("SELECT {USER_COLUMNS} FROM users"));
    let mut clause = " WHERE ";
    if let Some(first_name) = &filter.first_name {
        qb.push(clause).push("first_name = ").push_bind(first_name);
        clause = " AND ";
    }
    if let Some(last_name) = &filter.last_name {
        qb.push(clause).push("last_name = ").push_bind(last_name);
        clause = " AND ";
    }
    if let Some(email_address) = &filter.email_address {
        qb.push(clause)
            .push("email_address = ")
            .push_bind(email_address);
        clause = " AND ";
    }
    if let Some(is_active) = filter.is_active {
        qb.push(clause).push("is_active = ").push_bind(is_active);
    }
    qb.push(" ORDER BY id");

    let users = qb.build_query_as::<User>().fetch_all(pool).await?;
    Ok(users)
}

/// Update a user's own fields. Existence decides before ownership.
pub async fn update_user(
    pool: &PgPool,
    user_id: i64,
    requester_id: i64,
    update: UserUpdate,
) -> Result<User, UserError> {
    if !user_exists(pool, user_id).await? {
        return Err(UserError::NotFound(user_id));
    }
    if user_id != requester_id {
        return Err(UserError::Forbidden(user_id));
    }
    if update.is_empty() {
        return fetch_user(pool, user_id)
            .await?
            .ok_or(UserError::NotFound(user_id));
    }

    let mut qb = QueryBuilder::<Postgres>::new("UPDATE users SET ");
    let mut fields = qb.separated(", ");
    if let Some(first_name) = &update.first_name {
        fields.push("first_name = ").push_bind_unseparated(first_name);
    }
    if let Some(last_name) = &update.last_name {
        fields.push("last_name = ").push_bind_unseparated(last_name);
    }
    if let Some(street) = &update.street {
        fields.push("street = ").push_bind_unseparated(street);
    }
    if let Some(city) = &update.city {
        fields.push("city = ").push_bind_unseparated(city);
    }
    if let Some(phone_number) = &update.phone_number {
        fields.push("phone_number = ").push_bind_unseparated(phone_number);
    }
    if let Some(email_address) = &update.email_address {
        fields
            .push("email_address = ")
            .push_bind_unseparated(email_address);
    }
    if let Some(password_hash) = &update.password_hash {
        fields
            .push("password_hash = ")
            .push_bind_unseparated(password_hash);
    }
    if let Some(is_active) = update.is_active {
        fields.push("is_active = ").push_bind_unseparated(is_active);
    }
    qb.push(" WHERE id = ").push_bind(user_id);

    qb.build()
        .execute(pool)
        .await
        .map_err(StoreError::from)?;

    fetch_user(pool, user_id)
        .await?
        .ok_or(UserError::NotFound(user_id))
}

/// Delete a user's own account. Authored meals and roster rows cascade.
pub async fn delete_user(
    pool: &PgPool,
    user_id: i64,
    requester_id: i64,
) -> Result<(), UserError> {
    if !user_exists(pool, user_id).await? {
        return Err(UserError::NotFound(user_id));
    }
    if user_id != requester_id {
        return Err(UserError::Forbidden(user_id));
    }
    sqlx::query("DELETE FROM users WHERE id = $1")
        .bind(user_id)
        .execute(pool)
        .await
        .map_err(StoreError::from)?;
    Ok(())
}
