//! Meal database queries.
//!
//! Mutations carry the ownership predicate in their own WHERE clause and are
//! classified through [`crate::guard`]. Reads that aggregate cooks and rosters
//! batch over id sets instead of querying per meal.

use std::collections::HashMap;

use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use super::MealError;
use super::models::{
    Meal, MealDetails, MealRow, MealUpdate, NewMeal, allergens_to_column,
};
use crate::guard;
use crate::store::StoreError;
use crate::users::models::User;

const MEAL_COLUMNS: &str = "id, name, description, is_active, is_vega, is_vegan, \
     is_to_take_home, date_time, max_participants, price, image_url, allergens, cook_id";

const USER_COLUMNS: &str =
    "id, first_name, last_name, street, city, phone_number, email_address, is_active";

/// Create a meal owned by `cook_id`, returning the canonical stored row.
pub async fn insert_meal(pool: &PgPool, new_meal: NewMeal, cook_id: i64) -> Result<Meal, MealError> {
    let meal_id = sqlx::query_scalar::<_, i64>(
        "INSERT INTO meals \
           (name, description, is_active, is_vega, is_vegan, is_to_take_home, \
            max_participants, price, image_url, allergens, cook_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11) \
         RETURNING id",
    )
    .bind(&new_meal.name)
    .bind(&new_meal.description)
    .bind(new_meal.is_active)
    .bind(new_meal.is_vega)
    .bind(new_meal.is_vegan)
    .bind(new_meal.is_to_take_home)
    .bind(new_meal.max_participants)
    .bind(new_meal.price)
    .bind(&new_meal.image_url)
    .bind(allergens_to_column(&new_meal.allergens))
    .bind(cook_id)
    .fetch_one(pool)
    .await
    .map_err(StoreError::from)?;

    fetch_meal(pool, meal_id)
        .await?
        .ok_or(MealError::NotFound(meal_id))
}

/// Fetch a meal by id.
pub async fn fetch_meal(pool: &PgPool, meal_id: i64) -> Result<Option<Meal>, StoreError> {
    let row = sqlx::query_as::<_, MealRow>(&format!(
        "SELECT {MEAL_COLUMNS} FROM meals WHERE id = $1"
    ))
    .bind(meal_id)
    .fetch_optional(pool)
    .await?;
    Ok(row.map(Meal::from))
}

/// Check whether a meal exists.
pub async fn meal_exists(pool: &PgPool, meal_id: i64) -> Result<bool, StoreError> {
    let exists =
        sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM meals WHERE id = $1)")
            .bind(meal_id)
            .fetch_one(pool)
            .await?;
    Ok(exists)
}

/// List every meal.
pub async fn list_meals(pool: &PgPool) -> Result<Vec<Meal>, StoreError> {
    let rows = sqlx::query_as::<_, MealRow>(&format!(
        "SELECT {MEAL_COLUMNS} FROM meals ORDER BY id"
    ))
    .fetch_all(pool)
    .await?;
    Ok(rows.into_iter().map(Meal::from).collect())
}

/// Fetch the cooks for a set of meal owners, keyed by user id.
async fn fetch_cooks(pool: &PgPool, cook_ids: &[i64]) -> Result<HashMap<i64, User>, StoreError> {
    if cook_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let cooks = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE id = ANY($1)"
    ))
    .bind(cook_ids)
    .fetch_all(pool)
    .await?;
    Ok(cooks.into_iter().map(|c| (c.id, c)).collect())
}

#[derive(FromRow)]
struct ParticipantRow {
    meal_id: i64,
    #[sqlx(flatten)]
    user: User,
}

/// Fetch the rosters for a set of meals, keyed by meal id.
async fn fetch_rosters(
    pool: &PgPool,
    meal_ids: &[i64],
) -> Result<HashMap<i64, Vec<User>>, StoreError> {
    if meal_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows = sqlx::query_as::<_, ParticipantRow>(
        "SELECT mp.meal_id, u.id, u.first_name, u.last_name, u.street, u.city, \
                u.phone_number, u.email_address, u.is_active \
         FROM meal_participants mp \
         JOIN users u ON u.id = mp.user_id \
         WHERE mp.meal_id = ANY($1) \
         ORDER BY mp.signed_up_at",
    )
    .bind(meal_ids)
    .fetch_all(pool)
    .await?;

    let mut rosters: HashMap<i64, Vec<User>> = HashMap::new();
    for row in rows {
        rosters.entry(row.meal_id).or_default().push(row.user);
    }
    Ok(rosters)
}

/// Every meal joined with its cook and roster: three batched queries
/// (meals, cooks by id set, participants by meal-id set) correlated here.
pub async fn list_with_details(pool: &PgPool) -> Result<Vec<MealDetails>, StoreError> {
    let meals = list_meals(pool).await?;

    let cook_ids: Vec<i64> = meals.iter().map(|m| m.cook_id).collect();
    let meal_ids: Vec<i64> = meals.iter().map(|m| m.id).collect();
    let cooks = fetch_cooks(pool, &cook_ids).await?;
    let mut rosters = fetch_rosters(pool, &meal_ids).await?;

    let details = meals
        .into_iter()
        .filter_map(|meal| {
            let cook = cooks.get(&meal.cook_id).cloned()?;
            let participants = rosters.remove(&meal.id).unwrap_or_default();
            Some(MealDetails {
                meal,
                cook,
                participants,
            })
        })
        .collect();
    Ok(details)
}

/// One meal's aggregation; `None` when the meal is absent.
pub async fn fetch_details(pool: &PgPool, meal_id: i64) -> Result<Option<MealDetails>, StoreError> {
    let Some(meal) = fetch_meal(pool, meal_id).await? else {
        return Ok(None);
    };
    let cooks = fetch_cooks(pool, &[meal.cook_id]).await?;
    let Some(cook) = cooks.get(&meal.cook_id).cloned() else {
        return Ok(None);
    };
    let mut rosters = fetch_rosters(pool, &[meal_id]).await?;
    let participants = rosters.remove(&meal_id).unwrap_or_default();
    Ok(Some(MealDetails {
        meal,
        cook,
        participants,
    }))
}

/// Apply a partial update through a guarded conditional statement.
/// Absent fields retain their prior values.
pub async fn update_meal(
    pool: &PgPool,
    meal_id: i64,
    owner_id: i64,
    update: MealUpdate,
) -> Result<Meal, MealError> {
    if update.is_empty() {
        // Nothing to apply; still run the guard semantics against the row.
        let meal = fetch_meal(pool, meal_id)
            .await?
            .ok_or(MealError::NotFound(meal_id))?;
        if meal.cook_id != owner_id {
            return Err(MealError::Forbidden(meal_id));
        }
        return Ok(meal);
    }

    let mut qb = QueryBuilder::<Postgres>::new("UPDATE meals SET ");
    let mut fields = qb.separated(", ");
    if let Some(name) = &update.name {
        fields.push("name = ").push_bind_unseparated(name);
    }
    if let Some(description) = &update.description {
        fields.push("description = ").push_bind_unseparated(description);
    }
    if let Some(is_active) = update.is_active {
        fields.push("is_active = ").push_bind_unseparated(is_active);
    }
    if let Some(is_vega) = update.is_vega {
        fields.push("is_vega = ").push_bind_unseparated(is_vega);
    }
    if let Some(is_vegan) = update.is_vegan {
        fields.push("is_vegan = ").push_bind_unseparated(is_vegan);
    }
    if let Some(is_to_take_home) = update.is_to_take_home {
        fields
            .push("is_to_take_home = ")
            .push_bind_unseparated(is_to_take_home);
    }
    if let Some(max_participants) = update.max_participants {
        fields
            .push("max_participants = ")
            .push_bind_unseparated(max_participants);
    }
    if let Some(price) = update.price {
        fields.push("price = ").push_bind_unseparated(price);
    }
    if let Some(image_url) = &update.image_url {
        fields.push("image_url = ").push_bind_unseparated(image_url);
    }
    if let Some(allergens) = &update.allergens {
        fields
            .push("allergens = ")
            .push_bind_unseparated(allergens_to_column(allergens));
    }
    qb.push(" WHERE id = ")
        .push_bind(meal_id)
        .push(" AND cook_id = ")
        .push_bind(owner_id);

    let result = qb
        .build()
        .execute(pool)
        .await
        .map_err(StoreError::from)?;

    guard::require_owned(result.rows_affected(), || meal_exists(pool, meal_id))
        .await
        .map_err(|e| MealError::from_guard(e, meal_id))?;

    fetch_meal(pool, meal_id)
        .await?
        .ok_or(MealError::NotFound(meal_id))
}

/// Delete a meal through a guarded conditional statement.
pub async fn delete_meal(pool: &PgPool, meal_id: i64, owner_id: i64) -> Result<(), MealError> {
    let result = sqlx::query("DELETE FROM meals WHERE id = $1 AND cook_id = $2")
        .bind(meal_id)
        .bind(owner_id)
        .execute(pool)
        .await
        .map_err(StoreError::from)?;

    guard::require_owned(result.rows_affected(), || meal_exists(pool, meal_id))
        .await
        .map_err(|e| MealError::from_guard(e, meal_id))
}
