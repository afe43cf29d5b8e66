//! Request and response payloads.
//!
//! Deserialization is lenient where the established API is (dietary flags
//! arrive as booleans or 0/1); `validate()` then yields a typed, sanitized
//! payload or a validation error. Identity never comes from a payload.

use serde::{Deserialize, Deserializer, Serialize};

use mealshare_core::meals::models::{Allergen, MealUpdate, NewMeal};
use mealshare_core::users::models::{User, UserFilter, UserUpdate};

use crate::error::AppError;
use crate::validate::{valid_email, valid_password, valid_phone};

/// Accept a dietary flag as a JSON boolean or as 0/1.
fn flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error as _;
    use serde_json::Value;

    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(b)) => Ok(Some(b)),
        Some(Value::Number(n)) if n.as_i64() == Some(0) => Ok(Some(false)),
        Some(Value::Number(n)) if n.as_i64() == Some(1) => Ok(Some(true)),
        Some(other) => Err(D::Error::custom(format!(
            "expected a boolean or 0/1, got {other}"
        ))),
    }
}

// ---------------------------------------------------------------------------
// Auth
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email_address: String,
    pub password: String,
}

impl LoginRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.email_address.is_empty() {
            return Err(AppError::Validation("Email address is required".into()));
        }
        if !valid_password(&self.password) {
            return Err(AppError::Validation("Password is not valid".into()));
        }
        Ok(())
    }
}

/// Login response: the public profile with the fresh token alongside.
#[derive(Debug, Serialize)]
pub struct LoginData {
    #[serde(flatten)]
    pub user: User,
    pub token: String,
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub street: String,
    #[serde(default)]
    pub city: String,
    pub email_address: String,
    pub password: String,
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub is_active: Option<bool>,
}

impl RegisterRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.first_name.is_empty() {
            return Err(AppError::Validation("First name is required".into()));
        }
        if self.last_name.chars().count() < 2 {
            return Err(AppError::Validation(
                "Last name must be at least 2 characters".into(),
            ));
        }
        if !valid_email(&self.email_address) {
            return Err(AppError::Validation("Email address is not valid".into()));
        }
        if !valid_password(&self.password) {
            return Err(AppError::Validation(
                "Password is not valid. It should be at least 8 characters and contain \
                 at least one uppercase letter and one digit"
                    .into(),
            ));
        }
        if let Some(phone_number) = &self.phone_number
            && !valid_phone(phone_number)
        {
            return Err(AppError::Validation("Phone number is not valid".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub street: Option<String>,
    pub city: Option<String>,
    pub email_address: Option<String>,
    pub password: Option<String>,
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "flag")]
    pub is_active: Option<bool>,
}

impl UpdateUserRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(last_name) = &self.last_name
            && last_name.chars().count() < 2
        {
            return Err(AppError::Validation(
                "Last name must be at least 2 characters".into(),
            ));
        }
        if let Some(email_address) = &self.email_address
            && !valid_email(email_address)
        {
            return Err(AppError::Validation("Email address is not valid".into()));
        }
        if let Some(password) = &self.password
            && !valid_password(password)
        {
            return Err(AppError::Validation("Password is not valid".into()));
        }
        if let Some(phone_number) = &self.phone_number
            && !valid_phone(phone_number)
        {
            return Err(AppError::Validation("Phone number is not valid".into()));
        }
        Ok(())
    }

    /// The store-level update, with the password digest already computed.
    pub fn into_update(self, password_hash: Option<String>) -> UserUpdate {
        UserUpdate {
            first_name: self.first_name,
            last_name: self.last_name,
            street: self.street,
            city: self.city,
            phone_number: self.phone_number,
            email_address: self.email_address,
            password_hash,
            is_active: self.is_active,
        }
    }
}

/// Directory listing filters (query string).
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserFilterQuery {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email_address: Option<String>,
    pub is_active: Option<bool>,
}

impl From<UserFilterQuery> for UserFilter {
    fn from(q: UserFilterQuery) -> Self {
        UserFilter {
            first_name: q.first_name,
            last_name: q.last_name,
            email_address: q.email_address,
            is_active: q.is_active,
        }
    }
}

// ---------------------------------------------------------------------------
// Meals
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateMealRequest {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub max_amount_of_participants: i32,
    pub image_url: String,
    #[serde(default, rename = "allergenes")]
    pub allergens: Option<Vec<Allergen>>,
    #[serde(default, deserialize_with = "flag")]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "flag")]
    pub is_vega: Option<bool>,
    #[serde(default, deserialize_with = "flag")]
    pub is_vegan: Option<bool>,
    #[serde(default, deserialize_with = "flag")]
    pub is_to_take_home: Option<bool>,
}

impl CreateMealRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.is_empty() {
            return Err(AppError::Validation("Name is a required field".into()));
        }
        if self.description.is_empty() {
            return Err(AppError::Validation("Description is a required field".into()));
        }
        if self.image_url.is_empty() {
            return Err(AppError::Validation("Image URL is a required field".into()));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(AppError::Validation("Price must be non-negative".into()));
        }
        if self.max_amount_of_participants <= 0 {
            return Err(AppError::Validation(
                "Max amount of participants must be positive".into(),
            ));
        }
        Ok(())
    }

    /// The typed creation payload; defaults applied (`isActive` true, dietary
    /// flags false when absent).
    pub fn into_new_meal(self) -> NewMeal {
        NewMeal {
            name: self.name,
            description: self.description,
            is_active: self.is_active.unwrap_or(true),
            is_vega: self.is_vega.unwrap_or(false),
            is_vegan: self.is_vegan.unwrap_or(false),
            is_to_take_home: self.is_to_take_home.unwrap_or(false),
            max_participants: self.max_amount_of_participants,
            price: self.price,
            image_url: self.image_url,
            allergens: self.allergens.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMealRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub max_amount_of_participants: Option<i32>,
    pub image_url: Option<String>,
    #[serde(default, rename = "allergenes")]
    pub allergens: Option<Vec<Allergen>>,
    #[serde(default, deserialize_with = "flag")]
    pub is_active: Option<bool>,
    #[serde(default, deserialize_with = "flag")]
    pub is_vega: Option<bool>,
    #[serde(default, deserialize_with = "flag")]
    pub is_vegan: Option<bool>,
    #[serde(default, deserialize_with = "flag")]
    pub is_to_take_home: Option<bool>,
}

impl UpdateMealRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if let Some(name) = &self.name
            && name.is_empty()
        {
            return Err(AppError::Validation("Name cannot be empty".into()));
        }
        if let Some(description) = &self.description
            && description.is_empty()
        {
            return Err(AppError::Validation("Description cannot be empty".into()));
        }
        if let Some(price) = self.price
            && (!price.is_finite() || price < 0.0)
        {
            return Err(AppError::Validation("Price must be non-negative".into()));
        }
        if let Some(max) = self.max_amount_of_participants
            && max <= 0
        {
            return Err(AppError::Validation(
                "Max amount of participants must be positive".into(),
            ));
        }
        Ok(())
    }

    pub fn into_update(self) -> MealUpdate {
        MealUpdate {
            name: self.name,
            description: self.description,
            is_active: self.is_active,
            is_vega: self.is_vega,
            is_vegan: self.is_vegan,
            is_to_take_home: self.is_to_take_home,
            max_participants: self.max_amount_of_participants,
            price: self.price,
            image_url: self.image_url,
            allergens: self.allergens,
        }
    }
}
