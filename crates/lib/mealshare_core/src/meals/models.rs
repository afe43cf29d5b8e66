//! Meal domain models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::users::models::User;

/// Allergens a meal can carry. Wire values follow the established API
/// (`gluten`, `lactose`, `noten`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Allergen {
    Gluten,
    Lactose,
    #[serde(rename = "noten")]
    Nuts,
}

impl Allergen {
    pub fn as_str(self) -> &'static str {
        match self {
            Allergen::Gluten => "gluten",
            Allergen::Lactose => "lactose",
            Allergen::Nuts => "noten",
        }
    }

    pub fn parse(s: &str) -> Option<Allergen> {
        match s {
            "gluten" => Some(Allergen::Gluten),
            "lactose" => Some(Allergen::Lactose),
            "noten" => Some(Allergen::Nuts),
            _ => None,
        }
    }
}

/// Join an allergen set into its comma-separated column form.
pub fn allergens_to_column(allergens: &[Allergen]) -> String {
    allergens
        .iter()
        .map(|a| a.as_str())
        .collect::<Vec<_>>()
        .join(",")
}

/// Split the comma-separated column form back into an allergen set.
/// Unknown entries are dropped rather than failing the whole row.
pub fn allergens_from_column(column: &str) -> Vec<Allergen> {
    column
        .split(',')
        .filter_map(|s| Allergen::parse(s.trim()))
        .collect()
}

/// A meal as stored, with its owner reference.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub is_vega: bool,
    pub is_vegan: bool,
    pub is_to_take_home: bool,
    pub date_time: DateTime<Utc>,
    pub max_amount_of_participants: i32,
    pub price: f64,
    pub image_url: String,
    // Established wire spelling of this field.
    #[serde(rename = "allergenes")]
    pub allergens: Vec<Allergen>,
    pub cook_id: i64,
}

/// Raw row shape; `allergens` is the comma-joined column.
#[derive(Debug, FromRow)]
pub(crate) struct MealRow {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub is_vega: bool,
    pub is_vegan: bool,
    pub is_to_take_home: bool,
    pub date_time: DateTime<Utc>,
    pub max_participants: i32,
    pub price: f64,
    pub image_url: String,
    pub allergens: String,
    pub cook_id: i64,
}

impl From<MealRow> for Meal {
    fn from(row: MealRow) -> Self {
        Meal {
            id: row.id,
            name: row.name,
            description: row.description,
            is_active: row.is_active,
            is_vega: row.is_vega,
            is_vegan: row.is_vegan,
            is_to_take_home: row.is_to_take_home,
            date_time: row.date_time,
            max_amount_of_participants: row.max_participants,
            price: row.price,
            image_url: row.image_url,
            allergens: allergens_from_column(&row.allergens),
            cook_id: row.cook_id,
        }
    }
}

/// Payload for creating a meal. The owner comes from the verified token,
/// never from the payload.
#[derive(Debug, Clone)]
pub struct NewMeal {
    pub name: String,
    pub description: String,
    pub is_active: bool,
    pub is_vega: bool,
    pub is_vegan: bool,
    pub is_to_take_home: bool,
    pub max_participants: i32,
    pub price: f64,
    pub image_url: String,
    pub allergens: Vec<Allergen>,
}

/// Partial update; `None` fields retain their prior values. There is no
/// `cook_id` here: ownership is immutable after creation.
#[derive(Debug, Clone, Default)]
pub struct MealUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub is_active: Option<bool>,
    pub is_vega: Option<bool>,
    pub is_vegan: Option<bool>,
    pub is_to_take_home: Option<bool>,
    pub max_participants: Option<i32>,
    pub price: Option<f64>,
    pub image_url: Option<String>,
    pub allergens: Option<Vec<Allergen>>,
}

impl MealUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.is_active.is_none()
            && self.is_vega.is_none()
            && self.is_vegan.is_none()
            && self.is_to_take_home.is_none()
            && self.max_participants.is_none()
            && self.price.is_none()
            && self.image_url.is_none()
            && self.allergens.is_none()
    }
}

/// A meal aggregated with its cook and current roster, digests stripped.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealDetails {
    pub meal: Meal,
    pub cook: User,
    pub participants: Vec<User>,
}
