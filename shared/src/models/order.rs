//! Order Model

use serde::{Deserialize, Serialize};

/// Maximum number of ingredients in one smoothie
pub const MAX_INGREDIENTS: usize = 5;

/// Separator used when storing the ingredient list as one string
pub const INGREDIENT_SEPARATOR: &str = ", ";

/// Create order payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderCreate {
    #[serde(default)]
    pub name_on_order: String,
    /// Ingredient names in selection order
    #[serde(default)]
    pub ingredients: Vec<String>,
}

/// Order as stored in the `orders` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Ingredient names joined with [`INGREDIENT_SEPARATOR`]
    pub ingredients: String,
    pub name_on_order: String,
}

impl Order {
    /// Build the stored form of an order from its parts
    pub fn from_parts(name_on_order: impl Into<String>, ingredients: &[String]) -> Self {
        Self {
            ingredients: ingredients.join(INGREDIENT_SEPARATOR),
            name_on_order: name_on_order.into(),
        }
    }
}

/// Confirmation returned after a successful submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderConfirmation {
    pub message: String,
    pub order: Order,
}
