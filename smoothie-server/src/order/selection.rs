//! Pending order: name on order plus the ordered ingredient selection

use shared::models::{MAX_INGREDIENTS, OrderCreate};
use thiserror::Error;
use validator::{Validate, ValidationError};

use super::FruitCatalog;

/// Rejected multi-select change
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("at most {max} ingredients can be selected")]
    LimitReached { max: usize },
    #[error("{0:?} is not one of the offered fruits")]
    NotOffered(String),
}

/// The form as the user currently has it filled in
///
/// Built fresh for every run from caller-owned input. [`select`] enforces
/// the multi-select rules; [`from_request`] accepts anything so that
/// submit-time validation can report what was wrong.
///
/// [`select`]: PendingSelection::select
/// [`from_request`]: PendingSelection::from_request
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct PendingSelection {
    #[validate(custom(function = "not_blank"))]
    name_on_order: String,
    #[validate(length(min = 1))]
    ingredients: Vec<String>,
}

fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

impl PendingSelection {
    pub fn new(name_on_order: impl Into<String>) -> Self {
        Self {
            name_on_order: name_on_order.into(),
            ingredients: Vec::new(),
        }
    }

    /// Take untrusted input as-is, dropping repeated ingredients
    pub fn from_request(request: OrderCreate) -> Self {
        let mut ingredients: Vec<String> = Vec::with_capacity(request.ingredients.len());
        for name in request.ingredients {
            if !ingredients.contains(&name) {
                ingredients.push(name);
            }
        }
        Self {
            name_on_order: request.name_on_order,
            ingredients,
        }
    }

    pub fn set_name(&mut self, name_on_order: impl Into<String>) {
        self.name_on_order = name_on_order.into();
    }

    /// Add an ingredient; returns `false` if it was already selected
    pub fn select(&mut self, name: &str, catalog: &FruitCatalog) -> Result<bool, SelectionError> {
        if self.ingredients.iter().any(|i| i == name) {
            return Ok(false);
        }
        if !catalog.contains(name) {
            return Err(SelectionError::NotOffered(name.to_string()));
        }
        if self.ingredients.len() >= MAX_INGREDIENTS {
            return Err(SelectionError::LimitReached {
                max: MAX_INGREDIENTS,
            });
        }
        self.ingredients.push(name.to_string());
        Ok(true)
    }

    /// Remove an ingredient; returns `false` if it was not selected
    pub fn deselect(&mut self, name: &str) -> bool {
        let before = self.ingredients.len();
        self.ingredients.retain(|i| i != name);
        self.ingredients.len() != before
    }

    pub fn name_on_order(&self) -> &str {
        &self.name_on_order
    }

    pub fn ingredients(&self) -> &[String] {
        &self.ingredients
    }

    pub fn is_selected(&self, name: &str) -> bool {
        self.ingredients.iter().any(|i| i == name)
    }

    pub fn has_ingredients(&self) -> bool {
        !self.ingredients.is_empty()
    }
}
