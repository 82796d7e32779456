//! Smoothie order workflow
//!
//! One request is one run of the form: load the fruit catalog, take the
//! caller's [`PendingSelection`], optionally submit it. Nothing survives
//! between runs except what the caller sends back.

mod catalog;
mod form;
mod selection;

pub use catalog::FruitCatalog;
pub use form::{FormEvent, FormPhase, OrderForm, submit_order, validate_order};
pub use selection::{PendingSelection, SelectionError};

use shared::error::{AppError, ErrorCode};
use shared::models::MAX_INGREDIENTS;
use thiserror::Error;

use crate::warehouse::WarehouseError;

/// Shown after a successful insert
pub const ORDER_PLACED_MESSAGE: &str = "Your Smoothie is ordered!";

/// Form fields that can be missing on submit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderField {
    NameOnOrder,
    Ingredients,
}

impl OrderField {
    /// Request/form key
    pub const fn key(&self) -> &'static str {
        match self {
            Self::NameOnOrder => "name_on_order",
            Self::Ingredients => "ingredients",
        }
    }

    /// Wording used in the inline validation message
    pub const fn label(&self) -> &'static str {
        match self {
            Self::NameOnOrder => "a name for your smoothie",
            Self::Ingredients => "at least one ingredient",
        }
    }
}

/// Order workflow failure
#[derive(Debug, Error)]
pub enum OrderError {
    /// Reading fruit options failed; recovered with an empty list
    #[error("fruit options could not be read")]
    Fetch(#[source] WarehouseError),
    #[error("missing required fields: {}", field_keys(.0).join(", "))]
    Validation(Vec<OrderField>),
    #[error("{received} ingredients selected, at most {max} allowed")]
    TooManyIngredients { max: usize, received: usize },
    #[error("ingredient {0:?} is not offered")]
    UnknownIngredient(String),
    #[error("order insert failed")]
    Submission(#[source] WarehouseError),
}

impl OrderError {
    /// True for errors the user can fix by editing the form
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::TooManyIngredients { .. } | Self::UnknownIngredient(_)
        )
    }
}

fn field_keys(fields: &[OrderField]) -> Vec<&'static str> {
    fields.iter().map(OrderField::key).collect()
}

/// User-facing form of an order error; the source error is dropped
impl From<&OrderError> for AppError {
    fn from(err: &OrderError) -> Self {
        match err {
            OrderError::Fetch(_) => AppError::new(ErrorCode::FruitOptionsUnavailable),
            OrderError::Validation(fields) => {
                let labels: Vec<&str> = fields.iter().map(OrderField::label).collect();
                AppError::with_message(
                    ErrorCode::RequiredField,
                    format!("Please provide {}.", labels.join(" and ")),
                )
                .with_detail("fields", field_keys(fields))
            }
            OrderError::TooManyIngredients { max, received } => {
                AppError::with_message(
                    ErrorCode::ValueOutOfRange,
                    format!("Choose up to {MAX_INGREDIENTS} ingredients."),
                )
                .with_detail("max", *max)
                .with_detail("received", *received)
            }
            OrderError::UnknownIngredient(name) => {
                AppError::new(ErrorCode::IngredientNotAvailable)
                    .with_detail("ingredient", name.as_str())
            }
            OrderError::Submission(e) => AppError::new(match e {
                WarehouseError::Connection(_) => ErrorCode::WarehouseUnavailable,
                WarehouseError::Authentication { .. } => ErrorCode::WarehouseAuthFailed,
                _ => ErrorCode::OrderSubmitFailed,
            }),
        }
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        AppError::from(&err)
    }
}
