//! Fruit options offered during a run

use shared::error::AppError;
use shared::models::{FruitOption, FruitOptionList};

use super::OrderError;
use crate::db;
use crate::warehouse::Warehouse;

/// Fruit options loaded for the current run
#[derive(Debug, Default)]
pub struct FruitCatalog {
    options: Vec<FruitOption>,
    fetch_error: Option<OrderError>,
}

impl FruitCatalog {
    /// Read the option list; a failed read yields an empty catalog that
    /// remembers why
    pub async fn load(warehouse: &dyn Warehouse) -> Self {
        match db::list_fruit_options(warehouse).await {
            Ok(options) => {
                tracing::debug!(count = options.len(), "Fruit options loaded");
                Self {
                    options,
                    fetch_error: None,
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Fruit options unavailable, showing an empty list");
                Self {
                    options: Vec::new(),
                    fetch_error: Some(OrderError::Fetch(e)),
                }
            }
        }
    }

    pub fn from_options(options: Vec<FruitOption>) -> Self {
        Self {
            options,
            fetch_error: None,
        }
    }

    pub fn options(&self) -> &[FruitOption] {
        &self.options
    }

    pub fn contains(&self, name: &str) -> bool {
        self.options.iter().any(|o| o.name == name)
    }

    pub fn fetch_error(&self) -> Option<&OrderError> {
        self.fetch_error.as_ref()
    }

    /// User-facing warning for a failed read
    pub fn warning(&self) -> Option<AppError> {
        self.fetch_error.as_ref().map(AppError::from)
    }

    pub fn to_list(&self) -> FruitOptionList {
        FruitOptionList {
            options: self.options.clone(),
            warning: self.warning().map(|w| w.message),
        }
    }
}
