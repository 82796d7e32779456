//! One run of the order form: load options, edit the selection, submit

use shared::models::{MAX_INGREDIENTS, Order, OrderConfirmation};
use validator::Validate;

use super::{
    FruitCatalog, ORDER_PLACED_MESSAGE, OrderError, OrderField, PendingSelection, SelectionError,
};
use crate::db;
use crate::warehouse::{Warehouse, WarehouseError};

/// What the user did to trigger this run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FormEvent {
    /// Name or selection changed; just re-render
    #[default]
    Refresh,
    /// "Submit Order" pressed
    Submit,
}

/// Where the form ended up for this run
#[derive(Debug)]
pub enum FormPhase {
    Collecting,
    Succeeded(OrderConfirmation),
    Failed(OrderError),
}

/// One run of the order form
#[derive(Debug)]
pub struct OrderForm {
    catalog: FruitCatalog,
    selection: PendingSelection,
    phase: FormPhase,
}

impl OrderForm {
    /// Start a run: load the options and take over the caller's selection
    pub async fn open(warehouse: &dyn Warehouse, selection: PendingSelection) -> Self {
        Self {
            catalog: FruitCatalog::load(warehouse).await,
            selection,
            phase: FormPhase::Collecting,
        }
    }

    /// Apply a multi-select change against this run's options
    pub fn select(&mut self, name: &str) -> Result<bool, SelectionError> {
        self.selection.select(name, &self.catalog)
    }

    pub fn deselect(&mut self, name: &str) -> bool {
        self.selection.deselect(name)
    }

    pub async fn handle(&mut self, warehouse: &dyn Warehouse, event: FormEvent) {
        self.phase = match event {
            FormEvent::Refresh => FormPhase::Collecting,
            FormEvent::Submit => {
                match submit_order(warehouse, &self.catalog, &self.selection).await {
                    Ok(confirmation) => FormPhase::Succeeded(confirmation),
                    Err(e) => FormPhase::Failed(e),
                }
            }
        };
    }

    pub fn catalog(&self) -> &FruitCatalog {
        &self.catalog
    }

    pub fn selection(&self) -> &PendingSelection {
        &self.selection
    }

    pub fn phase(&self) -> &FormPhase {
        &self.phase
    }
}

/// Check a selection against the rules and the loaded options
///
/// Missing fields are reported together; the size and membership checks
/// only run once both fields are present.
pub fn validate_order(
    selection: &PendingSelection,
    catalog: &FruitCatalog,
) -> Result<Order, OrderError> {
    if let Err(errors) = selection.validate() {
        let invalid = errors.field_errors();
        let missing: Vec<OrderField> = [OrderField::NameOnOrder, OrderField::Ingredients]
            .into_iter()
            .filter(|field| invalid.contains_key(field.key()))
            .collect();
        if !missing.is_empty() {
            return Err(OrderError::Validation(missing));
        }
    }

    let ingredients = selection.ingredients();
    if ingredients.len() > MAX_INGREDIENTS {
        return Err(OrderError::TooManyIngredients {
            max: MAX_INGREDIENTS,
            received: ingredients.len(),
        });
    }
    if let Some(unknown) = ingredients.iter().find(|name| !catalog.contains(name)) {
        return Err(OrderError::UnknownIngredient(unknown.clone()));
    }

    Ok(Order::from_parts(
        selection.name_on_order().trim(),
        ingredients,
    ))
}

/// Validate and insert one order
pub async fn submit_order(
    warehouse: &dyn Warehouse,
    catalog: &FruitCatalog,
    selection: &PendingSelection,
) -> Result<OrderConfirmation, OrderError> {
    let order = validate_order(selection, catalog)?;

    let inserted = match db::insert_order(warehouse, &order).await {
        Ok(0) => Err(WarehouseError::Protocol("insert reported no rows".into())),
        other => other,
    };
    match inserted {
        Ok(rows) => {
            tracing::info!(rows, "Order submitted");
            Ok(OrderConfirmation {
                message: ORDER_PLACED_MESSAGE.to_string(),
                order,
            })
        }
        Err(e) => {
            tracing::error!(error = %e, "Order insert failed");
            Err(OrderError::Submission(e))
        }
    }
}
