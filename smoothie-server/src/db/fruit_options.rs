//! Fruit option queries

use shared::models::FruitOption;

use crate::warehouse::{Statement, Warehouse, WarehouseError};

pub const SELECT_FRUIT_OPTIONS: &str = "SELECT FRUIT_NAME FROM smoothies.public.fruit_options";

const FRUIT_NAME: &str = "FRUIT_NAME";

/// Read all selectable fruits in warehouse order
///
/// NULL and empty names are skipped; a FruitOption is never blank.
pub async fn list_fruit_options(
    warehouse: &dyn Warehouse,
) -> Result<Vec<FruitOption>, WarehouseError> {
    let rows = warehouse
        .query(&Statement::new(SELECT_FRUIT_OPTIONS))
        .await?;
    let names = rows
        .column_values(FRUIT_NAME)
        .ok_or_else(|| WarehouseError::Protocol(format!("result has no {FRUIT_NAME} column")))?;

    Ok(names
        .filter(|name| !name.trim().is_empty())
        .map(FruitOption::new)
        .collect())
}
