//! Order writes

use shared::models::Order;

use crate::warehouse::{Statement, Warehouse, WarehouseError};

pub const INSERT_ORDER: &str =
    "INSERT INTO smoothies.public.orders (ingredients, name_on_order) VALUES (?, ?)";

/// Insert one order row, binding `(ingredients, name_on_order)` positionally
pub async fn insert_order(warehouse: &dyn Warehouse, order: &Order) -> Result<u64, WarehouseError> {
    let statement = Statement::new(INSERT_ORDER)
        .bind(order.ingredients.as_str())
        .bind(order.name_on_order.as_str());
    warehouse.execute(&statement).await
}
