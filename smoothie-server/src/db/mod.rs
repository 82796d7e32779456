//! Database access layer
//!
//! Every statement here is a constant; user input only ever travels as a
//! bind value.

pub mod fruit_options;
pub mod orders;

pub use fruit_options::list_fruit_options;
pub use orders::insert_order;
