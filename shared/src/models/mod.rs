//! Data models
//!
//! Shared between the server and API clients. Warehouse rows are read as
//! strings, so models carry owned `String` fields only.

pub mod fruit_option;
pub mod order;

// Re-exports
pub use fruit_option::*;
pub use order::*;
