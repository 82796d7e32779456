//! Shared types for the smoothie order service
//!
//! Error codes, the API response envelope and the order/catalog models
//! exchanged between the server and its clients.

pub mod error;
pub mod models;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};

pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
