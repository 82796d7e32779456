//! Error codes for the smoothie order service
//!
//! Codes are grouped by range:
//! - 0xxx: General errors
//! - 4xxx: Order errors
//! - 6xxx: Catalog errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so that browser and
/// API clients can switch on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 4xxx: Order ====================
    /// The order insert did not complete
    OrderSubmitFailed = 4001,

    // ==================== 6xxx: Catalog ====================
    /// Fruit options could not be read
    FruitOptionsUnavailable = 6001,
    /// Ingredient is not in the current fruit option list
    IngredientNotAvailable = 6002,

    // ==================== 9xxx: System ====================
    /// Warehouse session could not be established
    WarehouseUnavailable = 9101,
    /// Warehouse rejected the configured credentials
    WarehouseAuthFailed = 9102,
    /// Fruit metadata service failed or returned a bad status
    MetadataUnavailable = 9201,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Get the user-facing English message for this error code
    ///
    /// These messages are safe to show to end users: they never carry
    /// upstream error text, SQL, or credentials.
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Order
            ErrorCode::OrderSubmitFailed => {
                "Your order could not be submitted. Please try again."
            }

            // Catalog
            ErrorCode::FruitOptionsUnavailable => "Fruit options are unavailable right now",
            ErrorCode::IngredientNotAvailable => "Ingredient is not available",

            // System
            ErrorCode::WarehouseUnavailable => "Order storage is unavailable right now",
            ErrorCode::WarehouseAuthFailed => "Order storage is unavailable right now",
            ErrorCode::MetadataUnavailable => "Fruit information could not be loaded",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Order
            4001 => Ok(ErrorCode::OrderSubmitFailed),

            // Catalog
            6001 => Ok(ErrorCode::FruitOptionsUnavailable),
            6002 => Ok(ErrorCode::IngredientNotAvailable),

            // System
            9101 => Ok(ErrorCode::WarehouseUnavailable),
            9102 => Ok(ErrorCode::WarehouseAuthFailed),
            9201 => Ok(ErrorCode::MetadataUnavailable),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
