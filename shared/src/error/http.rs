//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 422 Unprocessable Entity (well-formed but unacceptable order)
            Self::IngredientNotAvailable => StatusCode::UNPROCESSABLE_ENTITY,

            // 502 Bad Gateway (upstream answered badly)
            Self::MetadataUnavailable => StatusCode::BAD_GATEWAY,

            // 503 Service Unavailable (transient errors, client can retry)
            Self::WarehouseUnavailable
            | Self::WarehouseAuthFailed
            | Self::FruitOptionsUnavailable => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            Self::OrderSubmitFailed => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (validation errors)
            Self::InvalidRequest | Self::RequiredField | Self::ValueOutOfRange => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}
