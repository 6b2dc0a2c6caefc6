//! The response envelope shared by every endpoint.
//!
//! Successful responses carry `data` and/or `message`; failures are produced by
//! [`AppError`](crate::AppError) and carry `error`.
//!
//! ```json
//! { "success": true, "data": { ... }, "message": "Login successful" }
//! { "success": false, "error": "Invalid email or password" }
//! ```

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            error: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Overrides the success flag, for bodies that report partial outcomes.
    pub fn with_success(mut self, success: bool) -> Self {
        self.success = success;
        self
    }
}

impl ApiResponse<()> {
    /// A successful response with only a message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            message: Some(message.into()),
            error: None,
        }
    }
}

/// Error body, used for API documentation.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}
