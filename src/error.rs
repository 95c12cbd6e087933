//! Application error type and its HTTP mapping.
//!
//! Every failure a request can hit is one [`AppError`] variant. Each variant
//! carries a human-readable `message` that is sent to the client as plain text
//! and a JSON `details` value that is only logged.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Malformed request parameters.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// Unknown rate (or other missing record).
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// The global sale flag is off.
    #[error("{message}")]
    SaleClosed { message: String, details: Value },

    /// Inventory exhausted for a non-admin purchase.
    #[error("{message}")]
    SoldOut { message: String, details: Value },

    /// Payment provider error or timeout. Nothing was committed.
    #[error("{message}")]
    PaymentFailed { message: String, details: Value },

    /// The payment session exists but the click counter was not incremented.
    #[error("{message}")]
    InventoryUpdateFailed { message: String, details: Value },

    /// The payment session exists but the order row was not written.
    #[error("{message}")]
    OrderRecordFailed { message: String, details: Value },

    #[error("{message}")]
    Unauthorized { message: String, details: Value },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn sale_closed(details: Value) -> Self {
        Self::SaleClosed {
            message: "Ended".to_string(),
            details,
        }
    }

    pub fn sold_out(details: Value) -> Self {
        Self::SoldOut {
            message: "Sold out".to_string(),
            details,
        }
    }

    pub fn payment_failed(details: Value) -> Self {
        Self::PaymentFailed {
            message: "Problems with the payment provider".to_string(),
            details,
        }
    }

    pub fn inventory_update_failed(details: Value) -> Self {
        Self::InventoryUpdateFailed {
            message: "Problems with incrementing".to_string(),
            details,
        }
    }

    pub fn order_record_failed(details: Value) -> Self {
        Self::OrderRecordFailed {
            message: "Problems with recording the order".to_string(),
            details,
        }
    }

    pub fn unauthorized(message: impl Into<String>, details: Value) -> Self {
        Self::Unauthorized {
            message: message.into(),
            details,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Stable machine-readable code, also used as a metrics label.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "validation_error",
            AppError::NotFound { .. } => "not_found",
            AppError::SaleClosed { .. } => "sale_closed",
            AppError::SoldOut { .. } => "sold_out",
            AppError::PaymentFailed { .. } => "payment_failed",
            AppError::InventoryUpdateFailed { .. } => "inventory_update_failed",
            AppError::OrderRecordFailed { .. } => "order_record_failed",
            AppError::Unauthorized { .. } => "unauthorized",
            AppError::Internal { .. } => "internal_error",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::NotFound { .. } => StatusCode::BAD_REQUEST,
            AppError::SaleClosed { .. } => StatusCode::METHOD_NOT_ALLOWED,
            AppError::SoldOut { .. } => StatusCode::CONFLICT,
            AppError::PaymentFailed { .. } => StatusCode::BAD_GATEWAY,
            AppError::InventoryUpdateFailed { .. }
            | AppError::OrderRecordFailed { .. }
            | AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        }
    }

    pub fn details(&self) -> &Value {
        match self {
            AppError::Validation { details, .. }
            | AppError::NotFound { details, .. }
            | AppError::SaleClosed { details, .. }
            | AppError::SoldOut { details, .. }
            | AppError::PaymentFailed { details, .. }
            | AppError::InventoryUpdateFailed { details, .. }
            | AppError::OrderRecordFailed { details, .. }
            | AppError::Unauthorized { details, .. }
            | AppError::Internal { details, .. } => details,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let unauthorized = matches!(self, AppError::Unauthorized { .. });

        if status.is_server_error() {
            tracing::error!(code = self.code(), details = %self.details(), "{}", self);
        } else {
            tracing::debug!(code = self.code(), details = %self.details(), "{}", self);
        }

        let mut response = (status, self.to_string()).into_response();
        if unauthorized {
            response.headers_mut().insert(
                axum::http::header::WWW_AUTHENTICATE,
                axum::http::HeaderValue::from_static("Bearer"),
            );
        }
        response
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error() {
            if db.is_unique_violation() {
                return AppError::internal(
                    "Unique constraint violation",
                    json!({ "constraint": db.constraint() }),
                );
            }
            if db.is_check_violation() {
                return AppError::bad_request(
                    "Value violates a table constraint",
                    json!({ "constraint": db.constraint() }),
                );
            }
        }

        AppError::internal("Database error", json!({ "reason": e.to_string() }))
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::bad_request(
            "Invalid request body",
            json!({ "reason": e.body_text(), "status": e.status().as_u16() }),
        )
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = e.field_errors().keys().map(|k| k.to_string()).collect();
        fields.sort();
        AppError::bad_request(
            format!("Invalid request parameters: {}", fields.join(", ")),
            json!({ "errors": e.to_string() }),
        )
    }
}
