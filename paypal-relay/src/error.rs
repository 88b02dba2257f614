//! Handler-level error envelopes.
//!
//! Every relay failure answers 500 with a fixed message per endpoint. Whether
//! the token exchange or the forwarded call failed is only visible in the logs.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::services::paypal::PayPalError;

#[derive(Debug, Error)]
pub enum RelayError {
    #[error("Error creating order")]
    CreateOrder(#[source] PayPalError),

    #[error("Error capturing order")]
    CaptureOrder(#[source] PayPalError),

    #[error("Error refunding order")]
    Refund(#[source] PayPalError),

    #[error("Error generating token")]
    GenerateToken(#[source] PayPalError),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl RelayError {
    fn source_error(&self) -> &PayPalError {
        match self {
            RelayError::CreateOrder(e)
            | RelayError::CaptureOrder(e)
            | RelayError::Refund(e)
            | RelayError::GenerateToken(e) => e,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let source = self.source_error();
        tracing::error!(error = %source, "{}", self);

        // Refunds pass the provider's error body through, or the failure message.
        let details = match &self {
            RelayError::Refund(e) => Some(
                e.details()
                    .cloned()
                    .unwrap_or_else(|| Value::String(e.to_string())),
            ),
            _ => None,
        };

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: self.to_string(),
                details,
            }),
        )
            .into_response()
    }
}
