//! Order relay handlers.
//!
//! Each handler acquires a fresh PayPal access token, forwards one call and
//! relays the provider's body unchanged.

use axum::{
    extract::{Path, State},
    http::StatusCode,
};

use crate::{error::RelayError, services::paypal::RelayedBody, startup::AppState};

/// Create the fixed single-item order. Any request body is ignored.
pub async fn create_order(
    State(state): State<AppState>,
) -> Result<(StatusCode, RelayedBody), RelayError> {
    tracing::info!("Creating PayPal order");

    let token = state
        .paypal
        .acquire_token()
        .await
        .map_err(RelayError::CreateOrder)?;

    let order = state
        .paypal
        .create_order(&token)
        .await
        .map_err(RelayError::CreateOrder)?;

    tracing::info!("PayPal order created");

    Ok((StatusCode::CREATED, order))
}

/// Capture an approved order.
pub async fn capture_order(
    State(state): State<AppState>,
    Path(order_id): Path<String>,
) -> Result<RelayedBody, RelayError> {
    tracing::info!(order_id = %order_id, "Capturing PayPal order");

    let token = state
        .paypal
        .acquire_token()
        .await
        .map_err(RelayError::CaptureOrder)?;

    let capture = state
        .paypal
        .capture_order(&token, &order_id)
        .await
        .map_err(RelayError::CaptureOrder)?;

    tracing::info!(order_id = %order_id, "PayPal order captured");

    Ok(capture)
}

/// Refund a captured payment.
pub async fn refund_capture(
    State(state): State<AppState>,
    Path(capture_id): Path<String>,
) -> Result<RelayedBody, RelayError> {
    tracing::info!(capture_id = %capture_id, "Refunding PayPal capture");

    let token = state
        .paypal
        .acquire_token()
        .await
        .map_err(RelayError::Refund)?;

    let refund = state
        .paypal
        .refund_capture(&token, &capture_id)
        .await
        .map_err(RelayError::Refund)?;

    tracing::info!(capture_id = %capture_id, "PayPal capture refunded");

    Ok(refund)
}
