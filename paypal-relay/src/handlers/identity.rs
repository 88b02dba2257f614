use axum::extract::State;

use crate::{error::RelayError, services::paypal::RelayedBody, startup::AppState};

/// Generate a client identity token for the PayPal JS SDK.
///
/// Uses Basic credentials directly rather than an OAuth access token.
pub async fn generate_token(
    State(state): State<AppState>,
) -> Result<RelayedBody, RelayError> {
    let token = state
        .paypal
        .generate_identity_token()
        .await
        .map_err(RelayError::GenerateToken)?;

    tracing::debug!("PayPal identity token generated");

    Ok(token)
}
