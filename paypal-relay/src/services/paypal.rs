//! PayPal REST API client.
//!
//! Exchanges the configured client credentials for a bearer token and
//! forwards order, capture, refund and identity-token calls. Response bodies
//! are kept as the exact upstream text so they can be relayed untouched.

use crate::config::PayPalConfig;
use base64::{engine::general_purpose, Engine as _};
use metrics::counter;
use reqwest::{header, Client, RequestBuilder, StatusCode, Url};
use secrecy::ExposeSecret;
use serde::de::IgnoredAny;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Upstream JSON body, checked to be valid JSON and relayed byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayedBody(String);

impl RelayedBody {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

pub const ORDER_INTENT: &str = "CAPTURE";
pub const ORDER_CURRENCY: &str = "EUR";
pub const ORDER_VALUE: &str = "8.99";

/// PayPal client for the checkout relay.
#[derive(Clone)]
pub struct PayPalClient {
    client: Client,
    config: PayPalConfig,
}

/// Bearer token returned by the OAuth2 client-credentials exchange.
///
/// Never cached: each relay call acquires its own.
#[derive(Clone)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken([REDACTED])")
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Body of `POST /v2/checkout/orders`.
#[derive(Debug, Serialize)]
pub struct CreateOrderRequest {
    pub intent: &'static str,
    pub purchase_units: Vec<PurchaseUnit>,
}

#[derive(Debug, Serialize)]
pub struct PurchaseUnit {
    pub amount: Amount,
}

#[derive(Debug, Serialize)]
pub struct Amount {
    pub currency_code: &'static str,
    pub value: &'static str,
}

impl CreateOrderRequest {
    /// The single-item checkout this relay sells.
    pub fn fixed() -> Self {
        Self {
            intent: ORDER_INTENT,
            purchase_units: vec![PurchaseUnit {
                amount: Amount {
                    currency_code: ORDER_CURRENCY,
                    value: ORDER_VALUE,
                },
            }],
        }
    }
}

#[derive(Debug, Error)]
pub enum PayPalError {
    /// The OAuth2 token exchange failed.
    #[error("PayPal token request failed: {message}")]
    UpstreamAuth {
        status: Option<StatusCode>,
        message: String,
    },

    /// The forwarded call failed. `details` holds the provider's JSON error
    /// body when it sent one.
    #[error("PayPal {operation} failed: {message}")]
    UpstreamRelay {
        operation: &'static str,
        status: Option<StatusCode>,
        message: String,
        details: Option<Value>,
    },
}

impl PayPalError {
    pub fn details(&self) -> Option<&Value> {
        match self {
            PayPalError::UpstreamRelay { details, .. } => details.as_ref(),
            PayPalError::UpstreamAuth { .. } => None,
        }
    }

    fn auth(status: Option<StatusCode>, message: impl Into<String>) -> Self {
        PayPalError::UpstreamAuth {
            status,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, PayPalError>;

impl PayPalClient {
    /// Create a new PayPal client.
    pub fn new(config: PayPalConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Check if PayPal is configured (credentials are set).
    pub fn is_configured(&self) -> bool {
        !self.config.client_id.is_empty() && !self.config.client_secret.expose_secret().is_empty()
    }

    pub fn api_base_url(&self) -> &str {
        &self.config.api_base_url
    }

    /// Exchange the client credentials for a fresh bearer token.
    pub async fn acquire_token(&self) -> Result<AccessToken> {
        if !self.is_configured() {
            record_upstream("oauth2_token", "failure");
            return Err(PayPalError::auth(None, "PayPal credentials not configured"));
        }

        let url = self.endpoint(&["v1", "oauth2", "token"]).map_err(|message| {
            record_upstream("oauth2_token", "failure");
            PayPalError::auth(None, message)
        })?;

        let response = self
            .client
            .post(url)
            .basic_auth(
                &self.config.client_id,
                Some(self.config.client_secret.expose_secret()),
            )
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| {
                record_upstream("oauth2_token", "failure");
                PayPalError::auth(None, e.to_string())
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "PayPal oauth2 token response");

        if !status.is_success() {
            record_upstream("oauth2_token", "failure");
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "PayPal token request rejected");
            return Err(PayPalError::auth(
                Some(status),
                format!("token endpoint responded with {}", status),
            ));
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            record_upstream("oauth2_token", "failure");
            PayPalError::auth(Some(status), format!("invalid token response: {}", e))
        })?;

        record_upstream("oauth2_token", "success");
        Ok(AccessToken(token.access_token))
    }

    /// Create the fixed single-item order.
    pub async fn create_order(&self, token: &AccessToken) -> Result<RelayedBody> {
        self.relay("create_order", &["v2", "checkout", "orders"], |request| {
            request
                .bearer_auth(token.as_str())
                .json(&CreateOrderRequest::fixed())
        })
        .await
    }

    /// Capture an approved order.
    ///
    /// `order_id` is sent as a single, percent-encoded path segment.
    pub async fn capture_order(&self, token: &AccessToken, order_id: &str) -> Result<RelayedBody> {
        let order_id = path_segment("capture_order", order_id)?;

        self.relay(
            "capture_order",
            &["v2", "checkout", "orders", order_id, "capture"],
            |request| {
                request
                    .bearer_auth(token.as_str())
                    .json(&serde_json::json!({}))
            },
        )
        .await
    }

    /// Refund a captured payment in full.
    pub async fn refund_capture(
        &self,
        token: &AccessToken,
        capture_id: &str,
    ) -> Result<RelayedBody> {
        let capture_id = path_segment("refund_capture", capture_id)?;

        self.relay(
            "refund_capture",
            &["v2", "payments", "captures", capture_id, "refund"],
            |request| {
                request
                    .bearer_auth(token.as_str())
                    .json(&serde_json::json!({}))
            },
        )
        .await
    }

    /// Request a client identity token.
    ///
    /// Authenticates with Basic credentials directly instead of a bearer
    /// token from [`acquire_token`](Self::acquire_token).
    pub async fn generate_identity_token(&self) -> Result<RelayedBody> {
        let credentials = general_purpose::STANDARD.encode(format!(
            "{}:{}",
            self.config.client_id,
            self.config.client_secret.expose_secret()
        ));

        self.relay(
            "generate_identity_token",
            &["v1", "identity", "generate-token"],
            |request| {
                request
                    .header(header::AUTHORIZATION, format!("Basic {}", credentials))
                    .header(header::CONTENT_TYPE, "application/json")
            },
        )
        .await
    }

    /// Join `segments` onto the base URL. Each segment is percent-encoded,
    /// `/` and `?` included, so it cannot leave its position in the path.
    fn endpoint(&self, segments: &[&str]) -> std::result::Result<Url, String> {
        let mut url = Url::parse(&self.config.api_base_url)
            .map_err(|e| format!("invalid PayPal base URL: {}", e))?;

        url.path_segments_mut()
            .map_err(|_| "PayPal base URL cannot carry a path".to_string())?
            .pop_if_empty()
            .extend(segments);

        Ok(url)
    }

    async fn relay(
        &self,
        operation: &'static str,
        segments: &[&str],
        prepare: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<RelayedBody> {
        let failure = |status: Option<StatusCode>, message: String, details: Option<Value>| {
            record_upstream(operation, "failure");
            PayPalError::UpstreamRelay {
                operation,
                status,
                message,
                details,
            }
        };

        let url = self
            .endpoint(segments)
            .map_err(|message| failure(None, message, None))?;

        let response = prepare(self.client.post(url))
            .send()
            .await
            .map_err(|e| failure(None, e.to_string(), None))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| failure(Some(status), e.to_string(), None))?;

        tracing::debug!(operation, status = %status, body = %body, "PayPal response");

        if !status.is_success() {
            return Err(failure(
                Some(status),
                format!("PayPal responded with {}", status),
                serde_json::from_str::<Value>(&body).ok(),
            ));
        }

        serde_json::from_str::<IgnoredAny>(&body)
            .map_err(|e| failure(Some(status), format!("malformed response body: {}", e), None))?;

        record_upstream(operation, "success");
        Ok(RelayedBody(body))
    }
}

/// Reject ids the URL parser would treat as dot segments.
fn path_segment<'a>(operation: &'static str, id: &'a str) -> Result<&'a str> {
    if id.is_empty() || id == "." || id == ".." {
        record_upstream(operation, "failure");
        return Err(PayPalError::UpstreamRelay {
            operation,
            status: None,
            message: format!("invalid resource id {:?}", id),
            details: None,
        });
    }
    Ok(id)
}

fn record_upstream(operation: &'static str, outcome: &'static str) {
    counter!(
        "paypal_upstream_requests_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}
