use secrecy::Secret;
use serde::Deserialize;
use service_core::error::AppError;

pub const SANDBOX_API_BASE_URL: &str = "https://api-m.sandbox.paypal.com";

#[derive(Clone, Debug)]
pub struct Config {
    pub server: ServerConfig,
    pub paypal: PayPalConfig,
    pub service_name: String,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Clone, Debug)]
pub struct PayPalConfig {
    pub client_id: String,
    pub client_secret: Secret<String>,
    pub api_base_url: String,
}

/// Flat view of the process environment, one field per variable.
#[derive(Deserialize, Debug)]
pub struct Settings {
    pub paypal_client_id: String,
    pub paypal_client_secret: Secret<String>,
    #[serde(default = "default_api_base_url")]
    pub paypal_api_base_url: String,
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
}

fn default_api_base_url() -> String {
    SANDBOX_API_BASE_URL.to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info,paypal_relay=debug".to_string()
}

impl Config {
    /// Load configuration from `.env` and the process environment.
    ///
    /// `PAYPAL_CLIENT_ID` and `PAYPAL_CLIENT_SECRET` are required.
    pub fn from_env() -> Result<Self, AppError> {
        let settings: Settings = service_core::config::load()?;
        Ok(Self::from(settings))
    }
}

impl From<Settings> for Config {
    fn from(settings: Settings) -> Self {
        Self {
            server: ServerConfig {
                host: settings.host,
                port: settings.port,
            },
            paypal: PayPalConfig {
                client_id: settings.paypal_client_id,
                client_secret: settings.paypal_client_secret,
                api_base_url: settings.paypal_api_base_url.trim_end_matches('/').to_string(),
            },
            service_name: "paypal-relay".to_string(),
            log_level: settings.log_level,
            otlp_endpoint: settings.otlp_endpoint.filter(|e| !e.is_empty()),
        }
    }
}
