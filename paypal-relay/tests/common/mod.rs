use paypal_relay::config::{Config, PayPalConfig, ServerConfig};
use paypal_relay::startup::Application;
use secrecy::Secret;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_CLIENT_ID: &str = "test-client-id";
pub const TEST_CLIENT_SECRET: &str = "test-client-secret";
pub const TEST_ACCESS_TOKEN: &str = "A21AA-test-token";

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub paypal: MockServer,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the relay on a random port, pointed at a fresh PayPal mock.
    pub async fn spawn() -> Self {
        let paypal = MockServer::start().await;

        let config = Config {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Random port
            },
            paypal: PayPalConfig {
                client_id: TEST_CLIENT_ID.to_string(),
                client_secret: Secret::new(TEST_CLIENT_SECRET.to_string()),
                api_base_url: paypal.uri(),
            },
            service_name: "paypal-relay-test".to_string(),
            log_level: "debug".to_string(),
            otlp_endpoint: None,
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        TestApp {
            address,
            port,
            paypal,
            client: reqwest::Client::new(),
        }
    }

    /// Answer the OAuth2 token exchange with [`TEST_ACCESS_TOKEN`], expecting
    /// exactly `times` exchanges.
    pub async fn mock_token(&self, times: u64) {
        Mock::given(method("POST"))
            .and(path("/v1/oauth2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "scope": "https://uri.paypal.com/services/payments/payment",
                "access_token": TEST_ACCESS_TOKEN,
                "token_type": "Bearer",
                "app_id": "APP-80W284485P519543T",
                "expires_in": 31668
            })))
            .expect(times)
            .mount(&self.paypal)
            .await;
    }

    /// Make the OAuth2 token exchange fail.
    pub async fn mock_token_failure(&self) {
        Mock::given(method("POST"))
            .and(path("/v1/oauth2/token"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "error": "invalid_client",
                "error_description": "Client Authentication failed"
            })))
            .expect(1)
            .mount(&self.paypal)
            .await;
    }

    pub async fn post(&self, route: &str) -> reqwest::Response {
        self.client
            .post(format!("{}{}", self.address, route))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
