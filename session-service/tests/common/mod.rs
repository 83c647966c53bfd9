use std::sync::Arc;
use std::time::Duration;

use secrecy::Secret;
use serde_json::Value;
use service_core::config::Config as CoreConfig;
use session_service::config::{HttpConfig, MongoConfig, SessionConfig, StoreBackend, StoreConfig};
use session_service::services::SessionStore;
use session_service::startup::Application;
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub store: Arc<dyn SessionStore>,
}

impl TestApp {
    /// Boot the service on a random port against the in-memory store.
    pub async fn spawn() -> Self {
        let config = SessionConfig {
            common: CoreConfig { port: 0 },
            mongodb: MongoConfig {
                uri: Secret::new("mongodb://localhost:27017".to_string()),
                database: format!("session_test_{}", Uuid::new_v4().simple()),
            },
            store: StoreConfig {
                backend: StoreBackend::Memory,
            },
            http: HttpConfig {
                max_body_bytes: 100 * 1024,
                request_timeout_secs: 5,
            },
        };

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");
        let address = format!("http://127.0.0.1:{}", app.port());
        let store = app.store();

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait until the server answers before handing it to the test.
        let client = reqwest::Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }

        TestApp { address, store }
    }

    /// POST a payload and return the assigned session id.
    pub async fn create_session(&self, client: &reqwest::Client, data: &Value) -> String {
        let response = client
            .post(format!("{}/api/sessions", self.address))
            .json(data)
            .send()
            .await
            .expect("Failed to execute request");
        assert!(
            response.status().is_success(),
            "create failed with {}",
            response.status()
        );

        let body: Value = response.json().await.expect("Failed to parse JSON");
        body["id"]
            .as_str()
            .expect("create response carried no id")
            .to_string()
    }
}
