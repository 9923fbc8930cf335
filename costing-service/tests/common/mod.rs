#![allow(dead_code)]

use costing_service::config::{CorsConfig, CostingConfig, MongoConfig, PricingConfig};
use costing_service::services::CostingDb;
use costing_service::startup::Application;
use reqwest::{Client, Response};
use serde_json::{json, Value};
use service_core::config::Config as CoreConfig;
use uuid::Uuid;

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub db: CostingDb,
    pub db_name: String,
    pub client: Client,
}

pub fn mongo_tests_skipped() -> bool {
    if std::env::var("SKIP_MONGO_TESTS").is_ok() {
        eprintln!("Skipping test: SKIP_MONGO_TESTS is set");
        return true;
    }
    false
}

pub fn test_config(database: String) -> CostingConfig {
    CostingConfig {
        common: CoreConfig {
            port: 0, // Random port for testing
            ..CoreConfig::default()
        },
        mongodb: MongoConfig {
            uri: std::env::var("TEST_MONGODB_URI")
                .unwrap_or_else(|_| "mongodb://localhost:27017".to_string()),
            database,
        },
        pricing: PricingConfig {
            mismatch_tolerance: 1e-6,
        },
        cors: CorsConfig {
            allowed_origins: vec!["*".to_string()],
        },
    }
}

impl TestApp {
    pub async fn spawn() -> Self {
        let db_name = format!("costing_test_{}", Uuid::new_v4().simple());

        let app = Application::build(test_config(db_name.clone()))
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let db = app.db().clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

        // Wait for the server to answer its health endpoint
        let client = Client::new();
        let health_url = format!("{}/health", address);
        for _ in 0..50 {
            if client.get(&health_url).send().await.is_ok() {
                break;
            }
            tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
        }

        TestApp {
            address,
            port,
            db,
            db_name,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn post(&self, path: &str, body: &Value) -> Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn put(&self, path: &str, body: &Value) -> Response {
        self.client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete(&self, path: &str) -> Response {
        self.client
            .delete(self.url(path))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Create a client and return its id.
    pub async fn create_client(&self, suffix: &str) -> String {
        let response = self.post("/api/clients", &client_body(suffix)).await;
        assert_eq!(response.status().as_u16(), 201);
        let body: Value = response.json().await.expect("Failed to parse JSON");
        body["id"].as_str().expect("client id").to_string()
    }

    /// Create a system for `client_id` and return its id.
    pub async fn create_system(&self, client_id: &str) -> String {
        let response = self
            .post(
                &format!("/api/clients/{}/systems", client_id),
                &json!({
                    "systemSize": "10kW",
                    "systemType": "Hybrid",
                    "systemLocation": "Gulberg, Lahore"
                }),
            )
            .await;
        assert_eq!(response.status().as_u16(), 201);
        let body: Value = response.json().await.expect("Failed to parse JSON");
        body["id"].as_str().expect("system id").to_string()
    }

    /// Drop the throwaway database.
    pub async fn cleanup(&self) {
        let _ = self.db.client().database(&self.db_name).drop(None).await;
    }
}

pub fn client_body(suffix: &str) -> Value {
    json!({
        "name": format!("Client {}", suffix),
        "phoneNumber": format!("0300{}", suffix),
        "email": format!("client{}@example.com", suffix),
        "address": format!("{} Canal Road, Lahore", suffix)
    })
}

/// 10 × 550 W panels at 20/W, one 50000 inverter, 10% profit: final 176000.
pub fn specification() -> Value {
    json!({
        "wattsPerPanel": 550,
        "panelCount": 10,
        "ratePerWatt": 20,
        "inverters": [{ "quantity": 1, "unitPrice": 50000 }],
        "batteries": [],
        "cableDCPrice": 0, "cableACPrice": 0, "breakerDCPrice": 0, "breakerACPrice": 0,
        "breakerBatteryPrice": 0, "batteryCablePrice": 0, "luxBatteryPrice": 0,
        "changeOverPrice": 0, "dbPrice": 0, "accessoriesPrice": 0,
        "transportationPrice": 0, "netmeteringPrice": 0, "earthingPrice": 0,
        "loopersSPDPrice": 0,
        "service": { "mode": "total", "totalPrice": 0 },
        "frames": { "mode": "total", "totalPrice": 0 },
        "profitPercentage": 10,
        "profitAmount": 0,
        "selectedPriceType": "percentage"
    })
}
