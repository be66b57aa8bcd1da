#![allow(dead_code)]

use catalog_service::config::{CatalogConfig, PersistenceBackend};
use catalog_service::startup::Application;
use reqwest::{Client, Response};
use serde_json::{json, Value};
use service_core::auth::JwtService;
use uuid::Uuid;

/// Valid individual taxpayer numbers for fixtures.
pub const DOCUMENT_A: &str = "52998224725";
pub const DOCUMENT_B: &str = "11144477735";
/// Valid company registration number.
pub const COMPANY_DOCUMENT: &str = "11222333000181";

pub const ALL_PERMISSIONS: &[(&str, &str)] = &[
    ("Supplier", "Create,Update,Delete"),
    ("Product", "Create,Update,Delete"),
];

pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub storage_path: String,
    pub jwt: JwtService,
    pub client: Client,
}

impl TestApp {
    pub async fn spawn() -> Self {
        let storage_path = format!("target/test-storage-{}", Uuid::new_v4());

        let mut config = CatalogConfig::load().expect("Failed to load configuration");
        config.common.host = "127.0.0.1".to_string();
        config.common.port = 0; // Random port for testing
        config.persistence = PersistenceBackend::Memory;
        config.storage.local_path = storage_path.clone();

        let app = Application::build(config)
            .await
            .expect("Failed to build test application");

        let port = app.port();
        let jwt = (*app.state().jwt).clone();
        let address = format!("http://127.0.0.1:{}", port);

        tokio::spawn(async move {
            app.run_until_stopped().await.ok();
        });

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
            storage_path,
            jwt,
            client,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub fn token(&self, permissions: &[(&str, &str)]) -> String {
        self.jwt
            .generate_token("test-user", Some("tester@example.com"), permissions)
            .expect("Failed to issue token")
    }

    pub fn admin_token(&self) -> String {
        self.token(ALL_PERMISSIONS)
    }

    pub async fn get(&self, path: &str, token: &str) -> Response {
        self.client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_json(&self, path: &str, token: &str, body: &Value) -> Response {
        self.client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn put_json(&self, path: &str, token: &str, body: &Value) -> Response {
        self.client
            .put(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn delete(&self, path: &str, token: &str) -> Response {
        self.client
            .delete(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Create a supplier with full permissions and return its `data` object.
    pub async fn create_supplier(&self, name: &str, document: &str) -> Value {
        let response = self
            .post_json("/api/suppliers", &self.admin_token(), &supplier_body(name, document))
            .await;
        assert_eq!(response.status().as_u16(), 201, "supplier fixture rejected");
        let body: Value = response.json().await.expect("Failed to parse JSON");
        body["data"].clone()
    }

    /// Create a product for `supplier_id` with a base64 image.
    pub async fn create_product(&self, supplier_id: &str, name: &str) -> Value {
        let response = self
            .post_json(
                "/api/products",
                &self.admin_token(),
                &product_body(supplier_id, name, 19.9),
            )
            .await;
        assert_eq!(response.status().as_u16(), 201, "product fixture rejected");
        let body: Value = response.json().await.expect("Failed to parse JSON");
        body["data"].clone()
    }

    pub async fn stored_image_exists(&self, name: &str) -> bool {
        tokio::fs::try_exists(std::path::Path::new(&self.storage_path).join(name))
            .await
            .unwrap_or(false)
    }

    pub async fn cleanup(&self) {
        let _ = tokio::fs::remove_dir_all(&self.storage_path).await;
    }
}

pub fn supplier_body(name: &str, document: &str) -> Value {
    json!({
        "name": name,
        "document": document,
        "kind": "individual",
        "active": true,
        "address": {
            "street": "Main Street",
            "number": "100",
            "complement": "Suite 4",
            "postal_code": "01310100",
            "district": "Downtown",
            "city": "Springfield",
            "state": "SP"
        }
    })
}

pub fn product_body(supplier_id: &str, name: &str, price: f64) -> Value {
    json!({
        "supplier_id": supplier_id,
        "name": name,
        "description": "Sturdy and reliable",
        "image": "widget.png",
        // "png" in base64
        "image_upload": "cG5n",
        "price": price,
        "active": true
    })
}

pub async fn errors_of(response: Response) -> Vec<String> {
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["success"], false);
    body["errors"]
        .as_array()
        .expect("errors array")
        .iter()
        .map(|e| e.as_str().unwrap_or_default().to_string())
        .collect()
}
