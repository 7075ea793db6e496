#![allow(dead_code)]

use chirpy::configuration::{AuthSettings, WebhookSettings};
use chirpy::startup::run;
use chirpy::store::InMemoryStore;
use serde_json::{json, Value};
use std::net::TcpListener;
use std::sync::Arc;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";
pub const PASSWORD: &str = "SecurePass123";

pub struct TestApp {
    pub address: String,
    pub client: reqwest::Client,
    pub auth_config: AuthSettings,
}

pub struct LoggedInUser {
    pub id: String,
    pub token: String,
    pub refresh_token: String,
}

pub fn spawn_app() -> TestApp {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let auth_config = AuthSettings::new(TEST_SECRET);
    let webhook_config = WebhookSettings {
        polka_key: POLKA_KEY.to_string(),
    };

    let server = run(
        listener,
        Arc::new(InMemoryStore::new()),
        auth_config.clone(),
        webhook_config,
        "./public".to_string(),
    )
    .expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        client: reqwest::Client::new(),
        auth_config,
    }
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_with_bearer(&self, path: &str, token: &str) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn register(&self, email: &str) -> Value {
        let response = self
            .post_json("/api/users", &json!({ "email": email, "password": PASSWORD }))
            .await;
        assert_eq!(201, response.status().as_u16());
        response.json().await.expect("Failed to parse response")
    }

    pub async fn login(&self, email: &str) -> LoggedInUser {
        let response = self
            .post_json("/api/login", &json!({ "email": email, "password": PASSWORD }))
            .await;
        assert_eq!(200, response.status().as_u16());
        let body: Value = response.json().await.expect("Failed to parse response");

        LoggedInUser {
            id: body["id"].as_str().unwrap().to_string(),
            token: body["token"].as_str().unwrap().to_string(),
            refresh_token: body["refresh_token"].as_str().unwrap().to_string(),
        }
    }

    pub async fn register_and_login(&self, email: &str) -> LoggedInUser {
        self.register(email).await;
        self.login(email).await
    }
}
