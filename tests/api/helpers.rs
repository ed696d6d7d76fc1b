use std::{collections::HashMap, sync::Arc};

use account_service::{
    Application,
    api::app_state::AppState,
    config::{AppConfig, AppEnv},
    persistence::in_memory_account_store::InMemoryAccountStore,
    postgres::PgConfig,
    service::auth::AuthConfig,
};
use serde_json::json;

pub struct TestApp {
    pub state: AppState,
    pub address: String,
    pub cookies: Arc<reqwest_cookie_store::CookieStoreRwLock>,
    pub client: reqwest::Client,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = AppConfig {
            env: AppEnv::Test,
            host: "127.0.0.1".to_string(),
            port: 0,
            db: PgConfig::default(),
            auth: AuthConfig::new(HashMap::from([(1_u64, "test_secret_key_1".to_string())])),
            admin: None,
        };

        let state = AppState::new(config, InMemoryAccountStore::default());

        let app = Application::build("127.0.0.1:0", state.clone())
            .await
            .expect("Failed to build app");

        let address = format!("http://{}", app.address.clone());

        // Run the service in a separate async task
        // to avoid blocking the main test thread.
        tokio::spawn(app.run());

        let cookies = Arc::new(reqwest_cookie_store::CookieStoreRwLock::default());

        let client = reqwest::Client::builder()
            .cookie_provider(cookies.clone())
            .build()
            .expect("Failed to build http client");

        Self {
            state,
            address,
            cookies,
            client,
        }
    }

    pub fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{}", &self.address, path))
    }

    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(reqwest::Method::GET, path)
    }

    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(reqwest::Method::POST, path)
    }

    pub fn patch(&self, path: &str) -> reqwest::RequestBuilder {
        self.request(reqwest::Method::PATCH, path)
    }

    pub async fn signup(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/signup")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .unwrap()
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/login")
            .json(&json!({ "email": email, "password": password }))
            .send()
            .await
            .unwrap()
    }
}
