use std::sync::Arc;

use account_service::account::service::AccountService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::repositories::InMemoryUserStore;
use auth::AuthGate;
use auth::PasswordHasher;
use auth::TokenService;
use serde_json::json;
use serde_json::Value;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub token_service: Arc<TokenService>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let token_service = Arc::new(TokenService::new(JWT_SECRET, chrono::Duration::hours(1)));

        // Cheap work factor keeps the suite fast
        let password_hasher =
            Arc::new(PasswordHasher::with_params(1024, 1, 1).expect("Invalid Argon2 params"));

        let account_service = Arc::new(
            AccountService::new(
                Arc::new(InMemoryUserStore::new()),
                password_hasher,
                Arc::clone(&token_service),
            )
            .expect("Failed to create account service"),
        );

        let router = create_router(account_service, AuthGate::new(Arc::clone(&token_service)));

        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            token_service,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Register an account with fixed profile fields
    pub async fn signup(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/signup")
            .json(&json!({
                "email": email,
                "password": password,
                "name": "Alice",
                "birthDate": "1995-03-01",
                "gender": "female"
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/login")
            .json(&json!({
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in and return the access token
    pub async fn access_token(&self, email: &str, password: &str) -> String {
        let body: Value = self
            .login(email, password)
            .await
            .json()
            .await
            .expect("Failed to parse response");
        body["accessToken"]
            .as_str()
            .expect("Login did not return a token")
            .to_string()
    }
}
