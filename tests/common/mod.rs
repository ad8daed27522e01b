//! Common test utilities for E2E tests

use serde_json::Value;
use tempfile::TempDir;
use tidepool::{AppState, config};
use tokio::net::TcpListener;

/// Test server instance
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub _temp_dir: TempDir,
    pub client: reqwest::Client,
}

/// A registered account plus its bearer token
pub struct TestAccount {
    pub id: String,
    pub handle: String,
    pub token: String,
}

impl TestServer {
    /// Create a new test server instance
    pub async fn new() -> Self {
        Self::with_engagement(config::EngagementConfig {
            retract_like_notifications: true,
        })
        .await
    }

    /// Create a test server with a specific engagement policy
    pub async fn with_engagement(engagement: config::EngagementConfig) -> Self {
        // Create temporary directory for test database
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir.path().join("test.db");

        // Create test configuration
        let config = config::AppConfig {
            server: config::ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0, // Let OS assign port
            },
            database: config::DatabaseConfig {
                path: db_path.clone(),
            },
            engagement,
            logging: config::LoggingConfig::default(),
        };

        // Initialize app state
        let state = AppState::new(config).await.unwrap();

        // Create HTTP client
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{}", addr);

        // Build router
        let app = tidepool::build_router(state.clone());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait a bit for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Self {
            addr: addr_str,
            state,
            _temp_dir: temp_dir,
            client,
        }
    }

    /// Get base URL for API requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// Register an account through the API
    pub async fn register(&self, handle: &str) -> TestAccount {
        let response = self
            .client
            .post(self.url("/api/accounts"))
            .json(&serde_json::json!({ "handle": handle }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 201);

        let json: Value = response.json().await.unwrap();
        TestAccount {
            id: json["account"]["id"].as_str().unwrap().to_string(),
            handle: handle.to_string(),
            token: json["token"].as_str().unwrap().to_string(),
        }
    }

    /// POST with bearer auth and JSON body
    pub async fn post_json(
        &self,
        account: &TestAccount,
        path: &str,
        body: Value,
    ) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {}", account.token))
            .json(&body)
            .send()
            .await
            .unwrap()
    }

    /// POST with bearer auth and no body
    pub async fn post(&self, account: &TestAccount, path: &str) -> reqwest::Response {
        self.client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {}", account.token))
            .send()
            .await
            .unwrap()
    }

    /// GET with bearer auth
    pub async fn get(&self, account: &TestAccount, path: &str) -> reqwest::Response {
        self.client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {}", account.token))
            .send()
            .await
            .unwrap()
    }

    /// Create a post through the API, returning its ID
    pub async fn create_post(&self, account: &TestAccount, title: &str) -> String {
        let response = self
            .post_json(
                account,
                "/api/posts",
                serde_json::json!({ "title": title, "body": "Body text" }),
            )
            .await;
        assert_eq!(response.status(), 201);

        let json: Value = response.json().await.unwrap();
        json["id"].as_str().unwrap().to_string()
    }
}
