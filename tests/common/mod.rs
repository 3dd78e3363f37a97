#![allow(dead_code)]

use std::net::SocketAddr;
use std::str::FromStr;

use reqwest::multipart::{Form, Part};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tempfile::TempDir;

use withcare::config::Config;
use withcare::storage::ImageStore;

/// A running test server instance with its own database file and upload directory.
pub struct TestApp {
    pub addr: SocketAddr,
    pub pool: SqlitePool,
    pub client: Client,
    pub config: Config,
    _dir: TempDir,
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// POST /check-duplication with query parameters.
    pub async fn check(&self, target_id: &str, action_type: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url("/check-duplication"))
            .query(&[("target_id", target_id), ("action_type", action_type)])
            .send()
            .await
            .expect("check request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    /// POST /actions with all fields as multipart parts.
    pub async fn log_action(
        &self,
        target_id: &str,
        user_name: &str,
        action_type: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> (Value, StatusCode) {
        let form = Form::new()
            .text("target_id", target_id.to_string())
            .text("user_name", user_name.to_string())
            .text("action_type", action_type.to_string())
            .part(
                "file",
                Part::bytes(bytes.to_vec()).file_name(file_name.to_string()),
            );
        self.post_multipart("/actions", form).await
    }

    pub async fn post_multipart(&self, path: &str, form: Form) -> (Value, StatusCode) {
        let resp = self
            .client
            .post(self.url(path))
            .multipart(form)
            .send()
            .await
            .expect("multipart request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }

    pub async fn get(&self, path: &str) -> (Value, StatusCode) {
        let resp = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("get request failed");
        let status = resp.status();
        let body: Value = resp.json().await.unwrap_or(json!(null));
        (body, status)
    }
}

/// Fresh migrated database in a temp directory. Keep the `TempDir` alive for the pool's lifetime.
pub async fn test_pool() -> (SqlitePool, TempDir) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let db_path = dir.path().join("withcare_test.db");

    let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", db_path.display()))
        .expect("Invalid sqlite url")
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await
        .expect("Failed to open test database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations on test database");

    (pool, dir)
}

pub fn test_config(dir: &TempDir) -> Config {
    Config {
        database_url: format!("sqlite://{}", dir.path().join("withcare_test.db").display()),
        host: "127.0.0.1".parse().unwrap(),
        port: 0, // unused, we bind to random port
        public_base_url: None,
        trusted_proxies: vec![],
        upload_dir: dir.path().join("uploads"),
        max_upload_size: 1_048_576,
        duplicate_window: chrono::Duration::minutes(30),
        log_level: "warn".to_string(),
    }
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(|_| {}).await
}

/// Spawn a test app after letting the caller adjust the config.
pub async fn spawn_app_with(customize: impl FnOnce(&mut Config)) -> TestApp {
    let (pool, dir) = test_pool().await;

    let mut config = test_config(&dir);
    customize(&mut config);

    ImageStore::new(config.upload_dir.clone())
        .ensure_dir()
        .await
        .expect("Failed to create upload dir");

    let app = withcare::build_app(pool.clone(), config.clone());

    // Bind to random port
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind to random port");
    let addr = listener.local_addr().unwrap();

    // Spawn server in background
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .expect("Server failed");
    });

    TestApp {
        addr,
        pool,
        client: Client::new(),
        config,
        _dir: dir,
    }
}

pub async fn cleanup(app: TestApp) {
    app.pool.close().await;
}
