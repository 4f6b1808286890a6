//! Shared helpers for server integration tests.
//!
//! `TestServer` builds the real router over a temporary database and
//! drives it in-process with `tower::ServiceExt::oneshot`; no socket is
//! bound. Accounts are seeded directly through the library so tests can
//! log in over HTTP.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use tempfile::TempDir;
use tower::ServiceExt;

use topsel::database::DatabaseConfig;
use topsel::directory::{create_account, AccountDetails, NewAccount};
use topsel::{Database, Identity, Role};
use topsel_server::{build_router, AppState};

/// Minimum bcrypt cost, to keep account seeding fast.
pub const TEST_BCRYPT_COST: u32 = 4;

/// An in-process server over a temporary database.
#[allow(dead_code)]
pub struct TestServer {
    _dir: TempDir,
    router: Router,
}

impl TestServer {
    /// Builds the server and seeds one teacher, one student and one
    /// admin account (usernames `t1`, `s1`, `root`, all password `pw`).
    #[allow(dead_code)]
    pub fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("topsel.db");

        let mut db = Database::open(DatabaseConfig::new(&path)).unwrap();
        let admin = Identity::new("bootstrap", Role::Admin);
        let accounts = [
            NewAccount::new("root", "pw", AccountDetails::Admin).unwrap(),
            NewAccount::new(
                "t1",
                "pw",
                AccountDetails::Teacher {
                    display_name: "Prof. Tang".to_string(),
                    email: "t1@example.edu".to_string(),
                    phone: "555-0100".to_string(),
                    office: "A-100".to_string(),
                },
            )
            .unwrap(),
            NewAccount::new(
                "s1",
                "pw",
                AccountDetails::Student {
                    display_name: "Shen Yi".to_string(),
                    major: "CS".to_string(),
                    class_name: "CS-1".to_string(),
                    email: "s1@example.edu".to_string(),
                    phone: "555-0200".to_string(),
                },
            )
            .unwrap(),
        ];
        for account in accounts {
            let account = account.with_bcrypt_cost(TEST_BCRYPT_COST);
            create_account(&mut db, &admin, &account).unwrap();
        }
        drop(db);

        let state = AppState::new(
            DatabaseConfig::new(&path),
            "test-secret",
            std::time::Duration::from_secs(3600),
            2,
        )
        .unwrap();
        Self {
            _dir: dir,
            router: build_router(state),
        }
    }

    /// Sends a request and returns the status and parsed JSON body.
    #[allow(dead_code)]
    pub async fn request(
        &self,
        method: &str,
        path: &str,
        token: Option<&str>,
        body: Option<serde_json::Value>,
    ) -> (StatusCode, serde_json::Value) {
        let mut builder = Request::builder().method(method).uri(path);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = if bytes.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
        };
        (status, json)
    }

    /// Logs in and returns the bearer token.
    #[allow(dead_code)]
    pub async fn login(&self, username: &str, password: &str) -> String {
        let (status, body) = self
            .request(
                "POST",
                "/api/v1/session/login",
                None,
                Some(serde_json::json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }
}
