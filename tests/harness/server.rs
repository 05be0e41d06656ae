// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: Apache-2.0

//! Loopback server bootstrap.

use contact_form_api::{build_router, AppState, Config, Mailer};
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

pub const SENDER: &str = "sender@example.com";
pub const OPERATOR: &str = "ops@example.com";
pub const FRONTEND: &str = "https://portfolio.example.com";

/// Configuration for tests, with `overrides` applied on top of a working
/// mail setup.
pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    let mut env: HashMap<String, String> = [
        ("EMAIL_USER", SENDER),
        ("EMAIL_PASS", "abcdefghijklmnop"),
        ("WORK_EMAIL", OPERATOR),
        ("FRONTEND_URL", FRONTEND),
        ("SMTP_TLS", "none"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect();
    for (k, v) in overrides {
        env.insert(k.to_string(), v.to_string());
    }
    Config::from_lookup(|key| env.get(key).cloned()).expect("test config")
}

/// A running server plus the state behind it.
pub struct TestServer {
    pub base: String,
    pub client: reqwest::Client,
    pub state: Arc<AppState>,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    pub async fn post_contact(&self, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/contact"))
            .json(body)
            .send()
            .await
            .unwrap()
    }

    /// POST a contact body as if forwarded for `ip`.
    pub async fn post_contact_from(&self, ip: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/contact"))
            .header("x-forwarded-for", ip)
            .json(body)
            .send()
            .await
            .unwrap()
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.client.get(self.url(path)).send().await.unwrap()
    }
}

/// Start the router on `127.0.0.1:0`.
pub async fn spawn(config: Config, mailer: Arc<dyn Mailer>) -> TestServer {
    let state = Arc::new(AppState::new(config, mailer).unwrap());
    let app = build_router(state.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .await
        .unwrap();
    });

    TestServer {
        base: format!("http://{addr}"),
        client: reqwest::Client::new(),
        state,
    }
}
