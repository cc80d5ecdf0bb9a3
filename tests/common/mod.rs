//! Shared test infrastructure for integration tests.
//!
//! `Backend` wraps a `wiremock::MockServer` that answers canned JSON per
//! (method, path) and records every request; the CLI binary runs against it
//! on a blocking thread.
#![allow(dead_code)]

use serde_json::Value;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

#[derive(Debug, Clone)]
pub struct Route {
    pub method: &'static str,
    pub path: String,
    pub status: u16,
    pub body: Value,
}

pub fn route(method: &'static str, path: &str, status: u16, body: Value) -> Route {
    Route {
        method,
        path: path.to_string(),
        status,
        body,
    }
}

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub cookie: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("request body is JSON")
    }
}

impl From<&Request> for RecordedRequest {
    fn from(request: &Request) -> Self {
        Self {
            method: request.method.to_string(),
            path: request.url.path().to_string(),
            query: request.url.query().map(str::to_string),
            cookie: request
                .headers
                .get("cookie")
                .and_then(|value| value.to_str().ok())
                .map(str::to_string),
            body: String::from_utf8_lossy(&request.body).into_owned(),
        }
    }
}

pub struct Backend {
    server: MockServer,
}

impl Backend {
    pub async fn start(routes: Vec<Route>) -> Self {
        let server = MockServer::start().await;
        for route in routes {
            Mock::given(method(route.method))
                .and(path(route.path.as_str()))
                .respond_with(ResponseTemplate::new(route.status).set_body_json(route.body))
                .mount(&server)
                .await;
        }
        Self { server }
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    pub fn base_url(&self) -> String {
        format!("{}/api", self.server.uri())
    }

    pub async fn requests(&self) -> Vec<RecordedRequest> {
        self.server
            .received_requests()
            .await
            .expect("request recording is enabled")
            .iter()
            .map(RecordedRequest::from)
            .collect()
    }

    pub async fn posts(&self) -> Vec<RecordedRequest> {
        self.requests()
            .await
            .into_iter()
            .filter(|request| request.method == "POST")
            .collect()
    }

    pub async fn methods(&self) -> Vec<String> {
        self.requests()
            .await
            .into_iter()
            .map(|request| request.method)
            .collect()
    }
}

/// Write a logged-in session file for `base_url` with the given role.
pub fn write_session(dir: &Path, base_url: &str, role: &str) -> PathBuf {
    let path = dir.join("session.json");
    let session = serde_json::json!({
        "schema_version": 1,
        "base_url": base_url,
        "cookie": "sid=stub-session",
        "actor": {
            "id": format!("u-{role}"),
            "email": format!("{role}@lands.gov.ng"),
            "name": format!("Test {role}"),
            "role": role
        },
        "created_at_epoch_ms": 1_767_225_600_000u64
    });
    std::fs::write(&path, session.to_string()).expect("write session file");
    path
}

/// Run the CLI against `base_url` with an isolated session and config.
pub async fn run_cli(base_url: &str, dir: &Path, args: &[&str]) -> Output {
    run_cli_with_env(base_url, dir, args, &[]).await
}

pub async fn run_cli_with_env(
    base_url: &str,
    dir: &Path,
    args: &[&str],
    envs: &[(&str, &str)],
) -> Output {
    let base_url = base_url.to_string();
    let dir = dir.to_path_buf();
    let args: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
    let envs: Vec<(String, String)> = envs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();
    tokio::task::spawn_blocking(move || {
        let mut command = Command::new(env!("CARGO_BIN_EXE_cofo-review"));
        command
            .args(&args)
            .arg("--base-url")
            .arg(&base_url)
            .arg("--session")
            .arg(dir.join("session.json"))
            .arg("--config")
            .arg(dir.join("config.json"));
        for key in [
            "COFO_REVIEW_BASE_URL",
            "COFO_REVIEW_PASSWORD",
            "COFO_REVIEW_LOG",
            "HTTP_PROXY",
            "http_proxy",
            "HTTPS_PROXY",
            "https_proxy",
            "ALL_PROXY",
            "all_proxy",
        ] {
            command.env_remove(key);
        }
        command
            .envs(envs)
            .stdin(Stdio::null())
            .output()
            .expect("run cofo-review")
    })
    .await
    .expect("join cofo-review run")
}

pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}
