// SPDX-FileCopyrightText: 2026 Caperone Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! `TestHarness` assembles the full HTTP stack over a temporary directory:
//! the real router, a real uploads directory, a contact store of the test's
//! choosing and a [`MockNotifier`]. Requests are driven through the router
//! in-process with `tower::ServiceExt::oneshot`.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    body::{to_bytes, Body, Bytes},
    http::{header, HeaderMap, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use caperone_core::{AssetStore, ContactStore};
use caperone_gateway::{build_router, AppState, ServerConfig};
use caperone_storage::{DiskAssetStore, JsonContactLog};

use crate::mock_notifier::MockNotifier;
use crate::mock_store::MockContactStore;

const BOUNDARY: &str = "caperone-test-boundary";

/// Which contact store backs the harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StoreKind {
    JsonFile,
    Memory,
    Failing,
}

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    store: StoreKind,
    recover_corrupt_log: bool,
    failing_notifier: bool,
    index_html: Option<String>,
    max_body_bytes: usize,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            store: StoreKind::JsonFile,
            recover_corrupt_log: false,
            failing_notifier: false,
            index_html: None,
            max_body_bytes: 10 * 1024 * 1024,
        }
    }

    /// Keep contacts in memory instead of `contacts.json`.
    pub fn with_memory_store(mut self) -> Self {
        self.store = StoreKind::Memory;
        self
    }

    /// Use a contact store whose appends always fail.
    pub fn with_failing_store(mut self) -> Self {
        self.store = StoreKind::Failing;
        self
    }

    /// Quarantine an unreadable `contacts.json` instead of failing appends.
    pub fn with_corrupt_log_recovery(mut self) -> Self {
        self.recover_corrupt_log = true;
        self
    }

    /// Use a notifier whose sends always fail.
    pub fn with_failing_notifier(mut self) -> Self {
        self.failing_notifier = true;
        self
    }

    /// Write `public/index.html` with the given content.
    pub fn with_index_html(mut self, html: impl Into<String>) -> Self {
        self.index_html = Some(html.into());
        self
    }

    /// Set the request body limit.
    pub fn with_max_body_bytes(mut self, bytes: usize) -> Self {
        self.max_body_bytes = bytes;
        self
    }

    /// Build the harness, creating the temporary directory layout.
    pub async fn build(self) -> std::io::Result<TestHarness> {
        let temp_dir = tempfile::TempDir::new()?;
        let root = temp_dir.path().to_path_buf();

        let public_dir = root.join("public");
        tokio::fs::create_dir_all(&public_dir).await?;
        if let Some(html) = &self.index_html {
            tokio::fs::write(public_dir.join("index.html"), html).await?;
        }

        let contacts_path = root.join("contacts.json");
        let contacts: Arc<dyn ContactStore> = match self.store {
            StoreKind::JsonFile => Arc::new(
                JsonContactLog::new(&contacts_path)
                    .with_corrupt_recovery(self.recover_corrupt_log),
            ),
            StoreKind::Memory => Arc::new(MockContactStore::new()),
            StoreKind::Failing => Arc::new(MockContactStore::failing()),
        };

        let uploads_dir = root.join("uploads");
        let assets = DiskAssetStore::new(&uploads_dir);
        assets
            .ensure_ready()
            .await
            .map_err(|e| std::io::Error::other(e.to_string()))?;

        let notifier = Arc::new(if self.failing_notifier {
            MockNotifier::failing()
        } else {
            MockNotifier::new()
        });

        let state = AppState {
            contacts: Arc::clone(&contacts),
            assets: Arc::new(assets),
            notifier: Arc::clone(&notifier) as Arc<dyn caperone_core::Notifier>,
        };
        let config = ServerConfig {
            host: "127.0.0.1".into(),
            port: 0,
            public_dir: public_dir.clone(),
            max_body_bytes: self.max_body_bytes,
        };

        Ok(TestHarness {
            router: build_router(&config, state),
            contacts,
            notifier,
            contacts_path,
            uploads_dir,
            public_dir,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete HTTP stack over a temporary directory.
pub struct TestHarness {
    router: Router,
    /// Contact store the router appends to.
    pub contacts: Arc<dyn ContactStore>,
    /// Captures notifications dispatched by the contact handler.
    pub notifier: Arc<MockNotifier>,
    contacts_path: PathBuf,
    uploads_dir: PathBuf,
    public_dir: PathBuf,
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Path of `contacts.json` (only written with the default store).
    pub fn contacts_path(&self) -> &Path {
        &self.contacts_path
    }

    pub fn uploads_dir(&self) -> &Path {
        &self.uploads_dir
    }

    pub fn public_dir(&self) -> &Path {
        &self.public_dir
    }

    /// Send an arbitrary request through the router.
    pub async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = match self.router.clone().oneshot(request).await {
            Ok(response) => response,
            Err(never) => match never {},
        };
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap_or_default();
        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(build(Method::GET, uri, None, Body::empty())).await
    }

    /// POST a JSON value.
    pub async fn post_json(&self, uri: &str, body: &Value) -> TestResponse {
        self.post_raw(uri, "application/json", body.to_string()).await
    }

    /// POST an arbitrary body with the given content type.
    pub async fn post_raw(
        &self,
        uri: &str,
        content_type: &str,
        body: impl Into<Body>,
    ) -> TestResponse {
        self.request(build(Method::POST, uri, Some(content_type), body.into()))
            .await
    }

    /// POST a multipart form holding one file part.
    pub async fn post_file(
        &self,
        uri: &str,
        field: &str,
        file_name: &str,
        bytes: &[u8],
    ) -> TestResponse {
        let body = multipart_body(&[Part::File {
            field,
            file_name,
            bytes,
        }]);
        self.post_multipart(uri, body).await
    }

    /// POST a prebuilt multipart body (see [`multipart_body`]).
    pub async fn post_multipart(&self, uri: &str, body: Vec<u8>) -> TestResponse {
        let content_type = format!("multipart/form-data; boundary={BOUNDARY}");
        self.post_raw(uri, &content_type, body).await
    }
}

fn build(method: Method, uri: &str, content_type: Option<&str>, body: Body) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(content_type) = content_type {
        builder = builder.header(header::CONTENT_TYPE, content_type);
    }
    match builder.body(body) {
        Ok(request) => request,
        Err(e) => panic!("invalid test request for {uri}: {e}"),
    }
}

/// One part of a multipart form.
pub enum Part<'a> {
    Text { field: &'a str, value: &'a str },
    File { field: &'a str, file_name: &'a str, bytes: &'a [u8] },
}

/// Encode `parts` as a `multipart/form-data` body using the harness boundary.
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text { field, value } => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{field}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                field,
                file_name,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

/// A fully buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestResponse {
    /// Parse the body as JSON, or `Value::Null` if it is not JSON.
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap_or(Value::Null)
    }

    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn harness_serves_health() {
        let harness = TestHarness::builder().build().await.unwrap();
        let response = harness.get("/api/health").await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.json()["ok"], true);
    }

    #[tokio::test]
    async fn harness_creates_layout() {
        let harness = TestHarness::builder()
            .with_index_html("<p>hi</p>")
            .build()
            .await
            .unwrap();
        assert!(harness.uploads_dir().is_dir());
        assert!(harness.public_dir().join("index.html").is_file());
        assert!(!harness.contacts_path().exists());
    }

    #[test]
    fn multipart_body_is_well_formed() {
        let body = multipart_body(&[
            Part::Text {
                field: "note",
                value: "hi",
            },
            Part::File {
                field: "photo",
                file_name: "a.jpg",
                bytes: b"xyz",
            },
        ]);
        let text = String::from_utf8(body).unwrap();
        assert!(text.starts_with("--caperone-test-boundary\r\n"));
        assert!(text.contains("name=\"photo\"; filename=\"a.jpg\""));
        assert!(text.ends_with("--caperone-test-boundary--\r\n"));
    }
}
