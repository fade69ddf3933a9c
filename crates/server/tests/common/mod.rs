//! Common test utilities for E2E testing with mocks.
//!
//! This module provides a test fixture that creates an in-process server
//! backed by temporary staging and output directories and a mock pipeline,
//! so the full HTTP surface can be exercised without an external converter.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::{Body, Bytes};
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tempfile::TempDir;
use tower::ServiceExt;

use lectern_core::{testing::MockPipeline, Config, Lectern, Pipeline, StorageConfig};

const BOUNDARY: &str = "lectern-test-boundary";

/// Test fixture for E2E testing with a mock pipeline.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_upload() {
///     let fixture = TestFixture::new().await;
///
///     let response = fixture.upload("pdf", "book.pdf", b"%PDF-1.7").await;
///
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock pipeline - configure artifacts, failures and delays
    pub pipeline: Arc<MockPipeline>,
    /// Temporary directory holding staging and output
    pub temp_dir: TempDir,
    /// Configuration the router was built from
    pub config: Config,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

/// Response with the raw body kept, for downloads.
#[derive(Debug)]
pub struct RawResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl TestFixture {
    /// Create a new test fixture with default settings.
    pub async fn new() -> Self {
        Self::with_config(TestConfig::default()).await
    }

    /// Create a test fixture with custom configuration.
    pub async fn with_config(test_config: TestConfig) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");

        let mut config = Config::default();
        config.storage = StorageConfig::new(
            temp_dir.path().join("uploads"),
            temp_dir.path().join("output"),
        );
        if let Some(limit) = test_config.max_body_bytes {
            config.server.max_body_bytes = limit;
        }

        let pipeline = Arc::new(MockPipeline::new(&config.storage.output_root));
        let dyn_pipeline: Arc<dyn Pipeline> = Arc::clone(&pipeline) as Arc<dyn Pipeline>;
        let lectern = Lectern::from_config(&config, dyn_pipeline);

        let state = Arc::new(lectern_server::state::AppState::new(config.clone(), lectern));
        let router = lectern_server::api::create_router(state);

        Self {
            router,
            pipeline,
            temp_dir,
            config,
        }
    }

    /// Directory the pipeline writes audio into.
    pub fn audio_dir(&self) -> PathBuf {
        self.config.storage.audio_dir()
    }

    /// Path of the stats record.
    pub fn stats_path(&self) -> PathBuf {
        self.config.storage.stats_path()
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await.into_json()
    }

    /// Send a POST request with an empty body.
    pub async fn post(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await.into_json()
    }

    /// Send a GET request and keep the raw body.
    pub async fn get_raw(&self, path: &str) -> RawResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Upload a file in a multipart form field.
    pub async fn upload(&self, field: &str, filename: &str, content: &[u8]) -> TestResponse {
        self.post_multipart("/api/upload", multipart_body(field, filename, content))
            .await
    }

    /// Send a POST request with a prebuilt multipart body.
    pub async fn post_multipart(&self, path: &str, body: Vec<u8>) -> TestResponse {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            )
            .body(Body::from(body))
            .unwrap();
        self.send(request).await.into_json()
    }

    async fn send(&self, request: Request<Body>) -> RawResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        RawResponse {
            status,
            headers,
            body,
        }
    }
}

impl RawResponse {
    fn into_json(self) -> TestResponse {
        let body: Value = if self.body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&self.body).unwrap_or(Value::Null)
        };

        TestResponse {
            status: self.status,
            body,
        }
    }

    pub fn header(&self, name: header::HeaderName) -> &str {
        self.headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
    }
}

/// Build a multipart/form-data body with a single file field.
pub fn multipart_body(field: &str, filename: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, filename
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(content);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());
    body
}

/// Configuration for test fixture.
#[derive(Debug, Clone, Default)]
pub struct TestConfig {
    /// Override the request body limit
    pub max_body_bytes: Option<usize>,
}

impl TestConfig {
    /// Create config with a small body limit.
    pub fn with_body_limit(limit: usize) -> Self {
        Self {
            max_body_bytes: Some(limit),
        }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
