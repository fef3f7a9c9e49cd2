use super::mocks::RecordingProvider;
use axum::{
    Router,
    body::{Body, Bytes},
    http::{Request, Response, header},
};
use banana_studio::{
    config::{Config, LogsConfig, ProviderConfig, ServerConfig},
    generation::GenerationService,
    server::{self, handlers::AppState},
};
use serde_json::Value;
use std::{sync::Arc, time::Duration};

pub const BOUNDARY: &str = "----banana-test-boundary";

/// Create a test configuration with sensible defaults
pub fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 8000,
            logs: LogsConfig {
                level: "debug".to_string(),
            },
            static_dir: None,
            max_upload_bytes: 1024 * 1024,
        },
        provider: ProviderConfig {
            base_url: "http://localhost:1".to_string(),
            model: "gemini-test".to_string(),
            timeout_secs: 5,
        },
    }
}

/// Full router backed by `provider`
pub fn create_test_app(provider: RecordingProvider) -> Router {
    create_test_app_with_timeout(provider, Duration::from_secs(5))
}

pub fn create_test_app_with_timeout(provider: RecordingProvider, timeout: Duration) -> Router {
    let config = create_test_config();
    let service = GenerationService::new(Arc::new(provider), timeout);
    server::router(
        AppState {
            service: Arc::new(service),
        },
        &config.server,
    )
}

/// Hand-rolled multipart/form-data body
#[derive(Default)]
pub struct MultipartBody {
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, bytes: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(bytes);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn build(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.body
    }
}

pub fn multipart_request(uri: &str, body: MultipartBody) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body.build()))
        .unwrap()
}

pub fn json_request(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Bytes {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
