//! Test application factory for integration tests.

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use pfpaint::assets::AssetLoader;
use pfpaint::models::AppConfig;
use pfpaint::server::{build_router, create_app_state, create_app_state_with_config, AppState};

use super::mock_server::MockUpstream;

/// Test application wrapping the production router
pub struct TestApp {
    router: axum::Router,
    pub config: Arc<AppConfig>,
}

impl TestApp {
    /// Create a new test application using embedded assets and config
    pub fn new() -> Self {
        let asset_loader = Arc::new(AssetLoader::new(None, None));
        let state = create_app_state(asset_loader).expect("Failed to create app state");
        Self::from_state(state)
    }

    /// Embedded designs, with every outbound request pointed at `upstream`
    pub fn with_upstream(upstream: &MockUpstream) -> Self {
        Self::with_config(upstream.config(AppConfig::default()))
    }

    /// Embedded designs with a custom config
    pub fn with_config(config: AppConfig) -> Self {
        let asset_loader = Arc::new(AssetLoader::new(None, None));
        let state = create_app_state_with_config(asset_loader, Arc::new(config))
            .expect("Failed to create app state");
        Self::from_state(state)
    }

    fn from_state(state: AppState) -> Self {
        let config = state.config.clone();
        let router = build_router(state);
        Self { router, config }
    }

    /// Make a GET request to the given path
    pub async fn get(&self, path: &str) -> TestResponse {
        self.request(Request::get(path).body(Body::empty()).unwrap())
            .await
    }

    /// Make a GET request with custom headers
    pub async fn get_with_headers(&self, path: &str, headers: &[(&str, &str)]) -> TestResponse {
        let mut builder = Request::get(path);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.request(builder.body(Body::empty()).unwrap()).await
    }

    /// Make an OPTIONS request with custom headers
    pub async fn options(&self, path: &str, headers: &[(&str, &str)]) -> TestResponse {
        let mut builder = Request::options(path);
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        self.request(builder.body(Body::empty()).unwrap()).await
    }

    /// Send a request to the router
    async fn request(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Request failed");

        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes()
            .to_vec();

        TestResponse {
            status,
            headers,
            body,
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// Test response with convenience methods
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Vec<u8>,
}

impl TestResponse {
    /// Parse body as JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to parse JSON response")
    }

    /// Get body as string
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).to_string()
    }

    /// Get a header value as string
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Check if response is a PNG image
    pub fn is_png(&self) -> bool {
        self.body.len() >= 8 && &self.body[0..8] == b"\x89PNG\r\n\x1a\n"
    }

    /// Decode the PNG body
    pub fn image(&self) -> image::RgbaImage {
        image::load_from_memory(&self.body)
            .expect("Failed to decode PNG body")
            .to_rgba8()
    }
}
