//! Mock profile directory and image proxy.

use wiremock::{
    matchers::{any, method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

use pfpaint::models::AppConfig;

/// One wiremock server playing both upstream services
pub struct MockUpstream {
    pub server: MockServer,
}

impl MockUpstream {
    /// Start a new mock server
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Self { server }
    }

    /// Get URL for a specific path
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.server.uri(), path)
    }

    /// Point `config` at this server, with millisecond retry delays and no
    /// PNG recompression
    pub fn config(&self, mut config: AppConfig) -> AppConfig {
        config.profile.url = self.url_for("/profiles");
        config.avatar.proxy_url = format!("{}?url={{url}}&size={{size}}", self.url_for("/proxy"));
        config.retry.initial_delay_ms = 1;
        config.optimize_png = false;
        config
    }

    /// Profile lookup for `fid`, answered with the given avatar URL (or a
    /// profile without one)
    pub async fn mock_profile(&self, fid: u64, avatar_url: Option<&str>) {
        let body = match avatar_url {
            Some(url) => serde_json::json!([{ "body": { "username": "test", "avatarUrl": url } }]),
            None => serde_json::json!([{ "body": { "username": "test" } }]),
        };
        Mock::given(method("GET"))
            .and(path("/profiles"))
            .and(query_param("fid", fid.to_string()))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(body)
                    .insert_header("content-type", "application/json"),
            )
            .mount(&self.server)
            .await;
    }

    /// Image proxy returning `png` for every request
    pub async fn mock_avatar(&self, png: Vec<u8>) {
        Mock::given(method("GET"))
            .and(path("/proxy"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(png)
                    .insert_header("content-type", "image/png"),
            )
            .mount(&self.server)
            .await;
    }

    /// Image proxy failing with `status`, expected to be hit exactly `times`
    pub async fn mock_avatar_status(&self, status: u16, times: u64) {
        Mock::given(method("GET"))
            .and(path("/proxy"))
            .respond_with(ResponseTemplate::new(status).set_body_string("upstream says no"))
            .expect(times)
            .mount(&self.server)
            .await;
    }

    /// Fail the test if anything reaches the server
    pub async fn expect_no_requests(&self) {
        Mock::given(any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&self.server)
            .await;
    }
}
