//! Profile lookup and avatar download.
//!
//! The profile directory answers `GET {url}?fid={fid}` with a JSON array of
//! profile records; the avatar URL sits at `body.avatarUrl`. The avatar itself
//! is fetched through an image-resizing proxy so every design receives a
//! predictable, small, decodable image.

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::models::{AvatarConfig, Fid, HttpConfig};
use crate::services::retry::{retry_with_backoff, RetryPolicy, Retryable};

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limited by {url}")]
    RateLimited { url: String },

    #[error("Unexpected status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Malformed profile response: {0}")]
    InvalidProfile(#[from] serde_json::Error),
}

impl Retryable for FetchError {
    /// 429 and transport failures are retried; anything the server answered
    /// deliberately is not.
    fn is_retryable(&self) -> bool {
        matches!(self, FetchError::Http(_) | FetchError::RateLimited { .. })
    }
}

/// Build the shared outbound client
pub fn build_client(config: &HttpConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .timeout(config.timeout())
        .user_agent(config.user_agent.clone())
        .build()
}

/// Source of avatar URLs for a profile
#[async_trait]
pub trait ProfileDirectory: Send + Sync {
    /// Avatar URL for `fid`, `None` when the profile has none or does not exist
    async fn avatar_url(&self, fid: Fid) -> Result<Option<String>, FetchError>;
}

#[derive(Debug, Deserialize)]
struct ProfileRecord {
    #[serde(default)]
    body: Option<ProfileBody>,
}

#[derive(Debug, Deserialize)]
struct ProfileBody {
    #[serde(default, rename = "avatarUrl")]
    avatar_url: Option<String>,
}

/// Pick the first non-empty avatar URL from a profile search response
fn first_avatar_url(body: &[u8]) -> Result<Option<String>, FetchError> {
    let records: Vec<ProfileRecord> = serde_json::from_slice(body)?;
    Ok(records
        .into_iter()
        .filter_map(|r| r.body.and_then(|b| b.avatar_url))
        .find(|url| !url.trim().is_empty()))
}

/// Profile directory reached over HTTP
pub struct HttpProfileDirectory {
    client: reqwest::Client,
    url: String,
}

impl HttpProfileDirectory {
    pub fn new(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl ProfileDirectory for HttpProfileDirectory {
    async fn avatar_url(&self, fid: Fid) -> Result<Option<String>, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .query(&[("fid", fid.get())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let body = response.bytes().await?;
        let avatar = first_avatar_url(&body)?;
        tracing::debug!(fid = %fid, found = avatar.is_some(), "Profile lookup complete");
        Ok(avatar)
    }
}

/// Downloads avatars through the resizing proxy, with retry
pub struct AvatarFetcher {
    client: reqwest::Client,
    proxy_url: String,
    size: u32,
    retry: RetryPolicy,
}

impl AvatarFetcher {
    pub fn new(client: reqwest::Client, config: &AvatarConfig, retry: RetryPolicy) -> Self {
        Self {
            client,
            proxy_url: config.proxy_url.clone(),
            size: config.size,
            retry,
        }
    }

    /// Proxy URL for an avatar
    pub fn proxy_url_for(&self, avatar_url: &str) -> String {
        let encoded = utf8_percent_encode(avatar_url, NON_ALPHANUMERIC).to_string();
        self.proxy_url
            .replace("{size}", &self.size.to_string())
            .replace("{url}", &encoded)
    }

    /// Download avatar bytes
    pub async fn download(&self, avatar_url: &str) -> Result<Vec<u8>, FetchError> {
        let url = self.proxy_url_for(avatar_url);
        let bytes = retry_with_backoff(&self.retry, |attempt| self.fetch_once(&url, attempt)).await?;
        tracing::debug!(bytes = bytes.len(), "Avatar downloaded");
        Ok(bytes)
    }

    async fn fetch_once(&self, url: &str, attempt: u32) -> Result<Vec<u8>, FetchError> {
        tracing::debug!(attempt, url = %url, "Downloading avatar");
        let response = self.client.get(url).send().await?;
        match response.status() {
            StatusCode::TOO_MANY_REQUESTS => Err(FetchError::RateLimited {
                url: url.to_string(),
            }),
            s if !s.is_success() => Err(FetchError::Status {
                status: s.as_u16(),
                url: url.to_string(),
            }),
            _ => Ok(response.bytes().await?.to_vec()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fetcher(proxy_url: &str) -> AvatarFetcher {
        let config = AvatarConfig {
            proxy_url: proxy_url.to_string(),
            size: 128,
        };
        AvatarFetcher::new(reqwest::Client::new(), &config, RetryPolicy::default())
    }

    #[test]
    fn proxy_url_encodes_avatar_url() {
        let f = fetcher("https://proxy.test/?url={url}&w={size}");
        assert_eq!(
            f.proxy_url_for("https://img.test/a b.png?x=1"),
            "https://proxy.test/?url=https%3A%2F%2Fimg%2Etest%2Fa%20b%2Epng%3Fx%3D1&w=128"
        );
    }

    #[test]
    fn first_avatar_url_skips_records_without_one() {
        let body = br#"[
            {"body": {"username": "nobody"}},
            {"body": {"avatarUrl": ""}},
            {"body": {"avatarUrl": "https://img.test/1.png"}},
            {"body": {"avatarUrl": "https://img.test/2.png"}}
        ]"#;
        assert_eq!(
            first_avatar_url(body).unwrap(),
            Some("https://img.test/1.png".to_string())
        );
    }

    #[test]
    fn empty_array_has_no_avatar() {
        assert_eq!(first_avatar_url(b"[]").unwrap(), None);
    }

    #[test]
    fn null_body_has_no_avatar() {
        assert_eq!(first_avatar_url(br#"[{"body": null}, {}]"#).unwrap(), None);
    }

    #[test]
    fn non_array_is_malformed() {
        assert!(matches!(
            first_avatar_url(br#"{"error": "nope"}"#),
            Err(FetchError::InvalidProfile(_))
        ));
    }

    #[test]
    fn retry_classification() {
        let limited = FetchError::RateLimited { url: "u".into() };
        let status = FetchError::Status {
            status: 500,
            url: "u".into(),
        };
        assert!(limited.is_retryable());
        assert!(!status.is_retryable());
    }
}
