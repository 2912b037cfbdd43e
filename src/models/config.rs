use crate::assets::AssetLoader;
use crate::models::DesignConfig;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Application configuration loaded from config.yaml
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub profile: ProfileConfig,

    #[serde(default)]
    pub avatar: AvatarConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub http: HttpConfig,

    #[serde(default)]
    pub server: ServerConfig,

    /// Recompress output PNGs with oxipng
    #[serde(default = "default_optimize_png")]
    pub optimize_png: bool,

    /// Design definitions, keyed by the name used in request paths
    #[serde(default)]
    pub designs: BTreeMap<String, DesignConfig>,
}

fn default_optimize_png() -> bool {
    true
}

/// Profile directory lookup
#[derive(Debug, Deserialize, Clone)]
pub struct ProfileConfig {
    /// Search endpoint; queried as `{url}?fid={fid}`
    #[serde(default = "default_profile_url")]
    pub url: String,
}

fn default_profile_url() -> String {
    "https://searchcaster.xyz/api/profiles".to_string()
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            url: default_profile_url(),
        }
    }
}

/// Avatar download through the image-resizing proxy
#[derive(Debug, Deserialize, Clone)]
pub struct AvatarConfig {
    /// Proxy URL template. `{url}` is replaced by the percent-encoded avatar
    /// URL and `{size}` by `size`.
    #[serde(default = "default_proxy_url")]
    pub proxy_url: String,

    /// Edge length requested from the proxy
    #[serde(default = "default_avatar_size")]
    pub size: u32,
}

fn default_proxy_url() -> String {
    "https://wsrv.nl/?url={url}&w={size}&h={size}&fit=cover&output=png".to_string()
}

fn default_avatar_size() -> u32 {
    256
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            proxy_url: default_proxy_url(),
            size: default_avatar_size(),
        }
    }
}

/// Retry policy for the avatar download
#[derive(Debug, Deserialize, Clone)]
pub struct RetryConfig {
    #[serde(default = "default_attempts")]
    pub attempts: u32,

    #[serde(default = "default_initial_delay_ms")]
    pub initial_delay_ms: u64,
}

fn default_attempts() -> u32 {
    3
}

fn default_initial_delay_ms() -> u64 {
    300
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            attempts: default_attempts(),
            initial_delay_ms: default_initial_delay_ms(),
        }
    }
}

/// Outbound HTTP client settings
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_user_agent() -> String {
    format!("pfpaint/{}", env!("CARGO_PKG_VERSION"))
}

impl HttpConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

/// Response settings
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// `Cache-Control: max-age` for generated images, in seconds
    #[serde(default = "default_cache_max_age")]
    pub cache_max_age: u32,
}

fn default_cache_max_age() -> u32 {
    3600
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            cache_max_age: default_cache_max_age(),
        }
    }
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    ///
    /// Unparseable config falls back to the embedded defaults; designs that
    /// fail validation are dropped with a warning.
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        let mut config = match loader.read_config_string() {
            Ok(content) => match serde_yaml::from_str::<Self>(&content) {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        };

        config.drop_invalid_designs();
        tracing::info!(designs = config.designs.len(), "Loaded configuration");
        config
    }

    fn drop_invalid_designs(&mut self) {
        self.designs.retain(|name, design| match design.validate() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(design = %name, error = %e, "Ignoring invalid design");
                false
            }
        });
    }

    pub fn get_design(&self, name: &str) -> Option<&DesignConfig> {
        self.designs.get(name)
    }
}

impl Default for AppConfig {
    /// The embedded config.yaml, or an empty design set if that is unusable
    fn default() -> Self {
        AssetLoader::embedded_config_string()
            .and_then(|s| serde_yaml::from_str(&s).ok())
            .unwrap_or_else(|| Self {
                profile: ProfileConfig::default(),
                avatar: AvatarConfig::default(),
                retry: RetryConfig::default(),
                http: HttpConfig::default(),
                server: ServerConfig::default(),
                optimize_png: default_optimize_png(),
                designs: BTreeMap::new(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_has_designs() {
        let config = AppConfig::default();
        assert!(!config.designs.is_empty());
        assert!(config.get_design("mosaic").is_some());
    }

    #[test]
    fn test_embedded_designs_are_valid() {
        let config = AppConfig::default();
        for (name, design) in &config.designs {
            assert!(design.validate().is_ok(), "design {name} is invalid");
        }
    }

    #[test]
    fn test_section_defaults() {
        let config: AppConfig = serde_yaml::from_str("designs: {}").unwrap();
        assert_eq!(config.retry.attempts, 3);
        assert_eq!(config.retry.initial_delay_ms, 300);
        assert_eq!(config.avatar.size, 256);
        assert_eq!(config.http.timeout_secs, 10);
        assert_eq!(config.server.cache_max_age, 3600);
        assert!(config.optimize_png);
        assert!(config.profile.url.starts_with("https://"));
        assert!(config.avatar.proxy_url.contains("{url}"));
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r##"
profile:
  url: http://localhost:9000/profiles
avatar:
  proxy_url: "http://localhost:9001/img?src={url}&s={size}"
  size: 64
retry:
  attempts: 5
  initial_delay_ms: 10
designs:
  tiny:
    template: tiny.svg
    grid: [2, 2]
    slots:
      top: [1, 0]
    defaults:
      top: "#ffffff"
"##;
        let config: AppConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.profile.url, "http://localhost:9000/profiles");
        assert_eq!(config.avatar.size, 64);
        assert_eq!(config.retry.attempts, 5);
        let tiny = config.get_design("tiny").unwrap();
        assert_eq!(tiny.slots["top"], [1, 0]);
    }

    #[test]
    fn test_invalid_designs_are_dropped() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(
            &path,
            "designs:\n  good:\n    template: a.svg\n    grid: [2, 2]\n  bad:\n    template: b.svg\n    grid: [0, 0]\n",
        )
        .unwrap();

        let loader = AssetLoader::new(None, Some(path));
        let config = AppConfig::load_from_assets(&loader);
        assert!(config.get_design("good").is_some());
        assert!(config.get_design("bad").is_none());
    }

    #[test]
    fn test_unparseable_config_uses_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.yaml");
        std::fs::write(&path, "designs: [not, a, map").unwrap();

        let loader = AssetLoader::new(None, Some(path));
        let config = AppConfig::load_from_assets(&loader);
        assert!(config.get_design("mosaic").is_some());
    }
}
