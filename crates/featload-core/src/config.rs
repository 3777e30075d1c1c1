use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Retry policy parameters (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Maximum number of attempts per GET (including the first).
    pub max_attempts: u32,
    /// Base delay in seconds for exponential backoff (e.g. 0.25 = 250ms).
    pub base_delay_secs: f64,
    /// Maximum backoff delay in seconds.
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay_secs: 0.25,
            max_delay_secs: 5,
        }
    }
}

/// Navbar button discovery settings (optional section in config.toml).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavbarConfig {
    /// Comma-separated feature order for the primary bar.
    #[serde(default)]
    pub order: String,
    /// Feature (or tab id) to activate first when nothing is active yet.
    #[serde(default)]
    pub home: Option<String>,
    /// Extension point that lists button descriptors.
    #[serde(default = "default_descriptor_path")]
    pub descriptor_path: String,
}

fn default_descriptor_path() -> String {
    "/mtwilson-core-html5/navbar/main.json".to_string()
}

impl Default for NavbarConfig {
    fn default() -> Self {
        Self {
            order: String::new(),
            home: None,
            descriptor_path: default_descriptor_path(),
        }
    }
}

/// Global configuration loaded from `~/.config/featload/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatloadConfig {
    /// Base URL that relative resource URLs are resolved against.
    pub base_url: String,
    /// Directory service endpoint; download hrefs are appended to it.
    pub endpoint: String,
    /// Delay between completion rechecks of a pending load request.
    pub poll_interval_ms: u64,
    /// Transport connect timeout.
    pub connect_timeout_secs: u64,
    /// Transport whole-request timeout.
    pub request_timeout_secs: u64,
    /// Optional retry policy; if missing, built-in defaults are used.
    #[serde(default)]
    pub retry: Option<RetryConfig>,
    #[serde(default)]
    pub navbar: Option<NavbarConfig>,
}

impl Default for FeatloadConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8443/".to_string(),
            endpoint: "http://127.0.0.1:8443/v1".to_string(),
            poll_interval_ms: 1000,
            connect_timeout_secs: 15,
            request_timeout_secs: 60,
            retry: None,
            navbar: None,
        }
    }
}

/// Polls faster than this would amount to spinning on the registry lock.
pub(crate) const MIN_POLL_INTERVAL_MS: u64 = 10;

impl FeatloadConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.max(MIN_POLL_INTERVAL_MS))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn navbar(&self) -> NavbarConfig {
        self.navbar.clone().unwrap_or_default()
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("featload")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<FeatloadConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = FeatloadConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load configuration from an explicit file.
pub fn load_from(path: &Path) -> Result<FeatloadConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("read config {}", path.display()))?;
    let cfg: FeatloadConfig =
        toml::from_str(&data).with_context(|| format!("parse config {}", path.display()))?;
    Ok(cfg)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let cfg = FeatloadConfig::default();
        assert_eq!(cfg.poll_interval(), Duration::from_secs(1));
        assert_eq!(cfg.connect_timeout_secs, 15);
        assert!(cfg.retry.is_none());
        assert_eq!(
            cfg.navbar().descriptor_path,
            "/mtwilson-core-html5/navbar/main.json"
        );
    }

    #[test]
    fn poll_interval_is_clamped() {
        let cfg = FeatloadConfig {
            poll_interval_ms: 0,
            ..FeatloadConfig::default()
        };
        assert_eq!(cfg.poll_interval(), Duration::from_millis(10));
    }

    #[test]
    fn config_toml_custom_values() {
        let toml = r#"
            base_url = "https://kms.example.com/"
            endpoint = "https://kms.example.com/v1"
            poll_interval_ms = 250
            connect_timeout_secs = 5
            request_timeout_secs = 20

            [retry]
            max_attempts = 2
            base_delay_secs = 0.5
            max_delay_secs = 3

            [navbar]
            order = "B, A ,C"
            home = "A"
        "#;
        let cfg: FeatloadConfig = toml::from_str(toml).unwrap();
        assert_eq!(cfg.endpoint, "https://kms.example.com/v1");
        assert_eq!(cfg.poll_interval(), Duration::from_millis(250));
        let retry = cfg.retry.as_ref().unwrap();
        assert_eq!(retry.max_attempts, 2);
        assert!((retry.base_delay_secs - 0.5).abs() < 1e-9);
        let navbar = cfg.navbar();
        assert_eq!(navbar.order, "B, A ,C");
        assert_eq!(navbar.home.as_deref(), Some("A"));
        assert_eq!(
            navbar.descriptor_path,
            "/mtwilson-core-html5/navbar/main.json"
        );
    }

    #[test]
    fn load_from_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = FeatloadConfig {
            poll_interval_ms: 40,
            ..FeatloadConfig::default()
        };
        fs::write(&path, toml::to_string_pretty(&cfg).unwrap()).unwrap();
        let loaded = load_from(&path).unwrap();
        assert_eq!(loaded.poll_interval_ms, 40);
        assert_eq!(loaded.base_url, cfg.base_url);
    }

    #[test]
    fn load_from_reports_path_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.toml");
        fs::write(&path, "base_url = ").unwrap();
        let err = load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("broken.toml"));
    }
}
