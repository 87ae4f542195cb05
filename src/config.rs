use anyhow::Context;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "tunedrop.toml";

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub http: HttpConfig,
    pub ai: AiConfig,
    pub catalog: CatalogConfig,
    pub downloads: DownloadsConfig,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Config> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let cfg: Config =
            toml::from_str(&contents).with_context(|| "Failed to parse config TOML")?;
        cfg.validate().with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(cfg)
    }

    /// Reject values that parse but can't be used
    pub fn validate(&self) -> anyhow::Result<()> {
        let max_increment = self.downloads.max_increment;
        if !max_increment.is_finite() || max_increment < 0.0 {
            anyhow::bail!(
                "downloads.max_increment must be a finite, non-negative number (got {})",
                max_increment
            );
        }
        Ok(())
    }

    /// Load `path`, or fall back to defaults when the default config file
    /// simply doesn't exist. An explicitly given missing file is an error.
    pub fn load_or_default(path: &Path) -> anyhow::Result<Config> {
        if path == Path::new(DEFAULT_CONFIG_PATH) && !path.exists() {
            log::info!("No {} found, using default settings", DEFAULT_CONFIG_PATH);
            return Ok(Config::default());
        }
        Self::load(path)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct HttpConfig {
    pub bind_addr: String,
    pub port: u16,
    /// Built presentation-layer assets to serve next to the API
    pub static_dir: Option<PathBuf>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".to_string(),
            port: 8384,
            static_dir: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AiConfig {
    pub api_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub timeout_secs: u64,
    pub api_key: Option<String>,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.anthropic.com/v1/messages".to_string(),
            model: "claude-sonnet-4-5-20250929".to_string(),
            max_tokens: 1024,
            timeout_secs: 30,
            api_key: None,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct CatalogConfig {
    /// JSON track list; the built-in demo catalog is used when unset
    pub path: Option<PathBuf>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DownloadsConfig {
    pub tick_ms: u64,
    pub max_increment: f64,
}

impl Default for DownloadsConfig {
    fn default() -> Self {
        Self {
            tick_ms: 1000,
            max_increment: 20.0,
        }
    }
}
