use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub keywords: KeywordsConfig,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub export: ExportConfig,
}

/// Article source (MediaWiki Action API) configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Action API endpoint, e.g. `https://en.wikipedia.org/w/api.php`.
    #[serde(default = "default_api_endpoint")]
    pub api_endpoint: String,
    /// User-Agent sent with every request (API etiquette requirement).
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: usize,
    /// How many outgoing article links become related-topic nodes.
    #[serde(default = "default_related_limit")]
    pub related_limit: usize,
    /// LRU capacity for fetched articles; 0 disables caching.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
}

/// Keyword extraction configuration
#[derive(Debug, Clone, Deserialize)]
pub struct KeywordsConfig {
    #[serde(default = "default_min_token_len")]
    pub min_token_len: usize,
    #[serde(default = "default_max_keywords")]
    pub max_keywords: usize,
}

/// Force-layout configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LayoutConfig {
    #[serde(default = "default_viewport_width")]
    pub viewport_width: u32,
    #[serde(default = "default_viewport_height")]
    pub viewport_height: u32,
    /// Upper bound on simulation ticks before the layout is declared settled.
    #[serde(default = "default_cooldown_ticks")]
    pub cooldown_ticks: u32,
    /// Total per-tick node displacement below which the layout counts as
    /// stable.
    #[serde(default = "default_settle_epsilon")]
    pub settle_epsilon: f32,
}

/// PNG export configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ExportConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

fn default_api_endpoint() -> String {
    "https://en.wikipedia.org/w/api.php".to_string()
}

fn default_user_agent() -> String {
    format!("knowmap/{}", env!("CARGO_PKG_VERSION"))
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_max_retries() -> usize {
    3
}

fn default_related_limit() -> usize {
    6
}

fn default_cache_capacity() -> usize {
    100
}

fn default_min_token_len() -> usize {
    crate::keywords::DEFAULT_MIN_LEN
}

fn default_max_keywords() -> usize {
    crate::keywords::DEFAULT_MAX_KEYWORDS
}

fn default_viewport_width() -> u32 {
    1280
}

fn default_viewport_height() -> u32 {
    800
}

fn default_cooldown_ticks() -> u32 {
    600
}

fn default_settle_epsilon() -> f32 {
    0.5
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            api_endpoint: default_api_endpoint(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            max_retries: default_max_retries(),
            related_limit: default_related_limit(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl Default for KeywordsConfig {
    fn default() -> Self {
        Self {
            min_token_len: default_min_token_len(),
            max_keywords: default_max_keywords(),
        }
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            cooldown_ticks: default_cooldown_ticks(),
            settle_epsilon: default_settle_epsilon(),
        }
    }
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            keywords: KeywordsConfig::default(),
            layout: LayoutConfig::default(),
            export: ExportConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading
    /// config. Looks for the config file in this order:
    /// 1. Path specified in KNOWMAP_CONFIG environment variable
    /// 2. ./config.toml in current directory
    ///
    /// A missing file is not an error: every field has a default, so the
    /// built-in configuration is used instead.
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignore errors - file is optional)
        let _ = dotenv::dotenv();

        let config_path = std::env::var("KNOWMAP_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config.toml"));

        let config = if config_path.exists() {
            let config_str = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;
            toml::from_str(&config_str).context("Failed to parse config.toml")?
        } else {
            Config::default()
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        url::Url::parse(&self.source.api_endpoint)
            .with_context(|| format!("Invalid source.api_endpoint: {}", self.source.api_endpoint))?;

        if self.source.timeout_secs == 0 {
            anyhow::bail!("source.timeout_secs must be greater than 0");
        }

        if self.keywords.max_keywords == 0 {
            anyhow::bail!("keywords.max_keywords must be greater than 0");
        }

        if self.layout.viewport_width == 0 || self.layout.viewport_height == 0 {
            anyhow::bail!("layout viewport dimensions must be greater than 0");
        }

        if self.layout.settle_epsilon <= 0.0 {
            anyhow::bail!("layout.settle_epsilon must be greater than 0");
        }

        Ok(())
    }
}
