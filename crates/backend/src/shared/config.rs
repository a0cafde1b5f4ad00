use chrono_tz::Tz;
use once_cell::sync::OnceCell;
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub trendyol: TrendyolConfig,
    pub window: WindowConfig,
    pub catalog: CatalogConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// Trendyol seller API access
#[derive(Deserialize, Clone)]
pub struct TrendyolConfig {
    pub base_url: String,
    pub seller_id: String,
    pub api_key: String,
    pub api_secret: String,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// 0 keeps the fail-fast behaviour: the first failed page aborts the run
    #[serde(default)]
    pub max_retries: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
}

impl std::fmt::Debug for TrendyolConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrendyolConfig")
            .field("base_url", &self.base_url)
            .field("seller_id", &self.seller_id)
            .field("api_key", &"***")
            .field("api_secret", &"***")
            .field("page_size", &self.page_size)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("retry_base_delay_ms", &self.retry_base_delay_ms)
            .finish()
    }
}

impl TrendyolConfig {
    /// Credentials are only required once orders are actually requested
    pub fn ensure_credentials(&self) -> anyhow::Result<()> {
        if self.seller_id.trim().is_empty() {
            anyhow::bail!("Trendyol seller_id is not configured (TRENDYOL_SELLER_ID)");
        }
        if self.api_key.trim().is_empty() || self.api_secret.trim().is_empty() {
            anyhow::bail!(
                "Trendyol api_key/api_secret are not configured (TRENDYOL_API_KEY, TRENDYOL_API_SECRET)"
            );
        }
        Ok(())
    }
}

/// Date window settings of the range splitter
#[derive(Debug, Deserialize, Clone)]
pub struct WindowConfig {
    pub timezone: String,
    pub trailing_window_days: i64,
    pub chunk_days: i64,
}

impl WindowConfig {
    pub fn tz(&self) -> anyhow::Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("Invalid timezone '{}': {}", self.timezone, e))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CatalogConfig {
    /// Columnar (Parquet) cache
    pub cache_path: String,
    /// Spreadsheet the cache is built from when it does not exist yet
    pub legacy_path: String,
}

fn default_page_size() -> usize {
    200
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_retry_base_delay_ms() -> u64 {
    500
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[server]
host = "127.0.0.1"
port = 3000

[trendyol]
base_url = "https://apigw.trendyol.com"
seller_id = ""
api_key = ""
api_secret = ""
page_size = 200
request_timeout_secs = 30
max_retries = 0
retry_base_delay_ms = 500

[window]
timezone = "Europe/Istanbul"
trailing_window_days = 14
chunk_days = 14

[catalog]
cache_path = "urunler_ty.parquet"
legacy_path = "urunler_ty.xlsx"
"#;

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
///
/// Credentials can be overridden with TRENDYOL_SELLER_ID, TRENDYOL_API_KEY
/// and TRENDYOL_API_SECRET.
pub fn load_config() -> anyhow::Result<Config> {
    let mut config = read_config_file()?;
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    validate(&config)?;
    Ok(config)
}

fn read_config_file() -> anyhow::Result<Config> {
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

fn apply_env_overrides(config: &mut Config, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(v) = lookup("TRENDYOL_SELLER_ID") {
        config.trendyol.seller_id = v;
    }
    if let Some(v) = lookup("TRENDYOL_API_KEY") {
        config.trendyol.api_key = v;
    }
    if let Some(v) = lookup("TRENDYOL_API_SECRET") {
        config.trendyol.api_secret = v;
    }
}

fn validate(config: &Config) -> anyhow::Result<()> {
    config.window.tz()?;
    if config.window.trailing_window_days <= 0 || config.window.chunk_days <= 0 {
        anyhow::bail!("window.trailing_window_days and window.chunk_days must be positive");
    }
    if config.trendyol.page_size == 0 {
        anyhow::bail!("trendyol.page_size must be positive");
    }
    Ok(())
}

/// Store the configuration for the lifetime of the process
pub fn init_config(config: Config) -> anyhow::Result<()> {
    CONFIG
        .set(config)
        .map_err(|_| anyhow::anyhow!("Configuration is already initialized"))
}

pub fn get_config() -> anyhow::Result<&'static Config> {
    CONFIG
        .get()
        .ok_or_else(|| anyhow::anyhow!("Configuration is not initialized"))
}

/// Resolve a configured path: absolute paths as is, relative ones next to the executable
pub fn resolve_path(path_str: &str) -> PathBuf {
    let path = Path::new(path_str);

    if path.is_absolute() {
        return path.to_path_buf();
    }

    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            return exe_dir.join(path);
        }
    }

    PathBuf::from(path_str)
}
