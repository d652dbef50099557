use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    /// Width of the query window, counted back from `now - delay_minutes`.
    #[serde(default = "default_window_minutes")]
    pub window_minutes: u32,
    /// Minutes subtracted from now to let CloudWatch datapoints settle.
    #[serde(default = "default_delay_minutes")]
    pub delay_minutes: u32,
    #[serde(default = "default_bucket_width_minutes")]
    pub bucket_width_minutes: u32,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            window_minutes: default_window_minutes(),
            delay_minutes: default_delay_minutes(),
            bucket_width_minutes: default_bucket_width_minutes(),
        }
    }
}

fn default_window_minutes() -> u32 {
    30
}

fn default_delay_minutes() -> u32 {
    2
}

fn default_bucket_width_minutes() -> u32 {
    10
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Client-side Cache-Control max-age for cacheable GET responses.
    #[serde(default = "default_max_age_secs")]
    pub max_age_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_age_secs: default_max_age_secs(),
        }
    }
}

fn default_max_age_secs() -> u64 {
    30
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    pub model_id: String,
    pub prompt_dir: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_max_tokens() -> u32 {
    200
}

impl AppConfig {
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.toml".into());
        let s = std::fs::read_to_string(&path)?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.server.port > 0,
            "server.port must be between 1 and 65535, got {}",
            self.server.port
        );
        anyhow::ensure!(
            self.metrics.window_minutes > 0,
            "metrics.window_minutes must be > 0, got {}",
            self.metrics.window_minutes
        );
        anyhow::ensure!(
            self.metrics.bucket_width_minutes > 0,
            "metrics.bucket_width_minutes must be > 0, got {}",
            self.metrics.bucket_width_minutes
        );
        anyhow::ensure!(
            (20..=60).contains(&self.cache.max_age_secs),
            "cache.max_age_secs must be between 20 and 60, got {}",
            self.cache.max_age_secs
        );
        anyhow::ensure!(
            !self.chat.model_id.is_empty(),
            "chat.model_id must be non-empty"
        );
        anyhow::ensure!(
            !self.chat.prompt_dir.is_empty(),
            "chat.prompt_dir must be non-empty"
        );
        anyhow::ensure!(
            self.chat.max_tokens > 0,
            "chat.max_tokens must be > 0, got {}",
            self.chat.max_tokens
        );
        Ok(())
    }
}
