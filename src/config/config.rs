use anyhow::{Context, Result};
use config::{Config, File};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppCfg {
    pub http: HttpCfg,
    pub telegram: TelegramCfg,
    pub listing: ListingCfg,
    /// Admin-channel directory: capper slug -> outbound chat id.
    #[serde(default)]
    pub channels: HashMap<String, i64>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpCfg {
    #[serde(rename = "userAgent", default = "default_ua")]
    pub user_agent: String,
    #[serde(with = "humantime_serde", default = "default_timeout")]
    pub timeout: Duration,
    #[serde(rename = "poolIdleTimeout", with = "humantime_serde", default = "default_pool_idle")]
    pub pool_idle_timeout: Duration,
    #[serde(rename = "poolMaxIdlePerHost", default = "default_pool")]
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpCfg {
    fn default() -> Self {
        Self {
            user_agent: default_ua(),
            timeout: default_timeout(),
            pool_idle_timeout: default_pool_idle(),
            pool_max_idle_per_host: default_pool(),
        }
    }
}
fn default_ua() -> String {
    "tipcast/0.1".into()
}
fn default_timeout() -> Duration {
    Duration::from_secs(10)
}
fn default_pool_idle() -> Duration {
    Duration::from_secs(90)
}
fn default_pool() -> usize {
    8
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramCfg {
    #[serde(rename = "apiUrl", default = "default_tg_api")]
    pub api_url: String,
    /// Bot token; usually injected via the TELEGRAM__BOT_TOKEN env override.
    #[serde(rename = "botToken", default)]
    pub bot_token: String,
    /// Long-poll hold time for getUpdates.
    #[serde(rename = "pollTimeout", with = "humantime_serde", default = "default_poll_timeout")]
    pub poll_timeout: Duration,
}

impl Default for TelegramCfg {
    fn default() -> Self {
        Self {
            api_url: default_tg_api(),
            bot_token: String::new(),
            poll_timeout: default_poll_timeout(),
        }
    }
}
fn default_tg_api() -> String {
    "https://api.telegram.org".to_string()
}
fn default_poll_timeout() -> Duration {
    Duration::from_secs(25)
}

#[derive(Debug, Deserialize, Clone)]
pub struct ListingCfg {
    /// Root of the public tipster listing; bet pages live at
    /// `<baseUrl>/<capper>/bets`.
    #[serde(rename = "baseUrl")]
    pub base_url: String,
}

impl Default for ListingCfg {
    fn default() -> Self {
        Self {
            base_url: String::new(),
        }
    }
}

impl AppCfg {
    pub fn load(path: &str) -> Result<Self> {
        let cfg = Config::builder()
            .add_source(File::with_name(path))
            .add_source(config::Environment::default().separator("__"))
            .build()
            .context("building config")?;

        let app: AppCfg = cfg.try_deserialize().context("deserializing config")?;
        app.validate()?;
        Ok(app)
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(!self.listing.base_url.is_empty(), "listing.baseUrl missing");
        anyhow::ensure!(!self.telegram.api_url.is_empty(), "telegram.apiUrl missing");
        anyhow::ensure!(
            !self.telegram.bot_token.is_empty(),
            "telegram.botToken missing (set TELEGRAM__BOT_TOKEN)"
        );
        Ok(())
    }
}
