use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::Context;
use serde::Deserialize;
use shared::{domain::Money, error::ConfigError};
use tracing::warn;
use url::Url;

use crate::controller::ControllerConfig;

pub const SETTINGS_FILE: &str = "signup.toml";
pub const REGISTER_PATH: &str = "api/register";

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub server_url: String,
    pub price_per_adult: Option<f64>,
    pub redirect_delay_ms: u64,
    pub success_path: String,
    pub cache_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: "http://127.0.0.1:5000".into(),
            price_per_adult: Some(28.50),
            redirect_delay_ms: 2000,
            success_path: "/success".into(),
            cache_path: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    server_url: Option<String>,
    price_per_adult: Option<f64>,
    redirect_delay_ms: Option<u64>,
    success_path: Option<String>,
    cache_path: Option<PathBuf>,
}

/// Defaults, then `signup.toml` in the working directory, then environment.
pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |name| std::env::var(name).ok())
}

pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    match read_file_settings(path) {
        Ok(Some(file_cfg)) => {
            if let Some(v) = file_cfg.server_url {
                settings.server_url = v;
            }
            if let Some(v) = file_cfg.price_per_adult {
                settings.price_per_adult = Some(v);
            }
            if let Some(v) = file_cfg.redirect_delay_ms {
                settings.redirect_delay_ms = v;
            }
            if let Some(v) = file_cfg.success_path {
                settings.success_path = v;
            }
            if let Some(v) = file_cfg.cache_path {
                settings.cache_path = Some(v);
            }
        }
        Ok(None) => {}
        Err(err) => warn!("ignoring settings file: {err:#}"),
    }

    if let Some(v) = env("APP__SERVER_URL") {
        settings.server_url = v;
    }

    for name in ["BBQ_PRICE_PER_ADULT", "APP__PRICE_PER_ADULT"] {
        if let Some(v) = env(name) {
            if let Some(price) = parse_price(name, &v) {
                settings.price_per_adult = price;
            }
        }
    }

    if let Some(v) = env("APP__REDIRECT_DELAY_MS") {
        match v.trim().parse::<u64>() {
            Ok(parsed) => settings.redirect_delay_ms = parsed,
            Err(err) => warn!(value = %v, "invalid APP__REDIRECT_DELAY_MS: {err}"),
        }
    }
    if let Some(v) = env("APP__SUCCESS_PATH") {
        settings.success_path = v;
    }
    if let Some(v) = env("APP__CACHE_PATH") {
        settings.cache_path = Some(PathBuf::from(v));
    }

    settings
}

fn read_file_settings(path: &Path) -> anyhow::Result<Option<FileSettings>> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read '{}'", path.display()))?;
    let parsed = toml::from_str(&raw)
        .with_context(|| format!("failed to parse '{}'", path.display()))?;
    Ok(Some(parsed))
}

/// `Some(None)` for an empty value, which explicitly unconfigures the price.
/// `None` when the value does not parse and the previous layer stays.
fn parse_price(name: &str, raw: &str) -> Option<Option<f64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(None);
    }
    match raw.parse::<f64>() {
        Ok(parsed) => Some(Some(parsed)),
        Err(err) => {
            warn!(value = raw, "ignoring invalid {name}: {err}");
            None
        }
    }
}

impl Settings {
    pub fn price_per_adult(&self) -> Result<Money, ConfigError> {
        let raw = self.price_per_adult.ok_or(ConfigError::PricePerAdultMissing)?;
        Money::from_decimal(raw).ok_or(ConfigError::InvalidPrice(raw))
    }

    pub fn server_base(&self) -> anyhow::Result<Url> {
        let mut raw = self.server_url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Url::parse(&raw).with_context(|| format!("invalid server url '{}'", self.server_url))
    }

    pub fn register_endpoint(&self) -> anyhow::Result<Url> {
        self.server_base()?
            .join(REGISTER_PATH)
            .context("failed to build register endpoint url")
    }

    pub fn success_url(&self) -> Option<String> {
        let path = self.success_path.trim();
        if path.is_empty() {
            return None;
        }
        match self.server_base().and_then(|base| Ok(base.join(path)?)) {
            Ok(url) => Some(url.to_string()),
            Err(err) => {
                warn!("no success destination available: {err:#}");
                None
            }
        }
    }

    pub fn controller_config(&self) -> ControllerConfig {
        let price_per_adult = match self.price_per_adult() {
            Ok(price) => Some(price),
            Err(ConfigError::PricePerAdultMissing) => None,
            Err(err) => {
                warn!("{err}");
                None
            }
        };
        ControllerConfig {
            price_per_adult,
            redirect_delay: Duration::from_millis(self.redirect_delay_ms),
            success_url: self.success_url(),
        }
    }
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
