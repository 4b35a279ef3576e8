use anyhow::{Context, Result};
use std::{env, path::PathBuf, sync::OnceLock};

use crate::endpoints::DeviceEndpoints;

static APP_CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Application configuration loaded and validated at startup
#[derive(Clone, Debug)]
pub struct AppConfig {
    /// UI server configuration
    pub ui: UiConfig,

    /// Device the UI connects to
    pub device: DeviceConfig,

    /// Path configuration
    pub paths: PathConfig,
}

#[derive(Clone, Debug)]
pub struct UiConfig {
    pub port: u16,
}

#[derive(Clone, Debug)]
pub struct DeviceConfig {
    pub endpoints: DeviceEndpoints,
}

#[derive(Clone, Debug)]
pub struct PathConfig {
    pub static_dir: PathBuf,
}

impl AppConfig {
    /// Load the configuration from the environment on first call and cache it
    pub fn init() -> Result<&'static Self> {
        if let Some(config) = APP_CONFIG.get() {
            return Ok(config);
        }

        let config = Self::load(|key| env::var(key).ok())?;
        Ok(APP_CONFIG.get_or_init(|| config))
    }

    /// Load the configuration from `lookup`, which returns the value of a variable if set
    pub fn load(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        Ok(Self {
            ui: UiConfig::load(&lookup)?,
            device: DeviceConfig::load(&lookup)?,
            paths: PathConfig::load(&lookup),
        })
    }
}

impl UiConfig {
    fn load(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = lookup("UI_PORT")
            .unwrap_or_else(|| "1977".to_string())
            .parse::<u16>()
            .context("failed to parse UI_PORT: invalid format")?;

        Ok(Self { port })
    }
}

impl DeviceConfig {
    fn load(lookup: &impl Fn(&str) -> Option<String>) -> Result<Self> {
        let url = lookup("DEVICE_URL").unwrap_or_else(|| "http://192.168.4.1".to_string());
        let endpoints = DeviceEndpoints::from_root(&url).context("failed to parse DEVICE_URL")?;

        Ok(Self { endpoints })
    }
}

impl PathConfig {
    fn load(lookup: &impl Fn(&str) -> Option<String>) -> Self {
        let static_dir = lookup("STATIC_DIR")
            .unwrap_or_else(|| "static".to_string())
            .into();

        Self { static_dir }
    }
}
