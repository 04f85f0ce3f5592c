use std::env;

use serde::{Deserialize, Serialize};

use self::gateway::GatewayConfig;
use self::storage::StorageConfig;
use self::ui::UiConfig;

pub mod gateway;
pub mod storage;
pub mod ui;

fn default_delta_time() -> u64 {
    100
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub gateway: GatewayConfig,
    pub storage: StorageConfig,
    pub ui: UiConfig,

    /// UI loop redraw throttle
    #[serde(default = "default_delta_time")]
    pub delta_time: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gateway: GatewayConfig::default(),
            storage: StorageConfig::default(),
            ui: UiConfig::default(),
            delta_time: default_delta_time(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default().with_env_overrides()
    }

    /// Apply environment overrides on top of loaded values
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(key) = env::var("LINGOPOP_API_KEY")
            .ok()
            .or_else(|| env::var("GEMINI_API_KEY").ok())
            .filter(|k| !k.trim().is_empty())
        {
            self.gateway.api_key = key;
        }

        if let Ok(url) = env::var("LINGOPOP_API_URL") {
            self.gateway.api_url = url;
        }

        if let Some(timeout) = env::var("REQUEST_TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.gateway.timeout_seconds = timeout;
        }

        if let Ok(dir) = env::var("LINGOPOP_DATA_DIR") {
            self.storage.data_dir = Some(dir);
        }

        if let Some(delta_time) = env::var("DELTA_TIME_MS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            self.delta_time = delta_time;
        }

        self
    }

    /// Update a single field by name, used by the `/key`-style commands
    pub fn update_field(&mut self, field: &str, value: &str) -> Result<(), String> {
        match field {
            "api_key" => self.gateway.api_key = value.trim().to_string(),
            "api_url" => self.gateway.api_url = value.trim().to_string(),
            "default_source_lang" => self.ui.default_source_lang = value.to_string(),
            "default_target_lang" => self.ui.default_target_lang = value.to_string(),
            "timeout_seconds" => {
                self.gateway.timeout_seconds = value
                    .parse()
                    .map_err(|_| format!("invalid number: {value}"))?
            }
            other => return Err(format!("unknown config field: {other}")),
        }
        Ok(())
    }
}
