//! Service endpoints and transport settings.
//!
//! Values come from defaults matching a local platform install, from a
//! deserialized config section, or from the environment via
//! [`ClientConfig::from_env`].

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::clients::{DeviceProfileClient, EventClient, TransmissionClient};
use crate::error::ConfigError;
use crate::http::Transport;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const CORE_DATA_URL_ENV: &str = "CORE_DATA_URL";
pub const CORE_METADATA_URL_ENV: &str = "CORE_METADATA_URL";
pub const SUPPORT_NOTIFICATIONS_URL_ENV: &str = "SUPPORT_NOTIFICATIONS_URL";
pub const CLIENT_TIMEOUT_MS_ENV: &str = "CLIENT_TIMEOUT_MS";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ClientConfig {
    pub core_data_url: String,
    pub core_metadata_url: String,
    pub support_notifications_url: String,
    pub timeout_ms: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            core_data_url: "http://localhost:59880".to_string(),
            core_metadata_url: "http://localhost:59881".to_string(),
            support_notifications_url: "http://localhost:59860".to_string(),
            timeout_ms: DEFAULT_TIMEOUT.as_millis() as u64,
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup(CORE_DATA_URL_ENV) {
            config.core_data_url = url;
        }
        if let Some(url) = lookup(CORE_METADATA_URL_ENV) {
            config.core_metadata_url = url;
        }
        if let Some(url) = lookup(SUPPORT_NOTIFICATIONS_URL_ENV) {
            config.support_notifications_url = url;
        }
        if let Some(value) = lookup(CLIENT_TIMEOUT_MS_ENV) {
            config.timeout_ms = value
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|ms| *ms > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: CLIENT_TIMEOUT_MS_ENV.to_string(),
                    value,
                })?;
        }
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn event_client(&self, transport: Arc<dyn Transport>) -> EventClient {
        EventClient::new(&self.core_data_url, transport)
    }

    pub fn device_profile_client(&self, transport: Arc<dyn Transport>) -> DeviceProfileClient {
        DeviceProfileClient::new(&self.core_metadata_url, transport)
    }

    pub fn transmission_client(&self, transport: Arc<dyn Transport>) -> TransmissionClient {
        TransmissionClient::new(&self.support_notifications_url, transport)
    }
}
