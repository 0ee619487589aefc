use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::hotkey::Hotkey;
use crate::selection::SelectionSet;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,

    #[serde(default)]
    pub notifications: NotificationConfig,

    #[serde(default)]
    pub devices: DevicesConfig,

    #[serde(default)]
    pub hotkey: HotkeyConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    pub log_level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub show_switching_actions: bool, // Successful switch notifications
    pub show_errors: bool,            // No-devices and failure notifications
}

/// Persisted device state: the opt-in selection and the last device we switched to
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DevicesConfig {
    /// Selected device names joined with `;;;`
    pub selected_devices: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_active_device: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub binding: Option<Hotkey>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            show_switching_actions: true,
            show_errors: true,
        }
    }
}

impl HotkeyConfig {
    /// The configured binding, or Ctrl+Alt+F11 when none is set
    pub fn effective(&self) -> Hotkey {
        self.binding.clone().unwrap_or_default()
    }
}

impl Config {
    /// Decoded view of the persisted selection
    pub fn selection(&self) -> SelectionSet {
        SelectionSet::parse(&self.devices.selected_devices)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse configuration")
    }

    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration")
    }

    pub fn default_config_path() -> Result<PathBuf> {
        let home_dir = dirs::home_dir().context("Failed to get home directory")?;
        Ok(home_dir.join(".config/audio-device-cycler/config.toml"))
    }
}
