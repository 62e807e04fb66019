use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::ConfigError;

/// Stores user-configurable preferences for the tracker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
    #[serde(default = "Config::default_profile")]
    pub profile: String,
    /// Categories shown in the category chart. Empty means every category.
    #[serde(default = "Config::default_tracked_categories")]
    pub tracked_categories: Vec<String>,
    #[serde(default = "Config::default_chart_width")]
    pub chart_width: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    /// Optional custom directory for profile stores. Defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            currency_symbol: Self::default_currency_symbol(),
            ui_color_enabled: Self::default_ui_color_enabled(),
            profile: Self::default_profile(),
            tracked_categories: Self::default_tracked_categories(),
            chart_width: Self::default_chart_width(),
            data_dir: None,
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 6] = [
        "currency",
        "color",
        "profile",
        "categories",
        "chart-width",
        "data-dir",
    ];

    pub fn default_currency_symbol() -> String {
        "₹".into()
    }

    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn default_profile() -> String {
        "default".into()
    }

    pub fn default_tracked_categories() -> Vec<String> {
        ["food", "rent", "transportation"]
            .into_iter()
            .map(String::from)
            .collect()
    }

    pub fn default_chart_width() -> usize {
        40
    }

    /// Directory holding the profile stores.
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(path) = &self.data_dir {
            return path.clone();
        }

        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("spendwise").join("stores")
    }

    /// Applies a `config set` style assignment.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            reason: reason.to_string(),
        };
        match key {
            "currency" => {
                if value.trim().is_empty() {
                    return Err(invalid("currency symbol cannot be empty"));
                }
                self.currency_symbol = value.trim().to_string();
            }
            "color" => {
                self.ui_color_enabled = match value.trim().to_ascii_lowercase().as_str() {
                    "on" | "true" | "yes" => true,
                    "off" | "false" | "no" => false,
                    _ => return Err(invalid("expected on or off")),
                };
            }
            "profile" => {
                if value.trim().is_empty() {
                    return Err(invalid("profile name cannot be empty"));
                }
                self.profile = value.trim().to_string();
            }
            "categories" => {
                self.tracked_categories = value
                    .split(',')
                    .map(|name| name.trim().to_lowercase())
                    .filter(|name| !name.is_empty())
                    .collect();
            }
            "chart-width" => {
                let width: usize = value
                    .trim()
                    .parse()
                    .map_err(|_| invalid("expected a whole number"))?;
                if !(10..=200).contains(&width) {
                    return Err(invalid("expected a width between 10 and 200"));
                }
                self.chart_width = width;
            }
            "data-dir" => {
                self.data_dir = match value.trim() {
                    "" | "default" => None,
                    path => Some(PathBuf::from(path)),
                };
            }
            other => return Err(ConfigError::UnknownKey(other.to_string())),
        }
        Ok(())
    }
}
