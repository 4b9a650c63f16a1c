//! Persisted key-value settings.
//!
//! Stored as pretty-printed JSON, by default at
//! `$XDG_CONFIG_HOME/cadence/settings.json`. Unknown keys are kept verbatim
//! so a load/save round trip never drops data written by another version.

use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    time::Duration,
};

use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    error::{Result, TrackerError},
    model_client::RetryPolicy,
};

/// Keys with a dedicated field.
pub const KNOWN_KEYS: [&str; 5] = [
    "api_key",
    "model",
    "base_url",
    "max_attempts",
    "retry_base_delay_ms",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    /// Model credential
    #[serde(default, alias = "deepseek_api_key", skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_attempts: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_base_delay_ms: Option<u64>,

    /// Everything else, preserved as found
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Settings {
    /// Returns the default settings path following the XDG Base Directory
    /// specification, creating the parent directory.
    pub fn default_path() -> Result<PathBuf> {
        xdg::BaseDirectories::with_prefix("cadence")
            .place_config_file("settings.json")
            .map_err(|e| TrackerError::XdgDirectory(e.to_string()))
    }

    /// Reads settings from `path`.
    ///
    /// A missing file yields defaults. So does an unreadable or corrupt one,
    /// after a warning, so a broken file never blocks startup.
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No settings file at {}; using defaults", path.display());
                return Self::default();
            }
            Err(e) => {
                warn!("Could not read settings at {}: {e}; using defaults", path.display());
                return Self::default();
            }
        };

        serde_json::from_str(&text).unwrap_or_else(|e| {
            warn!("Ignoring corrupt settings at {}: {e}", path.display());
            Self::default()
        })
    }

    /// Writes settings to `path`, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| TrackerError::FileSystem {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|e| TrackerError::FileSystem {
            path: path.to_path_buf(),
            source: e,
        })?;
        debug!("Saved settings to {}", path.display());
        Ok(())
    }

    /// Value of `key` rendered as text, if set.
    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "api_key" => self.api_key.clone(),
            "model" => self.model.clone(),
            "base_url" => self.base_url.clone(),
            "max_attempts" => self.max_attempts.map(|n| n.to_string()),
            "retry_base_delay_ms" => self.retry_base_delay_ms.map(|n| n.to_string()),
            other => self.extra.get(other).map(|v| match v {
                Value::String(s) => s.clone(),
                v => v.to_string(),
            }),
        }
    }

    /// Sets `key` from text. Numeric keys must parse; unknown keys are
    /// stored as strings.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let key = key.trim();
        if key.is_empty() {
            return Err(TrackerError::invalid_input("key").with_reason("must not be empty"));
        }

        match key {
            "api_key" | "deepseek_api_key" => self.api_key = Some(value.trim().to_string()),
            "model" => self.model = Some(value.to_string()),
            "base_url" => self.base_url = Some(value.to_string()),
            "max_attempts" => {
                let n = parse_number::<u32>(key, value)?;
                if n == 0 {
                    return Err(TrackerError::invalid_input(key).with_reason("must be at least 1"));
                }
                self.max_attempts = Some(n);
            }
            "retry_base_delay_ms" => self.retry_base_delay_ms = Some(parse_number(key, value)?),
            other => {
                self.extra
                    .insert(other.to_string(), Value::String(value.to_string()));
            }
        }
        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.trim().is_empty())
    }

    /// The credential with all but its last four characters hidden. Keys
    /// of four characters or fewer are hidden entirely.
    pub fn masked_api_key(&self) -> Option<String> {
        let key = self.api_key.as_deref()?;
        let chars: Vec<char> = key.chars().collect();
        if chars.len() <= 4 {
            return Some("*".repeat(chars.len().max(4)));
        }
        let hidden = chars.len() - 4;
        Some(
            std::iter::repeat('*')
                .take(hidden.clamp(4, 8))
                .chain(chars[hidden..].iter().copied())
                .collect(),
        )
    }

    /// Retry policy for model calls, falling back to the defaults.
    pub fn retry_policy(&self) -> RetryPolicy {
        let default = RetryPolicy::default();
        RetryPolicy {
            max_attempts: self.max_attempts.unwrap_or(default.max_attempts).max(1),
            base_delay: self
                .retry_base_delay_ms
                .map(Duration::from_millis)
                .unwrap_or(default.base_delay),
        }
    }
}

fn parse_number<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        TrackerError::invalid_input(key).with_reason(format!("'{value}' is not a whole number"))
    })
}
