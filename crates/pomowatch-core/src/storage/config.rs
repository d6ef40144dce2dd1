//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Work and break interval lengths
//! - Keeper polling and link tuning
//! - Alert preferences
//!
//! Configuration is stored at `~/.config/pomowatch/config.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::alert::SoundProfile;
use crate::error::{ConfigError, Result};
use crate::keeper::KeeperConfig;
use crate::timer::IntervalDurations;

/// Interval lengths, in minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationsConfig {
    #[serde(default = "default_work_minutes")]
    pub work_minutes: u64,
    #[serde(default = "default_break_minutes")]
    pub break_minutes: u64,
}

/// Background keeper tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeeperSection {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_command_buffer")]
    pub command_buffer: usize,
    #[serde(default = "default_status_timeout_ms")]
    pub status_timeout_ms: u64,
    /// Local vs keeper disagreement tolerated before re-aligning.
    #[serde(default = "default_drift_tolerance_secs")]
    pub drift_tolerance_secs: u64,
}

/// Alert configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertsConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Ring the terminal bell on completion.
    #[serde(default = "default_true")]
    pub bell: bool,
    /// Sound profile played on completion: beep, bell, chime, ding or success.
    #[serde(default = "default_sound")]
    pub sound: String,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/pomowatch/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub durations: DurationsConfig,
    #[serde(default)]
    pub keeper: KeeperSection,
    #[serde(default)]
    pub alerts: AlertsConfig,
}

// Default functions
fn default_work_minutes() -> u64 {
    25
}
fn default_break_minutes() -> u64 {
    5
}
fn default_poll_interval_ms() -> u64 {
    1000
}
fn default_command_buffer() -> usize {
    32
}
fn default_status_timeout_ms() -> u64 {
    500
}
fn default_drift_tolerance_secs() -> u64 {
    2
}
fn default_true() -> bool {
    true
}
fn default_sound() -> String {
    "beep".into()
}

impl Default for DurationsConfig {
    fn default() -> Self {
        Self {
            work_minutes: default_work_minutes(),
            break_minutes: default_break_minutes(),
        }
    }
}

impl Default for KeeperSection {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            command_buffer: default_command_buffer(),
            status_timeout_ms: default_status_timeout_ms(),
            drift_tolerance_secs: default_drift_tolerance_secs(),
        }
    }
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bell: true,
            sound: default_sound(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> std::result::Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if parts.peek().map_or(true, |p| p.is_empty()) {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            let is_leaf = parts.peek().is_none();
            if is_leaf {
                let obj = current.as_object_mut().ok_or_else(unknown)?;
                let existing = obj.get(part).ok_or_else(unknown)?;

                let new_value = match existing {
                    serde_json::Value::Bool(_) => serde_json::Value::Bool(
                        value
                            .parse::<bool>()
                            .map_err(|e| invalid(e.to_string()))?,
                    ),
                    serde_json::Value::Number(_) => {
                        let n = value
                            .parse::<u64>()
                            .map_err(|_| invalid(format!("cannot parse '{value}' as number")))?;
                        serde_json::Value::Number(n.into())
                    }
                    serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                        serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                    }
                    _ => serde_json::Value::String(value.into()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk or return default.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if path.exists() {
            Self::load_from(&path)
        } else {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            Ok(cfg)
        }
    }

    /// Load and validate the file at `path`.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg: Config =
            toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Reject values the engine cannot run with.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let positive = [
            ("durations.work_minutes", self.durations.work_minutes),
            ("durations.break_minutes", self.durations.break_minutes),
            ("keeper.poll_interval_ms", self.keeper.poll_interval_ms),
            ("keeper.command_buffer", self.keeper.command_buffer as u64),
            ("keeper.status_timeout_ms", self.keeper.status_timeout_ms),
        ];
        for (key, value) in positive {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    message: "must be at least 1".into(),
                });
            }
        }
        if SoundProfile::parse(&self.alerts.sound).is_none() {
            return Err(ConfigError::InvalidValue {
                key: "alerts.sound".into(),
                message: format!(
                    "unknown sound profile '{}' (expected one of: {})",
                    self.alerts.sound,
                    SoundProfile::NAMES.join(", ")
                ),
            });
        }
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Update a value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value is invalid.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json)?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and persist. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    pub fn interval_durations(&self) -> IntervalDurations {
        IntervalDurations::new(self.durations.work_minutes, self.durations.break_minutes)
    }

    /// The configured completion sound. Falls back to `beep` for a file that
    /// bypassed validation.
    pub fn sound_profile(&self) -> SoundProfile {
        SoundProfile::parse(&self.alerts.sound).unwrap_or_default()
    }

    pub fn keeper_config(&self) -> KeeperConfig {
        KeeperConfig {
            poll_interval: Duration::from_millis(self.keeper.poll_interval_ms),
            command_buffer: self.keeper.command_buffer,
            status_timeout: Duration::from_millis(self.keeper.status_timeout_ms),
            ..KeeperConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.durations.work_minutes, 25);
        assert_eq!(parsed.keeper.poll_interval_ms, 1000);
        assert!(parsed.alerts.enabled);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[durations]\nwork_minutes = 50\n").unwrap();
        assert_eq!(parsed.durations.work_minutes, 50);
        assert_eq!(parsed.durations.break_minutes, 5);
        assert_eq!(parsed.keeper.drift_tolerance_secs, 2);
        assert_eq!(parsed.alerts.sound, "beep");
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("durations.work_minutes").as_deref(), Some("25"));
        assert_eq!(cfg.get("alerts.bell").as_deref(), Some("true"));
        assert_eq!(cfg.get("alerts.sound").as_deref(), Some("beep"));
        assert!(cfg.get("durations.missing_key").is_none());
    }

    #[test]
    fn set_json_value_by_path_updates_nested_number() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        Config::set_json_value_by_path(&mut json, "durations.break_minutes", "10").unwrap();
        assert_eq!(
            Config::get_json_value_by_path(&json, "durations.break_minutes").unwrap(),
            &serde_json::Value::Number(10.into())
        );
    }

    #[test]
    fn set_json_value_by_path_rejects_unknown_key() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::set_json_value_by_path(&mut json, "alerts.nonexistent_key", "value");
        assert!(matches!(result, Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn set_json_value_by_path_rejects_invalid_type() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::set_json_value_by_path(&mut json, "alerts.enabled", "not_a_bool");
        assert!(result.is_err());
    }

    #[test]
    fn apply_rejects_zero_duration() {
        let mut cfg = Config::default();
        assert!(cfg.apply("durations.work_minutes", "0").is_err());
        assert_eq!(cfg.durations.work_minutes, 25);
        cfg.apply("durations.work_minutes", "50").unwrap();
        assert_eq!(cfg.interval_durations().secs(crate::timer::TimerMode::Work), 3000);
    }

    #[test]
    fn keeper_config_uses_millis() {
        let mut cfg = Config::default();
        cfg.apply("keeper.status_timeout_ms", "250").unwrap();
        let keeper = cfg.keeper_config();
        assert_eq!(keeper.poll_interval, Duration::from_secs(1));
        assert_eq!(keeper.status_timeout, Duration::from_millis(250));
    }

    #[test]
    fn save_and_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut cfg = Config::default();
        cfg.apply("alerts.sound", "chime").unwrap();
        cfg.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.alerts.sound, "chime");
        assert_eq!(loaded.sound_profile(), SoundProfile::Chime);
    }

    #[test]
    fn unknown_sound_profile_is_rejected() {
        let mut cfg = Config::default();
        let err = cfg.apply("alerts.sound", "gong").unwrap_err();
        assert!(err.to_string().contains("alerts.sound"));
        assert_eq!(cfg.alerts.sound, "beep");

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[alerts]\nsound = \"gong\"\n").unwrap();
        assert!(Config::load_from(&path).is_err());
    }
}
