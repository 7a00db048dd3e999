//! TOML-based application configuration.
//!
//! Stores user preferences including:
//! - Work, break and long-break durations (minutes)
//! - Long-break cadence and auto-start
//! - Deterrent phrase language
//! - Appearance fields, kept verbatim for the front end
//!
//! Configuration is stored at `~/.config/pomolock/config.toml`. A file that
//! is missing, unreadable or out of range is replaced by the defaults at
//! startup; it never stops the timer from running.

use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::data_dir;
use crate::challenge::Language;
use crate::error::{ConfigError, Result};
use crate::timer::TimerSettings;

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/pomolock/config.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Work interval, minutes [1-120].
    #[serde(default = "default_work_time")]
    pub work_time: u32,
    /// Short break, minutes [1-60].
    #[serde(default = "default_break_time")]
    pub break_time: u32,
    /// Long break, minutes [1-60].
    #[serde(default = "default_long_break_time")]
    pub long_break_time: u32,
    /// Pomodoros per long break [2-10].
    #[serde(default = "default_pomodoros_for_long_break")]
    pub pomodoros_for_long_break: u32,
    #[serde(default = "default_true")]
    pub auto_start: bool,
    #[serde(default)]
    pub language: Language,
    #[serde(default = "default_true")]
    pub sound_enabled: bool,
    /// Everything else: appearance fields the core does not interpret.
    #[serde(flatten)]
    pub appearance: toml::Table,
}

// Default functions
fn default_work_time() -> u32 {
    25
}
fn default_break_time() -> u32 {
    5
}
fn default_long_break_time() -> u32 {
    15
}
fn default_pomodoros_for_long_break() -> u32 {
    4
}
fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_time: default_work_time(),
            break_time: default_break_time(),
            long_break_time: default_long_break_time(),
            pomodoros_for_long_break: default_pomodoros_for_long_break(),
            auto_start: true,
            language: Language::default(),
            sound_enabled: true,
            appearance: toml::Table::new(),
        }
    }
}

const WORK_TIME_RANGE: RangeInclusive<u32> = 1..=120;
const BREAK_TIME_RANGE: RangeInclusive<u32> = 1..=60;
const LONG_BREAK_TIME_RANGE: RangeInclusive<u32> = 1..=60;
const POMODOROS_RANGE: RangeInclusive<u32> = 2..=10;

fn check_range(
    key: &str,
    value: u32,
    range: RangeInclusive<u32>,
) -> std::result::Result<(), ConfigError> {
    if range.contains(&value) {
        return Ok(());
    }
    Err(ConfigError::InvalidValue {
        key: key.into(),
        message: format!(
            "{value} is outside {}..={}",
            range.start(),
            range.end()
        ),
    })
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
        if parts.peek().is_none() || key.is_empty() {
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
                            .map_err(|_| invalid(format!("cannot parse '{value}' as bool")))?,
                    ),
                    serde_json::Value::Number(_) => {
                        if let Ok(n) = value.parse::<u64>() {
                            serde_json::Value::Number(n.into())
                        } else if let Ok(n) = value.parse::<f64>() {
                            serde_json::Number::from_f64(n)
                                .map(serde_json::Value::Number)
                                .ok_or_else(|| invalid(format!("cannot parse '{value}' as number")))?
                        } else {
                            return Err(invalid(format!("cannot parse '{value}' as number")));
                        }
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

    pub fn path() -> Result<PathBuf> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Check every bounded field against its allowed range.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        check_range("work_time", self.work_time, WORK_TIME_RANGE)?;
        check_range("break_time", self.break_time, BREAK_TIME_RANGE)?;
        check_range("long_break_time", self.long_break_time, LONG_BREAK_TIME_RANGE)?;
        check_range(
            "pomodoros_for_long_break",
            self.pomodoros_for_long_break,
            POMODOROS_RANGE,
        )?;
        Ok(())
    }

    /// Reset each out-of-range field to its default, keeping everything else.
    fn reset_out_of_range(&mut self) {
        let defaults = Self::default();
        let fields = [
            ("work_time", &mut self.work_time, defaults.work_time, WORK_TIME_RANGE),
            ("break_time", &mut self.break_time, defaults.break_time, BREAK_TIME_RANGE),
            (
                "long_break_time",
                &mut self.long_break_time,
                defaults.long_break_time,
                LONG_BREAK_TIME_RANGE,
            ),
            (
                "pomodoros_for_long_break",
                &mut self.pomodoros_for_long_break,
                defaults.pomodoros_for_long_break,
                POMODOROS_RANGE,
            ),
        ];
        for (key, value, default, range) in fields {
            if !range.contains(&*value) {
                warn!(key, value = *value, default, "Resetting out-of-range setting");
                *value = default;
            }
        }
    }

    /// Load from disk. A missing file yields the defaults without creating it.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be read, parsed
    /// or validated.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        if !path.exists() {
            debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let cfg = Self::parse_file(path)?;
        cfg.validate()?;
        debug!(path = %path.display(), "Loaded configuration");
        Ok(cfg)
    }

    /// Load the file that is about to be edited and saved back.
    ///
    /// Out-of-range values fall back to their defaults one by one, so the
    /// rest of the file (appearance fields included) survives the save.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed;
    /// overwriting it would lose whatever it holds.
    pub fn load_for_edit() -> Result<Self> {
        Self::load_for_edit_from(&Self::path()?)
    }

    pub fn load_for_edit_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let mut cfg = Self::parse_file(path)?;
        cfg.reset_out_of_range();
        Ok(cfg)
    }

    fn parse_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let cfg = toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Ok(cfg)
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            warn!("Using default configuration: {e}");
            Self::default()
        })
    }

    /// Same as [`Config::load_or_default`] for an explicit path.
    pub fn load_from_or_default(path: &Path) -> Self {
        Self::load_from(path).unwrap_or_else(|e| {
            warn!("Using default configuration: {e}");
            Self::default()
        })
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
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
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

    /// Change a value in memory. Rejects unknown keys, ill-typed values and
    /// values outside the allowed ranges, leaving `self` untouched.
    pub fn apply(&mut self, key: &str, value: &str) -> Result<()> {
        let value = if key == "language" {
            value.parse::<Language>()?.code().to_string()
        } else {
            value.to_string()
        };
        let mut json = serde_json::to_value(&*self)?;
        Self::set_json_value_by_path(&mut json, key, &value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| {
            ConfigError::InvalidValue {
                key: key.to_string(),
                message: e.to_string(),
            }
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed
    /// or is out of range, or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.apply(key, value)?;
        self.save()
    }

    /// Engine settings, converted to seconds.
    pub fn timer_settings(&self) -> TimerSettings {
        TimerSettings {
            work_secs: u64::from(self.work_time) * 60,
            break_secs: u64::from(self.break_time) * 60,
            long_break_secs: u64::from(self.long_break_time) * 60,
            pomodoros_per_long_break: self.pomodoros_for_long_break,
            auto_start: self.auto_start,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed, cfg);
    }

    #[test]
    fn config_default_values() {
        let cfg = Config::default();
        assert_eq!(cfg.work_time, 25);
        assert_eq!(cfg.break_time, 5);
        assert_eq!(cfg.long_break_time, 15);
        assert_eq!(cfg.pomodoros_for_long_break, 4);
        assert!(cfg.auto_start);
        assert_eq!(cfg.language, Language::En);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn missing_fields_take_defaults() {
        let cfg: Config = toml::from_str("work_time = 50\nlanguage = \"RU\"\n").unwrap();
        assert_eq!(cfg.work_time, 50);
        assert_eq!(cfg.break_time, 5);
        assert_eq!(cfg.language, Language::Ru);
    }

    #[test]
    fn appearance_fields_survive_a_roundtrip() {
        let src = "work_time = 30\ntheme = \"dark\"\nopacity = 0.8\n";
        let cfg: Config = toml::from_str(src).unwrap();
        assert_eq!(cfg.appearance.get("theme").and_then(|v| v.as_str()), Some("dark"));
        let again: Config = toml::from_str(&toml::to_string_pretty(&cfg).unwrap()).unwrap();
        assert_eq!(again, cfg);
    }

    #[test]
    fn validate_rejects_out_of_range() {
        let cfg = Config {
            work_time: 0,
            ..Config::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidValue { ref key, .. }) if key == "work_time"
        ));
        let cfg = Config {
            pomodoros_for_long_break: 1,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
        let cfg = Config {
            long_break_time: 61,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let mut cfg = Config::default();
        cfg.appearance.insert("colors".into(), toml::Value::Table({
            let mut t = toml::Table::new();
            t.insert("accent".into(), toml::Value::String("#ff0000".into()));
            t
        }));
        assert_eq!(cfg.get("work_time").as_deref(), Some("25"));
        assert_eq!(cfg.get("language").as_deref(), Some("EN"));
        assert_eq!(cfg.get("colors.accent").as_deref(), Some("#ff0000"));
        assert!(cfg.get("missing_key").is_none());
    }

    #[test]
    fn apply_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.apply("work_time", "50").unwrap();
        cfg.apply("auto_start", "false").unwrap();
        cfg.apply("language", "ru").unwrap();
        assert_eq!(cfg.work_time, 50);
        assert!(!cfg.auto_start);
        assert_eq!(cfg.language, Language::Ru);
    }

    #[test]
    fn apply_rejects_bad_input_without_changes() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.apply("nonexistent_key", "1"),
            Err(CoreError::Config(ConfigError::UnknownKey(_)))
        ));
        assert!(cfg.apply("auto_start", "not_a_bool").is_err());
        assert!(cfg.apply("work_time", "500").is_err());
        assert!(cfg.apply("language", "DE").is_err());
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn set_json_value_by_path_rejects_unknown_key() {
        let mut json = serde_json::to_value(Config::default()).unwrap();
        let result = Config::set_json_value_by_path(&mut json, "work_time.nested", "1");
        assert!(result.is_err());
    }

    #[test]
    fn load_for_edit_keeps_appearance_of_an_invalid_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "work_time = 40\npomodoros_for_long_break = 11\ntheme = \"dark\"\n",
        )
        .unwrap();

        let cfg = Config::load_for_edit_from(&path).unwrap();
        assert_eq!(cfg.work_time, 40);
        assert_eq!(cfg.pomodoros_for_long_break, 4);
        assert_eq!(cfg.appearance.get("theme").and_then(|v| v.as_str()), Some("dark"));
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn load_for_edit_refuses_an_unparsable_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "theme = [unterminated").unwrap();
        assert!(matches!(
            Config::load_for_edit_from(&path),
            Err(CoreError::Config(ConfigError::ParseFailed(_)))
        ));
        assert_eq!(
            Config::load_for_edit_from(&dir.path().join("missing.toml")).unwrap(),
            Config::default()
        );
    }

    #[test]
    fn timer_settings_are_in_seconds() {
        let cfg = Config {
            work_time: 50,
            break_time: 10,
            long_break_time: 30,
            pomodoros_for_long_break: 3,
            auto_start: false,
            ..Config::default()
        };
        let settings = cfg.timer_settings();
        assert_eq!(settings.work_secs, 3000);
        assert_eq!(settings.break_secs, 600);
        assert_eq!(settings.long_break_secs, 1800);
        assert_eq!(settings.pomodoros_per_long_break, 3);
        assert!(!settings.auto_start);
    }
}
