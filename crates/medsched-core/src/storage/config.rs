//! TOML-based application configuration.
//!
//! Stores rendering preferences:
//! - Calendar window length, week start and schedule anchoring
//! - Print page geometry and cell capacity
//!
//! Configuration is stored at `~/.config/medsched/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::calendar::{AnchorPolicy, ProjectionOptions, WeekStart};
use crate::error::ConfigError;
use crate::render::PrintLayout;

/// Longest preview window, in days.
pub const MAX_WINDOW_DAYS: u32 = 366;

/// Most month pages in one print document.
pub const MAX_PRINT_MONTHS: u32 = 12;

/// Calendar projection settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Days shown by the week preview.
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    #[serde(default)]
    pub week_start: WeekStart,
    #[serde(default)]
    pub anchor: AnchorPolicy,
}

/// Print page geometry, in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrintConfig {
    #[serde(default = "default_months")]
    pub months: u32,
    #[serde(default = "default_page_width")]
    pub page_width: f64,
    #[serde(default = "default_page_height")]
    pub page_height: f64,
    #[serde(default = "default_margin")]
    pub margin: f64,
    #[serde(default = "default_header_height")]
    pub header_height: f64,
    #[serde(default = "default_row_height")]
    pub row_height: f64,
    #[serde(default = "default_entry_height")]
    pub entry_height: f64,
    #[serde(default = "default_entry_gap")]
    pub entry_gap: f64,
    /// Characters of a medication name kept on a calendar marker.
    #[serde(default = "default_name_chars")]
    pub name_chars: usize,
}

/// Application configuration.
///
/// Serialized to/from TOML at `~/.config/medsched/config.toml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub calendar: CalendarConfig,
    #[serde(default)]
    pub print: PrintConfig,
}

// Default functions
fn default_window_days() -> u32 {
    7
}
fn default_months() -> u32 {
    2
}
fn default_page_width() -> f64 {
    297.0
}
fn default_page_height() -> f64 {
    210.0
}
fn default_margin() -> f64 {
    10.0
}
fn default_header_height() -> f64 {
    8.0
}
fn default_row_height() -> f64 {
    28.0
}
fn default_entry_height() -> f64 {
    5.0
}
fn default_entry_gap() -> f64 {
    1.0
}
fn default_name_chars() -> usize {
    8
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            week_start: WeekStart::default(),
            anchor: AnchorPolicy::default(),
        }
    }
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            months: default_months(),
            page_width: default_page_width(),
            page_height: default_page_height(),
            margin: default_margin(),
            header_height: default_header_height(),
            row_height: default_row_height(),
            entry_height: default_entry_height(),
            entry_gap: default_entry_gap(),
            name_chars: default_name_chars(),
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
    ) -> Result<(), ConfigError> {
        let unknown = || ConfigError::UnknownKey(key.to_string());
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
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
                        value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
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
                    serde_json::Value::Object(_) => {
                        // Sections cannot be replaced wholesale.
                        return Err(unknown());
                    }
                    _ => serde_json::Value::String(value.to_ascii_lowercase()),
                };

                obj.insert(part.to_string(), new_value);
                return Ok(());
            }

            current = current.get_mut(part).ok_or_else(unknown)?;
        }

        Err(unknown())
    }

    /// Location of the config file.
    ///
    /// # Errors
    ///
    /// Returns an error if the data directory cannot be created.
    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the defaults if no file exists yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::path()?;
        if !path.exists() {
            let cfg = Self::default();
            cfg.save_to(&path)?;
            return Ok(cfg);
        }
        Self::load_from(&path)
    }

    /// Load from `path`; a missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or holds
    /// out-of-range values.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => {
                return Err(ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })
            }
        };
        let cfg: Config =
            toml::from_str(&content).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Persist to the default location.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    /// Persist to `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
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

    /// Set a config value by dot-separated key, e.g. `print.row_height`.
    ///
    /// Does not persist; call [`Config::save`] afterwards.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit the
    /// setting's type or range.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let mut json = serde_json::to_value(&*self).map_err(|e| ConfigError::ParseFailed(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| ConfigError::InvalidValue {
            key: key.to_string(),
            message: e.to_string(),
        })?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_default()
    }

    pub fn projection_options(&self) -> ProjectionOptions {
        ProjectionOptions {
            anchor: self.calendar.anchor,
            ..ProjectionOptions::default()
        }
    }

    pub fn print_layout(&self) -> PrintLayout {
        PrintLayout::from(&self.print)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| ConfigError::InvalidValue {
            key: key.to_string(),
            message: message.to_string(),
        };
        if !(1..=MAX_WINDOW_DAYS).contains(&self.calendar.window_days) {
            return Err(invalid(
                "calendar.window_days",
                &format!("must be between 1 and {MAX_WINDOW_DAYS}"),
            ));
        }
        if !(1..=MAX_PRINT_MONTHS).contains(&self.print.months) {
            return Err(invalid(
                "print.months",
                &format!("must be between 1 and {MAX_PRINT_MONTHS}"),
            ));
        }
        let lengths = [
            ("print.page_width", self.print.page_width),
            ("print.page_height", self.print.page_height),
            ("print.header_height", self.print.header_height),
            ("print.row_height", self.print.row_height),
            ("print.entry_height", self.print.entry_height),
        ];
        for (key, value) in lengths {
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(key, "must be a positive length"));
            }
        }
        for (key, value) in [("print.margin", self.print.margin), ("print.entry_gap", self.print.entry_gap)] {
            if !value.is_finite() || value < 0.0 {
                return Err(invalid(key, "must not be negative"));
            }
        }
        if 2.0 * self.print.margin >= self.print.page_width {
            return Err(invalid("print.margin", "leaves no room on the page"));
        }
        Ok(())
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
        assert_eq!(parsed, cfg);
        assert_eq!(parsed.calendar.window_days, 7);
        assert_eq!(parsed.print.row_height, 28.0);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let parsed: Config = toml::from_str("[print]\nmonths = 3\n").unwrap();
        assert_eq!(parsed.print.months, 3);
        assert_eq!(parsed.print.name_chars, 8);
        assert_eq!(parsed.calendar.week_start, WeekStart::Sunday);
    }

    #[test]
    fn get_by_dotted_key() {
        let cfg = Config::default();
        assert_eq!(cfg.get("calendar.window_days").as_deref(), Some("7"));
        assert_eq!(cfg.get("calendar.anchor").as_deref(), Some("creation"));
        assert_eq!(cfg.get("print.row_height").as_deref(), Some("28.0"));
        assert_eq!(cfg.get("print.missing"), None);
        assert_eq!(cfg.get(""), None);
    }

    #[test]
    fn set_updates_typed_values() {
        let mut cfg = Config::default();
        cfg.set("calendar.week_start", "Monday").unwrap();
        cfg.set("calendar.anchor", "today").unwrap();
        cfg.set("print.row_height", "40").unwrap();
        cfg.set("print.entry_gap", "0.5").unwrap();
        assert_eq!(cfg.calendar.week_start, WeekStart::Monday);
        assert_eq!(cfg.calendar.anchor, AnchorPolicy::Today);
        assert_eq!(cfg.print.row_height, 40.0);
        assert_eq!(cfg.print.entry_gap, 0.5);
        assert_eq!(cfg.projection_options().anchor, AnchorPolicy::Today);
        assert_eq!(cfg.print_layout().row_height, 40.0);
    }

    #[test]
    fn set_rejects_unknown_and_invalid_values() {
        let mut cfg = Config::default();
        assert!(matches!(cfg.set("print.colour", "red"), Err(ConfigError::UnknownKey(_))));
        assert!(matches!(cfg.set("print", "1"), Err(ConfigError::UnknownKey(_))));
        assert!(matches!(
            cfg.set("calendar.week_start", "friday"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set("print.months", "abc"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.set("print.months", "0"),
            Err(ConfigError::InvalidValue { .. })
        ));
        // Failed sets leave the config untouched.
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn save_and_load_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        assert_eq!(Config::load_from(&path).unwrap(), Config::default());

        let mut cfg = Config::default();
        cfg.set("print.months", "3").unwrap();
        cfg.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().print.months, 3);
    }

    #[test]
    fn load_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[print\nmonths = ").unwrap();
        assert!(matches!(Config::load_from(&path), Err(ConfigError::ParseFailed(_))));

        std::fs::write(&path, "[print]\nrow_height = -1.0\n").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::InvalidValue { .. })
        ));
    }
}
