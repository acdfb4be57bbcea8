use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use strum::EnumString;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::filter::Targets;

use super::LoadError;

/// Settings of the command line host, loaded from an optional TOML file.
#[derive(Debug, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Deserialize, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    #[strum(serialize = "warn", serialize = "warning")]
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default)]
    pub level: LogLevel,

    /// Per-target levels, e.g. `"toniebox_card::command" = "debug"`
    #[serde(default)]
    pub overrides: HashMap<String, LogLevel>,
}

impl LoggingConfig {
    /// Build a target filter, optionally replacing the default level.
    pub fn targets(&self, level: Option<LogLevel>) -> Targets {
        let default = level.unwrap_or(self.level);
        self.overrides
            .iter()
            .fold(Targets::new().with_default(default), |targets, (target, level)| {
                targets.with_target(target.clone(), *level)
            })
    }
}

impl Settings {
    /// Load settings from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| LoadError::Io(path.as_ref().to_path_buf(), e))?;

        toml::from_str(&contents).map_err(LoadError::Toml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_logging_settings() {
        let settings: Settings = toml::from_str(
            r#"
            [logging]
            level = "debug"

            [logging.overrides]
            "toniebox_card::command" = "trace"
        "#,
        )
        .unwrap();

        assert_eq!(settings.logging.level, LogLevel::Debug);
        assert_eq!(
            settings.logging.overrides.get("toniebox_card::command"),
            Some(&LogLevel::Trace)
        );
    }

    #[test]
    fn test_empty_settings_use_defaults() {
        let settings: Settings = toml::from_str("").unwrap();
        assert_eq!(settings.logging.level, LogLevel::Info);
        assert!(settings.logging.overrides.is_empty());
    }

    #[test]
    fn test_log_level_from_str() {
        assert_eq!("WARNING".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("warn".parse::<LogLevel>().unwrap(), LogLevel::Warn);
        assert_eq!("trace".parse::<LogLevel>().unwrap(), LogLevel::Trace);
        assert!("loud".parse::<LogLevel>().is_err());
    }

    #[test]
    fn test_settings_from_missing_file() {
        let err = Settings::from_file("/nonexistent/settings.toml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/settings.toml"));
    }
}
