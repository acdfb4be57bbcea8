//! Card configuration and host settings.
//!
//! Card configuration is an opaque mapping (TOML or JSON on disk, YAML in most
//! dashboards) that is normalized into a [`CardConfig`]. Host settings only
//! control logging of the command line host.

mod card;
mod load;
pub mod raw;
mod settings;


use std::path::PathBuf;

pub use card::normalize;
pub use card::CardConfig;
pub use card::ControlConfig;
pub use card::ControlMode;
pub use card::Entities;
pub use card::MqttControl;
pub use card::TapAction;
pub use card::TapActionKind;
pub use card::DEFAULT_NAME;
pub use load::load_card_file;
pub use load::load_snapshot_file;
pub use settings::LogLevel;
pub use settings::LoggingConfig;
pub use settings::Settings;

/// Errors raised while normalizing a card configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("unknown control mode '{0}', expected 'media_player' or 'mqtt'")]
    UnknownControlMode(String),

    #[error("malformed card configuration: {0}")]
    Malformed(String),
}

/// Errors raised while reading configuration or state files.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to read {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
