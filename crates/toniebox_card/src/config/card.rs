use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use strum::Display;
use strum::EnumString;

use super::raw::RawCardConfig;
use super::raw::RawControl;
use super::raw::RawEntities;
use super::raw::RawMqtt;
use super::raw::RawTapAction;
use super::ConfigError;

pub const DEFAULT_NAME: &str = "Toniebox";
pub const DEFAULT_PLAY_PAYLOAD: &str = "play";
pub const DEFAULT_PAUSE_PAYLOAD: &str = "pause";
pub const DEFAULT_NEXT_PAYLOAD: &str = "next";
pub const DEFAULT_PREVIOUS_PAYLOAD: &str = "previous";

/// Complete card configuration.
///
/// Serializes to the structured raw shape, so feeding the serialized form back
/// through [`normalize`] yields the same value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardConfig {
    /// Display label
    pub name: String,

    pub entities: Entities,

    pub control: ControlConfig,

    /// Show the battery chip when a battery level is known
    pub show_battery: bool,

    /// Show the Wi-Fi signal strength when known
    pub show_rssi: bool,

    pub tap_action: TapAction,
}

/// Dedicated sensor entities, each optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Entities {
    pub title_entity: Option<String>,
    pub cover_entity: Option<String>,
    pub playback_entity: Option<String>,
    pub battery_entity: Option<String>,
    pub charging_entity: Option<String>,
    pub rssi_entity: Option<String>,
}

/// Recognized values of `control.mode`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, EnumString, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ControlMode {
    #[default]
    MediaPlayer,
    Mqtt,
}

/// Backend that playback buttons are sent to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ControlConfig {
    /// High-level player control calls against a media player entity
    MediaPlayer { media_player: Option<String> },

    /// Raw message publishing to a command topic
    Mqtt { mqtt: MqttControl },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MqttControl {
    pub command_topic: Option<String>,
    pub play_payload: String,
    pub pause_payload: String,
    pub next_payload: String,
    pub previous_payload: String,
}

impl Default for MqttControl {
    fn default() -> Self {
        Self {
            command_topic: None,
            play_payload: DEFAULT_PLAY_PAYLOAD.to_string(),
            pause_payload: DEFAULT_PAUSE_PAYLOAD.to_string(),
            next_payload: DEFAULT_NEXT_PAYLOAD.to_string(),
            previous_payload: DEFAULT_PREVIOUS_PAYLOAD.to_string(),
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        ControlConfig::MediaPlayer { media_player: None }
    }
}

impl ControlConfig {
    pub fn mode(&self) -> ControlMode {
        match self {
            ControlConfig::MediaPlayer { .. } => ControlMode::MediaPlayer,
            ControlConfig::Mqtt { .. } => ControlMode::Mqtt,
        }
    }

    /// The controlled media player, if in media player mode and configured.
    pub fn media_player(&self) -> Option<&str> {
        match self {
            ControlConfig::MediaPlayer { media_player } => media_player.as_deref(),
            ControlConfig::Mqtt { .. } => None,
        }
    }
}

/// What tapping the card body does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, EnumString, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TapActionKind {
    /// Open the host's detail view for the primary entity
    #[default]
    MoreInfo,
    /// Call an arbitrary `domain.service`
    CallService,
    None,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TapAction {
    pub action: TapActionKind,
    pub service: Option<String>,
    pub service_data: Map<String, Value>,
}

impl Default for CardConfig {
    fn default() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            entities: Entities::default(),
            control: ControlConfig::default(),
            show_battery: true,
            show_rssi: false,
            tap_action: TapAction::default(),
        }
    }
}

/// Normalize a raw configuration value of either shape into a [`CardConfig`].
pub fn normalize(raw: &Value) -> Result<CardConfig, ConfigError> {
    if !matches!(raw, Value::Object(_) | Value::Null) {
        return Err(ConfigError::Malformed(format!(
            "expected a mapping, found {}",
            value_kind(raw)
        )));
    }

    let raw =
        RawCardConfig::from_value(raw).map_err(|e| ConfigError::Malformed(e.to_string()))?;
    CardConfig::try_from(raw)
}

impl TryFrom<RawCardConfig> for CardConfig {
    type Error = ConfigError;

    fn try_from(mut raw: RawCardConfig) -> Result<Self, Self::Error> {
        let (entities, control) = raw.into_shape().migrate();

        Ok(CardConfig {
            name: raw.name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
            entities: entities.into(),
            control: ControlConfig::try_from(control.unwrap_or_default())?,
            show_battery: raw.show_battery.unwrap_or(true),
            show_rssi: raw.show_rssi.unwrap_or(false),
            tap_action: raw.tap_action.map(TapAction::from).unwrap_or_default(),
        })
    }
}

impl CardConfig {
    /// Configuration offered when the card is first added to a dashboard.
    pub fn stub() -> Self {
        CardConfig {
            control: ControlConfig::MediaPlayer {
                media_player: Some("media_player.toniebox".to_string()),
            },
            ..CardConfig::default()
        }
    }

    /// Serialize back into the structured raw shape.
    pub fn to_raw(&self) -> Result<Value, ConfigError> {
        serde_json::to_value(self).map_err(|e| ConfigError::Malformed(e.to_string()))
    }

    /// The entity the host's detail view should open for.
    pub fn primary_entity(&self) -> Option<&str> {
        self.control
            .media_player()
            .or(self.entities.title_entity.as_deref())
            .or(self.entities.playback_entity.as_deref())
    }

    /// True when playback buttons have nowhere to go.
    ///
    /// Dispatch treats this as a silent no-op; editors can surface it instead.
    pub fn dispatch_target_missing(&self) -> bool {
        match &self.control {
            ControlConfig::MediaPlayer { media_player } => media_player.is_none(),
            ControlConfig::Mqtt { mqtt } => mqtt.command_topic.is_none(),
        }
    }
}

impl From<RawEntities> for Entities {
    fn from(raw: RawEntities) -> Self {
        Self {
            title_entity: non_empty(raw.title_entity),
            cover_entity: non_empty(raw.cover_entity),
            playback_entity: non_empty(raw.playback_entity),
            battery_entity: non_empty(raw.battery_entity),
            charging_entity: non_empty(raw.charging_entity),
            rssi_entity: non_empty(raw.rssi_entity),
        }
    }
}

impl TryFrom<RawControl> for ControlConfig {
    type Error = ConfigError;

    fn try_from(raw: RawControl) -> Result<Self, Self::Error> {
        let mode = match raw.mode.as_deref() {
            None => ControlMode::MediaPlayer,
            Some(mode) => mode
                .parse()
                .map_err(|_| ConfigError::UnknownControlMode(mode.to_string()))?,
        };

        Ok(match mode {
            ControlMode::MediaPlayer => ControlConfig::MediaPlayer {
                media_player: non_empty(raw.media_player),
            },
            ControlMode::Mqtt => ControlConfig::Mqtt {
                mqtt: raw.mqtt.map(MqttControl::from).unwrap_or_default(),
            },
        })
    }
}

impl From<RawMqtt> for MqttControl {
    fn from(raw: RawMqtt) -> Self {
        let defaults = MqttControl::default();
        Self {
            command_topic: non_empty(raw.command_topic),
            play_payload: raw.play_payload.unwrap_or(defaults.play_payload),
            pause_payload: raw.pause_payload.unwrap_or(defaults.pause_payload),
            next_payload: raw.next_payload.unwrap_or(defaults.next_payload),
            previous_payload: raw.previous_payload.unwrap_or(defaults.previous_payload),
        }
    }
}

impl From<RawTapAction> for TapAction {
    fn from(raw: RawTapAction) -> Self {
        let action = match raw.action.as_deref() {
            None => TapActionKind::MoreInfo,
            Some(action) => action.parse().unwrap_or_else(|_| {
                tracing::warn!("Unsupported tap action '{}', tapping will do nothing", action);
                TapActionKind::None
            }),
        };

        Self {
            action,
            service: raw.service,
            service_data: raw.service_data.unwrap_or_default(),
        }
    }
}

/// Cleared editor fields come back as `""`; treat them as unset.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "a mapping",
    }
}
