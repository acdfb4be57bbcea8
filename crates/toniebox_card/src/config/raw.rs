//! Raw card configuration as written by the user or the visual editor.
//!
//! Two shapes of the same configuration are in circulation:
//! - Legacy: a flat object keyed by `entity`, `last_title_entity`, ...
//! - Structured: `entities` and `control` blocks.
//!
//! [`RawCardConfig`] accepts both; [`RawCardConfig::into_shape`] splits the
//! entity/control part into an explicit [`ConfigShape`] so migration can be
//! handled in one place.

use serde::Deserialize;
use serde_json::Map;
use serde_json::Value;

/// Everything a card configuration may contain, in either shape.
///
/// Unknown keys (such as the host's `type: custom:...`) are ignored.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawCardConfig {
    pub name: Option<String>,

    pub entities: Option<RawEntities>,
    pub control: Option<RawControl>,

    #[serde(flatten)]
    pub legacy: LegacyFields,

    pub show_battery: Option<bool>,
    pub show_rssi: Option<bool>,

    /// Accepted for old dashboards, has no effect.
    pub show_last_title: Option<bool>,

    pub tap_action: Option<RawTapAction>,
}

/// The structured `entities` block.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawEntities {
    pub title_entity: Option<String>,
    pub cover_entity: Option<String>,
    pub playback_entity: Option<String>,
    pub battery_entity: Option<String>,
    pub charging_entity: Option<String>,
    pub rssi_entity: Option<String>,
}

/// The structured `control` block.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawControl {
    pub mode: Option<String>,
    pub media_player: Option<String>,
    pub mqtt: Option<RawMqtt>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawMqtt {
    pub command_topic: Option<String>,
    pub play_payload: Option<String>,
    pub pause_payload: Option<String>,
    pub next_payload: Option<String>,
    pub previous_payload: Option<String>,
}

/// Top-level keys of the flat single-entity shape.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LegacyFields {
    pub entity: Option<String>,
    pub last_title_entity: Option<String>,
    pub last_cover_entity: Option<String>,
    pub playback_entity: Option<String>,
    pub charging_entity: Option<String>,
    pub battery_entity: Option<String>,
    pub rssi_entity: Option<String>,
}

impl LegacyFields {
    fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RawTapAction {
    pub action: Option<String>,
    pub service: Option<String>,
    pub service_data: Option<Map<String, Value>>,
}

/// Which shape the entity and control part of a configuration was written in.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigShape {
    /// Only structured blocks (or nothing at all).
    Structured {
        entities: Option<RawEntities>,
        control: Option<RawControl>,
    },

    /// Only flat legacy keys.
    Legacy(LegacyFields),

    /// Both. Each structured block replaces its legacy counterpart as a whole.
    Mixed {
        entities: Option<RawEntities>,
        control: Option<RawControl>,
        legacy: LegacyFields,
    },
}

impl RawCardConfig {
    /// Parse a raw JSON value. `null` is treated like an empty object.
    pub fn from_value(raw: &Value) -> Result<Self, serde_json::Error> {
        match raw {
            Value::Null => Ok(Self::default()),
            other => Self::deserialize(other),
        }
    }

    /// Detach the entity/control part as an explicit shape.
    pub fn into_shape(&mut self) -> ConfigShape {
        let entities = self.entities.take();
        let control = self.control.take();
        let legacy = std::mem::take(&mut self.legacy);

        let has_structured = entities.is_some() || control.is_some();
        match (has_structured, legacy.is_empty()) {
            (_, true) => ConfigShape::Structured { entities, control },
            (false, false) => ConfigShape::Legacy(legacy),
            (true, false) => ConfigShape::Mixed {
                entities,
                control,
                legacy,
            },
        }
    }
}

impl ConfigShape {
    /// Migrate to the structured form, resolving precedence between shapes.
    pub fn migrate(self) -> (RawEntities, Option<RawControl>) {
        match self {
            ConfigShape::Structured { entities, control } => {
                (entities.unwrap_or_default(), control)
            }
            ConfigShape::Legacy(legacy) => {
                let control = legacy_control(&legacy);
                (legacy_entities(legacy), control)
            }
            ConfigShape::Mixed {
                entities,
                control,
                legacy,
            } => {
                let control = control.or_else(|| legacy_control(&legacy));
                let entities = entities.unwrap_or_else(|| legacy_entities(legacy));
                (entities, control)
            }
        }
    }
}

fn legacy_control(legacy: &LegacyFields) -> Option<RawControl> {
    legacy.entity.as_ref().map(|entity| RawControl {
        mode: Some("media_player".to_string()),
        media_player: Some(entity.clone()),
        mqtt: None,
    })
}

fn legacy_entities(legacy: LegacyFields) -> RawEntities {
    RawEntities {
        title_entity: legacy.last_title_entity,
        cover_entity: legacy.last_cover_entity,
        playback_entity: legacy.playback_entity,
        battery_entity: legacy.battery_entity,
        charging_entity: legacy.charging_entity,
        rssi_entity: legacy.rssi_entity,
    }
}
