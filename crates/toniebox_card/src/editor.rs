//! Visual editor support.
//!
//! The editor is a form over the structured configuration shape. [`FIELDS`]
//! describes the form; [`apply_edit`] writes one field and renormalizes, so an
//! edited legacy configuration comes back in structured shape.

use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

use crate::config::normalize;
use crate::config::CardConfig;
use crate::config::ConfigError;
use crate::config::ControlMode;

/// Input widget for a form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Selector {
    /// Entity picker limited to the given domains
    Entity { domains: &'static [&'static str] },
    Text,
    Boolean,
    /// Choice between `media_player` and `mqtt`
    ControlMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EditorField {
    /// Dotted path into the structured configuration
    pub key: &'static str,
    pub label: &'static str,
    pub selector: Selector,

    /// Only shown in this control mode
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<ControlMode>,
}

const fn field(key: &'static str, label: &'static str, selector: Selector) -> EditorField {
    EditorField {
        key,
        label,
        selector,
        mode: None,
    }
}

const fn mode_field(
    mode: ControlMode,
    key: &'static str,
    label: &'static str,
    selector: Selector,
) -> EditorField {
    EditorField {
        key,
        label,
        selector,
        mode: Some(mode),
    }
}

const SENSOR: Selector = Selector::Entity {
    domains: &["sensor"],
};

pub const FIELDS: &[EditorField] = &[
    field("name", "Name", Selector::Text),
    field("control.mode", "Control mode", Selector::ControlMode),
    mode_field(
        ControlMode::MediaPlayer,
        "control.media_player",
        "Media player",
        Selector::Entity {
            domains: &["media_player"],
        },
    ),
    mode_field(
        ControlMode::Mqtt,
        "control.mqtt.command_topic",
        "Command topic",
        Selector::Text,
    ),
    mode_field(ControlMode::Mqtt, "control.mqtt.play_payload", "Play payload", Selector::Text),
    mode_field(ControlMode::Mqtt, "control.mqtt.pause_payload", "Pause payload", Selector::Text),
    mode_field(ControlMode::Mqtt, "control.mqtt.next_payload", "Next payload", Selector::Text),
    mode_field(
        ControlMode::Mqtt,
        "control.mqtt.previous_payload",
        "Previous payload",
        Selector::Text,
    ),
    field("entities.title_entity", "Title", SENSOR),
    field("entities.cover_entity", "Cover URL", SENSOR),
    field(
        "entities.playback_entity",
        "Playback state",
        Selector::Entity {
            domains: &["sensor", "media_player"],
        },
    ),
    field("entities.battery_entity", "Battery", SENSOR),
    field(
        "entities.charging_entity",
        "Charging",
        Selector::Entity {
            domains: &["binary_sensor", "sensor"],
        },
    ),
    field("entities.rssi_entity", "Wi-Fi signal", SENSOR),
    field("show_battery", "Show battery", Selector::Boolean),
    field("show_rssi", "Show signal strength", Selector::Boolean),
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EditError {
    #[error("unknown editor field '{0}'")]
    UnknownField(String),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Fields to show for the configuration's current control mode.
pub fn fields_for(config: &CardConfig) -> impl Iterator<Item = &'static EditorField> {
    let mode = config.control.mode();
    FIELDS
        .iter()
        .filter(move |field| field.mode.is_none() || field.mode == Some(mode))
}

/// Set one field and return the renormalized configuration.
///
/// `null` clears a field back to its default.
pub fn apply_edit(config: &CardConfig, key: &str, value: Value) -> Result<CardConfig, EditError> {
    if !FIELDS.iter().any(|field| field.key == key) {
        return Err(EditError::UnknownField(key.to_string()));
    }

    let mut raw = config.to_raw()?;
    set_path(&mut raw, key, value);
    tracing::debug!("Editor set {}", key);
    Ok(normalize(&raw)?)
}

fn set_path(node: &mut Value, key: &str, value: Value) {
    if !node.is_object() {
        *node = Value::Object(Map::new());
    }
    let Value::Object(map) = node else {
        return;
    };
    match key.split_once('.') {
        None => {
            map.insert(key.to_string(), value);
        }
        Some((head, rest)) => {
            set_path(map.entry(head).or_insert(Value::Null), rest, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::config::ControlConfig;

    #[test]
    fn test_fields_follow_control_mode() {
        let config = CardConfig::stub();
        let keys: Vec<_> = fields_for(&config).map(|f| f.key).collect();
        assert!(keys.contains(&"control.media_player"));
        assert!(!keys.contains(&"control.mqtt.command_topic"));

        let config = apply_edit(&config, "control.mode", json!("mqtt")).unwrap();
        let keys: Vec<_> = fields_for(&config).map(|f| f.key).collect();
        assert!(!keys.contains(&"control.media_player"));
        assert!(keys.contains(&"control.mqtt.command_topic"));
        assert!(keys.contains(&"show_rssi"));
    }

    #[test]
    fn test_edit_mqtt_topic_after_switching_mode() {
        let config = apply_edit(&CardConfig::stub(), "control.mode", json!("mqtt")).unwrap();
        assert!(config.dispatch_target_missing());

        let config =
            apply_edit(&config, "control.mqtt.command_topic", json!("toniebox/cmd")).unwrap();
        match &config.control {
            ControlConfig::Mqtt { mqtt } => {
                assert_eq!(mqtt.command_topic.as_deref(), Some("toniebox/cmd"));
                assert_eq!(mqtt.play_payload, "play");
            }
            other => panic!("expected mqtt control, got {:?}", other),
        }
    }

    #[test]
    fn test_edit_entity_and_clear_it() {
        let config = apply_edit(
            &CardConfig::default(),
            "entities.battery_entity",
            json!("sensor.toniebox_battery"),
        )
        .unwrap();
        assert_eq!(
            config.entities.battery_entity.as_deref(),
            Some("sensor.toniebox_battery")
        );

        let config = apply_edit(&config, "entities.battery_entity", Value::Null).unwrap();
        assert_eq!(config.entities.battery_entity, None);
    }

    #[test]
    fn test_edit_boolean_and_name() {
        let config = apply_edit(&CardConfig::default(), "show_rssi", json!(true)).unwrap();
        assert!(config.show_rssi);

        let config = apply_edit(&config, "name", Value::Null).unwrap();
        assert_eq!(config.name, "Toniebox");
    }

    #[test]
    fn test_edit_unknown_field() {
        let err = apply_edit(&CardConfig::default(), "entities.volume", json!("x")).unwrap_err();
        assert_eq!(err, EditError::UnknownField("entities.volume".to_string()));
    }

    #[test]
    fn test_edit_invalid_mode() {
        let err = apply_edit(&CardConfig::default(), "control.mode", json!("zigbee")).unwrap_err();
        assert_eq!(
            err,
            EditError::Config(ConfigError::UnknownControlMode("zigbee".to_string()))
        );
    }

    #[test]
    fn test_edit_wrong_type() {
        let err = apply_edit(&CardConfig::default(), "show_battery", json!("yes")).unwrap_err();
        assert!(matches!(err, EditError::Config(ConfigError::Malformed(_))));
    }

    #[test]
    fn test_field_serialization() {
        let json = serde_json::to_value(FIELDS[2]).unwrap();
        assert_eq!(
            json,
            json!({
                "key": "control.media_player",
                "label": "Media player",
                "selector": {"kind": "entity", "domains": ["media_player"]},
                "mode": "media_player"
            })
        );

        let json = serde_json::to_value(FIELDS[0]).unwrap();
        assert!(json.get("mode").is_none());

        let modes: Vec<_> = FIELDS
            .iter()
            .filter_map(|field| serde_json::to_value(field).unwrap().get("mode").cloned())
            .collect();
        assert!(modes.contains(&json!("mqtt")));
    }
}
