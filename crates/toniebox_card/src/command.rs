//! Command dispatch.
//!
//! Button presses and taps are turned into [`Outbound`] descriptors. Executing
//! them is left to the host, so everything here is pure and side-effect free
//! apart from logging.

use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use strum::Display;
use strum::EnumString;

use crate::config::CardConfig;
use crate::config::ControlConfig;
use crate::config::MqttControl;
use crate::config::TapActionKind;

/// Domain of player control services.
pub const MEDIA_PLAYER_DOMAIN: &str = "media_player";

/// Event name for opening the host's detail view.
pub const MORE_INFO_EVENT: &str = "hass-more-info";

/// Publishes are fire-and-forget, never retained.
pub const PUBLISH_QOS: u8 = 0;
pub const PUBLISH_RETAIN: bool = false;

/// The three playback buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, Serialize)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Control {
    Previous,
    PlayOrPause,
    Next,
}

/// Named player operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize)]
#[strum(serialize_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PlayerOperation {
    Play,
    Pause,
    NextTrack,
    PreviousTrack,
}

impl PlayerOperation {
    /// Host service implementing this operation.
    pub fn service(&self) -> &'static str {
        match self {
            PlayerOperation::Play => "media_play",
            PlayerOperation::Pause => "media_pause",
            PlayerOperation::NextTrack => "media_next_track",
            PlayerOperation::PreviousTrack => "media_previous_track",
        }
    }
}

/// A request for the host to carry out.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Outbound {
    /// Control a media player entity
    PlayerControl {
        entity_id: String,
        operation: PlayerOperation,
    },

    /// Publish a message through the host's messaging bridge
    Publish {
        topic: String,
        payload: String,
        qos: u8,
        retain: bool,
    },

    /// Open the detail view for an entity
    MoreInfo { entity_id: String },

    /// Call an arbitrary service
    CallService {
        domain: String,
        service: String,
        data: Map<String, Value>,
    },
}

/// A generic `domain.service` call with its payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServiceCall {
    pub domain: String,
    pub service: String,
    pub data: Map<String, Value>,
}

impl Outbound {
    /// The service call equivalent, for hosts that only speak services.
    pub fn service_call(&self) -> Option<ServiceCall> {
        match self {
            Outbound::PlayerControl {
                entity_id,
                operation,
            } => {
                let mut data = Map::new();
                data.insert("entity_id".to_string(), Value::String(entity_id.clone()));
                Some(ServiceCall {
                    domain: MEDIA_PLAYER_DOMAIN.to_string(),
                    service: operation.service().to_string(),
                    data,
                })
            }
            Outbound::CallService {
                domain,
                service,
                data,
            } => Some(ServiceCall {
                domain: domain.clone(),
                service: service.clone(),
                data: data.clone(),
            }),
            Outbound::Publish { .. } | Outbound::MoreInfo { .. } => None,
        }
    }

    /// Event name and detail, for commands delivered as UI events.
    pub fn event(&self) -> Option<(&'static str, Value)> {
        match self {
            Outbound::MoreInfo { entity_id } => {
                Some((MORE_INFO_EVENT, serde_json::json!({ "entityId": entity_id })))
            }
            _ => None,
        }
    }
}

/// Translate a button press into a command for the configured backend.
///
/// Returns `None` when the backend has no target configured. That case is
/// logged and otherwise ignored.
pub fn dispatch(control: Control, config: &CardConfig, is_playing: bool) -> Option<Outbound> {
    let outbound = match &config.control {
        ControlConfig::MediaPlayer { media_player } => {
            let Some(entity_id) = media_player else {
                tracing::warn!("Ignoring {}: no media player configured", control);
                return None;
            };
            Outbound::PlayerControl {
                entity_id: entity_id.clone(),
                operation: player_operation(control, is_playing),
            }
        }
        ControlConfig::Mqtt { mqtt } => {
            let Some(topic) = &mqtt.command_topic else {
                tracing::warn!("Ignoring {}: no MQTT command topic configured", control);
                return None;
            };
            Outbound::Publish {
                topic: topic.clone(),
                payload: mqtt_payload(mqtt, control, is_playing).to_string(),
                qos: PUBLISH_QOS,
                retain: PUBLISH_RETAIN,
            }
        }
    };

    tracing::debug!("Dispatching {} as {:?}", control, outbound);
    Some(outbound)
}

fn player_operation(control: Control, is_playing: bool) -> PlayerOperation {
    match control {
        Control::Previous => PlayerOperation::PreviousTrack,
        Control::Next => PlayerOperation::NextTrack,
        Control::PlayOrPause if is_playing => PlayerOperation::Pause,
        Control::PlayOrPause => PlayerOperation::Play,
    }
}

fn mqtt_payload(mqtt: &MqttControl, control: Control, is_playing: bool) -> &str {
    match player_operation(control, is_playing) {
        PlayerOperation::Play => mqtt.play_payload.as_str(),
        PlayerOperation::Pause => mqtt.pause_payload.as_str(),
        PlayerOperation::NextTrack => mqtt.next_payload.as_str(),
        PlayerOperation::PreviousTrack => mqtt.previous_payload.as_str(),
    }
}

/// Translate a tap on the card body into a command.
pub fn tap(config: &CardConfig) -> Option<Outbound> {
    let tap_action = &config.tap_action;
    match tap_action.action {
        TapActionKind::MoreInfo => {
            let Some(entity_id) = config.primary_entity() else {
                tracing::debug!("Tap ignored: no entity to show details for");
                return None;
            };
            Some(Outbound::MoreInfo {
                entity_id: entity_id.to_string(),
            })
        }
        TapActionKind::CallService => {
            let Some(service) = tap_action.service.as_deref() else {
                tracing::warn!("Tap ignored: call-service without a service");
                return None;
            };
            let Some((domain, service)) = service.split_once('.') else {
                tracing::warn!("Tap ignored: service '{}' is not domain.service", service);
                return None;
            };
            Some(Outbound::CallService {
                domain: domain.to_string(),
                service: service.to_string(),
                data: tap_action.service_data.clone(),
            })
        }
        TapActionKind::None => None,
    }
}
