//! Display model resolution.
//!
//! [`resolve`] turns a card configuration and the host's state snapshot into
//! everything the card shows. It never fails: missing entities and unparsable
//! sensor values fall back to placeholders or absent values.

mod numeric;


use serde::Serialize;
use serde_json::Value;

pub use numeric::parse_float_prefix;
pub use numeric::parse_rounded;

use crate::config::CardConfig;
use crate::state::EntityState;
use crate::state::Snapshot;

/// Title shown when nothing provides one.
pub const TITLE_PLACEHOLDER: &str = "—";

/// Playback state when neither the playback sensor nor the player reports one.
pub const UNAVAILABLE: &str = "unavailable";

/// Sensor value that means "no cover" rather than a URL.
const UNKNOWN_COVER: &str = "unknown";

const PLAYING_STATES: &[&str] = &["playing", "play"];
const PAUSED_STATES: &[&str] = &["paused"];
const IDLE_STATES: &[&str] = &["idle", "off", "standby"];

/// Media player attributes that may carry artwork, in priority order.
const PICTURE_ATTRIBUTES: &[&str] = &["entity_picture", "media_image_url"];

/// Everything the card renders, rebuilt on every snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayModel {
    pub title: String,
    pub cover_url: Option<String>,

    /// Lower-cased playback state token
    pub playback_state: String,
    pub is_playing: bool,
    pub is_paused: bool,
    pub is_idle: bool,

    pub is_charging: bool,
    pub battery_percent: Option<i64>,

    /// Wi-Fi signal strength in dBm
    pub signal_strength: Option<i64>,
}

impl DisplayModel {
    /// Battery level formatted for display, e.g. `88%`.
    pub fn battery_label(&self) -> Option<String> {
        self.battery_percent.map(|pct| format!("{}%", pct))
    }

    /// Signal strength formatted for display, e.g. `-61 dBm`.
    pub fn signal_label(&self) -> Option<String> {
        self.signal_strength.map(|dbm| format!("{} dBm", dbm))
    }
}

/// Resolve the display model for a configuration against a snapshot.
pub fn resolve(config: &CardConfig, snapshot: &Snapshot) -> DisplayModel {
    let entities = &config.entities;

    let player = snapshot.get(config.control.media_player());
    let title_sensor = snapshot.get(entities.title_entity.as_deref());
    let cover_sensor = snapshot.get(entities.cover_entity.as_deref());
    let playback_sensor = snapshot.get(entities.playback_entity.as_deref());
    let battery = snapshot.get(entities.battery_entity.as_deref());
    let charging = snapshot.get(entities.charging_entity.as_deref());
    let rssi = snapshot.get(entities.rssi_entity.as_deref());

    let title = player
        .and_then(|p| non_empty(p.attribute_str("media_title")))
        .or_else(|| title_sensor.and_then(|s| non_empty(Some(s.state.as_str()))))
        .unwrap_or(TITLE_PLACEHOLDER)
        .to_string();

    let cover_url = cover_sensor
        .and_then(|s| non_empty(Some(s.state.as_str())))
        .filter(|url| *url != UNKNOWN_COVER)
        .or_else(|| player.and_then(player_picture))
        .map(str::to_string);

    let playback_state = playback_sensor
        .and_then(|s| non_empty(Some(s.state.as_str())))
        .or_else(|| player.and_then(|p| non_empty(Some(p.state.as_str()))))
        .unwrap_or(UNAVAILABLE)
        .to_lowercase();

    let is_charging = charging.is_some_and(|c| c.state.eq_ignore_ascii_case("on"))
        || battery.is_some_and(|b| b.attribute("charging") == Some(&Value::Bool(true)));

    let model = DisplayModel {
        is_playing: PLAYING_STATES.contains(&playback_state.as_str()),
        is_paused: PAUSED_STATES.contains(&playback_state.as_str()),
        is_idle: IDLE_STATES.contains(&playback_state.as_str()),
        title,
        cover_url,
        playback_state,
        is_charging,
        battery_percent: battery.and_then(|b| parse_rounded(&b.state)),
        signal_strength: rssi.and_then(|r| parse_rounded(&r.state)),
    };

    tracing::debug!(
        "Resolved '{}': state={}, title={:?}, battery={:?}, rssi={:?}",
        config.name,
        model.playback_state,
        model.title,
        model.battery_percent,
        model.signal_strength
    );

    model
}

fn player_picture(player: &EntityState) -> Option<&str> {
    PICTURE_ATTRIBUTES
        .iter()
        .find_map(|key| non_empty(player.attribute_str(key)))
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
