use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;

/// Current state of a single host entity.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EntityState {
    /// Primary value, always a string on the host side
    pub state: String,

    /// Auxiliary key/value data (track title, artwork, ...)
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

impl EntityState {
    pub fn new(state: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            attributes: Map::new(),
        }
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// String attribute; non-string values count as absent.
    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attribute(key).and_then(Value::as_str)
    }
}

/// Snapshot of all entity states pushed by the host.
///
/// Deserializes from either a map keyed by entity id or the host's state list
/// (`[{"entity_id": ..., "state": ..., "attributes": {...}}]`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "SnapshotRepr")]
pub struct Snapshot {
    states: HashMap<String, EntityState>,
}

impl Snapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and fixtures.
    pub fn with(mut self, entity_id: impl Into<String>, state: EntityState) -> Self {
        self.insert(entity_id, state);
        self
    }

    pub fn insert(&mut self, entity_id: impl Into<String>, state: EntityState) {
        self.states.insert(entity_id.into(), state);
    }

    /// Look up an optional entity id. Unset ids and unknown entities are `None`.
    pub fn get(&self, entity_id: Option<&str>) -> Option<&EntityState> {
        entity_id.and_then(|id| self.states.get(id))
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }
}

impl FromIterator<(String, EntityState)> for Snapshot {
    fn from_iter<T: IntoIterator<Item = (String, EntityState)>>(iter: T) -> Self {
        Self {
            states: iter.into_iter().collect(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SnapshotRepr {
    Map(HashMap<String, EntityState>),
    List(Vec<ListedState>),
}

#[derive(Deserialize)]
struct ListedState {
    entity_id: String,
    #[serde(flatten)]
    state: EntityState,
}

impl From<SnapshotRepr> for Snapshot {
    fn from(repr: SnapshotRepr) -> Self {
        match repr {
            SnapshotRepr::Map(states) => Self { states },
            SnapshotRepr::List(list) => list
                .into_iter()
                .map(|listed| (listed.entity_id, listed.state))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_from_map() {
        let snapshot: Snapshot = serde_json::from_str(
            r#"{
                "media_player.toniebox": {
                    "state": "playing",
                    "attributes": {"media_title": "Bibi Blocksberg"}
                },
                "sensor.toniebox_battery": {"state": "87"}
            }"#,
        )
        .unwrap();

        assert_eq!(snapshot.len(), 2);
        let player = snapshot.get(Some("media_player.toniebox")).unwrap();
        assert_eq!(player.state, "playing");
        assert_eq!(player.attribute_str("media_title"), Some("Bibi Blocksberg"));

        let battery = snapshot.get(Some("sensor.toniebox_battery")).unwrap();
        assert!(battery.attributes.is_empty());
    }

    #[test]
    fn test_snapshot_from_state_list() {
        let snapshot: Snapshot = serde_json::from_str(
            r#"[
                {
                    "entity_id": "binary_sensor.toniebox_charging",
                    "state": "on",
                    "attributes": {"device_class": "battery_charging"},
                    "last_changed": "2026-10-19T08:00:00+00:00"
                },
                {"entity_id": "sensor.toniebox_wifi_rssi", "state": "-61"}
            ]"#,
        )
        .unwrap();

        assert_eq!(snapshot.len(), 2);
        assert_eq!(
            snapshot
                .get(Some("binary_sensor.toniebox_charging"))
                .unwrap()
                .attribute_str("device_class"),
            Some("battery_charging")
        );
        assert_eq!(
            snapshot.get(Some("sensor.toniebox_wifi_rssi")).unwrap().state,
            "-61"
        );
    }

    #[test]
    fn test_get_unset_or_unknown_entity() {
        let snapshot = Snapshot::new().with("sensor.a", EntityState::new("1"));
        assert!(snapshot.get(None).is_none());
        assert!(snapshot.get(Some("sensor.b")).is_none());
        assert!(snapshot.get(Some("sensor.a")).is_some());
    }

    #[test]
    fn test_non_string_attribute_is_not_a_string() {
        let state = EntityState::new("on").with_attribute("charging", true);
        assert_eq!(state.attribute_str("charging"), None);
        assert_eq!(state.attribute("charging"), Some(&Value::Bool(true)));
    }
}
