//! Card registration.
//!
//! Card types contribute a descriptor to [`CARDS`] at link time. Nothing is
//! registered until the host calls [`register_cards`] on its own
//! [`CardRegistry`], once at startup.

use linkme::distributed_slice;
use serde::Serialize;

use crate::config::CardConfig;

/// What the host's card picker shows for a card type.
#[derive(Debug, Clone, Serialize)]
pub struct CardDescriptor {
    #[serde(rename = "type")]
    pub card_type: &'static str,
    pub name: &'static str,
    pub description: &'static str,

    /// Configuration used when the card is first added
    #[serde(skip)]
    pub stub: fn() -> CardConfig,
}

#[distributed_slice]
pub static CARDS: [fn() -> CardDescriptor];

/// Card types known to a host.
#[derive(Debug, Default)]
pub struct CardRegistry {
    cards: Vec<CardDescriptor>,
}

impl CardRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a card type. Returns false if the type was already known.
    pub fn register(&mut self, descriptor: CardDescriptor) -> bool {
        if self.get(descriptor.card_type).is_some() {
            tracing::warn!("Card type '{}' is already registered", descriptor.card_type);
            return false;
        }
        tracing::debug!("Registered card type '{}'", descriptor.card_type);
        self.cards.push(descriptor);
        true
    }

    pub fn get(&self, card_type: &str) -> Option<&CardDescriptor> {
        self.cards.iter().find(|d| d.card_type == card_type)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CardDescriptor> {
        self.cards.iter()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

/// Register every card type linked into the binary. Returns how many were new.
pub fn register_cards(registry: &mut CardRegistry) -> usize {
    let mut added = 0;
    for descriptor in CARDS {
        if registry.register(descriptor()) {
            added += 1;
        }
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_cards() {
        let mut registry = CardRegistry::new();
        assert!(registry.is_empty());

        assert_eq!(register_cards(&mut registry), 1);
        let card = registry.get("toniebox-mini-media-card").unwrap();
        assert_eq!(card.name, "Toniebox Mini Media Card");
        assert_eq!(
            (card.stub)().control.media_player(),
            Some("media_player.toniebox")
        );
    }

    #[test]
    fn test_register_twice_is_idempotent() {
        let mut registry = CardRegistry::new();
        register_cards(&mut registry);
        assert_eq!(register_cards(&mut registry), 0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_descriptor_serialization() {
        let mut registry = CardRegistry::new();
        register_cards(&mut registry);
        let json = serde_json::to_value(registry.iter().next().unwrap()).unwrap();
        assert_eq!(json["type"], "toniebox-mini-media-card");
        assert!(json.get("stub").is_none());
    }
}
