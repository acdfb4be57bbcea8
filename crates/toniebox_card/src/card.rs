use std::io::Write;

use linkme::distributed_slice;
use serde_json::Value;

use crate::command;
use crate::command::Control;
use crate::command::Outbound;
use crate::config::normalize;
use crate::config::CardConfig;
use crate::config::ConfigError;
use crate::registry::CardDescriptor;
use crate::registry::CARDS;
use crate::render;
use crate::render::CARD_ELEMENT;
use crate::resolve;
use crate::resolve::DisplayModel;
use crate::state::Snapshot;

/// Receiver of the commands a card emits.
///
/// Delivery is fire-and-forget: the card does not wait for or track results.
pub trait Host {
    fn send(&mut self, outbound: Outbound);
}

/// Host that writes every command as one JSON line.
pub struct JsonLinesHost<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesHost<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> Host for JsonLinesHost<W> {
    fn send(&mut self, outbound: Outbound) {
        let result = serde_json::to_writer(&mut self.writer, &outbound)
            .map_err(std::io::Error::from)
            .and_then(|()| writeln!(self.writer));
        if let Err(e) = result {
            tracing::error!("Failed to write command {:?}: {}", outbound, e);
        }
    }
}

/// Host adapter for one card instance.
///
/// Holds the normalized configuration and the latest snapshot, and keeps the
/// display model in sync with both.
#[derive(Debug, Clone)]
pub struct Card {
    config: CardConfig,
    snapshot: Snapshot,
    model: DisplayModel,
}

impl Card {
    /// Rows the card occupies in a dashboard column.
    pub const SIZE: u32 = 2;

    pub fn new(raw: &Value) -> Result<Self, ConfigError> {
        Ok(Self::from_config(normalize(raw)?))
    }

    pub fn from_config(config: CardConfig) -> Self {
        let snapshot = Snapshot::new();
        let model = resolve::resolve(&config, &snapshot);
        Self {
            config,
            snapshot,
            model,
        }
    }

    /// Replace the configuration. On error the previous one stays in effect.
    pub fn set_config(&mut self, raw: &Value) -> Result<(), ConfigError> {
        self.config = normalize(raw)?;
        self.model = resolve::resolve(&self.config, &self.snapshot);
        Ok(())
    }

    /// Replace the snapshot and recompute the display model.
    pub fn set_state(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
        self.model = resolve::resolve(&self.config, &self.snapshot);
    }

    pub fn config(&self) -> &CardConfig {
        &self.config
    }

    pub fn model(&self) -> &DisplayModel {
        &self.model
    }

    pub fn markup(&self) -> String {
        render::render(&self.config, &self.model)
    }

    pub fn card_size(&self) -> u32 {
        Self::SIZE
    }

    /// Handle a playback button. Returns whether a command was sent.
    pub fn press(&self, control: Control, host: &mut impl Host) -> bool {
        self.forward(command::dispatch(control, &self.config, self.model.is_playing), host)
    }

    /// Handle a tap on the card body. Returns whether a command was sent.
    pub fn tap(&self, host: &mut impl Host) -> bool {
        self.forward(command::tap(&self.config), host)
    }

    fn forward(&self, outbound: Option<Outbound>, host: &mut impl Host) -> bool {
        match outbound {
            Some(outbound) => {
                host.send(outbound);
                true
            }
            None => false,
        }
    }
}

#[distributed_slice(CARDS)]
fn toniebox_mini_media_card() -> CardDescriptor {
    CardDescriptor {
        card_type: CARD_ELEMENT,
        name: "Toniebox Mini Media Card",
        description: "Compact media card for a Toniebox: cover, title, status, battery and charging.",
        stub: CardConfig::stub,
    }
}
