use std::path::Path;

use serde_json::Value;

use super::card::normalize;
use super::CardConfig;
use super::LoadError;
use crate::state::Snapshot;

/// Load and normalize a card configuration file.
///
/// `.json` files are read as JSON, everything else as TOML. TOML documents
/// are converted to JSON values before normalization.
pub fn load_card_file(path: impl AsRef<Path>) -> Result<CardConfig, LoadError> {
    let path = path.as_ref();
    let contents =
        std::fs::read_to_string(path).map_err(|e| LoadError::Io(path.to_path_buf(), e))?;

    let raw: Value = if is_json(path) {
        serde_json::from_str(&contents)?
    } else {
        let document: toml::Value = toml::from_str(&contents)?;
        serde_json::to_value(document)?
    };

    tracing::debug!("Loaded card configuration from {}", path.display());
    Ok(normalize(&raw)?)
}

/// Load a state snapshot from a JSON file.
pub fn load_snapshot_file(path: impl AsRef<Path>) -> Result<Snapshot, LoadError> {
    let path = path.as_ref();
    let contents =
        std::fs::read_to_string(path).map_err(|e| LoadError::Io(path.to_path_buf(), e))?;

    let snapshot: Snapshot = serde_json::from_str(&contents)?;
    tracing::debug!(
        "Loaded {} entity states from {}",
        snapshot.len(),
        path.display()
    );
    Ok(snapshot)
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}
