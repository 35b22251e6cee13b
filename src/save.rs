//! Override persistence - the per-player limit store as a JSON data file.
//! Save format is self-contained: dedicated serde structs decouple from the
//! runtime `PlayerOverride` type. Written wholesale, read wholesale.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{Result, TurretLimitError};
use crate::resources::{PlayerOverride, PlayerOverrideStore};

// ============================================================================
// SAVE FORMAT STRUCTS
// ============================================================================

/// Older data files store "use default" as -1. Any negative value reads as
/// absent; absent values are omitted when writing.
fn legacy_limit<'de, D: Deserializer<'de>>(d: D) -> std::result::Result<Option<u32>, D::Error> {
    let raw: Option<i64> = Option::deserialize(d)?;
    Ok(raw.and_then(|v| u32::try_from(v).ok()))
}

#[derive(Serialize, Deserialize, Default)]
struct PlayerOverrideSave {
    #[serde(rename = "AutoTurret", default, deserialize_with = "legacy_limit", skip_serializing_if = "Option::is_none")]
    auto_turret: Option<u32>,
    #[serde(rename = "FlameTurret", default, deserialize_with = "legacy_limit", skip_serializing_if = "Option::is_none")]
    flame_turret: Option<u32>,
    #[serde(rename = "ShotgunTrap", default, deserialize_with = "legacy_limit", skip_serializing_if = "Option::is_none")]
    shotgun_trap: Option<u32>,
}

impl From<&PlayerOverride> for PlayerOverrideSave {
    fn from(o: &PlayerOverride) -> Self {
        Self {
            auto_turret: o.auto_turret,
            flame_turret: o.flame_turret,
            shotgun_trap: o.shotgun_trap,
        }
    }
}

impl From<PlayerOverrideSave> for PlayerOverride {
    fn from(s: PlayerOverrideSave) -> Self {
        Self {
            auto_turret: s.auto_turret,
            flame_turret: s.flame_turret,
            shotgun_trap: s.shotgun_trap,
        }
    }
}

// ============================================================================
// READ / WRITE
// ============================================================================

pub fn write_store_to(store: &PlayerOverrideStore, path: &Path) -> Result<()> {
    let data: HashMap<u64, PlayerOverrideSave> = store
        .iter()
        .map(|(id, o)| (*id, PlayerOverrideSave::from(o)))
        .collect();
    let json = serde_json::to_string_pretty(&data).map_err(|e| TurretLimitError::json(path, e))?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| TurretLimitError::io(dir, e))?;
    }
    std::fs::write(path, json).map_err(|e| TurretLimitError::io(path, e))?;
    info!("Saved {} player override records to {}", store.len(), path.display());
    Ok(())
}

pub fn read_store_from(path: &Path) -> Result<PlayerOverrideStore> {
    let json = std::fs::read_to_string(path).map_err(|e| TurretLimitError::io(path, e))?;
    let data: HashMap<u64, PlayerOverrideSave> =
        serde_json::from_str(&json).map_err(|e| TurretLimitError::json(path, e))?;
    Ok(PlayerOverrideStore::from_map(
        data.into_iter().map(|(id, s)| (id, s.into())).collect(),
    ))
}

/// Startup load. A missing file is a fresh server; an unreadable or corrupt
/// file is reported and replaced by an empty store.
pub fn load_store(path: &Path) -> PlayerOverrideStore {
    if !path.exists() {
        info!("No player override data at {}; starting empty", path.display());
        return PlayerOverrideStore::default();
    }
    match read_store_from(path) {
        Ok(store) => {
            info!("Loaded {} player override records", store.len());
            store
        }
        Err(e) => {
            warn!("Failed to load player overrides: {e}; starting empty");
            PlayerOverrideStore::default()
        }
    }
}

/// Write-through save used after every mutation and at shutdown.
/// Failures are reported, never retried.
pub fn persist_store(store: &PlayerOverrideStore, path: &Path) {
    if let Err(e) = write_store_to(store, path) {
        warn!("Failed to save player overrides: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::structures::StructureClass;

    #[test]
    fn store_survives_a_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("overrides.json");
        let mut store = PlayerOverrideStore::default();
        store.set_override(76561198000000001, StructureClass::FlameTurret, 5);
        store.set_override(42, StructureClass::AutoTurret, 0);
        write_store_to(&store, &path).unwrap();

        let reloaded = read_store_from(&path).unwrap();
        assert_eq!(reloaded, store);
    }

    #[test]
    fn legacy_sentinels_read_as_absent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.json");
        std::fs::write(&path, r#"{ "99": { "AutoTurret": -1, "FlameTurret": 4, "ShotgunTrap": -1 } }"#).unwrap();

        let store = read_store_from(&path).unwrap();
        let o = store.get(99).unwrap();
        assert_eq!(o.auto_turret, None);
        assert_eq!(o.flame_turret, Some(4));
        assert_eq!(o.shotgun_trap, None);
    }

    #[test]
    fn unset_fields_are_not_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.json");
        let mut store = PlayerOverrideStore::default();
        store.set_override(5, StructureClass::ShotgunTrap, 2);
        write_store_to(&store, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("ShotgunTrap"));
        assert!(!text.contains("AutoTurret"));
    }

    #[test]
    fn corrupt_file_falls_back_to_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();
        assert!(read_store_from(&path).is_err());
        assert!(load_store(&path).is_empty());
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_store(&dir.path().join("nope.json")).is_empty());
    }
}
