//! Server configuration - global turret limits and toggles, persisted as JSON.
//!
//! The file keeps the nested layout server owners already know:
//! `Config/Disable All Turrets`, `Limits/Individual Control/AutoTurret/Maximum`, ...
//! Missing keys and invalid values are filled from defaults and the file is
//! re-saved.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

use crate::census::CountingStrategy;
use crate::constants::DEFAULT_STRUCTURE_LIMIT;
use crate::error::{Result, TurretLimitError};
use crate::structures::StructureClass;

// ============================================================================
// RUNTIME CONFIG
// ============================================================================

/// Global limits and toggles. Loaded once at startup and never mutated after;
/// systems read it through `Res<GlobalConfig>`.
#[derive(Resource, Clone, Debug, PartialEq)]
pub struct GlobalConfig {
    pub auto_turret_limit: u32,
    pub flame_turret_limit: u32,
    pub shotgun_trap_limit: u32,
    pub sam_site_limit: u32,
    /// Deny every turret placement server-wide.
    pub disable_all_turrets: bool,
    /// Admins skip every limit check.
    pub allow_admin_bypass: bool,
    pub counting: CountingStrategy,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            auto_turret_limit: DEFAULT_STRUCTURE_LIMIT,
            flame_turret_limit: DEFAULT_STRUCTURE_LIMIT,
            shotgun_trap_limit: DEFAULT_STRUCTURE_LIMIT,
            sam_site_limit: DEFAULT_STRUCTURE_LIMIT,
            disable_all_turrets: false,
            allow_admin_bypass: false,
            counting: CountingStrategy::Legacy,
        }
    }
}

impl GlobalConfig {
    pub fn default_limit(&self, class: StructureClass) -> u32 {
        match class {
            StructureClass::AutoTurret => self.auto_turret_limit,
            StructureClass::FlameTurret => self.flame_turret_limit,
            StructureClass::ShotgunTrap => self.shotgun_trap_limit,
            StructureClass::SamSite => self.sam_site_limit,
        }
    }
}

// ============================================================================
// FILE LAYOUT
// ============================================================================

#[derive(Serialize, Deserialize)]
struct ConfigFile {
    #[serde(rename = "Config")]
    toggles: TogglesSection,
    #[serde(rename = "Limits")]
    limits: LimitsSection,
}

#[derive(Serialize, Deserialize)]
struct TogglesSection {
    #[serde(rename = "Disable All Turrets")]
    disable_all_turrets: bool,
    #[serde(rename = "Admin Can Bypass Build Restrictions")]
    allow_admin_bypass: bool,
    #[serde(rename = "Counting Strategy")]
    counting: CountingStrategy,
}

#[derive(Serialize, Deserialize)]
struct LimitsSection {
    #[serde(rename = "Individual Control")]
    individual: IndividualControl,
}

#[derive(Serialize, Deserialize)]
struct IndividualControl {
    #[serde(rename = "AutoTurret")]
    auto_turret: Maximum,
    #[serde(rename = "Flame Turret")]
    flame_turret: Maximum,
    #[serde(rename = "Shotgun Trap")]
    shotgun_trap: Maximum,
    #[serde(rename = "Sam Site Turret")]
    sam_site: Maximum,
}

#[derive(Serialize, Deserialize)]
struct Maximum {
    #[serde(rename = "Maximum")]
    maximum: u32,
}

impl From<&GlobalConfig> for ConfigFile {
    fn from(c: &GlobalConfig) -> Self {
        Self {
            toggles: TogglesSection {
                disable_all_turrets: c.disable_all_turrets,
                allow_admin_bypass: c.allow_admin_bypass,
                counting: c.counting,
            },
            limits: LimitsSection {
                individual: IndividualControl {
                    auto_turret: Maximum { maximum: c.auto_turret_limit },
                    flame_turret: Maximum { maximum: c.flame_turret_limit },
                    shotgun_trap: Maximum { maximum: c.shotgun_trap_limit },
                    sam_site: Maximum { maximum: c.sam_site_limit },
                },
            },
        }
    }
}

impl From<ConfigFile> for GlobalConfig {
    fn from(f: ConfigFile) -> Self {
        let ic = f.limits.individual;
        Self {
            auto_turret_limit: ic.auto_turret.maximum,
            flame_turret_limit: ic.flame_turret.maximum,
            shotgun_trap_limit: ic.shotgun_trap.maximum,
            sam_site_limit: ic.sam_site.maximum,
            disable_all_turrets: f.toggles.disable_all_turrets,
            allow_admin_bypass: f.toggles.allow_admin_bypass,
            counting: f.toggles.counting,
        }
    }
}

// ============================================================================
// LOAD / SAVE
// ============================================================================

/// Whether `value` can stand in for `default`: same JSON kind, limits within
/// a non-negative `i32`, strings naming a counting strategy.
fn fits(value: &serde_json::Value, default: &serde_json::Value) -> bool {
    use serde_json::Value;
    match default {
        Value::Bool(_) => value.is_boolean(),
        Value::Number(_) => value.as_u64().is_some_and(|n| i32::try_from(n).is_ok()),
        Value::String(_) => serde_json::from_value::<CountingStrategy>(value.clone()).is_ok(),
        Value::Object(_) => value.is_object(),
        _ => true,
    }
}

/// Copy every key present in `defaults` but absent from `target` into `target`,
/// and reset every value that does not fit its default. Returns the
/// slash-joined paths of the keys that were added or reset.
fn fill_missing(target: &mut serde_json::Value, defaults: &serde_json::Value, prefix: &str, added: &mut Vec<String>) {
    let (Some(target), Some(defaults)) = (target.as_object_mut(), defaults.as_object()) else { return };
    for (key, default_value) in defaults {
        let path = if prefix.is_empty() { key.clone() } else { format!("{prefix}/{key}") };
        match target.get_mut(key) {
            Some(existing) if existing.is_object() && default_value.is_object() => {
                fill_missing(existing, default_value, &path, added);
            }
            Some(existing) if fits(existing, default_value) => {}
            Some(existing) => {
                warn!("Reset invalid config field: {path}");
                *existing = default_value.clone();
                added.push(path);
            }
            None => {
                target.insert(key.clone(), default_value.clone());
                added.push(path);
            }
        }
    }
}

/// Parse config text, filling missing keys and resetting invalid values from
/// defaults. Returns the config and the list of key paths that were touched.
/// Fails only on text that is not a JSON object.
pub fn parse_config(text: &str) -> serde_json::Result<(GlobalConfig, Vec<String>)> {
    let mut value: serde_json::Value = serde_json::from_str(text)?;
    let defaults = serde_json::to_value(ConfigFile::from(&GlobalConfig::default()))?;
    let mut added = Vec::new();
    fill_missing(&mut value, &defaults, "", &mut added);
    let file: ConfigFile = serde_json::from_value(value)?;
    Ok((file.into(), added))
}

pub fn save_config(config: &GlobalConfig, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&ConfigFile::from(config))
        .map_err(|e| TurretLimitError::json(path, e))?;
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| TurretLimitError::io(dir, e))?;
    }
    std::fs::write(path, json).map_err(|e| TurretLimitError::io(path, e))
}

/// Load the config, generating it when absent and re-saving it when keys were
/// missing or invalid. A file that is not JSON is left alone and defaults are
/// used.
pub fn load_or_create_config(path: &Path) -> GlobalConfig {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(_) => {
            warn!("Generating new config file at {}", path.display());
            let config = GlobalConfig::default();
            if let Err(e) = save_config(&config, path) {
                warn!("Failed to write config: {e}");
            }
            return config;
        }
    };

    match parse_config(&text) {
        Ok((config, added)) => {
            for field in &added {
                warn!("Added field to config: {field}");
            }
            if !added.is_empty() {
                if let Err(e) = save_config(&config, path) {
                    warn!("Failed to re-save config: {e}");
                }
            }
            info!("Loaded turret limits config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("Failed to parse {}: {e}; using defaults", path.display());
            GlobalConfig::default()
        }
    }
}
