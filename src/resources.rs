//! ECS Resources - Override store and file locations shared by all systems

use bevy::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::constants::{CONFIG_FILE, DATA_FILE, LANG_DIR};
use crate::structures::StructureClass;

/// One player's personal limits. `None` defers to the server default.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PlayerOverride {
    pub auto_turret: Option<u32>,
    pub flame_turret: Option<u32>,
    pub shotgun_trap: Option<u32>,
}

impl PlayerOverride {
    /// Override for `class`. SAM sites never have one.
    pub fn get(&self, class: StructureClass) -> Option<u32> {
        match class {
            StructureClass::AutoTurret => self.auto_turret,
            StructureClass::FlameTurret => self.flame_turret,
            StructureClass::ShotgunTrap => self.shotgun_trap,
            StructureClass::SamSite => None,
        }
    }

    /// Set the override for `class`. Returns false (and changes nothing) for
    /// classes without an override slot.
    pub fn set(&mut self, class: StructureClass, value: u32) -> bool {
        let slot = match class {
            StructureClass::AutoTurret => &mut self.auto_turret,
            StructureClass::FlameTurret => &mut self.flame_turret,
            StructureClass::ShotgunTrap => &mut self.shotgun_trap,
            StructureClass::SamSite => return false,
        };
        *slot = Some(value);
        true
    }
}

/// Per-player overrides keyed by player id.
/// Private map; mutation goes through `set_override` so records are only
/// created by a successful override.
#[derive(Resource, Default, Debug, Clone, PartialEq)]
pub struct PlayerOverrideStore {
    players: HashMap<u64, PlayerOverride>,
}

impl PlayerOverrideStore {
    pub fn from_map(players: HashMap<u64, PlayerOverride>) -> Self {
        Self { players }
    }

    pub fn get(&self, player: u64) -> Option<&PlayerOverride> {
        self.players.get(&player)
    }

    pub fn override_for(&self, player: u64, class: StructureClass) -> Option<u32> {
        self.players.get(&player).and_then(|o| o.get(class))
    }

    /// Record an override, creating the player's record on first use.
    /// Returns false for classes that cannot be overridden.
    pub fn set_override(&mut self, player: u64, class: StructureClass, value: u32) -> bool {
        if !class.overridable() {
            return false;
        }
        self.players.entry(player).or_default().set(class, value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&u64, &PlayerOverride)> {
        self.players.iter()
    }

    pub fn len(&self) -> usize { self.players.len() }
    pub fn is_empty(&self) -> bool { self.players.is_empty() }
}

/// Where the plugin reads and writes its files.
#[derive(Resource, Clone, Debug)]
pub struct TurretLimitsPaths {
    pub config: PathBuf,
    pub data: PathBuf,
    pub lang_dir: PathBuf,
}

impl Default for TurretLimitsPaths {
    fn default() -> Self {
        Self {
            config: PathBuf::from(CONFIG_FILE),
            data: PathBuf::from(DATA_FILE),
            lang_dir: PathBuf::from(LANG_DIR),
        }
    }
}

impl TurretLimitsPaths {
    /// All files under one root directory, keeping the default relative layout.
    pub fn under(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            config: root.join(CONFIG_FILE),
            data: root.join(DATA_FILE),
            lang_dir: root.join(LANG_DIR),
        }
    }
}
