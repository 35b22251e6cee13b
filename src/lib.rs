//! Turret Limits - per-building turret placement limits for a Bevy game server.
//! Hooks the host's construction validation; players may lower or raise their
//! own limits with `/setlimit`.

// ============================================================================
// MODULES
// ============================================================================

pub mod census;
pub mod commands;
pub mod constants;
pub mod error;
pub mod lang;
pub mod limits;
pub mod messages;
pub mod resources;
pub mod save;
pub mod settings;
pub mod structures;
pub mod systems;
pub mod world;

// ============================================================================
// IMPORTS
// ============================================================================

use bevy::prelude::*;
use std::marker::PhantomData;

use census::BuildingCensus;
use lang::Lang;
use messages::*;
use resources::*;
use settings::GlobalConfig;
use systems::*;

pub use census::{BuildingId, CountingStrategy};
pub use error::TurretLimitError;
pub use structures::StructureClass;
pub use world::StructureWorld;

// ============================================================================
// PLUGIN
// ============================================================================

/// System execution phases. Commands run first so an override typed this
/// frame already applies to placements validated this frame.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurretLimitsSet {
    Commands,
    Validate,
}

/// Adds turret placement limits to an app whose building graph is the
/// resource `C`. The host inserts `C` and feeds `PlacementRequest` /
/// `ChatCommand` messages; it reads `PlacementVerdict` / `ChatReply`.
pub struct TurretLimitsPlugin<C> {
    pub paths: TurretLimitsPaths,
    census: PhantomData<fn() -> C>,
}

impl<C> TurretLimitsPlugin<C> {
    pub fn new(paths: TurretLimitsPaths) -> Self {
        Self { paths, census: PhantomData }
    }
}

impl<C> Default for TurretLimitsPlugin<C> {
    fn default() -> Self {
        Self::new(TurretLimitsPaths::default())
    }
}

impl<C: BuildingCensus + Resource> Plugin for TurretLimitsPlugin<C> {
    fn build(&self, app: &mut App) {
        app.add_message::<PlacementRequest>()
           .add_message::<PlacementVerdict>()
           .add_message::<ChatCommand>()
           .add_message::<ChatReply>()
           .add_message::<AppExit>()
           .insert_resource(self.paths.clone())
           .init_resource::<GlobalConfig>()
           .init_resource::<PlayerOverrideStore>()
           .init_resource::<Lang>()
           .configure_sets(Update, (TurretLimitsSet::Commands, TurretLimitsSet::Validate).chain())
           .add_systems(Startup, load_turret_limits_system)
           .add_systems(Update, setlimit_command_system.in_set(TurretLimitsSet::Commands))
           .add_systems(Update, placement_validation_system::<C>.in_set(TurretLimitsSet::Validate))
           .add_systems(Last, save_on_exit_system);
    }
}
