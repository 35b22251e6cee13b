//! Building census - host capability for counting existing structures.
//!
//! The host owns the building graph. The plugin only asks it three things:
//! which building covers a position, whether a player is authorized on it, and
//! how many structures of a class that building already holds.

use bevy::math::Vec3;
use serde::{Deserialize, Serialize};

use crate::structures::StructureClass;

/// Host-assigned building identity. Only ever compared for equality.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct BuildingId(pub u64);

/// Queries the plugin needs from the host's building graph.
pub trait BuildingCensus {
    /// Building whose privilege covers `position`, if any.
    fn resolve_building(&self, position: Vec3) -> Option<BuildingId>;

    /// Whether `player` holds building authorization on `building`.
    fn is_authorized(&self, player: u64, building: BuildingId) -> bool;

    /// Deployed structures of `class` within `radius` of `origin` whose own
    /// building privilege resolves to `building`. Each entity counts once.
    fn count_by_radius(&self, class: StructureClass, origin: Vec3, radius: f32, building: BuildingId) -> usize;

    /// Members of `building`'s decay-entity collection that are of `class`.
    fn count_by_membership(&self, class: StructureClass, building: BuildingId) -> usize;
}

/// Which census query counts each structure class.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
pub enum CountingStrategy {
    /// Radius query for auto turrets and SAM sites, building membership for
    /// flame turrets and shotgun traps. Matches long-standing server behavior.
    #[default]
    Legacy,
    /// Building membership for every class (true building-wide counts).
    Membership,
    /// Radius query around the requester for every class.
    Radius,
}

/// How a single class is counted under a strategy.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CountMethod {
    Radius,
    Membership,
}

impl CountingStrategy {
    pub fn method_for(self, class: StructureClass) -> CountMethod {
        match self {
            CountingStrategy::Membership => CountMethod::Membership,
            CountingStrategy::Radius => CountMethod::Radius,
            CountingStrategy::Legacy => match class {
                StructureClass::AutoTurret | StructureClass::SamSite => CountMethod::Radius,
                StructureClass::FlameTurret | StructureClass::ShotgunTrap => CountMethod::Membership,
            },
        }
    }
}

/// Count existing structures of `class` in `building` the way `strategy` says.
/// `origin` is the requester's position; the radius query is centered there.
pub fn count_existing(
    census: &impl BuildingCensus,
    strategy: CountingStrategy,
    class: StructureClass,
    origin: Vec3,
    radius: f32,
    building: BuildingId,
) -> usize {
    match strategy.method_for(class) {
        CountMethod::Radius => census.count_by_radius(class, origin, radius, building),
        CountMethod::Membership => census.count_by_membership(class, building),
    }
}
