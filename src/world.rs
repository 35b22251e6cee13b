//! Structure World - in-memory building graph for headless hosts and tests
//! Tool cupboards define buildings; deployed structures live in a spatial hash
//! and join the decay-entity list of whichever building privilege covers them.

use bevy::math::Vec3;
use bevy::prelude::*;
use hashbrown::{HashMap, HashSet};
use tracing::debug;

use crate::census::{BuildingCensus, BuildingId};
use crate::constants::{CUPBOARD_PRIVILEGE_RADIUS, STRUCTURE_GRID_CELL};
use crate::error::Result;
use crate::structures::{classify, StructureClass};

pub const CUPBOARD_PREFAB: &str = "assets/prefabs/deployable/tool cupboard/cupboard.tool.deployed.prefab";

// ============================================================================
// WORLD DATA STRUCTS
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub struct EntityId(pub u64);

/// Physics layer a structure sits on. Radius census only sees `Deployed`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Layer {
    Deployed,
    Construction,
}

#[derive(Clone, Debug)]
pub struct PlacedStructure {
    pub id: EntityId,
    pub prefab: String,
    pub class: Option<StructureClass>,
    pub position: Vec3,
    pub layer: Layer,
}

/// A base: one tool cupboard, its authorized players, and its decay entities.
#[derive(Clone, Debug)]
pub struct Building {
    pub id: BuildingId,
    pub cupboard: Vec3,
    pub cupboard_entity: EntityId,
    pub authorized: HashSet<u64>,
    pub decay_entities: Vec<EntityId>,
}

// ============================================================================
// STRUCTURE SPATIAL GRID
// ============================================================================

/// Hash grid over the ground plane (x, z). Unbounded, so negative coordinates
/// are fine.
#[derive(Default, Debug)]
struct StructureGrid {
    cells: HashMap<(i32, i32), Vec<EntityId>>,
}

impl StructureGrid {
    fn cell_of(pos: Vec3) -> (i32, i32) {
        (
            (pos.x / STRUCTURE_GRID_CELL).floor() as i32,
            (pos.z / STRUCTURE_GRID_CELL).floor() as i32,
        )
    }

    fn insert(&mut self, id: EntityId, pos: Vec3) {
        self.cells.entry(Self::cell_of(pos)).or_default().push(id);
    }

    fn remove(&mut self, id: EntityId, pos: Vec3) {
        let key = Self::cell_of(pos);
        if let Some(cell) = self.cells.get_mut(&key) {
            cell.retain(|e| *e != id);
            if cell.is_empty() { self.cells.remove(&key); }
        }
    }

    /// Visit every id in cells overlapping the square (pos ± radius).
    /// Caller does the fine distance check.
    fn for_each_nearby(&self, pos: Vec3, radius: f32, mut f: impl FnMut(EntityId)) {
        let (min_x, min_z) = Self::cell_of(pos - Vec3::new(radius, 0.0, radius));
        let (max_x, max_z) = Self::cell_of(pos + Vec3::new(radius, 0.0, radius));
        for cx in min_x..=max_x {
            for cz in min_z..=max_z {
                if let Some(cell) = self.cells.get(&(cx, cz)) {
                    cell.iter().copied().for_each(&mut f);
                }
            }
        }
    }
}

// ============================================================================
// WORLD RESOURCE
// ============================================================================

#[derive(Resource, Default, Debug)]
pub struct StructureWorld {
    next_id: u64,
    buildings: HashMap<BuildingId, Building>,
    structures: HashMap<EntityId, PlacedStructure>,
    grid: StructureGrid,
}

impl StructureWorld {
    fn alloc_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn building(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.get(&id)
    }

    pub fn structure(&self, id: EntityId) -> Option<&PlacedStructure> {
        self.structures.get(&id)
    }

    pub fn structure_count(&self) -> usize { self.structures.len() }

    /// Building whose cupboard is nearest to `position` within privilege range.
    pub fn building_privilege(&self, position: Vec3) -> Option<BuildingId> {
        let r2 = CUPBOARD_PRIVILEGE_RADIUS * CUPBOARD_PRIVILEGE_RADIUS;
        self.buildings.values()
            .map(|b| (b.cupboard.distance_squared(position), b.id))
            .filter(|(d2, _)| *d2 <= r2)
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(_, id)| id)
    }

    /// Deploy a tool cupboard: creates a building with `owner` authorized.
    pub fn place_cupboard(&mut self, owner: u64, position: Vec3) -> BuildingId {
        let id = BuildingId(self.alloc_id());
        let entity = EntityId(self.alloc_id());
        let mut authorized = HashSet::new();
        authorized.insert(owner);
        self.buildings.insert(id, Building {
            id,
            cupboard: position,
            cupboard_entity: entity,
            authorized,
            decay_entities: Vec::new(),
        });
        self.insert_structure(entity, CUPBOARD_PREFAB.to_string(), None, position, Layer::Deployed);
        debug!("cupboard {:?} placed at {position} by {owner}", id);
        id
    }

    /// Add `player` to a building's authorization list.
    pub fn authorize(&mut self, player: u64, building: BuildingId) -> bool {
        match self.buildings.get_mut(&building) {
            Some(b) => {
                b.authorized.insert(player);
                true
            }
            None => false,
        }
    }

    /// Spawn a structure. It joins the decay list of the building covering it.
    /// Fails only on a prefab that classifies ambiguously.
    pub fn place_structure(&mut self, prefab: &str, position: Vec3, layer: Layer) -> Result<EntityId> {
        let class = classify(prefab)?;
        let id = EntityId(self.alloc_id());
        self.insert_structure(id, prefab.to_string(), class, position, layer);
        Ok(id)
    }

    fn insert_structure(&mut self, id: EntityId, prefab: String, class: Option<StructureClass>, position: Vec3, layer: Layer) {
        if let Some(b) = self.building_privilege(position).and_then(|b| self.buildings.get_mut(&b)) {
            b.decay_entities.push(id);
        }
        self.grid.insert(id, position);
        self.structures.insert(id, PlacedStructure { id, prefab, class, position, layer });
    }

    /// Destroy a structure, removing it from the grid and any decay list.
    /// Destroying a cupboard dissolves its building along with its privilege.
    pub fn remove_structure(&mut self, id: EntityId) -> bool {
        let Some(s) = self.structures.remove(&id) else { return false };
        self.grid.remove(id, s.position);
        self.buildings.retain(|building, b| {
            let keep = b.cupboard_entity != id;
            if !keep { debug!("cupboard destroyed; building {:?} dissolved", building); }
            keep
        });
        for b in self.buildings.values_mut() {
            b.decay_entities.retain(|e| *e != id);
        }
        true
    }
}

impl BuildingCensus for StructureWorld {
    fn resolve_building(&self, position: Vec3) -> Option<BuildingId> {
        self.building_privilege(position)
    }

    fn is_authorized(&self, player: u64, building: BuildingId) -> bool {
        self.buildings.get(&building).is_some_and(|b| b.authorized.contains(&player))
    }

    fn count_by_radius(&self, class: StructureClass, origin: Vec3, radius: f32, building: BuildingId) -> usize {
        let r2 = radius * radius;
        let mut seen = HashSet::new();
        self.grid.for_each_nearby(origin, radius, |id| {
            let Some(s) = self.structures.get(&id) else { return };
            if s.layer != Layer::Deployed || s.class != Some(class) { return; }
            if s.position.distance_squared(origin) > r2 { return; }
            if self.building_privilege(s.position) != Some(building) { return; }
            seen.insert(id);
        });
        seen.len()
    }

    fn count_by_membership(&self, class: StructureClass, building: BuildingId) -> usize {
        let Some(b) = self.buildings.get(&building) else { return 0 };
        b.decay_entities.iter()
            .filter(|id| self.structures.get(*id).is_some_and(|s| s.class == Some(class)))
            .count()
    }
}
