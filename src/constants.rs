//! Constants - Prefab names, default limits, query radii, file locations

// ============================================================================
// PREFAB MATCHING
// ============================================================================

/// Substrings matched against a deployable's full prefab name.
/// Exactly one may match; see `structures::classify`.
pub const AUTO_TURRET_PREFAB: &str = "autoturret";
pub const FLAME_TURRET_PREFAB: &str = "flameturret";
pub const SHOTGUN_TRAP_PREFAB: &str = "guntrap";
pub const SAM_SITE_PREFAB: &str = "sam_site_turret";

// ============================================================================
// LIMITS
// ============================================================================

/// Default per-building maximum for every structure class.
pub const DEFAULT_STRUCTURE_LIMIT: u32 = 3;

/// Radius (world units) around the requester scanned by the radius census.
pub const CENSUS_RADIUS: f32 = 30.0;

// ============================================================================
// HOST WORLD
// ============================================================================

/// Range of a tool cupboard's building privilege.
pub const CUPBOARD_PRIVILEGE_RADIUS: f32 = 50.0;

/// Cell size of the structure spatial hash. Larger than CENSUS_RADIUS so a
/// radius query touches at most a 3x3 block of cells.
pub const STRUCTURE_GRID_CELL: f32 = 64.0;

// ============================================================================
// FILES + LOCALE
// ============================================================================

pub const CONFIG_FILE: &str = "config/TurretLimits.json";
pub const DATA_FILE: &str = "data/TurretLimits_PlayerData.json";
pub const LANG_DIR: &str = "lang";

/// Locale used when a player has none or a key is missing from their table.
pub const DEFAULT_LOCALE: &str = "en";

/// The one chat command this plugin answers.
pub const SETLIMIT_COMMAND: &str = "setlimit";
