//! Placement limit evaluator - decides whether a turret may be placed.
//!
//! Order of checks (first match wins):
//! 1. no building at the target, or requester not authorized on it -> deny
//! 2. admin bypass enabled and requester is admin -> allow with a notice
//! 3. turrets disabled server-wide -> deny
//! 4. existing count against the effective limit -> allow or deny

use bevy::math::Vec3;

use crate::census::{count_existing, BuildingCensus, BuildingId};
use crate::constants::CENSUS_RADIUS;
use crate::error::Result;
use crate::lang::MessageKey;
use crate::resources::PlayerOverrideStore;
use crate::settings::GlobalConfig;
use crate::structures::{classify, LimitCheck, StructureClass};

// ============================================================================
// TYPES
// ============================================================================

/// The player attempting a placement, as the evaluator sees them.
#[derive(Clone, Copy, Debug)]
pub struct Requester {
    pub player_id: u64,
    pub is_admin: bool,
    /// Building authorization on the target building.
    pub authorized: bool,
    /// Where the player stands; the radius census is centered here.
    pub position: Vec3,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DenyReason {
    CannotDeployWithoutTC,
    TurretsDisabled,
    LimitReached(StructureClass),
}

impl DenyReason {
    pub fn message_key(self) -> MessageKey {
        match self {
            DenyReason::CannotDeployWithoutTC => MessageKey::CannotDeployWithoutTC,
            DenyReason::TurretsDisabled => MessageKey::TurretsDisabled,
            DenyReason::LimitReached(class) => MessageKey::limit_reached(class),
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Verdict {
    /// Placement may proceed. `notice` is sent to the requester if present.
    Allow { notice: Option<MessageKey> },
    /// Placement is refused. `count` is the existing count the limit was
    /// compared against (0 for denials decided before counting).
    Deny { reason: DenyReason, count: usize },
}

impl Verdict {
    pub fn is_allowed(&self) -> bool {
        matches!(self, Verdict::Allow { .. })
    }
}

/// A classified placement and what was decided about it.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Assessment {
    pub class: StructureClass,
    pub building: Option<BuildingId>,
    pub verdict: Verdict,
}

/// Outcome of the checks that do not need a count.
enum Gate {
    Decided(Verdict),
    CheckLimit(BuildingId),
}

// ============================================================================
// LIMITS
// ============================================================================

/// Player override if set, else the server default. SAM sites never have an
/// override, so they always get the default.
pub fn effective_limit(player: u64, class: StructureClass, config: &GlobalConfig, overrides: &PlayerOverrideStore) -> u32 {
    overrides.override_for(player, class).unwrap_or_else(|| config.default_limit(class))
}

/// Whether `count` existing structures already block one more under `limit`.
pub fn limit_blocks(class: StructureClass, count: usize, limit: u32) -> bool {
    let limit = limit as usize;
    match class.limit_check() {
        LimitCheck::AtOrAbove => count >= limit,
        LimitCheck::WouldExceed => count + 1 > limit,
    }
}

fn gate(requester: &Requester, building: Option<BuildingId>, config: &GlobalConfig) -> Gate {
    let deny = |reason| Gate::Decided(Verdict::Deny { reason, count: 0 });
    let Some(building) = building else { return deny(DenyReason::CannotDeployWithoutTC) };
    if !requester.authorized {
        return deny(DenyReason::CannotDeployWithoutTC);
    }
    if config.allow_admin_bypass && requester.is_admin {
        return Gate::Decided(Verdict::Allow { notice: Some(MessageKey::NoAdminLimits) });
    }
    if config.disable_all_turrets {
        return deny(DenyReason::TurretsDisabled);
    }
    Gate::CheckLimit(building)
}

fn check_limit(player: u64, class: StructureClass, count: usize, config: &GlobalConfig, overrides: &PlayerOverrideStore) -> Verdict {
    let limit = effective_limit(player, class, config, overrides);
    if limit_blocks(class, count, limit) {
        Verdict::Deny { reason: DenyReason::LimitReached(class), count }
    } else {
        Verdict::Allow { notice: None }
    }
}

// ============================================================================
// EVALUATION
// ============================================================================

/// Decide a placement given an already-known existing count.
pub fn evaluate(
    requester: &Requester,
    building: Option<BuildingId>,
    class: StructureClass,
    current_count: usize,
    config: &GlobalConfig,
    overrides: &PlayerOverrideStore,
) -> Verdict {
    match gate(requester, building, config) {
        Gate::Decided(verdict) => verdict,
        Gate::CheckLimit(_) => check_limit(requester.player_id, class, current_count, config, overrides),
    }
}

/// A placement as the host hands it over.
#[derive(Clone, Debug)]
pub struct PlacementAttempt<'a> {
    pub player_id: u64,
    pub is_admin: bool,
    pub player_position: Vec3,
    pub prefab: &'a str,
    pub target: Vec3,
}

/// Classify, resolve the building, and evaluate. The census is only asked to
/// count once every cheaper check has passed.
///
/// `Ok(None)` means the prefab is not a turret and the plugin has no opinion.
pub fn assess_placement(
    attempt: &PlacementAttempt,
    census: &impl BuildingCensus,
    config: &GlobalConfig,
    overrides: &PlayerOverrideStore,
) -> Result<Option<Assessment>> {
    let Some(class) = classify(attempt.prefab)? else { return Ok(None) };

    let building = census.resolve_building(attempt.target);
    let requester = Requester {
        player_id: attempt.player_id,
        is_admin: attempt.is_admin,
        authorized: building.is_some_and(|b| census.is_authorized(attempt.player_id, b)),
        position: attempt.player_position,
    };

    let verdict = match gate(&requester, building, config) {
        Gate::Decided(verdict) => verdict,
        Gate::CheckLimit(b) => {
            let count = count_existing(census, config.counting, class, requester.position, CENSUS_RADIUS, b);
            check_limit(requester.player_id, class, count, config, overrides)
        }
    };

    Ok(Some(Assessment { class, building, verdict }))
}
