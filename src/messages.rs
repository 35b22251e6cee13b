//! ECS Messages - Hooks from the host into the plugin, and the plugin's answers.

use bevy::math::Vec3;
use bevy::prelude::*;

// ============================================================================
// INBOUND (host -> plugin)
// ============================================================================

/// Construction-validation hook: a player wants to deploy `prefab` at `target`.
/// `request_id` is echoed back on the verdict so the host can match them up.
#[derive(Message, Clone, Debug)]
pub struct PlacementRequest {
    pub request_id: u64,
    pub player_id: u64,
    pub is_admin: bool,
    pub locale: String,
    pub player_position: Vec3,
    pub prefab: String,
    pub target: Vec3,
}

/// A chat command typed by an authenticated player, already split into words.
#[derive(Message, Clone, Debug)]
pub struct ChatCommand {
    pub player_id: u64,
    pub locale: String,
    pub command: String,
    pub args: Vec<String>,
}

// ============================================================================
// OUTBOUND (plugin -> host)
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PlacementOutcome {
    /// Not a turret, or an allowed turret: defer to the host's other validators.
    NoOpinion,
    Deny,
}

#[derive(Message, Clone, Copy, Debug)]
pub struct PlacementVerdict {
    pub request_id: u64,
    pub outcome: PlacementOutcome,
}

/// Localized text to deliver to one player.
#[derive(Message, Clone, Debug, PartialEq, Eq)]
pub struct ChatReply {
    pub player_id: u64,
    pub text: String,
}
