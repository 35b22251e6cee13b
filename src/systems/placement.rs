//! Placement validation system - answers the host's construction hook

use bevy::prelude::*;
use tracing::{debug, error};

use crate::census::BuildingCensus;
use crate::lang::Lang;
use crate::limits::{assess_placement, PlacementAttempt, Verdict};
use crate::messages::*;
use crate::resources::PlayerOverrideStore;
use crate::settings::GlobalConfig;

/// Evaluate each placement request against the census `C` and reply with a
/// verdict. Non-turrets and allowed turrets get `NoOpinion` so the host's
/// other validators still run.
pub fn placement_validation_system<C: BuildingCensus + Resource>(
    mut requests: MessageReader<PlacementRequest>,
    mut verdicts: MessageWriter<PlacementVerdict>,
    mut replies: MessageWriter<ChatReply>,
    census: Res<C>,
    config: Res<GlobalConfig>,
    overrides: Res<PlayerOverrideStore>,
    lang: Res<Lang>,
) {
    for req in requests.read() {
        let attempt = PlacementAttempt {
            player_id: req.player_id,
            is_admin: req.is_admin,
            player_position: req.player_position,
            prefab: &req.prefab,
            target: req.target,
        };

        let outcome = match assess_placement(&attempt, &*census, &config, &overrides) {
            Ok(None) => PlacementOutcome::NoOpinion,
            Ok(Some(assessment)) => match assessment.verdict {
                Verdict::Allow { notice } => {
                    if let Some(key) = notice {
                        replies.write(ChatReply {
                            player_id: req.player_id,
                            text: lang.format(key, &req.locale, &[]),
                        });
                    }
                    PlacementOutcome::NoOpinion
                }
                Verdict::Deny { reason, count } => {
                    debug!(
                        "denied {:?} for player {} in {:?}: {:?} (count {count})",
                        assessment.class, req.player_id, assessment.building, reason
                    );
                    replies.write(ChatReply {
                        player_id: req.player_id,
                        text: lang.format(reason.message_key(), &req.locale, &[count.to_string()]),
                    });
                    PlacementOutcome::Deny
                }
            },
            Err(e) => {
                error!("placement request {} rejected by classifier: {e}", req.request_id);
                PlacementOutcome::NoOpinion
            }
        };

        verdicts.write(PlacementVerdict { request_id: req.request_id, outcome });
    }
}
