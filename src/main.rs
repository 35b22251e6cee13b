//! Turret Limits console host - drives the plugin from stdin for local testing.
//!
//! Commands, one per line:
//!   cupboard <player> <x> <z>          deploy a tool cupboard
//!   auth <player> <building>           authorize a player on a building
//!   admin <player>                     toggle admin flag
//!   locale <player> <code>             set the player's chat locale
//!   build <player> <prefab> <x> <z>    request a placement (player stands at the target)
//!   destroy <entity>                   remove a structure (a cupboard takes its building)
//!   say <player> /<command> [args..]   chat command
//!   quit

use bevy::app::AppExit;
use bevy::ecs::message::Messages;
use bevy::prelude::*;
use std::collections::{HashMap, HashSet};
use std::io::{self, BufRead};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use turret_limits::constants::DEFAULT_LOCALE;
use turret_limits::messages::*;
use turret_limits::resources::TurretLimitsPaths;
use turret_limits::world::{EntityId, Layer, StructureWorld};
use turret_limits::{BuildingId, TurretLimitsPlugin};

/// Host-side player state the plugin does not own.
#[derive(Default)]
struct Players {
    admins: HashSet<u64>,
    locales: HashMap<u64, String>,
}

impl Players {
    fn locale(&self, player: u64) -> String {
        self.locales.get(&player).cloned().unwrap_or_else(|| DEFAULT_LOCALE.to_string())
    }
}

/// Placement waiting for its verdict before being committed to the world.
struct Pending {
    prefab: String,
    target: Vec3,
}

fn parse<T: std::str::FromStr>(word: Option<&str>) -> Option<T> {
    word.and_then(|w| w.parse().ok())
}

fn ground(x: f32, z: f32) -> Vec3 {
    Vec3::new(x, 0.0, z)
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    info!(
        "turret_limits v{} ({} built {})",
        env!("CARGO_PKG_VERSION"),
        option_env!("BUILD_COMMIT").unwrap_or("unknown"),
        option_env!("BUILD_TIMESTAMP").unwrap_or("unknown"),
    );

    let paths = match std::env::args().nth(1) {
        Some(root) => TurretLimitsPaths::under(PathBuf::from(root)),
        None => TurretLimitsPaths::default(),
    };

    let mut app = App::new();
    app.add_plugins(TurretLimitsPlugin::<StructureWorld>::new(paths))
        .init_resource::<StructureWorld>();
    // runs Startup: config, overrides and lang files load here
    app.update();

    let mut players = Players::default();
    let mut pending: HashMap<u64, Pending> = HashMap::new();
    let mut next_request = 0u64;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                warn!("stdin read failed: {e}");
                break;
            }
        };
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else { continue };

        match verb {
            "quit" | "exit" => break,
            "cupboard" => {
                let (Some(player), Some(x), Some(z)) = (parse::<u64>(words.next()), parse(words.next()), parse(words.next())) else {
                    warn!("usage: cupboard <player> <x> <z>");
                    continue;
                };
                let id = app.world_mut().resource_mut::<StructureWorld>().place_cupboard(player, ground(x, z));
                println!("building {} at ({x}, {z})", id.0);
            }
            "auth" => {
                let (Some(player), Some(building)) = (parse::<u64>(words.next()), parse::<u64>(words.next())) else {
                    warn!("usage: auth <player> <building>");
                    continue;
                };
                let ok = app.world_mut().resource_mut::<StructureWorld>().authorize(player, BuildingId(building));
                println!("{}", if ok { "authorized" } else { "no such building" });
            }
            "admin" => {
                let Some(player) = parse::<u64>(words.next()) else {
                    warn!("usage: admin <player>");
                    continue;
                };
                let now_admin = !players.admins.remove(&player) && players.admins.insert(player);
                println!("player {player} admin: {now_admin}");
            }
            "locale" => {
                let (Some(player), Some(code)) = (parse::<u64>(words.next()), words.next()) else {
                    warn!("usage: locale <player> <code>");
                    continue;
                };
                players.locales.insert(player, code.to_string());
            }
            "build" => {
                let (Some(player), Some(prefab), Some(x), Some(z)) =
                    (parse::<u64>(words.next()), words.next(), parse(words.next()), parse(words.next()))
                else {
                    warn!("usage: build <player> <prefab> <x> <z>");
                    continue;
                };
                next_request += 1;
                let target = ground(x, z);
                pending.insert(next_request, Pending { prefab: prefab.to_string(), target });
                app.world_mut().write_message(PlacementRequest {
                    request_id: next_request,
                    player_id: player,
                    is_admin: players.admins.contains(&player),
                    locale: players.locale(player),
                    player_position: target,
                    prefab: prefab.to_string(),
                    target,
                });
            }
            "destroy" => {
                let Some(entity) = parse::<u64>(words.next()) else {
                    warn!("usage: destroy <entity>");
                    continue;
                };
                let ok = app.world_mut().resource_mut::<StructureWorld>().remove_structure(EntityId(entity));
                println!("{}", if ok { "destroyed" } else { "no such entity" });
            }
            "say" => {
                let (Some(player), Some(command)) = (parse::<u64>(words.next()), words.next()) else {
                    warn!("usage: say <player> /<command> [args..]");
                    continue;
                };
                app.world_mut().write_message(ChatCommand {
                    player_id: player,
                    locale: players.locale(player),
                    command: command.to_string(),
                    args: words.map(str::to_string).collect(),
                });
            }
            other => {
                warn!("unknown command: {other}");
                continue;
            }
        }

        app.update();
        drain_outputs(&mut app, &mut pending);
    }

    app.world_mut().write_message(AppExit::Success);
    app.update();
    info!("shutting down");
}

/// Print chat replies and commit every placement the plugin did not deny.
fn drain_outputs(app: &mut App, pending: &mut HashMap<u64, Pending>) {
    let world = app.world_mut();

    let replies: Vec<ChatReply> = world.resource_mut::<Messages<ChatReply>>().drain().collect();
    for reply in replies {
        println!("[to {}] {}", reply.player_id, reply.text);
    }

    let verdicts: Vec<PlacementVerdict> = world.resource_mut::<Messages<PlacementVerdict>>().drain().collect();
    for verdict in verdicts {
        let Some(placement) = pending.remove(&verdict.request_id) else { continue };
        match verdict.outcome {
            PlacementOutcome::Deny => println!("placement {} denied", verdict.request_id),
            PlacementOutcome::NoOpinion => {
                let placed = world
                    .resource_mut::<StructureWorld>()
                    .place_structure(&placement.prefab, placement.target, Layer::Deployed);
                match placed {
                    Ok(entity) => println!("placed {} as entity {}", placement.prefab, entity.0),
                    Err(e) => warn!("could not place {}: {e}", placement.prefab),
                }
            }
        }
    }
}
