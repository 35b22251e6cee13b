//! Headless test server - the plugin in a bare `App` over a temp directory.

#![allow(dead_code)]

use bevy::ecs::message::Messages;
use bevy::prelude::*;
use std::path::Path;
use tempfile::TempDir;

use turret_limits::messages::*;
use turret_limits::resources::{PlayerOverrideStore, TurretLimitsPaths};
use turret_limits::settings::{save_config, GlobalConfig};
use turret_limits::world::{EntityId, Layer, StructureWorld};
use turret_limits::{BuildingId, TurretLimitsPlugin};

pub const OWNER: u64 = 76561198000000001;
pub const STRANGER: u64 = 76561198000000002;

pub const AUTO: &str = "assets/prefabs/npc/autoturret/autoturret_deployed.prefab";
pub const FLAME: &str = "assets/prefabs/npc/flame turret/flameturret.deployed.prefab";
pub const GUNTRAP: &str = "assets/prefabs/deployable/single shot trap/guntrap.deployed.prefab";
pub const SAM: &str = "assets/prefabs/npc/sam_site_turret/sam_site_turret_deployed.prefab";
pub const WALL: &str = "assets/prefabs/building/wall.external.high.stone/wall.external.high.stone.prefab";

pub struct TestServer {
    pub app: App,
    pub dir: TempDir,
    next_request: u64,
}

impl TestServer {
    /// Fresh server with default config in a new temp directory.
    pub fn new() -> Self {
        Self::in_dir(tempfile::tempdir().unwrap())
    }

    /// Server whose config file is written before startup.
    pub fn with_config(config: GlobalConfig) -> Self {
        let dir = tempfile::tempdir().unwrap();
        save_config(&config, &TurretLimitsPaths::under(dir.path()).config).unwrap();
        Self::in_dir(dir)
    }

    /// Start (or restart) a server over an existing directory.
    pub fn in_dir(dir: TempDir) -> Self {
        let mut app = App::new();
        app.add_plugins(TurretLimitsPlugin::<StructureWorld>::new(TurretLimitsPaths::under(dir.path())))
            .init_resource::<StructureWorld>();
        app.update(); // Startup: load config, overrides, lang
        Self { app, dir, next_request: 0 }
    }

    pub fn paths(&self) -> TurretLimitsPaths {
        TurretLimitsPaths::under(self.dir.path())
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    pub fn world(&mut self) -> Mut<'_, StructureWorld> {
        self.app.world_mut().resource_mut::<StructureWorld>()
    }

    pub fn overrides(&self) -> &PlayerOverrideStore {
        self.app.world().resource::<PlayerOverrideStore>()
    }

    pub fn config(&self) -> &GlobalConfig {
        self.app.world().resource::<GlobalConfig>()
    }

    pub fn cupboard(&mut self, owner: u64, x: f32, z: f32) -> BuildingId {
        self.world().place_cupboard(owner, Vec3::new(x, 0.0, z))
    }

    /// Place a structure directly, bypassing validation.
    pub fn spawn(&mut self, prefab: &str, x: f32, z: f32) -> EntityId {
        self.world().place_structure(prefab, Vec3::new(x, 0.0, z), Layer::Deployed).unwrap()
    }

    /// Queue a placement request with the player standing at the target.
    pub fn request(&mut self, player: u64, is_admin: bool, prefab: &str, x: f32, z: f32) -> u64 {
        self.request_in_locale(player, is_admin, "en", prefab, x, z)
    }

    pub fn request_in_locale(&mut self, player: u64, is_admin: bool, locale: &str, prefab: &str, x: f32, z: f32) -> u64 {
        self.next_request += 1;
        let target = Vec3::new(x, 0.0, z);
        self.app.world_mut().write_message(PlacementRequest {
            request_id: self.next_request,
            player_id: player,
            is_admin,
            locale: locale.to_string(),
            player_position: target,
            prefab: prefab.to_string(),
            target,
        });
        self.next_request
    }

    pub fn say(&mut self, player: u64, locale: &str, command: &str, args: &[&str]) {
        self.app.world_mut().write_message(ChatCommand {
            player_id: player,
            locale: locale.to_string(),
            command: command.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
        });
    }

    pub fn tick(&mut self) {
        self.app.update();
    }

    pub fn replies(&mut self) -> Vec<ChatReply> {
        self.app.world_mut().resource_mut::<Messages<ChatReply>>().drain().collect()
    }

    pub fn verdicts(&mut self) -> Vec<PlacementVerdict> {
        self.app.world_mut().resource_mut::<Messages<PlacementVerdict>>().drain().collect()
    }

    /// Send one placement, run a frame, and return its outcome plus any replies.
    pub fn place(&mut self, player: u64, is_admin: bool, prefab: &str, x: f32, z: f32) -> (PlacementOutcome, Vec<String>) {
        let id = self.request(player, is_admin, prefab, x, z);
        self.tick();
        let verdicts = self.verdicts();
        let verdict = verdicts.iter().find(|v| v.request_id == id).expect("no verdict for request");
        let texts = self.replies().into_iter().map(|r| r.text).collect();
        (verdict.outcome, texts)
    }

    pub fn shutdown(mut self) -> TempDir {
        self.app.world_mut().write_message(AppExit::Success);
        self.app.update();
        self.dir
    }
}
