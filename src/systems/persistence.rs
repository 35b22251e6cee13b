//! Startup load + shutdown save of config, overrides and language tables

use bevy::prelude::*;

use crate::lang::Lang;
use crate::resources::{PlayerOverrideStore, TurretLimitsPaths};
use crate::save::{load_store, persist_store};
use crate::settings::{load_or_create_config, GlobalConfig};

/// Startup: read config (generating or completing it), the override store,
/// and any extra language files. Defaults are already in place, so a failed
/// load leaves a working plugin.
pub fn load_turret_limits_system(
    paths: Res<TurretLimitsPaths>,
    mut config: ResMut<GlobalConfig>,
    mut store: ResMut<PlayerOverrideStore>,
    mut lang: ResMut<Lang>,
) {
    *config = load_or_create_config(&paths.config);
    *store = load_store(&paths.data);
    lang.load_dir(&paths.lang_dir);
}

/// Save the override store once when the app is exiting.
pub fn save_on_exit_system(
    mut exits: MessageReader<AppExit>,
    store: Res<PlayerOverrideStore>,
    paths: Res<TurretLimitsPaths>,
) {
    if exits.read().count() > 0 {
        persist_store(&store, &paths.data);
    }
}
