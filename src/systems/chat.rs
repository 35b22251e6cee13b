//! Chat command system - `setlimit` handling with write-through persistence

use bevy::prelude::*;
use tracing::info;

use crate::commands::apply_setlimit;
use crate::constants::SETLIMIT_COMMAND;
use crate::lang::{Lang, MessageKey};
use crate::messages::{ChatCommand, ChatReply};
use crate::resources::{PlayerOverrideStore, TurretLimitsPaths};
use crate::save::persist_store;

/// Handle `setlimit` commands. Every successful override saves the whole
/// store immediately. Other commands are left for other plugins.
pub fn setlimit_command_system(
    mut commands: MessageReader<ChatCommand>,
    mut replies: MessageWriter<ChatReply>,
    mut store: ResMut<PlayerOverrideStore>,
    paths: Res<TurretLimitsPaths>,
    lang: Res<Lang>,
) {
    for cmd in commands.read() {
        if !cmd.command.trim_start_matches('/').eq_ignore_ascii_case(SETLIMIT_COMMAND) {
            continue;
        }

        let text = match apply_setlimit(&mut store, cmd.player_id, cmd.args.as_slice()) {
            Ok((class, value)) => {
                info!("player {} set {} limit to {value}", cmd.player_id, class.command_arg());
                persist_store(&store, &paths.data);
                lang.format(MessageKey::CmdOk, &cmd.locale, &[class.command_arg().to_string(), value.to_string()])
            }
            Err(e) => lang.format(e.message_key(), &cmd.locale, &[]),
        };
        replies.write(ChatReply { player_id: cmd.player_id, text });
    }
}
