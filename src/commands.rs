//! `setlimit` chat command - lets a player set personal turret limits.

use crate::lang::MessageKey;
use crate::resources::PlayerOverrideStore;
use crate::structures::StructureClass;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum CommandError {
    /// Wrong number of arguments.
    Usage,
    /// Limit is not an integer in `0..=i32::MAX`.
    BadNumber,
    /// Type is not one of the overridable turret classes.
    BadType,
}

impl CommandError {
    pub fn message_key(self) -> MessageKey {
        match self {
            CommandError::Usage => MessageKey::CmdUsage,
            CommandError::BadNumber => MessageKey::CmdBadNum,
            CommandError::BadType => MessageKey::CmdBadType,
        }
    }
}

/// Parse `setlimit <type> <number>` arguments.
/// The number is validated before the type, so `setlimit unicycle -1`
/// reports the bad number.
pub fn parse_setlimit<S: AsRef<str>>(args: &[S]) -> Result<(StructureClass, u32), CommandError> {
    let [kind, number] = args else { return Err(CommandError::Usage) };
    let value = number.as_ref().trim().parse::<i32>().ok()
        .and_then(|n| u32::try_from(n).ok())
        .ok_or(CommandError::BadNumber)?;
    let class = StructureClass::from_command_arg(kind.as_ref()).ok_or(CommandError::BadType)?;
    Ok((class, value))
}

/// Parse and apply `setlimit` for `player`. On success the store has been
/// mutated and the caller must persist it.
pub fn apply_setlimit<S: AsRef<str>>(
    store: &mut PlayerOverrideStore,
    player: u64,
    args: &[S],
) -> Result<(StructureClass, u32), CommandError> {
    let (class, value) = parse_setlimit(args)?;
    if !store.set_override(player, class, value) {
        return Err(CommandError::BadType);
    }
    Ok((class, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_each_overridable_type() {
        assert_eq!(parse_setlimit(&["autoturret", "4"]), Ok((StructureClass::AutoTurret, 4)));
        assert_eq!(parse_setlimit(&["FlameTurret", "0"]), Ok((StructureClass::FlameTurret, 0)));
        assert_eq!(parse_setlimit(&["shotguntrap", "12"]), Ok((StructureClass::ShotgunTrap, 12)));
    }

    #[test]
    fn rejects_bad_numbers() {
        for n in ["-1", "abc", "2.5", "", "2147483648", "4294967295"] {
            assert_eq!(parse_setlimit(&["autoturret", n]), Err(CommandError::BadNumber), "{n:?}");
        }
    }

    #[test]
    fn accepts_the_largest_signed_limit() {
        assert_eq!(parse_setlimit(&["autoturret", "2147483647"]), Ok((StructureClass::AutoTurret, 2147483647)));
    }

    #[test]
    fn rejects_unknown_types() {
        assert_eq!(parse_setlimit(&["unicycle", "2"]), Err(CommandError::BadType));
        assert_eq!(parse_setlimit(&["samsite", "2"]), Err(CommandError::BadType));
    }

    #[test]
    fn number_is_checked_before_type() {
        assert_eq!(parse_setlimit(&["unicycle", "-1"]), Err(CommandError::BadNumber));
    }

    #[test]
    fn wrong_arity_is_usage() {
        assert_eq!(parse_setlimit::<&str>(&[]), Err(CommandError::Usage));
        assert_eq!(parse_setlimit(&["autoturret"]), Err(CommandError::Usage));
        assert_eq!(parse_setlimit(&["autoturret", "1", "2"]), Err(CommandError::Usage));
    }

    #[test]
    fn failed_commands_do_not_create_records() {
        let mut store = PlayerOverrideStore::default();
        assert!(apply_setlimit(&mut store, 1, &["unicycle", "2"]).is_err());
        assert!(store.is_empty());
        assert_eq!(apply_setlimit(&mut store, 1, &["flameturret", "5"]), Ok((StructureClass::FlameTurret, 5)));
        assert_eq!(store.override_for(1, StructureClass::FlameTurret), Some(5));
    }
}
