//! Structure classes - Turret taxonomy and prefab classification

use crate::constants::*;
use crate::error::{Result, TurretLimitError};

/// The turret-like structure categories this plugin restricts.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, PartialOrd, Ord)]
pub enum StructureClass {
    AutoTurret,
    FlameTurret,
    ShotgunTrap,
    SamSite,
}

/// How a class's existing count is compared against its limit. Both forms are
/// numerically identical; they are kept separate so each family is checked the
/// way it always has been.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum LimitCheck {
    /// Deny when `count >= limit`: the limit is the most that may already exist.
    AtOrAbove,
    /// Deny when `count + 1 > limit`: placing this one would exceed the limit.
    WouldExceed,
}

impl StructureClass {
    pub const ALL: [StructureClass; 4] = [
        StructureClass::AutoTurret,
        StructureClass::FlameTurret,
        StructureClass::ShotgunTrap,
        StructureClass::SamSite,
    ];

    /// Substring identifying this class inside a prefab name.
    pub fn prefab_substring(self) -> &'static str {
        match self {
            StructureClass::AutoTurret => AUTO_TURRET_PREFAB,
            StructureClass::FlameTurret => FLAME_TURRET_PREFAB,
            StructureClass::ShotgunTrap => SHOTGUN_TRAP_PREFAB,
            StructureClass::SamSite => SAM_SITE_PREFAB,
        }
    }

    pub fn limit_check(self) -> LimitCheck {
        match self {
            StructureClass::AutoTurret | StructureClass::SamSite => LimitCheck::AtOrAbove,
            StructureClass::FlameTurret | StructureClass::ShotgunTrap => LimitCheck::WouldExceed,
        }
    }

    /// Whether players may override this class's limit with `setlimit`.
    /// SAM sites always use the server default.
    pub fn overridable(self) -> bool {
        !matches!(self, StructureClass::SamSite)
    }

    /// Parse the type argument of `setlimit`. Only overridable classes parse.
    pub fn from_command_arg(arg: &str) -> Option<StructureClass> {
        match arg.to_ascii_lowercase().as_str() {
            "autoturret" => Some(StructureClass::AutoTurret),
            "flameturret" => Some(StructureClass::FlameTurret),
            "shotguntrap" => Some(StructureClass::ShotgunTrap),
            _ => None,
        }
    }

    /// Name used in `setlimit` and in its confirmation reply.
    pub fn command_arg(self) -> &'static str {
        match self {
            StructureClass::AutoTurret => "autoturret",
            StructureClass::FlameTurret => "flameturret",
            StructureClass::ShotgunTrap => "shotguntrap",
            StructureClass::SamSite => "samsite",
        }
    }
}

/// Classify a deployable by its full prefab name.
///
/// Returns `Ok(None)` for anything that is not a turret. More than one match
/// means the substring table overlaps, which is reported as an error rather
/// than resolved by picking one.
pub fn classify(prefab_name: &str) -> Result<Option<StructureClass>> {
    let matches: Vec<StructureClass> = StructureClass::ALL
        .iter()
        .copied()
        .filter(|class| prefab_name.contains(class.prefab_substring()))
        .collect();

    match matches.as_slice() {
        [] => Ok(None),
        [class] => Ok(Some(*class)),
        _ => Err(TurretLimitError::AmbiguousStructure {
            prefab: prefab_name.to_string(),
            matches,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_each_turret_prefab() {
        let cases = [
            ("assets/prefabs/npc/autoturret/autoturret_deployed.prefab", StructureClass::AutoTurret),
            ("assets/prefabs/npc/flame turret/flameturret.deployed.prefab", StructureClass::FlameTurret),
            ("assets/prefabs/deployable/single shot trap/guntrap.deployed.prefab", StructureClass::ShotgunTrap),
            ("assets/prefabs/npc/sam_site_turret/sam_site_turret_deployed.prefab", StructureClass::SamSite),
        ];
        for (prefab, expected) in cases {
            assert_eq!(classify(prefab).unwrap(), Some(expected), "{prefab}");
        }
    }

    #[test]
    fn non_turrets_are_not_classified() {
        for prefab in [
            "assets/prefabs/deployable/woodenbox/woodbox_deployed.prefab",
            "assets/prefabs/deployable/tool cupboard/cupboard.tool.deployed.prefab",
            "",
        ] {
            assert_eq!(classify(prefab).unwrap(), None, "{prefab}");
        }
    }

    #[test]
    fn overlapping_prefab_is_an_error() {
        let err = classify("autoturret_guntrap_hybrid.prefab").unwrap_err();
        match err {
            TurretLimitError::AmbiguousStructure { matches, .. } => {
                assert_eq!(matches, vec![StructureClass::AutoTurret, StructureClass::ShotgunTrap]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn sam_site_is_not_a_command_arg() {
        assert_eq!(StructureClass::from_command_arg("FlameTurret"), Some(StructureClass::FlameTurret));
        assert_eq!(StructureClass::from_command_arg("samsite"), None);
        assert_eq!(StructureClass::from_command_arg("unicycle"), None);
        assert!(!StructureClass::SamSite.overridable());
    }
}
