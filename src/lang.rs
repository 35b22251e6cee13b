//! Localization - keyed chat templates per locale with English fallback.

use bevy::prelude::*;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, warn};

use crate::constants::DEFAULT_LOCALE;
use crate::structures::StructureClass;

/// Every player-facing message this plugin sends.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash)]
pub enum MessageKey {
    NoAdminLimits,
    CannotDeployWithoutTC,
    TurretsDisabled,
    LimitReachedAutoTurret,
    LimitReachedFlameTurret,
    LimitReachedShotgunTrap,
    LimitReachedSamSite,
    CmdUsage,
    CmdOk,
    CmdBadNum,
    CmdBadType,
}

impl MessageKey {
    pub const ALL: [MessageKey; 11] = [
        MessageKey::NoAdminLimits,
        MessageKey::CannotDeployWithoutTC,
        MessageKey::TurretsDisabled,
        MessageKey::LimitReachedAutoTurret,
        MessageKey::LimitReachedFlameTurret,
        MessageKey::LimitReachedShotgunTrap,
        MessageKey::LimitReachedSamSite,
        MessageKey::CmdUsage,
        MessageKey::CmdOk,
        MessageKey::CmdBadNum,
        MessageKey::CmdBadType,
    ];

    /// Stable key used in language files.
    pub fn as_str(self) -> &'static str {
        match self {
            MessageKey::NoAdminLimits => "NoAdminLimits",
            MessageKey::CannotDeployWithoutTC => "CannotDeployWithoutTC",
            MessageKey::TurretsDisabled => "TurretsDisabled",
            MessageKey::LimitReachedAutoTurret => "TurretLimitReached_AutoTurret",
            MessageKey::LimitReachedFlameTurret => "TurretLimitReached_FlameTurret",
            MessageKey::LimitReachedShotgunTrap => "TurretLimitReached_ShotgunTrap",
            MessageKey::LimitReachedSamSite => "TurretLimitReached_SamSite",
            MessageKey::CmdUsage => "CmdUsage",
            MessageKey::CmdOk => "CmdOK",
            MessageKey::CmdBadNum => "CmdBadNum",
            MessageKey::CmdBadType => "CmdBadType",
        }
    }

    pub fn from_key(key: &str) -> Option<MessageKey> {
        Self::ALL.into_iter().find(|k| k.as_str() == key)
    }

    pub fn limit_reached(class: StructureClass) -> MessageKey {
        match class {
            StructureClass::AutoTurret => MessageKey::LimitReachedAutoTurret,
            StructureClass::FlameTurret => MessageKey::LimitReachedFlameTurret,
            StructureClass::ShotgunTrap => MessageKey::LimitReachedShotgunTrap,
            StructureClass::SamSite => MessageKey::LimitReachedSamSite,
        }
    }

    fn english(self) -> &'static str {
        match self {
            MessageKey::NoAdminLimits => "Admins do not have turret limits enabled.",
            MessageKey::CannotDeployWithoutTC => "Cannot deploy turret without tool cupboard access.",
            MessageKey::TurretsDisabled => "Turrets are disabled on this server.",
            MessageKey::LimitReachedAutoTurret => "Autoturret limit reached. You have already deployed {0} or more autoturrets in this base.",
            MessageKey::LimitReachedFlameTurret => "Flame turret limit reached. You have already deployed {0} or more flame turrets in this base.",
            MessageKey::LimitReachedShotgunTrap => "Shotgun trap limit reached. You have already deployed {0} or more shotgun traps in this base.",
            MessageKey::LimitReachedSamSite => "Sam Site limit reached. You have already deployed {0} or more SAM sites in this base.",
            MessageKey::CmdUsage => "Usage: /setlimit <autoturret|flameturret|shotguntrap> <number>",
            MessageKey::CmdOk => "Limit for {0} set to {1}.",
            MessageKey::CmdBadNum => "Invalid number.",
            MessageKey::CmdBadType => "Unknown turret type. Use: autoturret, flameturret, shotguntrap.",
        }
    }
}

/// Replace `{0}`, `{1}`, ... with the matching argument. Placeholders without
/// an argument are left as written.
pub fn format_template(template: &str, args: &[String]) -> String {
    let mut out = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        out = out.replace(&format!("{{{i}}}"), arg);
    }
    out
}

/// Message tables by locale. English is always registered.
#[derive(Resource, Debug, Clone)]
pub struct Lang {
    tables: HashMap<String, HashMap<MessageKey, String>>,
}

impl Default for Lang {
    fn default() -> Self {
        let english = MessageKey::ALL
            .into_iter()
            .map(|k| (k, k.english().to_string()))
            .collect();
        let mut tables = HashMap::new();
        tables.insert(DEFAULT_LOCALE.to_string(), english);
        Self { tables }
    }
}

impl Lang {
    /// Merge a locale's templates. Unknown keys are ignored.
    pub fn register(&mut self, locale: &str, messages: HashMap<String, String>) {
        let table = self.tables.entry(locale.to_string()).or_default();
        for (key, template) in messages {
            match MessageKey::from_key(&key) {
                Some(k) => { table.insert(k, template); }
                None => debug!("Ignoring unknown message key '{key}' for locale {locale}"),
            }
        }
    }

    /// Template for `key` in `locale`, falling back to English.
    pub fn template(&self, key: MessageKey, locale: &str) -> &str {
        self.tables.get(locale).and_then(|t| t.get(&key))
            .or_else(|| self.tables.get(DEFAULT_LOCALE).and_then(|t| t.get(&key)))
            .map(String::as_str)
            .unwrap_or(key.as_str())
    }

    pub fn format(&self, key: MessageKey, locale: &str, args: &[String]) -> String {
        format_template(self.template(key, locale), args)
    }

    /// Load every `<locale>.json` in `dir` (key -> template). A missing
    /// directory just means English only.
    pub fn load_dir(&mut self, dir: &Path) {
        let Ok(entries) = std::fs::read_dir(dir) else { return };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") { continue; }
            let Some(locale) = path.file_stem().and_then(|s| s.to_str()).map(str::to_string) else { continue };
            let parsed = std::fs::read_to_string(&path)
                .map_err(|e| e.to_string())
                .and_then(|text| serde_json::from_str::<HashMap<String, String>>(&text).map_err(|e| e.to_string()));
            match parsed {
                Ok(messages) => self.register(&locale, messages),
                Err(e) => warn!("Failed to load language file {}: {e}", path.display()),
            }
        }
    }
}
