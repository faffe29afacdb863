//! Optional TOML configuration of the arena and the planner.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use warden_core::ArenaConfig;
use warden_system_squad::SquadTuning;

/// Everything the binary can be configured with.
///
/// Every field falls back to the compiled defaults, so a file only needs to
/// name the values it overrides.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub(crate) struct Settings {
    /// Gameplay constants of the arena.
    pub(crate) arena: ArenaConfig,
    /// Planner thresholds.
    pub(crate) squad: SquadTuning,
}

impl Settings {
    /// Loads settings from `path`, or the defaults when no path is given.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read settings from {}", path.display()))?;
        let settings = Self::parse(&text)
            .with_context(|| format!("failed to parse settings in {}", path.display()))?;
        tracing::info!(path = %path.display(), "settings loaded");
        Ok(settings)
    }

    fn parse(text: &str) -> Result<Self> {
        let settings: Self = toml::from_str(text)?;
        anyhow::ensure!(
            settings.arena.defender_count <= settings.arena.squad_size,
            "defender count {} exceeds squad size {}",
            settings.arena.defender_count,
            settings.arena.squad_size
        );
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sections_override_independently() {
        let settings = Settings::parse(
            "[arena]\nspell_cost = 20\n\n[squad.protection]\naid_range = 1800\n",
        )
        .expect("valid settings");

        assert_eq!(settings.arena.spell_cost, 20);
        assert_eq!(settings.arena.width, ArenaConfig::default().width);
        assert_eq!(settings.squad.protection.aid_range, 1_800);
        assert_eq!(settings.squad.defence, SquadTuning::default().defence);
    }

    #[test]
    fn more_defenders_than_agents_is_rejected() {
        let error = Settings::parse("[arena]\nsquad_size = 1\ndefender_count = 2\n")
            .expect_err("two defenders cannot fit a squad of one");
        assert!(error.to_string().contains("exceeds squad size"));
    }

    #[test]
    fn missing_file_reports_its_path() {
        let error = Settings::load(Some(Path::new("/nonexistent/warden.toml")))
            .expect_err("file does not exist");
        assert!(format!("{error:#}").contains("/nonexistent/warden.toml"));
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(Settings::load(None).expect("defaults"), Settings::default());
    }
}
