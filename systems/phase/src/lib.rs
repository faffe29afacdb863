#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Tracks the coarse stage of the match.
//!
//! The tracker only ever moves forward: Opening, then Mid, then Ending. The
//! all-in observation (the whole opposing squad clustered around our
//! stronghold) is sticky and forces at least Mid from the turn it is first seen.

use serde::{Deserialize, Serialize};
use warden_core::{max_health, Phase};
use warden_system_classifier::Classification;
use warden_world::{query, World};

/// Thresholds that drive phase transitions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseThresholds {
    /// Strongest threat health that, with enough mana, opens the mid game.
    pub mid_threat_health: i32,
    /// Mana that, with a strong enough threat, opens the mid game.
    pub mid_mana: i32,
    /// Strongest threat health that moves the mid game into the ending.
    pub ending_threat_health: i32,
}

impl Default for PhaseThresholds {
    fn default() -> Self {
        Self {
            mid_threat_health: 17,
            mid_mana: 200,
            ending_threat_health: 24,
        }
    }
}

/// Observations of one turn that the tracker consumes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PhaseInputs {
    /// Highest health among monsters that can reach our stronghold.
    pub strongest_threat_health: i32,
    /// Our mana at the start of the turn.
    pub our_mana: i32,
    /// Whether every opposing agent is clustered around our stronghold.
    pub opponents_clustered: bool,
}

impl PhaseInputs {
    /// Gathers the inputs from the current world and its classification.
    ///
    /// The opposing squad counts as clustered when all of it stands within the
    /// arena's mid radius of our stronghold.
    #[must_use]
    pub fn observe(world: &World, classification: &Classification) -> Self {
        let config = query::config(world);
        let ours = query::our_stronghold(world);
        let opponents = query::opponents(world);
        let opponents_clustered = config.squad_size > 0
            && opponents.len() >= config.squad_size
            && opponents
                .iter()
                .all(|agent| ours.position().is_within(agent.position, config.mid_radius));

        Self {
            strongest_threat_health: max_health(
                classification
                    .threats()
                    .iter()
                    .map(|classified| &classified.monster),
            ),
            our_mana: ours.mana(),
            opponents_clustered,
        }
    }
}

/// Monotone phase state carried across turns.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PhaseTracker {
    thresholds: PhaseThresholds,
    phase: Phase,
    all_in: bool,
}

impl PhaseTracker {
    /// Creates a tracker in the opening phase.
    #[must_use]
    pub fn new(thresholds: PhaseThresholds) -> Self {
        Self {
            thresholds,
            phase: Phase::Opening,
            all_in: false,
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether the all-in push has ever been observed.
    #[must_use]
    pub const fn all_in(&self) -> bool {
        self.all_in
    }

    /// Folds one turn of observations into the tracker and returns the phase.
    pub fn update(&mut self, inputs: PhaseInputs) -> Phase {
        let previous = self.phase;

        if inputs.opponents_clustered && !self.all_in {
            self.all_in = true;
            tracing::info!("opposing squad is all-in around our stronghold");
        }

        let mut next = previous;
        if self.all_in {
            next = next.max(Phase::Mid);
        }

        if next == Phase::Mid
            && inputs.strongest_threat_health >= self.thresholds.ending_threat_health
        {
            next = Phase::Ending;
        } else if inputs.strongest_threat_health >= self.thresholds.mid_threat_health
            && inputs.our_mana >= self.thresholds.mid_mana
        {
            next = next.max(Phase::Mid);
        }

        if next != previous {
            tracing::info!(from = ?previous, to = ?next, "phase advanced");
        }
        self.phase = next;
        next
    }
}
