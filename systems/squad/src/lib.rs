#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Per-turn action allocation for the whole squad.
//!
//! [`Squad`] is constructed once per match and owns every piece of state the
//! planner carries between turns: the phase tracker, the madness counter, and
//! the attacker's progression and patrol direction. Each call to
//! [`Squad::plan`] runs the defender passes followed by the attacker routine,
//! then commits the queued actions so that every agent receives exactly one
//! order.

mod attacker;
mod context;
mod defenders;
mod queue;
mod tuning;

use warden_core::{Action, Agent, Order, Phase};
use warden_system_classifier::Classification;
use warden_system_coverage::{CoverageCandidate, CoverageOptimizer};
use warden_system_phase::{PhaseInputs, PhaseTracker};
use warden_world::{query, World};

pub use attacker::AttackerStep;
pub use queue::{ActionQueue, CommitReport};
pub use tuning::{
    AttackerTuning, DefenceTuning, OffenseTuning, Patrol, PostRing, ProtectionTuning, SquadTuning,
};

use attacker::AttackerState;
use context::TurnContext;

/// Roster slot of the defender paired with `slot`.
///
/// Defenders pair up from both ends of the defence slots. An out-of-range slot
/// is reported and mapped to slot zero so the turn can still be planned.
#[must_use]
pub fn other_defender(slot: usize, defenders: usize) -> usize {
    if slot >= defenders {
        tracing::warn!(slot, defenders, "invalid defender slot");
        return 0;
    }
    defenders - 1 - slot
}

/// Everything decided for one turn.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TurnPlan {
    /// Snapshots applied so far, including this one.
    pub turn: u32,
    /// Phase the turn was planned in.
    pub phase: Phase,
    /// Every roster agent, in roster order, with its committed command.
    pub agents: Vec<Agent>,
    /// Actions refused by the commit step.
    pub discarded: Vec<Action>,
    /// Tentative mana left once every queued spell has been paid for.
    pub mana_remaining: i32,
}

impl TurnPlan {
    /// One order per agent, in roster order.
    #[must_use]
    pub fn orders(&self) -> Vec<Order> {
        self.agents.iter().map(Agent::order).collect()
    }
}

/// Planner session for one match.
#[derive(Debug)]
pub struct Squad {
    tuning: SquadTuning,
    phase: PhaseTracker,
    madness: u32,
    attacker: AttackerState,
    queue: ActionQueue,
    coverage: CoverageOptimizer,
    candidates: Vec<CoverageCandidate>,
}

impl Squad {
    /// Creates a planner in the opening phase.
    #[must_use]
    pub fn new(tuning: SquadTuning) -> Self {
        Self {
            phase: PhaseTracker::new(tuning.phase.clone()),
            tuning,
            madness: 0,
            attacker: AttackerState::default(),
            queue: ActionQueue::new(),
            coverage: CoverageOptimizer::new(),
            candidates: Vec::new(),
        }
    }

    /// Thresholds the planner runs with.
    #[must_use]
    pub fn tuning(&self) -> &SquadTuning {
        &self.tuning
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase.phase()
    }

    /// Whether the opposing squad has ever gone all-in.
    #[must_use]
    pub fn all_in(&self) -> bool {
        self.phase.all_in()
    }

    /// Turns-times-defenders spent under an opposing redirect so far.
    #[must_use]
    pub fn madness(&self) -> u32 {
        self.madness
    }

    /// Progression of the attacker.
    #[must_use]
    pub fn attacker_step(&self) -> AttackerStep {
        self.attacker.step()
    }

    /// Plans the turn described by `world` and `classification`.
    pub fn plan(&mut self, world: &World, classification: &Classification) -> TurnPlan {
        let config = query::config(world);
        let roster = query::agents(world);

        let redirected = roster
            .iter()
            .take(config.defender_count)
            .filter(|agent| agent.controlled)
            .count();
        self.madness = self
            .madness
            .saturating_add(u32::try_from(redirected).unwrap_or(u32::MAX));

        let inputs = PhaseInputs::observe(world, classification);
        let phase = self.phase.update(inputs);
        let all_in = self.phase.all_in();

        let mana_remaining = {
            let mut ctx = TurnContext::new(
                world,
                &self.tuning,
                classification,
                phase,
                all_in,
                &mut self.queue,
                &mut self.coverage,
                &mut self.candidates,
            );
            defenders::plan(&mut ctx, self.madness);
            self.attacker.plan(&mut ctx);
            ctx.mana()
        };

        let CommitReport { agents, discarded } = self.queue.commit(roster);
        let turn = query::turn(world);
        tracing::debug!(
            turn,
            ?phase,
            madness = self.madness,
            attacker = ?self.attacker.step(),
            mana_remaining,
            discarded = discarded.len(),
            "turn planned"
        );

        TurnPlan {
            turn,
            phase,
            agents,
            discarded,
            mana_remaining,
        }
    }
}
