//! Bookkeeping shared by the planner passes of a single turn.

use std::collections::HashSet;

use warden_core::{
    Action, AgentSnapshot, ArenaConfig, Command, EntityId, MonsterSnapshot, Phase, Point, Side,
    Stronghold,
};
use warden_system_classifier::Classification;
use warden_system_coverage::{CoverageCandidate, CoverageOptimizer};
use warden_world::{query, World};

use crate::{queue::ActionQueue, tuning::SquadTuning};

/// Everything a pass may read, plus the tentative state it may change.
///
/// Mana is debited from a private copy of our stronghold as spells are
/// queued, so later passes see what is left. Monsters marked neutralized are
/// skipped by later passes for the rest of the turn.
pub(crate) struct TurnContext<'a> {
    pub(crate) world: &'a World,
    pub(crate) config: &'a ArenaConfig,
    pub(crate) tuning: &'a SquadTuning,
    pub(crate) classification: &'a Classification,
    pub(crate) phase: Phase,
    pub(crate) all_in: bool,
    ours: Stronghold,
    neutralized: HashSet<EntityId>,
    queue: &'a mut ActionQueue,
    coverage: &'a mut CoverageOptimizer,
    candidates: &'a mut Vec<CoverageCandidate>,
}

impl<'a> TurnContext<'a> {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        world: &'a World,
        tuning: &'a SquadTuning,
        classification: &'a Classification,
        phase: Phase,
        all_in: bool,
        queue: &'a mut ActionQueue,
        coverage: &'a mut CoverageOptimizer,
        candidates: &'a mut Vec<CoverageCandidate>,
    ) -> Self {
        Self {
            world,
            config: query::config(world),
            tuning,
            classification,
            phase,
            all_in,
            ours: query::our_stronghold(world).clone(),
            neutralized: HashSet::new(),
            queue,
            coverage,
            candidates,
        }
    }

    pub(crate) fn roster(&self) -> &'a [AgentSnapshot] {
        query::agents(self.world)
    }

    pub(crate) fn agent(&self, slot: usize) -> Option<&'a AgentSnapshot> {
        self.roster().get(slot)
    }

    /// Roster slots dedicated to defence that are present this turn.
    pub(crate) fn defender_slots(&self) -> std::ops::Range<usize> {
        0..self.config.defender_count.min(self.roster().len())
    }

    pub(crate) fn is_free(&self, slot: usize) -> bool {
        slot < self.roster().len() && !self.queue.is_assigned(slot)
    }

    pub(crate) fn our_base(&self) -> Point {
        self.ours.position()
    }

    pub(crate) fn their_base(&self) -> Point {
        query::their_stronghold(self.world).position()
    }

    pub(crate) fn our_side(&self) -> Side {
        Side::of(self.our_base())
    }

    pub(crate) fn mana(&self) -> i32 {
        self.ours.mana()
    }

    /// Whether `casts` spells could be paid for right now.
    pub(crate) fn can_afford_casts(&self, casts: i32) -> bool {
        self.ours.can_afford(casts.saturating_mul(self.config.spell_cost))
    }

    pub(crate) fn is_neutralized(&self, id: EntityId) -> bool {
        self.neutralized.contains(&id)
    }

    pub(crate) fn neutralize(&mut self, id: EntityId) {
        let _ = self.neutralized.insert(id);
    }

    /// Queues a non-spell command.
    pub(crate) fn order(&mut self, slot: usize, command: Command, note: &'static str) {
        self.queue.push(Action::new(slot, command).with_note(note));
    }

    /// Queues a command, debiting the spell cost when it consumes mana.
    ///
    /// Returns whether the command was queued.
    pub(crate) fn cast(&mut self, slot: usize, command: Command, note: &'static str) -> bool {
        if command.is_spell() && !self.ours.spend(self.config.spell_cost) {
            tracing::debug!(slot, command = %command, mana = self.mana(), "spell unaffordable");
            return false;
        }
        self.queue.push(Action::new(slot, command).with_note(note));
        true
    }

    /// Whether a teammate already queued an area-effect that reaches `position`.
    pub(crate) fn area_effect_reaches(&self, position: Point) -> bool {
        let radius = self.config.area_effect_radius;
        self.queue.iter().any(|action| {
            action.command.is_area_effect()
                && self
                    .agent(action.agent)
                    .map_or(false, |caster| caster.position.is_within(position, radius))
        })
    }

    /// Monsters within `range` of `center`, in feed order.
    pub(crate) fn monsters_near(&self, center: Point, range: i32) -> Vec<MonsterSnapshot> {
        query::monsters_within(self.world, center, range)
    }

    /// Where to stand to hit `target` together with as many of its neighbours
    /// as possible.
    ///
    /// Falls back to the target's own position unless at least two monsters
    /// cluster around it and some candidate both covers two of them and keeps
    /// the target in attack range.
    pub(crate) fn engagement_point(&mut self, target: &MonsterSnapshot, reference: Point) -> Point {
        let reach = self.config.attack_range;
        let cluster: Vec<Point> = self
            .monsters_near(target.position, reach.saturating_mul(2))
            .iter()
            .map(|monster| monster.position)
            .collect();
        if cluster.len() < 2 {
            return target.position;
        }

        self.coverage.rank(&cluster, reach, reference, self.candidates);
        self.candidates
            .iter()
            .find(|candidate| {
                candidate.covered >= 2
                    && candidate.center.is_within(target.position, reach)
                    && self.config.contains(candidate.center)
            })
            .map_or(target.position, |candidate| candidate.center)
    }
}
