//! Routine of the attacker, the roster slot right after the defenders.

use std::cmp::Reverse;

use warden_core::{angle_between, AgentSnapshot, Command, Phase, Point, Side};
use warden_system_classifier::ClassifiedMonster;

use crate::{
    context::TurnContext,
    tuning::{OffenseTuning, Patrol},
};

/// Progression of the attacker once the opening is over.
///
/// The step only advances when its positional goal is reached and never
/// moves back.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttackerStep {
    /// Rushing to the staging point.
    #[default]
    Staging,
    /// Rushing to the advance point, herding drifting monsters on the way.
    Advance,
    /// Holding the advance point until an asset has been warded.
    Hold,
    /// Anchored at the assault point, spending mana on the opponent.
    Assault,
}

/// Attacker state carried across turns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct AttackerState {
    step: AttackerStep,
    cruise_high: bool,
}

impl AttackerState {
    pub(crate) const fn step(&self) -> AttackerStep {
        self.step
    }

    pub(crate) fn plan(&mut self, ctx: &mut TurnContext<'_>) {
        let slot = ctx.config.defender_count;
        let Some(agent) = ctx.agent(slot).copied() else {
            return;
        };
        if !ctx.is_free(slot) {
            return;
        }

        if ctx.phase == Phase::Opening {
            self.hunt(ctx, slot, &agent);
            return;
        }

        let all_in_ending = ctx.phase == Phase::Ending && ctx.all_in;
        if all_in_ending {
            self.advance_to(AttackerStep::Assault);
        }

        let squad = ctx.tuning;
        let tuning = &squad.attacker;
        let side = ctx.our_side();
        let staging = side.mirror(tuning.staging, ctx.config);
        let advance = side.mirror(tuning.advance, ctx.config);
        let assault = side.mirror(tuning.assault, ctx.config);

        loop {
            match self.step {
                AttackerStep::Staging => {
                    if !self.rush(ctx, slot, &agent, staging, false) {
                        return;
                    }
                    self.advance_to(AttackerStep::Advance);
                }
                AttackerStep::Advance => {
                    if !self.rush(ctx, slot, &agent, advance, true) {
                        return;
                    }
                    self.advance_to(AttackerStep::Hold);
                }
                AttackerStep::Hold => {
                    if self.hold(ctx, slot, &agent, advance) {
                        self.advance_to(AttackerStep::Assault);
                    }
                    return;
                }
                AttackerStep::Assault => {
                    let offense = tuning.offense(ctx.phase);
                    let anchored = all_in_ending || ctx.mana() >= tuning.assault_min_mana;
                    let anchor = anchored.then_some(assault);
                    self.strike(ctx, slot, &agent, offense, anchor);
                    return;
                }
            }
        }
    }

    fn advance_to(&mut self, step: AttackerStep) {
        if step > self.step {
            tracing::info!(from = ?self.step, to = ?step, "attacker advanced");
            self.step = step;
        }
    }

    /// Opening routine: farm whatever is in sight, patrol otherwise.
    fn hunt(&mut self, ctx: &mut TurnContext<'_>, slot: usize, agent: &AgentSnapshot) {
        let prey = ctx
            .monsters_near(agent.position, ctx.config.agent_view_range)
            .into_iter()
            .min_by_key(|monster| (monster.position.distance_squared(agent.position), monster.id));

        match prey {
            Some(monster) => {
                let destination = ctx.engagement_point(&monster, agent.position);
                ctx.order(slot, Command::Move { destination }, "Farm");
            }
            None => {
                let patrol = ctx.tuning.attacker.hunt_patrol;
                self.patrol(ctx, slot, agent, patrol, "Hunt");
            }
        }
    }

    /// Walks to `point`. Returns true once the point is reached, without
    /// queueing anything that turn.
    fn rush(
        &mut self,
        ctx: &mut TurnContext<'_>,
        slot: usize,
        agent: &AgentSnapshot,
        point: Point,
        herd: bool,
    ) -> bool {
        let squad = ctx.tuning;
        let tuning = &squad.attacker;
        let tolerance = i64::from(tuning.arrival_tolerance);
        if agent.position.distance_squared(point) < tolerance * tolerance {
            return true;
        }

        if herd && ctx.can_afford_casts(tuning.herd_casts) {
            let mut visible = visible_monsters(ctx, agent);
            visible.sort_by_key(|candidate| (Reverse(candidate.monster.health), candidate.id()));
            if let Some(drifter) = visible
                .iter()
                .find(|candidate| is_drifter(candidate, tuning.herd_health))
            {
                let redirect = Command::Redirect {
                    target: drifter.id(),
                    toward: ctx.their_base(),
                };
                if ctx.cast(slot, redirect, "Herd") {
                    return false;
                }
            }
        }

        ctx.order(slot, Command::Move { destination: point }, "Rally");
        false
    }

    /// Holds `point`, warding an asset about to strike the opponent or herding
    /// a drifting monster. Returns true once a ward was cast.
    fn hold(
        &mut self,
        ctx: &mut TurnContext<'_>,
        slot: usize,
        agent: &AgentSnapshot,
        point: Point,
    ) -> bool {
        let squad = ctx.tuning;
        let tuning = &squad.attacker;
        let mut visible = visible_monsters(ctx, agent);
        visible.sort_by_key(|candidate| {
            (
                Reverse(candidate.monster.health),
                Reverse(candidate.risk_theirs),
                candidate.id(),
            )
        });

        if ctx.can_afford_casts(tuning.herd_casts) {
            if let Some(asset) = visible
                .iter()
                .find(|candidate| is_wardable(candidate, tuning.hold_shield_window))
            {
                let ward = Command::Protect {
                    target: asset.id(),
                };
                if ctx.cast(slot, ward, "Ward") {
                    return true;
                }
            }
            if let Some(drifter) = visible
                .iter()
                .find(|candidate| is_drifter(candidate, tuning.herd_health))
            {
                let redirect = Command::Redirect {
                    target: drifter.id(),
                    toward: ctx.their_base(),
                };
                if ctx.cast(slot, redirect, "Herd") {
                    return false;
                }
            }
        }

        ctx.order(slot, Command::Move { destination: point }, "Hold");
        false
    }

    /// Spends mana against the opponent: push a cluster, redirect a drifting
    /// monster, or ward an asset. Without a spell to cast the attacker returns
    /// to `anchor`, or patrols when there is none.
    fn strike(
        &mut self,
        ctx: &mut TurnContext<'_>,
        slot: usize,
        agent: &AgentSnapshot,
        offense: &OffenseTuning,
        anchor: Option<Point>,
    ) {
        let their_base = ctx.their_base();
        let mut visible = visible_monsters(ctx, agent);
        visible.sort_by_key(|candidate| (Reverse(candidate.risk_theirs), candidate.id()));

        if ctx.can_afford_casts(offense.min_casts) {
            let victims = visible
                .iter()
                .filter(|candidate| {
                    let position = candidate.monster.position;
                    !candidate.monster.is_shielded()
                        && agent
                            .position
                            .is_within(position, ctx.config.area_effect_radius)
                        && their_base.is_within(position, offense.cluster_reach)
                })
                .count();
            if victims >= offense.cluster_size.max(1)
                && ctx.cast(slot, Command::AreaEffect { toward: their_base }, "Gust")
            {
                return;
            }

            if let Some(drifter) = visible
                .iter()
                .find(|candidate| is_drifter(candidate, offense.redirect_health))
            {
                let redirect = Command::Redirect {
                    target: drifter.id(),
                    toward: their_base,
                };
                if ctx.cast(slot, redirect, "Herd") {
                    return;
                }
            }

            if let Some(asset) = visible
                .iter()
                .find(|candidate| is_wardable(candidate, offense.shield_window))
            {
                let ward = Command::Protect {
                    target: asset.id(),
                };
                if ctx.cast(slot, ward, "Ward") {
                    return;
                }
            }
        }

        match anchor {
            Some(point) => ctx.order(slot, Command::Move { destination: point }, "Assault"),
            None => self.patrol(ctx, slot, agent, offense.patrol, "Patrol"),
        }
    }

    /// Sweeps between two bearings around the opposing stronghold, turning
    /// around within one degree of either end.
    fn patrol(
        &mut self,
        ctx: &mut TurnContext<'_>,
        slot: usize,
        agent: &AgentSnapshot,
        patrol: Patrol,
        note: &'static str,
    ) {
        let their_base = ctx.their_base();
        let degrees = angle_between(their_base, agent.position);
        if degrees < patrol.low + 1 {
            self.cruise_high = true;
        } else if degrees > patrol.high - 1 {
            self.cruise_high = false;
        }

        let bearing = if self.cruise_high {
            patrol.high
        } else {
            patrol.low
        };
        let destination = Side::of(their_base).polar(their_base, patrol.radius, bearing);
        ctx.order(slot, Command::Move { destination }, note);
    }
}

/// Monsters the attacker can see and cast on, with their projections.
fn visible_monsters(ctx: &TurnContext<'_>, agent: &AgentSnapshot) -> Vec<ClassifiedMonster> {
    let range = ctx.config.agent_view_range.min(ctx.config.spell_range);
    ctx.monsters_near(agent.position, range)
        .into_iter()
        .filter_map(|monster| ctx.classification.find(monster.id).copied())
        .collect()
}

/// An unwarded monster that will miss the opposing stronghold on its own.
fn is_drifter(candidate: &ClassifiedMonster, min_health: i32) -> bool {
    !candidate.eta_theirs.is_reachable()
        && !candidate.monster.is_shielded()
        && candidate.monster.health >= min_health
}

/// An unwarded monster about to strike the opposing stronghold.
fn is_wardable(candidate: &ClassifiedMonster, window: u32) -> bool {
    !candidate.monster.is_shielded() && candidate.eta_theirs.is_within(window)
}
