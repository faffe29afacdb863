//! Defender passes, run in strict priority order.
//!
//! Every pass only considers defenders that have not been given an action yet
//! this turn: protection, pull-back, primary engagement, secondary engagement,
//! then the fallback to the default posts.

use std::cmp::Reverse;

use warden_core::{angle_between, max_health, Command, MonsterSnapshot, Point};
use warden_system_classifier::ClassifiedMonster;
use warden_system_trajectory::{is_finishable, is_outpaced, Eta};
use warden_world::query;

use crate::{context::TurnContext, other_defender};

/// How a defender is allowed to engage a monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Stance {
    /// The monster endangers our stronghold: spells are allowed.
    Defend,
    /// The monster is only farmed: physical attacks only.
    Farm,
}

/// Where each defender returns to when nothing needs its attention.
struct Posts {
    radius: i32,
    points: Vec<Point>,
}

pub(crate) fn plan(ctx: &mut TurnContext<'_>, madness: u32) {
    if ctx.defender_slots().is_empty() {
        return;
    }

    protect(ctx, madness);
    pull_back(ctx);
    let primary = engage_primary(ctx);
    let posts = default_posts(ctx);
    engage_secondary(ctx, primary, &posts);
    fall_back(ctx, &posts);
}

fn protect(ctx: &mut TurnContext<'_>, madness: u32) {
    let squad = ctx.tuning;
    let tuning = &squad.protection;
    let strongest = max_health(query::monsters(ctx.world));

    if strongest >= tuning.self_protect_health && madness > tuning.madness_trigger {
        for slot in ctx.defender_slots() {
            let Some(agent) = ctx.agent(slot) else {
                continue;
            };
            if !ctx.is_free(slot) || agent.is_shielded() {
                continue;
            }
            // Later slots keep a larger reserve so the first defender is warded first.
            let reserve = i32::try_from(slot + 1).unwrap_or(i32::MAX);
            if !ctx.can_afford_casts(reserve) {
                continue;
            }
            if ctx.cast(slot, Command::Protect { target: agent.id }, "Ward") {
                tracing::debug!(agent = %agent.id, madness, strongest, "self protection");
            }
        }
    }

    let defenders = ctx.defender_slots().len();
    for slot in ctx.defender_slots() {
        let Some(victim) = ctx.agent(slot) else {
            continue;
        };
        if !victim.controlled {
            continue;
        }

        let mate = other_defender(slot, defenders);
        let Some(helper) = ctx.agent(mate) else {
            continue;
        };
        if mate == slot
            || !ctx.is_free(mate)
            || !helper.position.is_within(victim.position, tuning.aid_range)
        {
            continue;
        }

        let warded = !victim.is_shielded()
            && helper
                .position
                .is_within(victim.position, ctx.config.spell_range)
            && ctx.cast(mate, Command::Protect { target: victim.id }, "Aid");
        if !warded {
            ctx.order(
                mate,
                Command::Move {
                    destination: victim.position,
                },
                "Aid",
            );
        }
        tracing::debug!(helper = %helper.id, victim = %victim.id, warded, "mutual aid");
    }
}

fn pull_back(ctx: &mut TurnContext<'_>) {
    let base = ctx.our_base();
    let near = ctx.config.mid_radius;
    let Some(threat) = ctx
        .classification
        .threats()
        .iter()
        .find(|threat| {
            !ctx.is_neutralized(threat.id()) && base.is_within(threat.monster.position, near)
        })
        .copied()
    else {
        return;
    };
    if threat.monster.is_shielded() {
        return;
    }

    let target = threat.monster.position;
    let interceptor = ctx
        .defender_slots()
        .filter(|slot| ctx.is_free(*slot))
        .filter_map(|slot| ctx.agent(slot).map(|agent| (slot, *agent)))
        .filter(|(_, agent)| {
            agent.position.is_within(target, ctx.config.spell_range)
                && is_outpaced(agent.position, target, threat.eta_ours, ctx.config)
        })
        .min_by_key(|(slot, agent)| (agent.position.distance_squared(target), *slot));

    let Some((slot, agent)) = interceptor else {
        return;
    };
    let redirect = Command::Redirect {
        target: threat.id(),
        toward: agent.position,
    };
    if ctx.cast(slot, redirect, "Pull") {
        ctx.neutralize(threat.id());
        tracing::debug!(agent = %agent.id, monster = %threat.id(), eta = %threat.eta_ours, "pull-back");
    }
}

fn engage_primary(ctx: &mut TurnContext<'_>) -> Option<ClassifiedMonster> {
    let target = ctx
        .classification
        .threats()
        .iter()
        .find(|threat| !ctx.is_neutralized(threat.id()))
        .copied()?;

    let slot = nearest_free_defender(ctx, target.monster.position)?;
    attack(ctx, slot, target.monster, target.eta_ours, Stance::Defend);
    tracing::debug!(slot, monster = %target.id(), "primary engagement");
    Some(target)
}

fn engage_secondary(ctx: &mut TurnContext<'_>, primary: Option<ClassifiedMonster>, posts: &Posts) {
    let base = ctx.our_base();
    let tuning = ctx.tuning;
    let defence = &tuning.defence;

    for slot in ctx.defender_slots() {
        if !ctx.is_free(slot) {
            continue;
        }
        let Some(agent) = ctx.agent(slot).copied() else {
            continue;
        };

        if let Some(primary) = primary.filter(|primary| !ctx.is_neutralized(primary.id())) {
            attack(ctx, slot, primary.monster, primary.eta_ours, Stance::Defend);
            tracing::debug!(slot, monster = %primary.id(), "doubling up");
            continue;
        }

        let next_threat = ctx
            .classification
            .threats()
            .iter()
            .find(|threat| {
                !ctx.is_neutralized(threat.id())
                    && base.is_within(threat.monster.position, ctx.config.mid_radius)
            })
            .copied();
        if let Some(threat) = next_threat {
            attack(ctx, slot, threat.monster, threat.eta_ours, Stance::Defend);
            tracing::debug!(slot, monster = %threat.id(), "secondary engagement");
            continue;
        }

        if !base.is_within(agent.position, posts.radius + defence.recall_margin) {
            continue;
        }

        let mut wilderness: Vec<ClassifiedMonster> = ctx
            .monsters_near(agent.position, ctx.config.agent_view_range)
            .into_iter()
            .filter(|monster| {
                base.is_within(monster.position, ctx.config.outer_radius)
                    && !ctx.is_neutralized(monster.id)
            })
            .filter_map(|monster| ctx.classification.find(monster.id).copied())
            .collect();
        wilderness.sort_by_key(|candidate| {
            (
                candidate.monster.position.distance_squared(agent.position),
                Reverse(candidate.risk_ours),
                candidate.id(),
            )
        });

        if let Some(prey) = wilderness.first().copied() {
            let stance = if prey.eta_ours.is_reachable() {
                Stance::Defend
            } else {
                Stance::Farm
            };
            attack(ctx, slot, prey.monster, prey.eta_ours, stance);
            tracing::debug!(slot, monster = %prey.id(), ?stance, "wilderness engagement");
        }
    }
}

fn fall_back(ctx: &mut TurnContext<'_>, posts: &Posts) {
    let base = ctx.our_base();
    let margin = ctx.tuning.defence.recall_margin;

    for slot in ctx.defender_slots() {
        if !ctx.is_free(slot) {
            continue;
        }
        let (Some(agent), Some(post)) = (ctx.agent(slot), posts.points.get(slot)) else {
            continue;
        };
        let note = if base.is_within(agent.position, posts.radius + margin) {
            "Post"
        } else {
            "Back"
        };
        ctx.order(slot, Command::Move { destination: *post }, note);
    }
}

/// Sends `slot` after `target`.
///
/// A defending agent casts the area-effect when the monster is in reach,
/// unwarded, not already being pushed by a teammate, and either an opposing
/// agent lurks near it or attrition alone will not finish it in time.
/// Otherwise the agent walks in to attack physically.
fn attack(ctx: &mut TurnContext<'_>, slot: usize, target: MonsterSnapshot, eta: Eta, stance: Stance) {
    let Some(agent) = ctx.agent(slot).copied() else {
        return;
    };
    let finishable = is_finishable(&target, eta, ctx.config);

    let in_reach = agent
        .position
        .is_within(target.position, ctx.config.area_effect_radius);
    if stance == Stance::Defend
        && in_reach
        && !target.is_shielded()
        && !ctx.area_effect_reaches(target.position)
        && (opponent_lurks_near(ctx, target.position) || !finishable)
    {
        let push = Command::AreaEffect {
            toward: ctx.their_base(),
        };
        if ctx.cast(slot, push, "Gust") {
            ctx.neutralize(target.id);
            return;
        }
    }

    let destination = ctx.engagement_point(&target, agent.position);
    ctx.order(slot, Command::Move { destination }, "Focus!");
    if stance == Stance::Defend && finishable {
        ctx.neutralize(target.id);
    }
}

/// Whether the opposing agent nearest our stronghold is close to `position`.
fn opponent_lurks_near(ctx: &TurnContext<'_>, position: Point) -> bool {
    let nearby = query::opponents_within(
        ctx.world,
        ctx.our_base(),
        ctx.config.mid_radius,
    );
    nearby
        .first()
        .and_then(|id| query::entity(ctx.world, *id))
        .map_or(false, |opponent| {
            opponent
                .position()
                .is_within(position, ctx.config.agent_view_range)
        })
}

fn nearest_free_defender(ctx: &TurnContext<'_>, target: Point) -> Option<usize> {
    ctx.defender_slots()
        .filter(|slot| ctx.is_free(*slot))
        .filter_map(|slot| ctx.agent(slot).map(|agent| (slot, agent.position)))
        .min_by_key(|(slot, position)| (position.distance_squared(target), *slot))
        .map(|(slot, _)| slot)
}

/// Default posts, re-aimed at the opposing agents nearest our stronghold.
fn default_posts(ctx: &TurnContext<'_>) -> Posts {
    let base = ctx.our_base();
    let ring = ctx.tuning.defence.posts(ctx.phase);
    let mut radius = ring.radius;
    let mut bearings = ring.bearings;

    let alerts: Vec<Point> = query::opponents_within(ctx.world, base, ctx.config.outer_radius)
        .into_iter()
        .filter_map(|id| query::entity(ctx.world, id).map(|entity| entity.position()))
        .take(2)
        .collect();
    if let Some(first) = alerts.first() {
        radius = (base.distance(*first) as i32)
            .min(ctx.config.mid_radius)
            .max(ctx.config.inner_radius);
        bearings[0] = angle_between(base, *first);
        bearings[1] = bearings[0] + 30;
    }
    if let Some(second) = alerts.get(1) {
        bearings[1] = angle_between(base, *second);
    }

    let side = ctx.our_side();
    let points = ctx
        .defender_slots()
        .map(|slot| side.polar(base, radius, bearings[slot % bearings.len()]))
        .collect();
    Posts { radius, points }
}
