//! Per-turn game-info dump at debug level.

use warden_core::{Area, Lane, Point};
use warden_system_classifier::{Classification, ClassifiedMonster};
use warden_system_squad::Squad;
use warden_world::{query, World};

const SHOWN_PER_CLASS: usize = 3;

/// Logs the state the planner is about to act on.
pub(crate) fn log_game_info(world: &World, classification: &Classification, squad: &Squad) {
    let ours = query::our_stronghold(world);
    let theirs = query::their_stronghold(world);
    tracing::debug!(
        turn = query::turn(world),
        phase = ?squad.phase(),
        all_in = squad.all_in(),
        madness = squad.madness(),
        attacker = ?squad.attacker_step(),
        "game info"
    );
    tracing::debug!(
        health = ours.health(),
        mana = ours.mana(),
        their_health = theirs.health(),
        their_mana = theirs.mana(),
        "strongholds"
    );

    for agent in query::agents(world) {
        tracing::debug!(
            id = %agent.id,
            position = ?agent.position,
            shield = agent.shield,
            controlled = agent.controlled,
            "agent"
        );
    }
    for opponent in query::opponents(world) {
        tracing::debug!(
            id = %opponent.id,
            position = ?opponent.position,
            lane = ?Lane::classify(ours.position(), opponent.position),
            area = ?Area::classify(ours.position(), opponent.position),
            "opponent"
        );
    }

    let base = ours.position();
    log_class("threat", classification.threats(), base);
    log_class("asset", classification.assets(), base);
    log_class("neutral", classification.neutral(), base);
}

fn log_class(class: &'static str, monsters: &[ClassifiedMonster], base: Point) {
    for classified in monsters.iter().take(SHOWN_PER_CLASS) {
        tracing::debug!(
            class,
            id = %classified.id(),
            health = classified.monster.health,
            eta_ours = %classified.eta_ours,
            eta_theirs = %classified.eta_theirs,
            risk_ours = classified.risk_ours,
            risk_theirs = classified.risk_theirs,
            lane = ?Lane::classify(base, classified.monster.position),
            area = ?Area::classify(base, classified.monster.position),
            "monster"
        );
    }
    if monsters.len() > SHOWN_PER_CLASS {
        tracing::debug!(class, hidden = monsters.len() - SHOWN_PER_CLASS, "more monsters");
    }
}
