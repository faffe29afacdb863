mod support;

use std::{
    collections::hash_map::DefaultHasher,
    hash::{Hash, Hasher},
};

use support::{monster, snapshot, unit, Match, AGENT, OPPONENT};
use warden_core::{EntityRecord, Phase, Point, TurnSnapshot};
use warden_system_squad::AttackerStep;

#[test]
fn deterministic_replay_of_a_scripted_match() {
    let script = scripted_turns();
    let turns = script.len();
    let first = replay(script.clone());
    let second = replay(script);

    assert_eq!(first, second, "replay diverged between runs");
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_eq!(first.turns.len(), turns);

    for turn in &first.turns {
        assert_eq!(turn.lines.len(), 3, "every agent receives one order");
    }

    let phases: Vec<Phase> = first.turns.iter().map(|turn| turn.phase).collect();
    assert!(phases.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(phases.last(), Some(&Phase::Mid));

    let steps: Vec<AttackerStep> = first.turns.iter().map(|turn| turn.step).collect();
    assert!(steps.windows(2).all(|pair| pair[0] <= pair[1]));

    let mana: Vec<i32> = first.turns.iter().map(|turn| turn.mana_remaining).collect();
    assert!(mana.iter().all(|left| *left >= 0));
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct TurnRecord {
    phase: Phase,
    step: AttackerStep,
    mana_remaining: i32,
    lines: Vec<String>,
}

#[derive(Debug, PartialEq, Eq)]
struct ReplayOutcome {
    turns: Vec<TurnRecord>,
}

impl ReplayOutcome {
    fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.turns.hash(&mut hasher);
        hasher.finish()
    }
}

fn replay(script: Vec<TurnSnapshot>) -> ReplayOutcome {
    let mut game = Match::new(Point::ZERO);
    let mut turns = Vec::with_capacity(script.len());

    for snapshot in script {
        let plan = game.play(snapshot);
        turns.push(TurnRecord {
            phase: plan.phase,
            step: game.squad.attacker_step(),
            mana_remaining: plan.mana_remaining,
            lines: plan.orders().iter().map(ToString::to_string).collect(),
        });
    }

    ReplayOutcome { turns }
}

/// Two monsters walk toward our stronghold while the opposing squad closes in
/// and mana keeps accumulating.
fn scripted_turns() -> Vec<TurnSnapshot> {
    (0..16)
        .map(|turn: i32| {
            let mut entities: Vec<EntityRecord> = vec![
                unit(0, AGENT, 3000, 1500),
                unit(1, AGENT, 1500, 3000),
                unit(2, AGENT, 2200 + turn * 800, 6800),
            ];

            let mut runner = monster(10, 9000 - turn * 400, 4500 - turn * 200, -400, -200, 12);
            runner.base_directed = turn > 6;
            runner.threat = if turn > 6 { 1 } else { 0 };
            entities.push(runner);
            entities.push(monster(11, 6000 + turn * 300, 2000, 300, 0, 18 + turn));

            if turn >= 10 {
                entities.push(unit(20, OPPONENT, 4000, 2000));
                entities.push(unit(21, OPPONENT, 2000, 4000));
                entities.push(unit(22, OPPONENT, 3500, 3500));
            }

            snapshot(40 + turn * 20, entities)
        })
        .collect()
}
