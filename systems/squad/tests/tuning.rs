use warden_core::{
    ArenaConfig, Command, EntityId, EntityRecord, Phase, Point, StrongholdReading, TurnSnapshot,
};
use warden_system_classifier::{Classification, Classifier};
use warden_system_squad::{Squad, SquadTuning};
use warden_world::{self as world, World};

fn agent(id: u32, x: i32, y: i32) -> EntityRecord {
    EntityRecord {
        id: EntityId::new(id),
        category: 1,
        position: Point::new(x, y),
        shield: 0,
        controlled: false,
        health: 0,
        velocity: Point::ZERO,
        base_directed: false,
        threat: 0,
    }
}

#[test]
fn partial_override_keeps_remaining_defaults() {
    let tuning: SquadTuning = toml::from_str(
        r#"
        [phase]
        mid_mana = 150

        [defence]
        recall_margin = 1200

        [defence.opening_posts]
        radius = 6500
        bearings = [20, 70]

        [attacker]
        advance = { x = 11000, y = 6500 }
        "#,
    )
    .expect("valid tuning");

    let defaults = SquadTuning::default();
    assert_eq!(tuning.phase.mid_mana, 150);
    assert_eq!(
        tuning.phase.ending_threat_health,
        defaults.phase.ending_threat_health
    );
    assert_eq!(tuning.defence.recall_margin, 1_200);
    assert_eq!(tuning.defence.posts(Phase::Opening).bearings, [20, 70]);
    assert_eq!(tuning.defence.posts(Phase::Mid), defaults.defence.later_posts);
    assert_eq!(tuning.attacker.advance, Point::new(11_000, 6_500));
    assert_eq!(tuning.attacker.staging, defaults.attacker.staging);
    assert_eq!(tuning.protection, defaults.protection);
}

#[test]
fn loaded_posts_drive_the_planner() {
    let tuning: SquadTuning = toml::from_str(
        r#"
        [defence.opening_posts]
        radius = 5000
        bearings = [0, 90]
        "#,
    )
    .expect("valid tuning");

    let mut world = World::new(ArenaConfig::default(), Point::ZERO);
    world::apply(
        &mut world,
        TurnSnapshot {
            ours: StrongholdReading { health: 3, mana: 0 },
            theirs: StrongholdReading { health: 3, mana: 0 },
            entities: vec![agent(0, 100, 100), agent(1, 200, 200), agent(2, 8000, 4000)],
        },
    )
    .expect("valid snapshot");
    let mut classification = Classification::default();
    Classifier::new().handle(&world, &mut classification);

    let plan = Squad::new(tuning).plan(&world, &classification);
    let destinations: Vec<Command> = plan.orders().iter().map(|order| order.command).collect();
    assert_eq!(
        destinations[..2],
        [
            Command::Move {
                destination: Point::new(5000, 0),
            },
            Command::Move {
                destination: Point::new(0, 5000),
            },
        ]
    );
}

#[test]
fn empty_document_yields_defaults() {
    let tuning: SquadTuning = toml::from_str("").expect("empty tuning");
    assert_eq!(tuning, SquadTuning::default());
}
