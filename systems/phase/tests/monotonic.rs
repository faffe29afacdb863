use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use warden_core::{ArenaConfig, EntityId, EntityRecord, Phase, Point, StrongholdReading, TurnSnapshot};
use warden_system_classifier::{Classification, Classifier};
use warden_system_phase::{PhaseInputs, PhaseThresholds, PhaseTracker};
use warden_world::{self as world, World};

#[test]
fn phase_and_all_in_never_regress_for_random_inputs() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x9a5e_0001);

    for _ in 0..50 {
        let mut tracker = PhaseTracker::new(PhaseThresholds::default());
        let mut previous_phase = tracker.phase();
        let mut previous_all_in = tracker.all_in();

        for _ in 0..100 {
            let phase = tracker.update(PhaseInputs {
                strongest_threat_health: rng.gen_range(0..30),
                our_mana: rng.gen_range(0..300),
                opponents_clustered: rng.gen_bool(0.02),
            });

            assert!(phase >= previous_phase, "{previous_phase:?} regressed to {phase:?}");
            assert!(tracker.all_in() || !previous_all_in);
            if tracker.all_in() {
                assert!(phase >= Phase::Mid);
            }
            previous_phase = phase;
            previous_all_in = tracker.all_in();
        }
    }
}

fn agent(id: u32, category: i32, position: Point) -> EntityRecord {
    EntityRecord {
        id: EntityId::new(id),
        category,
        position,
        shield: 0,
        controlled: false,
        health: 0,
        velocity: Point::ZERO,
        base_directed: false,
        threat: 0,
    }
}

#[test]
fn observation_detects_a_clustered_opposing_squad() {
    let mut world = World::new(ArenaConfig::default(), Point::ZERO);
    let mut classification = Classification::default();
    let mut classifier = Classifier::new();

    let mut snapshot = TurnSnapshot {
        ours: StrongholdReading {
            health: 3,
            mana: 120,
        },
        theirs: StrongholdReading {
            health: 3,
            mana: 40,
        },
        entities: vec![
            agent(3, 2, Point::new(2000, 2000)),
            agent(4, 2, Point::new(3000, 1000)),
            agent(5, 2, Point::new(1000, 4000)),
        ],
    };
    world::apply(&mut world, snapshot.clone()).expect("valid snapshot");
    classifier.handle(&world, &mut classification);
    let clustered = PhaseInputs::observe(&world, &classification);
    assert!(clustered.opponents_clustered);
    assert_eq!(clustered.our_mana, 120);
    assert_eq!(clustered.strongest_threat_health, 0);

    snapshot.entities[2].position = Point::new(9000, 4000);
    world::apply(&mut world, snapshot).expect("valid snapshot");
    classifier.handle(&world, &mut classification);
    let scattered = PhaseInputs::observe(&world, &classification);
    assert!(!scattered.opponents_clustered);
}

#[test]
fn clustering_follows_the_arena_mid_radius() {
    let squad = vec![
        agent(3, 2, Point::new(4000, 0)),
        agent(4, 2, Point::new(0, 4500)),
        agent(5, 2, Point::new(3000, 3000)),
    ];
    let observe = |config: ArenaConfig| {
        let mut world = World::new(config, Point::ZERO);
        world::apply(
            &mut world,
            TurnSnapshot {
                entities: squad.clone(),
                ..TurnSnapshot::default()
            },
        )
        .expect("valid snapshot");
        let mut classification = Classification::default();
        Classifier::new().handle(&world, &mut classification);
        PhaseInputs::observe(&world, &classification).opponents_clustered
    };

    assert!(observe(ArenaConfig::default()));
    assert!(!observe(ArenaConfig {
        mid_radius: 4_000,
        ..ArenaConfig::default()
    }));
}
