use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use warden_core::{ArenaConfig, EntityId, MonsterSnapshot, Point, Stronghold, Team, ThreatTarget};
use warden_system_trajectory::{eta, risk, Eta};

fn monster(id: u32, position: Point, velocity: Point) -> MonsterSnapshot {
    MonsterSnapshot {
        id: EntityId::new(id),
        position,
        shield: 0,
        controlled: false,
        health: 12,
        velocity,
        base_directed: false,
        threat: ThreatTarget::Neither,
    }
}

/// Walks the monster by repeated subtraction of its speed along x.
fn turns_by_repeated_subtraction(mut x: i32, y: i32, speed: i32, capture: i32) -> u32 {
    let mut turns = 0;
    loop {
        let remaining = f64::from(x).hypot(f64::from(y));
        if remaining <= f64::from(capture) {
            return turns + (remaining / f64::from(speed)) as u32;
        }
        x -= speed;
        turns += 1;
    }
}

#[test]
fn straight_approach_matches_direct_computation() {
    let config = ArenaConfig::default();
    let mut stronghold = Stronghold::new(Team::Ours, Point::ZERO);
    stronghold.update(3, 50);
    let incoming = monster(1, Point::new(8000, 4500), Point::new(-400, 0));

    let expected = turns_by_repeated_subtraction(8000, 4500, 400, 5000);
    assert_eq!(expected, 27);
    assert_eq!(eta(&incoming, &stronghold, &config), Eta::Turns(expected));
}

#[test]
fn projection_terminates_and_is_idempotent_for_random_monsters() {
    let config = ArenaConfig::default();
    let ours = Stronghold::new(Team::Ours, Point::ZERO);
    let theirs = Stronghold::new(Team::Theirs, Point::new(config.width, config.height));
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed_0001);

    for id in 0..2_000 {
        let position = Point::new(rng.gen_range(0..=config.width), rng.gen_range(0..=config.height));
        let velocity = Point::new(rng.gen_range(-400..=400), rng.gen_range(-400..=400));
        let wanderer = monster(id, position, velocity);

        for stronghold in [&ours, &theirs] {
            let first = eta(&wanderer, stronghold, &config);
            let second = eta(&wanderer, stronghold, &config);
            assert_eq!(first, second, "eta must be a pure function of its inputs");
        }
    }
}

#[test]
fn boundary_skimming_monster_is_unreachable() {
    let config = ArenaConfig::default();
    let ours = Stronghold::new(Team::Ours, Point::ZERO);
    let skimmer = monster(3, Point::new(10_000, config.height), Point::new(0, 400));
    assert_eq!(eta(&skimmer, &ours, &config), Eta::Unreachable);
}

#[test]
fn extreme_velocity_leaves_the_arena_without_overflow() {
    let config = ArenaConfig::default();
    let ours = Stronghold::new(Team::Ours, Point::ZERO);
    for velocity in [
        Point::new(i32::MAX, 0),
        Point::new(i32::MIN, i32::MIN),
        Point::new(0, i32::MAX),
    ] {
        let runaway = monster(5, Point::new(config.width, config.height), velocity);
        assert_eq!(eta(&runaway, &ours, &config), Eta::Unreachable);
    }
}

#[test]
fn smaller_arena_changes_reachability() {
    let small = ArenaConfig {
        width: 9_000,
        height: 5_000,
        ..ArenaConfig::default()
    };
    let ours = Stronghold::new(Team::Ours, Point::ZERO);
    let outside = monster(4, Point::new(12_000, 4_500), Point::new(-400, 0));
    assert_eq!(eta(&outside, &ours, &small), Eta::Unreachable);
}

#[test]
fn nearer_base_directed_threat_never_scores_lower() {
    let config = ArenaConfig::default();
    let ours = Stronghold::new(Team::Ours, Point::ZERO);
    let mut rng = ChaCha8Rng::seed_from_u64(0x5eed_0002);

    for id in 0..500 {
        let near_x = rng.gen_range(500..6_000);
        let far_x = near_x + rng.gen_range(0..6_000);
        let y = rng.gen_range(0..3_000);

        let mut near = monster(id, Point::new(near_x, y), Point::new(-400, 0));
        let mut far = monster(id + 10_000, Point::new(far_x, y), Point::new(-400, 0));
        for threat in [&mut near, &mut far] {
            threat.base_directed = true;
            threat.threat = ThreatTarget::Ours;
        }

        let near_eta = eta(&near, &ours, &config);
        let far_eta = eta(&far, &ours, &config);
        if near_eta.turns() <= far_eta.turns() {
            assert!(risk(&ours, &near, &config) >= risk(&ours, &far, &config));
        }
    }
}
