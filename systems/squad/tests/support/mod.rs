#![allow(dead_code)]

use warden_core::{ArenaConfig, EntityId, EntityRecord, Point, StrongholdReading, TurnSnapshot};
use warden_system_classifier::{Classification, Classifier};
use warden_system_squad::{Squad, SquadTuning, TurnPlan};
use warden_world::{self as world, World};

pub const MONSTER: i32 = 0;
pub const AGENT: i32 = 1;
pub const OPPONENT: i32 = 2;

pub fn unit(id: u32, category: i32, x: i32, y: i32) -> EntityRecord {
    EntityRecord {
        id: EntityId::new(id),
        category,
        position: Point::new(x, y),
        shield: 0,
        controlled: false,
        health: 0,
        velocity: Point::ZERO,
        base_directed: false,
        threat: 0,
    }
}

pub fn monster(id: u32, x: i32, y: i32, vx: i32, vy: i32, health: i32) -> EntityRecord {
    EntityRecord {
        health,
        velocity: Point::new(vx, vy),
        ..unit(id, MONSTER, x, y)
    }
}

pub fn snapshot(mana: i32, entities: Vec<EntityRecord>) -> TurnSnapshot {
    TurnSnapshot {
        ours: StrongholdReading { health: 3, mana },
        theirs: StrongholdReading {
            health: 3,
            mana: 0,
        },
        entities,
    }
}

/// Drives one match through the world, classifier, and planner.
pub struct Match {
    pub world: World,
    pub classifier: Classifier,
    pub classification: Classification,
    pub squad: Squad,
}

impl Match {
    pub fn new(base: Point) -> Self {
        Self::with_arena(ArenaConfig::default(), base)
    }

    pub fn with_arena(config: ArenaConfig, base: Point) -> Self {
        Self {
            world: World::new(config, base),
            classifier: Classifier::new(),
            classification: Classification::default(),
            squad: Squad::new(SquadTuning::default()),
        }
    }

    pub fn play(&mut self, snapshot: TurnSnapshot) -> TurnPlan {
        world::apply(&mut self.world, snapshot).expect("scripted snapshot is valid");
        self.classifier
            .handle(&self.world, &mut self.classification);
        self.squad.plan(&self.world, &self.classification)
    }

    pub fn lines(&mut self, snapshot: TurnSnapshot) -> Vec<String> {
        self.play(snapshot)
            .orders()
            .iter()
            .map(ToString::to_string)
            .collect()
    }
}
