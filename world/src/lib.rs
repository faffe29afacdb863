#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative match state for the Warden planning engine.
//!
//! Strongholds persist for the whole match and are updated in place. Every
//! other record is rebuilt from scratch by [`apply`] each turn, including the
//! id index used to resolve an entity when only its identifier is known.

use std::collections::HashMap;

use warden_core::{
    AgentSnapshot, ArenaConfig, Entity, EntityId, MonsterSnapshot, Point, SnapshotError,
    Stronghold, Team, TurnSnapshot,
};

/// Represents the state of one match as seen from our side.
#[derive(Debug)]
pub struct World {
    config: ArenaConfig,
    ours: Stronghold,
    theirs: Stronghold,
    monsters: Vec<MonsterSnapshot>,
    agents: Vec<AgentSnapshot>,
    opponents: Vec<AgentSnapshot>,
    index: HashMap<EntityId, Entity>,
    turn: u32,
}

impl World {
    /// Creates a world for a match where our stronghold sits at `our_position`.
    ///
    /// The opposing stronghold is placed in the opposite corner.
    #[must_use]
    pub fn new(config: ArenaConfig, our_position: Point) -> Self {
        let their_position = config.opposite_corner(our_position);
        Self {
            ours: Stronghold::new(Team::Ours, our_position),
            theirs: Stronghold::new(Team::Theirs, their_position),
            monsters: Vec::new(),
            agents: Vec::new(),
            opponents: Vec::new(),
            index: HashMap::new(),
            turn: 0,
            config,
        }
    }
}

/// Replaces the per-turn state of the world with the provided snapshot.
///
/// Every record is validated before anything is mutated, so a rejected
/// snapshot leaves the previous turn intact.
pub fn apply(world: &mut World, snapshot: TurnSnapshot) -> Result<(), SnapshotError> {
    let entities = snapshot
        .entities
        .into_iter()
        .map(Entity::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    world.ours.update(snapshot.ours.health, snapshot.ours.mana);
    world
        .theirs
        .update(snapshot.theirs.health, snapshot.theirs.mana);

    world.monsters.clear();
    world.agents.clear();
    world.opponents.clear();
    world.index.clear();

    for entity in entities {
        let _ = world.index.insert(entity.id(), entity);
        match entity {
            Entity::Monster(monster) => world.monsters.push(monster),
            Entity::Agent(agent) => world.agents.push(agent),
            Entity::Opponent(agent) => world.opponents.push(agent),
        }
    }

    world.turn = world.turn.saturating_add(1);
    tracing::debug!(
        turn = world.turn,
        monsters = world.monsters.len(),
        agents = world.agents.len(),
        opponents = world.opponents.len(),
        mana = world.ours.mana(),
        "snapshot applied"
    );
    Ok(())
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use super::World;
    use warden_core::{
        AgentSnapshot, ArenaConfig, Entity, EntityId, MonsterSnapshot, Point, Stronghold,
    };

    /// Arena constants the match is played with.
    #[must_use]
    pub fn config(world: &World) -> &ArenaConfig {
        &world.config
    }

    /// Our stronghold as of the latest snapshot.
    #[must_use]
    pub fn our_stronghold(world: &World) -> &Stronghold {
        &world.ours
    }

    /// The opposing stronghold as of the latest snapshot.
    #[must_use]
    pub fn their_stronghold(world: &World) -> &Stronghold {
        &world.theirs
    }

    /// Number of snapshots applied so far.
    #[must_use]
    pub fn turn(world: &World) -> u32 {
        world.turn
    }

    /// Visible monsters in feed order.
    #[must_use]
    pub fn monsters(world: &World) -> &[MonsterSnapshot] {
        &world.monsters
    }

    /// Our agents in roster order.
    #[must_use]
    pub fn agents(world: &World) -> &[AgentSnapshot] {
        &world.agents
    }

    /// Visible opposing agents in feed order.
    #[must_use]
    pub fn opponents(world: &World) -> &[AgentSnapshot] {
        &world.opponents
    }

    /// Resolves an entity of the current turn from its identifier.
    #[must_use]
    pub fn entity(world: &World, id: EntityId) -> Option<&Entity> {
        world.index.get(&id)
    }

    /// Monsters within `range` of `center`, in feed order.
    #[must_use]
    pub fn monsters_within(world: &World, center: Point, range: i32) -> Vec<MonsterSnapshot> {
        world
            .monsters
            .iter()
            .filter(|monster| center.is_within(monster.position, range))
            .copied()
            .collect()
    }

    /// Identifiers of opposing agents within `range` of `center`, nearest first.
    ///
    /// Ties are broken by identifier.
    #[must_use]
    pub fn opponents_within(world: &World, center: Point, range: i32) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = world
            .opponents
            .iter()
            .filter(|agent| center.is_within(agent.position, range))
            .map(|agent| agent.id)
            .collect();
        ids.sort_by_key(|id| {
            let distance = entity(world, *id)
                .map_or(i64::MAX, |entity| entity.position().distance_squared(center));
            (distance, *id)
        });
        ids
    }
}
