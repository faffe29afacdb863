#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure projection of monster trajectories against strongholds.
//!
//! Everything here is a function of one snapshot: positions and velocities
//! are never integrated across turns, so callers recompute every turn.

use std::fmt;

use warden_core::{ArenaConfig, MonsterSnapshot, Point, Stronghold};

/// Projected whole turns until a monster enters a stronghold's capture radius.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Eta {
    /// The monster arrives after this many turns.
    Turns(u32),
    /// The projected path leaves the arena before arriving.
    Unreachable,
}

impl Eta {
    /// Number of turns when reachable.
    #[must_use]
    pub const fn turns(self) -> Option<u32> {
        match self {
            Self::Turns(turns) => Some(turns),
            Self::Unreachable => None,
        }
    }

    /// Whether the monster eventually arrives.
    #[must_use]
    pub const fn is_reachable(self) -> bool {
        matches!(self, Self::Turns(_))
    }

    /// Whether the monster arrives within `limit` turns, inclusive.
    #[must_use]
    pub const fn is_within(self, limit: u32) -> bool {
        match self {
            Self::Turns(turns) => turns <= limit,
            Self::Unreachable => false,
        }
    }
}

impl fmt::Display for Eta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Turns(turns) => write!(f, "{turns}"),
            Self::Unreachable => f.write_str("unreachable"),
        }
    }
}

/// Projects `monster` along its velocity until it reaches `stronghold`.
///
/// The projection steps one turn at a time. Once the remaining distance is
/// within the capture radius, the turns the monster still needs to walk the
/// remainder at monster speed are added, rounded down. A projected position
/// outside the arena ends the projection as [`Eta::Unreachable`]; so does a
/// zero velocity outside the capture radius, since such a monster never moves.
/// Any non-zero integer velocity moves at least one coordinate monotonically,
/// so the loop always terminates.
#[must_use]
pub fn eta(monster: &MonsterSnapshot, stronghold: &Stronghold, config: &ArenaConfig) -> Eta {
    let target = stronghold.position();
    let capture = f64::from(config.capture_radius);
    let speed = f64::from(config.monster_speed.max(1));

    let mut position = monster.position;
    let mut turns: u32 = 0;
    while config.contains(position) {
        let remaining = position.distance(target);
        if remaining <= capture {
            return Eta::Turns(turns.saturating_add((remaining / speed) as u32));
        }
        if monster.velocity == Point::ZERO {
            return Eta::Unreachable;
        }
        turns = turns.saturating_add(1);
        position += monster.velocity;
    }

    Eta::Unreachable
}

/// Priority of `monster` relative to `stronghold`, computing the ETA first.
#[must_use]
pub fn risk(stronghold: &Stronghold, monster: &MonsterSnapshot, config: &ArenaConfig) -> u32 {
    risk_from_eta(stronghold, monster, eta(monster, stronghold, config))
}

/// Priority of `monster` relative to `stronghold` given a precomputed ETA.
///
/// A monster the game already reports as base-directed scores `100 - eta`
/// when it threatens this stronghold and nothing otherwise. Any other monster
/// that can reach the stronghold scores `70 - eta`. Scores never drop below
/// zero, and an unreachable monster always scores zero.
#[must_use]
pub fn risk_from_eta(stronghold: &Stronghold, monster: &MonsterSnapshot, eta: Eta) -> u32 {
    let Some(turns) = eta.turns() else {
        return 0;
    };
    let turns = i64::from(turns);

    let score = if monster.base_directed {
        if stronghold.is_threatened_by(monster.threat) {
            100 - turns
        } else {
            0
        }
    } else {
        70 - turns
    };

    u32::try_from(score.max(0)).unwrap_or(0)
}

/// Whether ongoing physical attacks kill the monster before it arrives.
///
/// True when its health is below `eta × damage per turn`; never true for an
/// unreachable monster.
#[must_use]
pub fn is_finishable(monster: &MonsterSnapshot, eta: Eta, config: &ArenaConfig) -> bool {
    eta.turns().map_or(false, |turns| {
        i64::from(monster.health) < i64::from(turns) * i64::from(config.attack_damage)
    })
}

/// Whole turns an agent needs to cover `distance`, rounded up.
#[must_use]
pub fn travel_turns(distance: f64, config: &ArenaConfig) -> u32 {
    let speed = f64::from(config.agent_speed.max(1));
    (distance / speed).ceil() as u32
}

/// Whether an agent at `agent` is too slow to meet a threat at `target`
/// before it arrives, leaving a one-turn margin.
///
/// Unreachable threats never outpace anyone.
#[must_use]
pub fn is_outpaced(agent: Point, target: Point, eta: Eta, config: &ArenaConfig) -> bool {
    eta.turns().map_or(false, |turns| {
        i64::from(travel_turns(agent.distance(target), config)) >= i64::from(turns) - 1
    })
}
