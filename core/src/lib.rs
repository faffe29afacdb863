#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Warden planning engine.
//!
//! This crate defines the vocabulary that connects the adapter, the
//! per-match world, and the pure planning systems. The adapter turns the raw
//! feed into a [`TurnSnapshot`], the world validates it into typed [`Entity`]
//! records, systems read those records and answer with [`Action`] intents,
//! and the squad commit step folds the intents into exactly one [`Order`]
//! per agent.

use std::fmt;

use serde::{Deserialize, Serialize};

mod config;
mod geometry;

pub use config::ArenaConfig;
pub use geometry::{angle_between, polar_to_cartesian, Area, Lane, Point, Side};

/// Unique identifier the game assigns to every visible entity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(u32);

impl EntityId {
    /// Creates a new identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Stronghold a monster's current trajectory threatens, as reported by the game.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ThreatTarget {
    /// The trajectory threatens neither stronghold.
    #[default]
    Neither,
    /// The trajectory threatens our stronghold.
    Ours,
    /// The trajectory threatens the opposing stronghold.
    Theirs,
}

impl ThreatTarget {
    /// Decodes the wire indicator: 0 = neither, 1 = ours, 2 = theirs.
    #[must_use]
    pub const fn from_code(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Neither),
            1 => Some(Self::Ours),
            2 => Some(Self::Theirs),
            _ => None,
        }
    }
}

/// Which team owns a stronghold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Team {
    /// The team this engine plays for.
    Ours,
    /// The opposing team.
    Theirs,
}

/// A team's home structure.
///
/// Health and mana are overwritten every turn from the feed. Between those
/// updates the planner debits mana tentatively through [`Stronghold::spend`],
/// which refuses any debit that would leave the pool negative.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Stronghold {
    owner: Team,
    position: Point,
    health: i32,
    mana: i32,
}

impl Stronghold {
    /// Creates a stronghold with no health or mana recorded yet.
    #[must_use]
    pub const fn new(owner: Team, position: Point) -> Self {
        Self {
            owner,
            position,
            health: 0,
            mana: 0,
        }
    }

    /// Replaces health and mana with the authoritative values of a new turn.
    pub fn update(&mut self, health: i32, mana: i32) {
        self.health = health;
        self.mana = mana.max(0);
    }

    /// Fixed position of the stronghold.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// Remaining health.
    #[must_use]
    pub const fn health(&self) -> i32 {
        self.health
    }

    /// Mana currently available, after any tentative debits.
    #[must_use]
    pub const fn mana(&self) -> i32 {
        self.mana
    }

    /// Reports whether `cost` can be paid without going negative.
    #[must_use]
    pub const fn can_afford(&self, cost: i32) -> bool {
        cost >= 0 && self.mana >= cost
    }

    /// Debits `cost` when affordable. Returns whether the debit happened.
    pub fn spend(&mut self, cost: i32) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.mana -= cost;
        true
    }

    /// Reports whether a game-supplied threat indicator names this stronghold.
    #[must_use]
    pub const fn is_threatened_by(&self, threat: ThreatTarget) -> bool {
        matches!(
            (self.owner, threat),
            (Team::Ours, ThreatTarget::Ours) | (Team::Theirs, ThreatTarget::Theirs)
        )
    }
}

/// Authoritative health and mana of one stronghold for a single turn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StrongholdReading {
    /// Remaining health.
    pub health: i32,
    /// Mana available at the start of the turn.
    pub mana: i32,
}

/// One row of the raw per-turn feed, before its category is validated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EntityRecord {
    /// Unique identifier.
    pub id: EntityId,
    /// Raw category: 0 = monster, 1 = our agent, 2 = opposing agent.
    pub category: i32,
    /// Current position.
    pub position: Point,
    /// Raw ward countdown; zero when unwarded.
    pub shield: i32,
    /// Whether the unit is under a redirect spell.
    pub controlled: bool,
    /// Remaining health.
    pub health: i32,
    /// Per-turn velocity; zero for agents.
    pub velocity: Point,
    /// Whether the game already considers the monster base-directed.
    pub base_directed: bool,
    /// Raw threat indicator: 0 = neither, 1 = ours, 2 = theirs.
    pub threat: i32,
}

/// Immutable per-turn state of a monster.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MonsterSnapshot {
    /// Unique identifier.
    pub id: EntityId,
    /// Current position.
    pub position: Point,
    /// Turns until the ward fades; zero when unwarded.
    pub shield: u32,
    /// Whether the monster is under a redirect spell.
    pub controlled: bool,
    /// Remaining health.
    pub health: i32,
    /// Fixed per-turn velocity.
    pub velocity: Point,
    /// Whether the game already considers the monster base-directed.
    pub base_directed: bool,
    /// Stronghold the monster's trajectory threatens.
    pub threat: ThreatTarget,
}

impl MonsterSnapshot {
    /// Whether spells that displace or redirect the monster will bounce off.
    #[must_use]
    pub const fn is_shielded(&self) -> bool {
        self.shield > 0
    }
}

/// Immutable per-turn state of an agent, ours or theirs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AgentSnapshot {
    /// Unique identifier.
    pub id: EntityId,
    /// Current position.
    pub position: Point,
    /// Turns until the ward fades; zero when unwarded.
    pub shield: u32,
    /// Whether the agent is under a redirect spell.
    pub controlled: bool,
    /// Remaining health.
    pub health: i32,
}

impl AgentSnapshot {
    /// Whether spells cast on the agent will bounce off.
    #[must_use]
    pub const fn is_shielded(&self) -> bool {
        self.shield > 0
    }
}

/// A validated feed record tagged by role.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    /// A neutral monster.
    Monster(MonsterSnapshot),
    /// One of our agents.
    Agent(AgentSnapshot),
    /// One of the opponent's agents.
    Opponent(AgentSnapshot),
}

impl Entity {
    /// Identifier of the underlying unit.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        match self {
            Self::Monster(monster) => monster.id,
            Self::Agent(agent) | Self::Opponent(agent) => agent.id,
        }
    }

    /// Position of the underlying unit.
    #[must_use]
    pub const fn position(&self) -> Point {
        match self {
            Self::Monster(monster) => monster.position,
            Self::Agent(agent) | Self::Opponent(agent) => agent.position,
        }
    }
}

impl TryFrom<EntityRecord> for Entity {
    type Error = SnapshotError;

    fn try_from(record: EntityRecord) -> Result<Self, Self::Error> {
        let shield = u32::try_from(record.shield).map_err(|_| SnapshotError::NegativeShield {
            id: record.id,
            shield: record.shield,
        })?;
        let agent = || AgentSnapshot {
            id: record.id,
            position: record.position,
            shield,
            controlled: record.controlled,
            health: record.health,
        };

        match record.category {
            0 => {
                let threat = ThreatTarget::from_code(record.threat).ok_or(
                    SnapshotError::UnknownThreat {
                        id: record.id,
                        threat: record.threat,
                    },
                )?;
                Ok(Self::Monster(MonsterSnapshot {
                    id: record.id,
                    position: record.position,
                    shield,
                    controlled: record.controlled,
                    health: record.health,
                    velocity: record.velocity,
                    base_directed: record.base_directed,
                    threat,
                }))
            }
            1 => Ok(Self::Agent(agent())),
            2 => Ok(Self::Opponent(agent())),
            category => Err(SnapshotError::UnknownCategory {
                id: record.id,
                category,
            }),
        }
    }
}

/// Everything the feed reports for one turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnSnapshot {
    /// Our stronghold's health and mana.
    pub ours: StrongholdReading,
    /// The opposing stronghold's health and mana.
    pub theirs: StrongholdReading,
    /// Every visible entity in feed order.
    pub entities: Vec<EntityRecord>,
}

/// Reasons a turn snapshot is rejected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    /// The category column held a value outside 0..=2.
    #[error("entity {id} has unknown category {category}")]
    UnknownCategory {
        /// Offending entity.
        id: EntityId,
        /// Raw category value.
        category: i32,
    },
    /// The threat column of a monster held a value outside 0..=2.
    #[error("monster {id} has unknown threat indicator {threat}")]
    UnknownThreat {
        /// Offending entity.
        id: EntityId,
        /// Raw threat value.
        threat: i32,
    },
    /// The shield column held a negative countdown.
    #[error("entity {id} has negative shield {shield}")]
    NegativeShield {
        /// Offending entity.
        id: EntityId,
        /// Raw shield value.
        shield: i32,
    },
}

/// Highest health among the provided monsters, or zero when there are none.
#[must_use]
pub fn max_health<'a, I>(monsters: I) -> i32
where
    I: IntoIterator<Item = &'a MonsterSnapshot>,
{
    monsters
        .into_iter()
        .map(|monster| monster.health)
        .max()
        .unwrap_or(0)
        .max(0)
}

/// The closed set of commands an agent can receive in a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Stay in place.
    Hold,
    /// Walk toward an absolute position.
    Move {
        /// Destination of the move.
        destination: Point,
    },
    /// Push every unshielded unit around the caster toward a point.
    AreaEffect {
        /// Point the pushed units are sent toward.
        toward: Point,
    },
    /// Ward a unit against displacement and redirection.
    Protect {
        /// Unit receiving the ward.
        target: EntityId,
    },
    /// Force a unit to walk toward a point.
    Redirect {
        /// Unit being redirected.
        target: EntityId,
        /// Point the unit is sent toward.
        toward: Point,
    },
}

impl Command {
    /// Whether the command consumes mana.
    #[must_use]
    pub const fn is_spell(&self) -> bool {
        matches!(
            self,
            Self::AreaEffect { .. } | Self::Protect { .. } | Self::Redirect { .. }
        )
    }

    /// Whether the command is the area-effect spell.
    #[must_use]
    pub const fn is_area_effect(&self) -> bool {
        matches!(self, Self::AreaEffect { .. })
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hold => f.write_str("WAIT"),
            Self::Move { destination } => {
                write!(f, "MOVE {} {}", destination.x(), destination.y())
            }
            Self::AreaEffect { toward } => write!(f, "SPELL WIND {} {}", toward.x(), toward.y()),
            Self::Protect { target } => write!(f, "SPELL SHIELD {target}"),
            Self::Redirect { target, toward } => {
                write!(f, "SPELL CONTROL {target} {} {}", toward.x(), toward.y())
            }
        }
    }
}

/// Planner intent for one roster slot, queued before the commit step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Action {
    /// Roster index of the agent that should act.
    pub agent: usize,
    /// Command the agent should carry out.
    pub command: Command,
    /// Optional human-readable tag with no gameplay effect.
    pub note: Option<&'static str>,
}

impl Action {
    /// Creates an action without an annotation.
    #[must_use]
    pub const fn new(agent: usize, command: Command) -> Self {
        Self {
            agent,
            command,
            note: None,
        }
    }

    /// Attaches an annotation to the action.
    #[must_use]
    pub const fn with_note(mut self, note: &'static str) -> Self {
        self.note = Some(note);
        self
    }
}

/// The single command emitted for one agent in one turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Order {
    /// Agent receiving the command.
    pub agent: EntityId,
    /// Command to execute.
    pub command: Command,
    /// Optional human-readable tag appended to the wire line.
    pub note: Option<&'static str>,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.note {
            Some(note) => write!(f, "{} {note}", self.command),
            None => write!(f, "{}", self.command),
        }
    }
}

/// One of our agents together with its pending command buffer.
///
/// The buffer holds at most one command; issuing a new one replaces whatever
/// was pending. An agent that never receives a command holds in place.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Agent {
    snapshot: AgentSnapshot,
    pending: Option<(Command, Option<&'static str>)>,
}

impl Agent {
    /// Wraps a snapshot with an empty command buffer.
    #[must_use]
    pub const fn new(snapshot: AgentSnapshot) -> Self {
        Self {
            snapshot,
            pending: None,
        }
    }

    /// State of the agent at the start of the turn.
    #[must_use]
    pub const fn snapshot(&self) -> &AgentSnapshot {
        &self.snapshot
    }

    /// Replaces the pending command.
    pub fn issue(&mut self, command: Command, note: Option<&'static str>) {
        self.pending = Some((command, note));
    }

    /// Whether a command is pending.
    #[must_use]
    pub const fn has_order(&self) -> bool {
        self.pending.is_some()
    }

    /// Whether the pending command is the area-effect spell.
    #[must_use]
    pub fn is_casting_area_effect(&self) -> bool {
        self.pending
            .map_or(false, |(command, _)| command.is_area_effect())
    }

    /// Final order for the turn, holding in place when nothing is pending.
    #[must_use]
    pub fn order(&self) -> Order {
        let (command, note) = self.pending.unwrap_or((Command::Hold, None));
        Order {
            agent: self.snapshot.id,
            command,
            note,
        }
    }
}

/// Coarse stage of the match; never moves backwards.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub enum Phase {
    /// Farming and scouting.
    #[default]
    Opening,
    /// Mana has accumulated and monsters are getting stronger.
    Mid,
    /// Monsters are strong enough that every push counts.
    Ending,
}
