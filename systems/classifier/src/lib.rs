#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure system that partitions visible monsters by whom they endanger.

use std::cmp::Reverse;

use warden_core::{ArenaConfig, EntityId, MonsterSnapshot, Stronghold};
use warden_system_trajectory::{eta, risk_from_eta, Eta};
use warden_world::{query, World};

/// A monster annotated with its projections against both strongholds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ClassifiedMonster {
    /// Snapshot the projections were computed from.
    pub monster: MonsterSnapshot,
    /// Turns until the monster reaches our stronghold.
    pub eta_ours: Eta,
    /// Turns until the monster reaches the opposing stronghold.
    pub eta_theirs: Eta,
    /// Priority of the monster as a threat to us.
    pub risk_ours: u32,
    /// Priority of the monster as a weapon against the opponent.
    pub risk_theirs: u32,
}

impl ClassifiedMonster {
    /// Projects `monster` against both strongholds.
    #[must_use]
    pub fn project(
        monster: MonsterSnapshot,
        ours: &Stronghold,
        theirs: &Stronghold,
        config: &ArenaConfig,
    ) -> Self {
        let eta_ours = eta(&monster, ours, config);
        let eta_theirs = eta(&monster, theirs, config);
        Self {
            monster,
            eta_ours,
            eta_theirs,
            risk_ours: risk_from_eta(ours, &monster, eta_ours),
            risk_theirs: risk_from_eta(theirs, &monster, eta_theirs),
        }
    }

    /// Identifier of the underlying monster.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.monster.id
    }
}

/// Disjoint threat / asset / neutral partition of one turn's monsters.
///
/// Threats can reach our stronghold and are sorted by descending risk to us.
/// Assets cannot reach us but can reach the opponent; neutral monsters reach
/// neither. Both of those are sorted by descending risk to the opponent. Every
/// list breaks ties by ascending identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Classification {
    threats: Vec<ClassifiedMonster>,
    assets: Vec<ClassifiedMonster>,
    neutral: Vec<ClassifiedMonster>,
}

impl Classification {
    /// Monsters that can reach our stronghold, most dangerous first.
    #[must_use]
    pub fn threats(&self) -> &[ClassifiedMonster] {
        &self.threats
    }

    /// Monsters drifting toward the opponent, most valuable first.
    #[must_use]
    pub fn assets(&self) -> &[ClassifiedMonster] {
        &self.assets
    }

    /// Monsters that reach neither stronghold.
    #[must_use]
    pub fn neutral(&self) -> &[ClassifiedMonster] {
        &self.neutral
    }

    /// Total number of classified monsters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.threats.len() + self.assets.len() + self.neutral.len()
    }

    /// Whether no monster is visible.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every classified monster, threats first.
    pub fn iter(&self) -> impl Iterator<Item = &ClassifiedMonster> + '_ {
        self.threats
            .iter()
            .chain(self.assets.iter())
            .chain(self.neutral.iter())
    }

    /// Looks up a monster of this turn by identifier.
    #[must_use]
    pub fn find(&self, id: EntityId) -> Option<&ClassifiedMonster> {
        self.iter().find(|classified| classified.id() == id)
    }

    fn clear(&mut self) {
        self.threats.clear();
        self.assets.clear();
        self.neutral.clear();
    }
}

/// Classifier that reuses its projection buffer between turns.
#[derive(Debug, Default)]
pub struct Classifier {
    projected: Vec<ClassifiedMonster>,
}

impl Classifier {
    /// Creates a classifier with an empty scratch buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Classifies the monsters of the latest snapshot applied to `world`.
    pub fn handle(&mut self, world: &World, out: &mut Classification) {
        self.classify(
            query::monsters(world),
            query::our_stronghold(world),
            query::their_stronghold(world),
            query::config(world),
            out,
        );
        tracing::debug!(
            turn = query::turn(world),
            threats = out.threats.len(),
            assets = out.assets.len(),
            neutral = out.neutral.len(),
            "monsters classified"
        );
    }

    /// Classifies `monsters` against the provided strongholds.
    ///
    /// The output is cleared before it is populated.
    pub fn classify(
        &mut self,
        monsters: &[MonsterSnapshot],
        ours: &Stronghold,
        theirs: &Stronghold,
        config: &ArenaConfig,
        out: &mut Classification,
    ) {
        out.clear();
        self.projected.clear();
        self.projected.extend(
            monsters
                .iter()
                .map(|monster| ClassifiedMonster::project(*monster, ours, theirs, config)),
        );

        for classified in self.projected.drain(..) {
            if classified.eta_ours.is_reachable() {
                out.threats.push(classified);
            } else if classified.eta_theirs.is_reachable() {
                out.assets.push(classified);
            } else {
                out.neutral.push(classified);
            }
        }

        out.threats
            .sort_by_key(|classified| (Reverse(classified.risk_ours), classified.id()));
        out.assets
            .sort_by_key(|classified| (Reverse(classified.risk_theirs), classified.id()));
        out.neutral
            .sort_by_key(|classified| (Reverse(classified.risk_theirs), classified.id()));
    }
}
