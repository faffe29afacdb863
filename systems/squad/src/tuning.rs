//! Planner thresholds, loadable from configuration.

use serde::{Deserialize, Serialize};
use warden_core::{Phase, Point};
use warden_system_phase::PhaseThresholds;

/// Every threshold the squad planner consults.
///
/// Positions are expressed for a team whose stronghold sits at the origin
/// corner and are mirrored at runtime for the opposite corner.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquadTuning {
    /// Phase transition thresholds.
    pub phase: PhaseThresholds,
    /// Self and mutual protection.
    pub protection: ProtectionTuning,
    /// Defender engagement radii and default posts.
    pub defence: DefenceTuning,
    /// Attacker positions and offensive thresholds.
    pub attacker: AttackerTuning,
}

/// Thresholds of the protection pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProtectionTuning {
    /// Strongest visible monster health at which defenders ward themselves.
    pub self_protect_health: i32,
    /// Self-protection starts once the madness counter exceeds this value.
    pub madness_trigger: u32,
    /// Distance within which a defender comes to the aid of a redirected teammate.
    pub aid_range: i32,
}

impl Default for ProtectionTuning {
    fn default() -> Self {
        Self {
            self_protect_health: 20,
            madness_trigger: 1,
            aid_range: 2_200,
        }
    }
}

/// Defender recall margin and default posts.
///
/// Engagement radii come from the arena: threats inside the mid radius are
/// engaged first, and wandering monsters and opposing agents are watched out
/// to the outer radius.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DefenceTuning {
    /// Distance beyond the post ring at which a defender is recalled.
    pub recall_margin: i32,
    /// Post ring and bearings during the opening.
    pub opening_posts: PostRing,
    /// Post ring and bearings once the opening is over.
    pub later_posts: PostRing,
}

impl Default for DefenceTuning {
    fn default() -> Self {
        Self {
            recall_margin: 1_500,
            opening_posts: PostRing {
                radius: 7_000,
                bearings: [15, 75],
            },
            later_posts: PostRing {
                radius: 6_000,
                bearings: [45, 60],
            },
        }
    }
}

impl DefenceTuning {
    /// Post ring for `phase`.
    #[must_use]
    pub const fn posts(&self, phase: Phase) -> PostRing {
        match phase {
            Phase::Opening => self.opening_posts,
            Phase::Mid | Phase::Ending => self.later_posts,
        }
    }
}

/// Ring of default defender posts around our stronghold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostRing {
    /// Distance of the posts from the stronghold.
    pub radius: i32,
    /// Bearing of the first and second defender post, in degrees.
    pub bearings: [i32; 2],
}

/// Ring segment the attacker sweeps when it has nothing better to do.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patrol {
    /// Distance from the opposing stronghold.
    pub radius: i32,
    /// Lower bearing, in degrees.
    pub low: i32,
    /// Upper bearing, in degrees.
    pub high: i32,
}

/// Offensive thresholds of one phase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffenseTuning {
    /// Spells worth of mana that must be available before casting anything.
    pub min_casts: i32,
    /// Minimum health of a drifting monster worth redirecting.
    pub redirect_health: i32,
    /// Largest ETA to the opposing stronghold at which an asset gets warded.
    pub shield_window: u32,
    /// Unshielded monsters the area-effect must hit to be worth casting.
    pub cluster_size: usize,
    /// Distance from the opposing stronghold within which pushed monsters count.
    pub cluster_reach: i32,
    /// Sweep used when no spell applies.
    pub patrol: Patrol,
}

/// Attacker positions and thresholds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackerTuning {
    /// First rally point once the opening is over.
    pub staging: Point,
    /// Forward point where drifting monsters are herded and warded.
    pub advance: Point,
    /// Point the attacker anchors on during the assault.
    pub assault: Point,
    /// Distance under which a rally point counts as reached.
    pub arrival_tolerance: i32,
    /// Minimum health of a monster redirected while advancing or holding.
    pub herd_health: i32,
    /// Spells worth of mana required to herd or ward on the way.
    pub herd_casts: i32,
    /// Largest ETA at which a monster near the advance point gets warded.
    pub hold_shield_window: u32,
    /// Mana under which the assault falls back to patrolling. An all-in
    /// ending stays anchored regardless.
    pub assault_min_mana: i32,
    /// Sweep used while hunting during the opening.
    pub hunt_patrol: Patrol,
    /// Offensive thresholds during the mid game.
    pub mid: OffenseTuning,
    /// Offensive thresholds during the ending.
    pub ending: OffenseTuning,
}

impl Default for AttackerTuning {
    fn default() -> Self {
        Self {
            staging: Point::new(2_200, 6_800),
            advance: Point::new(11_130, 6_800),
            assault: Point::new(12_549, 6_800),
            arrival_tolerance: 400,
            herd_health: 16,
            herd_casts: 3,
            hold_shield_window: 13,
            assault_min_mana: 30,
            hunt_patrol: Patrol {
                radius: 8_500,
                low: 30,
                high: 60,
            },
            mid: OffenseTuning {
                min_casts: 4,
                redirect_health: 18,
                shield_window: 13,
                cluster_size: 3,
                cluster_reach: 7_000,
                patrol: Patrol {
                    radius: 7_000,
                    low: 15,
                    high: 75,
                },
            },
            ending: OffenseTuning {
                min_casts: 3,
                redirect_health: 14,
                shield_window: 16,
                cluster_size: 2,
                cluster_reach: 7_000,
                patrol: Patrol {
                    radius: 6_000,
                    low: 15,
                    high: 75,
                },
            },
        }
    }
}

impl AttackerTuning {
    /// Offensive thresholds for `phase`; the opening shares the mid game's.
    #[must_use]
    pub const fn offense(&self, phase: Phase) -> &OffenseTuning {
        match phase {
            Phase::Opening | Phase::Mid => &self.mid,
            Phase::Ending => &self.ending,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn posts_tighten_after_the_opening() {
        let defence = DefenceTuning::default();
        assert_eq!(defence.posts(Phase::Opening).radius, 7_000);
        assert_eq!(defence.posts(Phase::Mid).bearings, [45, 60]);
        assert_eq!(defence.posts(Phase::Ending), defence.posts(Phase::Mid));
    }

    #[test]
    fn ending_loosens_offensive_cutoffs() {
        let attacker = AttackerTuning::default();
        let mid = attacker.offense(Phase::Mid);
        let ending = attacker.offense(Phase::Ending);
        assert!(ending.redirect_health < mid.redirect_health);
        assert!(ending.shield_window > mid.shield_window);
        assert!(ending.min_casts <= mid.min_casts);
    }
}
