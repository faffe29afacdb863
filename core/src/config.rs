//! Immutable arena constants.

use serde::{Deserialize, Serialize};

use crate::Point;

/// Gameplay constants of the arena.
///
/// Every value is fixed for the duration of a match. Defaults mirror the
/// standard 17630 × 9000 arena; tests construct alternate arenas by
/// overriding individual fields.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArenaConfig {
    /// Arena width in world units. Valid x coordinates are `0..=width`.
    pub width: i32,
    /// Arena height in world units. Valid y coordinates are `0..=height`.
    pub height: i32,
    /// Distance from a stronghold at which a monster counts as arrived.
    pub capture_radius: i32,
    /// Closest a re-aimed defender post is drawn toward a stronghold.
    pub inner_radius: i32,
    /// Ring at the outskirts of a stronghold's territory. Threats inside it
    /// are engaged first, and an opposing squad inside it is clustered.
    pub mid_radius: i32,
    /// Outermost alert ring. Defenders farm and watch opposing agents inside it.
    pub outer_radius: i32,
    /// Distance a monster travels per turn.
    pub monster_speed: i32,
    /// Distance an agent travels per turn.
    pub agent_speed: i32,
    /// Reach of the area-effect spell around the caster.
    pub area_effect_radius: i32,
    /// Maximum distance between a caster and the unit it wards or redirects.
    pub spell_range: i32,
    /// Distance within which an agent damages every monster each turn.
    pub attack_range: i32,
    /// Physical damage an agent deals per turn.
    pub attack_damage: i32,
    /// Distance an agent can see.
    pub agent_view_range: i32,
    /// Mana consumed by any spell.
    pub spell_cost: i32,
    /// Number of agents each team controls.
    pub squad_size: usize,
    /// Number of leading roster slots dedicated to defence.
    pub defender_count: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            width: 17_630,
            height: 9_000,
            capture_radius: 5_000,
            inner_radius: 2_800,
            mid_radius: 6_000,
            outer_radius: 7_000,
            monster_speed: 400,
            agent_speed: 800,
            area_effect_radius: 1_280,
            spell_range: 2_200,
            attack_range: 800,
            attack_damage: 2,
            agent_view_range: 2_200,
            spell_cost: 10,
            squad_size: 3,
            defender_count: 2,
        }
    }
}

impl ArenaConfig {
    /// Reports whether the point lies inside the arena bounds, edges included.
    #[must_use]
    pub const fn contains(&self, point: Point) -> bool {
        point.x() >= 0 && point.y() >= 0 && point.x() <= self.width && point.y() <= self.height
    }

    /// Reflects a point through the arena centre.
    #[must_use]
    pub const fn opposite_corner(&self, point: Point) -> Point {
        Point::new(self.width - point.x(), self.height - point.y())
    }
}
