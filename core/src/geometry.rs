//! Integer arena geometry shared by every system.

use std::ops::{Add, AddAssign, Sub};

use serde::{Deserialize, Serialize};

use crate::ArenaConfig;

/// Integer coordinate inside the arena.
///
/// Addition and subtraction saturate at the `i32` bounds.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Point {
    x: i32,
    y: i32,
}

impl Point {
    /// Point located at the arena origin. Also used as the zero velocity.
    pub const ZERO: Self = Self::new(0, 0);

    /// Creates a new point from its horizontal and vertical components.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Horizontal component.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Vertical component.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Euclidean distance between two points.
    #[must_use]
    pub fn distance(self, other: Point) -> f64 {
        (f64::from(self.x) - f64::from(other.x)).hypot(f64::from(self.y) - f64::from(other.y))
    }

    /// Exact squared distance, used wherever a comparison must not round.
    #[must_use]
    pub fn distance_squared(self, other: Point) -> i64 {
        let dx = i64::from(self.x) - i64::from(other.x);
        let dy = i64::from(self.y) - i64::from(other.y);
        dx * dx + dy * dy
    }

    /// Reports whether `other` lies within `range` of this point, inclusive.
    #[must_use]
    pub fn is_within(self, other: Point, range: i32) -> bool {
        let range = i64::from(range);
        self.distance_squared(other) <= range * range
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_add(rhs.x), self.y.saturating_add(rhs.y))
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x.saturating_sub(rhs.x), self.y.saturating_sub(rhs.y))
    }
}

impl AddAssign for Point {
    fn add_assign(&mut self, rhs: Point) {
        *self = *self + rhs;
    }
}

/// Angle in whole degrees of the vector running from `reference` to `other`.
///
/// This is a single-quadrant approximation: a vertical vector reports 90°
/// when it points down the y axis (or has zero length) and 0° otherwise, and
/// every other vector reports `atan(dy / dx)`, truncated toward zero. Callers
/// use it for coarse sector bucketing, so the sign of `dx` is ignored on
/// purpose; combined with [`Side`] mirroring the result always reads as a
/// bearing measured outward from the stronghold in the reference corner.
#[must_use]
pub fn angle_between(reference: Point, other: Point) -> i32 {
    let delta = other - reference;
    if delta.x() == 0 {
        return if delta.y() >= 0 { 90 } else { 0 };
    }

    let theta = (f64::from(delta.y()) / f64::from(delta.x())).atan();
    theta.to_degrees() as i32
}

/// Converts a polar offset around `origin` into an absolute position.
///
/// Components are truncated toward zero.
#[must_use]
pub fn polar_to_cartesian(origin: Point, radius: i32, degrees: i32) -> Point {
    let theta = f64::from(degrees).to_radians();
    let dx = f64::from(radius) * theta.cos();
    let dy = f64::from(radius) * theta.sin();
    origin + Point::new(dx as i32, dy as i32)
}

/// Which arena corner a team occupies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// The team's stronghold sits on the left edge (x = 0).
    Origin,
    /// The team's stronghold sits in the far corner; bearings rotate by 180°.
    Mirrored,
}

impl Side {
    /// Determines the side from a stronghold position.
    #[must_use]
    pub const fn of(stronghold: Point) -> Self {
        if stronghold.x() == 0 {
            Self::Origin
        } else {
            Self::Mirrored
        }
    }

    /// Converts a team-relative bearing into an absolute one.
    #[must_use]
    pub const fn bearing(self, degrees: i32) -> i32 {
        match self {
            Self::Origin => degrees,
            Self::Mirrored => degrees + 180,
        }
    }

    /// Polar conversion where `degrees` is measured outward from `origin`.
    #[must_use]
    pub fn polar(self, origin: Point, radius: i32, degrees: i32) -> Point {
        polar_to_cartesian(origin, radius, self.bearing(degrees))
    }

    /// Maps a point expressed for the origin-corner team onto this side.
    #[must_use]
    pub fn mirror(self, point: Point, config: &ArenaConfig) -> Point {
        match self {
            Self::Origin => point,
            Self::Mirrored => config.opposite_corner(point),
        }
    }
}

/// Coarse lane bucket of a bearing measured from a stronghold.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Lane {
    /// Bearings below 30°.
    Bottom,
    /// Bearings strictly between 30° and 60°.
    Mid,
    /// Bearings of 60° and above.
    Top,
}

impl Lane {
    /// Buckets `other` relative to `reference`.
    ///
    /// A bearing of exactly 30° falls between the bottom and mid lanes and is
    /// reported as `None`.
    #[must_use]
    pub fn classify(reference: Point, other: Point) -> Option<Self> {
        let degrees = angle_between(reference, other);
        if degrees < 30 {
            Some(Self::Bottom)
        } else if degrees > 30 && degrees < 60 {
            Some(Self::Mid)
        } else if degrees >= 60 {
            Some(Self::Top)
        } else {
            None
        }
    }
}

/// Half of the arena around a stronghold split on the 45° diagonal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Area {
    /// Bearings of 45° and below.
    Lower,
    /// Bearings above 45°.
    Upper,
}

impl Area {
    /// Buckets `other` relative to `reference`.
    #[must_use]
    pub fn classify(reference: Point, other: Point) -> Self {
        if angle_between(reference, other) <= 45 {
            Self::Lower
        } else {
            Self::Upper
        }
    }
}
