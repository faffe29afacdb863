#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Fixed-radius coverage search over small clusters of targets.
//!
//! Every pair of targets, including a target paired with itself, yields the
//! centres of the circles of the requested radius passing through both. Each
//! centre is snapped to the arena grid and scored by how many targets the
//! snapped point encloses, so a reported count always holds for the point an
//! agent is actually sent to. This is a pairwise
//! heuristic: it is exact for the configurations the planner produces but does
//! not prove a global optimum for three or more targets whose best circle
//! touches none of them pairwise.

use glam::DVec2;
use warden_core::Point;

/// Centres of the circles of a fixed radius passing through two points.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PairCircles {
    /// The points are more than two radii apart.
    None,
    /// The points coincide, or sit exactly two radii apart.
    One(DVec2),
    /// The generic case: two centres mirrored across the segment.
    Two(DVec2, DVec2),
}

/// Computes the circle centres of `radius` that pass through both points.
///
/// Separation tests run on exact integer squares so that points precisely two
/// radii apart always collapse to their midpoint.
#[must_use]
pub fn pair_circles(a: Point, b: Point, radius: i32) -> PairCircles {
    let first = to_vec(a);
    if a == b {
        return PairCircles::One(first);
    }

    let separation_squared = a.distance_squared(b);
    let diameter_squared = 4 * i64::from(radius) * i64::from(radius);
    let second = to_vec(b);
    let midpoint = (first + second) * 0.5;

    if separation_squared > diameter_squared {
        return PairCircles::None;
    }
    if separation_squared == diameter_squared {
        return PairCircles::One(midpoint);
    }

    let radius = f64::from(radius);
    let half = (second - first).length() * 0.5;
    let offset = (radius * radius - half * half).max(0.0).sqrt();
    let normal = (second - first).perp().normalize();
    PairCircles::Two(midpoint + normal * offset, midpoint - normal * offset)
}

/// A scored candidate position.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CoverageCandidate {
    /// Candidate centre on the arena grid.
    pub center: Point,
    /// Number of targets within the radius of `center`, boundary included.
    pub covered: usize,
}

/// Coverage search that reuses scratch buffers between invocations.
#[derive(Debug, Default)]
pub struct CoverageOptimizer {
    centers: Vec<DVec2>,
}

impl CoverageOptimizer {
    /// Creates an optimizer with empty scratch buffers.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ranks every pairwise candidate centre for `targets`.
    ///
    /// The output buffer is cleared first. Candidates are ordered by the
    /// number of targets they enclose, then by squared distance to
    /// `reference`, then by coordinates; consecutive duplicates are removed.
    pub fn rank(
        &mut self,
        targets: &[Point],
        radius: i32,
        reference: Point,
        out: &mut Vec<CoverageCandidate>,
    ) {
        out.clear();
        if targets.is_empty() || radius < 0 {
            return;
        }

        self.centers.clear();

        for (index, first) in targets.iter().enumerate() {
            for second in &targets[index..] {
                match pair_circles(*first, *second, radius) {
                    PairCircles::None => {}
                    PairCircles::One(center) => self.centers.push(center),
                    PairCircles::Two(left, right) => {
                        self.centers.push(left);
                        self.centers.push(right);
                    }
                }
            }
        }

        out.extend(
            self.centers
                .iter()
                .map(|center| snap(*center, targets, radius)),
        );

        out.sort_by(|left, right| {
            right
                .covered
                .cmp(&left.covered)
                .then_with(|| {
                    left.center
                        .distance_squared(reference)
                        .cmp(&right.center.distance_squared(reference))
                })
                .then_with(|| left.center.cmp(&right.center))
        });
        out.dedup();
    }

    /// Best candidate for `targets`, or `None` when there are no targets.
    pub fn best(
        &mut self,
        targets: &[Point],
        radius: i32,
        reference: Point,
    ) -> Option<CoverageCandidate> {
        let mut ranked = Vec::new();
        self.rank(targets, radius, reference, &mut ranked);
        ranked.first().copied()
    }
}

fn to_vec(point: Point) -> DVec2 {
    DVec2::new(f64::from(point.x()), f64::from(point.y()))
}

/// Picks the grid corner around `center` that encloses the most targets,
/// preferring the corner nearest the exact centre.
fn snap(center: DVec2, targets: &[Point], radius: i32) -> CoverageCandidate {
    let (left, right) = (center.x.floor() as i32, center.x.ceil() as i32);
    let (low, high) = (center.y.floor() as i32, center.y.ceil() as i32);

    [
        Point::new(left, low),
        Point::new(right, low),
        Point::new(left, high),
        Point::new(right, high),
    ]
    .into_iter()
    .map(|point| {
        let candidate = CoverageCandidate {
            center: point,
            covered: covered_by(point, targets, radius),
        };
        (candidate, to_vec(point).distance_squared(center))
    })
    .max_by(|(a, a_drift), (b, b_drift)| {
        a.covered
            .cmp(&b.covered)
            .then_with(|| b_drift.total_cmp(a_drift))
            .then_with(|| b.center.cmp(&a.center))
    })
    .map_or(
        CoverageCandidate {
            center: Point::new(left, low),
            covered: 0,
        },
        |(candidate, _)| candidate,
    )
}

/// Number of targets within `radius` of `point`, boundary included.
fn covered_by(point: Point, targets: &[Point], radius: i32) -> usize {
    targets
        .iter()
        .filter(|target| point.is_within(**target, radius))
        .count()
}
