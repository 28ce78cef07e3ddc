//! Nearest actor under the crosshair.

use crate::volume::{segment_point_distance, Aabb};
use glam::Vec3;
use powertool_core::ActorId;
use std::cmp::Ordering;

/// An actor that may be targeted.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetCandidate {
    /// Actor identity; its name is what gets substituted into commands.
    pub id: ActorId,
    /// Point used for distance ranking (the actor's feet).
    pub anchor: Vec3,
    /// Volume tested against the view ray.
    pub bounds: Aabb,
}

impl TargetCandidate {
    /// A standing actor with the default 1x2x1 box.
    pub fn standing(id: ActorId, feet: Vec3) -> Self {
        Self {
            id,
            anchor: feet,
            bounds: Aabb::standing(feet),
        }
    }
}

/// How a candidate's volume is tested against the view ray.
///
/// Both strategies share one contract: a candidate only counts when the
/// segment of length `max_distance` reaches it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitTest {
    /// Segment vs. the candidate's bounding box.
    Aabb,
    /// Sample two points up the candidate's center column (legs and head)
    /// and accept when either lies within `radius` of the segment.
    Cylinder {
        /// Cylinder radius around the view segment.
        radius: f32,
    },
}

impl Default for HitTest {
    fn default() -> Self {
        Self::Aabb
    }
}

impl HitTest {
    fn hits(self, origin: Vec3, direction: Vec3, max_distance: f32, bounds: &Aabb) -> bool {
        match self {
            Self::Aabb => bounds
                .ray_intersection(origin, direction, max_distance)
                .is_some(),
            Self::Cylinder { radius } => {
                let Some(direction) = direction.try_normalize() else {
                    return false;
                };
                let center = bounds.center();
                let height = bounds.max.y - bounds.min.y;
                let samples = [
                    Vec3::new(center.x, bounds.min.y + height * 0.25, center.z),
                    Vec3::new(center.x, bounds.min.y + height * 0.75, center.z),
                ];
                samples.iter().any(|point| {
                    segment_point_distance(origin, direction, max_distance, *point)
                        .is_some_and(|d| d <= radius)
                })
            }
        }
    }
}

/// Find the closest candidate whose volume the view ray passes through.
///
/// Ranking is by squared distance from `origin` to the candidate's anchor.
/// Exact ties go to the smallest [`ActorId`], so the result does not depend
/// on candidate iteration order. Callers must leave the viewing actor itself
/// out of `candidates`.
pub fn find_nearest_actor_in_view<'a, I>(
    origin: Vec3,
    view_direction: Vec3,
    candidates: I,
    max_distance: f32,
    hit_test: HitTest,
) -> Option<&'a ActorId>
where
    I: IntoIterator<Item = &'a TargetCandidate>,
{
    let mut closest: Option<(&'a TargetCandidate, f32)> = None;

    for candidate in candidates {
        if !hit_test.hits(origin, view_direction, max_distance, &candidate.bounds) {
            continue;
        }
        let distance_sq = origin.distance_squared(candidate.anchor);
        let better = match closest {
            None => true,
            Some((best, best_sq)) => match distance_sq.total_cmp(&best_sq) {
                Ordering::Less => true,
                Ordering::Equal => candidate.id < best.id,
                Ordering::Greater => false,
            },
        };
        if better {
            closest = Some((candidate, distance_sq));
        }
    }

    if let Some((best, distance_sq)) = closest {
        tracing::trace!(actor = %best.id, distance_sq, "actor in view");
    }
    closest.map(|(candidate, _)| &candidate.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EYE: Vec3 = Vec3::new(0.0, 1.6, 0.0);

    fn standing(name: &str, x: f32, z: f32) -> TargetCandidate {
        TargetCandidate::standing(ActorId::new(name), Vec3::new(x, 0.0, z))
    }

    #[test]
    fn picks_closest_of_two_in_line() {
        let candidates = vec![standing("far", 20.0, 0.0), standing("near", 5.0, 0.0)];
        let hit = find_nearest_actor_in_view(EYE, Vec3::X, &candidates, 100.0, HitTest::Aabb);
        assert_eq!(hit.map(ActorId::as_str), Some("near"));
    }

    #[test]
    fn ignores_candidates_off_axis() {
        let candidates = vec![standing("aside", 5.0, 4.0)];
        assert!(find_nearest_actor_in_view(EYE, Vec3::X, &candidates, 100.0, HitTest::Aabb).is_none());
        let cylinder = HitTest::Cylinder { radius: 0.75 };
        assert!(find_nearest_actor_in_view(EYE, Vec3::X, &candidates, 100.0, cylinder).is_none());
    }

    #[test]
    fn out_of_range_candidates_are_ignored() {
        let candidates = vec![standing("distant", 150.0, 0.0)];
        assert!(find_nearest_actor_in_view(EYE, Vec3::X, &candidates, 100.0, HitTest::Aabb).is_none());
        let cylinder = HitTest::Cylinder { radius: 0.75 };
        assert!(find_nearest_actor_in_view(EYE, Vec3::X, &candidates, 100.0, cylinder).is_none());
    }

    #[test]
    fn cylinder_strategy_agrees_on_direct_line() {
        let candidates = vec![standing("far", 20.0, 0.0), standing("near", 5.0, 0.0)];
        let cylinder = HitTest::Cylinder { radius: 0.75 };
        let hit = find_nearest_actor_in_view(EYE, Vec3::X, &candidates, 100.0, cylinder);
        assert_eq!(hit.map(ActorId::as_str), Some("near"));
    }

    // Closest wins; on an exact tie the result is stable only because ids
    // break the tie, not because of iteration order.
    #[test]
    fn exact_ties_go_to_smallest_id() {
        let a = standing("bravo", 5.0, 0.0);
        let b = standing("alpha", 5.0, 0.0);
        let forward = vec![a.clone(), b.clone()];
        let reversed = vec![b, a];
        for candidates in [&forward, &reversed] {
            let hit = find_nearest_actor_in_view(EYE, Vec3::X, candidates, 100.0, HitTest::Aabb);
            assert_eq!(hit.map(ActorId::as_str), Some("alpha"));
        }
    }

    #[test]
    fn empty_candidates_yield_none() {
        let candidates: Vec<TargetCandidate> = Vec::new();
        assert!(find_nearest_actor_in_view(EYE, Vec3::X, &candidates, 100.0, HitTest::Aabb).is_none());
    }
}
