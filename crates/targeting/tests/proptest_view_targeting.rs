//! Property-based tests for view targeting.
//!
//! Validates:
//! - actors behind the viewer are never selected by either hit test
//! - the selected actor is never farther than another hit candidate
//! - block scans never report a non-solid cell

use glam::{IVec3, Vec3};
use powertool_core::ActorId;
use powertool_targeting::{
    find_first_open_upward, find_first_solid_along_view, find_nearest_actor_in_view, HitTest,
    TargetCandidate,
};
use proptest::prelude::*;

fn hit_test() -> impl Strategy<Value = HitTest> {
    prop_oneof![Just(HitTest::Aabb), Just(HitTest::Cylinder { radius: 0.6 })]
}

proptest! {
    /// Property: candidates entirely behind the viewer are never hit.
    #[test]
    fn candidates_behind_viewer_are_ignored(
        distances in prop::collection::vec(3.0f32..40.0, 0..8),
        strategy in hit_test(),
    ) {
        let candidates: Vec<TargetCandidate> = distances
            .iter()
            .enumerate()
            .map(|(i, d)| TargetCandidate::standing(ActorId::new(format!("a{i}")), Vec3::new(-d, 0.0, 0.0)))
            .collect();
        let found = find_nearest_actor_in_view(
            Vec3::new(0.0, 1.6, 0.0),
            Vec3::X,
            &candidates,
            100.0,
            strategy,
        );
        prop_assert!(found.is_none());
    }

    /// Property: the chosen actor is the nearest of the ones in the line of sight.
    #[test]
    fn nearest_on_axis_wins(
        distances in prop::collection::vec(2.0f32..90.0, 1..8),
        strategy in hit_test(),
    ) {
        let candidates: Vec<TargetCandidate> = distances
            .iter()
            .enumerate()
            .map(|(i, d)| TargetCandidate::standing(ActorId::new(format!("a{i}")), Vec3::new(*d, 0.0, 0.0)))
            .collect();
        let origin = Vec3::new(0.0, 1.6, 0.0);
        let found = find_nearest_actor_in_view(origin, Vec3::X, &candidates, 100.0, strategy);
        let found = found.expect("an on-axis candidate should be hit");
        let chosen = candidates.iter().find(|c| &c.id == found).unwrap();
        for other in &candidates {
            prop_assert!(
                origin.distance_squared(chosen.anchor) <= origin.distance_squared(other.anchor)
            );
        }
    }

    /// Property: a reported block is solid and above the floor.
    #[test]
    fn solid_scan_reports_solid_cells(
        floor in -4i32..4,
        surface in 1i32..40,
        dx in -1.0f32..1.0,
        dz in -1.0f32..1.0,
    ) {
        let is_solid = |cell: IVec3| cell.y <= surface;
        let origin = Vec3::new(0.5, surface as f32 + 10.5, 0.5);
        let direction = Vec3::new(dx, -1.0, dz);
        if let Some(cell) = find_first_solid_along_view(origin, direction, 100.0, floor, is_solid) {
            prop_assert!(is_solid(cell));
            prop_assert!(cell.y > floor);
            prop_assert_eq!(cell.y, surface);
        }
    }

    /// Property: the upward scan lands on the first open cell above a column.
    #[test]
    fn open_upward_lands_on_column_top(start in -20i32..20, height in 0i32..30) {
        let top = start + height;
        let is_solid = |cell: IVec3| cell.y >= start && cell.y < top;
        let found = find_first_open_upward(IVec3::new(0, start, 0), is_solid, 64);
        prop_assert_eq!(found, Some(IVec3::new(0, top, 0)));
    }
}
