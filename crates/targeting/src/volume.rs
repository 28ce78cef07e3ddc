//! Bounding volumes and ray tests.

use glam::Vec3;

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the box
    pub min: Vec3,
    /// Maximum corner of the box
    pub max: Vec3,
}

impl Aabb {
    /// Create a new AABB from min and max corners
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Create an AABB from center position and size
    pub fn from_center_size(center: Vec3, size: Vec3) -> Self {
        let half_size = size * 0.5;
        Self {
            min: center - half_size,
            max: center + half_size,
        }
    }

    /// The 1x2x1 box of a standing actor whose feet are at `feet`.
    pub fn standing(feet: Vec3) -> Self {
        Self {
            min: Vec3::new(feet.x - 0.5, feet.y, feet.z - 0.5),
            max: Vec3::new(feet.x + 0.5, feet.y + 2.0, feet.z + 0.5),
        }
    }

    /// Center of the box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Intersect the finite segment `origin + direction * t`, `t in [0, max_distance]`.
    ///
    /// `direction` is normalized internally. Returns the entry distance
    /// (zero when `origin` is inside the box).
    pub fn ray_intersection(&self, origin: Vec3, direction: Vec3, max_distance: f32) -> Option<f32> {
        let direction = direction.try_normalize()?;
        let mut t_min = 0.0f32;
        let mut t_max = max_distance;

        for axis in 0..3 {
            let o = origin[axis];
            let d = direction[axis];
            let (lo, hi) = (self.min[axis], self.max[axis]);

            if d.abs() <= f32::EPSILON {
                // Parallel to this slab: must already be between its planes.
                if o < lo || o > hi {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / d;
            let mut t1 = (lo - o) * inv;
            let mut t2 = (hi - o) * inv;
            if t1 > t2 {
                std::mem::swap(&mut t1, &mut t2);
            }
            t_min = t_min.max(t1);
            t_max = t_max.min(t2);
            if t_min > t_max {
                return None;
            }
        }

        Some(t_min)
    }
}

/// Distance from `point` to the segment `origin + direction * t`,
/// `t in [0, length]`, or `None` if the point projects outside the segment.
///
/// `direction` must be normalized.
pub(crate) fn segment_point_distance(
    origin: Vec3,
    direction: Vec3,
    length: f32,
    point: Vec3,
) -> Option<f32> {
    let t = (point - origin).dot(direction);
    if !(0.0..=length).contains(&t) {
        return None;
    }
    Some(point.distance(origin + direction * t))
}
