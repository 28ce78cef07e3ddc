//! Voxel raycasting using DDA (Digital Differential Analyzer) algorithm.

use glam::{IVec3, Vec3};

/// Upper bound on cells visited by one raycast, whatever the distance.
pub const MAX_RAY_STEPS: u32 = 4096;

/// Result of a raycast against the voxel world.
#[derive(Debug, Clone, Copy)]
pub struct RaycastHit {
    /// The position of the block that was hit (in block coordinates).
    pub block_pos: IVec3,
    /// The normal of the face that was hit.
    pub face_normal: IVec3,
    /// The distance from the ray origin to the entry point of the block.
    pub distance: f32,
}

/// Performs a DDA raycast through the voxel world.
///
/// # Arguments
/// * `origin` - Ray origin in world coordinates
/// * `direction` - Ray direction (normalized internally)
/// * `max_distance` - Maximum distance to cast the ray
/// * `is_solid` - Function that returns true if a block at the given position is solid
///
/// # Returns
/// Some(RaycastHit) if a solid block was hit, None otherwise
pub fn raycast<F>(
    origin: Vec3,
    direction: Vec3,
    max_distance: f32,
    mut is_solid: F,
) -> Option<RaycastHit>
where
    F: FnMut(IVec3) -> bool,
{
    let direction = direction.try_normalize()?;

    // Current voxel position
    let mut voxel = origin.floor().as_ivec3();

    // Direction to step in each axis (-1 or 1)
    let step = IVec3::new(
        if direction.x > 0.0 { 1 } else { -1 },
        if direction.y > 0.0 { 1 } else { -1 },
        if direction.z > 0.0 { 1 } else { -1 },
    );

    // Distance along ray to cross one voxel boundary in each axis
    let delta = Vec3::new(
        axis_delta(direction.x),
        axis_delta(direction.y),
        axis_delta(direction.z),
    );

    // Distance from origin to next voxel boundary in each axis
    let mut t_max = Vec3::new(
        axis_boundary(origin.x, voxel.x, direction.x),
        axis_boundary(origin.y, voxel.y, direction.y),
        axis_boundary(origin.z, voxel.z, direction.z),
    );

    // Face we entered the current voxel through, and the distance at entry
    let mut face_normal = IVec3::ZERO;
    let mut entered_at = 0.0f32;

    // Each axis crossing advances t; a diagonal ray crosses at most ~1.74 cells per unit.
    // The float cast saturates (NaN becomes zero).
    let max_steps = ((max_distance * 2.0).ceil() as u32)
        .saturating_add(1)
        .min(MAX_RAY_STEPS);
    for _ in 0..max_steps {
        if is_solid(voxel) {
            return Some(RaycastHit {
                block_pos: voxel,
                face_normal,
                distance: entered_at,
            });
        }

        // Step to next voxel
        if t_max.x < t_max.y && t_max.x < t_max.z {
            voxel.x += step.x;
            entered_at = t_max.x;
            t_max.x += delta.x;
            face_normal = IVec3::new(-step.x, 0, 0);
        } else if t_max.y < t_max.z {
            voxel.y += step.y;
            entered_at = t_max.y;
            t_max.y += delta.y;
            face_normal = IVec3::new(0, -step.y, 0);
        } else {
            voxel.z += step.z;
            entered_at = t_max.z;
            t_max.z += delta.z;
            face_normal = IVec3::new(0, 0, -step.z);
        }

        if entered_at > max_distance {
            break;
        }
    }

    None
}

fn axis_delta(d: f32) -> f32 {
    if d != 0.0 {
        (1.0 / d).abs()
    } else {
        f32::MAX
    }
}

fn axis_boundary(origin: f32, voxel: i32, d: f32) -> f32 {
    if d > 0.0 {
        ((voxel + 1) as f32 - origin) / d
    } else if d < 0.0 {
        (voxel as f32 - origin) / d
    } else {
        f32::MAX
    }
}

/// First solid cell along the view ray, within `max_distance` cells.
///
/// Returns `None` when nothing solid is reached, when the hit lies on or
/// below `min_y` (rays aimed at the sky can come back as a bottom-of-world
/// cell on some hosts), or when the hit no longer reports solid.
pub fn find_first_solid_along_view<F>(
    origin: Vec3,
    view_direction: Vec3,
    max_distance: f32,
    min_y: i32,
    mut is_solid: F,
) -> Option<IVec3>
where
    F: FnMut(IVec3) -> bool,
{
    let hit = raycast(origin, view_direction, max_distance, &mut is_solid)?;
    let cell = hit.block_pos;
    if cell.y <= min_y {
        tracing::debug!(?cell, min_y, "discarding hit at world floor");
        return None;
    }
    if !is_solid(cell) {
        return None;
    }
    Some(cell)
}

/// Walk upward from `start_cell` to the first non-solid cell.
///
/// At most `max_steps` cells (including `start_cell`) are examined.
pub fn find_first_open_upward<F>(start_cell: IVec3, mut is_solid: F, max_steps: u32) -> Option<IVec3>
where
    F: FnMut(IVec3) -> bool,
{
    let mut cell = start_cell;
    for _ in 0..max_steps {
        if !is_solid(cell) {
            return Some(cell);
        }
        cell.y = cell.y.checked_add(1)?;
    }
    None
}
