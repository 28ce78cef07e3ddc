//! A sparse voxel world for targeting tests.

use glam::IVec3;
use powertool_server::WorldView;
use std::collections::HashSet;

/// Set of solid cells; everything else is air.
#[derive(Debug, Default, Clone)]
pub struct VoxelWorld {
    solid: HashSet<IVec3>,
}

impl VoxelWorld {
    /// An empty world.
    pub fn new() -> Self {
        Self::default()
    }

    /// A flat square of solid ground at height `y`, `radius` cells from the origin.
    pub fn flat(y: i32, radius: i32) -> Self {
        let mut world = Self::new();
        world.fill_box(IVec3::new(-radius, y, -radius), IVec3::new(radius, y, radius));
        world
    }

    /// Mark `cell` solid.
    pub fn set_solid(&mut self, cell: IVec3) -> &mut Self {
        self.solid.insert(cell);
        self
    }

    /// Mark `cell` empty.
    pub fn clear(&mut self, cell: IVec3) -> &mut Self {
        self.solid.remove(&cell);
        self
    }

    /// Fill the inclusive box between `a` and `b`.
    pub fn fill_box(&mut self, a: IVec3, b: IVec3) -> &mut Self {
        let (min, max) = (a.min(b), a.max(b));
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                for z in min.z..=max.z {
                    self.solid.insert(IVec3::new(x, y, z));
                }
            }
        }
        self
    }

    /// Number of solid cells.
    pub fn len(&self) -> usize {
        self.solid.len()
    }

    /// Whether the world has no solid cells.
    pub fn is_empty(&self) -> bool {
        self.solid.is_empty()
    }
}

impl WorldView for VoxelWorld {
    fn is_solid(&self, cell: IVec3) -> bool {
        self.solid.contains(&cell)
    }
}
