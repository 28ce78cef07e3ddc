#![warn(missing_docs)]
//! View targeting: which actor or block is the player looking at.
//!
//! Everything here is a pure function of the supplied geometry plus a
//! caller-provided solidity predicate, so it can run inside any host.

pub mod actor;
pub mod raycast;
pub mod volume;

pub use actor::{find_nearest_actor_in_view, HitTest, TargetCandidate};
pub use raycast::{
    find_first_open_upward, find_first_solid_along_view, raycast, RaycastHit, MAX_RAY_STEPS,
};
pub use volume::Aabb;
