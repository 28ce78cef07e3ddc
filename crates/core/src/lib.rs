#![warn(missing_docs)]
//! Core primitives shared across the workspace.

pub mod item;
pub mod kinds;
pub mod registry;
pub mod variant;

use serde::{Deserialize, Serialize};
use std::fmt;

// Re-export commonly used types
pub use item::{ItemKey, ItemKeyError, ItemKind};
pub use registry::ItemCatalog;
pub use variant::{NamedVariants, VariantCodec};

/// Fixed tick type (20 TPS => 50 ms per tick).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SimTick(pub u64);

impl SimTick {
    /// First tick in any deterministic timeline.
    pub const ZERO: Self = Self(0);

    /// Advance by `delta` ticks.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0 + delta)
    }

    /// Ticks elapsed since `earlier`, saturating at zero.
    pub fn since(self, earlier: SimTick) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// Host-assigned identifier of a loaded world.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorldId(pub u32);

impl WorldId {
    /// The primary world.
    pub const DEFAULT: Self = Self(0);
}

/// A tick stamped with the world it was observed in.
///
/// Two notifications belong to the same game tick only when both fields match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WorldTick {
    /// World the tick counter belongs to.
    pub world: WorldId,
    /// Tick number within that world.
    pub tick: SimTick,
}

impl WorldTick {
    /// Stamp `tick` with `world`.
    pub const fn new(world: WorldId, tick: SimTick) -> Self {
        Self { world, tick }
    }
}

/// Stable actor (player) identity.
///
/// Actor ids are account names: they survive reconnects and key the
/// per-actor binding documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActorId(String);

impl ActorId {
    /// Wrap an account name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The account name.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ActorId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// The two distinguishable click actions a command can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionSlot {
    /// Left click / attack.
    Primary,
    /// Right click / use.
    Secondary,
}

impl ActionSlot {
    /// Both slots in display order.
    pub const ALL: [ActionSlot; 2] = [ActionSlot::Primary, ActionSlot::Secondary];

    /// Name used in persisted documents and user-facing output.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "left",
            Self::Secondary => "right",
        }
    }

    /// Parse a slot name (e.g., "left", "l", "primary", "right-click").
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" | "l" | "primary" | "left-click" | "leftclick" => Some(Self::Primary),
            "right" | "r" | "secondary" | "right-click" | "rightclick" => Some(Self::Secondary),
            _ => None,
        }
    }

    /// Position of this slot in fixed-size per-slot arrays.
    pub const fn index(self) -> usize {
        match self {
            Self::Primary => 0,
            Self::Secondary => 1,
        }
    }
}

impl fmt::Display for ActionSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
