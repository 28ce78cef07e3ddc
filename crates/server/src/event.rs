//! Inbound action notifications and their outcomes.

use glam::{IVec3, Vec3};
use powertool_core::{ActionSlot, ActorId, ItemKind, WorldTick};
use powertool_targeting::TargetCandidate;
use serde::{Deserialize, Serialize};

/// Snapshot of the item in an actor's hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeldItem {
    /// Item kind; [`ItemKind::AIR`] for an empty hand.
    pub kind: ItemKind,
    /// Raw variant value.
    #[serde(default)]
    pub variant: u8,
    /// Custom display name, if the item was renamed.
    #[serde(default)]
    pub display_name: Option<String>,
}

impl HeldItem {
    /// An unnamed item.
    pub fn new(kind: ItemKind, variant: u8) -> Self {
        Self {
            kind,
            variant,
            display_name: None,
        }
    }

    /// An empty hand.
    pub fn empty() -> Self {
        Self::new(ItemKind::AIR, 0)
    }

    /// Whether the hand is empty.
    pub fn is_empty(&self) -> bool {
        self.kind.is_air()
    }
}

/// How the actor token is filled for one action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActorTarget {
    /// Scan the view ray for the nearest actor.
    Scan,
    /// The host already knows the target. `None` means the struck or
    /// clicked entity is not an actor, so actor tokens cannot be filled.
    Fixed(Option<ActorId>),
}

/// One "actor X did action Y holding item Z" notification.
#[derive(Debug, Clone)]
pub struct ActionNotification {
    /// Who acted.
    pub actor: ActorId,
    /// What they were holding.
    pub item: HeldItem,
    /// Which click.
    pub slot: ActionSlot,
    /// Eye position.
    pub view_origin: Vec3,
    /// Look direction.
    pub view_direction: Vec3,
    /// Actors near enough to be targeted.
    pub candidates: Vec<TargetCandidate>,
    /// Tick the action happened in.
    pub tick: WorldTick,
    /// Actor-token source.
    pub actor_target: ActorTarget,
    /// Block the host reported as clicked, if any.
    pub clicked_block: Option<IVec3>,
}

/// Per-action state shared by every host event type.
#[derive(Debug, Clone)]
pub struct ActionContext {
    /// Who acted.
    pub actor: ActorId,
    /// What they were holding.
    pub item: HeldItem,
    /// Eye position.
    pub view_origin: Vec3,
    /// Look direction.
    pub view_direction: Vec3,
    /// Actors near enough to be targeted.
    pub candidates: Vec<TargetCandidate>,
    /// Current tick.
    pub tick: WorldTick,
}

/// The host interaction paths that can trigger a power tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum HostEvent {
    /// A click in the air or on a block.
    Interact {
        /// Which click.
        slot: ActionSlot,
        /// The block clicked, if any.
        #[serde(default)]
        clicked_block: Option<[i32; 3]>,
    },
    /// A melee hit on an entity. Always the primary action.
    MeleeHit {
        /// The struck entity, if it is an actor.
        #[serde(default)]
        victim: Option<ActorId>,
    },
    /// A use-click on an entity. Always the secondary action.
    InteractActor {
        /// The clicked entity, if it is an actor.
        #[serde(default)]
        target: Option<ActorId>,
    },
}

impl HostEvent {
    /// Fold this event and its context into a notification.
    pub fn into_notification(self, ctx: ActionContext) -> ActionNotification {
        let (slot, actor_target, clicked_block) = match self {
            Self::Interact {
                slot,
                clicked_block,
            } => (slot, ActorTarget::Scan, clicked_block.map(IVec3::from_array)),
            Self::MeleeHit { victim } => (ActionSlot::Primary, ActorTarget::Fixed(victim), None),
            Self::InteractActor { target } => {
                (ActionSlot::Secondary, ActorTarget::Fixed(target), None)
            }
        };
        ActionNotification {
            actor: ctx.actor,
            item: ctx.item,
            slot,
            view_origin: ctx.view_origin,
            view_direction: ctx.view_direction,
            candidates: ctx.candidates,
            tick: ctx.tick,
            actor_target,
            clicked_block,
        }
    }
}

/// Why a bound command did not run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SuppressReason {
    /// A token needed a target and none was found.
    NoTarget,
    /// The actor already dispatched during this tick.
    AlreadyExecuted,
}

/// Terminal state of one notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum Outcome {
    /// No bound command for this actor, item and click.
    Ignored,
    /// A bound command existed but was not run.
    Suppressed {
        /// Why.
        reason: SuppressReason,
    },
    /// The command was handed to the sink and the tick recorded.
    Recorded {
        /// The resolved command string.
        command: String,
        /// Whether the sink reported success.
        succeeded: bool,
    },
}

impl Outcome {
    /// Whether the host should cancel the underlying event.
    ///
    /// True whenever a bound command existed for the action, even if it
    /// did not run.
    pub fn cancels_event(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}
