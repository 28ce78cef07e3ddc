//! Per-item bindings and their scope.

use crate::template::CommandTemplate;
use powertool_core::{ActionSlot, ActorId};
use std::collections::BTreeMap;
use std::fmt;

/// Where a binding lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Server-wide; visible to every actor and overriding their own bindings.
    Global,
    /// Private to one actor.
    OwnedBy(ActorId),
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Global => f.write_str("global"),
            Self::OwnedBy(actor) => write!(f, "actor {actor}"),
        }
    }
}

/// The primary/secondary command pair attached to one item.
///
/// Execution overrides (`run_as_console`, grants) only exist on global
/// bindings; owned bindings always run as their actor with no extra
/// permissions.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Binding {
    slots: [Option<CommandTemplate>; 2],
    global: bool,
    run_as_console: bool,
    grants: BTreeMap<String, bool>,
}

impl Binding {
    /// An empty binding owned by a single actor.
    pub fn owned() -> Self {
        Self::default()
    }

    /// An empty global binding.
    pub fn global() -> Self {
        Self {
            global: true,
            ..Self::default()
        }
    }

    /// Set execution overrides. Ignored unless the binding is global.
    pub fn with_privileges(mut self, run_as_console: bool, grants: BTreeMap<String, bool>) -> Self {
        if self.global {
            self.run_as_console = run_as_console;
            self.grants = grants;
        }
        self
    }

    /// Builder form of [`Binding::set_command`].
    pub fn with_command(mut self, slot: ActionSlot, template: CommandTemplate) -> Self {
        self.set_command(slot, template);
        self
    }

    /// Whether this is a global binding.
    pub fn is_global(&self) -> bool {
        self.global
    }

    /// Whether the command runs with console privileges.
    pub fn runs_as_console(&self) -> bool {
        self.run_as_console
    }

    /// Permissions granted for the duration of one dispatch.
    pub fn grants(&self) -> &BTreeMap<String, bool> {
        &self.grants
    }

    /// Template bound to `slot`, if any.
    pub fn command(&self, slot: ActionSlot) -> Option<&CommandTemplate> {
        self.slots[slot.index()].as_ref()
    }

    /// Bind `template` to `slot`, returning the previous template.
    pub fn set_command(&mut self, slot: ActionSlot, template: CommandTemplate) -> Option<CommandTemplate> {
        self.slots[slot.index()].replace(template)
    }

    /// Unbind `slot`, returning the previous template.
    pub fn clear_command(&mut self, slot: ActionSlot) -> Option<CommandTemplate> {
        self.slots[slot.index()].take()
    }

    /// Bound slots in display order.
    pub fn commands(&self) -> impl Iterator<Item = (ActionSlot, &CommandTemplate)> {
        ActionSlot::ALL
            .into_iter()
            .filter_map(|slot| self.command(slot).map(|t| (slot, t)))
    }

    /// True when no slot is bound.
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}
