//! Capabilities the host server provides to the engine.

use glam::IVec3;
use powertool_core::ActorId;
use std::collections::BTreeMap;
use thiserror::Error;

/// Why the host could not run a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExecutionError {
    /// No command with that name is registered.
    #[error("unknown command '{0}'")]
    UnknownCommand(String),
    /// The sender lacks permission to run the command.
    #[error("permission denied for '{0}'")]
    PermissionDenied(String),
    /// The command ran and reported failure.
    #[error("command failed: {0}")]
    Failed(String),
}

/// Runs resolved command strings.
pub trait CommandSink {
    /// Temporarily grant `grants` to `actor`. Called right before
    /// [`CommandSink::execute`] when a binding carries grants.
    fn apply_grants(&mut self, _actor: &ActorId, _grants: &BTreeMap<String, bool>) {}

    /// Run `command` as `actor`, or as the console when `run_as_console`.
    fn execute(
        &mut self,
        actor: &ActorId,
        command: &str,
        run_as_console: bool,
        grants: &BTreeMap<String, bool>,
    ) -> Result<(), ExecutionError>;

    /// Undo [`CommandSink::apply_grants`]. Always called after execution.
    fn revoke_grants(&mut self, _actor: &ActorId, _grants: &BTreeMap<String, bool>) {}
}

/// Read-only view of block solidity.
pub trait WorldView {
    /// Whether the block at `cell` is non-empty.
    fn is_solid(&self, cell: IVec3) -> bool;
}

impl<F> WorldView for F
where
    F: Fn(IVec3) -> bool,
{
    fn is_solid(&self, cell: IVec3) -> bool {
        self(cell)
    }
}
