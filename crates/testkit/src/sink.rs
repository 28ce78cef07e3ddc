//! A command sink that records instead of executing.

use powertool_core::ActorId;
use powertool_server::{CommandSink, ExecutionError};
use std::collections::{BTreeMap, HashSet};

/// One command handed to the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutedCommand {
    /// Who triggered it.
    pub actor: ActorId,
    /// The resolved command.
    pub command: String,
    /// Whether it ran with console privileges.
    pub run_as_console: bool,
    /// Grants in effect while it ran.
    pub grants: BTreeMap<String, bool>,
}

/// Grant bookkeeping observed by the sink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantEvent {
    /// Grants applied before a dispatch.
    Applied(ActorId),
    /// The command ran.
    Executed(ActorId),
    /// Grants revoked after a dispatch.
    Revoked(ActorId),
}

/// Records every dispatch; commands whose first word is in `failing` fail.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    /// Everything executed, in order (failures included).
    pub executed: Vec<ExecutedCommand>,
    /// Grant/execute interleaving, in order.
    pub grant_log: Vec<GrantEvent>,
    failing: HashSet<String>,
}

impl RecordingSink {
    /// A sink where every command succeeds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make commands named `name` fail.
    pub fn fail_command(mut self, name: &str) -> Self {
        self.failing.insert(name.to_ascii_lowercase());
        self
    }

    /// Just the command strings, in order.
    pub fn commands(&self) -> Vec<&str> {
        self.executed.iter().map(|c| c.command.as_str()).collect()
    }
}

impl CommandSink for RecordingSink {
    fn apply_grants(&mut self, actor: &ActorId, _grants: &BTreeMap<String, bool>) {
        self.grant_log.push(GrantEvent::Applied(actor.clone()));
    }

    fn execute(
        &mut self,
        actor: &ActorId,
        command: &str,
        run_as_console: bool,
        grants: &BTreeMap<String, bool>,
    ) -> Result<(), ExecutionError> {
        self.grant_log.push(GrantEvent::Executed(actor.clone()));
        self.executed.push(ExecutedCommand {
            actor: actor.clone(),
            command: command.to_string(),
            run_as_console,
            grants: grants.clone(),
        });
        let name = command
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        if self.failing.contains(&name) {
            tracing::debug!(%actor, command, "recording sink failing command");
            return Err(ExecutionError::Failed(command.to_string()));
        }
        Ok(())
    }

    fn revoke_grants(&mut self, actor: &ActorId, _grants: &BTreeMap<String, bool>) {
        self.grant_log.push(GrantEvent::Revoked(actor.clone()));
    }
}
