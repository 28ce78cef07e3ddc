use crate::replay::SinkRules;
use powertool_core::ActorId;
use powertool_server::{CommandSink, ExecutionError};
use std::collections::BTreeMap;
use tracing::info;

/// Prints dispatched commands instead of running them.
#[derive(Debug)]
pub struct ConsoleSink {
    rules: SinkRules,
    /// Names granted for the dispatch in progress.
    granted: BTreeMap<String, bool>,
    /// Lines printed so far.
    pub transcript: Vec<String>,
}

impl ConsoleSink {
    pub fn new(rules: SinkRules) -> Self {
        Self {
            rules,
            granted: BTreeMap::new(),
            transcript: Vec::new(),
        }
    }

    fn check(&self, name: &str, run_as_console: bool) -> Result<(), ExecutionError> {
        if !self.rules.known.is_empty() && !self.rules.known.contains(name) {
            return Err(ExecutionError::UnknownCommand(name.to_string()));
        }
        let allowed = run_as_console || self.granted.get(name).copied().unwrap_or(false);
        if self.rules.restricted.contains(name) && !allowed {
            return Err(ExecutionError::PermissionDenied(name.to_string()));
        }
        Ok(())
    }
}

impl CommandSink for ConsoleSink {
    fn apply_grants(&mut self, _actor: &ActorId, grants: &BTreeMap<String, bool>) {
        self.granted = grants.clone();
    }

    fn execute(
        &mut self,
        actor: &ActorId,
        command: &str,
        run_as_console: bool,
        _grants: &BTreeMap<String, bool>,
    ) -> Result<(), ExecutionError> {
        let name = command
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        self.check(&name, run_as_console)?;

        let sender = if run_as_console { "console" } else { actor.as_str() };
        info!(%actor, command, run_as_console, "dispatch");
        let line = format!("{sender}> /{command}");
        println!("{line}");
        self.transcript.push(line);
        Ok(())
    }

    fn revoke_grants(&mut self, _actor: &ActorId, _grants: &BTreeMap<String, bool>) {
        self.granted.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> SinkRules {
        SinkRules {
            known: ["heal", "ban"].iter().map(|s| s.to_string()).collect(),
            restricted: ["ban"].iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn unknown_and_restricted_commands_fail() {
        let mut sink = ConsoleSink::new(rules());
        let alice = ActorId::new("alice");
        let none = BTreeMap::new();
        assert_eq!(
            sink.execute(&alice, "fly", false, &none),
            Err(ExecutionError::UnknownCommand("fly".into()))
        );
        assert_eq!(
            sink.execute(&alice, "ban bob", false, &none),
            Err(ExecutionError::PermissionDenied("ban".into()))
        );
        assert!(sink.execute(&alice, "ban bob", true, &none).is_ok());
        assert_eq!(sink.transcript, vec!["console> /ban bob".to_string()]);
    }

    #[test]
    fn grants_last_for_one_dispatch() {
        let mut sink = ConsoleSink::new(rules());
        let alice = ActorId::new("alice");
        let grants = BTreeMap::from([("ban".to_string(), true)]);

        sink.apply_grants(&alice, &grants);
        assert!(sink.execute(&alice, "ban bob", false, &grants).is_ok());
        sink.revoke_grants(&alice, &grants);
        assert!(sink.execute(&alice, "ban bob", false, &BTreeMap::new()).is_err());
        assert_eq!(sink.transcript, vec!["alice> /ban bob".to_string()]);
    }
}
