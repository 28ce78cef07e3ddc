//! The `/powertool` command and its sub-commands.

use crate::config::PowerToolConfig;
use crate::dao::{BindingDao, BindingFormat};
use crate::engine::PowerTools;
use crate::event::HeldItem;
use powertool_bindings::{BindError, CommandTemplate, OwnedChange, Scope};
use powertool_core::{ActionSlot, ActorId, ItemKey};
use std::fmt;
use tracing::error;

/// Owned bindings shown per `list` page.
const TOOLS_PER_PAGE: usize = 5;

/// A sub-command line that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandError {
    message: String,
}

impl CommandError {
    /// Wrap a user-facing message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CommandError {}

/// A parsed `/powertool` sub-command.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PowerToolCommand {
    Help,
    /// Bind (or, with no words, clear) one slot of the held item.
    Bind {
        slot: ActionSlot,
        words: Vec<String>,
    },
    Clear {
        all: bool,
        item: Option<String>,
    },
    List {
        page: Option<usize>,
    },
    Enable,
    Disable,
    Toggle,
    Reload,
}

/// Messages for the sender.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// One message per line.
    pub lines: Vec<String>,
}

/// Parse a `/powertool ...` line. The command name itself is optional.
pub fn parse_command(
    input: &str,
    config: &PowerToolConfig,
) -> Result<PowerToolCommand, CommandError> {
    let input = input.trim();
    let input = input.strip_prefix('/').unwrap_or(input).trim();

    let mut parts = input.split_whitespace().peekable();
    if parts.peek().is_some_and(|word| config.is_own_command(word)) {
        parts.next();
    }
    let Some(sub) = parts.next() else {
        return Ok(PowerToolCommand::Help);
    };
    let sub = sub.to_ascii_lowercase();
    let args: Vec<&str> = parts.collect();

    match sub.as_str() {
        "help" | "?" => Ok(PowerToolCommand::Help),
        "left" | "l" | "right" | "r" => {
            let slot = ActionSlot::parse(&sub)
                .ok_or_else(|| CommandError::new(format!("Unknown action: {sub}")))?;
            Ok(PowerToolCommand::Bind {
                slot,
                words: args.iter().map(|w| w.to_string()).collect(),
            })
        }
        "clear" | "clr" | "c" => parse_clear_command(&args),
        "list" | "ls" => {
            let page = match args.as_slice() {
                [] => None,
                [page] => Some(
                    page.parse::<usize>()
                        .map_err(|_| CommandError::new("Invalid page number"))?,
                ),
                _ => return Err(CommandError::new("Usage: /powertool list [page]")),
            };
            Ok(PowerToolCommand::List { page })
        }
        "on" => Ok(PowerToolCommand::Enable),
        "off" => Ok(PowerToolCommand::Disable),
        "toggle" | "t" => Ok(PowerToolCommand::Toggle),
        "reload" => Ok(PowerToolCommand::Reload),
        _ => Err(CommandError::new(format!(
            "Unknown sub-command: {sub}. Try /powertool help"
        ))),
    }
}

fn parse_clear_command(args: &[&str]) -> Result<PowerToolCommand, CommandError> {
    let mut all = false;
    let mut item = None;
    for arg in args {
        if arg.eq_ignore_ascii_case("-a") {
            all = true;
        } else if item.is_none() {
            item = Some(arg.to_string());
        } else {
            return Err(CommandError::new("Usage: /powertool clear [-a] [item]"));
        }
    }
    Ok(PowerToolCommand::Clear { all, item })
}

/// Usage summary for `help`.
pub fn help_lines() -> Vec<String> {
    vec![
        "Power tool commands:".to_string(),
        "  left|l <command...>    bind to left click (no command clears)".to_string(),
        "  right|r <command...>   bind to right click (no command clears)".to_string(),
        "  clear|c [-a] [item]    clear the held item, an item, or everything".to_string(),
        "  list|ls [page]         list your power tools".to_string(),
        "  on | off | toggle|t    enable or disable power tools".to_string(),
        "  reload                 re-read configuration".to_string(),
    ]
}

impl<D: BindingDao> PowerTools<D> {
    /// Run a parsed sub-command for `actor`, who is holding `held`.
    pub fn execute_command(
        &mut self,
        actor: &ActorId,
        held: &HeldItem,
        cmd: PowerToolCommand,
    ) -> CommandOutput {
        let mut out = CommandOutput::default();
        match cmd {
            PowerToolCommand::Help => out.lines.extend(help_lines()),
            PowerToolCommand::Bind { slot, words } => {
                if held.is_empty() {
                    out.lines.push("You aren't holding anything!".to_string());
                    return out;
                }
                let key = self.item_key(held);
                let result = if words.is_empty() {
                    self.clear_slot(actor, &key, slot)
                        .map(|_| format!("Power tool ({slot}) cleared."))
                } else {
                    self.bind_slot(actor, &key, slot, &words)
                        .map(|_| format!("Power tool ({slot}) set."))
                };
                match result {
                    Ok(line) => out.lines.push(line),
                    Err(err) => out.lines.push(format!("Error: {err}")),
                }
            }
            PowerToolCommand::Clear { all: true, .. } => {
                if self.store.clear_all_owned(actor) {
                    self.persist(|dao, _| dao.clear_bindings(&Scope::OwnedBy(actor.clone())));
                }
                out.lines.push("All power tools cleared.".to_string());
            }
            PowerToolCommand::Clear { all: false, item } => {
                out.lines
                    .push("(Add -a to clear all binds from all items)".to_string());
                let key = match item {
                    Some(text) => {
                        match ItemKey::parse(&self.catalog, &text, self.config.use_display_names) {
                            Ok(key) => key,
                            Err(_) => {
                                out.lines.push("Invalid item ID or name.".to_string());
                                return out;
                            }
                        }
                    }
                    None if held.is_empty() => {
                        out.lines.push("You aren't holding anything!".to_string());
                        return out;
                    }
                    None => self.item_key(held),
                };
                if self.store.remove_owned(actor, &key) {
                    let scope = Scope::OwnedBy(actor.clone());
                    self.persist(|dao, format| dao.remove_binding(&scope, &key, format));
                    out.lines.push("Power tool cleared.".to_string());
                } else {
                    out.lines.push(format!("Error: {}", BindError::GlobalOnly));
                }
            }
            PowerToolCommand::List { page } => out.lines.extend(self.list_lines(actor, page)),
            PowerToolCommand::Enable => {
                self.store.set_enabled(actor, true);
                out.lines.push(enabled_line(true));
            }
            PowerToolCommand::Disable => {
                self.store.set_enabled(actor, false);
                out.lines.push(enabled_line(false));
            }
            PowerToolCommand::Toggle => {
                let enabled = self.store.toggle_enabled(actor);
                out.lines.push(enabled_line(enabled));
            }
            PowerToolCommand::Reload => match self.reload_from_disk() {
                Ok(()) => out.lines.push("Configuration reloaded.".to_string()),
                Err(err) => out.lines.push(format!("Error: {err:#}")),
            },
        }
        out
    }

    fn bind_slot(
        &mut self,
        actor: &ActorId,
        key: &ItemKey,
        slot: ActionSlot,
        words: &[String],
    ) -> Result<(), BindError> {
        let mut text = words.join(" ");
        if let Some(stripped) = text.strip_prefix('/') {
            text = stripped.to_string();
        } else if !self.config.omit_leading_slash {
            return Err(BindError::MissingLeadingSlash);
        }

        let first = text.split_whitespace().next().unwrap_or_default();
        if first.is_empty() {
            return Err(BindError::EmptyCommand);
        }
        if self.config.is_own_command(first) {
            return Err(BindError::RecursiveCommand(first.to_string()));
        }

        let template = CommandTemplate::parse(text, &self.tokens)?;
        let limit = self.limit_for(actor);
        self.store
            .set_command(actor, key, slot, template, &|_: &ActorId| limit)?;
        self.save_owned(actor, key);
        Ok(())
    }

    fn clear_slot(&mut self, actor: &ActorId, key: &ItemKey, slot: ActionSlot) -> Result<(), BindError> {
        match self.store.clear_command(actor, key, slot)? {
            OwnedChange::Unchanged => {}
            OwnedChange::Updated => self.save_owned(actor, key),
            OwnedChange::Removed => {
                let scope = Scope::OwnedBy(actor.clone());
                self.persist(|dao, format| dao.remove_binding(&scope, key, format));
            }
        }
        Ok(())
    }

    fn save_owned(&mut self, actor: &ActorId, key: &ItemKey) {
        let Some(binding) = self.store.owned(actor, key).cloned() else {
            return;
        };
        let scope = Scope::OwnedBy(actor.clone());
        self.persist(|dao, format| dao.save_binding(&scope, key, &binding, format));
    }

    /// Write through to the DAO. Failures are logged; memory stays authoritative.
    fn persist<F>(&mut self, write: F)
    where
        F: FnOnce(&mut D, &BindingFormat<'_>) -> anyhow::Result<()>,
    {
        let format = BindingFormat {
            catalog: &self.catalog,
            tokens: &self.tokens,
            use_display_names: self.config.use_display_names,
        };
        if let Err(err) = write(&mut self.dao, &format) {
            error!("failed to persist power tools: {err:#}");
        }
    }

    fn list_lines(&self, actor: &ActorId, page: Option<usize>) -> Vec<String> {
        let tools: Vec<_> = self.store.owned_bindings(actor).collect();
        if tools.is_empty() {
            return vec!["You have no power tools defined.".to_string()];
        }
        let pages = tools.len().div_ceil(TOOLS_PER_PAGE);
        let page = page.unwrap_or(1).clamp(1, pages);

        let mut lines = Vec::new();
        for (key, binding) in tools.iter().skip((page - 1) * TOOLS_PER_PAGE).take(TOOLS_PER_PAGE) {
            lines.push(format!("{}:", key.to_canonical_string(&self.catalog)));
            for (slot, template) in binding.commands() {
                lines.push(format!("  {slot}: {template}"));
            }
        }
        if pages > 1 {
            lines.push(format!("----- Page {page} of {pages} -----"));
        }
        lines
    }
}

fn enabled_line(enabled: bool) -> String {
    format!(
        "Power tools {}.",
        if enabled { "enabled" } else { "disabled" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::MemoryBindingDao;
    use powertool_bindings::Binding;
    use powertool_core::{ItemCatalog, ItemKind};
    use std::sync::Arc;

    const STICK: ItemKind = ItemKind(280);
    const BOWL: ItemKind = ItemKind(281);

    fn tools(config: PowerToolConfig) -> PowerTools<MemoryBindingDao> {
        PowerTools::new(config, Arc::new(ItemCatalog::standard()), MemoryBindingDao::new()).unwrap()
    }

    fn run(
        tools: &mut PowerTools<MemoryBindingDao>,
        actor: &ActorId,
        held: &HeldItem,
        input: &str,
    ) -> Vec<String> {
        let cmd = parse_command(input, tools.config()).unwrap();
        tools.execute_command(actor, held, cmd).lines
    }

    #[test]
    fn parses_sub_commands_and_aliases() {
        let cfg = PowerToolConfig::default();
        assert_eq!(parse_command("/pt", &cfg).unwrap(), PowerToolCommand::Help);
        assert_eq!(
            parse_command("/powertool l /heal %p", &cfg).unwrap(),
            PowerToolCommand::Bind {
                slot: ActionSlot::Primary,
                words: vec!["/heal".into(), "%p".into()],
            }
        );
        assert_eq!(
            parse_command("r", &cfg).unwrap(),
            PowerToolCommand::Bind {
                slot: ActionSlot::Secondary,
                words: vec![],
            }
        );
        assert_eq!(
            parse_command("/pt c -a", &cfg).unwrap(),
            PowerToolCommand::Clear {
                all: true,
                item: None
            }
        );
        assert_eq!(
            parse_command("/pt clr wool:red", &cfg).unwrap(),
            PowerToolCommand::Clear {
                all: false,
                item: Some("wool:red".into())
            }
        );
        assert_eq!(
            parse_command("/pt ls 2", &cfg).unwrap(),
            PowerToolCommand::List { page: Some(2) }
        );
        assert_eq!(parse_command("/pt t", &cfg).unwrap(), PowerToolCommand::Toggle);
        assert!(parse_command("/pt ls two", &cfg).is_err());
        assert!(parse_command("/pt explode", &cfg).is_err());
    }

    #[test]
    fn bind_requires_slash_and_rejects_recursion() {
        let mut tools = tools(PowerToolConfig::default());
        let alice = ActorId::new("alice");
        let stick = HeldItem::new(STICK, 0);

        assert_eq!(
            run(&mut tools, &alice, &stick, "/pt l heal %p"),
            vec![format!("Error: {}", BindError::MissingLeadingSlash)]
        );
        assert_eq!(
            run(&mut tools, &alice, &stick, "/pt l /PT l /x"),
            vec![format!("Error: {}", BindError::RecursiveCommand("PT".into()))]
        );
        assert_eq!(
            run(&mut tools, &alice, &stick, "/pt l /tp %p %x"),
            vec![format!("Error: {}", BindError::ConflictingTokens)]
        );
        assert_eq!(tools.store().owned_count(&alice), 0);
    }

    #[test]
    fn omit_leading_slash_accepts_bare_commands() {
        let mut tools = tools(PowerToolConfig {
            omit_leading_slash: true,
            ..PowerToolConfig::default()
        });
        let alice = ActorId::new("alice");
        let stick = HeldItem::new(STICK, 0);
        assert_eq!(
            run(&mut tools, &alice, &stick, "/pt r heal %p"),
            vec!["Power tool (right) set.".to_string()]
        );
        let key = tools.item_key(&stick);
        let binding = tools.store().owned(&alice, &key).unwrap();
        assert_eq!(binding.command(ActionSlot::Secondary).unwrap().text(), "heal %p");
    }

    #[test]
    fn bind_and_clear_write_through() {
        let mut tools = tools(PowerToolConfig::default());
        let alice = ActorId::new("alice");
        let stick = HeldItem::new(STICK, 0);
        let scope = Scope::OwnedBy(alice.clone());
        let key = tools.item_key(&stick);

        run(&mut tools, &alice, &stick, "/pt l /heal %p");
        run(&mut tools, &alice, &stick, "/pt r /spawn");
        assert_eq!(tools.dao().table(&scope).unwrap()[&key].commands().count(), 2);

        assert_eq!(
            run(&mut tools, &alice, &stick, "/pt l"),
            vec!["Power tool (left) cleared.".to_string()]
        );
        assert_eq!(tools.dao().table(&scope).unwrap()[&key].commands().count(), 1);

        run(&mut tools, &alice, &stick, "/pt r");
        assert!(tools.store().owned(&alice, &key).is_none());
        assert!(!tools.dao().table(&scope).unwrap().contains_key(&key));
    }

    #[test]
    fn quota_blocks_new_items_only() {
        let mut config = PowerToolConfig::default();
        config.limits.default = 1;
        let mut tools = tools(config);
        let alice = ActorId::new("alice");
        tools.actor_connected(alice.clone(), Vec::new()).unwrap();

        let stick = HeldItem::new(STICK, 0);
        let bowl = HeldItem::new(BOWL, 0);
        run(&mut tools, &alice, &stick, "/pt l /a");
        assert_eq!(
            run(&mut tools, &alice, &stick, "/pt r /b"),
            vec!["Power tool (right) set.".to_string()]
        );
        assert_eq!(
            run(&mut tools, &alice, &bowl, "/pt l /c"),
            vec![format!("Error: {}", BindError::OverLimit { limit: 1 })]
        );
    }

    #[test]
    fn global_items_cannot_be_edited() {
        let catalog = Arc::new(ItemCatalog::standard());
        let mut dao = MemoryBindingDao::new();
        let stick_key = ItemKey::from_item_snapshot(&catalog, STICK, 0, None, true);
        dao.insert(
            Scope::Global,
            stick_key.clone(),
            Binding::global().with_command(
                ActionSlot::Primary,
                CommandTemplate::new("spawn", false, false, false).unwrap(),
            ),
        );
        let mut tools = PowerTools::new(PowerToolConfig::default(), catalog, dao).unwrap();
        let alice = ActorId::new("alice");
        let stick = HeldItem::new(STICK, 0);

        let denied = vec![format!("Error: {}", BindError::GlobalOnly)];
        assert_eq!(run(&mut tools, &alice, &stick, "/pt l /x"), denied);
        assert_eq!(run(&mut tools, &alice, &stick, "/pt l"), denied);
        let lines = run(&mut tools, &alice, &stick, "/pt c");
        assert_eq!(lines.last(), denied.last());
        assert!(tools.store().global(&stick_key).is_some());
    }

    #[test]
    fn clear_by_item_name_and_all() {
        let mut tools = tools(PowerToolConfig::default());
        let alice = ActorId::new("alice");
        run(&mut tools, &alice, &HeldItem::new(STICK, 0), "/pt l /a");
        run(&mut tools, &alice, &HeldItem::new(BOWL, 0), "/pt l /b");

        let lines = run(&mut tools, &alice, &HeldItem::empty(), "/pt c stick");
        assert_eq!(lines.last().map(String::as_str), Some("Power tool cleared."));
        assert_eq!(tools.store().owned_count(&alice), 1);

        let lines = run(&mut tools, &alice, &HeldItem::empty(), "/pt c nosuchthing");
        assert_eq!(lines.last().map(String::as_str), Some("Invalid item ID or name."));

        let lines = run(&mut tools, &alice, &HeldItem::empty(), "/pt c");
        assert_eq!(lines.last().map(String::as_str), Some("You aren't holding anything!"));

        let lines = run(&mut tools, &alice, &HeldItem::empty(), "/pt c -a");
        assert_eq!(lines, vec!["All power tools cleared.".to_string()]);
        assert_eq!(tools.store().owned_count(&alice), 0);
        assert!(tools.dao().table(&Scope::OwnedBy(alice)).is_none());
    }

    #[test]
    fn list_paginates_in_key_order() {
        let mut tools = tools(PowerToolConfig::default());
        let alice = ActorId::new("alice");
        assert_eq!(
            run(&mut tools, &alice, &HeldItem::empty(), "/pt ls"),
            vec!["You have no power tools defined.".to_string()]
        );
        for id in [280u16, 1, 3, 4, 5, 12, 13] {
            run(&mut tools, &alice, &HeldItem::new(ItemKind(id), 0), "/pt l /x");
        }

        let page_one = run(&mut tools, &alice, &HeldItem::empty(), "/pt ls");
        assert_eq!(page_one[0], "stone:");
        assert_eq!(page_one[1], "  left: x");
        assert_eq!(page_one.last().map(String::as_str), Some("----- Page 1 of 2 -----"));

        let page_two = run(&mut tools, &alice, &HeldItem::empty(), "/pt ls 9");
        assert_eq!(page_two[0], "gravel:");
        assert_eq!(page_two[2], "stick:");
        assert_eq!(page_two.last().map(String::as_str), Some("----- Page 2 of 2 -----"));
    }

    #[test]
    fn golden_session_transcript() {
        let mut tools = tools(PowerToolConfig::default());
        let alice = ActorId::new("alice");
        let stick = HeldItem::new(STICK, 0);

        let mut transcript = Vec::new();
        for input in ["/pt l /heal %p", "/pt off", "/pt t", "/pt on", "/pt ls"] {
            transcript.extend(run(&mut tools, &alice, &stick, input));
        }
        assert_eq!(
            transcript,
            vec![
                "Power tool (left) set.".to_string(),
                "Power tools disabled.".to_string(),
                "Power tools enabled.".to_string(),
                "Power tools enabled.".to_string(),
                "stick:".to_string(),
                "  left: heal %p".to_string(),
            ]
        );
    }
}
