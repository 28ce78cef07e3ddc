//! The power tool engine: lookup, targeting, resolution and dispatch.

use crate::config::PowerToolConfig;
use crate::dao::{BindingDao, BindingFormat};
use crate::event::{ActionNotification, ActorTarget, HeldItem, Outcome, SuppressReason};
use crate::host::{CommandSink, WorldView};
use anyhow::{Context, Result};
use glam::IVec3;
use powertool_bindings::{resolve_template, BindingStore, Scope, TargetingContext, TokenSet};
use powertool_core::{ActorId, ItemCatalog, ItemKey, SimTick};
use powertool_targeting::{
    find_first_open_upward, find_first_solid_along_view, find_nearest_actor_in_view,
};
use std::collections::{BTreeMap, VecDeque};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Binds commands to held items and runs them on click.
///
/// All methods are synchronous and expected to run on the host's
/// simulation thread.
pub struct PowerTools<D> {
    pub(crate) config: PowerToolConfig,
    pub(crate) tokens: TokenSet,
    pub(crate) catalog: Arc<ItemCatalog>,
    pub(crate) store: BindingStore,
    pub(crate) dao: D,
    config_path: Option<PathBuf>,
    /// Connected actors and the permission groups they belong to.
    connected: BTreeMap<ActorId, Vec<String>>,
    reload_queue: VecDeque<ActorId>,
    last_reload: Option<SimTick>,
}

impl<D: BindingDao> PowerTools<D> {
    /// Create the engine and load the global bindings.
    pub fn new(config: PowerToolConfig, catalog: Arc<ItemCatalog>, dao: D) -> Result<Self> {
        let tokens = config.tokens();
        let mut tools = Self {
            config,
            tokens,
            catalog,
            store: BindingStore::new(),
            dao,
            config_path: None,
            connected: BTreeMap::new(),
            reload_queue: VecDeque::new(),
            last_reload: None,
        };
        tools.load_global()?;
        Ok(tools)
    }

    /// Re-read configuration from `path` on the `reload` sub-command.
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = Some(path.into());
        self
    }

    /// Active configuration.
    pub fn config(&self) -> &PowerToolConfig {
        &self.config
    }

    /// Item catalog used for keys.
    pub fn catalog(&self) -> &ItemCatalog {
        &self.catalog
    }

    /// The in-memory binding state.
    pub fn store(&self) -> &BindingStore {
        &self.store
    }

    /// The persistence backend.
    pub fn dao(&self) -> &D {
        &self.dao
    }

    pub(crate) fn format(&self) -> BindingFormat<'_> {
        BindingFormat {
            catalog: &self.catalog,
            tokens: &self.tokens,
            use_display_names: self.config.use_display_names,
        }
    }

    /// Key identifying `item` under the current configuration.
    pub fn item_key(&self, item: &HeldItem) -> ItemKey {
        ItemKey::from_item_snapshot(
            &self.catalog,
            item.kind,
            item.variant,
            item.display_name.as_deref(),
            self.config.use_display_names,
        )
    }

    /// Quota for `actor` from the groups reported at connect time.
    pub fn limit_for(&self, actor: &ActorId) -> i32 {
        let groups = self.connected.get(actor).map(Vec::as_slice).unwrap_or(&[]);
        self.config.limits.limit_for(groups)
    }

    fn load_global(&mut self) -> Result<()> {
        let format = self.format();
        let global = self
            .dao
            .load_bindings(&Scope::Global, &format)
            .context("failed to load global bindings")?;
        info!(count = global.len(), "loaded global power tools");
        self.store.replace_global(global);
        Ok(())
    }

    fn load_owned(&mut self, actor: &ActorId) -> Result<()> {
        let format = self.format();
        let owned = self
            .dao
            .load_bindings(&Scope::OwnedBy(actor.clone()), &format)
            .with_context(|| format!("failed to load power tools for {actor}"))?;
        debug!(%actor, count = owned.len(), "loaded power tools");
        self.store.replace_owned(actor, owned);
        Ok(())
    }

    /// An actor joined: remember their groups and load their bindings.
    pub fn actor_connected(&mut self, actor: ActorId, groups: Vec<String>) -> Result<()> {
        self.connected.insert(actor.clone(), groups);
        self.load_owned(&actor)
    }

    /// An actor left: drop everything kept for them.
    pub fn actor_disconnected(&mut self, actor: &ActorId) {
        self.connected.remove(actor);
        self.reload_queue.retain(|queued| queued != actor);
        self.store.forget_actor(actor);
    }

    /// Actors currently connected.
    pub fn connected_actors(&self) -> impl Iterator<Item = &ActorId> {
        self.connected.keys()
    }

    /// Apply `config`, reload global bindings now and queue every connected
    /// actor for a throttled reload through [`PowerTools::tick`].
    ///
    /// Nothing changes if the global bindings fail to load.
    pub fn reload(&mut self, config: PowerToolConfig) -> Result<()> {
        let tokens = config.tokens();
        let format = BindingFormat {
            catalog: &self.catalog,
            tokens: &tokens,
            use_display_names: config.use_display_names,
        };
        let global = self
            .dao
            .load_bindings(&Scope::Global, &format)
            .context("failed to load global bindings")?;
        info!(count = global.len(), "loaded global power tools");
        self.store.replace_global(global);
        self.tokens = tokens;
        self.config = config;
        self.reload_queue = self.connected.keys().cloned().collect();
        self.last_reload = None;
        info!(queued = self.reload_queue.len(), "power tools reloaded");
        Ok(())
    }

    /// Re-read the configuration file, if one was given, and reload.
    pub fn reload_from_disk(&mut self) -> Result<()> {
        let config = match &self.config_path {
            Some(path) => PowerToolConfig::load_from_path(path),
            None => self.config.clone(),
        };
        self.reload(config)
    }

    /// Advance time; reloads at most one queued actor per reload delay.
    pub fn tick(&mut self, now: SimTick) {
        let due = self
            .last_reload
            .map_or(true, |last| now.since(last) >= self.config.reload_delay_ticks);
        if !due {
            return;
        }
        let Some(actor) = self.reload_queue.pop_front() else {
            return;
        };
        self.last_reload = Some(now);
        if let Err(err) = self.load_owned(&actor) {
            warn!(%actor, "reload failed: {err:#}");
        }
    }

    /// Whether any actor reload is still pending.
    pub fn reload_pending(&self) -> bool {
        !self.reload_queue.is_empty()
    }

    /// Run the bound command, if any, for one action.
    pub fn handle_action(
        &mut self,
        notification: &ActionNotification,
        world: &impl WorldView,
        sink: &mut impl CommandSink,
    ) -> Outcome {
        let actor = &notification.actor;
        if notification.item.is_empty() || !self.store.is_enabled(actor) {
            return Outcome::Ignored;
        }

        let key = self.item_key(&notification.item);
        let Some(binding) = self.store.resolve(actor, &key) else {
            return Outcome::Ignored;
        };
        let Some(template) = binding.command(notification.slot) else {
            return Outcome::Ignored;
        };
        debug!(%actor, slot = %notification.slot, candidate = %template, "power tool candidate");

        let mut targets = ViewTargets {
            notification,
            world,
            config: &self.config,
        };
        let Some(command) = resolve_template(template, &self.tokens, &mut targets) else {
            debug!(%actor, "no target");
            return Outcome::Suppressed {
                reason: SuppressReason::NoTarget,
            };
        };

        if !self.store.should_dispatch(actor, notification.tick) {
            debug!(%actor, "already executed");
            return Outcome::Suppressed {
                reason: SuppressReason::AlreadyExecuted,
            };
        }

        let run_as_console = binding.runs_as_console();
        let grants = binding.grants().clone();
        debug!(%actor, %command, run_as_console, "executing command");
        if !grants.is_empty() {
            sink.apply_grants(actor, &grants);
        }
        let result = sink.execute(actor, &command, run_as_console, &grants);
        if !grants.is_empty() {
            sink.revoke_grants(actor, &grants);
        }
        if let Err(err) = &result {
            error!(%actor, %command, "execution failed: {err}");
        }

        self.store.record_execution(actor, notification.tick);
        Outcome::Recorded {
            command,
            succeeded: result.is_ok(),
        }
    }

    /// Lines describing the binding on a newly selected item.
    ///
    /// Empty unless verbose output is on, the actor is enabled and the item
    /// is bound.
    pub fn describe_held_item(&self, actor: &ActorId, item: &HeldItem) -> Vec<String> {
        if !self.config.verbose || item.is_empty() || !self.store.is_enabled(actor) {
            return Vec::new();
        }
        let key = self.item_key(item);
        let Some(binding) = self.store.resolve(actor, &key) else {
            return Vec::new();
        };
        let mut lines = Vec::new();
        for (slot, template) in binding.commands() {
            if lines.is_empty() {
                lines.push("Power tool:".to_string());
            }
            lines.push(format!("  {slot}: {template}"));
        }
        lines
    }
}

/// Lazily evaluated targeting for one notification.
struct ViewTargets<'a, W> {
    notification: &'a ActionNotification,
    world: &'a W,
    config: &'a PowerToolConfig,
}

impl<W: WorldView> TargetingContext for ViewTargets<'_, W> {
    fn target_actor(&mut self) -> Option<String> {
        let n = self.notification;
        let target = match &n.actor_target {
            ActorTarget::Fixed(target) => target.as_ref(),
            ActorTarget::Scan => find_nearest_actor_in_view(
                n.view_origin,
                n.view_direction,
                n.candidates.iter().filter(|c| c.id != n.actor),
                self.config.max_trace_distance,
                self.config.hit_test.strategy(),
            ),
        };
        target.map(|id| id.as_str().to_string())
    }

    fn target_block(&mut self) -> Option<IVec3> {
        let n = self.notification;
        let is_solid = |cell: IVec3| self.world.is_solid(cell);
        match n.clicked_block {
            Some(cell) => (cell.y > self.config.min_y && is_solid(cell)).then_some(cell),
            None => find_first_solid_along_view(
                n.view_origin,
                n.view_direction,
                self.config.max_trace_distance,
                self.config.min_y,
                is_solid,
            ),
        }
    }

    fn first_open_above(&mut self, cell: IVec3) -> Option<IVec3> {
        find_first_open_upward(
            cell,
            |c| self.world.is_solid(c),
            self.config.max_air_steps,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::MemoryBindingDao;
    use powertool_bindings::{Binding, CommandTemplate};
    use powertool_core::{ActionSlot, ItemKind};
    use std::collections::BTreeMap;

    /// Memory DAO whose global table can be made unreadable.
    #[derive(Default)]
    struct FlakyDao {
        inner: MemoryBindingDao,
        fail_global: bool,
    }

    impl BindingDao for FlakyDao {
        fn load_bindings(
            &self,
            scope: &Scope,
            format: &BindingFormat<'_>,
        ) -> Result<BTreeMap<ItemKey, Binding>> {
            if self.fail_global && *scope == Scope::Global {
                anyhow::bail!("global table unavailable");
            }
            self.inner.load_bindings(scope, format)
        }

        fn save_binding(
            &mut self,
            scope: &Scope,
            key: &ItemKey,
            binding: &Binding,
            format: &BindingFormat<'_>,
        ) -> Result<()> {
            self.inner.save_binding(scope, key, binding, format)
        }

        fn remove_binding(
            &mut self,
            scope: &Scope,
            key: &ItemKey,
            format: &BindingFormat<'_>,
        ) -> Result<()> {
            self.inner.remove_binding(scope, key, format)
        }

        fn clear_bindings(&mut self, scope: &Scope) -> Result<()> {
            self.inner.clear_bindings(scope)
        }
    }

    #[test]
    fn failed_reload_keeps_previous_state() {
        let catalog = Arc::new(ItemCatalog::standard());
        let stick = ItemKey::from_item_snapshot(&catalog, ItemKind(280), 0, None, true);
        let mut dao = FlakyDao::default();
        dao.inner.insert(
            Scope::Global,
            stick.clone(),
            Binding::global().with_command(
                ActionSlot::Primary,
                CommandTemplate::new("spawn", false, false, false).unwrap(),
            ),
        );
        let mut tools = PowerTools::new(PowerToolConfig::default(), catalog, dao).unwrap();
        tools.actor_connected(ActorId::new("alice"), Vec::new()).unwrap();
        tools.dao.fail_global = true;

        let quiet = PowerToolConfig {
            verbose: false,
            player_token: "{p}".into(),
            ..PowerToolConfig::default()
        };
        assert!(tools.reload(quiet).is_err());
        assert!(tools.config().verbose);
        assert_eq!(tools.tokens, TokenSet::default());
        assert!(tools.store().global(&stick).is_some());
        assert!(!tools.reload_pending());
    }
}
