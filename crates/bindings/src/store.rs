//! The binding store: global table plus per-actor state.

use crate::binding::Binding;
use crate::error::BindError;
use crate::gate::QuotaLookup;
use crate::template::CommandTemplate;
use powertool_core::{ActionSlot, ActorId, ItemKey, WorldTick};
use std::collections::{BTreeMap, HashMap};

/// Everything the store tracks for one actor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActorState {
    /// The actor's private bindings.
    pub owned_bindings: BTreeMap<ItemKey, Binding>,
    /// Whether the actor's power tools fire at all.
    pub enabled: bool,
    /// Tick of the last attempted dispatch. Never persisted.
    pub last_execution_tick: Option<WorldTick>,
}

impl Default for ActorState {
    fn default() -> Self {
        Self {
            owned_bindings: BTreeMap::new(),
            enabled: true,
            last_execution_tick: None,
        }
    }
}

/// What a mutation did to an actor's owned binding, for write-through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnedChange {
    /// Nothing was bound; nothing changed.
    Unchanged,
    /// The binding still has a slot and should be saved.
    Updated,
    /// The binding became empty and was dropped; delete it from storage.
    Removed,
}

/// Global and per-actor bindings with global-over-owned precedence.
#[derive(Debug, Default)]
pub struct BindingStore {
    global: BTreeMap<ItemKey, Binding>,
    pub(crate) actors: HashMap<ActorId, ActorState>,
}

impl BindingStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binding that fires for `actor` holding `key`: global first, then owned.
    pub fn resolve(&self, actor: &ActorId, key: &ItemKey) -> Option<&Binding> {
        self.global.get(key).or_else(|| {
            self.actors
                .get(actor)
                .and_then(|state| state.owned_bindings.get(key))
        })
    }

    /// The actor's owned binding for `key`, creating an empty one if needed.
    ///
    /// Fails with [`BindError::GlobalOnly`] when `key` is bound globally.
    pub(crate) fn resolve_or_create_owned(
        &mut self,
        actor: &ActorId,
        key: &ItemKey,
    ) -> Result<&mut Binding, BindError> {
        if self.global.contains_key(key) {
            return Err(BindError::GlobalOnly);
        }
        Ok(self
            .state_mut(actor)
            .owned_bindings
            .entry(key.clone())
            .or_insert_with(Binding::owned))
    }

    /// Bind `template` to `slot` of the actor's own binding for `key`.
    ///
    /// The quota is consulted only when this creates a new owned binding.
    pub fn set_command(
        &mut self,
        actor: &ActorId,
        key: &ItemKey,
        slot: ActionSlot,
        template: CommandTemplate,
        quota: &impl QuotaLookup,
    ) -> Result<(), BindError> {
        if self.global.contains_key(key) {
            return Err(BindError::GlobalOnly);
        }
        if self.owned(actor, key).is_none() && self.is_over_limit(actor, quota) {
            return Err(BindError::OverLimit {
                limit: quota.limit_for(actor),
            });
        }
        self.resolve_or_create_owned(actor, key)?
            .set_command(slot, template);
        tracing::debug!(%actor, %slot, "power tool set");
        Ok(())
    }

    /// Unbind `slot` of the actor's own binding for `key`.
    ///
    /// A binding left empty is removed from the store.
    pub fn clear_command(
        &mut self,
        actor: &ActorId,
        key: &ItemKey,
        slot: ActionSlot,
    ) -> Result<OwnedChange, BindError> {
        if self.global.contains_key(key) {
            return Err(BindError::GlobalOnly);
        }
        let Some(state) = self.actors.get_mut(actor) else {
            return Ok(OwnedChange::Unchanged);
        };
        let Some(binding) = state.owned_bindings.get_mut(key) else {
            return Ok(OwnedChange::Unchanged);
        };
        binding.clear_command(slot);
        if binding.is_empty() {
            state.owned_bindings.remove(key);
            Ok(OwnedChange::Removed)
        } else {
            Ok(OwnedChange::Updated)
        }
    }

    /// Drop the actor's own binding for `key`.
    ///
    /// Returns `false` without touching anything when `key` is bound
    /// globally; otherwise the key is unbound and `true` is returned.
    pub fn remove_owned(&mut self, actor: &ActorId, key: &ItemKey) -> bool {
        if self.global.contains_key(key) {
            return false;
        }
        if let Some(state) = self.actors.get_mut(actor) {
            state.owned_bindings.remove(key);
        }
        true
    }

    /// Drop every owned binding of `actor`. Returns whether any existed.
    pub fn clear_all_owned(&mut self, actor: &ActorId) -> bool {
        match self.actors.get_mut(actor) {
            Some(state) if !state.owned_bindings.is_empty() => {
                state.owned_bindings.clear();
                true
            }
            _ => false,
        }
    }

    /// The actor's own binding for `key`, ignoring global bindings.
    pub fn owned(&self, actor: &ActorId, key: &ItemKey) -> Option<&Binding> {
        self.actors
            .get(actor)
            .and_then(|state| state.owned_bindings.get(key))
    }

    /// All of the actor's own bindings, in key order.
    pub fn owned_bindings(&self, actor: &ActorId) -> impl Iterator<Item = (&ItemKey, &Binding)> {
        self.actors
            .get(actor)
            .into_iter()
            .flat_map(|state| state.owned_bindings.iter())
    }

    /// Number of owned bindings held by `actor`.
    pub fn owned_count(&self, actor: &ActorId) -> usize {
        self.actors
            .get(actor)
            .map_or(0, |state| state.owned_bindings.len())
    }

    /// Replace the actor's owned table, keeping the enabled flag and tick.
    pub fn replace_owned(&mut self, actor: &ActorId, bindings: BTreeMap<ItemKey, Binding>) {
        self.state_mut(actor).owned_bindings = bindings;
    }

    /// Enable or disable the actor's power tools.
    pub fn set_enabled(&mut self, actor: &ActorId, enabled: bool) {
        self.state_mut(actor).enabled = enabled;
    }

    /// Flip the enabled flag, returning the new value.
    pub fn toggle_enabled(&mut self, actor: &ActorId) -> bool {
        let state = self.state_mut(actor);
        state.enabled = !state.enabled;
        state.enabled
    }

    /// Whether the actor's power tools fire. Unknown actors are enabled.
    pub fn is_enabled(&self, actor: &ActorId) -> bool {
        self.actors.get(actor).map_or(true, |state| state.enabled)
    }

    /// Drop all state kept for `actor`.
    pub fn forget_actor(&mut self, actor: &ActorId) {
        self.actors.remove(actor);
    }

    /// Actors with live state.
    pub fn known_actors(&self) -> impl Iterator<Item = &ActorId> {
        self.actors.keys()
    }

    /// The global table, in key order.
    pub fn global_bindings(&self) -> impl Iterator<Item = (&ItemKey, &Binding)> {
        self.global.iter()
    }

    /// Global binding for `key`, if any.
    pub fn global(&self, key: &ItemKey) -> Option<&Binding> {
        self.global.get(key)
    }

    /// Install a global binding. Non-global bindings are promoted.
    pub fn set_global(&mut self, key: ItemKey, binding: Binding) {
        let binding = if binding.is_global() {
            binding
        } else {
            let mut promoted = Binding::global();
            for (slot, template) in binding.commands() {
                promoted.set_command(slot, template.clone());
            }
            promoted
        };
        self.global.insert(key, binding);
    }

    /// Replace the whole global table.
    pub fn replace_global(&mut self, bindings: BTreeMap<ItemKey, Binding>) {
        self.global.clear();
        for (key, binding) in bindings {
            self.set_global(key, binding);
        }
    }

    fn state_mut(&mut self, actor: &ActorId) -> &mut ActorState {
        self.actors.entry(actor.clone()).or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::UNLIMITED;
    use crate::template::TokenSet;
    use powertool_core::{ItemCatalog, ItemKind};

    fn key(catalog: &ItemCatalog, text: &str) -> ItemKey {
        ItemKey::parse(catalog, text, true).unwrap()
    }

    fn template(text: &str) -> CommandTemplate {
        CommandTemplate::parse(text, &TokenSet::default()).unwrap()
    }

    fn unlimited(_: &ActorId) -> i32 {
        UNLIMITED
    }

    #[test]
    fn nothing_bound_resolves_to_none() {
        let store = BindingStore::new();
        let stone = ItemKey::from_item_snapshot(&ItemCatalog::standard(), ItemKind(1), 0, None, true);
        assert!(store.resolve(&ActorId::new("a"), &stone).is_none());
    }

    #[test]
    fn global_wins_over_owned() {
        let catalog = ItemCatalog::standard();
        let stick = key(&catalog, "stick");
        let alice = ActorId::new("alice");
        let mut store = BindingStore::new();
        store
            .set_command(&alice, &stick, ActionSlot::Primary, template("mine"), &unlimited)
            .unwrap();
        store.set_global(
            stick.clone(),
            Binding::global().with_command(ActionSlot::Primary, template("theirs")),
        );

        let resolved = store.resolve(&alice, &stick).unwrap();
        assert!(resolved.is_global());
        assert_eq!(resolved.command(ActionSlot::Primary).unwrap().text(), "theirs");
    }

    #[test]
    fn set_command_on_global_key_is_denied() {
        let catalog = ItemCatalog::standard();
        let stick = key(&catalog, "stick");
        let alice = ActorId::new("alice");
        let mut store = BindingStore::new();
        store.set_global(
            stick.clone(),
            Binding::global().with_command(ActionSlot::Primary, template("spawn")),
        );

        let err = store
            .set_command(&alice, &stick, ActionSlot::Secondary, template("x"), &unlimited)
            .unwrap_err();
        assert_eq!(err, BindError::GlobalOnly);
        assert_eq!(store.owned_count(&alice), 0);
        assert!(store.resolve_or_create_owned(&alice, &stick).is_err());
    }

    #[test]
    fn clear_command_on_global_key_is_denied() {
        let catalog = ItemCatalog::standard();
        let stick = key(&catalog, "stick");
        let alice = ActorId::new("alice");
        let mut store = BindingStore::new();
        let binding = Binding::global().with_command(ActionSlot::Primary, template("spawn"));
        store.set_global(stick.clone(), binding.clone());

        assert_eq!(
            store.clear_command(&alice, &stick, ActionSlot::Primary),
            Err(BindError::GlobalOnly)
        );
        assert_eq!(store.global(&stick), Some(&binding));
        assert!(!store.remove_owned(&alice, &stick));
    }

    #[test]
    fn clearing_last_slot_removes_binding() {
        let catalog = ItemCatalog::standard();
        let stick = key(&catalog, "stick");
        let alice = ActorId::new("alice");
        let mut store = BindingStore::new();

        assert_eq!(
            store.clear_command(&alice, &stick, ActionSlot::Primary),
            Ok(OwnedChange::Unchanged)
        );

        store
            .set_command(&alice, &stick, ActionSlot::Primary, template("a"), &unlimited)
            .unwrap();
        store
            .set_command(&alice, &stick, ActionSlot::Secondary, template("b"), &unlimited)
            .unwrap();
        assert_eq!(
            store.clear_command(&alice, &stick, ActionSlot::Primary),
            Ok(OwnedChange::Updated)
        );
        assert_eq!(
            store.clear_command(&alice, &stick, ActionSlot::Secondary),
            Ok(OwnedChange::Removed)
        );
        assert!(store.owned(&alice, &stick).is_none());
    }

    #[test]
    fn quota_applies_only_to_new_bindings() {
        let catalog = ItemCatalog::standard();
        let stick = key(&catalog, "stick");
        let bowl = key(&catalog, "bowl");
        let alice = ActorId::new("alice");
        let one = |_: &ActorId| 1;
        let mut store = BindingStore::new();

        store
            .set_command(&alice, &stick, ActionSlot::Primary, template("a"), &one)
            .unwrap();
        // Editing the existing binding is always allowed.
        store
            .set_command(&alice, &stick, ActionSlot::Secondary, template("b"), &one)
            .unwrap();
        assert_eq!(
            store.set_command(&alice, &bowl, ActionSlot::Primary, template("c"), &one),
            Err(BindError::OverLimit { limit: 1 })
        );
        assert_eq!(store.owned_count(&alice), 1);
    }

    #[test]
    fn empty_owned_binding_is_pruned_by_clear() {
        let catalog = ItemCatalog::standard();
        let stick = key(&catalog, "stick");
        let alice = ActorId::new("alice");
        let mut store = BindingStore::new();

        assert!(store.resolve_or_create_owned(&alice, &stick).unwrap().is_empty());
        assert_eq!(store.owned_count(&alice), 1);
        assert_eq!(
            store.clear_command(&alice, &stick, ActionSlot::Primary),
            Ok(OwnedChange::Removed)
        );
        assert_eq!(store.owned_count(&alice), 0);

        // A refused bind never leaves an empty binding behind.
        let none = |_: &ActorId| 0;
        assert!(store
            .set_command(&alice, &stick, ActionSlot::Primary, template("a"), &none)
            .is_err());
        assert!(store.owned(&alice, &stick).is_none());
    }

    #[test]
    fn owned_bindings_are_per_actor() {
        let catalog = ItemCatalog::standard();
        let stick = key(&catalog, "stick");
        let alice = ActorId::new("alice");
        let bob = ActorId::new("bob");
        let mut store = BindingStore::new();
        store
            .set_command(&alice, &stick, ActionSlot::Primary, template("a"), &unlimited)
            .unwrap();
        assert!(store.resolve(&bob, &stick).is_none());
        assert!(!store.clear_all_owned(&bob));
        assert!(store.clear_all_owned(&alice));
        assert!(store.resolve(&alice, &stick).is_none());
    }

    #[test]
    fn enabled_flag_defaults_and_toggles() {
        let alice = ActorId::new("alice");
        let mut store = BindingStore::new();
        assert!(store.is_enabled(&alice));
        assert!(!store.toggle_enabled(&alice));
        assert!(!store.is_enabled(&alice));
        store.set_enabled(&alice, true);
        assert!(store.is_enabled(&alice));
    }

    #[test]
    fn forget_actor_drops_everything() {
        let catalog = ItemCatalog::standard();
        let stick = key(&catalog, "stick");
        let alice = ActorId::new("alice");
        let mut store = BindingStore::new();
        store
            .set_command(&alice, &stick, ActionSlot::Primary, template("a"), &unlimited)
            .unwrap();
        store.set_enabled(&alice, false);

        store.forget_actor(&alice);
        store.forget_actor(&alice);
        assert!(store.is_enabled(&alice));
        assert_eq!(store.owned_count(&alice), 0);
        assert_eq!(store.known_actors().count(), 0);
    }

    #[test]
    fn replace_owned_keeps_enabled_flag() {
        let catalog = ItemCatalog::standard();
        let stick = key(&catalog, "stick");
        let alice = ActorId::new("alice");
        let mut store = BindingStore::new();
        store.set_enabled(&alice, false);
        store.replace_owned(
            &alice,
            BTreeMap::from([(
                stick.clone(),
                Binding::owned().with_command(ActionSlot::Primary, template("a")),
            )]),
        );
        assert!(!store.is_enabled(&alice));
        assert!(store.owned(&alice, &stick).is_some());
    }

    #[test]
    fn set_global_promotes_owned_binding() {
        let catalog = ItemCatalog::standard();
        let stick = key(&catalog, "stick");
        let mut store = BindingStore::new();
        store.set_global(
            stick.clone(),
            Binding::owned().with_command(ActionSlot::Primary, template("a")),
        );
        assert!(store.global(&stick).unwrap().is_global());
    }
}
