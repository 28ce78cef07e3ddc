//! Property-based tests for binding precedence, quotas and the tick gate.
//!
//! Validates:
//! - each tick dispatches at most once per actor
//! - global bindings always win and are never mutated by actors
//! - unlimited quotas never refuse

use powertool_bindings::{
    is_over_limit, BindError, Binding, BindingStore, CommandTemplate, TokenSet, UNLIMITED,
};
use powertool_core::{ActionSlot, ActorId, ItemCatalog, ItemKey, ItemKind, SimTick, WorldId, WorldTick};
use proptest::prelude::*;

fn template(text: &str) -> CommandTemplate {
    CommandTemplate::parse(text, &TokenSet::default()).unwrap()
}

fn key_for(kind: u16) -> ItemKey {
    ItemKey::from_item_snapshot(&ItemCatalog::standard(), ItemKind(kind), 0, None, true)
}

proptest! {
    /// Property: replaying a tick sequence, dispatches happen once per distinct run of ticks.
    #[test]
    fn one_dispatch_per_tick(ticks in prop::collection::vec(0u64..5, 1..40)) {
        let actor = ActorId::new("alice");
        let mut store = BindingStore::new();
        let mut dispatched = Vec::new();
        for t in ticks.iter().copied() {
            let tick = WorldTick::new(WorldId::DEFAULT, SimTick(t));
            if store.should_dispatch(&actor, tick) {
                dispatched.push(t);
                store.record_execution(&actor, tick);
            }
            prop_assert!(!store.should_dispatch(&actor, tick));
        }
        let mut expected = ticks.clone();
        expected.dedup();
        prop_assert_eq!(dispatched, expected);
    }

    /// Property: a global binding shadows every actor and rejects their edits.
    #[test]
    fn global_always_wins(
        kind in 1u16..300,
        actors in prop::collection::vec("[a-z]{1,8}", 1..6),
        slot_is_primary in any::<bool>(),
    ) {
        let key = key_for(kind);
        let slot = if slot_is_primary { ActionSlot::Primary } else { ActionSlot::Secondary };
        let unlimited = |_: &ActorId| UNLIMITED;
        let mut store = BindingStore::new();
        for name in &actors {
            let actor = ActorId::new(name.as_str());
            store.set_command(&actor, &key, slot, template("mine"), &unlimited).unwrap();
        }
        let global = Binding::global().with_command(slot, template("theirs"));
        store.set_global(key.clone(), global.clone());

        for name in &actors {
            let actor = ActorId::new(name.as_str());
            prop_assert_eq!(store.resolve(&actor, &key), Some(&global));
            prop_assert_eq!(
                store.set_command(&actor, &key, slot, template("again"), &unlimited),
                Err(BindError::GlobalOnly)
            );
            prop_assert_eq!(store.clear_command(&actor, &key, slot), Err(BindError::GlobalOnly));
        }
        prop_assert_eq!(store.global(&key), Some(&global));
    }

    /// Property: an unlimited quota never refuses, for any count.
    #[test]
    fn unlimited_never_over(count in any::<usize>(), negative in i32::MIN..0) {
        prop_assert!(!is_over_limit(count, UNLIMITED));
        prop_assert!(!is_over_limit(count, negative));
    }
}
