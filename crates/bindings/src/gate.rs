//! Once-per-tick dispatch gate and binding quotas.

use crate::store::BindingStore;
use powertool_core::{ActorId, WorldTick};

/// Quota value meaning "no limit".
pub const UNLIMITED: i32 = -1;

/// Source of per-actor binding quotas.
pub trait QuotaLookup {
    /// Limit of the most specific group `actor` belongs to, or the default.
    /// Negative values mean unlimited.
    fn limit_for(&self, actor: &ActorId) -> i32;
}

impl<F> QuotaLookup for F
where
    F: Fn(&ActorId) -> i32,
{
    fn limit_for(&self, actor: &ActorId) -> i32 {
        self(actor)
    }
}

/// Whether an actor holding `owned_count` bindings may not create another.
pub fn is_over_limit(owned_count: usize, limit: i32) -> bool {
    match usize::try_from(limit) {
        Ok(limit) => owned_count >= limit,
        Err(_) => false,
    }
}

impl BindingStore {
    /// True unless the actor already dispatched during `tick`.
    pub fn should_dispatch(&self, actor: &ActorId, tick: WorldTick) -> bool {
        self.actors
            .get(actor)
            .and_then(|state| state.last_execution_tick)
            .map_or(true, |last| last != tick)
    }

    /// Mark `tick` as used by `actor`.
    pub fn record_execution(&mut self, actor: &ActorId, tick: WorldTick) {
        self.actors
            .entry(actor.clone())
            .or_default()
            .last_execution_tick = Some(tick);
    }

    /// Whether `actor` has used up their quota of owned bindings.
    pub fn is_over_limit(&self, actor: &ActorId, quota: &impl QuotaLookup) -> bool {
        is_over_limit(self.owned_count(actor), quota.limit_for(actor))
    }
}
