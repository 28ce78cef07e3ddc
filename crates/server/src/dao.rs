//! Binding persistence.

use anyhow::Result;
use powertool_bindings::{Binding, Scope, TokenSet};
use powertool_core::{ItemCatalog, ItemKey};
use std::collections::{BTreeMap, HashMap};

/// What a DAO needs to turn stored text into keys and templates.
#[derive(Debug, Clone, Copy)]
pub struct BindingFormat<'a> {
    /// Item kinds and variant codecs.
    pub catalog: &'a ItemCatalog,
    /// Template tokens, for detecting what each command needs.
    pub tokens: &'a TokenSet,
    /// Whether display names take part in keys.
    pub use_display_names: bool,
}

/// Storage for global and per-actor binding tables.
///
/// Loading is lenient: bad entries and unreadable documents are logged and
/// skipped, never fatal.
pub trait BindingDao {
    /// Every binding stored under `scope`.
    fn load_bindings(
        &self,
        scope: &Scope,
        format: &BindingFormat<'_>,
    ) -> Result<BTreeMap<ItemKey, Binding>>;

    /// Store `binding` under `key`, replacing any alternate spelling of it.
    fn save_binding(
        &mut self,
        scope: &Scope,
        key: &ItemKey,
        binding: &Binding,
        format: &BindingFormat<'_>,
    ) -> Result<()>;

    /// Delete the binding stored under `key`, if any.
    fn remove_binding(&mut self, scope: &Scope, key: &ItemKey, format: &BindingFormat<'_>)
        -> Result<()>;

    /// Delete every binding stored under `scope`.
    fn clear_bindings(&mut self, scope: &Scope) -> Result<()>;
}

/// In-memory DAO for tests and dry runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryBindingDao {
    tables: HashMap<Scope, BTreeMap<ItemKey, Binding>>,
}

impl MemoryBindingDao {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed `scope` with a binding, bypassing the DAO interface.
    pub fn insert(&mut self, scope: Scope, key: ItemKey, binding: Binding) {
        self.tables.entry(scope).or_default().insert(key, binding);
    }

    /// The stored table for `scope`.
    pub fn table(&self, scope: &Scope) -> Option<&BTreeMap<ItemKey, Binding>> {
        self.tables.get(scope)
    }
}

impl BindingDao for MemoryBindingDao {
    fn load_bindings(
        &self,
        scope: &Scope,
        _format: &BindingFormat<'_>,
    ) -> Result<BTreeMap<ItemKey, Binding>> {
        Ok(self.tables.get(scope).cloned().unwrap_or_default())
    }

    fn save_binding(
        &mut self,
        scope: &Scope,
        key: &ItemKey,
        binding: &Binding,
        _format: &BindingFormat<'_>,
    ) -> Result<()> {
        self.insert(scope.clone(), key.clone(), binding.clone());
        Ok(())
    }

    fn remove_binding(
        &mut self,
        scope: &Scope,
        key: &ItemKey,
        _format: &BindingFormat<'_>,
    ) -> Result<()> {
        if let Some(table) = self.tables.get_mut(scope) {
            table.remove(key);
        }
        Ok(())
    }

    fn clear_bindings(&mut self, scope: &Scope) -> Result<()> {
        self.tables.remove(scope);
        Ok(())
    }
}
