//! TOML-backed binding documents.
//!
//! Layout under the data directory:
//!
//! ```text
//! global.toml          # server-wide bindings
//! players/<actor>.toml # one document per actor, name percent-escaped
//! ```
//!
//! Each document maps an item key to its commands:
//!
//! ```toml
//! [stick]
//! left = "heal %p"
//!
//! ["wool:red/Banner of Doom"]
//! right = "tp %x %Y %z"
//! run-as-console = true          # global documents only
//! permissions = ["worldedit.*"]  # or { "worldedit.*" = true }
//! ```

use crate::dao::{BindingDao, BindingFormat};
use anyhow::{Context, Result};
use powertool_bindings::{BindError, Binding, CommandTemplate, Scope};
use powertool_core::{ActionSlot, ItemKey, ItemKeyError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const GLOBAL_FILE: &str = "global.toml";
const PLAYERS_DIR: &str = "players";

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default, rename_all = "kebab-case")]
struct BindingEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    left: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    right: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    run_as_console: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    permissions: Option<Permissions>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(untagged)]
enum Permissions {
    Granted(Vec<String>),
    Explicit(BTreeMap<String, bool>),
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl BindingEntry {
    fn slot(&self, slot: ActionSlot) -> Option<&str> {
        match slot {
            ActionSlot::Primary => self.left.as_deref(),
            ActionSlot::Secondary => self.right.as_deref(),
        }
    }

    fn slot_mut(&mut self, slot: ActionSlot) -> &mut Option<String> {
        match slot {
            ActionSlot::Primary => &mut self.left,
            ActionSlot::Secondary => &mut self.right,
        }
    }

    fn from_binding(binding: &Binding) -> Self {
        let mut entry = Self::default();
        for (slot, template) in binding.commands() {
            *entry.slot_mut(slot) = Some(template.text().to_string());
        }
        if binding.is_global() {
            entry.run_as_console = binding.runs_as_console();
            if !binding.grants().is_empty() {
                entry.permissions = Some(Permissions::Explicit(binding.grants().clone()));
            }
        }
        entry
    }

    fn into_binding(
        self,
        global: bool,
        format: &BindingFormat<'_>,
    ) -> std::result::Result<Binding, BindError> {
        let mut binding = if global {
            Binding::global()
        } else {
            Binding::owned()
        };
        for slot in ActionSlot::ALL {
            let Some(text) = self.slot(slot).filter(|t| !t.trim().is_empty()) else {
                continue;
            };
            binding.set_command(slot, CommandTemplate::parse(text, format.tokens)?);
        }
        let grants = match self.permissions {
            Some(Permissions::Granted(names)) => names.into_iter().map(|n| (n, true)).collect(),
            Some(Permissions::Explicit(map)) => map,
            None => BTreeMap::new(),
        };
        Ok(binding.with_privileges(self.run_as_console, grants))
    }
}

/// Percent-escape every byte outside `[A-Za-z0-9_.-]`, plus a leading dot.
fn escape_file_stem(name: &str) -> String {
    if name.is_empty() {
        return "%".to_string();
    }
    let mut stem = String::with_capacity(name.len());
    for (i, byte) in name.bytes().enumerate() {
        let keep = byte.is_ascii_alphanumeric()
            || byte == b'_'
            || byte == b'-'
            || (byte == b'.' && i > 0);
        if keep {
            stem.push(char::from(byte));
        } else {
            stem.push_str(&format!("%{byte:02X}"));
        }
    }
    stem
}

/// Binding documents stored as TOML files under one directory.
#[derive(Debug, Clone)]
pub struct TomlBindingDao {
    root: PathBuf,
}

impl TomlBindingDao {
    /// Use `root` as the data directory. Nothing is created until a write.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The data directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the document holding `scope`.
    ///
    /// Actor names are escaped so any name maps to its own file.
    pub fn document_path(&self, scope: &Scope) -> PathBuf {
        match scope {
            Scope::Global => self.root.join(GLOBAL_FILE),
            Scope::OwnedBy(actor) => self
                .root
                .join(PLAYERS_DIR)
                .join(format!("{}.toml", escape_file_stem(actor.as_str()))),
        }
    }

    fn read_document(&self, path: &Path) -> Result<toml::Table> {
        match fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("failed to parse {}", path.display())),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(toml::Table::new()),
            Err(err) => Err(err).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    fn write_document(&self, path: &Path, document: &toml::Table) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
        let contents = toml::to_string_pretty(document)?;
        let tmp = path.with_extension("toml.tmp");
        fs::write(&tmp, contents).with_context(|| format!("failed to write {}", tmp.display()))?;
        fs::rename(&tmp, path).with_context(|| format!("failed to replace {}", path.display()))?;
        Ok(())
    }

    /// Drop every entry of `document` whose key names `key`, in any spelling.
    ///
    /// Display names are always part of the comparison, so entries written
    /// for renamed items survive while display names are turned off.
    fn remove_spellings(document: &mut toml::Table, key: &ItemKey, format: &BindingFormat<'_>) {
        let spellings: Vec<String> = document
            .keys()
            .filter(|name| {
                ItemKey::parse(format.catalog, name, true).is_ok_and(|parsed| &parsed == key)
            })
            .cloned()
            .collect();
        for name in spellings {
            document.remove(&name);
        }
    }
}

impl BindingDao for TomlBindingDao {
    fn load_bindings(
        &self,
        scope: &Scope,
        format: &BindingFormat<'_>,
    ) -> Result<BTreeMap<ItemKey, Binding>> {
        let path = self.document_path(scope);
        let document = match self.read_document(&path) {
            Ok(document) => document,
            Err(err) => {
                warn!(file = %path.display(), "{err:#}; treating as empty");
                return Ok(BTreeMap::new());
            }
        };
        let global = matches!(scope, Scope::Global);
        let mut bindings = BTreeMap::new();

        for (name, value) in document {
            if !value.is_table() {
                warn!(file = %path.display(), "{name} must be a mapping node; ignored");
                continue;
            }
            let key = match ItemKey::parse(format.catalog, &name, format.use_display_names) {
                Ok(key) => key,
                Err(err @ (ItemKeyError::UnknownKind(_) | ItemKeyError::UnknownVariant { .. })) => {
                    warn!(file = %path.display(), "Unknown material {name}: {err}; ignored");
                    continue;
                }
                Err(err) => {
                    warn!(file = %path.display(), "Bad item key {name}: {err}; ignored");
                    continue;
                }
            };
            let entry: BindingEntry = match value.try_into() {
                Ok(entry) => entry,
                Err(err) => {
                    warn!(file = %path.display(), "{name} is malformed: {err}; ignored");
                    continue;
                }
            };
            match entry.into_binding(global, format) {
                Ok(binding) if binding.is_empty() => {
                    debug!(file = %path.display(), "{name} has no commands; ignored");
                }
                Ok(binding) => {
                    bindings.insert(key, binding);
                }
                Err(BindError::ConflictingTokens) => {
                    warn!(
                        file = %path.display(),
                        "{name} uses both player and coordinate tokens; ignored"
                    );
                }
                Err(err) => {
                    warn!(file = %path.display(), "{name}: {err}; ignored");
                }
            }
        }

        debug!(%scope, count = bindings.len(), "loaded bindings");
        Ok(bindings)
    }

    fn save_binding(
        &mut self,
        scope: &Scope,
        key: &ItemKey,
        binding: &Binding,
        format: &BindingFormat<'_>,
    ) -> Result<()> {
        let path = self.document_path(scope);
        let mut document = self.read_document(&path)?;
        Self::remove_spellings(&mut document, key, format);
        let entry = toml::Value::try_from(BindingEntry::from_binding(binding))?;
        document.insert(key.to_canonical_string(format.catalog), entry);
        self.write_document(&path, &document)
    }

    fn remove_binding(
        &mut self,
        scope: &Scope,
        key: &ItemKey,
        format: &BindingFormat<'_>,
    ) -> Result<()> {
        let path = self.document_path(scope);
        let mut document = self.read_document(&path)?;
        let before = document.len();
        Self::remove_spellings(&mut document, key, format);
        if document.len() == before {
            return Ok(());
        }
        self.write_document(&path, &document)
    }

    fn clear_bindings(&mut self, scope: &Scope) -> Result<()> {
        let path = self.document_path(scope);
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err).with_context(|| format!("failed to remove {}", path.display())),
        }
    }
}
