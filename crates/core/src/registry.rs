//! Item-kind catalog.
//!
//! The catalog owns the table of known item kinds and the per-kind variant
//! codecs. It is the only way to build an [`ItemKey`](crate::ItemKey), so a
//! key's variant is always normalized against the codec set it was built with.

use crate::item::{ItemKeyError, ItemKind};
use crate::kinds::STANDARD_KINDS;
use crate::variant::{
    normalize_name, VariantCodec, COAL_TYPE, DYE_COLOR, GRASS_SPECIES, SANDSTONE_TYPE,
    TREE_SPECIES,
};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Registry of item kinds and their variant codecs.
#[derive(Debug, Default, Clone)]
pub struct ItemCatalog {
    names: BTreeMap<ItemKind, String>,
    name_to_kind: HashMap<String, ItemKind>,
    codecs: HashMap<ItemKind, Arc<dyn VariantCodec>>,
}

impl ItemCatalog {
    /// An empty catalog. Every parse fails until kinds are registered.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Catalog populated with the built-in kind table and codecs.
    pub fn standard() -> Self {
        let mut catalog = Self::empty();
        for &(id, name) in STANDARD_KINDS {
            // The built-in table is valid by construction; skip rather than panic.
            let _ = catalog.register_kind(ItemKind(id), name);
        }

        let kind = |name: &str| catalog.kind_by_name(name);
        let tree: Vec<ItemKind> = ["wood", "sapling", "log", "leaves"]
            .iter()
            .filter_map(|n| kind(n))
            .collect();
        let dye: Vec<ItemKind> = ["wool", "inksack"].iter().filter_map(|n| kind(n)).collect();
        let sandstone: Vec<ItemKind> = kind("sandstone").into_iter().collect();
        let grass: Vec<ItemKind> = kind("longgrass").into_iter().collect();
        let coal: Vec<ItemKind> = kind("coal").into_iter().collect();

        catalog.register_codec(&tree, Arc::new(TREE_SPECIES));
        catalog.register_codec(&dye, Arc::new(DYE_COLOR));
        catalog.register_codec(&sandstone, Arc::new(SANDSTONE_TYPE));
        catalog.register_codec(&grass, Arc::new(GRASS_SPECIES));
        catalog.register_codec(&coal, Arc::new(COAL_TYPE));
        catalog
    }

    /// Register a kind under `name`.
    ///
    /// The canonical name is the lowercase name with separators removed
    /// (`DIAMOND_PICKAXE` becomes `diamondpickaxe`).
    pub fn register_kind(&mut self, kind: ItemKind, name: &str) -> Result<(), ItemKeyError> {
        let canonical = normalize_name(name);
        validate_kind_name(&canonical)?;
        if let Some(existing) = self.name_to_kind.get(&canonical) {
            if *existing != kind {
                return Err(ItemKeyError::DuplicateKind(canonical));
            }
        }
        self.name_to_kind.insert(canonical.clone(), kind);
        self.names.insert(kind, canonical);
        Ok(())
    }

    /// Attach `codec` to every kind in `kinds`, replacing any previous codec.
    pub fn register_codec(&mut self, kinds: &[ItemKind], codec: Arc<dyn VariantCodec>) {
        for kind in kinds {
            self.codecs.insert(*kind, Arc::clone(&codec));
        }
    }

    /// Resolve a kind token: a numeric id or a name.
    pub fn kind_by_name(&self, token: &str) -> Option<ItemKind> {
        let token = token.trim();
        if let Ok(id) = token.parse::<u16>() {
            let kind = ItemKind(id);
            return self.names.contains_key(&kind).then_some(kind);
        }
        self.name_to_kind.get(&normalize_name(token)).copied()
    }

    /// Canonical name of a registered kind.
    pub fn kind_name(&self, kind: ItemKind) -> Option<&str> {
        self.names.get(&kind).map(String::as_str)
    }

    /// Variant codec for `kind`, if its variant is significant.
    pub fn codec(&self, kind: ItemKind) -> Option<&dyn VariantCodec> {
        self.codecs.get(&kind).map(|c| c.as_ref())
    }

    /// Whether `kind`'s variant distinguishes item identity.
    pub fn is_variant_significant(&self, kind: ItemKind) -> bool {
        self.codecs.contains_key(&kind)
    }

    /// Registered kinds in id order.
    pub fn kinds(&self) -> impl Iterator<Item = (ItemKind, &str)> {
        self.names.iter().map(|(k, n)| (*k, n.as_str()))
    }
}

fn validate_kind_name(name: &str) -> Result<(), ItemKeyError> {
    if name.is_empty() {
        return Err(ItemKeyError::InvalidKindName(name.to_string()));
    }
    if name.len() > 64 {
        return Err(ItemKeyError::InvalidKindName(name.to_string()));
    }
    // Kind names must not collide with the key syntax or look like ids.
    if !name.chars().all(|c| matches!(c, 'a'..='z' | '0'..='9'))
        || name.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ItemKeyError::InvalidKindName(name.to_string()));
    }
    Ok(())
}
