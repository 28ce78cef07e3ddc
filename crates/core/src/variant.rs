//! Variant-name codecs.
//!
//! Some item kinds use their variant sub-value to mean something a player
//! cares about (wool colour, log species). Those kinds get a codec that maps
//! the raw value to a readable name and back. Kinds without a codec ignore the
//! variant entirely.

use std::fmt;

/// Converts between raw variant values and their textual names.
pub trait VariantCodec: fmt::Debug + Send + Sync {
    /// Name of `variant`, if it has one.
    fn name_of(&self, variant: u8) -> Option<&str>;

    /// Decode a variant name.
    fn parse_name(&self, name: &str) -> Option<u8>;
}

/// A codec backed by a dense name table where the index is the raw value.
#[derive(Debug, Clone, Copy)]
pub struct NamedVariants {
    names: &'static [&'static str],
}

impl NamedVariants {
    /// Build a codec from a dense name table.
    pub const fn new(names: &'static [&'static str]) -> Self {
        Self { names }
    }
}

impl VariantCodec for NamedVariants {
    fn name_of(&self, variant: u8) -> Option<&str> {
        self.names.get(variant as usize).copied()
    }

    fn parse_name(&self, name: &str) -> Option<u8> {
        let wanted = normalize_name(name);
        if wanted.is_empty() {
            return None;
        }
        self.names
            .iter()
            .position(|candidate| normalize_name(candidate) == wanted)
            .and_then(|idx| u8::try_from(idx).ok())
    }
}

/// Lowercase and drop separators so `LIGHT_BLUE`, `light-blue` and
/// `lightblue` all compare equal.
pub(crate) fn normalize_name(name: &str) -> String {
    name.trim()
        .chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Wood, sapling, log and leaf species.
pub const TREE_SPECIES: NamedVariants = NamedVariants::new(&["generic", "redwood", "birch", "jungle"]);

/// Wool and dye colours.
pub const DYE_COLOR: NamedVariants = NamedVariants::new(&[
    "white",
    "orange",
    "magenta",
    "light_blue",
    "yellow",
    "lime",
    "pink",
    "gray",
    "silver",
    "cyan",
    "purple",
    "blue",
    "brown",
    "green",
    "red",
    "black",
]);

/// Sandstone carvings.
pub const SANDSTONE_TYPE: NamedVariants = NamedVariants::new(&["cracked", "glyphed", "smooth"]);

/// Tall grass species.
pub const GRASS_SPECIES: NamedVariants = NamedVariants::new(&["dead", "normal", "fern_like"]);

/// Coal vs charcoal.
pub const COAL_TYPE: NamedVariants = NamedVariants::new(&["coal", "charcoal"]);
