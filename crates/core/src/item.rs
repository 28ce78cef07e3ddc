//! Bindable item identity.

use crate::registry::ItemCatalog;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use thiserror::Error;

/// Numeric item kind identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemKind(pub u16);

impl ItemKind {
    /// The empty hand.
    pub const AIR: Self = Self(0);

    /// Whether this is the empty hand.
    pub fn is_air(self) -> bool {
        self == Self::AIR
    }
}

/// Errors produced while parsing item keys or registering kinds.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ItemKeyError {
    /// Input was empty.
    #[error("item key cannot be empty")]
    Empty,
    /// The kind token does not name a registered kind.
    #[error("unknown item kind '{0}'")]
    UnknownKind(String),
    /// The variant suffix could not be decoded by the kind's codec.
    #[error("unknown variant '{variant}' for item kind '{kind}'")]
    UnknownVariant {
        /// Kind token as written.
        kind: String,
        /// Variant token as written.
        variant: String,
    },
    /// A kind name that cannot be registered.
    #[error("invalid item kind name '{0}'")]
    InvalidKindName(String),
    /// A kind name already registered to a different id.
    #[error("item kind name '{0}' is already registered")]
    DuplicateKind(String),
}

/// Canonical identity of a bindable item.
///
/// Keys compare by kind, then variant, then display name (`None` first).
/// Kinds without a variant codec always carry variant `0`, so their variant
/// never takes part in equality, hashing or ordering.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemKey {
    kind: ItemKind,
    variant: u8,
    display_name: Option<String>,
}

impl ItemKey {
    /// Build the key for a held item.
    ///
    /// When `use_display_names` is false the display name is dropped.
    pub fn from_item_snapshot(
        catalog: &ItemCatalog,
        kind: ItemKind,
        variant: u8,
        display_name: Option<&str>,
        use_display_names: bool,
    ) -> Self {
        let display_name = if use_display_names {
            display_name.filter(|n| !n.is_empty()).map(str::to_string)
        } else {
            None
        };
        Self::normalized(catalog, kind, variant, display_name)
    }

    /// Parse `<kind>[:<variant>][/<display name>]`.
    ///
    /// The kind may be a name or a numeric id. A variant suffix on a kind
    /// without a codec is ignored. The display-name suffix is ignored when
    /// `use_display_names` is false.
    pub fn parse(
        catalog: &ItemCatalog,
        text: &str,
        use_display_names: bool,
    ) -> Result<Self, ItemKeyError> {
        let (item, display_name) = match text.split_once('/') {
            Some((item, name)) => (item, Some(name)),
            None => (text, None),
        };
        let item = item.trim();
        if item.is_empty() {
            return Err(ItemKeyError::Empty);
        }

        let (kind_token, variant_token) = match item.split_once(':') {
            Some((k, v)) => (k.trim(), Some(v.trim())),
            None => (item, None),
        };
        let kind = catalog
            .kind_by_name(kind_token)
            .ok_or_else(|| ItemKeyError::UnknownKind(kind_token.to_string()))?;

        let mut variant = 0;
        if let (Some(token), Some(codec)) = (variant_token, catalog.codec(kind)) {
            variant = codec
                .parse_name(token)
                .or_else(|| token.parse::<u8>().ok())
                .ok_or_else(|| ItemKeyError::UnknownVariant {
                    kind: kind_token.to_string(),
                    variant: token.to_string(),
                })?;
        }

        let display_name = if use_display_names {
            display_name.filter(|n| !n.is_empty()).map(str::to_string)
        } else {
            None
        };
        Ok(Self::normalized(catalog, kind, variant, display_name))
    }

    fn normalized(
        catalog: &ItemCatalog,
        kind: ItemKind,
        variant: u8,
        display_name: Option<String>,
    ) -> Self {
        let variant = if catalog.is_variant_significant(kind) {
            variant
        } else {
            0
        };
        Self {
            kind,
            variant,
            display_name,
        }
    }

    /// Item kind.
    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Variant sub-value (always `0` for kinds whose variant is not significant).
    pub fn variant(&self) -> u8 {
        self.variant
    }

    /// Display-name discriminator.
    pub fn display_name(&self) -> Option<&str> {
        self.display_name.as_deref()
    }

    /// Render the canonical textual form understood by [`ItemKey::parse`].
    ///
    /// Unregistered kinds render as their numeric id. Variant `0` is never
    /// written; values without a codec name are written numerically.
    pub fn to_canonical_string(&self, catalog: &ItemCatalog) -> String {
        let mut out = match catalog.kind_name(self.kind) {
            Some(name) => name.to_string(),
            None => self.kind.0.to_string(),
        };
        if self.variant != 0 {
            if let Some(codec) = catalog.codec(self.kind) {
                let name = codec
                    .name_of(self.variant)
                    .map(Cow::Borrowed)
                    .unwrap_or_else(|| Cow::Owned(self.variant.to_string()));
                out.push(':');
                out.push_str(&name);
            }
        }
        if let Some(display_name) = &self.display_name {
            out.push('/');
            out.push_str(display_name);
        }
        out
    }
}
