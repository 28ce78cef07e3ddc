//! Command templates and the placeholder tokens they may contain.

use crate::error::BindError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder strings recognised in command templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenSet {
    /// Replaced by the targeted actor's name.
    pub actor: String,
    /// Replaced by the targeted block's X coordinate.
    pub x: String,
    /// Replaced by the targeted block's Y coordinate.
    pub y: String,
    /// Replaced by the targeted block's Z coordinate.
    pub z: String,
    /// Replaced by the first open Y above the targeted block.
    pub air_y: String,
}

impl Default for TokenSet {
    fn default() -> Self {
        Self {
            actor: "%p".to_string(),
            x: "%x".to_string(),
            y: "%y".to_string(),
            z: "%z".to_string(),
            air_y: "%Y".to_string(),
        }
    }
}

fn mentions(text: &str, token: &str) -> bool {
    !token.is_empty() && text.contains(token)
}

/// A stored command with the targeting it needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandTemplate {
    text: String,
    wants_actor_token: bool,
    wants_location_token: bool,
    wants_air_token: bool,
}

impl CommandTemplate {
    /// Build a template from explicit flags.
    pub fn new(
        text: impl Into<String>,
        wants_actor_token: bool,
        wants_location_token: bool,
        wants_air_token: bool,
    ) -> Result<Self, BindError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(BindError::EmptyCommand);
        }
        if wants_actor_token && wants_location_token {
            return Err(BindError::ConflictingTokens);
        }
        if wants_air_token && !wants_location_token {
            return Err(BindError::AirWithoutLocation);
        }
        Ok(Self {
            text,
            wants_actor_token,
            wants_location_token,
            wants_air_token,
        })
    }

    /// Build a template by scanning `text` for `tokens`.
    ///
    /// Any coordinate token asks for a location; the air token asks for a
    /// location plus the upward scan.
    pub fn parse(text: impl Into<String>, tokens: &TokenSet) -> Result<Self, BindError> {
        let text = text.into();
        let wants_actor = mentions(&text, &tokens.actor);
        let wants_air = mentions(&text, &tokens.air_y);
        let wants_location = wants_air
            || mentions(&text, &tokens.x)
            || mentions(&text, &tokens.y)
            || mentions(&text, &tokens.z);
        Self::new(text, wants_actor, wants_location, wants_air)
    }

    /// The raw template text, without a leading slash.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the actor token must be filled.
    pub fn wants_actor_token(&self) -> bool {
        self.wants_actor_token
    }

    /// Whether coordinate tokens must be filled.
    pub fn wants_location_token(&self) -> bool {
        self.wants_location_token
    }

    /// Whether the air-height token must be filled.
    pub fn wants_air_token(&self) -> bool {
        self.wants_air_token
    }
}

impl fmt::Display for CommandTemplate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}
