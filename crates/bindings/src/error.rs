//! Binding errors.

use thiserror::Error;

/// Why a bind, clear or template construction was refused.
///
/// All of these are user-facing denials rather than faults.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// The item is bound globally; owned bindings cannot shadow or edit it.
    #[error("cannot modify a global power tool")]
    GlobalOnly,
    /// The bound command would invoke the binding command itself.
    #[error("recursion not allowed: '{0}' is the power tool command")]
    RecursiveCommand(String),
    /// The template asks for both an actor and a location.
    #[error("cannot use player and coordinate tokens simultaneously")]
    ConflictingTokens,
    /// Creating another owned binding would exceed the actor's quota.
    #[error("power tool limit of {limit} reached")]
    OverLimit {
        /// The quota that applied.
        limit: i32,
    },
    /// No command text was given.
    #[error("command cannot be empty")]
    EmptyCommand,
    /// Bound commands must be written with their leading slash.
    #[error("bound command must begin with a slash")]
    MissingLeadingSlash,
    /// An air-height token without a location to scan from.
    #[error("air token requires a location")]
    AirWithoutLocation,
}
