#![warn(missing_docs)]
//! Command bindings: templates, scopes, the binding store and its tick gate.
//!
//! The store owns every piece of mutable binding state. Persistence and
//! command execution live with the caller; the store reports what changed
//! so the caller can write it through.

pub mod binding;
pub mod error;
pub mod gate;
pub mod resolve;
pub mod store;
pub mod template;

pub use binding::{Binding, Scope};
pub use error::BindError;
pub use gate::{is_over_limit, QuotaLookup, UNLIMITED};
pub use resolve::{resolve_template, TargetingContext};
pub use store::{ActorState, BindingStore, OwnedChange};
pub use template::{CommandTemplate, TokenSet};
