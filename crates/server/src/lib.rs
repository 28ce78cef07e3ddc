#![warn(missing_docs)]
//! Power tool engine: binds server commands to held items and runs them
//! when the item is clicked, at most once per actor per tick.

pub mod commands;
pub mod config;
pub mod dao;
pub mod engine;
pub mod event;
pub mod host;
pub mod toml_dao;

pub use commands::{parse_command, CommandError, CommandOutput, PowerToolCommand};
pub use config::{GroupLimit, HitTestKind, LimitsConfig, PowerToolConfig, MAX_TRACE_DISTANCE};
pub use dao::{BindingDao, BindingFormat, MemoryBindingDao};
pub use engine::PowerTools;
pub use event::{
    ActionContext, ActionNotification, ActorTarget, HeldItem, HostEvent, Outcome, SuppressReason,
};
pub use host::{CommandSink, ExecutionError, WorldView};
pub use toml_dao::TomlBindingDao;
