#![warn(missing_docs)]
//! Deterministic testing surfaces (voxel world, recording sink, outcome log).

mod sink;
mod world;

use anyhow::Result;
use powertool_core::SimTick;
use powertool_server::Outcome;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

pub use sink::*;
pub use world::*;

/// One handled action, as captured by headless runs.
#[derive(Debug, Serialize)]
pub struct OutcomeRecord<'a> {
    /// Simulation tick when the action happened.
    pub tick: SimTick,
    /// Acting actor.
    pub actor: &'a str,
    /// Event label (e.g. "interact", "melee-hit").
    pub kind: &'a str,
    /// What the engine did.
    pub outcome: &'a Outcome,
}

/// A sink that writes newline-delimited JSON to disk.
pub struct JsonlSink {
    file: File,
}

impl JsonlSink {
    /// Create a new sink at `path`, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(path)?;
        Ok(Self { file })
    }

    /// Append a record to the log.
    pub fn write<T: Serialize>(&mut self, record: &T) -> Result<()> {
        let line = serde_json::to_string(record)?;
        self.file.write_all(line.as_bytes())?;
        self.file.write_all(b"\n")?;
        Ok(())
    }
}
