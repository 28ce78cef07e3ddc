use anyhow::{bail, Context, Result};
use glam::{IVec3, Vec3};
use powertool_core::{ActorId, SimTick};
use powertool_server::{HeldItem, HostEvent};
use powertool_testkit::VoxelWorld;
use serde::Deserialize;
use std::collections::{BTreeSet, VecDeque};
use std::{fs, path::Path};

/// Eye height above an actor's feet.
const EYE_HEIGHT: f32 = 1.62;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ReplayFile {
    #[serde(default)]
    world: WorldDef,
    actors: Vec<ActorDef>,
    #[serde(default)]
    sink: SinkRules,
    steps: Vec<ReplayStepDef>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct WorldDef {
    /// Height of a flat floor, if any.
    floor_y: Option<i32>,
    #[serde(default = "default_floor_radius")]
    floor_radius: i32,
    #[serde(default)]
    solid: Vec<[i32; 3]>,
}

fn default_floor_radius() -> i32 {
    32
}

/// Host command rules applied by the console sink.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SinkRules {
    /// Registered command names; empty accepts every command.
    #[serde(default)]
    pub known: BTreeSet<String>,
    /// Commands that need console privileges or a matching grant.
    #[serde(default)]
    pub restricted: BTreeSet<String>,
}

/// An actor present for the whole replay.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ActorDef {
    /// Account name.
    pub name: ActorId,
    /// Permission groups, most specific first.
    #[serde(default)]
    pub groups: Vec<String>,
    /// Feet position.
    pub position: [f32; 3],
}

impl ActorDef {
    /// Eye position used as the view origin.
    pub fn eye(&self) -> Vec3 {
        Vec3::from_array(self.position) + Vec3::Y * EYE_HEIGHT
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct ReplayStepDef {
    tick: u64,
    actor: ActorId,
    #[serde(default)]
    item: Option<HeldItem>,
    #[serde(default)]
    look: Option<[f32; 3]>,
    #[serde(default)]
    command: Option<String>,
    #[serde(default)]
    event: Option<HostEvent>,
}

/// What one step does.
#[derive(Debug, Clone, PartialEq)]
pub enum StepAction {
    /// Run a `/powertool` line.
    Command(String),
    /// Feed a host event to the engine.
    Event(HostEvent),
    /// Switch the held item and show its description.
    Select,
}

/// One scheduled step.
#[derive(Debug, Clone, PartialEq)]
pub struct ReplayStep {
    /// Tick the step fires on.
    pub tick: SimTick,
    /// Acting actor.
    pub actor: ActorId,
    /// Item in hand; empty when omitted.
    pub item: HeldItem,
    /// Look direction.
    pub look: Vec3,
    /// What happens.
    pub action: StepAction,
}

/// Deterministic replay of host events and sub-commands.
///
/// Scripts are a JSON list of `{tick, actor, ...}` steps, executed in file order.
#[derive(Debug)]
pub struct ReplayPlayer {
    world: VoxelWorld,
    actors: Vec<ActorDef>,
    sink: SinkRules,
    pending: VecDeque<ReplayStep>,
}

impl ReplayPlayer {
    /// Load a replay script from a JSON file on disk.
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read replay script {}", path.display()))?;
        Self::from_str(&contents)
    }

    /// Load a replay script from an in-memory JSON string.
    pub fn from_str(contents: &str) -> Result<Self> {
        let file: ReplayFile = serde_json::from_str(contents)?;
        if file.steps.is_empty() {
            bail!("replay script contains no steps");
        }

        let mut world = match file.world.floor_y {
            Some(y) => VoxelWorld::flat(y, file.world.floor_radius),
            None => VoxelWorld::new(),
        };
        for cell in &file.world.solid {
            world.set_solid(IVec3::from_array(*cell));
        }

        let mut pending = VecDeque::with_capacity(file.steps.len());
        let mut last_tick: Option<u64> = None;
        for step in file.steps {
            if !file.actors.iter().any(|a| a.name == step.actor) {
                bail!("replay step at tick {} names unknown actor {}", step.tick, step.actor);
            }
            if let Some(prev) = last_tick {
                if step.tick < prev {
                    bail!("replay steps must be sorted by tick");
                }
            }
            last_tick = Some(step.tick);

            let action = match (step.command, step.event) {
                (Some(_), Some(_)) => {
                    bail!("replay step at tick {} has both a command and an event", step.tick)
                }
                (Some(command), None) => {
                    let command = command.trim().to_string();
                    if command.is_empty() {
                        bail!("replay script contains an empty command");
                    }
                    StepAction::Command(command)
                }
                (None, Some(event)) => StepAction::Event(event),
                (None, None) => StepAction::Select,
            };
            let look = step
                .look
                .map(Vec3::from_array)
                .and_then(Vec3::try_normalize)
                .unwrap_or(Vec3::X);

            pending.push_back(ReplayStep {
                tick: SimTick(step.tick),
                actor: step.actor,
                item: step.item.unwrap_or_else(HeldItem::empty),
                look,
                action,
            });
        }

        Ok(Self {
            world,
            actors: file.actors,
            sink: file.sink,
            pending,
        })
    }

    /// The replay's world.
    pub fn world(&self) -> &VoxelWorld {
        &self.world
    }

    /// Actors present for the whole replay.
    pub fn actors(&self) -> &[ActorDef] {
        &self.actors
    }

    /// Command rules for the console sink.
    pub fn sink_rules(&self) -> &SinkRules {
        &self.sink
    }

    /// Tick of the last scheduled step.
    pub fn last_tick(&self) -> Option<SimTick> {
        self.pending.back().map(|step| step.tick)
    }

    /// Drain and return all steps scheduled for ticks `<= tick`.
    pub fn drain_ready(&mut self, tick: SimTick) -> Vec<ReplayStep> {
        let mut steps = Vec::new();
        while self.pending.front().is_some_and(|step| step.tick <= tick) {
            if let Some(step) = self.pending.pop_front() {
                steps.push(step);
            }
        }
        steps
    }

    pub fn is_finished(&self) -> bool {
        self.pending.is_empty()
    }
}
