//! powertool - bind server commands to held items
//!
//! Headless replay harness: loads configuration and binding documents, then
//! replays a script of host events and sub-commands tick by tick.

mod console;
mod replay;

use anyhow::Result;
use clap::Parser;
use console::ConsoleSink;
use powertool_core::{ItemCatalog, SimTick, WorldId, WorldTick};
use powertool_server::{
    parse_command, ActionContext, HostEvent, PowerToolConfig, PowerTools, TomlBindingDao,
};
use powertool_targeting::TargetCandidate;
use powertool_testkit::{JsonlSink, OutcomeRecord};
use replay::{ReplayPlayer, ReplayStep, StepAction};
use std::{path::PathBuf, sync::Arc};
use tracing::{info, warn};

/// Filter used when `debug = true` and `RUST_LOG` is unset.
const DEBUG_FILTER: &str =
    "warn,powertool=debug,powertool_server=debug,powertool_bindings=debug,powertool_targeting=debug";

#[derive(Parser, Debug)]
#[command(author, version, about = "Replay power tool interactions headlessly", long_about = None)]
struct Args {
    /// Engine configuration (TOML)
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,
    /// Directory holding global.toml and players/
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
    /// Replay script (JSON)
    #[arg(long)]
    script: PathBuf,
    /// Write one JSON line per handled action
    #[arg(long)]
    log: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Read before the subscriber exists so `debug = true` can pick the filter.
    let (config, config_problems) = PowerToolConfig::read_from_path(&args.config);
    let default_filter = if config.debug { DEBUG_FILTER } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_filter)),
        )
        .init();
    for problem in config_problems {
        warn!("{problem}");
    }

    info!("Starting powertool v{}", env!("CARGO_PKG_VERSION"));

    let mut replay = ReplayPlayer::from_path(&args.script)?;
    let dao = TomlBindingDao::new(&args.data_dir);
    let mut tools = PowerTools::new(config, Arc::new(ItemCatalog::standard()), dao)?
        .with_config_path(&args.config);
    info!(data_dir = %tools.dao().root().display(), "bindings loaded");
    for actor in replay.actors() {
        if let Err(err) = tools.actor_connected(actor.name.clone(), actor.groups.clone()) {
            warn!(actor = %actor.name, "failed to connect: {err:#}");
        }
    }

    let mut log = args.log.as_deref().map(JsonlSink::create).transpose()?;
    let mut sink = ConsoleSink::new(replay.sink_rules().clone());
    let last = replay.last_tick().unwrap_or(SimTick::ZERO);

    let mut now = SimTick::ZERO;
    while !replay.is_finished() || tools.reload_pending() {
        tools.tick(now);
        for step in replay.drain_ready(now) {
            run_step(&mut tools, &replay, &step, &mut sink, log.as_mut())?;
        }
        now = now.advance(1);
    }

    info!(ticks = last.0, dispatched = sink.transcript.len(), "replay finished");
    Ok(())
}

fn event_kind(event: &HostEvent) -> &'static str {
    match event {
        HostEvent::Interact { .. } => "interact",
        HostEvent::MeleeHit { .. } => "melee-hit",
        HostEvent::InteractActor { .. } => "interact-actor",
    }
}

fn run_step(
    tools: &mut PowerTools<TomlBindingDao>,
    replay: &ReplayPlayer,
    step: &ReplayStep,
    sink: &mut ConsoleSink,
    log: Option<&mut JsonlSink>,
) -> Result<()> {
    let prefix = format!("[{}] {}", step.tick.0, step.actor);
    match &step.action {
        StepAction::Command(line) => {
            let lines = match parse_command(line, tools.config()) {
                Ok(cmd) => tools.execute_command(&step.actor, &step.item, cmd).lines,
                Err(err) => vec![format!("Error: {err}")],
            };
            for line in lines {
                println!("{prefix}: {line}");
            }
        }
        StepAction::Select => {
            for line in tools.describe_held_item(&step.actor, &step.item) {
                println!("{prefix}: {line}");
            }
        }
        StepAction::Event(event) => {
            let Some(me) = replay.actors().iter().find(|a| a.name == step.actor) else {
                return Ok(());
            };
            let ctx = ActionContext {
                actor: step.actor.clone(),
                item: step.item.clone(),
                view_origin: me.eye(),
                view_direction: step.look,
                candidates: replay
                    .actors()
                    .iter()
                    .map(|a| TargetCandidate::standing(a.name.clone(), a.position.into()))
                    .collect(),
                tick: WorldTick::new(WorldId::DEFAULT, step.tick),
            };
            let kind = event_kind(event);
            let notification = event.clone().into_notification(ctx);
            let outcome = tools.handle_action(&notification, replay.world(), sink);
            println!(
                "{prefix}: {kind} -> {outcome:?} (cancel: {})",
                outcome.cancels_event()
            );
            if let Some(log) = log {
                log.write(&OutcomeRecord {
                    tick: step.tick,
                    actor: step.actor.as_str(),
                    kind,
                    outcome: &outcome,
                })?;
            }
        }
    }
    Ok(())
}
