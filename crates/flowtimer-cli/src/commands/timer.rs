//! Timer control commands.
//!
//! The engine lives in the kv table between invocations. On load, wall
//! time elapsed since the last save is converted into catch-up ticks so a
//! detached countdown keeps advancing - one tick per elapsed second,
//! preserving the engine's one-decrement-per-tick contract. `watch`
//! attaches a live 1 Hz driver; Ctrl-C while watching is a manual stop.

use std::io::Write as _;

use chrono::{DateTime, Utc};
use clap::Subcommand;
use flowtimer_core::storage::{Config, Database};
use flowtimer_core::{
    AudioSink, EffectRouter, Event, FlowEngine, NotificationSink, Phase, SinkError, Ticker,
};
use serde::{Deserialize, Serialize};

use crate::common::{format_secs, resolve_preset, resolve_task};

const ENGINE_KEY: &str = "flow_engine";

#[derive(Subcommand)]
pub enum TimerAction {
    /// Start a preset's flow (or resume when paused)
    Start {
        /// Preset id or name; falls back to config `default_preset`
        preset: Option<String>,
        /// Task id or name to attribute the run to
        #[arg(long)]
        task: Option<String>,
    },
    /// Pause the countdown
    Pause,
    /// Resume a paused countdown
    Resume,
    /// Stop early; elapsed time is attributed to the selected task
    Stop,
    /// Return to idle (rejected while running)
    Reset,
    /// Print current timer state as JSON
    Status,
    /// Drive the countdown live until it finishes (Ctrl-C stops)
    Watch,
}

/// Prints the completion notification to the terminal.
struct TerminalNotifier;

impl NotificationSink for TerminalNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<(), SinkError> {
        println!("[{title}] {body}");
        Ok(())
    }
}

/// ASCII BEL as the completion sound.
struct TerminalBell;

impl AudioSink for TerminalBell {
    fn play_completion(&self) -> Result<(), SinkError> {
        print!("\x07");
        std::io::stdout()
            .flush()
            .map_err(|e| SinkError::new(e.to_string()))
    }
}

/// Engine plus the wall-clock instant it was persisted, for catch-up.
#[derive(Serialize, Deserialize)]
struct StoredEngine {
    engine: FlowEngine,
    saved_at: DateTime<Utc>,
}

fn load_engine(db: &Database, config: &Config) -> (FlowEngine, Vec<Event>) {
    let stored = db
        .kv_get(ENGINE_KEY)
        .ok()
        .flatten()
        .and_then(|json| serde_json::from_str::<StoredEngine>(&json).ok());

    let Some(StoredEngine {
        mut engine,
        saved_at,
    }) = stored
    else {
        return (FlowEngine::new(), Vec::new());
    };

    let mut events = Vec::new();
    if engine.phase() == Phase::Running && config.catch_up_ticks {
        let pending = (Utc::now() - saved_at).num_seconds().max(0) as u64;
        for _ in 0..pending {
            match engine.tick() {
                Some(event) => {
                    events.push(event);
                    break;
                }
                None => {}
            }
        }
    }
    (engine, events)
}

fn save_engine(db: &Database, engine: &FlowEngine) -> Result<(), Box<dyn std::error::Error>> {
    let stored = StoredEngine {
        engine: engine.clone(),
        saved_at: Utc::now(),
    };
    db.kv_set(ENGINE_KEY, &serde_json::to_string(&stored)?)?;
    Ok(())
}

fn print_event(event: &Event) -> Result<(), Box<dyn std::error::Error>> {
    println!("{}", serde_json::to_string_pretty(event)?);
    Ok(())
}

pub fn run(action: TimerAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;
    let config = Config::load_or_default();

    let notifier = TerminalNotifier;
    let bell = TerminalBell;
    let mut router = EffectRouter::new(config.attribution.policy).with_task_store(&db);
    if config.notifications.enabled {
        router = router.with_notifier(&notifier);
    }
    if config.notifications.sound {
        router = router.with_audio(&bell);
    }

    let (mut engine, caught_up) = load_engine(&db, &config);
    for event in &caught_up {
        router.handle(event);
        print_event(event)?;
    }

    match action {
        TimerAction::Start { preset, task } => {
            if engine.phase() == Phase::Paused {
                if let Some(event) = engine.resume() {
                    print_event(&event)?;
                }
            } else {
                let key = preset
                    .or_else(|| config.default_preset.clone())
                    .ok_or("no preset given and no default_preset configured")?;
                let preset = resolve_preset(&db, &key)?;
                let task_id = match task {
                    Some(task) => Some(resolve_task(&db, &task)?.id),
                    None => None,
                };
                let event = engine.start(&preset.flow, task_id)?;
                print_event(&event)?;
            }
        }
        TimerAction::Pause => match engine.pause() {
            Some(event) => print_event(&event)?,
            None => println!("Timer is not running."),
        },
        TimerAction::Resume => match engine.resume() {
            Some(event) => print_event(&event)?,
            None => println!("Timer is not paused."),
        },
        TimerAction::Stop => match engine.stop() {
            Some(event) => {
                router.handle(&event);
                print_event(&event)?;
            }
            None => println!("Timer is already idle."),
        },
        TimerAction::Reset => match engine.reset()? {
            Some(event) => {
                router.handle(&event);
                print_event(&event)?;
            }
            None => println!("Timer is already idle."),
        },
        TimerAction::Status => {
            print_event(&engine.snapshot())?;
        }
        TimerAction::Watch => {
            match engine.phase() {
                Phase::Idle => return Err("timer is not running; start a preset first".into()),
                Phase::Paused => return Err("timer is paused; resume it first".into()),
                Phase::Running => {}
            }
            watch(&mut engine, &router)?;
        }
    }

    save_engine(&db, &engine)?;
    Ok(())
}

/// Drive the engine at 1 Hz until completion or Ctrl-C.
///
/// The ticker exists only inside this loop; leaving Running drops it, so
/// no tick can be delivered after a stop.
fn watch(engine: &mut FlowEngine, router: &EffectRouter<'_>) -> Result<(), Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async {
        let mut ticker = Ticker::one_second();
        loop {
            tokio::select! {
                _ = ticker.next() => {
                    match engine.tick() {
                        Some(event) => {
                            println!();
                            router.handle(&event);
                            print_event(&event)?;
                            return Ok(());
                        }
                        None => {
                            print!("\r{}  ", format_secs(engine.remaining_secs()));
                            std::io::stdout().flush().ok();
                        }
                    }
                }
                _ = tokio::signal::ctrl_c() => {
                    println!();
                    if let Some(event) = engine.stop() {
                        router.handle(&event);
                        print_event(&event)?;
                    }
                    return Ok(());
                }
            }
        }
    })
}
