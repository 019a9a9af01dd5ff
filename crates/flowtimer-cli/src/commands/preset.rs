//! Preset management and flow editing commands.
//!
//! Flow edits are addressed by dotted index paths: `1` is the second
//! top-level step, `1.0` is the first child of the loop at index 1. For the
//! add commands the last path segment is the insertion position; without
//! `--at` the step is appended at the top level.

use clap::Subcommand;
use flowtimer_core::storage::Database;
use flowtimer_core::{NotifyKind, Preset, Step};

use crate::common::{format_secs, parse_notify_kind, parse_path, resolve_preset};

#[derive(Subcommand)]
pub enum PresetAction {
    /// Create a new empty preset
    Create {
        /// Preset name
        name: String,
    },
    /// List presets
    List {
        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show a preset's flow tree and total duration
    Show {
        /// Preset id or name
        preset: String,
    },
    /// Rename a preset
    Rename {
        /// Preset id or name
        preset: String,
        /// New name
        name: String,
    },
    /// Delete a preset
    Delete {
        /// Preset id or name
        preset: String,
    },
    /// Append or insert a timer step
    AddTimer {
        /// Preset id or name
        preset: String,
        /// Duration in minutes
        minutes: u64,
        /// Insertion path (last segment is the position)
        #[arg(long)]
        at: Option<String>,
    },
    /// Append or insert a loop step
    AddLoop {
        /// Preset id or name
        preset: String,
        /// Repeat count
        count: u64,
        /// Insertion path (last segment is the position)
        #[arg(long)]
        at: Option<String>,
    },
    /// Append or insert a notification marker
    AddNotify {
        /// Preset id or name
        preset: String,
        /// Notification kind: sound, alert, or none
        #[arg(long, default_value = "sound")]
        kind: String,
        /// Insertion path (last segment is the position)
        #[arg(long)]
        at: Option<String>,
    },
    /// Remove the step at a path
    Remove {
        /// Preset id or name
        preset: String,
        /// Path of the step to remove
        path: String,
    },
    /// Move a step within its containing sequence
    Move {
        /// Preset id or name
        preset: String,
        /// Path of the step to move
        path: String,
        /// New position within the same sequence
        to: usize,
    },
}

pub fn run(action: PresetAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        PresetAction::Create { name } => {
            let preset = Preset::new(name);
            db.create_preset(&preset)?;
            println!("Preset created: {}", preset.id);
            println!("{}", serde_json::to_string_pretty(&preset)?);
        }
        PresetAction::List { json } => {
            let presets = db.list_presets()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&presets)?);
            } else {
                for preset in presets {
                    println!(
                        "{}  {}  ({})",
                        preset.id,
                        preset.name,
                        format_secs(preset.flow.total_secs())
                    );
                }
            }
        }
        PresetAction::Show { preset } => {
            let preset = resolve_preset(&db, &preset)?;
            println!("{} ({})", preset.name, preset.id);
            let mut out = String::new();
            render_steps(preset.flow.steps(), 1, &mut out);
            print!("{out}");
            println!("Total: {}", format_secs(preset.flow.total_secs()));
        }
        PresetAction::Rename { preset, name } => {
            let mut preset = resolve_preset(&db, &preset)?;
            preset.name = name;
            db.update_preset(&preset)?;
            println!("Preset renamed: {}", preset.id);
        }
        PresetAction::Delete { preset } => {
            let preset = resolve_preset(&db, &preset)?;
            db.delete_preset(&preset.id)?;
            println!("Preset deleted: {}", preset.id);
        }
        PresetAction::AddTimer {
            preset,
            minutes,
            at,
        } => {
            edit(&db, &preset, at, Step::Timer { minutes })?;
        }
        PresetAction::AddLoop { preset, count, at } => {
            edit(
                &db,
                &preset,
                at,
                Step::Loop {
                    count,
                    children: Vec::new(),
                },
            )?;
        }
        PresetAction::AddNotify { preset, kind, at } => {
            let kind = parse_notify_kind(&kind)?;
            edit(&db, &preset, at, Step::Notification { kind })?;
        }
        PresetAction::Remove { preset, path } => {
            let mut preset = resolve_preset(&db, &preset)?;
            preset.flow = preset.flow.with_removed(&parse_path(&path)?)?;
            db.update_preset(&preset)?;
            show_total(&preset);
        }
        PresetAction::Move { preset, path, to } => {
            let mut preset = resolve_preset(&db, &preset)?;
            preset.flow = preset.flow.with_moved(&parse_path(&path)?, to)?;
            db.update_preset(&preset)?;
            show_total(&preset);
        }
    }

    Ok(())
}

/// Insert `step` at `--at`, or append at the top level.
fn edit(
    db: &Database,
    preset_key: &str,
    at: Option<String>,
    step: Step,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut preset = resolve_preset(db, preset_key)?;
    let path = match at {
        Some(at) => parse_path(&at)?,
        None => vec![preset.flow.len()],
    };
    preset.flow = preset.flow.with_inserted(&path, step)?;
    db.update_preset(&preset)?;
    show_total(&preset);
    Ok(())
}

fn show_total(preset: &Preset) {
    println!(
        "Flow updated: {} steps, total {}",
        preset.flow.len(),
        format_secs(preset.flow.total_secs())
    );
}

fn render_steps(steps: &[Step], depth: usize, out: &mut String) {
    for (index, step) in steps.iter().enumerate() {
        let pad = "  ".repeat(depth);
        match step {
            Step::Timer { minutes } => {
                out.push_str(&format!("{pad}[{index}] timer {minutes} min\n"));
            }
            Step::Notification { kind } => {
                let kind = match kind {
                    NotifyKind::Sound => "sound",
                    NotifyKind::Alert => "alert",
                    NotifyKind::None => "none",
                };
                out.push_str(&format!("{pad}[{index}] notify {kind}\n"));
            }
            Step::Loop { count, children } => {
                out.push_str(&format!("{pad}[{index}] loop x{count}\n"));
                render_steps(children, depth + 1, out);
            }
        }
    }
}
