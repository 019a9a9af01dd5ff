//! Task management commands.

use clap::Subcommand;
use flowtimer_core::storage::{Database, TaskRecord};

use crate::common::{format_secs, resolve_task};

#[derive(Subcommand)]
pub enum TaskAction {
    /// Create a new task
    Create {
        /// Task name
        name: String,
    },
    /// List tasks with their accumulated time
    List {
        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show one task, including its contribution log
    Show {
        /// Task id or name
        task: String,
    },
    /// Rename a task
    Rename {
        /// Task id or name
        task: String,
        /// New name
        name: String,
    },
    /// Delete a task
    Delete {
        /// Task id or name
        task: String,
    },
}

pub fn run(action: TaskAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        TaskAction::Create { name } => {
            let task = TaskRecord::new(name);
            db.create_task(&task)?;
            println!("Task created: {}", task.id);
            println!("{}", serde_json::to_string_pretty(&task)?);
        }
        TaskAction::List { json } => {
            let tasks = db.list_tasks()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&tasks)?);
            } else {
                for task in tasks {
                    println!(
                        "{}  {}  ({})",
                        task.id,
                        task.name,
                        format_secs(task.total_secs)
                    );
                }
            }
        }
        TaskAction::Show { task } => {
            let task = resolve_task(&db, &task)?;
            println!("{}", serde_json::to_string_pretty(&task)?);
            let log = db.list_contributions(&task.id)?;
            for record in log {
                println!(
                    "  {}  {}  {}",
                    record.recorded_at.to_rfc3339(),
                    record.kind,
                    format_secs(record.secs)
                );
            }
        }
        TaskAction::Rename { task, name } => {
            let task = resolve_task(&db, &task)?;
            db.rename_task(&task.id, &name)?;
            println!("Task renamed: {}", task.id);
        }
        TaskAction::Delete { task } => {
            let task = resolve_task(&db, &task)?;
            db.delete_task(&task.id)?;
            println!("Task deleted: {}", task.id);
        }
    }

    Ok(())
}
