//! SQLite-based storage for presets, tasks, and attribution records.
//!
//! Provides persistent storage for:
//! - Presets (flows stored as JSON)
//! - Tasks and their accumulated time
//! - The contribution log behind `stats`
//! - A key-value store the shell uses for engine state

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};

use super::data_dir;
use crate::error::StoreError;
use crate::flow::{Flow, Preset};
use crate::sinks::{SinkError, TaskStore};
use crate::timer::ContributionKind;

/// A tracked task and its accumulated time in seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskRecord {
    pub id: String,
    pub name: String,
    pub total_secs: u64,
    pub created_at: DateTime<Utc>,
}

impl TaskRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: name.into(),
            total_secs: 0,
            created_at: Utc::now(),
        }
    }
}

/// One attribution record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContributionRecord {
    pub id: i64,
    pub task_id: String,
    pub secs: u64,
    pub kind: String,
    pub recorded_at: DateTime<Utc>,
}

/// Aggregates over the contribution log.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Stats {
    pub total_tracked_secs: u64,
    pub today_tracked_secs: u64,
    pub completed_runs: u64,
    pub manual_stops: u64,
}

/// SQLite database for presets, tasks, and contributions.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the database at `~/.config/flowtimer/flowtimer.db`.
    ///
    /// Creates the database file and schema if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self, StoreError> {
        let path = data_dir()?.join("flowtimer.db");
        Self::open_at(&path)
    }

    /// Open the database at an explicit path.
    pub fn open_at(path: &Path) -> Result<Self, StoreError> {
        let conn = Connection::open(path).map_err(|source| StoreError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        // Concurrent CLI invocations share this file; wait out writers
        // instead of surfacing SQLITE_BUSY.
        conn.busy_timeout(std::time::Duration::from_secs(5))?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests and tooling).
    pub fn open_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<(), rusqlite::Error> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS presets (
                id         TEXT PRIMARY KEY,
                name       TEXT NOT NULL,
                flow       TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS tasks (
                id         TEXT PRIMARY KEY,
                name       TEXT NOT NULL,
                total_secs INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS contributions (
                id          INTEGER PRIMARY KEY AUTOINCREMENT,
                task_id     TEXT NOT NULL,
                secs        INTEGER NOT NULL,
                kind        TEXT NOT NULL,
                recorded_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_contributions_task_id ON contributions(task_id);
            CREATE INDEX IF NOT EXISTS idx_contributions_recorded_at ON contributions(recorded_at);",
        )?;
        Ok(())
    }

    // ── Presets ──────────────────────────────────────────────────────

    pub fn create_preset(&self, preset: &Preset) -> Result<(), StoreError> {
        let flow_json = serde_json::to_string(&preset.flow)?;
        let now = Utc::now().to_rfc3339();
        self.conn.execute(
            "INSERT INTO presets (id, name, flow, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?4)",
            params![preset.id, preset.name, flow_json, now],
        )?;
        Ok(())
    }

    pub fn list_presets(&self) -> Result<Vec<Preset>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, flow FROM presets ORDER BY created_at")?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
            ))
        })?;

        let mut presets = Vec::new();
        for row in rows {
            let (id, name, flow_json) = row?;
            let flow: Flow = serde_json::from_str(&flow_json)?;
            presets.push(Preset { id, name, flow });
        }
        Ok(presets)
    }

    pub fn get_preset(&self, id: &str) -> Result<Option<Preset>, StoreError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, name, flow FROM presets WHERE id = ?1",
                params![id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        match row {
            Some((id, name, flow_json)) => {
                let flow: Flow = serde_json::from_str(&flow_json)?;
                Ok(Some(Preset { id, name, flow }))
            }
            None => Ok(None),
        }
    }

    /// Update name and flow of an existing preset.
    pub fn update_preset(&self, preset: &Preset) -> Result<(), StoreError> {
        let flow_json = serde_json::to_string(&preset.flow)?;
        let changed = self.conn.execute(
            "UPDATE presets SET name = ?2, flow = ?3, updated_at = ?4 WHERE id = ?1",
            params![
                preset.id,
                preset.name,
                flow_json,
                Utc::now().to_rfc3339()
            ],
        )?;
        if changed == 0 {
            return Err(StoreError::PresetNotFound(preset.id.clone()));
        }
        Ok(())
    }

    pub fn delete_preset(&self, id: &str) -> Result<(), StoreError> {
        let changed = self
            .conn
            .execute("DELETE FROM presets WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(StoreError::PresetNotFound(id.to_string()));
        }
        Ok(())
    }

    // ── Tasks ────────────────────────────────────────────────────────

    pub fn create_task(&self, task: &TaskRecord) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO tasks (id, name, total_secs, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![
                task.id,
                task.name,
                task.total_secs,
                task.created_at.to_rfc3339()
            ],
        )?;
        Ok(())
    }

    pub fn list_tasks(&self) -> Result<Vec<TaskRecord>, StoreError> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, total_secs, created_at FROM tasks ORDER BY created_at")?;
        let rows = stmt.query_map([], row_to_task)?;
        let mut tasks = Vec::new();
        for row in rows {
            tasks.push(row?);
        }
        Ok(tasks)
    }

    pub fn get_task(&self, id: &str) -> Result<Option<TaskRecord>, StoreError> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, name, total_secs, created_at FROM tasks WHERE id = ?1",
                params![id],
                row_to_task,
            )
            .optional()?)
    }

    pub fn rename_task(&self, id: &str, name: &str) -> Result<(), StoreError> {
        let changed = self
            .conn
            .execute("UPDATE tasks SET name = ?2 WHERE id = ?1", params![id, name])?;
        if changed == 0 {
            return Err(StoreError::TaskNotFound(id.to_string()));
        }
        Ok(())
    }

    pub fn delete_task(&self, id: &str) -> Result<(), StoreError> {
        let changed = self
            .conn
            .execute("DELETE FROM tasks WHERE id = ?1", params![id])?;
        if changed == 0 {
            return Err(StoreError::TaskNotFound(id.to_string()));
        }
        Ok(())
    }

    // ── Attribution ──────────────────────────────────────────────────

    /// Add `secs` to a task's accumulated total and append to the
    /// contribution log, atomically.
    pub fn record_contribution(
        &self,
        task_id: &str,
        secs: u64,
        kind: ContributionKind,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        let tx = self.conn.unchecked_transaction()?;
        let changed = tx.execute(
            "UPDATE tasks SET total_secs = total_secs + ?2 WHERE id = ?1",
            params![task_id, secs],
        )?;
        if changed == 0 {
            return Err(StoreError::TaskNotFound(task_id.to_string()));
        }
        tx.execute(
            "INSERT INTO contributions (task_id, secs, kind, recorded_at) VALUES (?1, ?2, ?3, ?4)",
            params![task_id, secs, kind.as_str(), at.to_rfc3339()],
        )?;
        tx.commit()?;
        Ok(())
    }

    pub fn list_contributions(&self, task_id: &str) -> Result<Vec<ContributionRecord>, StoreError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, task_id, secs, kind, recorded_at FROM contributions
             WHERE task_id = ?1 ORDER BY recorded_at",
        )?;
        let rows = stmt.query_map(params![task_id], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, u64>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;
        let mut records = Vec::new();
        for row in rows {
            let (id, task_id, secs, kind, recorded_at) = row?;
            records.push(ContributionRecord {
                id,
                task_id,
                secs,
                kind,
                recorded_at: parse_rfc3339(&recorded_at),
            });
        }
        Ok(records)
    }

    pub fn stats(&self) -> Result<Stats, StoreError> {
        let today_start = Utc::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .unwrap_or_default()
            .and_utc()
            .to_rfc3339();

        let (total_tracked_secs, completed_runs, manual_stops) = self.conn.query_row(
            "SELECT COALESCE(SUM(secs), 0),
                    COALESCE(SUM(kind = 'complete'), 0),
                    COALESCE(SUM(kind = 'manual_stop'), 0)
             FROM contributions",
            [],
            |row| {
                Ok((
                    row.get::<_, u64>(0)?,
                    row.get::<_, u64>(1)?,
                    row.get::<_, u64>(2)?,
                ))
            },
        )?;

        let today_tracked_secs = self.conn.query_row(
            "SELECT COALESCE(SUM(secs), 0) FROM contributions WHERE recorded_at >= ?1",
            params![today_start],
            |row| row.get::<_, u64>(0),
        )?;

        Ok(Stats {
            total_tracked_secs,
            today_tracked_secs,
            completed_runs,
            manual_stops,
        })
    }

    // ── Key-value store ──────────────────────────────────────────────

    pub fn kv_get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .conn
            .query_row(
                "SELECT value FROM kv WHERE key = ?1",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()?)
    }

    pub fn kv_set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            params![key, value],
        )?;
        Ok(())
    }
}

impl TaskStore for Database {
    fn add_contribution(
        &self,
        task_id: &str,
        secs: u64,
        kind: ContributionKind,
    ) -> Result<(), SinkError> {
        self.record_contribution(task_id, secs, kind, Utc::now())
            .map_err(|e| SinkError::new(e.to_string()))
    }
}

fn row_to_task(row: &rusqlite::Row<'_>) -> rusqlite::Result<TaskRecord> {
    Ok(TaskRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        total_secs: row.get(2)?,
        created_at: parse_rfc3339(&row.get::<_, String>(3)?),
    })
}

fn parse_rfc3339(s: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|_| Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flow::{NotifyKind, Step};

    fn sample_preset() -> Preset {
        Preset::new("pomodoro").with_flow(Flow::new(vec![
            Step::Loop {
                count: 4,
                children: vec![
                    Step::Timer { minutes: 25 },
                    Step::Timer { minutes: 5 },
                ],
            },
            Step::Notification {
                kind: NotifyKind::Sound,
            },
        ]))
    }

    #[test]
    fn preset_crud_roundtrip() {
        let db = Database::open_memory().unwrap();
        let preset = sample_preset();
        db.create_preset(&preset).unwrap();

        let loaded = db.get_preset(&preset.id).unwrap().unwrap();
        assert_eq!(loaded, preset);
        assert_eq!(loaded.flow.total_secs(), 4 * 30 * 60);

        let renamed = Preset {
            name: "classic pomodoro".into(),
            ..loaded
        };
        db.update_preset(&renamed).unwrap();
        assert_eq!(
            db.get_preset(&preset.id).unwrap().unwrap().name,
            "classic pomodoro"
        );

        db.delete_preset(&preset.id).unwrap();
        assert!(db.get_preset(&preset.id).unwrap().is_none());
    }

    #[test]
    fn deleting_a_missing_preset_is_an_error() {
        let db = Database::open_memory().unwrap();
        assert!(matches!(
            db.delete_preset("nope"),
            Err(StoreError::PresetNotFound(_))
        ));
    }

    #[test]
    fn contributions_accumulate_into_the_task_total() {
        let db = Database::open_memory().unwrap();
        let task = TaskRecord::new("write report");
        db.create_task(&task).unwrap();

        db.record_contribution(&task.id, 60, ContributionKind::Complete, Utc::now())
            .unwrap();
        db.record_contribution(&task.id, 30, ContributionKind::ManualStop, Utc::now())
            .unwrap();

        let loaded = db.get_task(&task.id).unwrap().unwrap();
        assert_eq!(loaded.total_secs, 90);

        let log = db.list_contributions(&task.id).unwrap();
        assert_eq!(log.len(), 2);
        assert_eq!(log[0].kind, "complete");
        assert_eq!(log[1].kind, "manual_stop");
    }

    #[test]
    fn contribution_to_a_missing_task_is_an_error() {
        let db = Database::open_memory().unwrap();
        assert!(matches!(
            db.record_contribution("nope", 60, ContributionKind::Complete, Utc::now()),
            Err(StoreError::TaskNotFound(_))
        ));
    }

    #[test]
    fn stats_aggregate_the_contribution_log() {
        let db = Database::open_memory().unwrap();
        let task = TaskRecord::new("t");
        db.create_task(&task).unwrap();
        db.record_contribution(&task.id, 120, ContributionKind::Complete, Utc::now())
            .unwrap();
        db.record_contribution(&task.id, 45, ContributionKind::ManualStop, Utc::now())
            .unwrap();

        let stats = db.stats().unwrap();
        assert_eq!(stats.total_tracked_secs, 165);
        assert_eq!(stats.today_tracked_secs, 165);
        assert_eq!(stats.completed_runs, 1);
        assert_eq!(stats.manual_stops, 1);
    }

    #[test]
    fn kv_roundtrips_and_overwrites() {
        let db = Database::open_memory().unwrap();
        assert!(db.kv_get("engine").unwrap().is_none());
        db.kv_set("engine", "{}").unwrap();
        db.kv_set("engine", "{\"phase\":\"idle\"}").unwrap();
        assert_eq!(
            db.kv_get("engine").unwrap().as_deref(),
            Some("{\"phase\":\"idle\"}")
        );
    }

    #[test]
    fn database_persists_to_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flowtimer.db");
        {
            let db = Database::open_at(&path).unwrap();
            db.create_preset(&sample_preset()).unwrap();
        }
        let db = Database::open_at(&path).unwrap();
        assert_eq!(db.list_presets().unwrap().len(), 1);
    }
}
