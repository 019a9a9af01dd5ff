//! Shared helpers for CLI commands.

use flowtimer_core::storage::{Database, TaskRecord};
use flowtimer_core::{NotifyKind, Preset};

/// Format seconds as `MM:SS`, or `H:MM:SS` past the hour.
pub fn format_secs(secs: u64) -> String {
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    let rest = secs % 60;
    if hours > 0 {
        format!("{hours}:{mins:02}:{rest:02}")
    } else {
        format!("{mins:02}:{rest:02}")
    }
}

/// Parse a dotted index path like `2` or `1.0` into indices.
pub fn parse_path(s: &str) -> Result<Vec<usize>, Box<dyn std::error::Error>> {
    s.split('.')
        .map(|part| {
            part.parse::<usize>()
                .map_err(|_| format!("invalid flow path '{s}'").into())
        })
        .collect()
}

pub fn parse_notify_kind(s: &str) -> Result<NotifyKind, Box<dyn std::error::Error>> {
    match s {
        "sound" => Ok(NotifyKind::Sound),
        "alert" => Ok(NotifyKind::Alert),
        "none" => Ok(NotifyKind::None),
        other => Err(format!("unknown notification kind '{other}' (sound|alert|none)").into()),
    }
}

/// Look a preset up by id, falling back to a unique name match.
pub fn resolve_preset(db: &Database, key: &str) -> Result<Preset, Box<dyn std::error::Error>> {
    if let Some(preset) = db.get_preset(key)? {
        return Ok(preset);
    }
    let mut matches: Vec<Preset> = db
        .list_presets()?
        .into_iter()
        .filter(|p| p.name == key)
        .collect();
    match matches.len() {
        1 => Ok(matches.remove(0)),
        0 => Err(format!("no such preset: {key}").into()),
        _ => Err(format!("preset name '{key}' is ambiguous; use the id").into()),
    }
}

/// Look a task up by id, falling back to a unique name match.
pub fn resolve_task(db: &Database, key: &str) -> Result<TaskRecord, Box<dyn std::error::Error>> {
    if let Some(task) = db.get_task(key)? {
        return Ok(task);
    }
    let mut matches: Vec<TaskRecord> = db
        .list_tasks()?
        .into_iter()
        .filter(|t| t.name == key)
        .collect();
    match matches.len() {
        1 => Ok(matches.remove(0)),
        0 => Err(format!("no such task: {key}").into()),
        _ => Err(format!("task name '{key}' is ambiguous; use the id").into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seconds_format_as_minutes_until_an_hour() {
        assert_eq!(format_secs(0), "00:00");
        assert_eq!(format_secs(90), "01:30");
        assert_eq!(format_secs(3599), "59:59");
        assert_eq!(format_secs(3661), "1:01:01");
    }

    #[test]
    fn paths_parse_dotted_indices() {
        assert_eq!(parse_path("2").unwrap(), vec![2]);
        assert_eq!(parse_path("1.0.3").unwrap(), vec![1, 0, 3]);
        assert!(parse_path("a.b").is_err());
        assert!(parse_path("").is_err());
    }
}
