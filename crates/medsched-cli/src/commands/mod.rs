pub mod calendar;
pub mod config;
pub mod med;
pub mod schedule;

use chrono::{Local, NaiveDate};
use medsched_core::{entries_from_json, MedicationEntry};
use std::path::Path;
use tracing::info;

/// Read the medication list; a missing file is an empty list.
pub fn load_entries(path: &Path) -> Result<Vec<MedicationEntry>, Box<dyn std::error::Error>> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "medication file not found, starting empty");
            return Ok(Vec::new());
        }
        Err(e) => return Err(format!("cannot read {}: {e}", path.display()).into()),
    };
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }
    let entries = entries_from_json(&content)
        .map_err(|e| format!("invalid medication file {}: {e}", path.display()))?;
    Ok(entries)
}

pub fn save_entries(path: &Path, entries: &[MedicationEntry]) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(entries)?;
    std::fs::write(path, json).map_err(|e| format!("cannot write {}: {e}", path.display()))?;
    info!(path = %path.display(), entries = entries.len(), "saved medication file");
    Ok(())
}

/// The `--today` override, or the local calendar date.
pub fn today_or(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Local::now().date_naive())
}
