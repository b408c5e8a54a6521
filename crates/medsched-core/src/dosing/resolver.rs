//! Dose lookup for a single entry on a single day.
//!
//! Resolution never fails: any schedule data that cannot answer the question
//! falls back to the entry's base dose.

use serde::{Deserialize, Serialize};

use crate::medication::{Breakpoint, DoseRange, MedicationEntry, ScheduleDefinition};

/// How the dose on a day compares with the day before.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DoseChange {
    Decreased,
    Increased,
    Unchanged,
}

impl DoseChange {
    pub fn between(previous: f64, current: f64) -> Self {
        if current < previous {
            DoseChange::Decreased
        } else if current > previous {
            DoseChange::Increased
        } else {
            DoseChange::Unchanged
        }
    }

    /// Arrow appended to a dose label; empty when unchanged.
    pub fn marker(self) -> &'static str {
        match self {
            DoseChange::Decreased => "↓",
            DoseChange::Increased => "↑",
            DoseChange::Unchanged => "",
        }
    }
}

/// Dose active `day_offset` days after the entry's anchor (0 = anchor day).
pub fn resolve(entry: &MedicationEntry, day_offset: i64) -> f64 {
    let base = entry.dose.value;
    match &entry.schedule {
        None => base,
        Some(ScheduleDefinition::Gradual(gradual)) => {
            gradual_dose(gradual.breakpoints(), day_offset).unwrap_or(base)
        }
        Some(ScheduleDefinition::Custom(custom)) => {
            custom_dose(custom.ranges(), day_offset).unwrap_or(base)
        }
    }
}

/// Compare the dose on `day_offset` with the dose the day before.
pub fn dose_change(entry: &MedicationEntry, day_offset: i64) -> DoseChange {
    DoseChange::between(resolve(entry, day_offset - 1), resolve(entry, day_offset))
}

/// Last breakpoint at or before the day; the first one if the day precedes
/// them all. `None` only when there are no breakpoints.
fn gradual_dose(breakpoints: &[Breakpoint], day_offset: i64) -> Option<f64> {
    let first = breakpoints.first()?;
    let active = breakpoints
        .iter()
        .take_while(|bp| bp.day <= day_offset)
        .last()
        .unwrap_or(first);
    Some(active.dose)
}

/// First declared range containing the 1-based day number.
fn custom_dose(ranges: &[DoseRange], day_offset: i64) -> Option<f64> {
    let day_number = day_offset.saturating_add(1);
    ranges
        .iter()
        .find(|range| range.contains(day_number))
        .map(DoseRange::dose)
}
