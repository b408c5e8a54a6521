//! Medication entries as handed to the engine by the entry form.
//!
//! An entry is created once by the collaborator that owns the medication
//! list; its schedule (if any) is computed at that moment and never changes.
//! The engine only ever borrows entries.

mod schedule;

pub use schedule::{Breakpoint, CustomRanges, Direction, DoseRange, GradualSchedule, ScheduleDefinition};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::dosing::builder::check_dose;
use crate::error::{Result, ValidationError};

/// One of the four canonical times of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeSlot {
    Morning,
    Noon,
    Evening,
    Bedtime,
}

impl TimeSlot {
    /// All slots in canonical (chronological) order.
    pub const ALL: [TimeSlot; 4] = [
        TimeSlot::Morning,
        TimeSlot::Noon,
        TimeSlot::Evening,
        TimeSlot::Bedtime,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "Morning",
            TimeSlot::Noon => "Noon",
            TimeSlot::Evening => "Evening",
            TimeSlot::Bedtime => "Bedtime",
        }
    }

    /// Clock window shown next to the slot name.
    pub fn hours(&self) -> &'static str {
        match self {
            TimeSlot::Morning => "6-9 AM",
            TimeSlot::Noon => "11AM-1PM",
            TimeSlot::Evening => "5-7 PM",
            TimeSlot::Bedtime => "9-11 PM",
        }
    }

    /// Name with clock window, e.g. `Morning (6-9 AM)`.
    pub fn label(&self) -> String {
        format!("{} ({})", self.name(), self.hours())
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TimeSlot {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "morning" => Ok(TimeSlot::Morning),
            "noon" => Ok(TimeSlot::Noon),
            "evening" => Ok(TimeSlot::Evening),
            "bedtime" => Ok(TimeSlot::Bedtime),
            other => Err(ValidationError::InvalidValue {
                field: "slot".into(),
                message: format!("unknown time slot '{other}' (expected morning, noon, evening or bedtime)"),
            }),
        }
    }
}

/// Where the medication name came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provenance {
    /// Picked from the reference list.
    Verified,
    /// Typed in by the user; arbitrary text.
    Unverified,
}

impl Provenance {
    pub fn is_verified(self) -> bool {
        matches!(self, Provenance::Verified)
    }
}

/// A numeric dose with its unit (`mg`, `mL`, `puffs`, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dose {
    pub value: f64,
    pub unit: String,
}

impl Dose {
    pub fn new(value: f64, unit: impl Into<String>) -> Self {
        Self {
            value,
            unit: unit.into(),
        }
    }

    /// Like [`Dose::new`], rejecting values [`Dose::validate`] refuses.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidValue`] for a negative, non-finite or
    /// oversized value.
    pub fn try_new(value: f64, unit: impl Into<String>) -> Result<Self, ValidationError> {
        let dose = Self::new(value, unit);
        dose.validate()?;
        Ok(dose)
    }

    /// The value must be finite and within the range gradual schedules accept.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidValue`] naming the `dose` field.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_dose("dose", self.value)
    }
}

impl fmt::Display for Dose {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", format_dose(self.value), self.unit)
    }
}

/// A medication on the user's list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MedicationEntry {
    pub id: Uuid,
    pub name: String,
    /// Base dose, used whenever no schedule applies.
    pub dose: Dose,
    pub slots: Vec<TimeSlot>,
    pub provenance: Provenance,
    #[serde(default)]
    pub schedule: Option<ScheduleDefinition>,
    pub created_at: DateTime<Utc>,
    /// Day 0 of the schedule.
    pub anchor: NaiveDate,
}

impl MedicationEntry {
    /// Create an entry anchored on the calendar date of `created_at`.
    ///
    /// Slots are deduplicated and stored in canonical order.
    pub fn new(
        name: impl Into<String>,
        dose: Dose,
        slots: impl IntoIterator<Item = TimeSlot>,
        provenance: Provenance,
        created_at: DateTime<Utc>,
    ) -> Self {
        let mut slots: Vec<TimeSlot> = slots.into_iter().collect();
        slots.sort();
        slots.dedup();

        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            dose,
            slots,
            provenance,
            schedule: None,
            created_at,
            anchor: created_at.date_naive(),
        }
    }

    pub fn with_schedule(mut self, schedule: ScheduleDefinition) -> Self {
        self.schedule = Some(schedule);
        self
    }

    pub fn with_anchor(mut self, anchor: NaiveDate) -> Self {
        self.anchor = anchor;
        self
    }

    /// Whether the medication is taken in `slot`.
    pub fn takes_at(&self, slot: TimeSlot) -> bool {
        self.slots.contains(&slot)
    }

    /// One-line dose description for listings.
    pub fn dose_summary(&self) -> String {
        match &self.schedule {
            Some(ScheduleDefinition::Gradual(gradual)) => format!(
                "{} → {} {} {}",
                format_dose(gradual.start_dose()),
                format_dose(gradual.target_dose()),
                self.dose.unit,
                gradual.direction().arrow()
            ),
            Some(ScheduleDefinition::Custom(custom)) => {
                format!("Variable dosing ({} ranges)", custom.ranges().len())
            }
            None => self.dose.to_string(),
        }
    }
}

/// Decode a JSON snapshot of a medication list.
///
/// # Errors
///
/// Returns [`CoreError::Json`](crate::error::CoreError::Json) for malformed
/// JSON and [`CoreError::Validation`](crate::error::CoreError::Validation)
/// when an entry's base dose is unusable.
pub fn entries_from_json(json: &str) -> Result<Vec<MedicationEntry>> {
    let entries: Vec<MedicationEntry> = serde_json::from_str(json)?;
    for entry in &entries {
        entry.dose.validate()?;
    }
    Ok(entries)
}

/// Format a dose value without float noise: `20`, `2.5`, `0.125`.
pub fn format_dose(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }
    let fixed = format!("{value:.3}");
    if fixed.contains('.') {
        fixed.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        fixed
    }
}
