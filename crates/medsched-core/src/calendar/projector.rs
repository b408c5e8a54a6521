//! Projection of medication entries onto a day × slot calendar grid.
//!
//! The grid is the one intermediate representation shared by every
//! renderer: doses are resolved here exactly once per (entry, day).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::range::DateRange;
use crate::dosing::{dose_change, resolve, DoseChange};
use crate::medication::{MedicationEntry, TimeSlot};

/// Which date counts as day 0 when resolving an entry's schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorPolicy {
    /// Each entry's own anchor date (normally the day it was added).
    #[default]
    Creation,
    /// The render's `today`, for every entry.
    Today,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionOptions {
    pub anchor: AnchorPolicy,
    /// Slots to lay out, in row order.
    pub slots: Vec<TimeSlot>,
}

impl Default for ProjectionOptions {
    fn default() -> Self {
        Self {
            anchor: AnchorPolicy::default(),
            slots: TimeSlot::ALL.to_vec(),
        }
    }
}

/// One entry placed in one cell with its resolved dose.
#[derive(Debug, Clone, Serialize)]
pub struct Placement<'a> {
    pub entry: &'a MedicationEntry,
    /// Position of the entry in the projected list.
    pub index: usize,
    pub day_offset: i64,
    pub dose: f64,
    /// `None` on the first day of the range.
    pub change: Option<DoseChange>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SlotCell<'a> {
    pub slot: TimeSlot,
    pub placements: Vec<Placement<'a>>,
}

/// A grid column; `date` is `None` for month padding.
#[derive(Debug, Clone, Serialize)]
pub struct DayCell<'a> {
    pub date: Option<NaiveDate>,
    pub slots: Vec<SlotCell<'a>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CalendarGrid<'a> {
    pub range: DateRange,
    pub today: NaiveDate,
    pub entries: &'a [MedicationEntry],
    pub days: Vec<DayCell<'a>>,
}

impl<'a> CalendarGrid<'a> {
    /// Placements of a day across all slots, one per entry, in entry order.
    pub fn entries_on(&self, day_index: usize) -> Vec<&Placement<'a>> {
        let Some(day) = self.days.get(day_index) else {
            return Vec::new();
        };
        let mut placements: Vec<&Placement<'a>> = day
            .slots
            .iter()
            .flat_map(|cell| cell.placements.iter())
            .collect();
        placements.sort_by_key(|p| p.index);
        placements.dedup_by_key(|p| p.index);
        placements
    }
}

/// Lay `entries` out over `range`.
///
/// For every dated cell and every slot, each entry taking that slot is
/// resolved at `cell date − anchor` and compared with the day before. The
/// first dated day of the range carries no change indicator. Entries keep
/// their list order within a cell.
pub fn project<'a>(
    entries: &'a [MedicationEntry],
    range: DateRange,
    today: NaiveDate,
    options: &ProjectionOptions,
) -> CalendarGrid<'a> {
    for entry in entries {
        if let Some(schedule) = &entry.schedule {
            if !schedule.is_coherent() {
                warn!(
                    entry = %entry.id,
                    name = %entry.name,
                    "malformed dose schedule; showing base dose"
                );
            }
        }
    }

    let first_date = range.first_date();
    let days: Vec<DayCell<'a>> = range
        .cells()
        .into_iter()
        .map(|date| DayCell {
            date,
            slots: options
                .slots
                .iter()
                .map(|&slot| SlotCell {
                    slot,
                    placements: match date {
                        Some(date) => entries
                            .iter()
                            .enumerate()
                            .filter(|(_, entry)| entry.takes_at(slot))
                            .map(|(index, entry)| {
                                let first_day = Some(date) == first_date;
                                place(entry, index, date, today, options.anchor, first_day)
                            })
                            .collect(),
                        None => Vec::new(),
                    },
                })
                .collect(),
        })
        .collect();

    debug!(
        days = days.len(),
        entries = entries.len(),
        anchor = ?options.anchor,
        "projected calendar grid"
    );

    CalendarGrid {
        range,
        today,
        entries,
        days,
    }
}

fn place<'a>(
    entry: &'a MedicationEntry,
    index: usize,
    date: NaiveDate,
    today: NaiveDate,
    anchor: AnchorPolicy,
    first_day: bool,
) -> Placement<'a> {
    let anchor_date = match anchor {
        AnchorPolicy::Creation => entry.anchor,
        AnchorPolicy::Today => today,
    };
    let day_offset = (date - anchor_date).num_days();
    Placement {
        entry,
        index,
        day_offset,
        dose: resolve(entry, day_offset),
        change: (!first_day).then(|| dose_change(entry, day_offset)),
    }
}
