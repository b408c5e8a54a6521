//! Date ranges a calendar grid can cover.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ValidationError;

/// First column of a month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    Sunday,
    Monday,
}

impl WeekStart {
    pub fn weekday(self) -> Weekday {
        match self {
            WeekStart::Sunday => Weekday::Sun,
            WeekStart::Monday => Weekday::Mon,
        }
    }

    /// Short weekday names in column order.
    pub fn day_names(self) -> [&'static str; 7] {
        match self {
            WeekStart::Sunday => ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"],
            WeekStart::Monday => ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"],
        }
    }

    /// Column (0-6) of `weekday` in a grid starting on this day.
    pub fn column_of(self, weekday: Weekday) -> u32 {
        (7 + weekday.num_days_from_sunday() - self.weekday().num_days_from_sunday()) % 7
    }
}

impl FromStr for WeekStart {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sunday" | "sun" => Ok(WeekStart::Sunday),
            "monday" | "mon" => Ok(WeekStart::Monday),
            other => Err(ValidationError::InvalidValue {
                field: "week_start".into(),
                message: format!("expected sunday or monday, got '{other}'"),
            }),
        }
    }
}

/// The days covered by a calendar grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum DateRange {
    /// `days` consecutive days from `start`.
    Window { start: NaiveDate, days: u32 },
    /// A whole month laid out in full weeks.
    Month {
        year: i32,
        month: u32,
        week_start: WeekStart,
    },
}

impl DateRange {
    pub fn window(start: NaiveDate, days: u32) -> Self {
        DateRange::Window { start, days }
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidDate`] if the month does not exist.
    pub fn month(year: i32, month: u32, week_start: WeekStart) -> Result<Self, ValidationError> {
        NaiveDate::from_ymd_opt(year, month, 1)
            .ok_or_else(|| ValidationError::InvalidDate(format!("{year}-{month:02}")))?;
        Ok(DateRange::Month {
            year,
            month,
            week_start,
        })
    }

    /// The month containing `date`.
    pub fn month_of(date: NaiveDate, week_start: WeekStart) -> Self {
        DateRange::Month {
            year: date.year(),
            month: date.month(),
            week_start,
        }
    }

    /// `count` consecutive months starting with the one containing `date`.
    pub fn months_from(date: NaiveDate, count: u32, week_start: WeekStart) -> Vec<Self> {
        let Some(first) = date.with_day(1) else {
            return Vec::new();
        };
        (0..count)
            .map_while(|offset| first.checked_add_months(Months::new(offset)))
            .map(|month| DateRange::month_of(month, week_start))
            .collect()
    }

    /// Grid cells in display order; `None` marks padding outside the month.
    pub fn cells(&self) -> Vec<Option<NaiveDate>> {
        match *self {
            DateRange::Window { start, days } => (0..u64::from(days))
                .map_while(|i| start.checked_add_days(Days::new(i)))
                .map(Some)
                .collect(),
            DateRange::Month {
                year,
                month,
                week_start,
            } => {
                let Some(first) = NaiveDate::from_ymd_opt(year, month, 1) else {
                    return Vec::new();
                };
                let lead = week_start.column_of(first.weekday()) as usize;
                let mut cells = vec![None; lead];
                cells.extend(
                    first
                        .iter_days()
                        .take_while(|d| d.month() == month)
                        .map(Some),
                );
                let trail = (7 - cells.len() % 7) % 7;
                cells.extend(std::iter::repeat(None).take(trail));
                cells
            }
        }
    }

    /// First real date of the range.
    pub fn first_date(&self) -> Option<NaiveDate> {
        match *self {
            DateRange::Window { start, days } => (days > 0).then_some(start),
            DateRange::Month { year, month, .. } => NaiveDate::from_ymd_opt(year, month, 1),
        }
    }

    /// Title for a month page, e.g. `October 2026`; windows have none.
    pub fn title(&self) -> Option<String> {
        match *self {
            DateRange::Window { .. } => None,
            DateRange::Month { year, month, .. } => NaiveDate::from_ymd_opt(year, month, 1)
                .map(|first| first.format("%B %Y").to_string()),
        }
    }
}
