//! HTML preview of a calendar grid.
//!
//! Every free-text field (medication name, unit) goes through
//! [`escape_html`] at the point where it is embedded. Entry data is never
//! assumed to be sanitized upstream: unverified names are arbitrary user text.

use chrono::NaiveDate;
use std::fmt::Write;
use tracing::debug;

use super::escape::escape_html;
use super::GridRenderer;
use crate::calendar::{CalendarGrid, DayCell, Placement};
use crate::medication::{format_dose, MedicationEntry, TimeSlot};

const EMPTY_CALENDAR: &str = "<p>No medications to display.</p>";

const PREVIEW_DISCLAIMER: &str = "DISCLAIMER: This schedule is for personal reference only. \
     Always consult a pharmacist or healthcare provider.";

/// Renders the grid as a table: one column per day (wrapped every seven
/// days), one row per slot. No capacity limit; past days are included.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupRenderer;

impl GridRenderer for MarkupRenderer {
    type Output = String;

    fn render(&self, grid: &CalendarGrid<'_>) -> String {
        if grid.entries.is_empty() {
            return EMPTY_CALENDAR.to_string();
        }

        let slots: Vec<TimeSlot> = grid
            .days
            .first()
            .map(|day| day.slots.iter().map(|cell| cell.slot).collect())
            .unwrap_or_default();

        let mut html = String::from("<div class=\"calendar-container\"><table class=\"calendar-table\">\n");
        for week in grid.days.chunks(7) {
            html.push_str("<tr><th>Time</th>");
            for day in week {
                html.push_str(&day_header(day, grid.today));
            }
            html.push_str("</tr>\n");

            for (row, slot) in slots.iter().enumerate() {
                let _ = write!(
                    html,
                    "<tr><td class=\"time-header\">{}<br>({})</td>",
                    slot.name(),
                    slot.hours()
                );
                for day in week {
                    if day.date.is_none() {
                        html.push_str("<td class=\"blank\"></td>");
                        continue;
                    }
                    html.push_str("<td>");
                    if let Some(cell) = day.slots.get(row) {
                        for placement in &cell.placements {
                            html.push_str(&med_card(placement));
                        }
                    }
                    html.push_str("</td>");
                }
                html.push_str("</tr>\n");
            }
        }
        html.push_str("</table></div>");

        debug!(bytes = html.len(), days = grid.days.len(), "rendered calendar markup");
        html
    }
}

fn day_header(day: &DayCell<'_>, today: NaiveDate) -> String {
    match day.date {
        Some(date) if date == today => {
            format!("<th class=\"today\">{}</th>", date.format("%a %m/%d"))
        }
        Some(date) => format!("<th>{}</th>", date.format("%a %m/%d")),
        None => "<th class=\"blank\"></th>".to_string(),
    }
}

fn med_card(placement: &Placement<'_>) -> String {
    let entry = placement.entry;
    let class = if entry.provenance.is_verified() {
        "calendar-med"
    } else {
        "calendar-med manual"
    };
    let marker = placement
        .change
        .map(|change| change.marker())
        .filter(|marker| !marker.is_empty())
        .map(|marker| format!(" {marker}"))
        .unwrap_or_default();
    format!(
        "<div class=\"{class}\"><div class=\"med-title\">{}</div><div class=\"med-dose\">{} {}{marker}</div></div>",
        escape_html(&entry.name),
        format_dose(placement.dose),
        escape_html(&entry.dose.unit),
    )
}

/// Date-independent roster table: one row per medication, one column per
/// slot, followed by the generation date and a disclaimer.
///
/// Returns an empty string for an empty list.
pub fn render_roster(entries: &[MedicationEntry], today: NaiveDate) -> String {
    if entries.is_empty() {
        return String::new();
    }

    let mut html = String::from(
        "<div class=\"preview-container\">\n<div class=\"preview-header\">Medication Schedule</div>\n<table class=\"roster-table\">\n<tr><th>Medication</th>",
    );
    for slot in TimeSlot::ALL {
        let _ = write!(html, "<th>{}</th>", slot.name());
    }
    html.push_str("</tr>\n");

    for entry in entries {
        let (row_class, source_label) = if entry.provenance.is_verified() {
            ("verified", "")
        } else {
            ("manual", " (Manual)")
        };
        let dose = format!(
            "{} {}",
            format_dose(entry.dose.value),
            escape_html(&entry.dose.unit)
        );
        let _ = write!(
            html,
            "<tr class=\"{row_class}\"><td><strong>{}</strong>{source_label}<br><span class=\"roster-dose\">{dose}</span></td>",
            escape_html(&entry.name),
        );
        for slot in TimeSlot::ALL {
            if entry.takes_at(slot) {
                let _ = write!(html, "<td class=\"taken\"><strong>X</strong><br><span>{dose}</span></td>");
            } else {
                html.push_str("<td class=\"empty\">-</td>");
            }
        }
        html.push_str("</tr>\n");
    }

    let _ = write!(
        html,
        "</table>\n<div class=\"preview-footer\"><strong>Generated:</strong> {}<br><em>{PREVIEW_DISCLAIMER}</em></div>\n</div>",
        today.format("%Y-%m-%d")
    );
    html
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{project, DateRange, ProjectionOptions, WeekStart};
    use crate::medication::{Dose, GradualSchedule, Provenance, ScheduleDefinition};
    use chrono::{TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn entry(name: &str, unit: &str, provenance: Provenance) -> MedicationEntry {
        MedicationEntry::new(
            name,
            Dose::new(10.0, unit),
            [TimeSlot::Morning, TimeSlot::Bedtime],
            provenance,
            Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap(),
        )
    }

    fn week(entries: &[MedicationEntry]) -> String {
        let grid = project(
            entries,
            DateRange::window(today(), 7),
            today(),
            &ProjectionOptions::default(),
        );
        MarkupRenderer.render(&grid)
    }

    #[test]
    fn empty_list_renders_placeholder() {
        assert_eq!(week(&[]), EMPTY_CALENDAR);
    }

    #[test]
    fn week_has_header_and_slot_rows() {
        let html = week(&[entry("Aspirin", "mg", Provenance::Verified)]);
        assert!(html.contains("<th class=\"today\">Mon 10/19</th>"));
        assert!(html.contains("<th>Sun 10/25</th>"));
        assert!(html.contains("Morning<br>(6-9 AM)"));
        assert!(html.contains("Bedtime<br>(9-11 PM)"));
        // Two slots on seven days.
        assert_eq!(html.matches("med-title").count(), 14);
        assert_eq!(html.matches("<tr>").count(), 5);
    }

    #[test]
    fn unverified_entries_get_manual_class() {
        let html = week(&[entry("Homebrew", "mg", Provenance::Unverified)]);
        assert!(html.contains("class=\"calendar-med manual\""));
    }

    #[test]
    fn change_markers_are_shown() {
        let created = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
        let taper = MedicationEntry::new(
            "Prednisone",
            Dose::new(20.0, "mg"),
            [TimeSlot::Morning],
            Provenance::Verified,
            created,
        )
        .with_schedule(ScheduleDefinition::Gradual(
            GradualSchedule::new(20.0, 5.0, 5.0, 3).unwrap(),
        ));
        let html = week(&[taper]);
        assert_eq!(html.matches("20 mg").count(), 3);
        assert!(html.contains("15 mg ↓"));
        assert_eq!(html.matches("↓").count(), 2);
    }

    #[test]
    fn decimal_increase_shows_one_arrow() {
        let created = Utc.with_ymd_and_hms(2026, 10, 19, 9, 0, 0).unwrap();
        let increase = MedicationEntry::new(
            "Levothyroxine",
            Dose::new(0.1, "mg"),
            [TimeSlot::Morning],
            Provenance::Verified,
            created,
        )
        .with_schedule(ScheduleDefinition::Gradual(
            GradualSchedule::new(0.1, 0.8, 0.7, 7).unwrap(),
        ));
        let grid = project(
            std::slice::from_ref(&increase),
            DateRange::window(today(), 21),
            today(),
            &ProjectionOptions::default(),
        );
        let html = MarkupRenderer.render(&grid);
        assert_eq!(html.matches("0.8 mg ↑").count(), 1);
        assert_eq!(html.matches("0.8 mg").count(), 14);
    }

    #[test]
    fn names_and_units_are_escaped() {
        let html = week(&[entry(
            "<script>alert('xss')</script>",
            "<img src=x onerror=alert(1)>",
            Provenance::Unverified,
        )]);
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<img"));
        assert!(html.contains("&lt;script&gt;alert(&#x27;xss&#x27;)&lt;/script&gt;"));
    }

    #[test]
    fn month_view_wraps_weeks() {
        let entries = [entry("Aspirin", "mg", Provenance::Verified)];
        let grid = project(
            &entries,
            DateRange::month(2026, 10, WeekStart::Sunday).unwrap(),
            today(),
            &ProjectionOptions::default(),
        );
        let html = MarkupRenderer.render(&grid);
        // Five weeks, each with a header row and four slot rows.
        assert_eq!(html.matches("<tr>").count(), 25);
        assert!(html.contains("<th class=\"blank\"></th>"));
        // Past days of the month are still shown.
        assert!(html.contains("<th>Thu 10/01</th>"));
        assert_eq!(html.matches("med-title").count(), 62);
    }

    #[test]
    fn roster_lists_slots_and_escapes() {
        let html = render_roster(
            &[
                entry("Aspirin", "mg", Provenance::Verified),
                entry("<b>Tea</b>", "cup\"s", Provenance::Unverified),
            ],
            today(),
        );
        assert!(html.contains("<strong>Aspirin</strong><br>"));
        assert!(html.contains("&lt;b&gt;Tea&lt;/b&gt;</strong> (Manual)"));
        assert!(html.contains("10 cup&quot;s"));
        assert!(!html.contains("<b>Tea"));
        assert_eq!(html.matches("<strong>X</strong>").count(), 4);
        assert_eq!(html.matches("<td class=\"empty\">-</td>").count(), 4);
        assert!(html.contains("<strong>Generated:</strong> 2026-10-19"));
    }

    #[test]
    fn roster_is_empty_without_entries() {
        assert_eq!(render_roster(&[], today()), "");
    }
}
