//! Calendar rendering commands for CLI.

use chrono::{Datelike, NaiveDate};
use clap::Subcommand;
use medsched_core::{
    project, render_roster,
    storage::{MAX_PRINT_MONTHS, MAX_WINDOW_DAYS},
    Config, DateRange, GridRenderer, MarkupRenderer, PrintRenderer,
};
use std::path::PathBuf;
use tracing::debug;

use super::{load_entries, today_or};

#[derive(Subcommand)]
pub enum CalendarAction {
    /// HTML calendar for the coming days
    Week {
        /// Medication list (JSON)
        file: PathBuf,
        /// Render as if today were this date (YYYY-MM-DD)
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Number of days (default: calendar.window_days)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_WINDOW_DAYS)))]
        days: Option<u32>,
    },
    /// HTML calendar for a whole month
    Month {
        /// Medication list (JSON)
        file: PathBuf,
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Year (default: current)
        #[arg(long)]
        year: Option<i32>,
        /// Month 1-12 (default: current)
        #[arg(long)]
        month: Option<u32>,
    },
    /// HTML roster of medications per time slot
    Roster {
        /// Medication list (JSON)
        file: PathBuf,
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Printable month pages as JSON page descriptions
    Print {
        /// Medication list (JSON)
        file: PathBuf,
        #[arg(long)]
        today: Option<NaiveDate>,
        /// Number of month pages (default: print.months)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_PRINT_MONTHS)))]
        months: Option<u32>,
    },
}

pub fn run(action: CalendarAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let options = config.projection_options();

    match action {
        CalendarAction::Week { file, today, days } => {
            let entries = load_entries(&file)?;
            let today = today_or(today);
            let days = days.unwrap_or(config.calendar.window_days);
            let grid = project(&entries, DateRange::window(today, days), today, &options);
            println!("{}", MarkupRenderer.render(&grid));
        }
        CalendarAction::Month {
            file,
            today,
            year,
            month,
        } => {
            let entries = load_entries(&file)?;
            let today = today_or(today);
            let range = DateRange::month(
                year.unwrap_or(today.year()),
                month.unwrap_or(today.month()),
                config.calendar.week_start,
            )?;
            let grid = project(&entries, range, today, &options);
            println!("{}", MarkupRenderer.render(&grid));
        }
        CalendarAction::Roster { file, today } => {
            let entries = load_entries(&file)?;
            println!("{}", render_roster(&entries, today_or(today)));
        }
        CalendarAction::Print {
            file,
            today,
            months,
        } => {
            let entries = load_entries(&file)?;
            let mut layout = config.print_layout();
            if let Some(months) = months {
                layout.months = months;
            }
            let renderer = PrintRenderer::new(layout, config.calendar.week_start, options);
            let pages = renderer.render_document(&entries, today_or(today));
            debug!(pages = pages.len(), "print document ready");
            println!("{}", serde_json::to_string_pretty(&pages)?);
        }
    }
    Ok(())
}
