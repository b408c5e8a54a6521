//! # Medsched Core Library
//!
//! This library provides the scheduling engine behind the `medsched` CLI:
//! it resolves the dose a medication calls for on any given day and lays a
//! medication list out on day × time-slot calendars for on-screen preview
//! and printing.
//!
//! ## Architecture
//!
//! - **Dosing**: builds gradual taper/increase schedules once, at creation,
//!   and resolves the active dose for a day offset
//! - **Calendar**: projects a list of entries over a window or month into a
//!   grid shared by every renderer
//! - **Render**: HTML markup preview and fixed-page print layout
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`MedicationEntry`]: A medication with its slots and optional schedule
//! - [`resolve`]: Dose active on a given day
//! - [`project`]: Calendar grid construction
//! - [`MarkupRenderer`] / [`PrintRenderer`]: Grid consumers
//! - [`Config`]: Application configuration management

pub mod calendar;
pub mod dosing;
pub mod error;
pub mod medication;
pub mod render;
pub mod storage;

pub use calendar::{project, AnchorPolicy, CalendarGrid, DateRange, ProjectionOptions, WeekStart};
pub use dosing::{build, dose_change, preview_text, resolve, DoseChange, GradualPlan};
pub use error::{ConfigError, CoreError, ValidationError};
pub use medication::{
    entries_from_json, format_dose, CustomRanges, Dose, DoseRange, GradualSchedule, MedicationEntry, Provenance,
    ScheduleDefinition, TimeSlot,
};
pub use render::{escape_html, render_roster, GridRenderer, MarkupRenderer, Page, PrintLayout, PrintRenderer};
pub use storage::Config;
