//! Dose schedules: building gradual breakpoints and resolving the dose
//! active on a given day.

pub mod builder;
pub mod resolver;

pub use builder::{build, preview_text, GradualPlan, MAX_BREAKPOINTS};
pub use resolver::{dose_change, resolve, DoseChange};
