//! Calendar ranges and the projection of entries onto a day × slot grid.

pub mod projector;
pub mod range;

pub use projector::{project, AnchorPolicy, CalendarGrid, DayCell, Placement, ProjectionOptions, SlotCell};
pub use range::{DateRange, WeekStart};
