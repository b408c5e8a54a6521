//! Renderers over a projected [`CalendarGrid`].
//!
//! Both strategies read the same grid and never resolve doses themselves.
//! They differ on purpose: the markup preview shows every day of the range,
//! while the print layout has bounded cells and blanks out days that have
//! already passed.

pub mod escape;
pub mod markup;
pub mod print;

pub use escape::escape_html;
pub use markup::{render_roster, MarkupRenderer};
pub use print::{Align, CellStyle, Page, PageElement, PrintLayout, PrintRenderer, Rgb};

use crate::calendar::CalendarGrid;

/// A rendering strategy for a calendar grid.
pub trait GridRenderer {
    type Output;

    fn render(&self, grid: &CalendarGrid<'_>) -> Self::Output;
}
