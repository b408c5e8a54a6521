//! Fixed-page print layout.
//!
//! Produces A4-landscape pages made of positioned, sized and styled
//! elements (millimetres, origin top-left) for a document generator to
//! draw. One page per month, then a date-independent roster page.
//!
//! Each day cell holds a bounded number of markers. Markers are stacked top
//! to bottom until the next one would not fit; the rest are counted into a
//! `+N more` marker. Days before `today` keep their date and background but
//! show no markers.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use super::GridRenderer;
use crate::calendar::{project, CalendarGrid, DateRange, Placement, ProjectionOptions, WeekStart};
use crate::medication::{format_dose, MedicationEntry, Provenance, TimeSlot};
use crate::storage::PrintConfig;

/// Height reserved for the day number at the top of a cell.
const DAY_LABEL_HEIGHT: f64 = 7.0;
/// Free space kept at the bottom of a cell.
const CELL_PADDING: f64 = 1.0;
const TITLE_HEIGHT: f64 = 12.0;
const SUBTITLE_HEIGHT: f64 = 5.0;
const TITLE_GAP: f64 = 3.0;
const SUMMARY_LIMIT: usize = 4;

const PRINT_DISCLAIMER: &str = "IMPORTANT: This schedule is for personal reference only and is NOT medical advice. \
     Always review this document for accuracy and verify with a pharmacist or healthcare provider.";

const BLUE: Rgb = Rgb(25, 118, 210);
const WHITE: Rgb = Rgb(255, 255, 255);
const GREY_TEXT: Rgb = Rgb(100, 100, 100);
const GRID_LINE: Rgb = Rgb(200, 200, 200);
const BLANK_FILL: Rgb = Rgb(245, 245, 245);
const TODAY_FILL: Rgb = Rgb(255, 253, 231);
const VERIFIED_FILL: Rgb = Rgb(200, 230, 201);
const MANUAL_FILL: Rgb = Rgb(255, 224, 178);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellStyle {
    pub fill: Option<Rgb>,
    pub border: Option<Rgb>,
    pub text_color: Rgb,
    pub font_size: f64,
    pub bold: bool,
    pub italic: bool,
    pub align: Align,
}

impl Default for CellStyle {
    fn default() -> Self {
        Self {
            fill: None,
            border: None,
            text_color: Rgb(0, 0, 0),
            font_size: 9.0,
            bold: false,
            italic: false,
            align: Align::Left,
        }
    }
}

/// A positioned box, optionally filled, bordered and labelled.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageElement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub text: Option<String>,
    pub style: CellStyle,
}

impl PageElement {
    fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            text: None,
            style: CellStyle::default(),
        }
    }

    fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    fn style(mut self, style: CellStyle) -> Self {
        self.style = style;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page {
    pub title: String,
    pub width: f64,
    pub height: f64,
    pub elements: Vec<PageElement>,
}

/// Page geometry in millimetres.
#[derive(Debug, Clone, PartialEq)]
pub struct PrintLayout {
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,
    pub header_height: f64,
    pub row_height: f64,
    pub entry_height: f64,
    pub entry_gap: f64,
    /// Characters of the medication name kept on a marker.
    pub name_chars: usize,
    /// Consecutive month pages, starting with today's month.
    pub months: u32,
}

impl Default for PrintLayout {
    fn default() -> Self {
        PrintLayout::from(&PrintConfig::default())
    }
}

impl From<&PrintConfig> for PrintLayout {
    fn from(config: &PrintConfig) -> Self {
        Self {
            page_width: config.page_width,
            page_height: config.page_height,
            margin: config.margin,
            header_height: config.header_height,
            row_height: config.row_height,
            entry_height: config.entry_height,
            entry_gap: config.entry_gap,
            name_chars: config.name_chars,
            months: config.months,
        }
    }
}

impl PrintLayout {
    fn column_width(&self) -> f64 {
        (self.page_width - 2.0 * self.margin) / 7.0
    }

    fn content_width(&self) -> f64 {
        self.page_width - 2.0 * self.margin
    }

    /// Markers that fit in one day cell.
    pub fn cell_capacity(&self) -> usize {
        let usable = self.row_height - DAY_LABEL_HEIGHT - CELL_PADDING;
        if usable < self.entry_height {
            return 0;
        }
        ((usable - self.entry_height) / (self.entry_height + self.entry_gap)).floor() as usize + 1
    }
}

/// Month-page print layout.
#[derive(Debug, Clone)]
pub struct PrintRenderer {
    pub layout: PrintLayout,
    pub week_start: WeekStart,
    pub options: ProjectionOptions,
}

impl Default for PrintRenderer {
    fn default() -> Self {
        Self {
            layout: PrintLayout::default(),
            week_start: WeekStart::default(),
            options: ProjectionOptions::default(),
        }
    }
}

impl GridRenderer for PrintRenderer {
    type Output = Page;

    fn render(&self, grid: &CalendarGrid<'_>) -> Page {
        let layout = &self.layout;
        let title = grid.range.title().unwrap_or_else(|| "Medication Schedule".to_string());
        let mut elements = Vec::new();

        let mut y = layout.margin;
        elements.push(
            PageElement::new(layout.margin, y, layout.content_width(), TITLE_HEIGHT)
                .text(title.clone())
                .style(CellStyle {
                    text_color: BLUE,
                    font_size: 20.0,
                    bold: true,
                    align: Align::Center,
                    ..CellStyle::default()
                }),
        );
        y += TITLE_HEIGHT;
        elements.push(
            PageElement::new(layout.margin, y, layout.content_width(), SUBTITLE_HEIGHT)
                .text("Medication Schedule")
                .style(CellStyle {
                    text_color: GREY_TEXT,
                    align: Align::Center,
                    ..CellStyle::default()
                }),
        );
        y += SUBTITLE_HEIGHT + TITLE_GAP;

        let col = layout.column_width();
        for (i, name) in self.week_start.day_names().iter().enumerate() {
            elements.push(
                PageElement::new(layout.margin + i as f64 * col, y, col, layout.header_height)
                    .text(*name)
                    .style(CellStyle {
                        fill: Some(BLUE),
                        border: Some(BLUE),
                        text_color: WHITE,
                        font_size: 10.0,
                        bold: true,
                        align: Align::Center,
                        ..CellStyle::default()
                    }),
            );
        }
        y += layout.header_height;

        let rows = grid.days.len().div_ceil(7);
        for (index, day) in grid.days.iter().enumerate() {
            let x = layout.margin + (index % 7) as f64 * col;
            let row_top = y + (index / 7) as f64 * layout.row_height;
            self.day_cell(&mut elements, grid, index, day.date, x, row_top);
        }
        y += rows as f64 * layout.row_height + TITLE_GAP;

        self.legend(&mut elements, grid, y);

        Page {
            title,
            width: layout.page_width,
            height: layout.page_height,
            elements,
        }
    }
}

impl PrintRenderer {
    pub fn new(layout: PrintLayout, week_start: WeekStart, options: ProjectionOptions) -> Self {
        Self {
            layout,
            week_start,
            options,
        }
    }

    /// Month pages for `layout.months` months from today's month, followed
    /// by the roster page.
    pub fn render_document(&self, entries: &[MedicationEntry], today: NaiveDate) -> Vec<Page> {
        let mut pages: Vec<Page> = DateRange::months_from(today, self.layout.months, self.week_start)
            .into_iter()
            .map(|range| self.render(&project(entries, range, today, &self.options)))
            .collect();
        pages.push(self.roster_page(entries, today));
        debug!(pages = pages.len(), entries = entries.len(), "rendered print document");
        pages
    }

    fn day_cell(
        &self,
        elements: &mut Vec<PageElement>,
        grid: &CalendarGrid<'_>,
        index: usize,
        date: Option<NaiveDate>,
        x: f64,
        row_top: f64,
    ) {
        let layout = &self.layout;
        let col = layout.column_width();
        let fill = match date {
            None => BLANK_FILL,
            Some(date) if date == grid.today => TODAY_FILL,
            Some(_) => WHITE,
        };
        elements.push(PageElement::new(x, row_top, col, layout.row_height).style(CellStyle {
            fill: Some(fill),
            border: Some(GRID_LINE),
            ..CellStyle::default()
        }));

        let Some(date) = date else {
            return;
        };
        elements.push(
            PageElement::new(x + 1.0, row_top + 1.0, col - 2.0, 5.0)
                .text(date.format("%-d").to_string())
                .style(CellStyle {
                    text_color: Rgb(50, 50, 50),
                    bold: true,
                    ..CellStyle::default()
                }),
        );

        // Elapsed days keep date and background only.
        if date < grid.today {
            return;
        }

        let placements = grid.entries_on(index);
        let bottom = row_top + layout.row_height - CELL_PADDING;
        let mut cursor = row_top + DAY_LABEL_HEIGHT;
        let mut drawn = 0;
        for placement in &placements {
            if cursor + layout.entry_height > bottom {
                break;
            }
            elements.push(self.marker(placement, x, cursor));
            cursor += layout.entry_height + layout.entry_gap;
            drawn += 1;
        }

        let hidden = placements.len() - drawn;
        if hidden > 0 {
            elements.push(
                PageElement::new(x + 1.0, row_top + layout.row_height - 4.0, col - 2.0, 3.0)
                    .text(format!("+{hidden} more"))
                    .style(CellStyle {
                        text_color: Rgb(150, 150, 150),
                        font_size: 5.0,
                        align: Align::Right,
                        ..CellStyle::default()
                    }),
            );
        }
    }

    fn marker(&self, placement: &Placement<'_>, x: f64, y: f64) -> PageElement {
        let entry = placement.entry;
        let name: String = entry.name.chars().take(self.layout.name_chars).collect();
        PageElement::new(x + 1.0, y, self.layout.column_width() - 2.0, self.layout.entry_height)
            .text(format!(
                "{name} {}{}",
                format_dose(placement.dose),
                entry.dose.unit
            ))
            .style(CellStyle {
                fill: Some(provenance_fill(entry.provenance)),
                text_color: Rgb(30, 30, 30),
                font_size: 5.0,
                ..CellStyle::default()
            })
    }

    fn legend(&self, elements: &mut Vec<PageElement>, grid: &CalendarGrid<'_>, y: f64) {
        let margin = self.layout.margin;
        let swatches = [
            (0.0, VERIFIED_FILL, "Database verified", 30.0),
            (40.0, MANUAL_FILL, "Manual entry", 30.0),
            (80.0, TODAY_FILL, "Today", 20.0),
        ];
        let label_style = CellStyle {
            text_color: GREY_TEXT,
            font_size: 7.0,
            ..CellStyle::default()
        };
        for (offset, fill, label, width) in swatches {
            elements.push(PageElement::new(margin + offset, y, 4.0, 4.0).style(CellStyle {
                fill: Some(fill),
                ..CellStyle::default()
            }));
            elements.push(
                PageElement::new(margin + offset + 5.0, y, width, 4.0)
                    .text(label)
                    .style(label_style.clone()),
            );
        }

        elements.push(
            PageElement::new(margin + 120.0, y, 25.0, 4.0)
                .text("Medications:")
                .style(CellStyle {
                    bold: true,
                    ..label_style.clone()
                }),
        );
        elements.push(
            PageElement::new(
                margin + 145.0,
                y,
                self.layout.page_width - 2.0 * margin - 145.0,
                4.0,
            )
            .text(medication_summary(grid))
            .style(label_style),
        );
    }

    fn roster_page(&self, entries: &[MedicationEntry], today: NaiveDate) -> Page {
        let layout = &self.layout;
        let margin = layout.margin;
        let width = layout.content_width();
        let title = "Daily Medication Schedule".to_string();
        let mut elements = Vec::new();

        elements.push(
            PageElement::new(margin, margin, width, 10.0)
                .text(title.clone())
                .style(CellStyle {
                    text_color: BLUE,
                    font_size: 16.0,
                    bold: true,
                    align: Align::Center,
                    ..CellStyle::default()
                }),
        );

        let mut y = margin + 15.0;
        let header = CellStyle {
            fill: Some(BLUE),
            border: Some(Rgb(0, 0, 0)),
            text_color: WHITE,
            font_size: 10.0,
            bold: true,
            align: Align::Center,
            ..CellStyle::default()
        };
        elements.push(PageElement::new(margin, y, 70.0, 10.0).text("Time").style(header.clone()));
        elements.push(
            PageElement::new(margin + 70.0, y, width - 70.0, 10.0)
                .text("Medications")
                .style(header),
        );
        y += 10.0;

        for slot in TimeSlot::ALL {
            elements.push(
                PageElement::new(margin, y, 70.0, 12.0)
                    .text(slot.label())
                    .style(CellStyle {
                        fill: Some(BLANK_FILL),
                        border: Some(Rgb(0, 0, 0)),
                        bold: true,
                        align: Align::Center,
                        ..CellStyle::default()
                    }),
            );
            elements.push(
                PageElement::new(margin + 70.0, y, width - 70.0, 12.0)
                    .text(slot_roster(entries, slot))
                    .style(CellStyle {
                        fill: Some(WHITE),
                        border: Some(Rgb(0, 0, 0)),
                        ..CellStyle::default()
                    }),
            );
            y += 12.0;
        }

        y += 10.0;
        elements.push(
            PageElement::new(margin, y, width, 5.0)
                .text(format!("Generated: {}", today.format("%Y-%m-%d")))
                .style(CellStyle {
                    text_color: GREY_TEXT,
                    font_size: 8.0,
                    italic: true,
                    align: Align::Center,
                    ..CellStyle::default()
                }),
        );
        y += 8.0;
        elements.push(
            PageElement::new(margin, y, width, 8.0)
                .text(PRINT_DISCLAIMER)
                .style(CellStyle {
                    fill: Some(Rgb(255, 235, 238)),
                    text_color: Rgb(198, 40, 40),
                    font_size: 7.0,
                    bold: true,
                    align: Align::Center,
                    ..CellStyle::default()
                }),
        );

        Page {
            title,
            width: layout.page_width,
            height: layout.page_height,
            elements,
        }
    }
}

fn provenance_fill(provenance: Provenance) -> Rgb {
    match provenance {
        Provenance::Verified => VERIFIED_FILL,
        Provenance::Unverified => MANUAL_FILL,
    }
}

/// `Name (10mg), Other (5mg) +2 more` over the grid's entries.
fn medication_summary(grid: &CalendarGrid<'_>) -> String {
    let mut summary = grid
        .entries
        .iter()
        .take(SUMMARY_LIMIT)
        .map(|e| format!("{} ({}{})", e.name, format_dose(e.dose.value), e.dose.unit))
        .collect::<Vec<_>>()
        .join(", ");
    if grid.entries.len() > SUMMARY_LIMIT {
        summary.push_str(&format!(" +{} more", grid.entries.len() - SUMMARY_LIMIT));
    }
    summary
}

/// `Name 10 mg, Other 5 mg` for the entries taken at `slot`, or `-`.
fn slot_roster(entries: &[MedicationEntry], slot: TimeSlot) -> String {
    let names: Vec<String> = entries
        .iter()
        .filter(|e| e.takes_at(slot))
        .map(|e| format!("{} {}", e.name, e.dose))
        .collect();
    if names.is_empty() {
        "-".to_string()
    } else {
        names.join(", ")
    }
}
