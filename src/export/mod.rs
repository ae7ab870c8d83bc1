use crate::schedule::{DAYS_OF_WEEK, ScheduleData, cell_text, weekday_name};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod csv;
pub mod xlsx;

/// Columns never shrink below this width.
pub const MIN_COLUMN_WIDTH: usize = 10;
/// Padding added on top of the longest cell in a column.
pub const COLUMN_PADDING: usize = 5;
/// Date header labels count as this length for sizing, whatever their text.
pub const DATE_LABEL_LEN: usize = 10;

#[derive(Debug)]
pub enum ExportError {
    Workbook(rust_xlsxwriter::XlsxError),
    Csv(::csv::Error),
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::Workbook(err) => write!(f, "workbook generation failed: {err}"),
            ExportError::Csv(err) => write!(f, "csv generation failed: {err}"),
        }
    }
}

impl std::error::Error for ExportError {}

impl From<rust_xlsxwriter::XlsxError> for ExportError {
    fn from(value: rust_xlsxwriter::XlsxError) -> Self {
        Self::Workbook(value)
    }
}

impl From<::csv::Error> for ExportError {
    fn from(value: ::csv::Error) -> Self {
        Self::Csv(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fill {
    HeaderBlue,
    Yellow,
    Orange,
    Red,
}

impl Fill {
    pub fn rgb(self) -> u32 {
        match self {
            Fill::HeaderBlue => 0xADD8E6,
            Fill::Yellow => 0xF5F580,
            Fill::Orange => 0xFFBE4D,
            Fill::Red => 0xFD594D,
        }
    }
}

/// Fill for a section row, chosen by case-insensitive substring on the
/// section name. Unmatched sections get no fill.
pub fn fill_for_section(name: &str) -> Option<Fill> {
    let name = name.to_lowercase();
    if name.contains("lunch") {
        Some(Fill::Yellow)
    } else if name.contains("bothams") {
        Some(Fill::Orange)
    } else if name.contains("hole") {
        Some(Fill::Red)
    } else {
        None
    }
}

/// One section row: the section name, seven day cells in canonical weekday
/// order, and the fill applied across the row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetRow {
    pub section: String,
    pub cells: Vec<String>,
    pub fill: Option<Fill>,
}

/// Immutable description of the schedule worksheet, decoupled from any
/// spreadsheet library. Styling decisions live here; byte encoding lives in
/// [`xlsx::write_workbook`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleSheet {
    pub header: Vec<String>,
    pub rows: Vec<SheetRow>,
    pub column_widths: Vec<f64>,
}

/// Build the worksheet description: `["Shifts", ...dates]` header, then one
/// row per section in map insertion order.
///
/// Header cells carry the labels the client sent; row cells are indexed by
/// canonical weekday name. The two line up only when the caller supplies
/// seven labels, which is what the front end does.
pub fn build_schedule_sheet(dates: &[String], data: &ScheduleData) -> ScheduleSheet {
    let mut header = Vec::with_capacity(dates.len() + 1);
    header.push("Shifts".to_string());
    header.extend(dates.iter().cloned());

    let mut rows = Vec::with_capacity(data.len());
    for (section, days) in data {
        let cells = DAYS_OF_WEEK
            .iter()
            .map(|day| cell_text(days.get(weekday_name(*day))))
            .collect();
        rows.push(SheetRow {
            section: section.clone(),
            cells,
            fill: fill_for_section(section),
        });
    }

    let column_widths = column_widths(&header, &rows);
    ScheduleSheet {
        header,
        rows,
        column_widths,
    }
}

fn column_widths(header: &[String], rows: &[SheetRow]) -> Vec<f64> {
    let columns = header.len().max(
        rows.iter()
            .map(|row| row.cells.len() + 1)
            .max()
            .unwrap_or(0),
    );

    let mut widths = Vec::with_capacity(columns);
    for col in 0..columns {
        let mut max_len = 0usize;
        if col < header.len() {
            max_len = if col == 0 {
                header[col].len()
            } else {
                DATE_LABEL_LEN
            };
        }
        for row in rows {
            let len = if col == 0 {
                row.section.len()
            } else {
                row.cells.get(col - 1).map(String::len).unwrap_or(0)
            };
            max_len = max_len.max(len);
        }
        let padded = max_len + COLUMN_PADDING;
        widths.push(padded.max(MIN_COLUMN_WIDTH) as f64);
    }
    widths
}
