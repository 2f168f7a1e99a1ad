// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Neutral in-memory view of one spreadsheet sheet.
//!
//! Parsers operate on [`SheetGrid`] values instead of reader-specific cell
//! types, which keeps the layout algorithms independent of the workbook
//! decoder and directly testable. Cells are `Option<String>`: a missing cell
//! stays missing instead of degrading to an empty string.

use calamine::{Data, Range};

/// One sheet as an unheadered dense grid of optional text cells.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SheetGrid {
    /// Sheet name as it appeared in the workbook.
    pub name: String,
    /// Row-major cells; every row spans the full grid width.
    pub rows: Vec<Vec<Option<String>>>
}

impl SheetGrid {
    /// Creates a grid from rows of optional cell text.
    pub fn new<N>(name: N, rows: Vec<Vec<Option<String>>>) -> Self
    where
        N: Into<String>
    {
        Self {
            name: name.into(),
            rows
        }
    }

    /// Width of the grid, i.e. the widest row.
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Returns the trimmed-free cell text at `(row, column)`, if present.
    pub fn cell(&self, row: usize, column: usize) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|cells| cells.get(column))
            .and_then(|cell| cell.as_deref())
    }
}

/// Converts a decoded worksheet range into a [`SheetGrid`].
pub(crate) fn grid_from_range(name: &str, range: &Range<Data>) -> SheetGrid {
    let rows = range
        .rows()
        .map(|cells| cells.iter().map(cell_text).collect())
        .collect();

    SheetGrid::new(name, rows)
}

/// Renders one workbook cell as text, treating empty cells as missing.
///
/// Values pass through with their native cell typing: strings verbatim,
/// integers and booleans via their canonical spelling, and floats without a
/// decimal point when the value is integral (a "2.0" version cell reads back
/// as "2"). Date cells render in ISO form when the serial converts, falling
/// back to the raw serial number. Cells holding spreadsheet error markers
/// carry no usable value and count as missing.
pub(crate) fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(value) => Some(value.clone()),
        Data::Int(value) => Some(value.to_string()),
        Data::Float(value) => Some(format_float(*value)),
        Data::Bool(value) => Some(value.to_string()),
        Data::DateTime(value) => Some(
            value
                .as_datetime()
                .map(|datetime| datetime.to_string())
                .unwrap_or_else(|| value.as_f64().to_string())
        ),
        Data::DateTimeIso(value) => Some(value.clone()),
        Data::DurationIso(value) => Some(value.clone()),
        Data::Error(_) => None
    }
}

fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < i64::MAX as f64 {
        (value as i64).to_string()
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use calamine::Data;

    use super::{cell_text, SheetGrid};

    #[test]
    fn column_count_takes_the_widest_row() {
        let grid = SheetGrid::new(
            "EIM0001",
            vec![
                vec![Some("a".to_string())],
                vec![Some("b".to_string()), Some("c".to_string())],
            ]
        );
        assert_eq!(grid.column_count(), 2);
    }

    #[test]
    fn cell_returns_none_outside_the_grid() {
        let grid = SheetGrid::new("s", vec![vec![Some("a".to_string())]]);
        assert_eq!(grid.cell(0, 0), Some("a"));
        assert_eq!(grid.cell(0, 5), None);
        assert_eq!(grid.cell(5, 0), None);
    }

    #[test]
    fn empty_cells_are_missing_not_blank() {
        assert_eq!(cell_text(&Data::Empty), None);
    }

    #[test]
    fn strings_pass_through_verbatim() {
        assert_eq!(
            cell_text(&Data::String(" padded ".to_string())),
            Some(" padded ".to_string())
        );
    }

    #[test]
    fn integral_floats_render_without_decimal_point() {
        assert_eq!(cell_text(&Data::Float(2.0)), Some("2".to_string()));
        assert_eq!(cell_text(&Data::Float(-14.0)), Some("-14".to_string()));
    }

    #[test]
    fn fractional_floats_keep_their_fraction() {
        assert_eq!(cell_text(&Data::Float(2.5)), Some("2.5".to_string()));
    }

    #[test]
    fn integers_and_booleans_use_canonical_spellings() {
        assert_eq!(cell_text(&Data::Int(7)), Some("7".to_string()));
        assert_eq!(cell_text(&Data::Bool(true)), Some("true".to_string()));
    }

    #[test]
    fn iso_values_pass_through() {
        assert_eq!(
            cell_text(&Data::DateTimeIso("2025-03-01T00:00:00".to_string())),
            Some("2025-03-01T00:00:00".to_string())
        );
    }
}
