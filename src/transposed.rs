// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Parser for the transposed registry layout.
//!
//! In this layout column 0 of every sheet holds field labels top-to-bottom
//! and each further column holds one record, its values aligned to the
//! labels by row position. Sheet names carry the EIM identifier of the
//! application the sheet describes; the identifier is stamped onto every
//! record emitted from that sheet.

use tracing::debug;

use crate::{
    fields::{canonical_field, EIM_ID},
    record::{ApiRecord, RepositoryGroups},
    sheet::SheetGrid
};

/// Parses every sheet of a transposed workbook and groups the emitted
/// records by normalized repository identity.
///
/// Sheets are processed in workbook order and data columns left to right,
/// so group members keep source encounter order. An empty result is not an
/// error: a workbook without a single qualifying record simply yields an
/// empty group map and the caller decides how to degrade.
pub fn parse_transposed_sheets(sheets: &[SheetGrid]) -> RepositoryGroups {
    let mut emitted = Vec::new();

    for sheet in sheets {
        let records = parse_transposed_sheet(sheet);
        debug!(
            sheet = %sheet.name,
            records = records.len(),
            "parsed transposed sheet"
        );
        emitted.extend(records);
    }

    RepositoryGroups::from_records(emitted)
}

/// Parses one transposed sheet into records, in column order.
///
/// Sheets with fewer than two columns carry no data columns and are skipped
/// without error. A `(label, value)` pair contributes to a record only when
/// both cells are present; a missing label or a missing value skips the row
/// rather than defaulting to an empty string. When two labels map onto the
/// same canonical key the later row's value wins. Only records carrying a
/// non-empty repository URL are emitted.
pub fn parse_transposed_sheet(grid: &SheetGrid) -> Vec<ApiRecord> {
    let columns = grid.column_count();
    if columns < 2 {
        debug!(sheet = %grid.name, "skipping sheet without data columns");
        return Vec::new();
    }

    let eim_id = grid.name.trim();
    let mut records = Vec::new();

    for column in 1..columns {
        let mut record = ApiRecord::new();

        for row in &grid.rows {
            let label = row.first().and_then(|cell| cell.as_deref());
            let value = row.get(column).and_then(|cell| cell.as_deref());

            if let (Some(label), Some(value)) = (label, value) {
                record.insert(canonical_field(label), value);
            }
        }

        if record.has_repository_url() {
            record.insert(EIM_ID, eim_id);
            records.push(record);
        }
    }

    records
}
