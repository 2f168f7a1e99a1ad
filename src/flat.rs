// SPDX-FileCopyrightText: 2025 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Parser for the legacy row-per-record registry layout.
//!
//! The legacy format is a flat table: a header row naming the fields and one
//! record per data row. Unlike the transposed layout there is nothing to
//! pre-group; lookups scan the table and compare a derived normalized URL
//! column against the normalized query.

use std::io::Read;

use tracing::debug;

use crate::{
    error::Error,
    fields::REPOSITORY_URL,
    normalizer::{normalize_opt_repo_url, normalize_repo_url},
    record::ApiRecord,
    sheet::SheetGrid
};

/// Columns always copied into a canonical record when present.
const REQUIRED_COLUMNS: [&str; 7] = [
    REPOSITORY_URL,
    "api_technical_name",
    "version",
    "snow_business_application_id",
    "platform",
    "lifecycle_status",
    "classification"
];

/// Columns copied only when present and non-empty.
const OPTIONAL_COLUMNS: [&str; 3] = ["description", "owner_team", "contact_email"];

/// A row-per-record table with named columns.
///
/// The table keeps rows verbatim; canonical records are materialized only
/// for rows matching a lookup, preserving row order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatTable {
    headers: Vec<String>,
    rows:    Vec<Vec<Option<String>>>
}

impl FlatTable {
    /// Builds a table from an unheadered grid, consuming the first row as
    /// the header row.
    ///
    /// Missing header cells become unnamed columns that no lookup can
    /// address; their values are retained but never copied into records.
    pub fn from_grid(grid: &SheetGrid) -> Self {
        let mut rows = grid.rows.iter();
        let headers = rows
            .next()
            .map(|cells| {
                cells
                    .iter()
                    .map(|cell| cell.as_deref().unwrap_or_default().trim().to_owned())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            headers,
            rows: rows.cloned().collect()
        }
    }

    /// Reads a table from CSV bytes.
    ///
    /// Empty CSV fields become missing cells, matching the way workbook
    /// readers report blank cells. Ragged rows are tolerated; short rows
    /// simply have no value for the trailing columns.
    ///
    /// # Errors
    ///
    /// Propagates [`Error::Csv`](Error::Csv) when the reader cannot decode
    /// the header row or a data row.
    pub fn from_csv<R>(reader: R) -> Result<Self, Error>
    where
        R: Read
    {
        let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);

        let headers = csv_reader
            .headers()?
            .iter()
            .map(|header| header.trim().to_owned())
            .collect();

        let mut rows = Vec::new();
        for row in csv_reader.records() {
            let row = row?;
            rows.push(
                row.iter()
                    .map(|field| {
                        if field.is_empty() {
                            None
                        } else {
                            Some(field.to_owned())
                        }
                    })
                    .collect()
            );
        }

        Ok(Self {
            headers,
            rows
        })
    }

    /// Column headers in table order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Finds every record whose repository URL normalizes to the query's
    /// normalized identity, in row order.
    ///
    /// An empty match list is "not found", not an error.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingColumn`](Error::MissingColumn) when the table
    /// has no `repository_url` column; without it the table is unusable for
    /// lookups, which is a different condition than zero matching rows.
    pub fn find(&self, query_url: &str) -> Result<Vec<ApiRecord>, Error> {
        let repo_column = self
            .headers
            .iter()
            .position(|header| header == REPOSITORY_URL)
            .ok_or_else(|| Error::missing_column(REPOSITORY_URL))?;

        let normalized_query = normalize_repo_url(query_url);
        let mut matches = Vec::new();

        for row in &self.rows {
            let candidate = row.get(repo_column).and_then(|cell| cell.as_deref());
            if normalize_opt_repo_url(candidate) != normalized_query {
                continue;
            }
            matches.push(self.record_from_row(row));
        }

        debug!(
            query = %normalized_query,
            matches = matches.len(),
            rows = self.rows.len(),
            "scanned flat table"
        );

        Ok(matches)
    }

    fn record_from_row(&self, row: &[Option<String>]) -> ApiRecord {
        let mut record = ApiRecord::new();

        for column in REQUIRED_COLUMNS {
            if let Some(value) = self.cell_for(row, column) {
                record.insert(column, value);
            }
        }

        for column in OPTIONAL_COLUMNS {
            if let Some(value) = self.cell_for(row, column).filter(|value| !value.is_empty()) {
                record.insert(column, value);
            }
        }

        record
    }

    fn cell_for<'row>(&self, row: &'row [Option<String>], column: &str) -> Option<&'row str> {
        let index = self.headers.iter().position(|header| header == column)?;
        row.get(index).and_then(|cell| cell.as_deref())
    }
}
