//! Registry loading and source-shape selection.
//!
//! The loader hides the two supported spreadsheet layouts behind a single
//! [`RegistryView`] sum type. Selection is driven by file extension and
//! workbook shape: CSV files are always flat tables, multi-sheet workbooks
//! are treated as transposed with a silent fallback to the first sheet when
//! the transposed parse yields nothing, and single-sheet workbooks go
//! straight to the flat path.

use std::{
    fs,
    io::Cursor,
    path::Path
};

use calamine::{open_workbook_auto_from_rs, Reader};
use tracing::{debug, info};

use crate::{
    error::{io_error, Error},
    flat::FlatTable,
    record::RepositoryGroups,
    sheet::{grid_from_range, SheetGrid},
    transposed::parse_transposed_sheets
};

/// Registry data in one of the two supported shapes.
///
/// Downstream lookups branch on the variant instead of inspecting the data
/// shape at every call site.
#[derive(Debug, Clone)]
pub enum RegistryView {
    /// Records already grouped by normalized repository identity.
    Grouped(RepositoryGroups),
    /// A row-per-record table scanned at lookup time.
    Flat(FlatTable)
}

/// File formats accepted by the loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    /// Comma-separated values; always a flat table.
    Csv,
    /// Office Open XML workbook.
    Xlsx,
    /// Legacy binary Excel workbook.
    Xls
}

impl SourceFormat {
    /// Derives the format from a file path's extension.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedFormat`](Error::UnsupportedFormat) when
    /// the extension is absent or not one of `.csv`, `.xlsx`, `.xls`.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .unwrap_or_default()
            .to_lowercase();

        match extension.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" => Ok(Self::Xlsx),
            "xls" => Ok(Self::Xls),
            _ => Err(Error::UnsupportedFormat {
                extension
            })
        }
    }
}

/// Loads a registry file from disk.
///
/// # Errors
///
/// Returns [`Error::Io`](Error::Io) when the file cannot be read,
/// [`Error::UnsupportedFormat`](Error::UnsupportedFormat) for unknown
/// extensions, and decode errors from the underlying readers. Callers are
/// expected to degrade every failure to "no data available".
pub fn load_registry_path(path: &Path) -> Result<RegistryView, Error> {
    let format = SourceFormat::from_path(path)?;
    let bytes = fs::read(path).map_err(|source| io_error(path, source))?;
    info!(path = %path.display(), ?format, "loading registry file");
    load_registry_bytes(&bytes, format)
}

/// Loads a registry from an in-memory buffer, e.g. an uploaded or remotely
/// fetched file.
///
/// # Errors
///
/// Propagates decode errors from the csv or workbook readers.
pub fn load_registry_bytes(bytes: &[u8], format: SourceFormat) -> Result<RegistryView, Error> {
    match format {
        SourceFormat::Csv => {
            let table = FlatTable::from_csv(bytes)?;
            debug!(rows = table.row_count(), "loaded csv registry");
            Ok(RegistryView::Flat(table))
        }
        SourceFormat::Xlsx | SourceFormat::Xls => load_workbook(bytes)
    }
}

fn load_workbook(bytes: &[u8]) -> Result<RegistryView, Error> {
    let cursor = Cursor::new(bytes.to_vec());
    let mut workbook =
        open_workbook_auto_from_rs(cursor).map_err(|error| Error::workbook(error.to_string()))?;

    let sheet_names = workbook.sheet_names().to_owned();
    if sheet_names.is_empty() {
        return Err(Error::workbook("workbook contains no sheets"));
    }

    let mut grids = Vec::with_capacity(sheet_names.len());
    for name in &sheet_names {
        let range = workbook
            .worksheet_range(name)
            .map_err(|error| Error::workbook(error.to_string()))?;
        grids.push(grid_from_range(name, &range));
    }

    if grids.len() > 1 {
        info!(sheets = grids.len(), "multi-sheet workbook, trying transposed layout");
        let groups = parse_transposed_sheets(&grids);
        if !groups.is_empty() {
            info!(
                repositories = groups.len(),
                records = groups.record_count(),
                "parsed transposed registry"
            );
            return Ok(RegistryView::Grouped(groups));
        }
        info!("transposed parse yielded no groups, falling back to flat layout");
    }

    Ok(RegistryView::Flat(flat_from_first_sheet(&grids)))
}

fn flat_from_first_sheet(grids: &[SheetGrid]) -> FlatTable {
    grids.first().map(FlatTable::from_grid).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::{load_registry_bytes, load_registry_path, RegistryView, SourceFormat};
    use crate::error::Error;

    /// Assembles a minimal xlsx workbook with inline-string cells.
    ///
    /// Each sheet is `(name, rows)`; rows are cell values in column order
    /// with `None` marking a blank cell.
    fn workbook_bytes(sheets: &[(&str, Vec<Vec<Option<&str>>>)]) -> Vec<u8> {
        let mut content_types = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\">\
             <Default Extension=\"rels\" ContentType=\"application/vnd.openxmlformats-package.relationships+xml\"/>\
             <Default Extension=\"xml\" ContentType=\"application/xml\"/>\
             <Override PartName=\"/xl/workbook.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml\"/>"
        );
        let mut workbook_xml = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <workbook xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\" \
             xmlns:r=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships\"><sheets>"
        );
        let mut workbook_rels = String::from(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">"
        );

        for (index, (name, _)) in sheets.iter().enumerate() {
            let sheet_number = index + 1;
            content_types.push_str(&format!(
                "<Override PartName=\"/xl/worksheets/sheet{sheet_number}.xml\" \
                 ContentType=\"application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml\"/>"
            ));
            workbook_xml.push_str(&format!(
                "<sheet name=\"{name}\" sheetId=\"{sheet_number}\" r:id=\"rId{sheet_number}\"/>"
            ));
            workbook_rels.push_str(&format!(
                "<Relationship Id=\"rId{sheet_number}\" \
                 Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet\" \
                 Target=\"worksheets/sheet{sheet_number}.xml\"/>"
            ));
        }
        content_types.push_str("</Types>");
        workbook_xml.push_str("</sheets></workbook>");
        workbook_rels.push_str("</Relationships>");

        let root_rels = "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <Relationships xmlns=\"http://schemas.openxmlformats.org/package/2006/relationships\">\
             <Relationship Id=\"rId1\" \
             Type=\"http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument\" \
             Target=\"xl/workbook.xml\"/></Relationships>";

        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();

        let mut write_entry = |path: &str, body: &str| {
            writer.start_file(path, options).expect("zip entry should start");
            writer.write_all(body.as_bytes()).expect("zip entry should write");
        };

        write_entry("[Content_Types].xml", &content_types);
        write_entry("_rels/.rels", root_rels);
        write_entry("xl/workbook.xml", &workbook_xml);
        write_entry("xl/_rels/workbook.xml.rels", &workbook_rels);

        for (index, (_, rows)) in sheets.iter().enumerate() {
            let mut sheet_xml = String::from(
                "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
                 <worksheet xmlns=\"http://schemas.openxmlformats.org/spreadsheetml/2006/main\">\
                 <sheetData>"
            );
            for (row_index, row) in rows.iter().enumerate() {
                sheet_xml.push_str(&format!("<row r=\"{}\">", row_index + 1));
                for (column_index, cell) in row.iter().enumerate() {
                    if let Some(value) = cell {
                        let reference = format!(
                            "{}{}",
                            char::from(b'A' + column_index as u8),
                            row_index + 1
                        );
                        sheet_xml.push_str(&format!(
                            "<c r=\"{reference}\" t=\"inlineStr\"><is><t>{value}</t></is></c>"
                        ));
                    }
                }
                sheet_xml.push_str("</row>");
            }
            sheet_xml.push_str("</sheetData></worksheet>");
            write_entry(&format!("xl/worksheets/sheet{}.xml", index + 1), &sheet_xml);
        }

        writer.finish().expect("zip should finish").into_inner()
    }

    #[test]
    fn source_format_is_derived_from_the_extension() {
        use std::path::Path;

        assert_eq!(
            SourceFormat::from_path(Path::new("data.CSV")).expect("csv should resolve"),
            SourceFormat::Csv
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("data.xlsx")).expect("xlsx should resolve"),
            SourceFormat::Xlsx
        );
        assert_eq!(
            SourceFormat::from_path(Path::new("data.xls")).expect("xls should resolve"),
            SourceFormat::Xls
        );
    }

    #[test]
    fn unknown_extensions_are_rejected() {
        use std::path::Path;

        let error = SourceFormat::from_path(Path::new("data.ods")).expect_err("expected rejection");
        assert!(matches!(error, Error::UnsupportedFormat { .. }));

        let error = SourceFormat::from_path(Path::new("data")).expect_err("expected rejection");
        assert!(matches!(error, Error::UnsupportedFormat { .. }));
    }

    #[test]
    fn csv_files_always_load_as_flat_tables() {
        let mut file = NamedTempFile::with_suffix(".csv").expect("temp file should create");
        write!(file, "repository_url,version\nhttps://x.com/a,1.0\n")
            .expect("fixture should write");

        let view = load_registry_path(file.path()).expect("load should succeed");
        match view {
            RegistryView::Flat(table) => assert_eq!(table.row_count(), 1),
            RegistryView::Grouped(_) => panic!("csv must not group")
        }
    }

    #[test]
    fn missing_files_surface_io_errors() {
        let error = load_registry_path(std::path::Path::new("/nonexistent/registry.csv"))
            .expect_err("expected io error");
        assert!(matches!(error, Error::Io { .. }));
    }

    #[test]
    fn multi_sheet_workbooks_parse_as_transposed() {
        let bytes = workbook_bytes(&[
            (
                "EIM0001",
                vec![
                    vec![Some("API Repo"), Some("https://x.com/a")],
                    vec![Some("version"), Some("1.0")],
                ]
            ),
            (
                "EIM0002",
                vec![
                    vec![Some("apiId"), Some("https://x.com/a.git")],
                    vec![Some("version"), Some("2.0")],
                ]
            ),
        ]);

        let view = load_registry_bytes(&bytes, SourceFormat::Xlsx).expect("load should succeed");
        match view {
            RegistryView::Grouped(groups) => {
                assert_eq!(groups.len(), 1);
                let members = groups.get("https://x.com/a").expect("group should exist");
                assert_eq!(members.len(), 2);
                assert_eq!(members[0].get("eim_id"), Some("EIM0001"));
                assert_eq!(members[1].get("eim_id"), Some("EIM0002"));
            }
            RegistryView::Flat(_) => panic!("multi-sheet workbook must group")
        }
    }

    #[test]
    fn single_sheet_workbooks_load_as_flat_tables() {
        let bytes = workbook_bytes(&[(
            "Sheet1",
            vec![
                vec![Some("repository_url"), Some("version")],
                vec![Some("https://x.com/a"), Some("1.0")],
            ]
        )]);

        let view = load_registry_bytes(&bytes, SourceFormat::Xlsx).expect("load should succeed");
        match view {
            RegistryView::Flat(table) => {
                let matches = table.find("https://x.com/a").expect("lookup should succeed");
                assert_eq!(matches.len(), 1);
            }
            RegistryView::Grouped(_) => panic!("single-sheet workbook must stay flat")
        }
    }

    #[test]
    fn empty_transposed_parse_falls_back_to_the_first_sheet() {
        // Two sheets, but column 0 never holds a label that maps onto
        // repository_url, so the transposed pass yields nothing and the
        // first sheet is re-read as a flat table.
        let bytes = workbook_bytes(&[
            (
                "Sheet1",
                vec![
                    vec![Some("api_technical_name"), Some("repository_url"), Some("version")],
                    vec![Some("payments-api"), Some("https://x.com/a"), Some("1.0")],
                ]
            ),
            ("Notes", vec![vec![Some("free text")]]),
        ]);

        let view = load_registry_bytes(&bytes, SourceFormat::Xlsx).expect("load should succeed");
        match view {
            RegistryView::Flat(table) => {
                let matches = table.find("https://x.com/a").expect("lookup should succeed");
                assert_eq!(matches.len(), 1);
            }
            RegistryView::Grouped(_) => panic!("fallback should produce a flat view")
        }
    }

    #[test]
    fn corrupt_workbooks_degrade_to_an_error_not_a_panic() {
        let error = load_registry_bytes(b"definitely not a workbook", SourceFormat::Xlsx)
            .expect_err("expected decode failure");
        assert!(matches!(error, Error::Workbook { .. }));
    }
}
