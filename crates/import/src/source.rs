//! Document readers. Each one turns a file format into a [`RawGrid`]; the
//! rest of the engine never sees the format.

use std::io::Read;
use std::path::Path;
use thiserror::Error;

use crate::grid::{Cell, RawGrid};

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Workbook error: {0}")]
    Workbook(String),
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),
}

const DELIMITERS: [u8; 3] = [b';', b',', b'\t'];
const SNIFF_LINES: usize = 10;

/// Reads delimited text. The delimiter is whichever of `;`, `,` and tab
/// occurs most often over the first few non-empty lines.
pub fn read_csv<R: Read>(mut data: R) -> Result<RawGrid, SourceError> {
    let mut bytes = Vec::new();
    data.read_to_end(&mut bytes)?;
    let content = String::from_utf8_lossy(&bytes);
    let content = content.strip_prefix('\u{feff}').unwrap_or(&content);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(sniff_delimiter(content))
        .from_reader(content.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(|field| Cell::from(field.trim())).collect());
    }
    Ok(RawGrid::from_rows(rows))
}

fn sniff_delimiter(content: &str) -> u8 {
    let sample: Vec<&str> = content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .take(SNIFF_LINES)
        .collect();
    DELIMITERS
        .iter()
        .enumerate()
        .map(|(rank, d)| {
            let count: usize = sample.iter().map(|l| l.bytes().filter(|b| b == d).count()).sum();
            (count, std::cmp::Reverse(rank), *d)
        })
        .filter(|(count, _, _)| *count > 0)
        .max()
        .map(|(_, _, d)| d)
        .unwrap_or(b',')
}

/// Reads the first worksheet of a spreadsheet. Date cells arrive as their
/// day serial so the normalizer treats them like any other serial.
#[cfg(feature = "xlsx")]
pub fn read_workbook(path: &Path) -> Result<RawGrid, SourceError> {
    use calamine::{open_workbook_auto, Data, Reader};

    let mut workbook =
        open_workbook_auto(path).map_err(|e| SourceError::Workbook(e.to_string()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| SourceError::Workbook("workbook has no worksheets".to_string()))?
        .map_err(|e| SourceError::Workbook(e.to_string()))?;

    let rows = range
        .rows()
        .map(|row| {
            row.iter()
                .map(|data| match data {
                    Data::Int(i) => Cell::Number(*i as f64),
                    Data::Float(f) => Cell::Number(*f),
                    Data::DateTime(dt) => Cell::Number(dt.as_f64()),
                    Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => {
                        Cell::from(s.trim())
                    }
                    Data::Bool(b) => Cell::text(b.to_string()),
                    Data::Error(_) | Data::Empty => Cell::Empty,
                })
                .collect()
        })
        .collect();
    Ok(RawGrid::from_rows(rows))
}

/// Picks a reader by file extension.
pub fn read_path(path: &Path) -> Result<RawGrid, SourceError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" | "txt" => read_csv(std::fs::File::open(path)?),
        #[cfg(feature = "xlsx")]
        "xlsx" | "xls" | "xlsm" | "ods" => read_workbook(path),
        other => Err(SourceError::UnsupportedFormat(other.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    // ── delimiter sniffing ────────────────────────────────────────────────────

    #[test]
    fn sniffs_semicolon_over_decimal_commas() {
        assert_eq!(sniff_delimiter("\n\nДата;Сумма;Описание\n01.03.2024;-1,50;x"), b';');
    }

    #[test]
    fn sniffs_tab_and_comma() {
        assert_eq!(sniff_delimiter("Date\tAmount\tNote"), b'\t');
        assert_eq!(sniff_delimiter("Date,Amount,Note"), b',');
        assert_eq!(sniff_delimiter("single column"), b',');
        assert_eq!(sniff_delimiter(""), b',');
    }

    // ── read_csv ──────────────────────────────────────────────────────────────

    #[test]
    fn reads_flexible_rows_and_strips_bom() {
        let data = "\u{feff}Выписка\nДата;Сумма;Описание\n01.03.2024;-1 500,00;\"Кафе; бар\"\n";
        let grid = read_csv(data.as_bytes()).unwrap();
        assert_eq!(grid.len(), 3);
        assert_eq!(grid.cell(0, 0), &Cell::text("Выписка"));
        assert_eq!(grid.cell(1, 0), &Cell::text("Дата"));
        assert_eq!(grid.cell(2, 1), &Cell::text("-1 500,00"));
        assert_eq!(grid.cell(2, 2), &Cell::text("Кафе; бар"));
    }

    #[test]
    fn empty_fields_become_empty_cells() {
        let grid = read_csv("a,,c\n".as_bytes()).unwrap();
        assert_eq!(grid.cell(0, 1), &Cell::Empty);
    }

    // ── read_path ─────────────────────────────────────────────────────────────

    #[test]
    fn read_path_dispatches_on_extension() {
        let mut file = tempfile::Builder::new().suffix(".CSV").tempfile().unwrap();
        writeln!(file, "Date,Amount\n2024-03-01,-5").unwrap();
        let grid = read_path(file.path()).unwrap();
        assert_eq!(grid.len(), 2);
    }

    #[test]
    fn read_path_rejects_unknown_extension() {
        let file = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
        assert!(matches!(read_path(file.path()), Err(SourceError::UnsupportedFormat(ext)) if ext == "pdf"));
    }

    #[test]
    fn read_path_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("statement.csv");
        assert!(matches!(read_path(&missing), Err(SourceError::Io(_))));
    }

    #[cfg(feature = "xlsx")]
    #[test]
    fn broken_workbook_is_reported() {
        let mut file = tempfile::Builder::new().suffix(".xlsx").tempfile().unwrap();
        file.write_all(b"not a zip archive").unwrap();
        assert!(matches!(read_path(file.path()), Err(SourceError::Workbook(_))));
    }
}
