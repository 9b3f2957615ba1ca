//! Rate tables from `.xlsx` / `.xls` workbooks.

use std::io::Cursor;

use calamine::{Data, Reader};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use tracing::{debug, trace};

use super::{normalize_rate, row_key, Result};
use crate::error::TableError;
use crate::models::rates::{format_percent, RateEntry, RateTable};

const CODE_HEADERS: &[&str] = &["hsn", "hsn code", "hsn/sac", "hsn/sac code", "chapter/head"];

const DESCRIPTION_HEADERS: &[&str] = &[
    "description",
    "goods",
    "service description",
    "item description",
    "description of goods",
];

const RATE_HEADERS: &[&str] = &["rate", "gst rate", "tax rate", "rate (%)", "igst", "total gst"];

/// Rows scanned for a header before a sheet is given up on.
const HEADER_SCAN_ROWS: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Columns {
    code: Option<usize>,
    description: Option<usize>,
    rate: usize,
}

/// Parse every worksheet of a workbook into one rate table.
///
/// Later rows win on key collisions, across sheets too.
pub fn parse_spreadsheet(content: &[u8]) -> Result<RateTable> {
    let mut workbook = calamine::open_workbook_auto_from_rs(Cursor::new(content.to_vec()))
        .map_err(|e| TableError::Spreadsheet(e.to_string()))?;

    let mut table = RateTable::new();
    for name in workbook.sheet_names() {
        let range = match workbook.worksheet_range(&name) {
            Ok(range) => range,
            Err(e) => {
                debug!("Skipping sheet {:?}: {}", name, e);
                continue;
            }
        };

        let rows: Vec<&[Data]> = range.rows().collect();
        let Some((header_row, columns)) = find_header(&rows) else {
            debug!("Sheet {:?} has no recognisable rate columns", name);
            continue;
        };

        let before = table.len();
        for row in &rows[header_row + 1..] {
            if let Some((key, entry)) = parse_row(row, columns) {
                table.insert(key, entry);
            }
        }
        debug!("Sheet {:?}: {} new keys", name, table.len().saturating_sub(before));
    }

    Ok(table)
}

/// First row (within the scan window) naming a rate column plus a code or
/// description column.
fn find_header(rows: &[&[Data]]) -> Option<(usize, Columns)> {
    rows.iter()
        .take(HEADER_SCAN_ROWS)
        .enumerate()
        .find_map(|(idx, row)| detect_columns(row).map(|cols| (idx, cols)))
}

fn detect_columns(row: &[Data]) -> Option<Columns> {
    let headers: Vec<String> = row.iter().map(|c| cell_text(c).to_lowercase()).collect();
    let pick = |aliases: &[&str]| {
        aliases
            .iter()
            .find_map(|alias| headers.iter().position(|h| h == alias))
    };

    let rate = pick(RATE_HEADERS)?;
    let code = pick(CODE_HEADERS);
    let description = pick(DESCRIPTION_HEADERS);
    if code.is_none() && description.is_none() {
        return None;
    }

    Some(Columns {
        code,
        description,
        rate,
    })
}

fn parse_row(row: &[Data], columns: Columns) -> Option<(String, RateEntry)> {
    let column_text = |idx: Option<usize>| {
        idx.and_then(|i| row.get(i))
            .map(cell_text)
            .unwrap_or_default()
    };

    let code = column_text(columns.code);
    let description = column_text(columns.description).to_lowercase();
    let rate = normalize_rate(&rate_text(row.get(columns.rate)?))?;

    let key = row_key(&code, &description)?;
    trace!("Row {} -> {}", key, rate);
    Some((key, RateEntry::new(description, rate)))
}

/// Natural text of a cell; whole floats render without a fraction.
fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

/// Rate cell text; a numeric fraction such as `0.18` is read as 18%.
fn rate_text(cell: &Data) -> String {
    match cell {
        Data::Float(f) if *f > 0.0 && *f < 1.0 => Decimal::from_f64(f * 100.0)
            .map(|d| format_percent(d.round_dp(4)))
            .unwrap_or_default(),
        other => cell_text(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_xlsxwriter::Workbook;

    fn workbook_bytes(rows: &[(&str, &str, &str)]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        for (r, (a, b, c)) in rows.iter().enumerate() {
            sheet.write_string(r as u32, 0, *a).unwrap();
            sheet.write_string(r as u32, 1, *b).unwrap();
            sheet.write_string(r as u32, 2, *c).unwrap();
        }
        workbook.save_to_buffer().unwrap()
    }

    #[test]
    fn test_parses_code_description_rate_sheet() {
        let bytes = workbook_bytes(&[
            ("HSN Code", "Description of Goods", "GST Rate"),
            ("8471", "Automatic Data Processing Machines", "18%"),
            ("", "Fresh Milk", "Nil / 0%"),
            ("Chapter 99", "Restaurant Service", "5"),
            ("1006", "Rice", "no rate"),
        ]);

        let table = parse_spreadsheet(&bytes).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(
            table.get("8471"),
            Some(&RateEntry::new("automatic data processing machines", "18%"))
        );
        assert_eq!(table.get("fresh milk").map(|e| e.rate.as_str()), Some("0%"));
        assert_eq!(table.get("restaurant service").map(|e| e.rate.as_str()), Some("5%"));
        assert!(table.get("1006").is_none());
    }

    #[test]
    fn test_numeric_cells() {
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, "HSN").unwrap();
        sheet.write_string(0, 1, "Description").unwrap();
        sheet.write_string(0, 2, "Rate").unwrap();
        sheet.write_number(1, 0, 8471.0).unwrap();
        sheet.write_string(1, 1, "Computers").unwrap();
        sheet.write_number(1, 2, 0.18).unwrap();
        sheet.write_number(2, 0, 3004.0).unwrap();
        sheet.write_string(2, 1, "Medicaments").unwrap();
        sheet.write_number(2, 2, 12.0).unwrap();
        let bytes = workbook.save_to_buffer().unwrap();

        let table = parse_spreadsheet(&bytes).unwrap();
        assert_eq!(table.get("8471").map(|e| e.rate.as_str()), Some("18%"));
        assert_eq!(table.get("3004").map(|e| e.rate.as_str()), Some("12%"));
    }

    #[test]
    fn test_header_below_title_rows() {
        let bytes = workbook_bytes(&[
            ("GST Rates 2025", "", ""),
            ("", "", ""),
            ("HSN/SAC", "Goods", "IGST"),
            ("0401", "Milk", "0%"),
        ]);

        let table = parse_spreadsheet(&bytes).unwrap();
        assert_eq!(table.get("0401"), Some(&RateEntry::new("milk", "0%")));
    }

    #[test]
    fn test_sheet_without_rate_column_is_skipped() {
        let bytes = workbook_bytes(&[
            ("HSN", "Description", "Remarks"),
            ("8471", "Computers", "18%"),
        ]);

        let table = parse_spreadsheet(&bytes).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_later_rows_win() {
        let bytes = workbook_bytes(&[
            ("HSN", "Description", "Rate"),
            ("8471", "Computers", "12%"),
            ("8471", "Computers", "18%"),
        ]);

        let table = parse_spreadsheet(&bytes).unwrap();
        assert_eq!(table.get("8471").map(|e| e.rate.as_str()), Some("18%"));
    }

    #[test]
    fn test_garbage_bytes() {
        let result = parse_spreadsheet(b"definitely not a workbook");
        assert!(matches!(result, Err(TableError::Spreadsheet(_))));
    }
}
