//! Spreadsheet form of the dataset.
//!
//! One worksheet, a header row of [`DATASET_COLUMNS`], then one row per
//! record. `text_id` is stored as a number, everything else as text.

use crate::errors::HarvestError;
use crate::models::{ArticleRecord, DATASET_COLUMNS};
use calamine::{Data, Range, Reader, Xlsx};
use rust_xlsxwriter::{Format, Workbook};
use std::collections::HashMap;
use std::io::Cursor;

const SHEET_NAME: &str = "articles";

/// Longest text a spreadsheet cell accepts, in characters.
pub const MAX_CELL_CHARS: usize = 32_767;

/// Column names written by earlier versions of the harvester.
///
/// Those versions glued inline text nodes together without a space, while
/// [`element_text`](crate::scrapers::bilim::element_text) joins them with one.
/// A resumed legacy article whose title or first paragraph contained inline
/// markup therefore gets a different fingerprint and is ingested again.
const LEGACY_ALIASES: [(&str, &str); 3] = [
    ("p_ru", "paragraph_translated"),
    ("title_ru", "title_translated"),
    ("subcategory_ru", "subcategory_translated"),
];

/// Serialize `records` into an `.xlsx` workbook.
pub fn encode(records: &[ArticleRecord]) -> Result<Vec<u8>, HarvestError> {
    let to_err = |e: rust_xlsxwriter::XlsxError| HarvestError::dataset("xlsx", e);

    let mut workbook = Workbook::new();
    let bold = Format::new().set_bold();
    let sheet = workbook.add_worksheet();
    sheet.set_name(SHEET_NAME).map_err(to_err)?;

    for (col, name) in DATASET_COLUMNS.iter().enumerate() {
        sheet
            .write_string_with_format(0, col as u16, *name, &bold)
            .map_err(to_err)?;
    }
    for (i, record) in records.iter().enumerate() {
        let row = i as u32 + 1;
        sheet
            .write_number(row, 0, record.text_id as f64)
            .map_err(to_err)?;
        for (offset, cell) in record.text_cells().iter().enumerate() {
            sheet
                .write_string(row, offset as u16 + 1, *cell)
                .map_err(to_err)?;
        }
    }

    workbook.save_to_buffer().map_err(to_err)
}

/// Parse the records of an `.xlsx` workbook produced by [`encode`].
///
/// The first worksheet is read. Columns are located by header name, so their
/// order does not matter; `text_id`, `paragraph` and `title` are required,
/// other missing columns read as empty text.
pub fn decode(bytes: Vec<u8>) -> Result<Vec<ArticleRecord>, HarvestError> {
    let to_err = |e: calamine::XlsxError| HarvestError::dataset("xlsx", e);

    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes)).map_err(to_err)?;
    let range = match workbook.worksheet_range_at(0) {
        Some(range) => range.map_err(to_err)?,
        None => return Ok(Vec::new()),
    };
    rows_to_records(&range)
}

fn rows_to_records(range: &Range<Data>) -> Result<Vec<ArticleRecord>, HarvestError> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(Vec::new());
    };
    let columns = header_index(header);
    for required in ["text_id", "paragraph", "title"] {
        if !columns.contains_key(required) {
            return Err(HarvestError::dataset(
                "xlsx",
                format!("missing column `{required}`"),
            ));
        }
    }

    let mut records = Vec::new();
    for (i, row) in rows.enumerate() {
        if row.iter().all(|cell| matches!(cell, Data::Empty)) {
            continue;
        }
        let text = |name: &str| {
            columns
                .get(name)
                .and_then(|&col| row.get(col))
                .map(cell_text)
                .unwrap_or_default()
        };
        let text_id = columns
            .get("text_id")
            .and_then(|&col| row.get(col))
            .and_then(cell_id)
            .ok_or_else(|| {
                HarvestError::dataset("xlsx", format!("row {}: invalid text_id", i + 2))
            })?;
        records.push(ArticleRecord {
            text_id,
            paragraph: text("paragraph"),
            paragraph_translated: text("paragraph_translated"),
            title: text("title"),
            title_translated: text("title_translated"),
            author: text("author"),
            url: text("url"),
            category: text("category"),
            subcategory: text("subcategory"),
            subcategory_translated: text("subcategory_translated"),
        });
    }
    Ok(records)
}

/// Map canonical column names to their index in the header row.
fn header_index(header: &[Data]) -> HashMap<String, usize> {
    let mut columns = HashMap::new();
    for (col, cell) in header.iter().enumerate() {
        let name = cell_text(cell);
        let name = LEGACY_ALIASES
            .iter()
            .find(|(legacy, _)| *legacy == name)
            .map(|(_, canonical)| canonical.to_string())
            .unwrap_or(name);
        columns.entry(name).or_insert(col);
    }
    columns
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::String(s) => s.clone(),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}

fn cell_id(cell: &Data) -> Option<u64> {
    match cell {
        Data::Int(i) => u64::try_from(*i).ok(),
        Data::Float(f) if *f >= 0.0 && f.fract() == 0.0 => Some(*f as u64),
        Data::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
