//! Comma-separated form of the dataset.
//!
//! Written with a UTF-8 byte order mark so spreadsheet applications pick the
//! right encoding for Cyrillic text. This form is only ever written.

use crate::errors::HarvestError;
use crate::models::{ArticleRecord, DATASET_COLUMNS};
use csv::WriterBuilder;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Serialize `records` as CSV, header row included even when there are no rows.
pub fn encode(records: &[ArticleRecord]) -> Result<Vec<u8>, HarvestError> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_writer(UTF8_BOM.to_vec());
    writer
        .write_record(DATASET_COLUMNS)
        .map_err(|e| HarvestError::dataset("csv", e))?;
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| HarvestError::dataset("csv", e))?;
    }
    writer
        .into_inner()
        .map_err(|e| HarvestError::dataset("csv", e.error()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_and_bom_without_rows() {
        let bytes = encode(&[]).unwrap();
        assert!(bytes.starts_with(UTF8_BOM));
        let text = std::str::from_utf8(&bytes[UTF8_BOM.len()..]).unwrap();
        assert_eq!(text.trim_end(), DATASET_COLUMNS.join(","));
    }

    #[test]
    fn test_rows_are_quoted_when_needed() {
        let record = ArticleRecord {
            text_id: 3,
            paragraph: "Бала, ата-ана және мектеп".to_string(),
            paragraph_translated: "Ребёнок, родители и школа".to_string(),
            title: "Тәрбие".to_string(),
            title_translated: "Воспитание".to_string(),
            author: "Неизвестен".to_string(),
            url: "https://bilim-all.kz/article/view/3".to_string(),
            category: "Бала тәрбиесі".to_string(),
            subcategory: "Не указано".to_string(),
            subcategory_translated: "Не указано".to_string(),
        };
        let bytes = encode(&[record]).unwrap();
        let text = std::str::from_utf8(&bytes[UTF8_BOM.len()..]).unwrap();
        let row = text.lines().nth(1).unwrap();
        assert!(row.starts_with("3,\"Бала, ата-ана және мектеп\",\"Ребёнок, родители и школа\",Тәрбие"));
    }
}
