//! Spreadsheet output.
//!
//! One worksheet with a bold header row followed by one row per record:
//!
//! | title | date | description | image_filename | count_of_search_phrases | contains_money |
//! |-------|------|-------------|----------------|-------------------------|----------------|

use super::{ExportError, ensure_parent};
use crate::models::ArticleRecord;
use rust_xlsxwriter::{Format, Workbook};
use std::path::Path;
use tracing::{info, instrument};

/// Write `records` to a new workbook at `path`, replacing any existing file.
#[instrument(level = "info", skip_all, fields(path = %path.display(), rows = records.len()))]
pub fn write_results(records: &[ArticleRecord], path: &Path) -> Result<(), ExportError> {
    ensure_parent(path)?;

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    let header = Format::new().set_bold();

    for (col, name) in (0u16..).zip(ArticleRecord::COLUMNS) {
        worksheet.write_string_with_format(0, col, name, &header)?;
    }

    for (row, record) in (1u32..).zip(records) {
        worksheet.write_string(row, 0, &record.title)?;
        worksheet.write_string(row, 1, &record.date)?;
        worksheet.write_string(row, 2, &record.description)?;
        worksheet.write_string(row, 3, &record.image_filename)?;
        worksheet.write_number(row, 4, record.count_of_search_phrases as f64)?;
        worksheet.write_boolean(row, 5, record.contains_money)?;
    }

    workbook.save(path)?;
    info!("Wrote spreadsheet");
    Ok(())
}

/// Every row of the first worksheet at `path`, header included.
#[cfg(test)]
pub fn read_rows(path: &Path) -> Vec<Vec<calamine::Data>> {
    use calamine::{Reader, Xlsx, open_workbook};

    let mut workbook: Xlsx<_> = open_workbook(path).unwrap();
    let range = workbook.worksheet_range("Sheet1").unwrap();
    range.rows().map(|row| row.to_vec()).collect()
}
