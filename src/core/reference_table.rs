//! Reference tables: a named range read as rows of strings keyed by the
//! header labels in the row directly above it.

use crate::core::cell_value::coerce;
use crate::error::{ExtractError, ExtractResult};
use crate::excel::Workbook;
use indexmap::IndexMap;

/// One row of a reference table: header label → rendered cell text
pub type ReferenceRow = IndexMap<String, String>;

/// Read the named range `name` as a header-labeled table.
///
/// Headers sit in the row above the range. Blank header cells leave their
/// column unread; a label that appears twice is an error.
pub fn read_reference_table<W: Workbook + ?Sized>(
    workbook: &W,
    name: &str,
) -> ExtractResult<Vec<ReferenceRow>> {
    let range = workbook
        .resolve_name(name)
        .ok_or_else(|| ExtractError::RangeNotFound {
            name: name.to_string(),
        })?;

    let (first_row, first_col) = range.first_cell();
    if first_row == 0 {
        return Err(ExtractError::MissingHeaderRow {
            name: name.to_string(),
        });
    }
    let header_row = first_row - 1;

    // (column, label) pairs in column order
    let mut headers: Vec<(u32, String)> = Vec::new();
    for col in first_col..=range.last.1 {
        let raw = workbook.cell(&range.sheet, header_row, col);
        let label = coerce(raw, &range.address(header_row, col))?
            .to_string()
            .trim()
            .to_string();
        if label.is_empty() {
            continue;
        }
        if headers.iter().any(|(_, existing)| *existing == label) {
            return Err(ExtractError::DuplicateHeader {
                name: name.to_string(),
                header: label,
            });
        }
        headers.push((col, label));
    }

    let mut rows = Vec::with_capacity(range.height() as usize);
    for row in first_row..=range.last.0 {
        let mut record = ReferenceRow::new();
        for (col, label) in &headers {
            let raw = workbook.cell(&range.sheet, row, *col);
            let value = coerce(raw, &range.address(row, *col))?;
            record.insert(label.clone(), value.to_string());
        }
        rows.push(record);
    }

    Ok(rows)
}
