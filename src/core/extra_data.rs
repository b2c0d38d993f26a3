//! Extra data fields: a reference table of `Label` → `Excel Defined Name`
//! pairs naming single cells worth carrying along with the buildings.

use crate::config::ExtractConfig;
use crate::core::cell_value::{coerce, CellValue};
use crate::core::reference_table::read_reference_table;
use crate::error::{ExtractError, ExtractResult};
use crate::excel::Workbook;
use indexmap::IndexMap;
use tracing::{debug, warn};

const HEADER_LABEL: &str = "Label";
const HEADER_REFERENCE: &str = "Excel Defined Name";

/// Read the extra data fields. A workbook without the field table has no
/// extra data; a field that cannot be read is logged and left out.
pub fn read_extra_data<W: Workbook + ?Sized>(
    workbook: &W,
    config: &ExtractConfig,
) -> ExtractResult<IndexMap<String, CellValue>> {
    let rows = match read_reference_table(workbook, &config.extra_data_range) {
        Ok(rows) => rows,
        Err(ExtractError::RangeNotFound { name }) => {
            debug!(range = %name, "No extra data fields");
            return Ok(IndexMap::new());
        }
        Err(e) => return Err(e),
    };

    let mut fields = IndexMap::new();
    for row in &rows {
        let label = row.get(HEADER_LABEL).map(|l| l.trim()).unwrap_or("");
        let reference = row.get(HEADER_REFERENCE).map(|r| r.trim()).unwrap_or("");
        if label.is_empty() && reference.is_empty() {
            continue;
        }
        if label.is_empty() || reference.is_empty() {
            warn!(label, reference, "Incomplete extra data field");
            continue;
        }
        if fields.contains_key(label) {
            warn!(label, "Duplicate extra data label, keeping the first");
            continue;
        }

        let Some((address, raw)) = workbook.cell_at(reference) else {
            warn!(label, reference, "Extra data reference does not resolve");
            continue;
        };
        match coerce(raw, &address) {
            Ok(value) if value.is_blank() => {}
            Ok(value) => {
                fields.insert(label.to_string(), value);
            }
            Err(e) => warn!(label, address = %address, error = %e, "Error reading extra data field"),
        }
    }

    Ok(fields)
}
