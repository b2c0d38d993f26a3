//! Workbook loader - Excel (.xlsx/.xlsm) → [`WorkbookSnapshot`]

use crate::error::{ExtractError, ExtractResult};
use crate::excel::properties::read_custom_properties;
use crate::excel::workbook::{CellRange, WorkbookSnapshot};
use calamine::{open_workbook, Data, Range, Reader, Table, Xlsx};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Opens a workbook file once and captures everything the extractor reads
pub struct XlsxLoader {
    path: PathBuf,
}

impl XlsxLoader {
    /// Create a new loader for a workbook file
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Load sheets, defined names, tables and custom properties
    pub fn load(&self) -> ExtractResult<WorkbookSnapshot> {
        let mut workbook: Xlsx<_> = open_workbook(&self.path).map_err(|e| {
            ExtractError::Workbook(format!(
                "Failed to open Excel file {}: {}",
                self.path.display(),
                e
            ))
        })?;

        let mut snapshot = WorkbookSnapshot::new();

        let sheet_names = workbook.sheet_names().to_vec();
        for sheet_name in sheet_names {
            snapshot.add_sheet(&sheet_name);
            match workbook.worksheet_range(&sheet_name) {
                Ok(range) => copy_range(&mut snapshot, &sheet_name, &range),
                Err(e) => warn!(sheet = %sheet_name, error = %e, "Skipping unreadable worksheet"),
            }
        }

        for (name, target) in workbook.defined_names() {
            snapshot.define_name(name, target);
        }

        workbook.load_tables()?;
        let table_names: Vec<String> = workbook.table_names().into_iter().cloned().collect();
        for table_name in table_names {
            let table = workbook.table_by_name(&table_name)?;
            match table_range(&table) {
                Some(range) => {
                    debug!(table = %table_name, range = %range, "Loaded table");
                    snapshot.add_table(&table_name, range);
                }
                None => warn!(table = %table_name, "Skipping table without data rows"),
            }
        }

        for (name, value) in read_custom_properties(&self.path)? {
            snapshot.set_property(&name, &value);
        }

        Ok(snapshot)
    }
}

/// Copy the used cells of a worksheet range into the snapshot at their
/// absolute positions
fn copy_range(snapshot: &mut WorkbookSnapshot, sheet_name: &str, range: &Range<Data>) {
    let Some((start_row, start_col)) = range.start() else {
        return;
    };
    for (row, col, value) in range.used_cells() {
        snapshot.set_cell(
            sheet_name,
            start_row + row as u32,
            start_col + col as u32,
            value.clone(),
        );
    }
}

/// Table range including its header row. calamine hands back the data rows
/// only, so the header sits one row above.
fn table_range(table: &Table<Data>) -> Option<CellRange> {
    let data = table.data();
    let start = data.start()?;
    let end = data.end()?;
    Some(CellRange::new(
        table.sheet_name(),
        (start.0.saturating_sub(1), start.1),
        end,
    ))
}
