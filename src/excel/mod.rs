//! Excel workbook access
//!
//! - `workbook`: the read-only [`Workbook`] capability and its in-memory snapshot
//! - `loader`: Excel (.xlsx) → snapshot via calamine
//! - `properties`: custom document properties from `docProps/custom.xml`

mod loader;
mod properties;
mod workbook;

pub use loader::XlsxLoader;
pub use properties::{parse_custom_properties, read_custom_properties};
pub use workbook::{
    cell_address, column_to_index, index_to_column, CellRange, DefinedName, Workbook,
    WorkbookSnapshot,
};
