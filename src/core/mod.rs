//! Convention-driven extraction engine
//!
//! Everything here reads through the [`Workbook`](crate::excel::Workbook)
//! trait and never touches the file itself.

pub mod attribute_path;
pub mod cell_value;
pub mod extra_data;
pub mod items_table;
pub mod metadata;
pub mod name_scanner;
pub mod policy_terms;
pub mod reference_table;

pub use attribute_path::{map_cell, set_attr, AttributePath};
pub use cell_value::{coerce, CellValue};
pub use extra_data::read_extra_data;
pub use items_table::{read_items_table, ColumnSpec};
pub use metadata::read_metadata;
pub use name_scanner::{scan, NameMatch};
pub use policy_terms::reconstruct;
pub use reference_table::{read_reference_table, ReferenceRow};
