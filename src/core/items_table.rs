//! Items tables: one [`Item`] per data row, shaped by the table's column
//! specification `r_<table>_column_specification`.

use crate::config::ExtractConfig;
use crate::core::attribute_path::{map_cell, AttributePath};
use crate::core::cell_value::{coerce, CellValue};
use crate::core::reference_table::{read_reference_table, ReferenceRow};
use crate::error::{ExtractError, ExtractResult};
use crate::excel::{column_to_index, CellRange, Workbook};
use crate::types::{Item, ItemValue};
use tracing::debug;

const HEADER_COLUMN: &str = "Col";
const HEADER_ATTRIBUTE: &str = "Attribute";
const HEADER_PROPS: &str = "Props";

const PARSING_SHEET_NAME: &str = "parsing_sheet_name";
const PARSING_SHEET_ROW_NUMBER: &str = "parsing_sheet_row_number";

/// Name of the reference table describing the columns of `table`
pub fn column_specification_name(table: &str) -> String {
    format!("r_{}_column_specification", table)
}

/// One mapped column of an items table
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSpec {
    /// Column offset from the table's first column
    pub column: u32,
    pub attribute: AttributePath,
    pub props: Vec<String>,
}

impl ColumnSpec {
    /// Build a spec from a reference-table row. Rows without an attribute
    /// map nothing and yield `None`.
    pub fn from_row(
        table: &str,
        row: &ReferenceRow,
        simple_fields: &[String],
    ) -> ExtractResult<Option<Self>> {
        let attribute = row.get(HEADER_ATTRIBUTE).map(|a| a.trim()).unwrap_or("");
        if attribute.is_empty() {
            return Ok(None);
        }

        let column_text = row.get(HEADER_COLUMN).map(String::as_str).unwrap_or("");
        let letters = column_text
            .rsplit('!')
            .next()
            .unwrap_or("")
            .trim()
            .replace('$', "");
        let column = column_to_index(&letters).ok_or_else(|| ExtractError::InvalidColumnSpec {
            table: table.to_string(),
            column: column_text.to_string(),
        })?;

        let props = row
            .get(HEADER_PROPS)
            .map(|props| {
                props
                    .split(',')
                    .map(str::trim)
                    .filter(|prop| !prop.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Some(Self {
            column,
            attribute: AttributePath::parse(attribute, simple_fields)?,
            props,
        }))
    }
}

/// Read every column spec of `table`, in specification order
pub fn read_column_specs<W: Workbook + ?Sized>(
    workbook: &W,
    table: &str,
    config: &ExtractConfig,
) -> ExtractResult<Vec<ColumnSpec>> {
    let rows = read_reference_table(workbook, &column_specification_name(table))?;
    let mut specs = Vec::with_capacity(rows.len());
    for row in &rows {
        if let Some(spec) = ColumnSpec::from_row(table, row, &config.simple_fields)? {
            specs.push(spec);
        }
    }
    Ok(specs)
}

/// Extract one item per data row of `table`.
///
/// The table is looked up as a workbook table first, then as a defined name.
/// Its first row is the header row. Trailing rows with no values are ignored.
pub fn read_items_table<W: Workbook + ?Sized>(
    workbook: &W,
    table: &str,
    config: &ExtractConfig,
) -> ExtractResult<Vec<Item>> {
    let range = workbook
        .table(table)
        .or_else(|| workbook.resolve_name(table))
        .ok_or_else(|| ExtractError::RangeNotFound {
            name: table.to_string(),
        })?;
    let specs = read_column_specs(workbook, table, config)?;

    let (first_row, first_col) = range.first_cell();
    let Some(last_row) = last_used_row(workbook, &range) else {
        debug!(table, "Items table has no data rows");
        return Ok(Vec::new());
    };

    let mut items = Vec::new();
    for row in (first_row + 1)..=last_row {
        let mut item = Item::new();
        for spec in &specs {
            let col = first_col + spec.column;
            let raw = workbook.cell(&range.sheet, row, col);
            item = map_cell(item, &spec.attribute, raw, &range.address(row, col))?;
        }

        if !item.contains_key(PARSING_SHEET_NAME) {
            item.insert(
                PARSING_SHEET_NAME,
                ItemValue::Scalar(CellValue::Text(table.to_string())),
            );
        }
        if !item.contains_key(PARSING_SHEET_ROW_NUMBER) {
            item.insert(
                PARSING_SHEET_ROW_NUMBER,
                ItemValue::Scalar(CellValue::Number(f64::from(row + 1))),
            );
        }
        items.push(item);
    }

    debug!(table, items = items.len(), specs = specs.len(), "Extracted items table");
    Ok(items)
}

/// Last data row holding at least one non-blank cell
fn last_used_row<W: Workbook + ?Sized>(workbook: &W, range: &CellRange) -> Option<u32> {
    let data_start = range.first.0 + 1;
    (data_start..=range.last.0).rev().find(|&row| {
        (range.first.1..=range.last.1).any(|col| {
            let raw = workbook.cell(&range.sheet, row, col);
            // An unreadable cell still counts as used
            coerce(raw, "").map_or(true, |value| !value.is_blank())
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excel::WorkbookSnapshot;
    use calamine::Data;
    use serde_json::json;

    fn text(value: &str) -> Data {
        Data::String(value.to_string())
    }

    /// Locations table at B2:E5 (header row 2), specs on a separate sheet
    fn workbook(specs: &[(&str, &str)]) -> WorkbookSnapshot {
        let mut workbook = WorkbookSnapshot::new()
            .with_cell("Specs", "A1", text("Col"))
            .with_cell("Specs", "B1", text("Attribute"))
            .with_cell("Specs", "C1", text("Props"))
            .with_cell("Locations", "B2", text("Key"))
            .with_cell("Locations", "C2", text("Street"))
            .with_cell("Locations", "D2", text("Stories"))
            .with_cell("Locations", "E2", text("Value"))
            .with_cell("Locations", "B3", text("L-1"))
            .with_cell("Locations", "C3", text("1 Main St"))
            .with_cell("Locations", "D3", Data::Float(0.0))
            .with_cell("Locations", "E3", Data::Float(1000.0))
            .with_cell("Locations", "B4", text("L-2"))
            .with_cell("Locations", "E4", Data::Float(2500.5))
            .with_table("Locations", CellRange::new("Locations", (1, 1), (4, 4)));

        for (index, (column, attribute)) in specs.iter().enumerate() {
            let row = index + 2;
            workbook = workbook
                .with_cell("Specs", &format!("A{}", row), text(column))
                .with_cell("Specs", &format!("B{}", row), text(attribute));
        }
        workbook.with_name(
            "r_Locations_column_specification",
            &format!("Specs!$A$2:$C${}", specs.len() + 1),
        )
    }

    #[test]
    fn test_extracts_one_item_per_data_row() {
        let workbook = workbook(&[
            ("Locations!A", "item_key"),
            ("Locations!B", "address[street]"),
            ("Locations!C", "stories"),
            ("Locations!D", "tiv[building][value]"),
            ("", ""),
        ]);
        let items = read_items_table(&workbook, "Locations", &ExtractConfig::default()).unwrap();

        // Row 5 is inside the table but entirely blank
        assert_eq!(items.len(), 2);
        assert_eq!(
            serde_json::to_value(&items[0]).unwrap(),
            json!({
                "item_key": "L-1",
                "address": {"street": "1 Main St"},
                "stories": {"value": 0},
                "tiv": {"building": {"value": 1000}},
                "parsing_sheet_name": "Locations",
                "parsing_sheet_row_number": 3
            })
        );
        assert_eq!(
            serde_json::to_value(&items[1]).unwrap(),
            json!({
                "item_key": "L-2",
                "tiv": {"building": {"value": 2500.5}},
                "parsing_sheet_name": "Locations",
                "parsing_sheet_row_number": 4
            })
        );
    }

    #[test]
    fn test_spec_can_set_parsing_fields() {
        let workbook = workbook(&[("Locations!A", "parsing_sheet_name")]);
        let items = read_items_table(&workbook, "Locations", &ExtractConfig::default()).unwrap();
        assert_eq!(
            items[0].get(PARSING_SHEET_NAME),
            Some(&ItemValue::Scalar(CellValue::Text("L-1".to_string())))
        );
    }

    #[test]
    fn test_duplicate_spec_fails_with_cell_context() {
        let workbook = workbook(&[("Locations!A", "g[a]"), ("Locations!D", "g[a]")]);
        let result = read_items_table(&workbook, "Locations", &ExtractConfig::default());
        match result {
            Err(ExtractError::Cell { address, .. }) => assert_eq!(address, "Locations!E3"),
            other => panic!("Expected Cell error, got {:?}", other),
        }
    }

    #[test]
    fn test_unsupported_cell_propagates_with_context() {
        let workbook = workbook(&[("Locations!A", "item_key"), ("Locations!C", "stories")])
            .with_cell("Locations", "D4", Data::DateTimeIso("yesterday".to_string()));
        let result = read_items_table(&workbook, "Locations", &ExtractConfig::default());
        match result {
            Err(ExtractError::Cell {
                attribute,
                address,
                source,
            }) => {
                assert_eq!(attribute, "stories");
                assert_eq!(address, "Locations!D4");
                assert!(matches!(*source, ExtractError::UnsupportedCellType { .. }));
            }
            other => panic!("Expected Cell error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_attribute_path_aborts() {
        let workbook = workbook(&[("Locations!A", "a[b][c][d]")]);
        let result = read_items_table(&workbook, "Locations", &ExtractConfig::default());
        assert!(matches!(
            result,
            Err(ExtractError::InvalidAttributePath { .. })
        ));
    }

    #[test]
    fn test_missing_table_or_specs() {
        let config = ExtractConfig::default();
        assert!(matches!(
            read_items_table(&WorkbookSnapshot::new(), "Locations", &config),
            Err(ExtractError::RangeNotFound { .. })
        ));

        let no_specs = WorkbookSnapshot::new()
            .with_table("Locations", CellRange::new("Locations", (0, 0), (3, 2)));
        match read_items_table(&no_specs, "Locations", &config) {
            Err(ExtractError::RangeNotFound { name }) => {
                assert_eq!(name, "r_Locations_column_specification")
            }
            other => panic!("Expected RangeNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_column_spec_parsing() {
        let mut row = ReferenceRow::new();
        row.insert("Col".to_string(), "'Loc Sheet'!$AB".to_string());
        row.insert("Attribute".to_string(), "occupancy".to_string());
        row.insert("Props".to_string(), "required, upper".to_string());

        let spec = ColumnSpec::from_row("Locations", &row, &[]).unwrap().unwrap();
        assert_eq!(spec.column, 27);
        assert_eq!(spec.props, vec!["required", "upper"]);

        row.insert("Col".to_string(), "Locations!12".to_string());
        assert!(matches!(
            ColumnSpec::from_row("Locations", &row, &[]),
            Err(ExtractError::InvalidColumnSpec { .. })
        ));
    }
}
