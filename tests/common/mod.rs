//! Workbook fixtures shared by the integration tests
#![allow(dead_code)]

use rust_xlsxwriter::{DocProperties, Table, TableColumn, Workbook, Worksheet};
use std::path::{Path, PathBuf};

/// A small but complete SOV workbook:
///
/// * `Locations` table (A1:D5, last row blank) with its column specification
/// * layers 1, 2 and 4 (3 missing), perils EQ/FFEQ/TR, an EQ zone grid
/// * extra data fields and custom document properties
pub fn write_sov(dir: &Path, file_name: &str, version: Option<&str>) -> PathBuf {
    let path = dir.join(file_name);
    let mut workbook = Workbook::new();

    workbook.push_worksheet(locations_sheet());
    workbook.push_worksheet(specs_sheet());
    workbook.push_worksheet(terms_sheet());
    workbook.push_worksheet(fields_sheet());

    let names = [
        ("r_Locations_column_specification", "=Specs!$A$2:$C$5"),
        ("p_L1PL", "=Terms!$B$2"),
        ("p_L1LL", "=Terms!$C$2"),
        ("p_L1AP", "=Terms!$D$2"),
        ("p_L1PP", "=Terms!$E$2"),
        ("p_L1Name", "=Terms!$F$2"),
        ("p_L2PL", "=Terms!$B$3"),
        ("p_L2Name", "=Terms!$F$3"),
        ("p_L2PR", "=Terms!$G$3"),
        ("p_L4PL", "=Terms!$B$5"),
        ("p_EQ_Caption", "=Terms!$A$8"),
        ("p_EQ_Group", "=Terms!$B$8"),
        ("p_EQSublimit", "=Terms!$C$8"),
        ("p_FFEQ_Caption", "=Terms!$A$9"),
        ("p_FFEQ_Group", "=Terms!$B$9"),
        ("p_FFEQSublimit", "=Terms!$C$9"),
        ("p_FFEQDed", "=Terms!$D$9"),
        ("p_TR_Caption", "=Terms!$A$10"),
        ("p_TR_Group", "=Terms!$B$10"),
        ("p_EQ_Zone1_Caption", "=Terms!$A$13"),
        ("p_EQ_Zone1_Sublimit", "=Terms!$B$13"),
        ("p_EQ_Zone2_Caption", "=Terms!$A$14"),
        ("p_EQ_Zone2_Ded", "=Terms!$C$14"),
        ("p_EQ_Custom1_Caption", "=Terms!$A$15"),
        ("p_EQ_Custom1_Include", "=Terms!$D$15"),
        ("p_Notes", "=Terms!$A$20"),
        ("p_extra_data_fields", "=Fields!$A$2:$B$3"),
        ("p_NamedInsured", "=Fields!$D$4"),
    ];
    for (name, target) in names {
        workbook.define_name(name, target).unwrap();
    }

    let mut properties = DocProperties::new()
        .set_custom_property("Ping Identifier", "SOV-2024-001")
        .set_custom_property("Ping Client Name", "Acme Holdings");
    if let Some(version) = version {
        properties = properties.set_custom_property("Ping Policy Terms Version", version);
    }
    workbook.set_properties(&properties);

    workbook.save(&path).unwrap();
    path
}

fn locations_sheet() -> Worksheet {
    let mut sheet = Worksheet::new();
    sheet.set_name("Locations").unwrap();

    let rows: [(&str, &str, Option<f64>, f64); 3] = [
        ("L-1", "1 Main St", Some(3.0), 1_000_000.0),
        ("L-2", "", Some(0.0), 2_500_000.0),
        ("L-3", "9 Elm St", None, 750_000.0),
    ];
    for (index, (key, street, stories, value)) in rows.iter().enumerate() {
        let row = index as u32 + 1;
        sheet.write_string(row, 0, *key).unwrap();
        if !street.is_empty() {
            sheet.write_string(row, 1, *street).unwrap();
        }
        if let Some(stories) = stories {
            sheet.write_number(row, 2, *stories).unwrap();
        }
        sheet.write_number(row, 3, *value).unwrap();
    }

    let columns = ["Key", "Street", "Stories", "Building Value"]
        .map(|header| TableColumn::new().set_header(header));
    let table = Table::new().set_name("Locations").set_columns(&columns);
    sheet.add_table(0, 0, 4, 3, &table).unwrap();
    sheet
}

fn specs_sheet() -> Worksheet {
    let mut sheet = Worksheet::new();
    sheet.set_name("Specs").unwrap();

    let rows = [
        ["Col", "Attribute", "Props"],
        ["Locations!A", "item_key", ""],
        ["Locations!B", "address[street]", ""],
        ["Locations!C", "stories", ""],
        ["Locations!D", "tiv[building][usd]", "currency"],
    ];
    for (row, cells) in rows.iter().enumerate() {
        for (col, text) in cells.iter().enumerate() {
            if !text.is_empty() {
                sheet.write_string(row as u32, col as u16, *text).unwrap();
            }
        }
    }
    sheet
}

fn terms_sheet() -> Worksheet {
    let mut sheet = Worksheet::new();
    sheet.set_name("Terms").unwrap();

    // Layer 1: participation derived from limit × percent
    sheet.write_number(1, 2, 10_000_000.0).unwrap();
    sheet.write_number(1, 3, 0.0).unwrap();
    sheet.write_number(1, 4, 0.5).unwrap();
    sheet.write_string(1, 5, "Primary").unwrap();
    // Layer 2: explicit participation amount
    sheet.write_number(2, 1, 2_000_000.0).unwrap();
    sheet.write_string(2, 5, "Excess").unwrap();
    sheet.write_number(2, 6, 15_000.0).unwrap();
    // Layer 4: unreachable behind the gap at 3
    sheet.write_number(4, 1, 1.0).unwrap();

    sheet.write_string(7, 0, "Earthquake").unwrap();
    sheet.write_string(7, 1, "Quake").unwrap();
    sheet.write_number(7, 2, 500_000.0).unwrap();
    sheet.write_string(8, 0, "Fire Following").unwrap();
    sheet.write_string(8, 1, "Quake").unwrap();
    sheet.write_number(8, 3, 10_000.0).unwrap();
    sheet.write_string(9, 0, "Terrorism").unwrap();
    sheet.write_string(9, 1, "Excluded").unwrap();

    sheet.write_string(12, 0, "Zone 1").unwrap();
    sheet.write_number(12, 1, 250_000.0).unwrap();
    sheet.write_string(13, 0, "Zone 2").unwrap();
    sheet.write_number(13, 2, 0.0).unwrap();
    sheet.write_string(14, 0, "New Madrid").unwrap();
    sheet.write_string(14, 3, "Exclude").unwrap();

    sheet.write_string(19, 0, "Renewal of expiring program").unwrap();
    sheet
}

fn fields_sheet() -> Worksheet {
    let mut sheet = Worksheet::new();
    sheet.set_name("Fields").unwrap();

    sheet.write_string(0, 0, "Label").unwrap();
    sheet.write_string(0, 1, "Excel Defined Name").unwrap();
    sheet.write_string(1, 0, "Named Insured").unwrap();
    sheet.write_string(1, 1, "p_NamedInsured").unwrap();
    sheet.write_string(2, 0, "Broker").unwrap();
    sheet.write_string(2, 1, "Fields!D5").unwrap();

    sheet.write_string(3, 3, "Acme Holdings LLC").unwrap();
    sheet.write_string(4, 3, "Marsh").unwrap();
    sheet
}
