//! Workbook capability used by the extraction core
//!
//! The core never touches the file container. It reads cells, defined names,
//! tables and custom document properties through the [`Workbook`] trait, which
//! [`WorkbookSnapshot`] implements over an in-memory copy of a workbook.

use calamine::Data;
use indexmap::IndexMap;
use regex::Regex;
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// A defined name as enumerated from the workbook (`name` → `target` formula text)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinedName {
    pub name: String,
    pub target: String,
}

impl DefinedName {
    pub fn new(name: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            target: target.into(),
        }
    }
}

/// Rectangular, sheet-qualified cell range (0-based, inclusive bounds)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellRange {
    pub sheet: String,
    pub first: (u32, u32),
    pub last: (u32, u32),
}

fn area_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\$?([A-Za-z]{1,3})\$?(\d+)(?::\$?([A-Za-z]{1,3})\$?(\d+))?$")
            .expect("Hardcode regex pattern")
    })
}

impl CellRange {
    pub fn new(sheet: impl Into<String>, first: (u32, u32), last: (u32, u32)) -> Self {
        Self {
            sheet: sheet.into(),
            first: (first.0.min(last.0), first.1.min(last.1)),
            last: (first.0.max(last.0), first.1.max(last.1)),
        }
    }

    /// Parses a sheet-qualified A1 reference such as `Sheet1!$B$2`,
    /// `'My Sheet'!A1:C10` or `=Terms!B4`.
    ///
    /// Returns `None` for anything that is not a single rectangular area
    /// (constants, formulas, `#REF!` targets, whole rows or columns).
    pub fn parse(reference: &str) -> Option<Self> {
        let reference = reference.trim().trim_start_matches('=');
        let (sheet, area) = reference.rsplit_once('!')?;
        let sheet = match sheet.strip_prefix('\'').and_then(|s| s.strip_suffix('\'')) {
            Some(quoted) => quoted.replace("''", "'"),
            None => sheet.to_string(),
        };
        if sheet.is_empty() {
            return None;
        }

        let captures = area_pattern().captures(area)?;
        let first_col = column_to_index(captures.get(1)?.as_str())?;
        let first_row = row_to_index(captures.get(2)?.as_str())?;
        let (last_row, last_col) = match (captures.get(3), captures.get(4)) {
            (Some(col), Some(row)) => (row_to_index(row.as_str())?, column_to_index(col.as_str())?),
            _ => (first_row, first_col),
        };
        Some(Self::new(sheet, (first_row, first_col), (last_row, last_col)))
    }

    /// Top-left cell of the range
    pub fn first_cell(&self) -> (u32, u32) {
        self.first
    }

    pub fn height(&self) -> u32 {
        self.last.0 - self.first.0 + 1
    }

    pub fn width(&self) -> u32 {
        self.last.1 - self.first.1 + 1
    }

    /// Sheet-qualified A1 address of an absolute cell position, for diagnostics
    pub fn address(&self, row: u32, col: u32) -> String {
        format!("{}!{}", self.sheet, cell_address(row, col))
    }
}

impl fmt::Display for CellRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.first == self.last {
            write!(f, "{}!{}", self.sheet, cell_address(self.first.0, self.first.1))
        } else {
            write!(
                f,
                "{}!{}:{}",
                self.sheet,
                cell_address(self.first.0, self.first.1),
                cell_address(self.last.0, self.last.1)
            )
        }
    }
}

/// Convert column letters to a 0-based index (A→0, Z→25, AA→26)
pub fn column_to_index(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    let mut index: u32 = 0;
    for character in letters.chars() {
        if !character.is_ascii_alphabetic() {
            return None;
        }
        let digit = character.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
        index = index.checked_mul(26)?.checked_add(digit)?;
    }
    Some(index - 1)
}

/// Convert a 0-based column index to Excel column letters (0→A, 25→Z, 26→AA)
pub fn index_to_column(index: u32) -> String {
    let mut result = String::new();
    let mut num = index;

    loop {
        let remainder = num % 26;
        result.insert(0, (b'A' + remainder as u8) as char);
        if num < 26 {
            break;
        }
        num = num / 26 - 1;
    }

    result
}

fn row_to_index(digits: &str) -> Option<u32> {
    digits.parse::<u32>().ok().filter(|row| *row > 0).map(|row| row - 1)
}

/// A1-style address of a 0-based cell position (e.g. `(1, 1)` → `B2`)
pub fn cell_address(row: u32, col: u32) -> String {
    format!("{}{}", index_to_column(col), row + 1)
}

/// Read-only view of a workbook.
///
/// Implementations must not mutate anything on lookup; every method takes `&self`.
pub trait Workbook {
    /// Defined names in workbook enumeration order
    fn defined_names(&self) -> &[DefinedName];

    /// Full range (header row included) of a workbook table
    fn table(&self, name: &str) -> Option<CellRange>;

    /// Raw stored value of a cell; `None` when the cell was never written
    fn cell(&self, sheet: &str, row: u32, col: u32) -> Option<&Data>;

    /// Value of a custom document property
    fn custom_property(&self, name: &str) -> Option<&str>;

    /// Whether a defined name exists, whatever its target
    fn has_name(&self, name: &str) -> bool {
        self.defined_names().iter().any(|defined| defined.name == name)
    }

    /// Resolve a defined name to the range it points at
    fn resolve_name(&self, name: &str) -> Option<CellRange> {
        self.defined_names()
            .iter()
            .find(|defined| defined.name == name)
            .and_then(|defined| CellRange::parse(&defined.target))
    }

    /// Resolve either a defined name or a literal sheet-qualified address
    fn resolve_reference(&self, reference: &str) -> Option<CellRange> {
        self.resolve_name(reference)
            .or_else(|| CellRange::parse(reference))
    }

    /// First cell of a name or literal reference: its address and raw value
    fn cell_at(&self, reference: &str) -> Option<(String, Option<&Data>)> {
        let range = self.resolve_reference(reference)?;
        let (row, col) = range.first_cell();
        Some((range.address(row, col), self.cell(&range.sheet, row, col)))
    }

    fn custom_property_or(&self, name: &str, default: &str) -> String {
        self.custom_property(name).unwrap_or(default).to_string()
    }
}

/// In-memory workbook: sparse cells per sheet, defined names, tables and
/// custom properties, captured once when the file is opened.
#[derive(Debug, Clone, Default)]
pub struct WorkbookSnapshot {
    sheets: IndexMap<String, HashMap<(u32, u32), Data>>,
    defined_names: Vec<DefinedName>,
    tables: IndexMap<String, CellRange>,
    properties: IndexMap<String, String>,
}

impl WorkbookSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a sheet, even if it has no cells
    pub fn add_sheet(&mut self, sheet: &str) {
        self.sheets.entry(sheet.to_string()).or_default();
    }

    pub fn set_cell(&mut self, sheet: &str, row: u32, col: u32, value: Data) {
        self.sheets
            .entry(sheet.to_string())
            .or_default()
            .insert((row, col), value);
    }

    /// Set a cell by A1 address; panics on a malformed address
    pub fn with_cell(mut self, sheet: &str, address: &str, value: Data) -> Self {
        let range = CellRange::parse(&format!("'{}'!{}", sheet.replace('\'', "''"), address))
            .expect("valid A1 address");
        self.set_cell(sheet, range.first.0, range.first.1, value);
        self
    }

    pub fn define_name(&mut self, name: &str, target: &str) {
        self.defined_names.push(DefinedName::new(name, target));
    }

    pub fn with_name(mut self, name: &str, target: &str) -> Self {
        self.define_name(name, target);
        self
    }

    pub fn add_table(&mut self, name: &str, range: CellRange) {
        self.tables.insert(name.to_string(), range);
    }

    pub fn with_table(mut self, name: &str, range: CellRange) -> Self {
        self.add_table(name, range);
        self
    }

    pub fn set_property(&mut self, name: &str, value: &str) {
        self.properties.insert(name.to_string(), value.to_string());
    }

    pub fn with_property(mut self, name: &str, value: &str) -> Self {
        self.set_property(name, value);
        self
    }
}

impl Workbook for WorkbookSnapshot {
    fn defined_names(&self) -> &[DefinedName] {
        &self.defined_names
    }

    fn table(&self, name: &str) -> Option<CellRange> {
        self.tables.get(name).cloned()
    }

    fn cell(&self, sheet: &str, row: u32, col: u32) -> Option<&Data> {
        self.sheets.get(sheet)?.get(&(row, col))
    }

    fn custom_property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(String::as_str)
    }
}
