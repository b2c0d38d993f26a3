//! JSON output of extracted documents

use crate::error::ExtractResult;
use crate::types::SovDocument;
use std::fs;
use std::path::{Path, PathBuf};

/// Default output path: `<input>.output.json` next to the workbook
pub fn default_output_path(input: &Path) -> PathBuf {
    let mut name = input.as_os_str().to_os_string();
    name.push(".output.json");
    PathBuf::from(name)
}

pub fn to_json(document: &SovDocument) -> ExtractResult<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Write a document as indented JSON
pub fn write_json(document: &SovDocument, path: &Path) -> ExtractResult<()> {
    let json = to_json(document)?;
    fs::write(path, json)?;
    Ok(())
}
