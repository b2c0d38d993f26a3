//! Document metadata: who the SOV belongs to, where it came from, when it
//! was read.

use crate::config::ExtractConfig;
use crate::excel::Workbook;
use crate::types::Metadata;
use chrono::{Local, NaiveDateTime};
use std::path::Path;

pub const DOCUMENT_TYPE: &str = "SOV";
pub const UNKNOWN: &str = "n/a";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Build the metadata of a workbook read from `source`.
///
/// `timestamp` defaults to the current local time.
pub fn read_metadata<W: Workbook + ?Sized>(
    workbook: &W,
    source: &Path,
    config: &ExtractConfig,
    timestamp: Option<NaiveDateTime>,
) -> Metadata {
    let timestamp = timestamp.unwrap_or_else(|| Local::now().naive_local());
    let full_name = source
        .canonicalize()
        .unwrap_or_else(|_| source.to_path_buf());
    let optional = |name: &str| {
        workbook
            .custom_property(name)
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(String::from)
    };

    Metadata {
        client_name: workbook.custom_property_or(&config.client_name_property, UNKNOWN),
        sov_id: workbook.custom_property_or(&config.identifier_property, UNKNOWN),
        source_filename: source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default(),
        full_name: full_name.display().to_string(),
        document_type: DOCUMENT_TYPE.to_string(),
        timestamp: timestamp.format(TIMESTAMP_FORMAT).to_string(),
        policy_terms_version: optional(&config.version_property),
        format_name: optional(&config.format_name_property),
    }
}
