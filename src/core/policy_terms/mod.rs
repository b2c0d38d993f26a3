//! Policy terms reconstruction
//!
//! Layers, peril groups and zone groups are discovered from the workbook's
//! defined names. Nothing is read unless the workbook declares a supported
//! policy terms version and carries the first layer's anchor range.

pub mod layers;
pub mod perils;
pub mod zones;

use crate::config::ExtractConfig;
use crate::core::cell_value::{coerce, CellValue};
use crate::error::{ExtractError, ExtractResult};
use crate::excel::Workbook;
use crate::types::PolicyTerms;
use tracing::{debug, info};

/// Optional single-cell header fields of the policy terms sheet
const NOTES: &str = "p_Notes";
const POLICY_NUMBER: &str = "p_PolicyNumber";
const INSURED_NAME: &str = "p_InsuredName";
const INCEPTION_DATE: &str = "p_InceptionDate";
const EXPIRATION_DATE: &str = "p_ExpirationDate";
const UNDERWRITER: &str = "p_Underwriter";
const LINE_OF_BUSINESS: &str = "p_LineOfBusiness";
const CURRENCY: &str = "p_Currency";

/// Field-level reads of single named cells.
///
/// Every failure below range presence (unresolvable target, unreadable
/// cell, non-numeric text) reads as absent and leaves a debug trace.
pub struct NamedCells<'a, W: Workbook + ?Sized> {
    workbook: &'a W,
}

impl<'a, W: Workbook + ?Sized> NamedCells<'a, W> {
    pub fn new(workbook: &'a W) -> Self {
        Self { workbook }
    }

    /// Whether the defined name exists at all
    pub fn exists(&self, name: &str) -> bool {
        self.workbook.has_name(name)
    }

    /// Non-blank value of the named cell
    pub fn value(&self, name: &str) -> Option<CellValue> {
        if !self.exists(name) {
            return None;
        }
        let Some((address, raw)) = self.workbook.cell_at(name) else {
            debug!(name, "Defined name does not resolve to a cell");
            return None;
        };
        match coerce(raw, &address) {
            Ok(value) if value.is_blank() => None,
            Ok(value) => Some(value),
            Err(e) => {
                debug!(name, error = %e, "Ignoring unreadable cell");
                None
            }
        }
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        let value = self.value(name)?;
        let number = value.as_number();
        if number.is_none() {
            debug!(name, value = %value, "Ignoring non-numeric value");
        }
        number
    }

    pub fn text(&self, name: &str) -> Option<String> {
        self.value(name)?.as_text()
    }

    /// Text of the named cell, with dates rendered as `YYYY-MM-DD`
    pub fn date_text(&self, name: &str) -> Option<String> {
        match self.value(name)? {
            CellValue::DateTime(datetime) => Some(datetime.format("%Y-%m-%d").to_string()),
            other => other.as_text(),
        }
    }
}

/// Major version of a version marker such as `v4.1`; `None` when the
/// marker lacks the prefix or does not parse
pub fn parse_major_version(marker: &str, prefix: &str) -> Option<u32> {
    let version = marker.trim().strip_prefix(prefix)?;
    let major = version.split('.').next()?.trim();
    major.parse::<u32>().ok()
}

/// Read the version marker and check it is supported.
///
/// Returns `Ok(None)` when the workbook declares no version.
pub fn check_version<W: Workbook + ?Sized>(
    workbook: &W,
    config: &ExtractConfig,
) -> ExtractResult<Option<String>> {
    let Some(found) = workbook
        .custom_property(&config.version_property)
        .map(str::trim)
        .filter(|marker| !marker.is_empty())
    else {
        return Ok(None);
    };

    match parse_major_version(found, &config.version_prefix) {
        Some(major) if major >= config.min_major_version => Ok(Some(found.to_string())),
        _ => Err(ExtractError::VersionIncompatibility {
            found: found.to_string(),
            minimum: config.min_major_version,
        }),
    }
}

/// Reconstruct the policy terms of a workbook.
///
/// `Ok(None)` when the workbook has no policy terms version marker.
pub fn reconstruct<W: Workbook + ?Sized>(
    workbook: &W,
    config: &ExtractConfig,
) -> ExtractResult<Option<PolicyTerms>> {
    let Some(version) = check_version(workbook, config)? else {
        debug!("No policy terms version marker, skipping policy terms");
        return Ok(None);
    };

    let anchor = layers::layer_range(1, layers::PARTICIPATION);
    if !workbook.has_name(&anchor) {
        return Err(ExtractError::MissingPolicyTermsSchema { anchor });
    }

    let cells = NamedCells::new(workbook);
    let names = workbook.defined_names();
    let perils = perils::read_perils(&cells, names, config)?;

    let terms = PolicyTerms {
        policy_number: cells.text(POLICY_NUMBER),
        insured_name: cells.text(INSURED_NAME),
        inception_date: cells.date_text(INCEPTION_DATE),
        expiration_date: cells.date_text(EXPIRATION_DATE),
        underwriter: cells.text(UNDERWRITER),
        line_of_business: cells.text(LINE_OF_BUSINESS),
        currency: cells.text(CURRENCY),
        layer_terms: layers::read_layers(&cells, config),
        peril_terms: perils.groups,
        zone_terms: zones::read_zones(&cells, names, config)?,
        excluded_subperil_types: perils.excluded,
        notes: cells.text(NOTES),
    };

    info!(
        version = %version,
        layers = terms.layer_terms.len(),
        peril_groups = terms.peril_terms.len(),
        zone_groups = terms.zone_terms.len(),
        "Reconstructed policy terms"
    );
    Ok(Some(terms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::excel::WorkbookSnapshot;
    use calamine::{Data, ExcelDateTime, ExcelDateTimeType};

    fn schema_workbook(version: &str) -> WorkbookSnapshot {
        WorkbookSnapshot::new()
            .with_property("Ping Policy Terms Version", version)
            .with_cell("Terms", "B2", Data::Float(1_000_000.0))
            .with_name("p_L1PL", "Terms!$B$2")
    }

    #[test]
    fn test_parse_major_version() {
        assert_eq!(parse_major_version("v4.0", "v"), Some(4));
        assert_eq!(parse_major_version("v12", "v"), Some(12));
        assert_eq!(parse_major_version(" v5.2.1 ", "v"), Some(5));
        assert_eq!(parse_major_version("4.0", "v"), None);
        assert_eq!(parse_major_version("vX.1", "v"), None);
    }

    #[test]
    fn test_old_version_fails() {
        let result = reconstruct(&schema_workbook("v3.2"), &ExtractConfig::default());
        match result {
            Err(ExtractError::VersionIncompatibility { found, minimum }) => {
                assert_eq!(found, "v3.2");
                assert_eq!(minimum, 4);
            }
            other => panic!("Expected VersionIncompatibility, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_version_fails() {
        let result = reconstruct(&schema_workbook("4.0"), &ExtractConfig::default());
        assert!(matches!(
            result,
            Err(ExtractError::VersionIncompatibility { .. })
        ));
    }

    #[test]
    fn test_supported_version_with_anchor_succeeds() {
        let terms = reconstruct(&schema_workbook("v4.0"), &ExtractConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(terms.layer_terms.len(), 1);
        assert_eq!(terms.layer_terms[0].participation.amount, Some(1_000_000.0));
    }

    #[test]
    fn test_no_version_means_no_policy_terms() {
        let workbook = WorkbookSnapshot::new().with_name("p_L1PL", "Terms!$B$2");
        assert_eq!(reconstruct(&workbook, &ExtractConfig::default()).unwrap(), None);
    }

    #[test]
    fn test_missing_anchor_fails() {
        let workbook = WorkbookSnapshot::new().with_property("Ping Policy Terms Version", "v4.1");
        match reconstruct(&workbook, &ExtractConfig::default()) {
            Err(ExtractError::MissingPolicyTermsSchema { anchor }) => assert_eq!(anchor, "p_L1PL"),
            other => panic!("Expected MissingPolicyTermsSchema, got {:?}", other),
        }
    }

    #[test]
    fn test_header_fields() {
        let inception = ExcelDateTime::new(45292.0, ExcelDateTimeType::DateTime, false);
        let workbook = schema_workbook("v4")
            .with_cell("Terms", "D1", Data::String("POL-77".to_string()))
            .with_cell("Terms", "D2", Data::DateTime(inception))
            .with_cell("Terms", "D3", Data::String("  Reviewed  ".to_string()))
            .with_cell("Terms", "D4", Data::String(String::new()))
            .with_name("p_PolicyNumber", "Terms!$D$1")
            .with_name("p_InceptionDate", "Terms!$D$2")
            .with_name("p_Notes", "Terms!$D$3")
            .with_name("p_Currency", "Terms!$D$4");

        let terms = reconstruct(&workbook, &ExtractConfig::default())
            .unwrap()
            .unwrap();
        assert_eq!(terms.policy_number.as_deref(), Some("POL-77"));
        assert_eq!(terms.inception_date.as_deref(), Some("2024-01-01"));
        assert_eq!(terms.notes.as_deref(), Some("Reviewed"));
        assert_eq!(terms.currency, None);
        assert_eq!(terms.insured_name, None);
    }

    #[test]
    fn test_named_cells_swallow_field_failures() {
        let workbook = WorkbookSnapshot::new()
            .with_cell("Terms", "A1", Data::String("$1,500".to_string()))
            .with_cell("Terms", "A2", Data::String("TBD".to_string()))
            .with_cell("Terms", "A3", Data::DateTimeIso("not a date".to_string()))
            .with_name("p_Amount", "Terms!$A$1")
            .with_name("p_Pending", "Terms!$A$2")
            .with_name("p_Broken", "Terms!#REF!")
            .with_name("p_Bad", "Terms!$A$3");
        let cells = NamedCells::new(&workbook);

        assert_eq!(cells.number("p_Amount"), Some(1500.0));
        assert_eq!(cells.number("p_Pending"), None);
        assert_eq!(cells.text("p_Pending").as_deref(), Some("TBD"));
        assert!(cells.exists("p_Broken"));
        assert_eq!(cells.value("p_Broken"), None);
        assert_eq!(cells.value("p_Bad"), None);
        assert_eq!(cells.value("p_Missing"), None);
    }
}
