//! SOV reader: opens a workbook once and extracts buildings, policy terms,
//! extra data and metadata from it independently.

use crate::config::ExtractConfig;
use crate::core::{read_extra_data, read_items_table, read_metadata, reconstruct, CellValue};
use crate::error::ExtractResult;
use crate::excel::{Workbook, WorkbookSnapshot, XlsxLoader};
use crate::types::{Item, Metadata, PolicyTerms, SovDocument};
use chrono::NaiveDateTime;
use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use tracing::info;

pub struct SovReader<W: Workbook = WorkbookSnapshot> {
    workbook: W,
    source: PathBuf,
    config: ExtractConfig,
    timestamp: Option<NaiveDateTime>,
}

impl SovReader<WorkbookSnapshot> {
    /// Load an `.xlsx`/`.xlsm` workbook from disk
    pub fn open<P: AsRef<Path>>(path: P, config: ExtractConfig) -> ExtractResult<Self> {
        let path = path.as_ref();
        info!(file = %path.display(), "Reading workbook");
        let workbook = XlsxLoader::new(path).load()?;
        Ok(Self::from_workbook(workbook, path, config))
    }
}

impl<W: Workbook> SovReader<W> {
    /// Read from an already loaded workbook; `source` names it in the metadata
    pub fn from_workbook<P: AsRef<Path>>(workbook: W, source: P, config: ExtractConfig) -> Self {
        Self {
            workbook,
            source: source.as_ref().to_path_buf(),
            config,
            timestamp: None,
        }
    }

    /// Stamp the metadata with a fixed time instead of the current one
    pub fn with_timestamp(mut self, timestamp: NaiveDateTime) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn buildings(&self) -> ExtractResult<Vec<Item>> {
        read_items_table(&self.workbook, &self.config.items_table, &self.config)
    }

    pub fn policy_terms(&self) -> ExtractResult<Option<PolicyTerms>> {
        reconstruct(&self.workbook, &self.config)
    }

    pub fn extra_data(&self) -> ExtractResult<IndexMap<String, CellValue>> {
        read_extra_data(&self.workbook, &self.config)
    }

    pub fn metadata(&self) -> Metadata {
        read_metadata(&self.workbook, &self.source, &self.config, self.timestamp)
    }

    /// Everything at once
    pub fn document(&self) -> ExtractResult<SovDocument> {
        let metadata = self.metadata();
        let buildings = self.buildings()?;
        let policy_terms = self.policy_terms()?;
        let extra_data = self.extra_data()?;

        info!(
            sov_id = %metadata.sov_id,
            buildings = buildings.len(),
            extra_data = extra_data.len(),
            "Extracted SOV"
        );

        Ok(SovDocument {
            id: metadata.sov_id.clone(),
            source_filename: metadata.source_filename.clone(),
            num_buildings: buildings.len(),
            buildings,
            policy_terms,
            extra_data,
            metadata,
        })
    }
}
