//! sovreader - convention-driven extraction of SOV workbooks
//!
//! Statement-of-values workbooks describe their own schema with defined
//! names, tables and custom document properties instead of fixed cell
//! positions. This library reads that schema and produces a structured
//! record of buildings, policy terms (layers, peril groups, zone groups),
//! extra data fields and document metadata.
//!
//! # Example
//!
//! ```no_run
//! use sovreader::config::ExtractConfig;
//! use sovreader::reader::SovReader;
//!
//! let reader = SovReader::open("acme_sov.xlsx", ExtractConfig::default())?;
//! let buildings = reader.buildings()?;
//! println!("Buildings: {}", buildings.len());
//!
//! if let Some(terms) = reader.policy_terms()? {
//!     println!("Layers: {}", terms.layer_terms.len());
//! }
//! # Ok::<(), sovreader::error::ExtractError>(())
//! ```

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod excel;
pub mod reader;
pub mod types;
pub mod writer;

// Re-export commonly used types
pub use config::ExtractConfig;
pub use error::{ExtractError, ExtractResult};
pub use reader::SovReader;
pub use types::{Item, ItemValue, LayerTerms, PerilTerms, PolicyTerms, SovDocument, ZoneTerms};
