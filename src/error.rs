use thiserror::Error;

pub type ExtractResult<T> = Result<T, ExtractError>;

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Workbook error: {0}")]
    Workbook(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Range '{name}' not found")]
    RangeNotFound { name: String },

    #[error("Range '{name}' has no header row above it")]
    MissingHeaderRow { name: String },

    #[error("Range '{name}' has duplicate header '{header}'")]
    DuplicateHeader { name: String, header: String },

    #[error("Column specification '{table}' has invalid column '{column}'")]
    InvalidColumnSpec { table: String, column: String },

    #[error("Invalid attribute '{attribute}': {reason}")]
    InvalidAttributePath { attribute: String, reason: String },

    #[error("Attribute '{attribute}' is set more than once")]
    DuplicateAttribute { attribute: String },

    #[error("Attribute '{attribute}' conflicts with an attribute of a different shape")]
    AttributeShapeConflict { attribute: String },

    #[error("Unsupported cell type '{kind}' at {address}")]
    UnsupportedCellType { kind: String, address: String },

    #[error("Error reading attribute '{attribute}' from cell {address}: {source}")]
    Cell {
        attribute: String,
        address: String,
        #[source]
        source: Box<ExtractError>,
    },

    #[error("Policy terms version '{found}' is not supported (minimum major version {minimum})")]
    VersionIncompatibility { found: String, minimum: u32 },

    #[error("Workbook has no policy terms schema: range '{anchor}' not found")]
    MissingPolicyTermsSchema { anchor: String },
}

impl From<calamine::XlsxError> for ExtractError {
    fn from(error: calamine::XlsxError) -> Self {
        ExtractError::Workbook(error.to_string())
    }
}

impl From<zip::result::ZipError> for ExtractError {
    fn from(error: zip::result::ZipError) -> Self {
        ExtractError::Workbook(error.to_string())
    }
}

impl From<quick_xml::Error> for ExtractError {
    fn from(error: quick_xml::Error) -> Self {
        ExtractError::Workbook(error.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for ExtractError {
    fn from(error: quick_xml::events::attributes::AttrError) -> Self {
        ExtractError::Workbook(error.to_string())
    }
}
