use crate::core::cell_value::CellValue;
use indexmap::IndexMap;
use serde::Serialize;

//==============================================================================
// Building / Location Records
//==============================================================================

/// Value stored under one key of an [`Item`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ItemValue {
    /// Simple field, written as a bare value
    Scalar(CellValue),
    /// `group[sub]`
    Map(IndexMap<String, CellValue>),
    /// `group[sub][subsub]`
    NestedMap(IndexMap<String, IndexMap<String, CellValue>>),
    /// Plain attribute, written as `{"value": ...}`
    Wrapped(ItemAttribute),
}

impl ItemValue {
    /// Shape name used in diagnostics
    pub fn shape(&self) -> &'static str {
        match self {
            ItemValue::Scalar(_) => "scalar",
            ItemValue::Map(_) => "map",
            ItemValue::NestedMap(_) => "nested map",
            ItemValue::Wrapped(_) => "wrapped value",
        }
    }
}

/// Single-field wrapper for attributes that may later carry provenance
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemAttribute {
    pub value: CellValue,
}

/// One extracted row of an items table (a building or location)
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Item(IndexMap<String, ItemValue>);

impl Item {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&ItemValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, value: ItemValue) -> Option<ItemValue> {
        self.0.insert(key.into(), value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut ItemValue> {
        self.0.get_mut(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

//==============================================================================
// Policy Terms
//==============================================================================

/// Participation in a layer: an explicit amount, otherwise a percent share
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Participation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

impl Participation {
    pub fn percent(percent: f64) -> Self {
        Self {
            percent: Some(percent),
            amount: None,
        }
    }

    pub fn amount(amount: f64) -> Self {
        Self {
            percent: None,
            amount: Some(amount),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayerTerms {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<f64>,
    pub attachment: f64,
    pub participation: Participation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub premium: Option<f64>,
}

/// Terms shared by every subperil of one peril group
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PerilTerms {
    pub subperil_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sublimit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_deductible: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_deductible: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_deductible: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_deductible_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bi_days_deductible: Option<f64>,
}

impl PerilTerms {
    /// Append a subperil once, keeping first-seen order
    pub fn add_subperil(&mut self, subperil: &str) {
        if !self.subperil_types.iter().any(|existing| existing == subperil) {
            self.subperil_types.push(subperil.to_string());
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ZoneTerms {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sublimit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_deductible: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_deductible: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_deductible: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_deductible_type: Option<String>,
    pub is_excluded: bool,
}

impl ZoneTerms {
    /// A zone is worth emitting when it limits, deducts or excludes something
    pub fn is_applicable(&self) -> bool {
        let non_zero = |value: Option<f64>| value.is_some_and(|v| v != 0.0);
        self.sublimit.is_some()
            || non_zero(self.location_deductible)
            || non_zero(self.min_deductible)
            || non_zero(self.max_deductible)
            || self.is_excluded
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PolicyTerms {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub insured_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inception_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub underwriter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_of_business: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    pub layer_terms: Vec<LayerTerms>,
    /// Group label → terms
    pub peril_terms: IndexMap<String, PerilTerms>,
    /// Zone group → zone → terms
    pub zone_terms: IndexMap<String, IndexMap<String, ZoneTerms>>,
    pub excluded_subperil_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

//==============================================================================
// Document
//==============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Metadata {
    pub client_name: String,
    pub sov_id: String,
    pub source_filename: String,
    pub full_name: String,
    pub document_type: String,
    pub timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_terms_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_name: Option<String>,
}

/// Everything extracted from one workbook
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SovDocument {
    pub id: String,
    pub source_filename: String,
    pub num_buildings: usize,
    pub buildings: Vec<Item>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub policy_terms: Option<PolicyTerms>,
    pub extra_data: IndexMap<String, CellValue>,
    pub metadata: Metadata,
}
