//! Attribute paths and routing of cell values into an [`Item`]
//!
//! | Attribute            | Stored as                                  |
//! |----------------------|--------------------------------------------|
//! | simple field         | `"item_key": "B-1"`                        |
//! | `cope[stories]`      | `"cope": {"stories": 3}`                   |
//! | `tiv[bldg][usd]`     | `"tiv": {"bldg": {"usd": 1000000}}`        |
//! | anything else        | `"address": {"value": "1 Main St"}`        |

use crate::core::cell_value::{coerce, CellValue};
use crate::error::{ExtractError, ExtractResult};
use crate::types::{Item, ItemAttribute, ItemValue};
use calamine::Data;
use indexmap::IndexMap;
use std::fmt;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributePath {
    /// Reserved field written as a bare scalar
    Simple(String),
    /// `root[key]`
    Keyed { root: String, key: String },
    /// `root[key][subkey]`
    Nested {
        root: String,
        key: String,
        subkey: String,
    },
    /// Plain attribute wrapped as `{value}`
    Wrapped(String),
}

impl AttributePath {
    pub fn parse(attribute: &str, simple_fields: &[String]) -> ExtractResult<Self> {
        let attribute = attribute.trim();
        if simple_fields.iter().any(|field| field == attribute) {
            return Ok(AttributePath::Simple(attribute.to_string()));
        }
        if !attribute.contains('[') {
            return Ok(AttributePath::Wrapped(attribute.to_string()));
        }

        let invalid = |reason: &str| ExtractError::InvalidAttributePath {
            attribute: attribute.to_string(),
            reason: reason.to_string(),
        };
        if attribute.starts_with('[') {
            return Err(invalid("missing root name"));
        }

        let pieces: Vec<&str> = attribute
            .split(['[', ']'])
            .filter(|piece| !piece.is_empty())
            .collect();
        match pieces.as_slice() {
            [_] => Err(invalid("bracket without a segment")),
            [root, key] => Ok(AttributePath::Keyed {
                root: root.to_string(),
                key: key.to_string(),
            }),
            [root, key, subkey] => Ok(AttributePath::Nested {
                root: root.to_string(),
                key: key.to_string(),
                subkey: subkey.to_string(),
            }),
            _ => Err(invalid("more than two bracket segments")),
        }
    }

    /// Top-level key this path writes to
    pub fn root(&self) -> &str {
        match self {
            AttributePath::Simple(name) | AttributePath::Wrapped(name) => name,
            AttributePath::Keyed { root, .. } | AttributePath::Nested { root, .. } => root,
        }
    }
}

impl fmt::Display for AttributePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributePath::Simple(name) | AttributePath::Wrapped(name) => write!(f, "{}", name),
            AttributePath::Keyed { root, key } => write!(f, "{}[{}]", root, key),
            AttributePath::Nested { root, key, subkey } => {
                write!(f, "{}[{}][{}]", root, key, subkey)
            }
        }
    }
}

/// Write `value` at `path`, returning the updated item.
///
/// Simple and wrapped attributes overwrite; a bracketed path written twice
/// is a duplicate. A root already holding another shape is a conflict.
pub fn set_attr(mut item: Item, path: &AttributePath, value: CellValue) -> ExtractResult<Item> {
    let duplicate = || ExtractError::DuplicateAttribute {
        attribute: path.to_string(),
    };
    let conflict = |existing: &ItemValue| {
        debug!(attribute = %path, existing = existing.shape(), "Attribute root holds another shape");
        ExtractError::AttributeShapeConflict {
            attribute: path.to_string(),
        }
    };

    match path {
        AttributePath::Simple(name) => {
            item.insert(name.clone(), ItemValue::Scalar(value));
        }
        AttributePath::Keyed { root, key } => match item.get_mut(root) {
            None => {
                let mut map = IndexMap::new();
                map.insert(key.clone(), value);
                item.insert(root.clone(), ItemValue::Map(map));
            }
            Some(ItemValue::Map(map)) => {
                if map.contains_key(key) {
                    return Err(duplicate());
                }
                map.insert(key.clone(), value);
            }
            Some(existing) => return Err(conflict(&*existing)),
        },
        AttributePath::Nested { root, key, subkey } => match item.get_mut(root) {
            None => {
                let mut inner = IndexMap::new();
                inner.insert(subkey.clone(), value);
                let mut outer = IndexMap::new();
                outer.insert(key.clone(), inner);
                item.insert(root.clone(), ItemValue::NestedMap(outer));
            }
            Some(ItemValue::NestedMap(outer)) => {
                let inner = outer.entry(key.clone()).or_default();
                if inner.contains_key(subkey) {
                    return Err(duplicate());
                }
                inner.insert(subkey.clone(), value);
            }
            Some(existing) => return Err(conflict(&*existing)),
        },
        AttributePath::Wrapped(name) => match item.get_mut(name) {
            None => {
                item.insert(name.clone(), ItemValue::Wrapped(ItemAttribute { value }));
            }
            Some(ItemValue::Wrapped(attribute)) => attribute.value = value,
            Some(existing) => return Err(conflict(&*existing)),
        },
    }

    Ok(item)
}

/// Coerce one source cell and route it into `item`.
///
/// Blank cells leave the item untouched. Any failure is logged with the
/// attribute and cell address, then returned as [`ExtractError::Cell`].
pub fn map_cell(
    item: Item,
    path: &AttributePath,
    raw: Option<&Data>,
    address: &str,
) -> ExtractResult<Item> {
    let routed = coerce(raw, address).and_then(|value| {
        if value.is_blank() {
            Ok(item)
        } else {
            set_attr(item, path, value)
        }
    });

    routed.map_err(|source| {
        warn!(attribute = %path, address, error = %source, "Failed to map cell");
        ExtractError::Cell {
            attribute: path.to_string(),
            address: address.to_string(),
            source: Box::new(source),
        }
    })
}
