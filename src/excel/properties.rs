//! Custom document properties (`docProps/custom.xml`)
//!
//! calamine does not expose custom properties, so they are read straight out
//! of the package:
//!
//! ```xml
//! <Properties xmlns="..." xmlns:vt="...">
//!   <property fmtid="{D5CDD505-2E9C-101B-9397-08002B2CF9AE}" pid="2" name="Ping Identifier">
//!     <vt:lpwstr>SOV-2023-0042</vt:lpwstr>
//!   </property>
//! </Properties>
//! ```

use crate::error::{ExtractError, ExtractResult};
use indexmap::IndexMap;
use quick_xml::escape::{resolve_xml_entity, unescape};
use quick_xml::events::Event;
use quick_xml::Reader;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use zip::result::ZipError;
use zip::ZipArchive;

const CUSTOM_PROPERTIES_PATH: &str = "docProps/custom.xml";
const TAG_PROPERTY: &[u8] = b"property";

/// Read all custom document properties of an OOXML package, in document order.
/// A package without `docProps/custom.xml` has no custom properties.
pub fn read_custom_properties(path: &Path) -> ExtractResult<IndexMap<String, String>> {
    let file = File::open(path)?;
    let mut archive = ZipArchive::new(BufReader::new(file))?;

    let xml = match archive.by_name(CUSTOM_PROPERTIES_PATH) {
        Ok(mut entry) => {
            let mut content = String::new();
            entry.read_to_string(&mut content)?;
            content
        }
        Err(ZipError::FileNotFound) => return Ok(IndexMap::new()),
        Err(error) => return Err(error.into()),
    };

    parse_custom_properties(&xml)
}

/// Parse the XML body of `docProps/custom.xml`
pub fn parse_custom_properties(xml: &str) -> ExtractResult<IndexMap<String, String>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut properties = IndexMap::new();
    let mut name: Option<String> = None;
    let mut in_value = false;
    let mut value = String::new();

    loop {
        match reader.read_event()? {
            Event::Start(event) if event.local_name().as_ref() == TAG_PROPERTY => {
                name = match event.try_get_attribute("name")? {
                    Some(attribute) => Some(unescape_text(&String::from_utf8_lossy(&attribute.value))?),
                    None => None,
                };
                value.clear();
            }
            Event::End(event) if event.local_name().as_ref() == TAG_PROPERTY => {
                if let Some(name) = name.take() {
                    properties.insert(name, value.trim().to_string());
                }
                in_value = false;
            }
            // The typed value element (vt:lpwstr, vt:i4, vt:bool, ...)
            Event::Start(_) if name.is_some() => in_value = true,
            Event::End(_) if name.is_some() => in_value = false,
            Event::Text(text) if in_value => {
                let content = text
                    .xml_content()
                    .map_err(|e| ExtractError::Workbook(e.to_string()))?;
                value.push_str(&content);
            }
            Event::CData(data) if in_value => {
                value.push_str(&String::from_utf8_lossy(&data));
            }
            Event::GeneralRef(reference) if in_value => {
                let raw = reference
                    .xml_content()
                    .map_err(|e| ExtractError::Workbook(e.to_string()))?;
                push_reference(&mut value, &raw)?;
            }
            Event::Eof => break,
            _ => (),
        }
    }

    Ok(properties)
}

fn unescape_text(raw: &str) -> ExtractResult<String> {
    unescape(raw)
        .map(|text| text.into_owned())
        .map_err(|e| ExtractError::Workbook(e.to_string()))
}

/// Append an entity or character reference (`amp`, `#38`, `#x26`)
fn push_reference(target: &mut String, raw: &str) -> ExtractResult<()> {
    if let Some(number) = raw.strip_prefix('#') {
        let code = match number.strip_prefix('x') {
            Some(hex) => u32::from_str_radix(hex, 16),
            None => number.parse::<u32>(),
        }
        .map_err(|_| ExtractError::Workbook(format!("Invalid character reference '&{};'", raw)))?;
        if let Some(character) = char::from_u32(code) {
            target.push(character);
        }
    } else if let Some(entity) = resolve_xml_entity(raw) {
        target.push_str(entity);
    } else {
        return Err(ExtractError::Workbook(format!("Unknown entity '&{};'", raw)));
    }
    Ok(())
}
