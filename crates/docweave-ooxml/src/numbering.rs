//! Numbering definitions (word/numbering.xml)
//!
//! The "List Number" paragraph styles point at a decimal multi-level
//! numbering instance. Blank documents ship one; documents opened from
//! templates get one appended the first time a list style has to be injected.

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{OoxmlError, Result};

/// Highest `w:abstractNumId` and `w:numId` declared in a numbering part
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NumberingIds {
    /// Largest abstract numbering ID, if any
    pub max_abstract: Option<u32>,
    /// Largest numbering instance ID, if any
    pub max_num: Option<u32>,
}

impl NumberingIds {
    /// Scan a numbering part for the IDs already in use
    pub fn scan(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);
        let mut ids = NumberingIds::default();
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    let id = |key: &[u8]| {
                        e.attributes()
                            .filter_map(|a| a.ok())
                            .find(|a| a.key.as_ref() == key)
                            .and_then(|a| std::str::from_utf8(&a.value).ok()?.parse::<u32>().ok())
                    };
                    match e.local_name().as_ref() {
                        b"abstractNum" => {
                            ids.max_abstract = ids.max_abstract.max(id(b"w:abstractNumId"));
                        }
                        b"num" => ids.max_num = ids.max_num.max(id(b"w:numId")),
                        _ => {}
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(ids)
    }

    /// IDs for a new abstract definition and instance
    pub fn next(&self) -> (u32, u32) {
        (
            self.max_abstract.map_or(0, |n| n + 1),
            self.max_num.map_or(1, |n| n + 1),
        )
    }
}

/// A decimal multi-level numbering definition ("1.", "a.", "i." ...)
pub fn decimal_abstract_num(abstract_id: u32) -> String {
    const FORMATS: [&str; 3] = ["decimal", "lowerLetter", "lowerRoman"];
    let mut xml = format!(
        r#"<w:abstractNum w:abstractNumId="{}"><w:multiLevelType w:val="multilevel"/>"#,
        abstract_id
    );
    for ilvl in 0..9u32 {
        let indent = 720 * (ilvl + 1);
        xml.push_str(&format!(
            r#"<w:lvl w:ilvl="{ilvl}"><w:start w:val="1"/><w:numFmt w:val="{fmt}"/><w:lvlText w:val="%{n}."/><w:lvlJc w:val="left"/><w:pPr><w:ind w:left="{indent}" w:hanging="360"/></w:pPr></w:lvl>"#,
            ilvl = ilvl,
            fmt = FORMATS[(ilvl % 3) as usize],
            n = ilvl + 1,
            indent = indent,
        ));
    }
    xml.push_str("</w:abstractNum>");
    xml
}

/// A numbering instance bound to an abstract definition
pub fn num_instance(num_id: u32, abstract_id: u32) -> String {
    format!(
        r#"<w:num w:numId="{}"><w:abstractNumId w:val="{}"/></w:num>"#,
        num_id, abstract_id
    )
}

/// The numbering part of a blank document, exposing instance `1`
pub(crate) fn default_numbering_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">{}{}</w:numbering>"#,
        decimal_abstract_num(0),
        num_instance(1, 0)
    )
}

/// Append a decimal list definition to an existing numbering part.
///
/// Abstract definitions must precede every `<w:num>` element, so the new
/// abstract definition goes before the first instance. Returns the updated
/// part and the new instance ID.
pub fn append_decimal_list(numbering_xml: &str) -> Result<(String, u32)> {
    let expanded = expand_empty_root(numbering_xml)?;
    let numbering_xml = expanded.as_deref().unwrap_or(numbering_xml);

    let ids = NumberingIds::scan(numbering_xml.as_bytes())?;
    let (abstract_id, num_id) = ids.next();

    let close = numbering_xml.rfind("</w:numbering>").ok_or_else(|| {
        OoxmlError::InvalidStructure("numbering part has no closing tag".to_string())
    })?;
    let insert_abstract = numbering_xml
        .find("<w:num ")
        .or_else(|| numbering_xml.find("<w:num>"))
        .unwrap_or(close);

    let mut updated = String::with_capacity(numbering_xml.len() + 2048);
    updated.push_str(&numbering_xml[..insert_abstract]);
    updated.push_str(&decimal_abstract_num(abstract_id));
    updated.push_str(&numbering_xml[insert_abstract..close]);
    updated.push_str(&num_instance(num_id, abstract_id));
    updated.push_str(&numbering_xml[close..]);

    Ok((updated, num_id))
}

/// Rewrite a self-closing `<w:numbering/>` root as an open/close pair.
///
/// Returns `None` when the root already has a closing tag.
fn expand_empty_root(xml: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_str(xml);
    loop {
        let before = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Empty(e) if e.local_name().as_ref() == b"numbering" => {
                let after = reader.buffer_position() as usize;
                let open = xml[before..after].trim_end_matches("/>").trim_end();
                let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                return Ok(Some(format!(
                    "{}{}></{}>{}",
                    &xml[..before],
                    open,
                    name,
                    &xml[after..]
                )));
            }
            Event::Start(_) | Event::Empty(_) | Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_numbering_ids() {
        let xml = default_numbering_xml();
        let ids = NumberingIds::scan(xml.as_bytes()).unwrap();
        assert_eq!(ids.max_abstract, Some(0));
        assert_eq!(ids.max_num, Some(1));
        assert_eq!(ids.next(), (1, 2));
    }

    #[test]
    fn test_empty_numbering_ids() {
        let ids = NumberingIds::scan(b"<w:numbering/>").unwrap();
        assert_eq!(ids.next(), (0, 1));
    }

    #[test]
    fn test_append_keeps_abstracts_before_instances() {
        let (xml, num_id) = append_decimal_list(&default_numbering_xml()).unwrap();
        assert_eq!(num_id, 2);

        let last_abstract = xml.rfind("<w:abstractNum ").unwrap();
        let first_num = xml.find("<w:num ").unwrap();
        assert!(last_abstract < first_num);
        assert!(xml.contains(r#"<w:num w:numId="2"><w:abstractNumId w:val="1"/></w:num>"#));
    }

    #[test]
    fn test_append_to_self_closing_part() {
        let part = r#"<?xml version="1.0" encoding="UTF-8"?>
<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"/>"#;
        let (xml, num_id) = append_decimal_list(part).unwrap();
        assert_eq!(num_id, 1);
        assert!(xml.contains(
            r#"<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:abstractNum w:abstractNumId="0">"#
        ));
        assert!(xml.ends_with(
            r#"<w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num></w:numbering>"#
        ));
        assert_eq!(NumberingIds::scan(xml.as_bytes()).unwrap().max_num, Some(1));
    }

    #[test]
    fn test_append_without_closing_tag_fails() {
        assert!(append_decimal_list("<w:numbering>").is_err());
    }
}
