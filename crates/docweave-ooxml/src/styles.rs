//! Style definitions parsing (word/styles.xml)
//!
//! Paragraphs and runs reference styles by ID, while callers usually speak in
//! display names ("List Number 2", "Heading 1"). [`StyleSheet::find`] bridges
//! the two. Documents derived from Word templates frequently lack the
//! built-in styles docweave relies on, so [`builtin_style_xml`] can produce
//! definitions to inject on demand.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{OoxmlError, Result};

/// Collection of styles from a document
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    /// All styles, keyed by style ID
    styles: HashMap<String, Style>,
    /// Default paragraph style ID
    pub default_paragraph: Option<String>,
}

/// A Word style definition
#[derive(Debug, Clone)]
pub struct Style {
    /// Style ID (used in document references)
    pub id: String,
    /// Display name
    pub name: String,
    /// Style type
    pub style_type: StyleType,
    /// Base style ID (for inheritance)
    pub based_on: Option<String>,
    /// Outline level (for headings, 0-8, where 0 = Heading 1)
    pub outline_level: Option<u8>,
}

/// Type of style
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleType {
    /// Paragraph style
    Paragraph,
    /// Character (run) style
    Character,
    /// Table style
    Table,
    /// Numbering style
    Numbering,
}

impl StyleSheet {
    /// Parse styles from XML bytes
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        reader.config_mut().trim_text(true);

        let mut stylesheet = StyleSheet::default();
        let mut buf = Vec::new();
        let mut current_style: Option<StyleBuilder> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                    let name = e.local_name();
                    match (name.as_ref(), current_style.as_mut()) {
                        (b"style", _) => {
                            let mut builder = StyleBuilder::default();

                            if let Some(t) = get_attr(e, b"w:type") {
                                builder.style_type = Some(match t.as_str() {
                                    "character" => StyleType::Character,
                                    "table" => StyleType::Table,
                                    "numbering" => StyleType::Numbering,
                                    _ => StyleType::Paragraph,
                                });
                            }
                            builder.id = get_attr(e, b"w:styleId");
                            builder.is_default = matches!(
                                get_attr(e, b"w:default").as_deref(),
                                Some("1") | Some("true")
                            );

                            current_style = Some(builder);
                        }
                        (b"name", Some(style)) => style.name = get_attr(e, b"w:val"),
                        (b"basedOn", Some(style)) => style.based_on = get_attr(e, b"w:val"),
                        (b"outlineLvl", Some(style)) => {
                            style.outline_level =
                                get_attr(e, b"w:val").and_then(|v| v.parse().ok());
                        }
                        _ => {}
                    }
                }
                Ok(Event::End(ref e)) => {
                    if e.local_name().as_ref() == b"style" {
                        if let Some(builder) = current_style.take() {
                            let is_default = builder.is_default;
                            if let Some(style) = builder.build() {
                                if is_default && style.style_type == StyleType::Paragraph {
                                    stylesheet.default_paragraph = Some(style.id.clone());
                                }
                                stylesheet.styles.insert(style.id.clone(), style);
                            }
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(OoxmlError::Xml(e)),
                _ => {}
            }
            buf.clear();
        }

        // A self-closing <w:style .../> never produces an End event
        if let Some(style) = current_style.and_then(StyleBuilder::build) {
            stylesheet.styles.insert(style.id.clone(), style);
        }

        Ok(stylesheet)
    }

    /// The style sheet of a blank document
    pub fn builtin() -> Self {
        let mut sheet = StyleSheet {
            default_paragraph: Some("Normal".to_string()),
            ..Default::default()
        };
        for style in builtin_style_ids().iter().filter_map(|id| builtin_style(id)) {
            sheet.insert(style);
        }
        sheet
    }

    /// Get a style by ID
    pub fn get(&self, id: &str) -> Option<&Style> {
        self.styles.get(id)
    }

    /// Find a style by ID or display name.
    ///
    /// Names compare case-insensitively ("Heading 1" matches Word's "heading 1"),
    /// and a name with its spaces removed also matches an ID ("List Number 2"
    /// matches `ListNumber2`).
    pub fn find(&self, name_or_id: &str) -> Option<&Style> {
        if let Some(style) = self.styles.get(name_or_id) {
            return Some(style);
        }
        let compact = compact_name(name_or_id);
        self.styles.values().find(|s| {
            s.name.eq_ignore_ascii_case(name_or_id) || s.id.eq_ignore_ascii_case(&compact)
        })
    }

    /// Register a style (used after injecting a definition into styles.xml)
    pub fn insert(&mut self, style: Style) {
        self.styles.insert(style.id.clone(), style);
    }

    /// Get all styles
    pub fn all(&self) -> impl Iterator<Item = &Style> {
        self.styles.values()
    }
}

#[derive(Default)]
struct StyleBuilder {
    id: Option<String>,
    name: Option<String>,
    style_type: Option<StyleType>,
    based_on: Option<String>,
    outline_level: Option<u8>,
    is_default: bool,
}

impl StyleBuilder {
    fn build(self) -> Option<Style> {
        let id = self.id?;
        Some(Style {
            name: self.name.unwrap_or_else(|| id.clone()),
            id,
            style_type: self.style_type.unwrap_or(StyleType::Paragraph),
            based_on: self.based_on,
            outline_level: self.outline_level,
        })
    }
}

fn compact_name(name: &str) -> String {
    name.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Map a style name or ID onto the ID of a style docweave knows how to define.
///
/// Returns `None` for anything that is not built in.
pub fn builtin_style_id(name_or_id: &str) -> Option<String> {
    let compact = compact_name(name_or_id).to_ascii_lowercase();
    let numbered = |prefix: &str, min: u8| {
        compact
            .strip_prefix(prefix)
            .and_then(|n| n.parse::<u8>().ok())
            .filter(|n| (min..=9).contains(n))
    };

    match compact.as_str() {
        "normal" => Some("Normal".to_string()),
        "title" => Some("Title".to_string()),
        "listnumber" => Some("ListNumber".to_string()),
        "tablegrid" => Some("TableGrid".to_string()),
        "defaultparagraphfont" => Some("DefaultParagraphFont".to_string()),
        _ => numbered("heading", 1)
            .map(|n| format!("Heading{}", n))
            .or_else(|| numbered("listnumber", 2).map(|n| format!("ListNumber{}", n))),
    }
}

/// Produce the `<w:style>` definition of a built-in style.
///
/// `list_num_id` is the numbering instance (`w:numId`) the list styles point at.
pub fn builtin_style_xml(style_id: &str, list_num_id: u32) -> Option<String> {
    let xml = match style_id {
        "Normal" => r#"<w:style w:type="paragraph" w:default="1" w:styleId="Normal"><w:name w:val="Normal"/><w:qFormat/></w:style>"#.to_string(),
        "DefaultParagraphFont" => r#"<w:style w:type="character" w:default="1" w:styleId="DefaultParagraphFont"><w:name w:val="Default Paragraph Font"/><w:uiPriority w:val="1"/><w:semiHidden/><w:unhideWhenUsed/></w:style>"#.to_string(),
        "Title" => r#"<w:style w:type="paragraph" w:styleId="Title"><w:name w:val="Title"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:uiPriority w:val="10"/><w:qFormat/><w:pPr><w:spacing w:after="300"/><w:contextualSpacing/></w:pPr><w:rPr><w:sz w:val="56"/></w:rPr></w:style>"#.to_string(),
        "TableGrid" => r#"<w:style w:type="table" w:styleId="TableGrid"><w:name w:val="Table Grid"/><w:uiPriority w:val="59"/><w:tblPr><w:tblBorders><w:top w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:left w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:bottom w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:right w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideH w:val="single" w:sz="4" w:space="0" w:color="auto"/><w:insideV w:val="single" w:sz="4" w:space="0" w:color="auto"/></w:tblBorders></w:tblPr></w:style>"#.to_string(),
        _ => {
            if let Some(level) = style_id.strip_prefix("Heading").and_then(|n| n.parse::<u8>().ok()) {
                let size = match level {
                    1 => 32,
                    2 => 28,
                    3 => 26,
                    _ => 24,
                };
                format!(
                    r#"<w:style w:type="paragraph" w:styleId="Heading{level}"><w:name w:val="heading {level}"/><w:basedOn w:val="Normal"/><w:next w:val="Normal"/><w:uiPriority w:val="9"/><w:qFormat/><w:pPr><w:keepNext/><w:keepLines/><w:spacing w:before="240" w:after="60"/><w:outlineLvl w:val="{outline}"/></w:pPr><w:rPr><w:b/><w:sz w:val="{size}"/></w:rPr></w:style>"#,
                    level = level,
                    outline = level - 1,
                    size = size,
                )
            } else if let Some(suffix) = style_id.strip_prefix("ListNumber") {
                let level: u8 = if suffix.is_empty() { 1 } else { suffix.parse().ok()? };
                let name = if level == 1 {
                    "List Number".to_string()
                } else {
                    format!("List Number {}", level)
                };
                format!(
                    r#"<w:style w:type="paragraph" w:styleId="{id}"><w:name w:val="{name}"/><w:basedOn w:val="Normal"/><w:uiPriority w:val="99"/><w:unhideWhenUsed/><w:pPr><w:numPr><w:ilvl w:val="{ilvl}"/><w:numId w:val="{num_id}"/></w:numPr><w:contextualSpacing/></w:pPr></w:style>"#,
                    id = style_id,
                    name = name,
                    ilvl = level - 1,
                    num_id = list_num_id,
                )
            } else {
                return None;
            }
        }
    };
    Some(xml)
}

/// Build the [`Style`] record matching a built-in definition
pub(crate) fn builtin_style(style_id: &str) -> Option<Style> {
    let xml = builtin_style_xml(style_id, 1)?;
    let sheet = StyleSheet::parse(xml.as_bytes()).ok()?;
    sheet.get(style_id).cloned()
}

/// Insert a `<w:style>` definition at the end of a styles part
pub(crate) fn insert_style_xml(styles_xml: &str, style_xml: &str) -> String {
    match styles_xml.rfind("</w:styles>") {
        Some(pos) => format!("{}{}{}", &styles_xml[..pos], style_xml, &styles_xml[pos..]),
        None => styles_xml.to_string(),
    }
}

/// IDs of every built-in style, in the order a blank document defines them
fn builtin_style_ids() -> Vec<String> {
    let mut ids = vec![
        "Normal".to_string(),
        "DefaultParagraphFont".to_string(),
        "Title".to_string(),
    ];
    ids.extend((1..=9).map(|n| format!("Heading{}", n)));
    ids.push("ListNumber".to_string());
    ids.extend((2..=9).map(|n| format!("ListNumber{}", n)));
    ids.push("TableGrid".to_string());
    ids
}

/// The styles part of a blank document
pub(crate) fn default_styles_xml(list_num_id: u32) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:docDefaults><w:rPrDefault><w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:eastAsia="SimSun" w:cs="Calibri"/><w:sz w:val="22"/><w:szCs w:val="22"/><w:lang w:val="en-US" w:eastAsia="zh-CN"/></w:rPr></w:rPrDefault><w:pPrDefault><w:pPr><w:spacing w:after="160" w:line="259" w:lineRule="auto"/></w:pPr></w:pPrDefault></w:docDefaults>"#,
    );

    for id in builtin_style_ids() {
        if let Some(style) = builtin_style_xml(&id, list_num_id) {
            xml.push_str(&style);
        }
    }
    xml.push_str("</w:styles>");
    xml
}

fn get_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}
