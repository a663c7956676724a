//! The editable DOCX package
//!
//! [`Docx`] ties the archive, the parsed body, the style sheet and the
//! document relationships together. Parts are kept in memory and the
//! archive is refreshed from the models on [`Docx::save`].

use std::collections::HashMap;
use std::io::Cursor;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::archive::{
    OoxmlArchive, CONTENT_TYPES_PART, DOCUMENT_PART, DOCUMENT_RELS_PART, NUMBERING_PART,
    STYLES_PART,
};
use crate::document::{Block, Document, Paragraph, Table};
use crate::error::{OoxmlError, Result};
use crate::image::{max_drawing_id, ImageInfo, Picture};
use crate::numbering::{append_decimal_list, default_numbering_xml};
use crate::relationships::Relationships;
use crate::styles::{
    builtin_style, builtin_style_id, builtin_style_xml, default_styles_xml, insert_style_xml,
    StyleSheet,
};

const STYLES_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml";
const NUMBERING_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml";

/// A Word document open for editing
#[derive(Debug, Clone)]
pub struct Docx {
    archive: OoxmlArchive,
    document: Document,
    styles: StyleSheet,
    relationships: Relationships,
    /// Numbering instance behind injected "List Number" styles
    list_num_id: Option<u32>,
    /// SHA-256 of embedded media to relationship ID
    media: HashMap<Vec<u8>, String>,
    next_drawing_id: u32,
}

impl Docx {
    /// Create a blank document with the built-in styles and a decimal list
    pub fn new() -> Self {
        let mut archive = OoxmlArchive::new();
        archive.set_string(CONTENT_TYPES_PART, BLANK_CONTENT_TYPES);
        archive.set_string("_rels/.rels", BLANK_PACKAGE_RELS);
        archive.set_string(STYLES_PART, default_styles_xml(1));
        archive.set_string(NUMBERING_PART, default_numbering_xml());

        let mut relationships = Relationships::new();
        relationships.add("styles.xml", Relationships::TYPE_STYLES);
        relationships.add("numbering.xml", Relationships::TYPE_NUMBERING);
        archive.set_string(DOCUMENT_RELS_PART, relationships.to_xml());

        let document = Document::from_parts(
            BLANK_DOCUMENT_HEAD.to_string(),
            vec![Block::SectionProperties(BLANK_SECTION.to_string())],
            BLANK_DOCUMENT_TAIL.to_string(),
        );
        archive.set_string(DOCUMENT_PART, document.to_xml());

        Self {
            archive,
            document,
            styles: StyleSheet::builtin(),
            relationships,
            list_num_id: Some(1),
            media: HashMap::new(),
            next_drawing_id: 1,
        }
    }

    /// Open a DOCX file
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        debug!(path = %path.as_ref().display(), "opening document");
        Self::from_archive(OoxmlArchive::open(path)?)
    }

    /// Load a DOCX from memory
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_archive(OoxmlArchive::from_reader(Cursor::new(bytes))?)
    }

    /// Wrap an unpacked archive
    pub fn from_archive(archive: OoxmlArchive) -> Result<Self> {
        let xml = String::from_utf8_lossy(archive.document_xml()?).into_owned();
        let document = Document::parse(&xml)?;
        let next_drawing_id = max_drawing_id(&xml)? + 1;

        let styles = match archive.styles_xml() {
            Some(bytes) => StyleSheet::parse(bytes)?,
            None => StyleSheet::default(),
        };
        let relationships = match archive.document_rels_xml() {
            Some(bytes) => Relationships::parse(bytes)?,
            None => Relationships::new(),
        };

        Ok(Self {
            archive,
            document,
            styles,
            relationships,
            list_num_id: None,
            media: HashMap::new(),
            next_drawing_id,
        })
    }

    /// The parsed body
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// The style sheet, including injected built-in styles
    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    /// The underlying archive (parts are refreshed on save)
    pub fn archive(&self) -> &OoxmlArchive {
        &self.archive
    }

    /// All body blocks in order
    pub fn blocks(&self) -> &[Block] {
        self.document.blocks()
    }

    /// Body-level paragraphs
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.document.paragraphs()
    }

    /// Body-level tables
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.document.tables()
    }

    /// Display name of the style a paragraph uses, if it has one
    pub fn style_name<'a>(&'a self, paragraph: &'a Paragraph) -> Option<&'a str> {
        let id = paragraph.style_id()?;
        Some(self.styles.get(id).map(|s| s.name.as_str()).unwrap_or(id))
    }

    /// Append a paragraph, optionally styled by display name or style ID
    pub fn add_paragraph(&mut self, text: &str, style: Option<&str>) -> Result<&mut Paragraph> {
        let style_id = style.map(|s| self.resolve_style(s)).transpose()?;
        let mut paragraph = Paragraph::new();
        paragraph.set_style_id(style_id);
        if !text.is_empty() {
            paragraph.add_run(text);
        }
        Ok(self.document.push_paragraph(paragraph))
    }

    /// Append a heading; level 0 is the document title
    pub fn add_heading(&mut self, text: &str, level: u32) -> Result<&mut Paragraph> {
        let style = match level {
            0 => "Title".to_string(),
            1..=9 => format!("Heading {}", level),
            _ => return Err(OoxmlError::InvalidHeadingLevel(level)),
        };
        self.add_paragraph(text, Some(&style))
    }

    /// Append a paragraph holding a picture read from `path`
    pub fn add_picture<P: AsRef<Path>>(&mut self, path: P) -> Result<&mut Paragraph> {
        let bytes = std::fs::read(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "embedding picture");
        self.add_picture_bytes(&bytes)
    }

    /// Append a paragraph holding a picture from raw file bytes
    pub fn add_picture_bytes(&mut self, bytes: &[u8]) -> Result<&mut Paragraph> {
        let info = ImageInfo::detect(bytes)?;
        let rel_id = self.embed_media(bytes, &info);

        let picture = Picture::new(
            self.next_drawing_id,
            rel_id,
            info.width_emu(),
            info.height_emu(),
        );
        self.next_drawing_id += 1;

        let mut paragraph = Paragraph::new();
        paragraph.add_picture(picture);
        Ok(self.document.push_paragraph(paragraph))
    }

    /// Append an unstyled table of empty cells
    pub fn add_table(&mut self, rows: usize, cols: usize) -> &mut Table {
        self.document.push_table(Table::new(rows, cols))
    }

    /// Remove every body paragraph; tables and section properties stay
    pub fn clear_paragraphs(&mut self) {
        self.document.clear_paragraphs();
    }

    /// Write the document to `path`, replacing any existing file
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.flush();
        self.archive.write_to_file(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "saved document");
        Ok(())
    }

    /// Serialize the document to DOCX bytes
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.flush();
        let mut buffer = Cursor::new(Vec::new());
        self.archive.write_to(&mut buffer)?;
        Ok(buffer.into_inner())
    }

    fn flush(&mut self) {
        self.archive
            .set_string(DOCUMENT_PART, self.document.to_xml());
        self.archive
            .set_string(DOCUMENT_RELS_PART, self.relationships.to_xml());
    }

    /// Store media once per distinct content and return its relationship ID
    fn embed_media(&mut self, bytes: &[u8], info: &ImageInfo) -> String {
        let digest = Sha256::digest(bytes).to_vec();
        if let Some(rel_id) = self.media.get(&digest) {
            return rel_id.clone();
        }

        let mut n = 1;
        let target = loop {
            let target = format!("media/image{}.{}", n, info.extension);
            if !self.archive.contains(&format!("word/{}", target)) {
                break target;
            }
            n += 1;
        };

        self.archive.set(format!("word/{}", target), bytes.to_vec());
        self.archive
            .ensure_default_content_type(info.extension, info.content_type);
        let rel_id = self.relationships.add_image(target);
        self.media.insert(digest, rel_id.clone());
        rel_id
    }

    /// Resolve a style name or ID, injecting built-in definitions on demand
    fn resolve_style(&mut self, name: &str) -> Result<String> {
        if let Some(style) = self.styles.find(name) {
            return Ok(style.id.clone());
        }
        let id = builtin_style_id(name).ok_or_else(|| OoxmlError::StyleNotFound(name.to_string()))?;
        if self.styles.get(&id).is_none() {
            self.inject_style(&id)?;
        }
        Ok(id)
    }

    fn inject_style(&mut self, style_id: &str) -> Result<()> {
        match self.archive.get_string(STYLES_PART) {
            Some(styles) => {
                let num_id = if style_id.starts_with("ListNumber") {
                    self.ensure_list_numbering()?
                } else {
                    0
                };
                let style_xml = builtin_style_xml(style_id, num_id)
                    .ok_or_else(|| OoxmlError::StyleNotFound(style_id.to_string()))?;
                self.archive
                    .set_string(STYLES_PART, insert_style_xml(&styles, &style_xml));
                if let Some(style) = builtin_style(style_id) {
                    self.styles.insert(style);
                }
            }
            None => {
                // The default part defines every list style, so it needs a live numbering instance
                let num_id = self.ensure_list_numbering()?;
                let styles = default_styles_xml(num_id);
                self.styles = StyleSheet::parse(styles.as_bytes())?;
                self.archive.set_string(STYLES_PART, styles);
                if self
                    .relationships
                    .find_by_type(Relationships::TYPE_STYLES)
                    .is_none()
                {
                    self.relationships
                        .add("styles.xml", Relationships::TYPE_STYLES);
                }
                self.archive
                    .ensure_override_content_type("/word/styles.xml", STYLES_CONTENT_TYPE);
            }
        }
        debug!(style = style_id, "injected built-in style");
        Ok(())
    }

    /// Numbering instance for injected list styles, created on first use
    fn ensure_list_numbering(&mut self) -> Result<u32> {
        if let Some(num_id) = self.list_num_id {
            return Ok(num_id);
        }

        let num_id = match self.archive.get_string(NUMBERING_PART) {
            Some(numbering) => {
                let (updated, num_id) = append_decimal_list(&numbering)?;
                self.archive.set_string(NUMBERING_PART, updated);
                num_id
            }
            None => {
                self.archive
                    .set_string(NUMBERING_PART, default_numbering_xml());
                if self
                    .relationships
                    .find_by_type(Relationships::TYPE_NUMBERING)
                    .is_none()
                {
                    self.relationships
                        .add("numbering.xml", Relationships::TYPE_NUMBERING);
                }
                self.archive
                    .ensure_override_content_type("/word/numbering.xml", NUMBERING_CONTENT_TYPE);
                1
            }
        };

        self.list_num_id = Some(num_id);
        Ok(num_id)
    }
}

impl Default for Docx {
    fn default() -> Self {
        Self::new()
    }
}

const BLANK_CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/><Override PartName="/word/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.styles+xml"/><Override PartName="/word/numbering.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.numbering+xml"/></Types>"#;

const BLANK_PACKAGE_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

const BLANK_DOCUMENT_HEAD: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture"><w:body>"#;

// US Letter with 1" margins
const BLANK_SECTION: &str = r#"<w:sectPr><w:pgSz w:w="12240" w:h="15840"/><w:pgMar w:top="1440" w:right="1440" w:bottom="1440" w:left="1440" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#;

const BLANK_DOCUMENT_TAIL: &str = "</w:body></w:document>";

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::ParagraphChild;
    use crate::image::tests::tiny_png;
    use crate::test_utils::create_template;

    #[test]
    fn test_blank_document_has_builtin_parts() {
        let docx = Docx::new();
        assert!(docx.archive().contains(STYLES_PART));
        assert!(docx.archive().contains(NUMBERING_PART));
        assert_eq!(docx.paragraphs().count(), 0);
        assert!(matches!(docx.blocks(), [Block::SectionProperties(_)]));
    }

    #[test]
    fn test_add_paragraph_resolves_style_names() {
        let mut docx = Docx::new();
        docx.add_paragraph("one", Some("List Number")).unwrap();
        docx.add_paragraph("two", Some("List Number 2")).unwrap();
        docx.add_paragraph("plain", None).unwrap();

        let styles: Vec<_> = docx.paragraphs().map(|p| p.style_id()).collect();
        assert_eq!(styles, vec![Some("ListNumber"), Some("ListNumber2"), None]);
        let first = docx.paragraphs().next().unwrap();
        assert_eq!(docx.style_name(first), Some("List Number"));
    }

    #[test]
    fn test_unknown_style_is_an_error() {
        let mut docx = Docx::new();
        assert!(matches!(
            docx.add_paragraph("x", Some("Fancy Quote")),
            Err(OoxmlError::StyleNotFound(ref s)) if s == "Fancy Quote"
        ));
    }

    #[test]
    fn test_heading_levels() {
        let mut docx = Docx::new();
        docx.add_heading("Doc", 0).unwrap();
        docx.add_heading("Intro", 1).unwrap();
        docx.add_heading("Deep", 9).unwrap();
        assert!(matches!(
            docx.add_heading("Too deep", 10),
            Err(OoxmlError::InvalidHeadingLevel(10))
        ));

        let styles: Vec<_> = docx.paragraphs().filter_map(|p| p.style_id()).collect();
        assert_eq!(styles, vec!["Title", "Heading1", "Heading9"]);
    }

    #[test]
    fn test_template_gets_missing_list_styles_injected() {
        let mut docx = Docx::from_bytes(&create_template("")).unwrap();
        assert!(docx.styles().find("List Number 3").is_none());

        docx.add_paragraph("item", Some("List Number 3")).unwrap();
        docx.add_paragraph("item", Some("List Number")).unwrap();

        let bytes = docx.to_bytes().unwrap();
        let reopened = Docx::from_bytes(&bytes).unwrap();
        assert_eq!(reopened.styles().find("List Number 3").unwrap().id, "ListNumber3");

        let numbering = reopened.archive().get_string(NUMBERING_PART).unwrap();
        assert!(numbering.contains(r#"<w:num w:numId="1">"#));
        let styles = reopened.archive().get_string(STYLES_PART).unwrap();
        assert!(styles.contains(r#"<w:numId w:val="1"/>"#));
        let content_types = reopened.archive().get_string(CONTENT_TYPES_PART).unwrap();
        assert!(content_types.contains("/word/numbering.xml"));
    }

    #[test]
    fn test_template_without_styles_gets_numbered_lists() {
        let mut archive = Docx::new().archive().clone();
        archive.remove(STYLES_PART);
        archive.remove(NUMBERING_PART);
        let mut docx = Docx::from_archive(archive).unwrap();

        docx.add_heading("H", 1).unwrap();
        docx.add_paragraph("item", Some("List Number")).unwrap();

        let reopened = Docx::from_bytes(&docx.to_bytes().unwrap()).unwrap();
        let styles = reopened.archive().get_string(STYLES_PART).unwrap();
        assert!(!styles.contains(r#"<w:numId w:val="0"/>"#));
        assert!(styles.contains(r#"<w:numId w:val="1"/>"#));

        let numbering = reopened.archive().get_string(NUMBERING_PART).unwrap();
        assert!(numbering.contains(r#"<w:num w:numId="1">"#));
        let styles_rels = reopened
            .archive()
            .get_string(DOCUMENT_RELS_PART)
            .unwrap()
            .matches("relationships/styles\"")
            .count();
        assert_eq!(styles_rels, 1);
    }

    #[test]
    fn test_add_picture_embeds_media_once() {
        let png = tiny_png();
        let mut docx = Docx::new();
        docx.add_picture_bytes(&png).unwrap();
        docx.add_picture_bytes(&png).unwrap();

        let pictures: Vec<_> = docx
            .paragraphs()
            .flat_map(|p| p.children())
            .filter_map(|c| match c {
                ParagraphChild::Picture(p) => Some(p.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(pictures.len(), 2);
        assert_eq!(pictures[0].rel_id, pictures[1].rel_id);
        assert_ne!(pictures[0].id, pictures[1].id);
        assert_eq!(pictures[0].width_emu, 3 * crate::image::EMU_PER_PIXEL);

        let bytes = docx.to_bytes().unwrap();
        let reopened = Docx::from_bytes(&bytes).unwrap();
        assert!(reopened.archive().contains("word/media/image1.png"));
        assert!(!reopened.archive().contains("word/media/image2.png"));
        let types = reopened.archive().get_string(CONTENT_TYPES_PART).unwrap();
        assert!(types.contains(r#"Extension="png""#));
    }

    #[test]
    fn test_missing_picture_file() {
        let mut docx = Docx::new();
        assert!(matches!(
            docx.add_picture("/nonexistent/picture.png"),
            Err(OoxmlError::Io(_))
        ));
    }

    #[test]
    fn test_table_roundtrip() {
        let mut docx = Docx::new();
        let table = docx.add_table(2, 2);
        table.cell_mut(0, 0).unwrap().set_text("A");
        table.cell_mut(1, 1).unwrap().set_text("2");

        let reopened = Docx::from_bytes(&docx.to_bytes().unwrap()).unwrap();
        let table = reopened.tables().next().unwrap();
        assert_eq!(table.cell(0, 0).unwrap().text(), "A");
        assert_eq!(table.cell(1, 1).unwrap().text(), "2");
        assert_eq!(table.style_id(), None);
    }
}
