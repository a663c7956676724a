//! Document content parsing (word/document.xml)
//!
//! The body is split into its direct child elements by byte position. Each
//! paragraph and table is parsed into a small model but keeps the XML it was
//! read from, so a block that is never modified is written back verbatim.
//! Everything outside `<w:body>` is carried through untouched.

use std::fmt;
use std::ops::Range;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{OoxmlError, Result};
use crate::image::Picture;
use crate::writer;

/// A parsed Word document body
#[derive(Debug, Clone)]
pub struct Document {
    /// Everything up to and including `<w:body>`
    head: String,
    /// Body blocks in document order
    blocks: Vec<Block>,
    /// Everything from `</w:body>` on
    tail: String,
}

/// Block-level elements
#[derive(Debug, Clone)]
pub enum Block {
    /// A paragraph
    Paragraph(Paragraph),
    /// A table
    Table(Table),
    /// The body's section properties (`<w:sectPr>`), always kept last
    SectionProperties(String),
    /// Any other body element, kept as raw XML
    Other(String),
}

/// A paragraph with its content and style
#[derive(Debug, Clone, Default)]
pub struct Paragraph {
    style_id: Option<String>,
    alignment: Option<Alignment>,
    children: Vec<ParagraphChild>,
    /// Source XML, dropped on the first modification
    raw: Option<String>,
}

/// Child elements of a paragraph
#[derive(Debug, Clone)]
pub enum ParagraphChild {
    /// A text run
    Run(Run),
    /// A run holding an inline picture
    Picture(Picture),
}

/// A text run with formatting.
///
/// Formatting is tri-state: `None` means inherited from the style.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Run {
    /// The text content (`\t` for tabs, `\n` for breaks)
    pub text: String,
    /// Bold (`<w:b/>`)
    pub bold: Option<bool>,
    /// Italic (`<w:i/>`)
    pub italic: Option<bool>,
    /// Underline (`<w:u/>`), anything but `none` counts as underlined
    pub underline: Option<bool>,
    /// Font color
    pub color: Option<RgbColor>,
    /// Character style ID (`<w:rStyle/>`)
    pub style: Option<String>,
}

/// Paragraph alignment (`<w:jc/>`)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
    Distribute,
}

/// A 24-bit font color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RgbColor(pub u8, pub u8, pub u8);

/// A table
#[derive(Debug, Clone, Default)]
pub struct Table {
    style_id: Option<String>,
    rows: Vec<TableRow>,
    raw: Option<String>,
}

/// A table row
#[derive(Debug, Clone, Default)]
pub struct TableRow {
    /// Cells in this row
    pub cells: Vec<TableCell>,
}

/// A table cell
#[derive(Debug, Clone, Default)]
pub struct TableCell {
    /// Paragraphs in this cell
    pub paragraphs: Vec<Paragraph>,
}

/// Direct child elements of an element, located by byte offsets
#[derive(Debug)]
pub(crate) struct ElementChildren<'a> {
    /// Byte range of the whole element
    pub outer: Range<usize>,
    /// Byte range between the start and end tags, `None` when self-closing
    pub inner: Option<Range<usize>>,
    /// Raw XML of each direct child element
    pub items: Vec<&'a str>,
}

/// Find the first element named `local_name` and split out its direct children.
///
/// Text and comments directly inside the element are skipped.
pub(crate) fn children<'a>(xml: &'a str, local_name: &[u8]) -> Result<Option<ElementChildren<'a>>> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(false);

    let mut outer_start: Option<usize> = None;
    let mut inner_start = 0usize;
    let mut depth = 0u32;
    let mut child_start = 0usize;
    let mut items = Vec::new();

    loop {
        let before = reader.buffer_position() as usize;
        let event = reader.read_event()?;
        let after = reader.buffer_position() as usize;

        match (outer_start, event) {
            (None, Event::Start(e)) if e.local_name().as_ref() == local_name => {
                outer_start = Some(before);
                inner_start = after;
            }
            (None, Event::Empty(e)) if e.local_name().as_ref() == local_name => {
                return Ok(Some(ElementChildren {
                    outer: before..after,
                    inner: None,
                    items,
                }));
            }
            (Some(_), Event::Start(_)) => {
                if depth == 0 {
                    child_start = before;
                }
                depth += 1;
            }
            (Some(_), Event::Empty(_)) if depth == 0 => items.push(&xml[before..after]),
            (Some(start), Event::End(_)) => {
                if depth == 0 {
                    return Ok(Some(ElementChildren {
                        outer: start..after,
                        inner: Some(inner_start..before),
                        items,
                    }));
                }
                depth -= 1;
                if depth == 0 {
                    items.push(&xml[child_start..after]);
                }
            }
            (_, Event::Eof) => break,
            _ => {}
        }
    }

    match outer_start {
        Some(_) => Err(OoxmlError::InvalidStructure(format!(
            "unterminated <{}> element",
            String::from_utf8_lossy(local_name)
        ))),
        None => Ok(None),
    }
}

/// Local name of the first element in an XML fragment
fn root_name(xml: &str) -> Result<Option<String>> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event()? {
            Event::Start(e) | Event::Empty(e) => {
                return Ok(Some(
                    String::from_utf8_lossy(e.local_name().as_ref()).into_owned(),
                ));
            }
            Event::Eof => return Ok(None),
            _ => {}
        }
    }
}

impl Document {
    /// Parse a document from the XML of `word/document.xml`
    pub fn parse(xml: &str) -> Result<Self> {
        let body = children(xml, b"body")?.ok_or_else(|| {
            OoxmlError::InvalidStructure("document has no <w:body>".to_string())
        })?;

        let (head, tail) = match body.inner {
            Some(inner) => (xml[..inner.start].to_string(), xml[inner.end..].to_string()),
            None => (
                format!("{}<w:body>", &xml[..body.outer.start]),
                format!("</w:body>{}", &xml[body.outer.end..]),
            ),
        };

        let blocks = body
            .items
            .into_iter()
            .map(Block::parse)
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { head, blocks, tail })
    }

    pub(crate) fn from_parts(head: String, blocks: Vec<Block>, tail: String) -> Self {
        Self { head, blocks, tail }
    }

    /// Serialize back to the XML of `word/document.xml`
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(self.head.len() + self.tail.len() + 1024);
        xml.push_str(&self.head);
        for block in &self.blocks {
            block.write_to(&mut xml);
        }
        xml.push_str(&self.tail);
        xml
    }

    /// All body blocks in order
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    /// Body-level paragraphs (paragraphs inside tables are not included)
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Paragraph(p) => Some(p),
            _ => None,
        })
    }

    /// Body-level tables
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.blocks.iter().filter_map(|b| match b {
            Block::Table(t) => Some(t),
            _ => None,
        })
    }

    /// Remove every body paragraph, keeping tables and section properties
    pub fn clear_paragraphs(&mut self) {
        self.blocks.retain(|b| !matches!(b, Block::Paragraph(_)));
    }

    /// Append a paragraph to the end of the body
    pub fn push_paragraph(&mut self, paragraph: Paragraph) -> &mut Paragraph {
        let index = self.insert_index();
        self.blocks.insert(index, Block::Paragraph(paragraph));
        match &mut self.blocks[index] {
            Block::Paragraph(p) => p,
            _ => unreachable!("block was just inserted as a paragraph"),
        }
    }

    /// Append a table to the end of the body
    pub fn push_table(&mut self, table: Table) -> &mut Table {
        let index = self.insert_index();
        self.blocks.insert(index, Block::Table(table));
        match &mut self.blocks[index] {
            Block::Table(t) => t,
            _ => unreachable!("block was just inserted as a table"),
        }
    }

    // New content goes before a trailing <w:sectPr>
    fn insert_index(&self) -> usize {
        match self.blocks.last() {
            Some(Block::SectionProperties(_)) => self.blocks.len() - 1,
            _ => self.blocks.len(),
        }
    }
}

impl Block {
    fn parse(xml: &str) -> Result<Self> {
        Ok(match root_name(xml)?.as_deref() {
            Some("p") => Block::Paragraph(Paragraph::parse(xml)?),
            Some("tbl") => Block::Table(Table::parse(xml)?),
            Some("sectPr") => Block::SectionProperties(xml.to_string()),
            _ => Block::Other(xml.to_string()),
        })
    }

    fn write_to(&self, out: &mut String) {
        match self {
            Block::Paragraph(p) => p.write_to(out),
            Block::Table(t) => t.write_to(out),
            Block::SectionProperties(xml) | Block::Other(xml) => out.push_str(xml),
        }
    }
}

impl Paragraph {
    /// Create an empty paragraph
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `<w:p>` element
    pub fn parse(xml: &str) -> Result<Self> {
        let mut paragraph = Paragraph {
            raw: Some(xml.to_string()),
            ..Default::default()
        };
        let Some(parts) = children(xml, b"p")? else {
            return Ok(paragraph);
        };

        for child in parts.items {
            match root_name(child)?.as_deref() {
                Some("pPr") => paragraph.parse_properties(child)?,
                Some("r") => paragraph.children.push(parse_run(child)?),
                // Hyperlinks are flattened into their runs
                Some("hyperlink") | Some("smartTag") | Some("ins") => {
                    if let Some(inner) = children_of_root(child)? {
                        for run in inner.items {
                            if root_name(run)?.as_deref() == Some("r") {
                                paragraph.children.push(parse_run(run)?);
                            }
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(paragraph)
    }

    fn parse_properties(&mut self, xml: &str) -> Result<()> {
        let mut reader = Reader::from_str(xml);
        // Skip the run properties of the paragraph mark and tracked property changes
        let mut skip_depth = 0u32;
        loop {
            match reader.read_event()? {
                Event::Start(e) if skip_depth > 0 || is_skipped_paragraph_property(&e) => {
                    skip_depth += 1
                }
                Event::End(_) if skip_depth > 0 => skip_depth -= 1,
                Event::Start(e) | Event::Empty(e) if skip_depth == 0 => match e.local_name().as_ref() {
                    b"pStyle" => self.style_id = get_attr(&e, b"w:val"),
                    b"jc" => {
                        self.alignment = get_attr(&e, b"w:val").and_then(|v| Alignment::from_ooxml(&v))
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }
        Ok(())
    }

    /// Paragraph style ID
    pub fn style_id(&self) -> Option<&str> {
        self.style_id.as_deref()
    }

    /// Set the paragraph style ID (not resolved against the style sheet)
    pub fn set_style_id(&mut self, style_id: Option<String>) {
        self.raw = None;
        self.style_id = style_id;
    }

    /// Paragraph alignment, `None` when inherited
    pub fn alignment(&self) -> Option<Alignment> {
        self.alignment
    }

    /// Set the paragraph alignment
    pub fn set_alignment(&mut self, alignment: Option<Alignment>) {
        self.raw = None;
        self.alignment = alignment;
    }

    /// Runs and pictures in order
    pub fn children(&self) -> &[ParagraphChild] {
        &self.children
    }

    /// Text runs in order (picture runs are skipped)
    pub fn runs(&self) -> impl Iterator<Item = &Run> {
        self.children.iter().filter_map(|c| match c {
            ParagraphChild::Run(r) => Some(r),
            ParagraphChild::Picture(_) => None,
        })
    }

    /// Append a plain run and return it for formatting
    pub fn add_run(&mut self, text: impl Into<String>) -> &mut Run {
        self.raw = None;
        self.children.push(ParagraphChild::Run(Run::new(text)));
        match self.children.last_mut() {
            Some(ParagraphChild::Run(run)) => run,
            _ => unreachable!("run was just pushed"),
        }
    }

    /// Append a picture run
    pub fn add_picture(&mut self, picture: Picture) {
        self.raw = None;
        self.children.push(ParagraphChild::Picture(picture));
    }

    /// Concatenated text of all runs
    pub fn text(&self) -> String {
        self.runs().map(|r| r.text.as_str()).collect()
    }

    /// Whether the paragraph still matches the XML it was read from
    pub fn is_pristine(&self) -> bool {
        self.raw.is_some()
    }

    pub(crate) fn write_to(&self, out: &mut String) {
        match &self.raw {
            Some(raw) => out.push_str(raw),
            None => writer::write_paragraph(out, self),
        }
    }
}

fn is_skipped_paragraph_property(e: &BytesStart) -> bool {
    matches!(e.local_name().as_ref(), b"rPr" | b"pPrChange")
}

/// Direct children of the first element in a fragment, whatever its name
fn children_of_root(xml: &str) -> Result<Option<ElementChildren<'_>>> {
    match root_name(xml)? {
        Some(name) => children(xml, name.as_bytes()),
        None => Ok(None),
    }
}

fn parse_run(xml: &str) -> Result<ParagraphChild> {
    let mut run = Run::default();
    let Some(parts) = children(xml, b"r")? else {
        return Ok(ParagraphChild::Run(run));
    };

    for child in parts.items {
        match root_name(child)?.as_deref() {
            Some("rPr") => run.parse_properties(child)?,
            Some("t") => run.text.push_str(&element_text(child)?),
            Some("tab") => run.text.push('\t'),
            Some("br") | Some("cr") => run.text.push('\n'),
            Some("drawing") => return Ok(ParagraphChild::Picture(Picture::parse(xml)?)),
            _ => {}
        }
    }

    Ok(ParagraphChild::Run(run))
}

/// Unescaped text content of an element
fn element_text(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut text = String::new();
    loop {
        match reader.read_event()? {
            Event::Text(e) => text.push_str(&e.unescape().unwrap_or_default()),
            Event::CData(e) => text.push_str(&String::from_utf8_lossy(&e)),
            Event::Eof => break,
            _ => {}
        }
    }
    Ok(text)
}

impl Run {
    /// Create an unformatted run
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    fn parse_properties(&mut self, xml: &str) -> Result<()> {
        let mut reader = Reader::from_str(xml);
        // Formatting inside rPrChange is the pre-revision state
        let mut change_depth = 0u32;
        loop {
            match reader.read_event()? {
                Event::Start(e) if change_depth > 0 || e.local_name().as_ref() == b"rPrChange" => {
                    change_depth += 1
                }
                Event::End(_) if change_depth > 0 => change_depth -= 1,
                Event::Start(e) | Event::Empty(e) if change_depth == 0 => match e.local_name().as_ref() {
                    b"rStyle" => self.style = get_attr(&e, b"w:val"),
                    b"b" => self.bold = Some(toggle_value(&e)),
                    b"i" => self.italic = Some(toggle_value(&e)),
                    b"u" => {
                        self.underline = Some(get_attr(&e, b"w:val").as_deref() != Some("none"))
                    }
                    b"color" => {
                        self.color = get_attr(&e, b"w:val").and_then(|v| RgbColor::from_hex(&v))
                    }
                    _ => {}
                },
                Event::Eof => break,
                _ => {}
            }
        }
        Ok(())
    }
}

impl Alignment {
    /// Parse a `w:jc` value
    pub fn from_ooxml(value: &str) -> Option<Self> {
        match value {
            "left" | "start" => Some(Alignment::Left),
            "center" => Some(Alignment::Center),
            "right" | "end" => Some(Alignment::Right),
            "both" => Some(Alignment::Justify),
            "distribute" => Some(Alignment::Distribute),
            _ => None,
        }
    }

    /// The `w:jc` value
    pub fn as_ooxml(&self) -> &'static str {
        match self {
            Alignment::Left => "left",
            Alignment::Center => "center",
            Alignment::Right => "right",
            Alignment::Justify => "both",
            Alignment::Distribute => "distribute",
        }
    }
}

impl RgbColor {
    /// Parse a six digit hex color such as `FF0000`; `auto` yields `None`
    pub fn from_hex(hex: &str) -> Option<Self> {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(RgbColor(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02X}{:02X}{:02X}", self.0, self.1, self.2)
    }
}

impl Table {
    /// Create a table of empty cells
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            style_id: None,
            rows: (0..rows).map(|_| TableRow::with_cells(cols)).collect(),
            raw: None,
        }
    }

    /// Parse a `<w:tbl>` element
    pub fn parse(xml: &str) -> Result<Self> {
        let mut table = Table {
            raw: Some(xml.to_string()),
            ..Default::default()
        };
        let Some(parts) = children(xml, b"tbl")? else {
            return Ok(table);
        };

        for child in parts.items {
            match root_name(child)?.as_deref() {
                Some("tblPr") => {
                    let mut reader = Reader::from_str(child);
                    loop {
                        match reader.read_event()? {
                            Event::Start(e) | Event::Empty(e)
                                if e.local_name().as_ref() == b"tblStyle" =>
                            {
                                table.style_id = get_attr(&e, b"w:val");
                            }
                            Event::Eof => break,
                            _ => {}
                        }
                    }
                }
                Some("tr") => table.rows.push(TableRow::parse(child)?),
                _ => {}
            }
        }

        Ok(table)
    }

    /// Table style ID
    pub fn style_id(&self) -> Option<&str> {
        self.style_id.as_deref()
    }

    /// Set the table style ID
    pub fn set_style_id(&mut self, style_id: Option<String>) {
        self.raw = None;
        self.style_id = style_id;
    }

    /// Rows in order
    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    /// Number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Number of columns, taken from the widest row
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(|r| r.cells.len()).max().unwrap_or(0)
    }

    /// A cell by row and column
    pub fn cell(&self, row: usize, col: usize) -> Option<&TableCell> {
        self.rows.get(row)?.cells.get(col)
    }

    /// Mutable access to a cell by row and column
    pub fn cell_mut(&mut self, row: usize, col: usize) -> Option<&mut TableCell> {
        self.raw = None;
        self.rows.get_mut(row)?.cells.get_mut(col)
    }

    /// Append a row with one empty cell per column
    pub fn add_row(&mut self) -> &mut TableRow {
        self.raw = None;
        let cols = self.column_count();
        self.rows.push(TableRow::with_cells(cols));
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }

    pub(crate) fn write_to(&self, out: &mut String) {
        match &self.raw {
            Some(raw) => out.push_str(raw),
            None => writer::write_table(out, self),
        }
    }
}

impl TableRow {
    fn with_cells(cols: usize) -> Self {
        Self {
            cells: (0..cols).map(|_| TableCell::default()).collect(),
        }
    }

    fn parse(xml: &str) -> Result<Self> {
        let mut row = TableRow::default();
        if let Some(parts) = children(xml, b"tr")? {
            for child in parts.items {
                if root_name(child)?.as_deref() == Some("tc") {
                    row.cells.push(TableCell::parse(child)?);
                }
            }
        }
        Ok(row)
    }
}

impl TableCell {
    fn parse(xml: &str) -> Result<Self> {
        let mut cell = TableCell::default();
        if let Some(parts) = children(xml, b"tc")? {
            for child in parts.items {
                if root_name(child)?.as_deref() == Some("p") {
                    cell.paragraphs.push(Paragraph::parse(child)?);
                }
            }
        }
        Ok(cell)
    }

    /// Cell text, one line per paragraph
    pub fn text(&self) -> String {
        self.paragraphs
            .iter()
            .map(Paragraph::text)
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Replace the cell content with a single paragraph holding `text`
    pub fn set_text(&mut self, text: impl Into<String>) {
        let mut paragraph = Paragraph::new();
        paragraph.add_run(text);
        self.paragraphs = vec![paragraph];
    }
}

/// `<w:b/>`, `<w:b w:val="1"/>` and friends are on; `0`, `false` and `off` are off
fn toggle_value(e: &BytesStart) -> bool {
    !matches!(
        get_attr(e, b"w:val").as_deref(),
        Some("0") | Some("false") | Some("off")
    )
}

fn get_attr(e: &BytesStart, name: &[u8]) -> Option<String> {
    e.attributes()
        .filter_map(|a| a.ok())
        .find(|a| a.key.as_ref() == name)
        .and_then(|a| a.unescape_value().ok().map(|v| v.into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main""#;

    fn document(body: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document {}><w:body>{}</w:body></w:document>"#,
            NS, body
        )
    }

    #[test]
    fn test_children_splits_direct_elements() {
        let xml = "<a><b><c/></b><d/>text<e>x</e></a>";
        let parts = children(xml, b"a").unwrap().unwrap();
        assert_eq!(parts.items, vec!["<b><c/></b>", "<d/>", "<e>x</e>"]);
        assert_eq!(parts.outer, 0..xml.len());
        assert_eq!(&xml[parts.inner.unwrap()], "<b><c/></b><d/>text<e>x</e>");
    }

    #[test]
    fn test_children_of_missing_element() {
        assert!(children("<a/>", b"body").unwrap().is_none());
    }

    #[test]
    fn test_parse_simple_paragraph() {
        let xml = document(r#"<w:p><w:r><w:t>Hello World</w:t></w:r></w:p>"#);
        let doc = Document::parse(&xml).unwrap();
        let paragraphs: Vec<_> = doc.paragraphs().collect();
        assert_eq!(paragraphs.len(), 1);
        assert_eq!(paragraphs[0].text(), "Hello World");
        assert_eq!(paragraphs[0].style_id(), None);
    }

    #[test]
    fn test_unmodified_document_roundtrips_verbatim() {
        let xml = document(
            r#"<w:p w14:paraId="1"><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:bookmarkStart w:id="0" w:name="x"/><w:r><w:t>Title</w:t></w:r></w:p>
<w:tbl><w:tr><w:tc><w:p><w:r><w:t>A</w:t></w:r></w:p></w:tc></w:tr></w:tbl><w:sectPr><w:pgSz w:w="12240"/></w:sectPr>"#,
        );
        let doc = Document::parse(&xml).unwrap();
        assert_eq!(doc.blocks().len(), 3);
        assert_eq!(
            doc.to_xml(),
            xml.replace("</w:p>\n<w:tbl>", "</w:p><w:tbl>")
        );
    }

    #[test]
    fn test_parse_run_with_formatting() {
        let xml = document(
            r#"<w:p><w:pPr><w:jc w:val="center"/><w:rPr><w:b/></w:rPr></w:pPr><w:r><w:rPr><w:rStyle w:val="Strong"/><w:b/><w:i w:val="0"/><w:u w:val="single"/><w:color w:val="FF0000"/></w:rPr><w:t xml:space="preserve">Bold </w:t></w:r><w:r><w:t>plain</w:t><w:tab/><w:t>&amp;</w:t></w:r></w:p>"#,
        );
        let doc = Document::parse(&xml).unwrap();
        let paragraph = doc.paragraphs().next().unwrap();
        assert_eq!(paragraph.alignment(), Some(Alignment::Center));

        let runs: Vec<_> = paragraph.runs().collect();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "Bold ");
        assert_eq!(runs[0].bold, Some(true));
        assert_eq!(runs[0].italic, Some(false));
        assert_eq!(runs[0].underline, Some(true));
        assert_eq!(runs[0].color, Some(RgbColor(0xFF, 0, 0)));
        assert_eq!(runs[0].style.as_deref(), Some("Strong"));
        assert_eq!(runs[1].text, "plain\t&");
        assert_eq!(runs[1].bold, None);
    }

    #[test]
    fn test_tracked_property_changes_are_ignored() {
        let xml = document(
            r#"<w:p><w:pPr><w:jc w:val="left"/><w:pPrChange w:id="1" w:author="a"><w:pPr><w:pStyle w:val="Heading1"/><w:jc w:val="center"/></w:pPr></w:pPrChange></w:pPr><w:r><w:rPr><w:i/><w:rPrChange w:id="2" w:author="a"><w:rPr><w:b/><w:u w:val="single"/><w:color w:val="00FF00"/></w:rPr></w:rPrChange></w:rPr><w:t>now</w:t></w:r></w:p>"#,
        );
        let doc = Document::parse(&xml).unwrap();
        let paragraph = doc.paragraphs().next().unwrap();
        assert_eq!(paragraph.alignment(), Some(Alignment::Left));
        assert_eq!(paragraph.style_id(), None);

        let run = paragraph.runs().next().unwrap();
        assert_eq!(run.italic, Some(true));
        assert_eq!(run.bold, None);
        assert_eq!(run.underline, None);
        assert_eq!(run.color, None);
    }

    #[test]
    fn test_hyperlink_runs_are_flattened() {
        let xml = document(
            r#"<w:p><w:r><w:t>See </w:t></w:r><w:hyperlink r:id="rId4"><w:r><w:t>docs</w:t></w:r></w:hyperlink></w:p>"#,
        );
        let doc = Document::parse(&xml).unwrap();
        assert_eq!(doc.paragraphs().next().unwrap().text(), "See docs");
    }

    #[test]
    fn test_parse_table() {
        let xml = document(
            r#"<w:tbl><w:tblPr><w:tblStyle w:val="TableGrid"/></w:tblPr><w:tr><w:tc><w:p><w:r><w:t>A</w:t></w:r></w:p></w:tc><w:tc><w:p/></w:tc></w:tr><w:tr><w:tc><w:p><w:r><w:t>1</w:t></w:r></w:p></w:tc></w:tr></w:tbl>"#,
        );
        let doc = Document::parse(&xml).unwrap();
        let table = doc.tables().next().unwrap();
        assert_eq!(table.style_id(), Some("TableGrid"));
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.cell(0, 0).unwrap().text(), "A");
        assert_eq!(table.cell(1, 0).unwrap().text(), "1");
        assert_eq!(doc.paragraphs().count(), 0);
    }

    #[test]
    fn test_new_blocks_go_before_section_properties() {
        let xml = document(r#"<w:p/><w:sectPr/>"#);
        let mut doc = Document::parse(&xml).unwrap();
        doc.push_paragraph(Paragraph::new()).add_run("added");

        assert!(matches!(doc.blocks().last(), Some(Block::SectionProperties(_))));
        let out = doc.to_xml();
        assert!(out.find("added").unwrap() < out.find("<w:sectPr/>").unwrap());
    }

    #[test]
    fn test_clear_paragraphs_keeps_tables() {
        let xml = document(r#"<w:p/><w:tbl><w:tr/></w:tbl><w:p/><w:sectPr/>"#);
        let mut doc = Document::parse(&xml).unwrap();
        doc.clear_paragraphs();
        assert_eq!(doc.blocks().len(), 2);
        assert_eq!(doc.tables().count(), 1);
    }

    #[test]
    fn test_self_closing_body() {
        let xml = format!(r#"<w:document {}><w:body/></w:document>"#, NS);
        let mut doc = Document::parse(&xml).unwrap();
        doc.push_paragraph(Paragraph::new()).add_run("x");
        let reparsed = Document::parse(&doc.to_xml()).unwrap();
        assert_eq!(reparsed.paragraphs().next().unwrap().text(), "x");
    }

    #[test]
    fn test_missing_body_is_an_error() {
        let xml = format!(r#"<w:document {}/>"#, NS);
        assert!(matches!(
            Document::parse(&xml),
            Err(OoxmlError::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_modification_drops_source_xml() {
        let xml = document(r#"<w:p><w:r><w:t>a</w:t></w:r></w:p>"#);
        let mut doc = Document::parse(&xml).unwrap();
        doc.clear_paragraphs();
        let p = doc.push_paragraph(Paragraph::parse(r#"<w:p><w:r><w:t>a</w:t></w:r></w:p>"#).unwrap());
        assert!(p.is_pristine());
        p.set_alignment(Some(Alignment::Right));
        assert!(!p.is_pristine());
    }

    #[test]
    fn test_rgb_color_hex() {
        assert_eq!(RgbColor::from_hex("00ff7F"), Some(RgbColor(0, 0xFF, 0x7F)));
        assert_eq!(RgbColor::from_hex("auto"), None);
        assert_eq!(RgbColor(0x12, 0xAB, 0).to_string(), "12AB00");
    }

    #[test]
    fn test_cell_set_text_replaces_content() {
        let mut table = Table::new(1, 2);
        table.cell_mut(0, 1).unwrap().set_text("x");
        table.cell_mut(0, 1).unwrap().set_text("y");
        assert_eq!(table.cell(0, 1).unwrap().paragraphs.len(), 1);
        assert_eq!(table.cell(0, 1).unwrap().text(), "y");
        assert!(table.cell_mut(3, 0).is_none());

        table.add_row();
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.rows()[1].cells.len(), 2);
    }
}
