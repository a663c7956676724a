//! WordprocessingML generation for modified and newly created blocks
//!
//! Blocks that still hold the XML they were parsed from never reach this
//! module. Everything here writes with the `w:` prefix, which every
//! main document part declares on its root element. Drawing namespaces are
//! declared inline on the elements that use them.

use crate::document::{Paragraph, ParagraphChild, Run, Table};
use crate::image::Picture;

/// Usable text width of a Letter page with 1" margins, in twips
const TEXT_WIDTH_TWIPS: usize = 8640;

/// Write a `<w:p>` element
pub(crate) fn write_paragraph(out: &mut String, paragraph: &Paragraph) {
    out.push_str("<w:p>");

    if paragraph.style_id().is_some() || paragraph.alignment().is_some() {
        out.push_str("<w:pPr>");
        if let Some(style) = paragraph.style_id() {
            out.push_str(&format!(r#"<w:pStyle w:val="{}"/>"#, escape_xml(style)));
        }
        if let Some(alignment) = paragraph.alignment() {
            out.push_str(&format!(r#"<w:jc w:val="{}"/>"#, alignment.as_ooxml()));
        }
        out.push_str("</w:pPr>");
    }

    for child in paragraph.children() {
        match child {
            ParagraphChild::Run(run) => write_run(out, run),
            ParagraphChild::Picture(picture) => write_picture(out, picture),
        }
    }

    out.push_str("</w:p>");
}

/// Write a `<w:r>` element; tabs and newlines in the text become `<w:tab/>` and `<w:br/>`
pub(crate) fn write_run(out: &mut String, run: &Run) {
    out.push_str("<w:r>");

    let mut props = String::new();
    if let Some(style) = &run.style {
        props.push_str(&format!(r#"<w:rStyle w:val="{}"/>"#, escape_xml(style)));
    }
    if let Some(bold) = run.bold {
        props.push_str(&toggle("b", bold));
    }
    if let Some(italic) = run.italic {
        props.push_str(&toggle("i", italic));
    }
    if let Some(color) = run.color {
        props.push_str(&format!(r#"<w:color w:val="{}"/>"#, color));
    }
    if let Some(underline) = run.underline {
        let val = if underline { "single" } else { "none" };
        props.push_str(&format!(r#"<w:u w:val="{}"/>"#, val));
    }
    if !props.is_empty() {
        out.push_str("<w:rPr>");
        out.push_str(&props);
        out.push_str("</w:rPr>");
    }

    let mut segment = String::new();
    for c in run.text.chars() {
        match c {
            '\t' | '\n' | '\r' => {
                flush_text(out, &mut segment);
                out.push_str(if c == '\t' { "<w:tab/>" } else { "<w:br/>" });
            }
            _ => segment.push(c),
        }
    }
    flush_text(out, &mut segment);

    out.push_str("</w:r>");
}

fn flush_text(out: &mut String, segment: &mut String) {
    if segment.is_empty() {
        return;
    }
    out.push_str(r#"<w:t xml:space="preserve">"#);
    out.push_str(&escape_xml(segment));
    out.push_str("</w:t>");
    segment.clear();
}

fn toggle(name: &str, on: bool) -> String {
    if on {
        format!("<w:{}/>", name)
    } else {
        format!(r#"<w:{} w:val="0"/>"#, name)
    }
}

/// Write a run holding an inline picture
pub(crate) fn write_picture(out: &mut String, picture: &Picture) {
    if let Some(raw) = picture.raw() {
        out.push_str(raw);
        return;
    }

    let name = escape_xml(&picture.name);
    out.push_str("<w:r><w:drawing>");
    out.push_str(
        r#"<wp:inline distT="0" distB="0" distL="0" distR="0" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing">"#,
    );
    out.push_str(&format!(
        r#"<wp:extent cx="{}" cy="{}"/>"#,
        picture.width_emu, picture.height_emu
    ));
    out.push_str(r#"<wp:effectExtent l="0" t="0" r="0" b="0"/>"#);
    out.push_str(&format!(
        r#"<wp:docPr id="{}" name="{}" descr="{}"/>"#,
        picture.id, name, name
    ));
    out.push_str(r#"<wp:cNvGraphicFramePr><a:graphicFrameLocks xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" noChangeAspect="1"/></wp:cNvGraphicFramePr>"#);
    out.push_str(r#"<a:graphic xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main">"#);
    out.push_str(r#"<a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture">"#);
    out.push_str(r#"<pic:pic xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture">"#);
    out.push_str(&format!(
        r#"<pic:nvPicPr><pic:cNvPr id="{}" name="{}"/><pic:cNvPicPr/></pic:nvPicPr>"#,
        picture.id, name
    ));
    out.push_str(&format!(
        r#"<pic:blipFill><a:blip r:embed="{}" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill>"#,
        escape_xml(&picture.rel_id)
    ));
    out.push_str(&format!(
        r#"<pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{}" cy="{}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr>"#,
        picture.width_emu, picture.height_emu
    ));
    out.push_str("</pic:pic></a:graphicData></a:graphic></wp:inline>");
    out.push_str("</w:drawing></w:r>");
}

/// Write a `<w:tbl>` element with evenly split columns
pub(crate) fn write_table(out: &mut String, table: &Table) {
    let cols = table.column_count();
    let col_width = if cols == 0 { 0 } else { TEXT_WIDTH_TWIPS / cols };

    out.push_str("<w:tbl><w:tblPr>");
    if let Some(style) = table.style_id() {
        out.push_str(&format!(r#"<w:tblStyle w:val="{}"/>"#, escape_xml(style)));
    }
    out.push_str(r#"<w:tblW w:w="0" w:type="auto"/>"#);
    out.push_str(r#"<w:tblLook w:val="04A0" w:firstRow="1" w:lastRow="0" w:firstColumn="1" w:lastColumn="0" w:noHBand="0" w:noVBand="1"/>"#);
    out.push_str("</w:tblPr>");

    out.push_str("<w:tblGrid>");
    for _ in 0..cols {
        out.push_str(&format!(r#"<w:gridCol w:w="{}"/>"#, col_width));
    }
    out.push_str("</w:tblGrid>");

    for row in table.rows() {
        out.push_str("<w:tr>");
        for cell in &row.cells {
            out.push_str("<w:tc>");
            out.push_str(&format!(
                r#"<w:tcPr><w:tcW w:w="{}" w:type="dxa"/></w:tcPr>"#,
                col_width
            ));
            // A cell must end with a paragraph
            if cell.paragraphs.is_empty() {
                out.push_str("<w:p/>");
            }
            for paragraph in &cell.paragraphs {
                paragraph.write_to(out);
            }
            out.push_str("</w:tc>");
        }
        out.push_str("</w:tr>");
    }

    out.push_str("</w:tbl>");
}

/// Escape special XML characters
pub fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
