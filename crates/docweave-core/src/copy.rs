//! Run-preserving paragraph copy

use docweave_ooxml::{Docx, Paragraph};

use crate::error::Result;

/// Append a copy of `source` to `dest`.
///
/// Each run keeps its text, bold, italic, underline, color and character
/// style; the paragraph keeps its alignment. Nothing else carries over.
pub fn copy_paragraph<'d>(source: &Paragraph, dest: &'d mut Docx) -> Result<&'d mut Paragraph> {
    let target = dest.add_paragraph("", None)?;

    for run in source.runs() {
        let copy = target.add_run(run.text.as_str());
        copy.bold = run.bold;
        copy.italic = run.italic;
        copy.underline = run.underline;
        copy.color = run.color;
        copy.style = run.style.clone();
    }
    target.set_alignment(source.alignment());

    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docweave_ooxml::{Alignment, RgbColor};

    #[test]
    fn test_copy_keeps_run_formatting() {
        let source = Paragraph::parse(
            r#"<w:p><w:pPr><w:pStyle w:val="Quote"/><w:jc w:val="center"/></w:pPr><w:r><w:rPr><w:rStyle w:val="Strong"/><w:b/><w:color w:val="FF0000"/><w:u w:val="single"/></w:rPr><w:t>Hello</w:t></w:r><w:r><w:rPr><w:i/><w:sz w:val="40"/></w:rPr><w:t xml:space="preserve"> world</w:t></w:r></w:p>"#,
        )
        .unwrap();

        let mut dest = Docx::new();
        copy_paragraph(&source, &mut dest).unwrap();

        let copied = dest.paragraphs().next().unwrap();
        assert_eq!(copied.text(), "Hello world");
        assert_eq!(copied.alignment(), Some(Alignment::Center));
        // Paragraph style is not part of the copy
        assert_eq!(copied.style_id(), None);

        let runs: Vec<_> = copied.runs().collect();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].bold, Some(true));
        assert_eq!(runs[0].underline, Some(true));
        assert_eq!(runs[0].color, Some(RgbColor(0xFF, 0, 0)));
        assert_eq!(runs[0].style.as_deref(), Some("Strong"));
        assert_eq!(runs[1].bold, None);
        assert_eq!(runs[1].italic, Some(true));
        assert!(!copied.is_pristine());
    }

    #[test]
    fn test_copy_empty_paragraph() {
        let source = Paragraph::parse("<w:p/>").unwrap();
        let mut dest = Docx::new();
        let copied = copy_paragraph(&source, &mut dest).unwrap();
        assert_eq!(copied.runs().count(), 0);
        assert_eq!(copied.alignment(), None);
    }
}
