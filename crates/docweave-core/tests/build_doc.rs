//! Integration tests for building documents from components

use docweave_core::{Component, Doc, ListEntry, OrderedList, RenderError};
use docweave_ooxml::{Docx, OoxmlArchive};
use tempfile::TempDir;

fn styled(docx: &Docx) -> Vec<(String, Option<String>)> {
    docx.paragraphs()
        .map(|p| (p.text(), p.style_id().map(str::to_string)))
        .collect()
}

#[test]
fn test_header_paragraph_list_roundtrip() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("doc.docx");

    let mut doc = Doc::new();
    doc.add_header("Title", 1)
        .add_paragraph("Body")
        .add_ordered_list(["x", "y"]);
    doc.to_docx(&path).unwrap();

    let docx = Docx::open(&path).unwrap();
    assert_eq!(
        styled(&docx),
        vec![
            ("Title".to_string(), Some("Heading1".to_string())),
            ("Body".to_string(), None),
            ("x".to_string(), Some("ListNumber".to_string())),
            ("y".to_string(), Some("ListNumber".to_string())),
        ]
    );
    assert_eq!(docx.style_name(docx.paragraphs().next().unwrap()), Some("heading 1"));
}

#[test]
fn test_table_rows_are_stringified() {
    let mut doc = Doc::new();
    doc.add_table(["A", "B", "C"], vec![vec![1, 2, 3], vec![2, 3, 4]]);

    let docx = Docx::from_bytes(&doc.to_bytes().unwrap()).unwrap();
    let table = docx.tables().next().unwrap();
    let rows: Vec<Vec<String>> = table
        .rows()
        .iter()
        .map(|row| row.cells.iter().map(|c| c.text()).collect())
        .collect();
    assert_eq!(
        rows,
        vec![
            vec!["A", "B", "C"],
            vec!["1", "2", "3"],
            vec!["2", "3", "4"],
        ]
    );
}

#[test]
fn test_same_list_in_two_documents() {
    let list = OrderedList::new(vec![
        ListEntry::from("one"),
        ListEntry::from(vec![ListEntry::from("one.a"), ListEntry::from("one.b")]),
        ListEntry::from("two"),
    ]);

    let build = || {
        let mut doc = Doc::new();
        doc.push(Component::OrderedList(list.clone()));
        Docx::from_bytes(&doc.to_bytes().unwrap()).unwrap()
    };

    let first = styled(&build());
    assert_eq!(first, styled(&build()));
    assert_eq!(first[1], ("one.a".to_string(), Some("ListNumber2".to_string())));
}

#[test]
fn test_image_component() {
    let temp = TempDir::new().unwrap();
    let png = temp.path().join("chart.png");
    image::RgbImage::from_pixel(96, 48, image::Rgb([10, 10, 10]))
        .save(&png)
        .unwrap();
    let out = temp.path().join("out.docx");

    let mut doc = Doc::new();
    doc.add_image(&png).add_image(&png);
    doc.to_docx(&out).unwrap();

    let archive = OoxmlArchive::open(&out).unwrap();
    assert!(archive.contains("word/media/image1.png"));
    // Identical pictures share one media part
    assert!(!archive.contains("word/media/image2.png"));
    let xml = archive.get_string("word/document.xml").unwrap();
    assert!(xml.contains(r#"<wp:extent cx="914400" cy="457200"/>"#));
    assert_eq!(xml.matches("<w:drawing>").count(), 2);
}

#[test]
fn test_outline_file_builds() {
    let temp = TempDir::new().unwrap();
    let outline = temp.path().join("outline.json");
    std::fs::write(
        &outline,
        r#"{"components": [
            {"type": "header", "text": "Plan", "level": 0},
            {"type": "paragraph", "text": "Steps follow."},
            {"type": "ordered_list", "items": ["a", ["b"]]}
        ]}"#,
    )
    .unwrap();

    let doc = Doc::load(&outline).unwrap();
    let docx = doc.build().unwrap();
    assert_eq!(
        styled(&docx),
        vec![
            ("Plan".to_string(), Some("Title".to_string())),
            ("Steps follow.".to_string(), None),
            ("a".to_string(), Some("ListNumber".to_string())),
            ("b".to_string(), Some("ListNumber2".to_string())),
        ]
    );
}

#[test]
fn test_heading_level_out_of_range() {
    let mut doc = Doc::new();
    doc.add_header("Too deep", 10);
    assert!(matches!(doc.build(), Err(RenderError::Ooxml(_))));
}
