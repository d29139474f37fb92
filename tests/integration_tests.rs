//! Integration tests for pdf-notes library

use lopdf::{dictionary, Document, Object};
use pdf_notes::{
    label_content, parse_fdf_notes, process_notes, process_notes_mem, render_report, reorder_notes_on_page,
    write_reordered_notes, Note, NotesByPage, NotesError, PageDimensions, PageGeometry,
    ReportOptions,
};
use std::fs;

// Helper to build a PDF with the given page widths (all pages 800 tall)
fn make_pdf(widths: &[i64]) -> Vec<u8> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let mut kids: Vec<Object> = Vec::new();
    for &width in widths {
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), 800.into()],
        });
        kids.push(page_id.into());
    }

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => widths.len() as i64,
            "Kids" => kids,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

// Helper to build one FDF highlight record
fn highlight(rect: [u32; 4], page: u32, contents: &str) -> String {
    format!(
        "{} 0 obj\n<</C[1.0 0.8 0.0]/Type/Annot/Subtype/Highlight/Rect[{} {} {} {}]\
         /F 4/Page {}/Contents({})/T(reader)>>\nendobj\n",
        page + 1,
        rect[0],
        rect[1],
        rect[2],
        rect[3],
        page,
        contents
    )
}

fn fdf(records: &[String]) -> Vec<u8> {
    let mut out = String::from("%FDF-1.2\n");
    for record in records {
        out.push_str(record);
    }
    out.push_str("trailer\n<</Root 1 0 R>>\n%%EOF\n");
    out.into_bytes()
}

fn dims(pages: &[(u32, f64)]) -> PageDimensions {
    pages
        .iter()
        .map(|&(page, width)| {
            (
                page,
                PageGeometry {
                    width,
                    height: 800.0,
                },
            )
        })
        .collect()
}

// ============================================================================
// End-to-End Tests
// ============================================================================

#[test]
fn test_two_column_page_end_to_end() {
    let pdf = make_pdf(&[600]);
    let notes = fdf(&[
        highlight([400, 100, 440, 120], 0, "Right bottom"),
        highlight([10, 700, 50, 720], 0, "Left top"),
    ]);

    let (summary, text) = process_notes_mem(&pdf, &notes, &ReportOptions::default()).unwrap();

    assert_eq!(text, "Page 1\n- Left top\n- Right bottom\n");
    assert_eq!(summary.page_count, 1);
    assert_eq!(summary.annotated_pages, 1);
    assert_eq!(summary.note_count, 2);
}

#[test]
fn test_process_notes_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let pdf_path = dir.path().join("paper.pdf");
    let notes_path = dir.path().join("paper.fdf");
    let output_path = dir.path().join("paper_notes.txt");

    fs::write(&pdf_path, make_pdf(&[600, 600, 600])).unwrap();
    fs::write(
        &notes_path,
        fdf(&[
            highlight([350, 500, 380, 510], 2, "Page three right"),
            highlight([20, 300, 80, 320], 0, "Why does this work?"),
            highlight([20, 600, 80, 620], 2, "Page three left"),
        ]),
    )
    .unwrap();

    let summary = process_notes(
        &pdf_path,
        &notes_path,
        &output_path,
        &ReportOptions::default(),
    )
    .unwrap();

    let written = fs::read_to_string(&output_path).unwrap();
    assert_eq!(
        written,
        "Page 1\n- Why does this work?\n\n----------\n\nPage 3\n- Page three left\n- Page three right\n"
    );
    assert_eq!(summary.page_count, 3);
    assert_eq!(summary.annotated_pages, 2);
    assert_eq!(summary.note_count, 3);
}

#[test]
fn test_missing_page_leaves_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let pdf_path = dir.path().join("short.pdf");
    let notes_path = dir.path().join("short.fdf");
    let output_path = dir.path().join("out.txt");

    fs::write(&pdf_path, make_pdf(&[600])).unwrap();
    fs::write(
        &notes_path,
        fdf(&[
            highlight([10, 10, 20, 20], 0, "fine"),
            highlight([10, 10, 20, 20], 4, "beyond the document"),
        ]),
    )
    .unwrap();

    let err = process_notes(
        &pdf_path,
        &notes_path,
        &output_path,
        &ReportOptions::default(),
    )
    .unwrap_err();

    assert!(matches!(err, NotesError::MissingPageGeometry { page: 5 }));
    assert!(!output_path.exists());
}

#[test]
fn test_missing_notes_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let pdf_path = dir.path().join("doc.pdf");
    fs::write(&pdf_path, make_pdf(&[600])).unwrap();

    let err = process_notes(
        &pdf_path,
        dir.path().join("absent.fdf"),
        dir.path().join("out.txt"),
        &ReportOptions::default(),
    )
    .unwrap_err();
    assert!(matches!(err, NotesError::Io(_)));
}

#[test]
fn test_unreadable_pdf_is_parse_error() {
    let err = process_notes_mem(b"%PDF-garbage", b"", &ReportOptions::default()).unwrap_err();
    assert!(matches!(err, NotesError::Parse(_)));
}

// ============================================================================
// Parser Tests
// ============================================================================

#[test]
fn test_parse_escaped_contents() {
    let notes = parse_fdf_notes(&fdf(&[highlight(
        [0, 0, 10, 10],
        0,
        r"a \(nested\) b\\c",
    )]));
    assert_eq!(notes[&1][0].content(), r"a (nested) b\c");
}

#[test]
fn test_parse_ignores_records_without_contents() {
    let raw = b"<</Type/Annot/Subtype/Highlight/Rect[0 0 10 10]/Page 0>>".to_vec();
    assert!(parse_fdf_notes(&raw).is_empty());
}

// ============================================================================
// Reorder Tests
// ============================================================================

#[test]
fn test_left_notes_precede_right_regardless_of_height() {
    let notes = vec![
        Note::from_rect(1, "R top", [400.0, 780.0, 500.0, 790.0]),
        Note::from_rect(1, "L bottom", [10.0, 5.0, 100.0, 15.0]),
        Note::from_rect(1, "L top", [10.0, 700.0, 100.0, 710.0]),
    ];
    let order = reorder_notes_on_page(&notes, 600.0);
    let contents: Vec<&str> = order.iter().map(|t| label_content(t)).collect();
    assert_eq!(contents, vec!["L top", "L bottom", "R top"]);
}

#[test]
fn test_reorder_returns_full_labels() {
    let notes = vec![Note::from_rect(2, "text", [0.0, 0.0, 10.0, 10.0])];
    assert_eq!(
        reorder_notes_on_page(&notes, 600.0),
        vec!["* Highlight, page 2\ntext".to_string()]
    );
}

// ============================================================================
// Report Tests
// ============================================================================

#[test]
fn test_report_page_order_and_separator() {
    let mut notes = NotesByPage::new();
    notes.insert(3, vec![Note::from_rect(3, "three", [0.0, 0.0, 10.0, 10.0])]);
    notes.insert(1, vec![Note::from_rect(1, "one", [0.0, 0.0, 10.0, 10.0])]);

    let report = render_report(
        &notes,
        &dims(&[(1, 600.0), (3, 600.0)]),
        &ReportOptions::default(),
    )
    .unwrap();

    assert_eq!(report, "Page 1\n- one\n\n----------\n\nPage 3\n- three\n");
    assert!(!report.ends_with("----------\n\n"));
}

#[test]
fn test_report_question_mark_cleanup() {
    let mut notes = NotesByPage::new();
    notes.insert(
        1,
        vec![
            Note::from_rect(1, "Is this right? maybe?", [0.0, 700.0, 10.0, 710.0]),
            Note::from_rect(1, "What? Really", [0.0, 600.0, 10.0, 610.0]),
        ],
    );

    let mut out = Vec::new();
    write_reordered_notes(&notes, &dims(&[(1, 600.0)]), &mut out).unwrap();
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "Page 1\n- Is this right? maybe?\n- What Really\n"
    );
}

#[test]
fn test_report_zero_width_page_sorts_single_column() {
    let mut notes = NotesByPage::new();
    notes.insert(
        1,
        vec![
            Note::from_rect(1, "low left", [10.0, 100.0, 20.0, 110.0]),
            Note::from_rect(1, "high right", [500.0, 700.0, 510.0, 710.0]),
        ],
    );

    let report =
        render_report(&notes, &dims(&[(1, 0.0)]), &ReportOptions::default()).unwrap();
    assert_eq!(report, "Page 1\n- high right\n- low left\n");
}
