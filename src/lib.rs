//! Highlight note extraction and reordering for annotated PDFs
//!
//! This crate provides:
//! - Page geometry lookup from the PDF page tree
//! - Highlight extraction from FDF annotation files
//! - Two-column, top-to-bottom reordering of notes per page
//! - A plain-text report grouped by page

pub mod annotations;
pub mod geometry;
pub mod reorder;
pub mod report;

pub use annotations::{label_content, parse_fdf_notes, parse_fdf_notes_file, Note, NotesByPage};
pub use geometry::{
    extract_page_dimensions, extract_page_dimensions_mem, PageDimensions, PageGeometry,
};
pub use reorder::{reorder_notes_on_page, Column};
pub use report::{
    render_report, write_reordered_notes, write_reordered_notes_to_path, ReportOptions,
};

use std::path::Path;

/// Summary of a completed run
#[derive(Debug)]
pub struct NotesReport {
    /// Number of pages in the PDF
    pub page_count: u32,
    /// Number of pages with at least one highlight
    pub annotated_pages: u32,
    /// Total highlights written
    pub note_count: u32,
    /// Processing time in milliseconds
    pub processing_time_ms: u64,
}

impl NotesReport {
    fn new(
        page_dimensions: &PageDimensions,
        notes_by_page: &NotesByPage,
        start: std::time::Instant,
    ) -> Self {
        Self {
            page_count: page_dimensions.len() as u32,
            annotated_pages: notes_by_page.len() as u32,
            note_count: notes_by_page.values().map(Vec::len).sum::<usize>() as u32,
            processing_time_ms: start.elapsed().as_millis() as u64,
        }
    }
}

/// Extract, reorder and write the highlights of an annotated PDF
///
/// This function will:
/// 1. Read page dimensions from the PDF
/// 2. Parse highlight notes from the annotation file
/// 3. Write the reordered notes to `output_path`
pub fn process_notes<P, N, O>(
    pdf_path: P,
    notes_path: N,
    output_path: O,
    options: &ReportOptions,
) -> Result<NotesReport, NotesError>
where
    P: AsRef<Path>,
    N: AsRef<Path>,
    O: AsRef<Path>,
{
    let start = std::time::Instant::now();

    let page_dimensions = extract_page_dimensions(pdf_path)?;
    let notes_by_page = parse_fdf_notes_file(notes_path)?;
    write_reordered_notes_to_path(&notes_by_page, &page_dimensions, output_path, options)?;

    Ok(NotesReport::new(&page_dimensions, &notes_by_page, start))
}

/// Process in-memory PDF and annotation buffers, returning the report text
pub fn process_notes_mem(
    pdf: &[u8],
    notes: &[u8],
    options: &ReportOptions,
) -> Result<(NotesReport, String), NotesError> {
    let start = std::time::Instant::now();

    let page_dimensions = extract_page_dimensions_mem(pdf)?;
    let notes_by_page = parse_fdf_notes(notes);
    let text = render_report(&notes_by_page, &page_dimensions, options)?;

    Ok((NotesReport::new(&page_dimensions, &notes_by_page, start), text))
}

#[derive(Debug, thiserror::Error)]
pub enum NotesError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("PDF parsing error: {0}")]
    Parse(String),
    #[error("PDF is encrypted")]
    Encrypted,
    #[error("no page geometry for page {page}")]
    MissingPageGeometry { page: u32 },
}

impl From<lopdf::Error> for NotesError {
    fn from(e: lopdf::Error) -> Self {
        NotesError::Parse(e.to_string())
    }
}
