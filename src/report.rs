//! Plain-text report of reordered notes
//!
//! Output layout:
//!
//! ```text
//! Page 1
//! - first note
//! - second note
//!
//! ----------
//!
//! Page 3
//! - ...
//! ```

use crate::annotations::{label_content, NotesByPage};
use crate::geometry::PageDimensions;
use crate::reorder::reorder_notes_on_page;
use crate::NotesError;
use log::debug;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Separator written between page blocks
pub const PAGE_SEPARATOR: &str = "\n----------\n\n";

/// Options for report output
#[derive(Debug, Clone)]
pub struct ReportOptions {
    /// Remove `?` characters left behind by text extraction (see [`clean_question_marks`])
    pub strip_stray_question_marks: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            strip_stray_question_marks: true,
        }
    }
}

/// Write the report for all pages to `out` with default options
pub fn write_reordered_notes<W: Write>(
    notes_by_page: &NotesByPage,
    page_dimensions: &PageDimensions,
    out: &mut W,
) -> Result<(), NotesError> {
    write_reordered_notes_with_options(notes_by_page, page_dimensions, out, &ReportOptions::default())
}

/// Write the report for all pages to `out`
///
/// Pages are written in ascending order. A page without geometry aborts the
/// write with [`NotesError::MissingPageGeometry`]; nothing is substituted.
pub fn write_reordered_notes_with_options<W: Write>(
    notes_by_page: &NotesByPage,
    page_dimensions: &PageDimensions,
    out: &mut W,
    options: &ReportOptions,
) -> Result<(), NotesError> {
    let last_page = notes_by_page.keys().next_back().copied();

    for (&page_num, notes) in notes_by_page {
        let geometry = page_dimensions
            .get(&page_num)
            .ok_or(NotesError::MissingPageGeometry { page: page_num })?;

        let reordered = reorder_notes_on_page(notes, geometry.width);
        debug!("page {}: {} notes", page_num, reordered.len());

        writeln!(out, "Page {}", page_num)?;
        for note in &reordered {
            let content = label_content(note);
            let content = if options.strip_stray_question_marks {
                clean_question_marks(content)
            } else {
                content.to_string()
            };
            writeln!(out, "- {}", content)?;
        }

        if Some(page_num) != last_page {
            out.write_all(PAGE_SEPARATOR.as_bytes())?;
        }
    }

    Ok(())
}

/// Render the full report into a string
pub fn render_report(
    notes_by_page: &NotesByPage,
    page_dimensions: &PageDimensions,
    options: &ReportOptions,
) -> Result<String, NotesError> {
    let mut buffer = Vec::new();
    write_reordered_notes_with_options(notes_by_page, page_dimensions, &mut buffer, options)?;
    // Every byte written came from a &str
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Write the report to a file
///
/// The report is rendered in memory first, so a failed run never creates or
/// truncates the output file.
pub fn write_reordered_notes_to_path<P: AsRef<Path>>(
    notes_by_page: &NotesByPage,
    page_dimensions: &PageDimensions,
    output_path: P,
    options: &ReportOptions,
) -> Result<(), NotesError> {
    let report = render_report(notes_by_page, page_dimensions, options)?;

    let mut writer = BufWriter::new(File::create(output_path)?);
    writer.write_all(report.as_bytes())?;
    writer.flush()?;
    Ok(())
}

/// Strip stray question marks from a content line
///
/// Content ending in `?` is assumed to be a real question and is returned
/// unchanged. Otherwise every `?` is removed. This is a heuristic for
/// extraction noise and can drop genuine question marks mid-sentence.
pub fn clean_question_marks(content: &str) -> String {
    if content.ends_with('?') {
        content.to_string()
    } else {
        content.replace('?', "")
    }
}
