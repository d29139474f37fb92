//! Highlight extraction from FDF annotation files
//!
//! FDF files are PDF-syntax dictionaries with no guarantee of being
//! well-formed, so records are located by pattern rather than by parsing the
//! object graph. Each matching highlight yields a [`Note`] positioned by the
//! center of its rectangle horizontally and its top edge vertically.

use crate::NotesError;
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// A highlight note with its on-page anchor point
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    text: String,
    x_center: f64,
    y_top: f64,
}

impl Note {
    /// Build a note from its 1-based page, unescaped content and rectangle
    pub fn from_rect(page: u32, content: &str, rect: [f64; 4]) -> Self {
        let [x1, y1, x2, y2] = rect;
        Self {
            text: format!("* Highlight, page {}\n{}", page, content),
            x_center: (x1 + x2) / 2.0,
            y_top: y1.max(y2),
        }
    }

    #[cfg(test)]
    pub(crate) fn at(text: &str, x_center: f64, y_top: f64) -> Self {
        Self {
            text: text.to_string(),
            x_center,
            y_top,
        }
    }

    /// Display label: `* Highlight, page P` followed by the content line
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Horizontal center of the highlight rectangle
    pub fn x_center(&self) -> f64 {
        self.x_center
    }

    /// Top edge of the highlight rectangle (PDF coordinates, origin at bottom-left)
    pub fn y_top(&self) -> f64 {
        self.y_top
    }

    /// The line printed in reports
    pub fn content(&self) -> &str {
        label_content(&self.text)
    }
}

/// Content line of a display label, dropping the `* Highlight, page N` line
pub fn label_content(label: &str) -> &str {
    label.split('\n').nth(1).unwrap_or("")
}

/// Notes keyed by 1-based page number, each page in file order
pub type NotesByPage = BTreeMap<u32, Vec<Note>>;

// Contents body: plain chars, backslash escapes, or one level of balanced parens.
static HIGHLIGHT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"(?s)/Type/Annot/Subtype/Highlight.*?",
        r"/Rect\[([0-9]+\.?[0-9]*) ([0-9]+\.?[0-9]*) ([0-9]+\.?[0-9]*) ([0-9]+\.?[0-9]*)\]",
        r".*?/Page ([0-9]+)",
        r".*?/Contents\(((?:[^()\\]|\\.|\((?:[^()\\]|\\.)*\))*)\)",
    ))
    .unwrap()
});

/// Parse an annotation file on disk
pub fn parse_fdf_notes_file<P: AsRef<Path>>(path: P) -> Result<NotesByPage, NotesError> {
    let raw = fs::read(path)?;
    Ok(parse_fdf_notes(&raw))
}

/// Parse raw annotation file bytes into highlight notes grouped by page
///
/// Invalid UTF-8 is dropped rather than rejected. Records that do not carry a
/// full highlight (type marker, rectangle, page and contents) are skipped.
pub fn parse_fdf_notes(raw: &[u8]) -> NotesByPage {
    let text = decode_lossy(raw);
    let mut notes_by_page = NotesByPage::new();

    for caps in HIGHLIGHT_RE.captures_iter(&text) {
        let rect = [
            caps[1].parse::<f64>(),
            caps[2].parse::<f64>(),
            caps[3].parse::<f64>(),
            caps[4].parse::<f64>(),
        ];
        let (rect, page) = match (rect, caps[5].parse::<u32>()) {
            ([Ok(x1), Ok(y1), Ok(x2), Ok(y2)], Ok(page)) if page < u32::MAX => {
                ([x1, y1, x2, y2], page + 1)
            }
            _ => {
                debug!("skipping highlight with unreadable numbers: {:?}", &caps[0]);
                continue;
            }
        };

        let content = unescape_contents(&caps[6]);
        notes_by_page
            .entry(page)
            .or_default()
            .push(Note::from_rect(page, &content, rect));
    }

    debug!(
        "parsed {} highlights across {} pages",
        notes_by_page.values().map(Vec::len).sum::<usize>(),
        notes_by_page.len()
    );

    notes_by_page
}

/// Undo the string escapes that matter for display
///
/// Applied in a fixed order: `\(`, then `\)`, then `\\`.
pub fn unescape_contents(content: &str) -> String {
    content
        .replace("\\(", "(")
        .replace("\\)", ")")
        .replace("\\\\", "\\")
}

/// Decode bytes as UTF-8, dropping invalid sequences
fn decode_lossy(raw: &[u8]) -> String {
    let mut text = String::with_capacity(raw.len());
    for chunk in raw.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}
