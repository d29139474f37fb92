//! Two-column reading order for a page of notes
//!
//! The page is split at its horizontal midpoint. Left-column notes are read
//! first, then right-column notes, each column top to bottom.

use crate::annotations::Note;
use std::cmp::Ordering;

/// Which half of the page a note falls in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Left,
    Right,
}

/// Classify an x position against the page midpoint
///
/// The midpoint itself belongs to the right column. A zero page width puts
/// every non-negative position in the right column.
pub fn column_for(x_center: f64, page_width: f64) -> Column {
    if x_center < page_width / 2.0 {
        Column::Left
    } else {
        Column::Right
    }
}

/// Reorder a page's notes and return their display text
///
/// Within a column notes are sorted by `y_top` descending. The sort is
/// stable, so notes at the same height keep their parse order.
pub fn reorder_notes_on_page(notes: &[Note], page_width: f64) -> Vec<String> {
    let (mut left_column, mut right_column): (Vec<&Note>, Vec<&Note>) = notes
        .iter()
        .partition(|note| column_for(note.x_center(), page_width) == Column::Left);

    // PDF y grows upward, so top of page first means descending y
    let by_top = |a: &&Note, b: &&Note| b.y_top().partial_cmp(&a.y_top()).unwrap_or(Ordering::Equal);
    left_column.sort_by(by_top);
    right_column.sort_by(by_top);

    left_column
        .into_iter()
        .chain(right_column)
        .map(|note| note.text().to_string())
        .collect()
}
