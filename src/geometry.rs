//! Page geometry lookup using lopdf
//!
//! Reads each page's MediaBox and reports its width and height in the
//! document's native page units. Only the page tree is inspected; content
//! streams are never decoded.

use crate::NotesError;
use lopdf::{Dictionary, Document, Object, ObjectId};
use log::{debug, warn};
use std::collections::BTreeMap;
use std::path::Path;

/// Width and height of a single page
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub width: f64,
    pub height: f64,
}

/// Page geometry keyed by 1-based page number
pub type PageDimensions = BTreeMap<u32, PageGeometry>;

/// Guard against cyclic `Parent` references in broken page trees
const MAX_PARENT_DEPTH: usize = 32;

/// Extract page dimensions from a PDF file
pub fn extract_page_dimensions<P: AsRef<Path>>(path: P) -> Result<PageDimensions, NotesError> {
    let doc = Document::load(path)?;
    page_dimensions_from_doc(&doc)
}

/// Extract page dimensions from a PDF memory buffer
pub fn extract_page_dimensions_mem(buffer: &[u8]) -> Result<PageDimensions, NotesError> {
    let doc = Document::load_mem(buffer)?;
    page_dimensions_from_doc(&doc)
}

/// Collect geometry for every page of a loaded document
fn page_dimensions_from_doc(doc: &Document) -> Result<PageDimensions, NotesError> {
    if doc.is_encrypted() {
        return Err(NotesError::Encrypted);
    }

    let mut dimensions = PageDimensions::new();

    for (&page_num, &page_id) in doc.get_pages().iter() {
        let geometry = match media_box(doc, page_id) {
            Some([x1, y1, x2, y2]) => PageGeometry {
                width: (x2 - x1).abs(),
                height: (y2 - y1).abs(),
            },
            None => {
                warn!("page {} has no MediaBox, using zero geometry", page_num);
                PageGeometry {
                    width: 0.0,
                    height: 0.0,
                }
            }
        };
        dimensions.insert(page_num, geometry);
    }

    debug!("read geometry for {} pages", dimensions.len());
    Ok(dimensions)
}

/// Find the MediaBox for a page, walking up the page tree for inherited boxes
fn media_box(doc: &Document, page_id: ObjectId) -> Option<[f64; 4]> {
    let mut dict = doc.get_dictionary(page_id).ok()?;

    for _ in 0..MAX_PARENT_DEPTH {
        if let Ok(obj) = dict.get(b"MediaBox") {
            return rect_from_object(doc, obj);
        }
        dict = parent_dictionary(doc, dict)?;
    }

    None
}

fn parent_dictionary<'a>(doc: &'a Document, dict: &'a Dictionary) -> Option<&'a Dictionary> {
    match dict.get(b"Parent").ok()? {
        Object::Reference(id) => doc.get_dictionary(*id).ok(),
        Object::Dictionary(parent) => Some(parent),
        _ => None,
    }
}

fn rect_from_object(doc: &Document, obj: &Object) -> Option<[f64; 4]> {
    let array = match obj {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_array().ok()?,
        other => other.as_array().ok()?,
    };

    if array.len() != 4 {
        return None;
    }

    let mut rect = [0.0f64; 4];
    for (slot, value) in rect.iter_mut().zip(array) {
        *slot = get_number(value)?;
    }
    Some(rect)
}

/// Helper to get f64 from Object
fn get_number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(*r as f64),
        _ => None,
    }
}
