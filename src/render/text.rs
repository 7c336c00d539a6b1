//! Plain text rendering for FineReader documents.

use crate::error::Result;
use crate::model::Document;

/// Convert a document to plain text.
///
/// Each OCR line becomes one output line; paragraphs, blocks and pages are
/// separated by a blank line. Empty blocks are skipped.
pub fn to_text(doc: &Document) -> Result<String> {
    let output = doc.plain_text();
    Ok(output.trim().to_string())
}
