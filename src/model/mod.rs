//! Document model for FineReader OCR output.
//!
//! The model mirrors the FineReader XML nesting
//! (page → block → par → line → formatting → charParams) and is never
//! mutated by the renderers.

mod bbox;
mod document;
mod page;
mod text;

pub use bbox::BoundingBox;
pub use document::{Document, Metadata};
pub use page::{Block, Column, Page};
pub use text::{CharParams, FontSize, Formatting, Line, Paragraph};
