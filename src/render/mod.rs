//! Rendering module for converting parsed OCR documents to output formats.
//!
//! hOCR is the primary target; plain text and JSON views of the same tree
//! are available for inspection.

mod classify;
mod hocr;
mod json;
mod options;
mod result;
mod text;

pub use classify::{
    classify_confidence, classify_style, ColumnThresholds, Confidence, StyleWrap,
    LOW_CONFIDENCE, VERY_LOW_CONFIDENCE,
};
pub use hocr::{page_to_hocr, to_hocr, to_hocr_with_stats, HocrRenderer};
pub use json::{to_json, JsonFormat};
pub use options::{HocrOptions, DEFAULT_STYLESHEET, DEFAULT_TITLE};
pub use result::{HocrStats, RenderResult};
pub use text::to_text;
