//! Rendering result with statistics.

use crate::model::Column;
use serde::{Deserialize, Serialize};

/// Result of rendering a document, including content and statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderResult {
    /// The rendered hOCR
    pub content: String,

    /// Rendering statistics
    pub stats: HocrStats,
}

impl RenderResult {
    /// Create a new render result.
    pub fn new(content: String, stats: HocrStats) -> Self {
        Self { content, stats }
    }
}

/// Counts gathered while walking the OCR tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HocrStats {
    /// Pages rendered
    pub page_count: u32,

    /// Blocks rendered
    pub block_count: u32,

    /// Blocks per column, indexed left, center, right
    pub column_blocks: [u32; 3],

    /// Paragraphs rendered
    pub paragraph_count: u32,

    /// Lines rendered
    pub line_count: u32,

    /// Formatting runs rendered
    pub run_count: u32,

    /// Characters rendered
    pub char_count: u32,

    /// Characters wrapped as very low confidence
    pub very_low_confidence: u32,

    /// Characters wrapped as low confidence
    pub low_confidence: u32,
}

impl HocrStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment page count.
    pub fn add_page(&mut self) {
        self.page_count += 1;
    }

    /// Count a block in its column.
    pub fn add_block(&mut self, column: Column) {
        self.block_count += 1;
        self.column_blocks[column.index()] += 1;
    }

    /// Blocks counted in one column.
    pub fn blocks_in(&self, column: Column) -> u32 {
        self.column_blocks[column.index()]
    }

    /// Characters carrying either low-confidence class.
    pub fn flagged_chars(&self) -> u32 {
        self.very_low_confidence + self.low_confidence
    }

    /// Share of characters flagged as low confidence (0.0 when empty).
    pub fn flagged_ratio(&self) -> f64 {
        if self.char_count == 0 {
            0.0
        } else {
            self.flagged_chars() as f64 / self.char_count as f64
        }
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &HocrStats) {
        self.page_count += other.page_count;
        self.block_count += other.block_count;
        for (mine, theirs) in self.column_blocks.iter_mut().zip(other.column_blocks) {
            *mine += theirs;
        }
        self.paragraph_count += other.paragraph_count;
        self.line_count += other.line_count;
        self.run_count += other.run_count;
        self.char_count += other.char_count;
        self.very_low_confidence += other.very_low_confidence;
        self.low_confidence += other.low_confidence;
    }
}
