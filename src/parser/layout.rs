//! Layout post-processing for dictionary scans.
//!
//! FineReader sometimes splits one print column into several stacked text
//! blocks. [`merge_split_blocks`] glues them back together, and
//! [`ColumnEdges`] estimates the three column edges of a page from the left
//! edges of its lines.

use std::collections::BTreeSet;

use crate::model::{Column, Page};

/// Consecutive blocks whose horizontal centers are closer than this (in
/// pixels) belong to the same column.
const MERGE_CENTER_TOLERANCE: f64 = 100.0;

/// Minimum gap between line left edges that separates the center column
/// from the left column.
const CENTER_GAP: i32 = 300;

/// Minimum gap between line left edges that separates the right column from
/// the center column.
const RIGHT_GAP: i32 = 200;

/// Line left edges at or beyond this position are ignored when looking for
/// the right column (page furniture, signature marks).
const RIGHT_SCAN_LIMIT: i32 = 2000;

/// Return a copy of `page` where consecutive blocks of the same column are
/// merged.
///
/// A block is merged into the previous kept block when its horizontal center
/// is within 100 px of the center of the first block of that run. Merged
/// blocks keep the first block's type, concatenate paragraphs in source
/// order, and take the union of the bounding boxes.
pub fn merge_split_blocks(page: &Page) -> Page {
    let mut merged = Page::new(page.number, page.width, page.height, page.resolution);
    let mut run_center: Option<f64> = None;

    for block in &page.blocks {
        let center = block.bbox.center_x();
        match (merged.blocks.last_mut(), run_center) {
            (Some(previous), Some(anchor)) if (anchor - center).abs() < MERGE_CENTER_TOLERANCE => {
                log::debug!(
                    "Page {}: merging block {} into {}",
                    page.number,
                    block.bbox,
                    previous.bbox
                );
                previous.bbox = previous.bbox.union(&block.bbox);
                previous
                    .paragraphs
                    .extend(block.paragraphs.iter().cloned());
            }
            _ => {
                merged.add_block(block.clone());
                run_center = Some(center);
            }
        }
    }

    if merged.block_count() > Column::ALL.len() {
        log::warn!(
            "Page {}: {} blocks remain after merging",
            page.number,
            merged.block_count()
        );
    }
    merged
}

/// Estimated left edges of the three print columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnEdges {
    /// Left edge of the left column
    pub left: i32,
    /// Left edge of the center column
    pub center: i32,
    /// Left edge of the right column
    pub right: i32,
}

impl ColumnEdges {
    /// Detect column edges from the left edges of the page's lines.
    ///
    /// Returns `None` when the page does not show three separated columns.
    pub fn detect(page: &Page) -> Option<Self> {
        let edges: BTreeSet<i32> = page.lines().map(|line| line.bbox.left).collect();
        let left = *edges.first()?;

        let mut previous: Option<i32> = None;
        let mut center = None;
        for &edge in &edges {
            if previous.is_some_and(|p| edge - p > CENTER_GAP) {
                center = Some(edge);
                break;
            }
            previous = Some(edge);
        }

        let mut previous: Option<i32> = None;
        let mut right = None;
        for &edge in edges.iter().rev() {
            if let Some(p) = previous {
                if p - edge > RIGHT_GAP {
                    right = Some(p);
                    break;
                }
            }
            if edge < RIGHT_SCAN_LIMIT {
                previous = Some(edge);
            }
        }

        let edges = Self {
            left,
            center: center?,
            right: right?,
        };
        log::debug!(
            "Page {}: column edges {} {} {}",
            page.number,
            edges.left,
            edges.center,
            edges.right
        );
        Some(edges)
    }

    /// Column that a line starting at `x` belongs to.
    ///
    /// A line starting exactly on the center edge counts as center, not
    /// left, so each edge opens its own column.
    pub fn column_of(&self, x: i32) -> Column {
        if x >= self.right {
            Column::Right
        } else if x < self.center {
            Column::Left
        } else {
            Column::Center
        }
    }

    /// Number of lines per column, indexed by [`Column::index`].
    pub fn line_distribution(&self, page: &Page) -> [usize; 3] {
        let mut counts = [0; 3];
        for line in page.lines() {
            counts[self.column_of(line.bbox.left).index()] += 1;
        }
        counts
    }
}
