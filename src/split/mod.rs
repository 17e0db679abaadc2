//! Bookmark-driven subsection splitting.
//!
//! [`resolver::resolve_outline`] flattens the outline into `(label, page)`
//! pairs in reading order, and [`partition::partition`] turns those pairs into
//! page ranges. Every irregularity found on the way is recorded as a [`Gap`]
//! on the [`DocumentContext`] rather than returned as an error.

pub mod gap;
pub mod label;
pub mod partition;
pub mod resolver;

pub use gap::{Gap, GapKind};
pub use label::{LabelPolicy, SubsectionLabel};

/// A bookmark whose title carries a subsection label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchedEntry {
    pub label: SubsectionLabel,
    pub title: String,
    /// 1-based, as stored in the outline; not yet clamped to the document.
    pub start_page: u32,
}

/// Pages `start_page..=end_page` (1-based) belonging to one subsection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubsectionRange {
    pub label: SubsectionLabel,
    pub title: String,
    pub start_page: u32,
    pub end_page: u32,
    /// Relative to the output base, e.g. `Unit 1/1.2.pdf`.
    pub output_path: String,
}

impl SubsectionRange {
    pub fn page_count(&self) -> u32 {
        self.end_page - self.start_page + 1
    }
}

/// Per-document state threaded through resolution and partitioning.
#[derive(Debug)]
pub struct DocumentContext {
    pub source_path: String,
    pub total_pages: u32,
    pub gaps: Vec<Gap>,
}

impl DocumentContext {
    pub fn new(source_path: impl Into<String>, total_pages: u32) -> Self {
        DocumentContext {
            source_path: source_path.into(),
            total_pages,
            gaps: Vec::new(),
        }
    }

    pub fn record(&mut self, kind: GapKind) {
        let gap = Gap::from(kind);
        // Surfaced through the report and summary; only echoed with -v
        tracing::debug!(source = %self.source_path, "{}", gap.message);
        self.gaps.push(gap);
    }
}
