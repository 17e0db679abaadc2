use crate::error::Result;
use crate::output::write_atomically;
use crate::split::{Gap, SubsectionLabel, SubsectionRange};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RangeStatus {
    Written,
    /// Dry run: would have been written.
    Planned,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RangeRecord {
    pub label: SubsectionLabel,
    pub title: String,
    pub start_page: u32,
    pub end_page: u32,
    pub output_path: String,
    pub status: RangeStatus,
}

impl RangeRecord {
    pub fn new(range: &SubsectionRange, output_path: &Path, status: RangeStatus) -> Self {
        RangeRecord {
            label: range.label,
            title: range.title.clone(),
            start_page: range.start_page,
            end_page: range.end_page,
            output_path: output_path.display().to_string(),
            status,
        }
    }
}

/// Outcome for one input document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SplitReport {
    pub source_path: String,
    pub total_pages: u32,
    pub matched_count: usize,
    pub ranges: Vec<RangeRecord>,
    pub gaps: Vec<Gap>,
}

impl SplitReport {
    pub fn count(&self, status: RangeStatus) -> usize {
        self.ranges.iter().filter(|r| r.status == status).count()
    }
}

/// An input that could not be opened at all.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentFailure {
    pub source_path: String,
    pub error: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub results: Vec<SplitReport>,
    pub failures: Vec<DocumentFailure>,
}

impl RunReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

pub fn render_report(report: &RunReport) -> Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}

/// Serialize the whole run as pretty JSON, replacing any previous report.
pub fn write_report<P: AsRef<Path>>(report: &RunReport, path: P) -> Result<()> {
    let mut json = render_report(report)?;
    json.push('\n');
    write_atomically(path.as_ref(), true, |file| Ok(file.write_all(json.as_bytes())?))
}

/// Console summary, one block per document.
pub fn print_summary(report: &RunReport) {
    for result in &report.results {
        println!("PDF: {}", result.source_path);
        println!("  Pages: {}", result.total_pages);
        println!("  Subsection bookmarks: {}", result.matched_count);

        let planned = result.count(RangeStatus::Planned);
        if planned > 0 {
            println!("  Sections planned (dry run): {}", planned);
        } else {
            println!("  Sections created: {}", result.count(RangeStatus::Written));
        }

        let skipped: Vec<_> = result
            .ranges
            .iter()
            .filter(|r| r.status == RangeStatus::Skipped)
            .collect();
        if !skipped.is_empty() {
            println!("  Sections skipped:");
            for range in skipped {
                println!("    - {} ({})", range.label, range.output_path);
            }
        }

        if !result.gaps.is_empty() {
            println!("  Gaps:");
            for gap in &result.gaps {
                println!("    - {}", gap.message);
            }
        }
    }

    for failure in &report.failures {
        println!("PDF: {}", failure.source_path);
        println!("  Failed: {}", failure.error);
    }
}
