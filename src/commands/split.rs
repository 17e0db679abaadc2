use crate::error::{Result, SplitError};
use crate::pdf::{save_document, PdfDocument};
use crate::report::{DocumentFailure, RangeRecord, RangeStatus, RunReport, SplitReport};
use crate::split::partition::partition;
use crate::split::resolver::resolve_outline;
use crate::split::{DocumentContext, GapKind, LabelPolicy, SubsectionRange};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct SplitOptions {
    /// Base directory for `Unit N/` folders; next to each input when `None`.
    pub output_dir: Option<PathBuf>,
    pub dry_run: bool,
    pub overwrite: bool,
    pub label_policy: LabelPolicy,
}

/// Split every input in turn. Inputs that cannot be opened are recorded as
/// failures and do not stop the run.
pub fn run<P: AsRef<Path>>(inputs: &[P], options: &SplitOptions) -> RunReport {
    let mut report = RunReport::default();

    for input in inputs {
        let input = input.as_ref();
        match split_document(input, options) {
            Ok(result) => report.results.push(result),
            Err(e) => {
                tracing::error!(path = %input.display(), "{}", e);
                report.failures.push(DocumentFailure {
                    source_path: input.display().to_string(),
                    error: e.to_string(),
                });
            }
        }
    }

    report
}

pub fn split_document(input: &Path, options: &SplitOptions) -> Result<SplitReport> {
    let pdf = PdfDocument::open(input)?;
    let total_pages = pdf.page_count();
    let roots = pdf.outline_roots()?;

    tracing::info!(
        path = %input.display(),
        pages = total_pages,
        bookmarks = roots.len(),
        "processing document"
    );

    let mut ctx = DocumentContext::new(input.display().to_string(), total_pages);
    let entries = resolve_outline(&roots, options.label_policy, &mut ctx);
    let ranges = partition(&entries, &mut ctx);

    let base = output_base(input, options);
    let mut records = Vec::with_capacity(ranges.len());
    for range in &ranges {
        let output_path = base.join(&range.output_path);
        let status = write_range(&pdf, range, &output_path, options, &mut ctx);
        records.push(RangeRecord::new(range, &output_path, status));
    }

    Ok(SplitReport {
        source_path: ctx.source_path,
        total_pages,
        matched_count: entries.len(),
        ranges: records,
        gaps: ctx.gaps,
    })
}

fn output_base(input: &Path, options: &SplitOptions) -> PathBuf {
    match &options.output_dir {
        Some(dir) => dir.clone(),
        None => input.parent().map(Path::to_path_buf).unwrap_or_default(),
    }
}

fn write_range(
    pdf: &PdfDocument,
    range: &SubsectionRange,
    output_path: &Path,
    options: &SplitOptions,
    ctx: &mut DocumentContext,
) -> RangeStatus {
    if !options.overwrite && output_path.exists() {
        ctx.record(GapKind::WriteConflict {
            label: range.label,
            path: output_path.display().to_string(),
        });
        return RangeStatus::Skipped;
    }

    if options.dry_run {
        tracing::debug!(
            label = %range.label,
            start = range.start_page,
            end = range.end_page,
            "dry run, not writing"
        );
        return RangeStatus::Planned;
    }

    let saved = pdf
        .extract_page_range(range.start_page, range.end_page)
        .and_then(|mut doc| save_document(&mut doc, output_path, options.overwrite));

    match saved {
        Ok(()) => {
            tracing::info!(
                label = %range.label,
                pages = range.page_count(),
                path = %output_path.display(),
                "wrote subsection"
            );
            RangeStatus::Written
        }
        Err(SplitError::WriteConflict { path }) => {
            ctx.record(GapKind::WriteConflict {
                label: range.label,
                path: path.display().to_string(),
            });
            RangeStatus::Skipped
        }
        Err(e) => {
            ctx.record(GapKind::WriteFailed {
                label: range.label,
                path: output_path.display().to_string(),
                reason: e.to_string(),
            });
            RangeStatus::Skipped
        }
    }
}
