use super::label::SubsectionLabel;
use serde::Serialize;
use std::fmt;

/// Something in the document that did not resolve cleanly into a subsection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GapKind {
    EmptyDocument,
    NoUsableBookmarks,
    UnmatchedTitle {
        title: String,
    },
    MissingDestination {
        label: SubsectionLabel,
        title: String,
    },
    TargetClamped {
        label: SubsectionLabel,
        requested: u32,
        clamped: u32,
    },
    OutOfOrder {
        label: SubsectionLabel,
        page: u32,
        conflicts_with: SubsectionLabel,
        conflict_page: u32,
    },
    ZeroLength {
        label: SubsectionLabel,
        page: u32,
    },
    DuplicateLabel {
        label: SubsectionLabel,
        page: u32,
        first_page: u32,
    },
    UnassignedPages {
        start_page: u32,
        end_page: u32,
    },
    WriteConflict {
        label: SubsectionLabel,
        path: String,
    },
    WriteFailed {
        label: SubsectionLabel,
        path: String,
        reason: String,
    },
}

impl fmt::Display for GapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GapKind::EmptyDocument => write!(f, "document has no pages"),
            GapKind::NoUsableBookmarks => write!(
                f,
                "no usable bookmarks found; add X.Y bookmarks to the source document"
            ),
            GapKind::UnmatchedTitle { title } => {
                write!(f, "bookmark title '{}' did not match X.Y pattern", title)
            }
            GapKind::MissingDestination { label, title } => write!(
                f,
                "bookmark '{}' ({}) has no resolvable target page",
                title, label
            ),
            GapKind::TargetClamped {
                label,
                requested,
                clamped,
            } => write!(
                f,
                "subsection {} targets page {} outside the document; using page {}",
                label, requested, clamped
            ),
            GapKind::OutOfOrder {
                label,
                page,
                conflicts_with,
                conflict_page,
            } => write!(
                f,
                "subsection {} (page {}) is out of page order relative to {} (page {}); not split",
                label, page, conflicts_with, conflict_page
            ),
            GapKind::ZeroLength { label, page } => write!(
                f,
                "subsection {} has no pages before the next subsection (page {})",
                label, page
            ),
            GapKind::DuplicateLabel {
                label,
                page,
                first_page,
            } => write!(
                f,
                "subsection {} appears again at page {} (first at page {}); source numbering may be wrong",
                label, page, first_page
            ),
            GapKind::UnassignedPages {
                start_page,
                end_page,
            } => {
                if start_page == end_page {
                    write!(f, "page {} is not part of any subsection", start_page)
                } else {
                    write!(
                        f,
                        "pages {}-{} are not part of any subsection",
                        start_page, end_page
                    )
                }
            }
            GapKind::WriteConflict { label, path } => write!(
                f,
                "subsection {} skipped: {} already exists (use --overwrite to replace)",
                label, path
            ),
            GapKind::WriteFailed {
                label,
                path,
                reason,
            } => write!(
                f,
                "subsection {} could not be written to {}: {}",
                label, path, reason
            ),
        }
    }
}

/// A [`GapKind`] plus its rendered message, as it appears in the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Gap {
    #[serde(flatten)]
    pub kind: GapKind,
    pub message: String,
}

impl From<GapKind> for Gap {
    fn from(kind: GapKind) -> Self {
        let message = kind.to_string();
        Gap { kind, message }
    }
}
