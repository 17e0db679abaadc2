use super::label::{looks_numbered, LabelPolicy, SubsectionLabel};
use super::{DocumentContext, GapKind, MatchedEntry};
use crate::pdf::outline::OutlineNode;

/// Flatten the outline into subsection bookmarks in reading order.
///
/// Depth-first, pre-order, respecting child order. A node whose title parses
/// as a subsection label is emitted and its own children are not visited. Any
/// other node is skipped but its children are searched, so subsections nested
/// under "Part" or "Chapter" headings are still found. Duplicate labels are
/// passed through untouched.
pub fn resolve_outline(
    roots: &[OutlineNode],
    policy: LabelPolicy,
    ctx: &mut DocumentContext,
) -> Vec<MatchedEntry> {
    let mut entries = Vec::new();
    resolve_recursive(roots, policy, ctx, &mut entries);
    tracing::debug!(
        source = %ctx.source_path,
        matched = entries.len(),
        "resolved outline"
    );
    entries
}

fn resolve_recursive(
    nodes: &[OutlineNode],
    policy: LabelPolicy,
    ctx: &mut DocumentContext,
    entries: &mut Vec<MatchedEntry>,
) {
    for node in nodes {
        let title = node.title.trim();

        let Some(label) = SubsectionLabel::parse(title, policy) else {
            if looks_numbered(title) {
                ctx.record(GapKind::UnmatchedTitle {
                    title: title.to_string(),
                });
            }
            resolve_recursive(&node.children, policy, ctx, entries);
            continue;
        };

        match node.target_page {
            Some(start_page) => {
                tracing::debug!(%label, start_page, "matched bookmark");
                entries.push(MatchedEntry {
                    label,
                    title: title.to_string(),
                    start_page,
                });
            }
            None => ctx.record(GapKind::MissingDestination {
                label,
                title: title.to_string(),
            }),
        }
    }
}
