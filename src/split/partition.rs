use super::label::SubsectionLabel;
use super::{DocumentContext, GapKind, MatchedEntry, SubsectionRange};
use std::collections::HashMap;

/// Turn matched bookmarks into inclusive page ranges.
///
/// Each kept entry owns the pages from its start up to the page before the
/// next kept entry (or the last page). Produced ranges plus the recorded
/// `UnassignedPages` gaps always cover `1..=total_pages` exactly once.
///
/// Entries that break page order are dropped: the longest non-decreasing run
/// of start pages (in document order) is kept and every other entry is
/// recorded as `OutOfOrder`.
pub fn partition(entries: &[MatchedEntry], ctx: &mut DocumentContext) -> Vec<SubsectionRange> {
    let total = ctx.total_pages;

    if total == 0 {
        ctx.record(GapKind::EmptyDocument);
        return Vec::new();
    }

    if entries.is_empty() {
        ctx.record(GapKind::NoUsableBookmarks);
        ctx.record(GapKind::UnassignedPages {
            start_page: 1,
            end_page: total,
        });
        return Vec::new();
    }

    let starts: Vec<u32> = entries
        .iter()
        .map(|entry| {
            let clamped = entry.start_page.clamp(1, total);
            if clamped != entry.start_page {
                ctx.record(GapKind::TargetClamped {
                    label: entry.label,
                    requested: entry.start_page,
                    clamped,
                });
            }
            clamped
        })
        .collect();

    record_duplicates(entries, &starts, ctx);

    let kept = longest_non_decreasing(&starts);
    record_out_of_order(entries, &starts, &kept, ctx);

    // `kept` is never empty for a non-empty input.
    let first_start = starts[kept[0]];
    if first_start > 1 {
        ctx.record(GapKind::UnassignedPages {
            start_page: 1,
            end_page: first_start - 1,
        });
    }

    let mut occurrences: HashMap<SubsectionLabel, usize> = HashMap::new();
    let mut ranges = Vec::with_capacity(kept.len());

    for (pos, &i) in kept.iter().enumerate() {
        let entry = &entries[i];
        let start_page = starts[i];
        let end_page = match kept.get(pos + 1) {
            Some(&next) => starts[next] - 1,
            None => total,
        };

        if end_page < start_page {
            ctx.record(GapKind::ZeroLength {
                label: entry.label,
                page: start_page,
            });
            continue;
        }

        let occurrence = occurrences.entry(entry.label).or_insert(0);
        *occurrence += 1;

        ranges.push(SubsectionRange {
            label: entry.label,
            title: entry.title.clone(),
            start_page,
            end_page,
            output_path: entry.label.relative_output_path(*occurrence),
        });
    }

    ranges
}

fn record_duplicates(entries: &[MatchedEntry], starts: &[u32], ctx: &mut DocumentContext) {
    let mut first_seen: HashMap<SubsectionLabel, u32> = HashMap::new();
    for (entry, &page) in entries.iter().zip(starts) {
        match first_seen.get(&entry.label) {
            Some(&first_page) => ctx.record(GapKind::DuplicateLabel {
                label: entry.label,
                page,
                first_page,
            }),
            None => {
                first_seen.insert(entry.label, page);
            }
        }
    }
}

fn record_out_of_order(
    entries: &[MatchedEntry],
    starts: &[u32],
    kept: &[usize],
    ctx: &mut DocumentContext,
) {
    let mut next_kept = 0;
    for i in 0..entries.len() {
        if next_kept < kept.len() && kept[next_kept] == i {
            next_kept += 1;
            continue;
        }

        // A dropped entry conflicts with the kept entry before it, or failing
        // that with the one after it; otherwise it could have been kept.
        let before = next_kept.checked_sub(1).map(|k| kept[k]);
        let after = kept.get(next_kept).copied();
        let conflict = match before {
            Some(b) if starts[b] > starts[i] => Some(b),
            _ => after.or(before),
        };

        if let Some(c) = conflict {
            ctx.record(GapKind::OutOfOrder {
                label: entries[i].label,
                page: starts[i],
                conflicts_with: entries[c].label,
                conflict_page: starts[c],
            });
        }
    }
}

/// Indices of a longest non-decreasing subsequence of `values`, ascending.
fn longest_non_decreasing(values: &[u32]) -> Vec<usize> {
    // tails[k] is the index ending the best run of length k + 1 seen so far
    let mut tails: Vec<usize> = Vec::new();
    let mut prev: Vec<Option<usize>> = vec![None; values.len()];

    for (i, &value) in values.iter().enumerate() {
        let pos = tails.partition_point(|&t| values[t] <= value);
        if pos > 0 {
            prev[i] = Some(tails[pos - 1]);
        }
        if pos == tails.len() {
            tails.push(i);
        } else {
            tails[pos] = i;
        }
    }

    let mut run = Vec::with_capacity(tails.len());
    let mut current = tails.last().copied();
    while let Some(i) = current {
        run.push(i);
        current = prev[i];
    }
    run.reverse();
    run
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn entry(title: &str, start_page: u32) -> MatchedEntry {
        let label = SubsectionLabel::parse(title, Default::default()).unwrap();
        MatchedEntry {
            label,
            title: title.to_string(),
            start_page,
        }
    }

    fn spans(ranges: &[SubsectionRange]) -> Vec<(String, u32, u32)> {
        ranges
            .iter()
            .map(|r| (r.label.to_string(), r.start_page, r.end_page))
            .collect()
    }

    fn kinds(ctx: &DocumentContext) -> Vec<GapKind> {
        ctx.gaps.iter().map(|g| g.kind.clone()).collect()
    }

    /// Asserts that ranges and unassigned gaps tile `1..=total` exactly.
    fn assert_full_coverage(ranges: &[SubsectionRange], ctx: &DocumentContext) {
        let mut owners = vec![0u32; ctx.total_pages as usize + 1];
        let mut mark = |start: u32, end: u32| {
            assert!(1 <= start && start <= end && end <= ctx.total_pages);
            for page in start..=end {
                owners[page as usize] += 1;
            }
        };
        for range in ranges {
            mark(range.start_page, range.end_page);
        }
        for gap in &ctx.gaps {
            if let GapKind::UnassignedPages {
                start_page,
                end_page,
            } = gap.kind
            {
                mark(start_page, end_page);
            }
        }
        for (page, count) in owners.iter().enumerate().skip(1) {
            assert_eq!(*count, 1, "page {} covered {} times", page, count);
        }
    }

    #[test]
    fn test_leading_pages_unassigned() {
        let mut ctx = DocumentContext::new("doc.pdf", 20);
        let ranges = partition(&[entry("1.1 Intro", 3), entry("1.2 Basics", 10)], &mut ctx);

        assert_eq!(
            spans(&ranges),
            vec![("1.1".to_string(), 3, 9), ("1.2".to_string(), 10, 20)]
        );
        assert_eq!(
            kinds(&ctx),
            vec![GapKind::UnassignedPages {
                start_page: 1,
                end_page: 2
            }]
        );
        assert_eq!(ranges[0].output_path, "Unit 1/1.1.pdf");
        assert_eq!(ranges[1].page_count(), 11);
        assert_full_coverage(&ranges, &ctx);
    }

    #[test]
    fn test_no_bookmarks() {
        let mut ctx = DocumentContext::new("doc.pdf", 15);
        let ranges = partition(&[], &mut ctx);

        assert!(ranges.is_empty());
        assert_eq!(
            kinds(&ctx),
            vec![
                GapKind::NoUsableBookmarks,
                GapKind::UnassignedPages {
                    start_page: 1,
                    end_page: 15
                }
            ]
        );
        assert_full_coverage(&ranges, &ctx);
    }

    #[test]
    fn test_duplicate_labels_each_get_a_range() {
        let mut ctx = DocumentContext::new("doc.pdf", 12);
        let ranges = partition(&[entry("2.1", 5), entry("2.1", 8)], &mut ctx);

        assert_eq!(
            spans(&ranges),
            vec![("2.1".to_string(), 5, 7), ("2.1".to_string(), 8, 12)]
        );
        assert_eq!(ranges[0].output_path, "Unit 2/2.1.pdf");
        assert_eq!(ranges[1].output_path, "Unit 2/2.1 (2).pdf");
        assert!(kinds(&ctx).contains(&GapKind::DuplicateLabel {
            label: SubsectionLabel { unit: 2, section: 1 },
            page: 8,
            first_page: 5,
        }));
        assert_full_coverage(&ranges, &ctx);
    }

    #[test]
    fn test_same_page_bookmarks_give_zero_length() {
        let mut ctx = DocumentContext::new("doc.pdf", 10);
        let ranges = partition(&[entry("1.1", 6), entry("1.2", 6)], &mut ctx);

        assert_eq!(spans(&ranges), vec![("1.2".to_string(), 6, 10)]);
        assert_eq!(
            kinds(&ctx),
            vec![
                GapKind::UnassignedPages {
                    start_page: 1,
                    end_page: 5
                },
                GapKind::ZeroLength {
                    label: SubsectionLabel { unit: 1, section: 1 },
                    page: 6
                },
            ]
        );
        assert!(ctx.gaps[1].message.contains("no pages"));
        assert_full_coverage(&ranges, &ctx);
    }

    #[test]
    fn test_out_of_order_entry_is_dropped() {
        let mut ctx = DocumentContext::new("doc.pdf", 20);
        let ranges = partition(
            &[entry("1.1", 3), entry("1.2", 12), entry("1.3", 8), entry("1.4", 15)],
            &mut ctx,
        );

        // 3, 8, 15 is the longest ordered run; 1.2 at page 12 is the odd one out
        assert_eq!(
            spans(&ranges),
            vec![
                ("1.1".to_string(), 3, 7),
                ("1.3".to_string(), 8, 14),
                ("1.4".to_string(), 15, 20)
            ]
        );
        assert!(kinds(&ctx).contains(&GapKind::OutOfOrder {
            label: SubsectionLabel { unit: 1, section: 2 },
            page: 12,
            conflicts_with: SubsectionLabel { unit: 1, section: 3 },
            conflict_page: 8,
        }));
        assert_full_coverage(&ranges, &ctx);
    }

    #[test]
    fn test_out_of_order_first_entry() {
        let mut ctx = DocumentContext::new("doc.pdf", 10);
        let ranges = partition(&[entry("1.1", 5), entry("1.2", 3), entry("1.3", 8)], &mut ctx);

        assert_eq!(
            spans(&ranges),
            vec![("1.2".to_string(), 3, 7), ("1.3".to_string(), 8, 10)]
        );
        assert!(kinds(&ctx).contains(&GapKind::OutOfOrder {
            label: SubsectionLabel { unit: 1, section: 1 },
            page: 5,
            conflicts_with: SubsectionLabel { unit: 1, section: 2 },
            conflict_page: 3,
        }));
        assert_full_coverage(&ranges, &ctx);
    }

    #[test]
    fn test_targets_beyond_document_are_clamped() {
        let mut ctx = DocumentContext::new("doc.pdf", 5);
        let ranges = partition(&[entry("1.1", 0), entry("1.2", 9)], &mut ctx);

        assert_eq!(
            spans(&ranges),
            vec![("1.1".to_string(), 1, 4), ("1.2".to_string(), 5, 5)]
        );
        assert_eq!(
            kinds(&ctx)
                .iter()
                .filter(|k| matches!(k, GapKind::TargetClamped { .. }))
                .count(),
            2
        );
        assert_full_coverage(&ranges, &ctx);
    }

    #[test]
    fn test_empty_document() {
        let mut ctx = DocumentContext::new("doc.pdf", 0);
        assert!(partition(&[entry("1.1", 1)], &mut ctx).is_empty());
        assert_eq!(kinds(&ctx), vec![GapKind::EmptyDocument]);
    }

    #[test]
    fn test_ordered_input_keeps_everything() {
        let starts = [1, 1, 4, 4, 4, 9, 10];
        assert_eq!(longest_non_decreasing(&starts), (0..starts.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_longest_non_decreasing() {
        assert_eq!(longest_non_decreasing(&[]), Vec::<usize>::new());
        assert_eq!(longest_non_decreasing(&[3, 8, 5]), vec![0, 2]);
        assert_eq!(longest_non_decreasing(&[9, 1, 2, 3]), vec![1, 2, 3]);
        assert_eq!(longest_non_decreasing(&[4, 3, 2, 1]).len(), 1);
    }

    /// Small deterministic generator so the coverage check runs over many
    /// irregular outlines without extra dependencies.
    struct Lcg(u64);

    impl Lcg {
        fn next(&mut self, bound: u32) -> u32 {
            self.0 = self
                .0
                .wrapping_mul(6364136223846793005)
                .wrapping_add(1442695040888963407);
            ((self.0 >> 33) % bound as u64) as u32
        }
    }

    #[test]
    fn test_full_coverage_over_generated_outlines() {
        let mut rng = Lcg(0x5eed);
        for _ in 0..500 {
            let total = rng.next(40) + 1;
            let count = rng.next(12);
            let entries: Vec<MatchedEntry> = (0..count)
                .map(|_| MatchedEntry {
                    label: SubsectionLabel {
                        unit: rng.next(3) + 1,
                        section: rng.next(4) + 1,
                    },
                    title: String::new(),
                    start_page: rng.next(total + 4),
                })
                .collect();

            let mut ctx = DocumentContext::new("gen.pdf", total);
            let ranges = partition(&entries, &mut ctx);
            assert_full_coverage(&ranges, &ctx);

            for pair in ranges.windows(2) {
                assert!(pair[0].start_page <= pair[1].start_page);
            }
        }
    }

    #[test]
    fn test_ordered_outline_preserves_order() {
        let mut ctx = DocumentContext::new("doc.pdf", 30);
        let input = [2, 2, 5, 9, 9, 9, 17, 30];
        let entries: Vec<MatchedEntry> = input
            .iter()
            .enumerate()
            .map(|(i, &page)| MatchedEntry {
                label: SubsectionLabel {
                    unit: 1,
                    section: i as u32 + 1,
                },
                title: String::new(),
                start_page: page,
            })
            .collect();

        let ranges = partition(&entries, &mut ctx);
        let starts: Vec<u32> = ranges.iter().map(|r| r.start_page).collect();
        assert_eq!(starts, vec![2, 5, 9, 17, 30]);
        assert!(!kinds(&ctx)
            .iter()
            .any(|k| matches!(k, GapKind::OutOfOrder { .. })));
    }
}
