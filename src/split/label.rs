use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// Leading `unit.section`, both positive without leading zeros. The digit
/// runs are greedy, so whatever follows is never an ASCII digit: "1.23" can
/// only ever read as 1.23.
static SECTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([1-9][0-9]*)\.([1-9][0-9]*)").expect("valid regex"));

/// How to treat a title whose `X.Y` is followed by a further `.N` segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LabelPolicy {
    /// "1.2.3 Topic" is not a subsection title.
    #[default]
    Strict,
    /// "1.2.3 Topic" is subsection 1.2.
    Lenient,
}

/// A `Unit.Section` identifier parsed from a bookmark title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubsectionLabel {
    pub unit: u32,
    pub section: u32,
}

impl SubsectionLabel {
    /// Parse the label at the start of `title`, or `None` if the title is not
    /// a subsection title under `policy`.
    pub fn parse(title: &str, policy: LabelPolicy) -> Option<Self> {
        let title = title.trim();
        let caps = SECTION_RE.captures(title)?;
        let matched = caps.get(0)?;

        if policy == LabelPolicy::Strict {
            let mut rest = title[matched.end()..].chars();
            if rest.next() == Some('.') && rest.next().is_some_and(|c| c.is_ascii_digit()) {
                return None;
            }
        }

        let unit: u32 = caps[1].parse().ok()?;
        let section: u32 = caps[2].parse().ok()?;

        Some(SubsectionLabel { unit, section })
    }

    /// Directory and file name for this subsection, relative to the output
    /// base. `occurrence` is 1 for the first range carrying this label.
    pub fn relative_output_path(&self, occurrence: usize) -> String {
        if occurrence <= 1 {
            format!("Unit {}/{}.pdf", self.unit, self)
        } else {
            format!("Unit {}/{} ({}).pdf", self.unit, self, occurrence)
        }
    }
}

impl fmt::Display for SubsectionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.unit, self.section)
    }
}

impl Serialize for SubsectionLabel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// True for titles that look like they were meant to be numbered but failed
/// to parse ("3", "1.", "1.2.3" under the strict policy).
pub fn looks_numbered(title: &str) -> bool {
    title
        .trim_start()
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_digit())
}
