//! In-memory representation of line coverage, independent of the record
//! format it was loaded from. Parsers produce `TraceData`, loaders turn it
//! into `LineState` sequences, the aggregator folds `FileCoverage` values
//! into `ReportRow`s.

use std::fmt;
use std::path::PathBuf;

use serde::{Serialize, Serializer};

/// One instrumented line from a tracefile record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRecord {
    pub line_number: u32,
    pub hit_count: u64,
}

/// Line records for one source file as named in a tracefile.
#[derive(Debug, Clone, Default)]
pub struct FileRecord {
    pub path: String,
    pub lines: Vec<LineRecord>,
}

impl FileRecord {
    pub fn new(path: String) -> Self {
        Self {
            path,
            ..Default::default()
        }
    }
}

/// Everything parsed out of a single tracefile.
#[derive(Debug, Clone, Default)]
pub struct TraceData {
    pub files: Vec<FileRecord>,
}

impl TraceData {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Tracking state of a single physical source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineState {
    /// Blank, comment or otherwise non-executable line.
    Untracked,
    /// Executed at least once.
    Hit(u64),
    /// Tracked but never executed.
    Missed,
}

impl LineState {
    /// Map a raw execution count (`None` = not instrumented) to a state.
    #[must_use]
    pub fn from_count(count: Option<u64>) -> Self {
        match count {
            None => LineState::Untracked,
            Some(0) => LineState::Missed,
            Some(n) => LineState::Hit(n),
        }
    }

    #[must_use]
    pub fn is_tracked(&self) -> bool {
        !matches!(self, LineState::Untracked)
    }
}

/// Coverage for one resolved source file.
#[derive(Debug, Clone)]
pub struct FileCoverage {
    pub source_path: PathBuf,
    pub display_path: String,
    pub lines: Vec<LineState>,
}

impl FileCoverage {
    pub fn new(source_path: PathBuf, display_path: String, lines: Vec<LineState>) -> Self {
        Self {
            source_path,
            display_path,
            lines,
        }
    }

    #[must_use]
    pub fn lines_of_code(&self) -> u64 {
        self.lines.iter().filter(|l| l.is_tracked()).count() as u64
    }

    #[must_use]
    pub fn missed(&self) -> u64 {
        self.lines
            .iter()
            .filter(|l| matches!(l, LineState::Missed))
            .count() as u64
    }

    #[must_use]
    pub fn coverage(&self) -> Coverage {
        Coverage::from_counts(self.lines_of_code(), self.missed())
    }
}

/// Line coverage percentage, or `NotApplicable` when nothing is tracked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Coverage {
    /// Rounded to one decimal place.
    Percentage(f64),
    NotApplicable,
}

impl Coverage {
    #[must_use]
    pub fn from_counts(lines_of_code: u64, missed: u64) -> Self {
        if lines_of_code == 0 {
            return Coverage::NotApplicable;
        }
        let covered = lines_of_code.saturating_sub(missed);
        let pct = 100.0 * covered as f64 / lines_of_code as f64;
        // Halves go to the even digit: 6.25 shows as 6.2.
        Coverage::Percentage((pct * 10.0).round_ties_even() / 10.0)
    }
}

impl fmt::Display for Coverage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Coverage::Percentage(pct) => write!(f, "{pct:.1}%"),
            Coverage::NotApplicable => f.write_str("N/A"),
        }
    }
}

impl Serialize for Coverage {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Coverage::Percentage(pct) => serializer.serialize_f64(*pct),
            Coverage::NotApplicable => serializer.serialize_str("N/A"),
        }
    }
}

/// One line of the rendered report: a file or the grand total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    #[serde(rename = "file")]
    pub display_path: String,
    pub lines_of_code: u64,
    pub missed: u64,
    pub coverage: Coverage,
}

impl ReportRow {
    pub fn new(display_path: impl Into<String>, lines_of_code: u64, missed: u64) -> Self {
        Self {
            display_path: display_path.into(),
            lines_of_code,
            missed,
            coverage: Coverage::from_counts(lines_of_code, missed),
        }
    }
}

impl From<&FileCoverage> for ReportRow {
    fn from(file: &FileCoverage) -> Self {
        ReportRow::new(file.display_path.clone(), file.lines_of_code(), file.missed())
    }
}

/// Per-file rows in resolver order plus the grand total.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageReport {
    pub files: Vec<ReportRow>,
    pub total: ReportRow,
}
