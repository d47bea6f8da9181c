//! Output formatting for coverage reports.

use std::fmt::Write;

use crate::model::{CoverageReport, ReportRow};

const FILE_WIDTH: usize = 41;
const LOC_WIDTH: usize = 15;
const MISSED_WIDTH: usize = 11;
const COVERAGE_WIDTH: usize = 12;

/// Length of the horizontal rules framing the table.
pub const RULE_WIDTH: usize = FILE_WIDTH + LOC_WIDTH + MISSED_WIDTH + COVERAGE_WIDTH;

impl CoverageReport {
    /// Format using a specific formatter.
    #[must_use]
    pub fn format(&self, formatter: &dyn ReportFormatter) -> String {
        formatter.format(self)
    }
}

/// Trait for rendering coverage reports.
pub trait ReportFormatter {
    /// Render the report to a string. Must not perform I/O.
    fn format(&self, report: &CoverageReport) -> String;
}

/// Fixed-width plain text table.
///
/// ```text
/// -------------------------------------------------------------------------------
/// File                                       Lines of Code     Missed    Coverage
/// -------------------------------------------------------------------------------
/// src/A.jl                                               1          0      100.0%
/// -------------------------------------------------------------------------------
/// TOTAL                                                  1          0      100.0%
/// ```
pub struct TextFormatter;

impl ReportFormatter for TextFormatter {
    fn format(&self, report: &CoverageReport) -> String {
        let rule = "-".repeat(RULE_WIDTH);
        let mut out = String::new();

        writeln!(out, "{rule}").unwrap();
        writeln!(
            out,
            "{:<FILE_WIDTH$}{:>LOC_WIDTH$}{:>MISSED_WIDTH$}{:>COVERAGE_WIDTH$}",
            "File", "Lines of Code", "Missed", "Coverage"
        )
        .unwrap();
        writeln!(out, "{rule}").unwrap();
        for row in &report.files {
            write_row(&mut out, row);
        }
        writeln!(out, "{rule}").unwrap();
        write_row(&mut out, &report.total);

        out
    }
}

fn write_row(out: &mut String, row: &ReportRow) {
    writeln!(
        out,
        "{:<FILE_WIDTH$}{:>LOC_WIDTH$}{:>MISSED_WIDTH$}{:>COVERAGE_WIDTH$}",
        row.display_path,
        row.lines_of_code,
        row.missed,
        row.coverage.to_string()
    )
    .unwrap();
}

/// Pretty-printed JSON: `{"files": [...], "total": {...}}`.
pub struct JsonFormatter;

impl ReportFormatter for JsonFormatter {
    fn format(&self, report: &CoverageReport) -> String {
        // Rows hold only strings, integers and finite floats.
        let mut out = serde_json::to_string_pretty(report).unwrap_or_default();
        out.push('\n');
        out
    }
}
