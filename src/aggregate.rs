use crate::model::{CoverageReport, FileCoverage, ReportRow};

/// Label of the grand-total row.
pub const TOTAL_LABEL: &str = "TOTAL";

/// Build one row per file, in input order, plus the grand total.
///
/// A file with no tracked lines adds zero to both sums, so it never skews
/// the total percentage.
#[must_use]
pub fn aggregate(files: &[FileCoverage]) -> CoverageReport {
    let rows: Vec<ReportRow> = files.iter().map(ReportRow::from).collect();

    let lines_of_code = rows.iter().map(|r| r.lines_of_code).sum();
    let missed = rows.iter().map(|r| r.missed).sum();

    CoverageReport {
        files: rows,
        total: ReportRow::new(TOTAL_LABEL, lines_of_code, missed),
    }
}
