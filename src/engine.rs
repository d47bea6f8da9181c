//! The resolve → load → aggregate pipeline behind every report.

use std::path::Path;

use tracing::debug;

use crate::aggregate::aggregate;
use crate::config::Settings;
use crate::error::Result;
use crate::loader::CoverageSource;
use crate::model::{CoverageReport, FileCoverage};
use crate::report::ReportFormatter;
use crate::resolve::{resolve, ResolutionWarning};

/// Result of one engine invocation.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub report: CoverageReport,
    /// Paths skipped during resolution. Never part of the report text.
    pub warnings: Vec<ResolutionWarning>,
}

/// Run the pipeline relative to the process working directory.
pub fn run<P: AsRef<Path>>(
    paths: &[P],
    settings: &Settings,
    source: &dyn CoverageSource,
) -> Result<RunOutput> {
    let cwd = std::env::current_dir()?;
    run_in(paths, settings, source, &cwd)
}

/// Run the pipeline with `cwd` standing in for the working directory.
pub fn run_in<P: AsRef<Path>>(
    paths: &[P],
    settings: &Settings,
    source: &dyn CoverageSource,
    cwd: &Path,
) -> Result<RunOutput> {
    let resolution = resolve(paths, &settings.resolver, cwd, settings.verbose)?;

    let mut files = Vec::with_capacity(resolution.files.len());
    for resolved in resolution.files {
        let lines = source.load(&resolved.source_path)?;
        debug!(
            path = %resolved.display_path,
            lines = lines.len(),
            "Loaded line states"
        );
        files.push(FileCoverage::new(
            resolved.source_path,
            resolved.display_path,
            lines,
        ));
    }

    Ok(RunOutput {
        report: aggregate(&files),
        warnings: resolution.warnings,
    })
}

/// Run the pipeline and render the report with `formatter`.
pub fn generate_report<P: AsRef<Path>>(
    paths: &[P],
    settings: &Settings,
    source: &dyn CoverageSource,
    formatter: &dyn ReportFormatter,
) -> Result<(String, Vec<ResolutionWarning>)> {
    let output = run(paths, settings, source)?;
    Ok((output.report.format(formatter), output.warnings))
}
