//! Command handler functions for the linecov CLI.
//!
//! Handlers return their output as a `String`, making them easy to test
//! without capturing stdout. Warnings go to the log, never into the output.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ValueEnum;
use tracing::{info, warn};

use crate::config::Settings;
use crate::engine;
use crate::loader::{CoverageSource, SidecarSource, TracefileSource};
use crate::report::{JsonFormatter, ReportFormatter, TextFormatter};
use crate::resolve;

/// Output style for the report.
#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum Style {
    #[default]
    Text,
    Json,
}

impl Style {
    fn formatter(self) -> &'static dyn ReportFormatter {
        match self {
            Style::Text => &TextFormatter,
            Style::Json => &JsonFormatter,
        }
    }
}

/// Pick the coverage source: a tracefile when given, `.cov` sidecars otherwise.
pub fn open_source(tracefile: Option<&Path>, format: Option<&str>) -> Result<Box<dyn CoverageSource>> {
    match tracefile {
        Some(path) => {
            let (source, detected) = TracefileSource::open(path, format)
                .with_context(|| format!("Failed to read tracefile {}", path.display()))?;
            info!(
                path = %path.display(),
                format = %detected,
                files = source.file_count(),
                "Loaded tracefile"
            );
            Ok(Box::new(source))
        }
        None => Ok(Box::new(SidecarSource)),
    }
}

/// Append the paths listed in a JSON file to `paths`.
pub fn extend_paths_from(paths: &mut Vec<PathBuf>, list_file: &Path) -> Result<()> {
    let text = std::fs::read_to_string(list_file)
        .with_context(|| format!("Failed to read path list {}", list_file.display()))?;
    let extra = resolve::paths_from_json(&text)
        .with_context(|| format!("Invalid path list {}", list_file.display()))?;
    paths.extend(extra);
    Ok(())
}

/// Build the coverage report for `paths` as seen from `cwd`.
pub fn cmd_report(
    paths: &[PathBuf],
    settings: &Settings,
    source: &dyn CoverageSource,
    style: Style,
    cwd: &Path,
) -> Result<String> {
    let output = engine::run_in(paths, settings, source, cwd).context("Failed to build report")?;

    for warning in &output.warnings {
        warn!("{warning}");
    }

    Ok(output.report.format(style.formatter()))
}
