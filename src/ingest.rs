use std::path::Path;

use crate::detect::{detect_format, Format};
use crate::error::{LinecovError, Result};
use crate::model::TraceData;
use crate::parsers::cobertura::CoberturaParser;
use crate::parsers::lcov::LcovParser;
use crate::parsers::Parser;

/// Read a tracefile, auto-detect its format (or use the override) and parse
/// it. Returns the parsed records and the format used.
pub fn read_tracefile(file_path: &Path, format_override: Option<&str>) -> Result<(TraceData, Format)> {
    let content = std::fs::read(file_path)?;

    let format = match format_override {
        Some(fmt_str) => fmt_str.parse::<Format>()?,
        None => detect_format(file_path, &content).ok_or(LinecovError::UnknownFormat)?,
    };

    let data = parse_with_format(format, &content)?;
    if data.files.is_empty() {
        tracing::warn!(path = %file_path.display(), "Tracefile contains no file records");
    }
    Ok((data, format))
}

fn parse_with_format(format: Format, content: &[u8]) -> Result<TraceData> {
    match format {
        Format::Cobertura => CoberturaParser.parse(content),
        Format::Lcov => LcovParser.parse(content),
    }
}
