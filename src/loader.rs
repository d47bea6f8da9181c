//! Per-file line states, read from whatever the coverage producer left on
//! disk. Sources are re-read on every call; nothing is cached between
//! invocations of the engine.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use regex::Regex;
use tracing::debug;

use crate::detect::Format;
use crate::error::{LinecovError, Result};
use crate::ingest;
use crate::model::{LineState, TraceData};
use crate::parsers::cov;
use crate::resolve::normalize;

/// Supplies the line states of a source file.
pub trait CoverageSource {
    /// One state per physical line of `source_path`, or an empty vector when
    /// no coverage record exists for it.
    fn load(&self, source_path: &Path) -> Result<Vec<LineState>>;
}

/// Reads `.cov` sidecar files written next to each source file.
#[derive(Debug, Clone, Copy, Default)]
pub struct SidecarSource;

impl SidecarSource {
    /// Sidecars belonging to `source_path`, sorted by file name.
    pub fn sidecars(&self, source_path: &Path) -> Result<Vec<PathBuf>> {
        let (Some(dir), Some(name)) = (source_path.parent(), source_path.file_name()) else {
            return Ok(Vec::new());
        };
        let name = name.to_string_lossy();
        let pattern = Regex::new(&format!(r"^{}(?:\.\d+)?\.cov$", regex::escape(&name)))
            .map_err(|e| LinecovError::Other(format!("Invalid sidecar pattern: {e}")))?;

        let mut found = Vec::new();
        for entry in fs::read_dir(dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if pattern.is_match(&entry.file_name().to_string_lossy()) {
                found.push(entry.path());
            }
        }
        found.sort();
        Ok(found)
    }
}

impl CoverageSource for SidecarSource {
    fn load(&self, source_path: &Path) -> Result<Vec<LineState>> {
        let mut counts: Vec<Option<u64>> = Vec::new();
        for sidecar in self.sidecars(source_path)? {
            debug!(sidecar = %sidecar.display(), "Reading coverage record");
            let parsed = cov::parse(&fs::read(&sidecar)?).map_err(|e| match e {
                LinecovError::Parse(msg) => {
                    LinecovError::Parse(format!("{}: {msg}", sidecar.display()))
                }
                other => other,
            })?;
            cov::merge_into(&mut counts, &parsed);
        }
        Ok(counts.into_iter().map(LineState::from_count).collect())
    }
}

/// Line records from an LCOV or Cobertura tracefile, keyed by source path.
#[derive(Debug, Clone, Default)]
pub struct TracefileSource {
    records: HashMap<PathBuf, BTreeMap<u32, u64>>,
}

impl TracefileSource {
    /// Read and index a tracefile. Relative record paths are taken relative
    /// to the tracefile's directory.
    pub fn open(path: &Path, format_override: Option<&str>) -> Result<(Self, Format)> {
        let (data, format) = ingest::read_tracefile(path, format_override)?;
        let base = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => std::env::current_dir()?,
        };
        Ok((Self::from_data(&data, &base), format))
    }

    /// Index already parsed records. Repeated records for the same line,
    /// within one file entry or across entries, are summed.
    pub fn from_data(data: &TraceData, base: &Path) -> Self {
        let mut records: HashMap<PathBuf, BTreeMap<u32, u64>> = HashMap::new();
        for file in &data.files {
            let lines = records.entry(lookup_key(&base.join(&file.path))).or_default();
            for line in &file.lines {
                if line.line_number == 0 {
                    continue;
                }
                let slot = lines.entry(line.line_number).or_insert(0);
                *slot = slot.saturating_add(line.hit_count);
            }
        }
        Self { records }
    }

    pub fn file_count(&self) -> usize {
        self.records.len()
    }
}

impl CoverageSource for TracefileSource {
    fn load(&self, source_path: &Path) -> Result<Vec<LineState>> {
        let Some(lines) = self.records.get(&lookup_key(source_path)) else {
            return Ok(Vec::new());
        };

        let content = fs::read(source_path)?;
        let line_count = String::from_utf8_lossy(&content).lines().count();

        let mut states = vec![LineState::Untracked; line_count];
        for (&line_number, &hits) in lines {
            match states.get_mut(line_number as usize - 1) {
                Some(slot) => *slot = LineState::from_count(Some(hits)),
                None => {
                    debug!(
                        path = %source_path.display(),
                        line_number,
                        line_count,
                        "Ignoring record past end of file"
                    );
                }
            }
        }
        Ok(states)
    }
}

/// Canonical form when the path exists, lexical normal form otherwise.
fn lookup_key(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| normalize(path))
}
