//! Knobs for scope resolution and reporting.

use std::path::Path;

/// Marker files identifying a project root.
pub const DEFAULT_ROOT_MARKERS: &[&str] = &["Project.toml", "JuliaProject.toml"];

/// Directories scanned beneath a discovered project root, in report order.
pub const DEFAULT_SOURCE_DIRS: &[&str] = &["src", "test"];

/// Extensions picked up when expanding a directory.
pub const DEFAULT_SOURCE_EXTENSIONS: &[&str] = &["jl"];

#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub root_markers: Vec<String>,
    pub source_dirs: Vec<String>,
    /// Empty means every regular file counts as a source file.
    pub source_extensions: Vec<String>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            root_markers: to_owned_list(DEFAULT_ROOT_MARKERS),
            source_dirs: to_owned_list(DEFAULT_SOURCE_DIRS),
            source_extensions: to_owned_list(DEFAULT_SOURCE_EXTENSIONS),
        }
    }
}

impl ResolverConfig {
    /// Whether a file met during a directory scan belongs in the report.
    #[must_use]
    pub fn is_source_file(&self, path: &Path) -> bool {
        if self.source_extensions.is_empty() {
            return true;
        }
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) => self
                .source_extensions
                .iter()
                .any(|want| want.trim_start_matches('.') == ext),
            None => false,
        }
    }
}

/// Everything one engine invocation needs besides the path list.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub resolver: ResolverConfig,
    /// Log resolver progress. Never changes the computed report.
    pub verbose: bool,
}

fn to_owned_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
