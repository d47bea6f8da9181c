//! Turns the caller's path list into an ordered list of source files.
//!
//! Strategy:
//!   1. Explicit paths: files as-is, directories walked recursively,
//!      missing paths recorded as warnings and skipped.
//!   2. No paths: find the project root above `cwd` and scan its source
//!      directories, or scan `cwd` alone when no root exists.
//!
//! Every directory level is sorted by file name so the output order is the
//! same on every platform.
use std::fmt;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use tracing::info;
use walkdir::WalkDir;

use crate::config::ResolverConfig;
use crate::error::{LinecovError, Result};

/// A source file in scope, with the path shown for it in the report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedFile {
    pub source_path: PathBuf,
    pub display_path: String,
}

/// Non-fatal problems met while resolving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionWarning {
    /// An explicit path does not exist. Holds the absolute path.
    PathNotFound(PathBuf),
}

impl fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionWarning::PathNotFound(path) => {
                write!(f, "{} not found. Skipping...", path.display())
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Resolution {
    pub files: Vec<ResolvedFile>,
    pub warnings: Vec<ResolutionWarning>,
}

/// Outcome of searching the ancestors of a directory for a root marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectRoot {
    Found(PathBuf),
    NotFound,
}

/// Walk from `start` upward and return the first directory holding one of
/// `markers`.
pub fn find_project_root(start: &Path, markers: &[String]) -> ProjectRoot {
    for dir in start.ancestors() {
        if markers.iter().any(|m| dir.join(m).is_file()) {
            return ProjectRoot::Found(dir.to_path_buf());
        }
    }
    ProjectRoot::NotFound
}

/// Resolve `paths` (relative ones against `cwd`) into source files.
pub fn resolve<P: AsRef<Path>>(
    paths: &[P],
    config: &ResolverConfig,
    cwd: &Path,
    verbose: bool,
) -> Result<Resolution> {
    if paths.is_empty() {
        resolve_project(config, cwd, verbose)
    } else {
        resolve_explicit(paths, config, cwd, verbose)
    }
}

fn resolve_explicit<P: AsRef<Path>>(
    paths: &[P],
    config: &ResolverConfig,
    cwd: &Path,
    verbose: bool,
) -> Result<Resolution> {
    let mut resolution = Resolution::default();

    for given in paths {
        let given = given.as_ref();
        let abs = normalize(&cwd.join(given));

        let metadata = match std::fs::metadata(&abs) {
            Ok(m) => m,
            // `file.jl/extra` fails with ENOTDIR rather than ENOENT.
            Err(e) if matches!(e.kind(), ErrorKind::NotFound | ErrorKind::NotADirectory) => {
                resolution
                    .warnings
                    .push(ResolutionWarning::PathNotFound(abs));
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        if metadata.is_dir() {
            if verbose {
                info!(dir = %abs.display(), "Scanning directory");
            }
            for file in walk_sources(&abs, true, config)? {
                let display_path = match file.strip_prefix(cwd) {
                    Ok(rel) => path_string(rel),
                    Err(_) => match file.strip_prefix(&abs) {
                        Ok(rel) => path_string(&given.join(rel)),
                        Err(_) => path_string(&file),
                    },
                };
                resolution.files.push(ResolvedFile {
                    source_path: file,
                    display_path,
                });
            }
        } else {
            let display_path = match abs.strip_prefix(cwd) {
                Ok(rel) => path_string(rel),
                Err(_) => path_string(given),
            };
            resolution.files.push(ResolvedFile {
                source_path: abs,
                display_path,
            });
        }
    }

    if verbose {
        info!(
            files = resolution.files.len(),
            skipped = resolution.warnings.len(),
            "Resolved explicit paths"
        );
    }
    Ok(resolution)
}

fn resolve_project(config: &ResolverConfig, cwd: &Path, verbose: bool) -> Result<Resolution> {
    let mut resolution = Resolution::default();

    match find_project_root(cwd, &config.root_markers) {
        ProjectRoot::Found(root) => {
            if verbose {
                info!(root = %root.display(), "Found project root");
            }
            for dir_name in &config.source_dirs {
                let dir = root.join(dir_name);
                if !dir.is_dir() {
                    continue;
                }
                if verbose {
                    info!(dir = %dir.display(), "Scanning directory");
                }
                push_relative(&mut resolution, walk_sources(&dir, true, config)?, &root);
            }
        }
        ProjectRoot::NotFound => {
            if verbose {
                info!(cwd = %cwd.display(), "No project root found, scanning working directory");
            }
            push_relative(&mut resolution, walk_sources(cwd, false, config)?, cwd);
        }
    }

    if verbose {
        info!(files = resolution.files.len(), "Resolved project files");
    }
    Ok(resolution)
}

fn push_relative(resolution: &mut Resolution, files: Vec<PathBuf>, root: &Path) {
    for file in files {
        let display_path = match file.strip_prefix(root) {
            Ok(rel) => path_string(rel),
            Err(_) => path_string(&file),
        };
        resolution.files.push(ResolvedFile {
            source_path: file,
            display_path,
        });
    }
}

/// List source files under `dir`, depth-first with each level sorted by name.
fn walk_sources(dir: &Path, recursive: bool, config: &ResolverConfig) -> Result<Vec<PathBuf>> {
    let mut walker = WalkDir::new(dir).min_depth(1).sort_by_file_name();
    if !recursive {
        walker = walker.max_depth(1);
    }

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        // Symlinked files count; `is_file` follows the link, dangling ones drop out.
        let is_file = entry.file_type().is_file()
            || (entry.path_is_symlink() && entry.path().is_file());
        if is_file && config.is_source_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

/// Decode a JSON array of path strings.
///
/// Anything other than an array of strings is rejected before any
/// resolution work happens.
pub fn paths_from_json(input: &str) -> Result<Vec<PathBuf>> {
    let value: serde_json::Value = serde_json::from_str(input)
        .map_err(|e| LinecovError::InvalidInput(format!("path list is not valid JSON: {e}")))?;
    let serde_json::Value::Array(items) = value else {
        return Err(LinecovError::InvalidInput(
            "path list must be a JSON array".to_string(),
        ));
    };

    items
        .into_iter()
        .enumerate()
        .map(|(idx, item)| match item {
            serde_json::Value::String(s) => Ok(PathBuf::from(s)),
            other => Err(LinecovError::InvalidInput(format!(
                "path list entry {idx} is {}, expected a string",
                json_kind(&other)
            ))),
        })
        .collect()
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

/// Lexically drop `.` components and fold `..` into their parent.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push(component);
                }
            }
            other => out.push(other),
        }
    }
    out
}

fn path_string(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}
