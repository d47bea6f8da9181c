#![allow(dead_code)]

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Create a temporary project root (with a `Project.toml` marker).
/// The caller must hold onto `TempDir` to keep the directory alive.
pub fn setup_project() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Project.toml"), "name = \"Demo\"\n").unwrap();
    dir
}

/// Write a source file at `root/rel` together with a `.cov` sidecar.
/// Each entry is the execution count of one line (`None` = not tracked).
pub fn write_covered(root: &Path, rel: &str, counts: &[Option<u64>]) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();

    let mut source = String::new();
    let mut cov = String::new();
    for (i, count) in counts.iter().enumerate() {
        let text = format!("line_{i}()");
        let field = match count {
            Some(n) => n.to_string(),
            None => "-".to_string(),
        };
        source.push_str(&text);
        source.push('\n');
        cov.push_str(&format!("{field:>9} {text}\n"));
    }
    fs::write(&path, source).unwrap();

    let name = path.file_name().unwrap().to_string_lossy().into_owned();
    fs::write(path.with_file_name(format!("{name}.4242.cov")), cov).unwrap();
}

/// Write a source file with no coverage record at all.
pub fn write_uncovered(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

/// The four-file project used by the end-to-end scenarios.
pub fn setup_demo_project() -> TempDir {
    let dir = setup_project();
    let root = dir.path();
    write_covered(root, "src/A.jl", &[Some(1)]);
    write_covered(root, "src/B.jl", &[None, Some(3), Some(0), Some(1), None]);
    write_covered(root, "src/C.jl", &[Some(0), None, Some(0)]);
    write_covered(root, "test/runtests.jl", &[None, None]);
    dir
}
