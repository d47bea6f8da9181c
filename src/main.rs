use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use linecov::cli::{self, Style};
use linecov::config::{ResolverConfig, Settings};

/// linecov — line coverage report for files, directories or a whole project.
#[derive(Parser)]
#[command(name = "linecov", version, about)]
struct Cli {
    /// Files or directories to report on. Defaults to the source and test
    /// directories of the enclosing project.
    paths: Vec<PathBuf>,

    /// Log resolution progress.
    #[arg(short, long)]
    verbose: bool,

    /// Read coverage from an LCOV or Cobertura tracefile instead of `.cov`
    /// sidecar files.
    #[arg(long)]
    tracefile: Option<PathBuf>,

    /// Override tracefile format detection (cobertura, lcov).
    #[arg(long, requires = "tracefile")]
    format: Option<String>,

    /// Output style.
    #[arg(long, value_enum, default_value_t = Style::Text)]
    style: Style,

    /// Source file extension picked up in directories (repeatable).
    #[arg(long = "ext", value_name = "EXT")]
    extensions: Vec<String>,

    /// Directory scanned under the project root (repeatable).
    #[arg(long = "source-dir", value_name = "DIR")]
    source_dirs: Vec<String>,

    /// JSON file holding an array of additional paths.
    #[arg(long, value_name = "FILE")]
    paths_from: Option<PathBuf>,
}

impl Cli {
    fn settings(&self) -> Settings {
        let mut resolver = ResolverConfig::default();
        if !self.extensions.is_empty() {
            resolver.source_extensions = self.extensions.clone();
        }
        if !self.source_dirs.is_empty() {
            resolver.source_dirs = self.source_dirs.clone();
        }
        Settings {
            resolver,
            verbose: self.verbose,
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let mut paths = args.paths.clone();
    if let Some(list) = &args.paths_from {
        cli::extend_paths_from(&mut paths, list)?;
    }

    let settings = args.settings();
    let source = cli::open_source(args.tracefile.as_deref(), args.format.as_deref())?;
    let cwd = std::env::current_dir().context("Failed to read the working directory")?;

    let out = cli::cmd_report(&paths, &settings, &*source, args.style, &cwd)?;
    print!("{out}");
    Ok(())
}
