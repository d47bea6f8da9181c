mod common;

use std::path::PathBuf;

use linecov::config::Settings;
use linecov::engine::run_in;
use linecov::loader::TracefileSource;
use linecov::model::Coverage;
use linecov::parsers::Parser;

#[test]
fn lcov_tracefile_drives_report() {
    let dir = common::setup_project();
    let root = dir.path();
    common::write_uncovered(root, "src/Main.jl", "module Main\nf() = 1\ng() = 2\nend\n");
    common::write_uncovered(root, "test/runtests.jl", "using Main\n");

    let info = root.join("lcov.info");
    std::fs::write(
        &info,
        "TN:\nSF:src/Main.jl\nDA:2,5\nDA:3,0\nLF:2\nLH:1\nend_of_record\n",
    )
    .unwrap();

    let (source, _format) = TracefileSource::open(&info, None).unwrap();
    let output = run_in(&[] as &[PathBuf], &Settings::default(), &source, root).unwrap();

    assert_eq!(output.report.files.len(), 2);
    assert_eq!(output.report.files[0].display_path, "src/Main.jl");
    assert_eq!(output.report.files[0].lines_of_code, 2);
    assert_eq!(output.report.files[0].missed, 1);
    assert_eq!(output.report.files[1].coverage, Coverage::NotApplicable);
    assert_eq!(output.report.total.coverage, Coverage::Percentage(50.0));
}

#[test]
fn lcov_absolute_paths_match() {
    let dir = common::setup_project();
    let root = dir.path();
    common::write_uncovered(root, "src/A.jl", "a() = 1\n");

    let lcov = format!(
        "SF:{}\nDA:1,0\nend_of_record\n",
        root.join("src/A.jl").display()
    );
    let data = linecov::parsers::lcov::LcovParser
        .parse(lcov.as_bytes())
        .unwrap();
    let source = TracefileSource::from_data(&data, std::path::Path::new("/unused"));

    let paths = vec![PathBuf::from("src/A.jl")];
    let output = run_in(&paths, &Settings::default(), &source, root).unwrap();
    assert_eq!(output.report.files[0].coverage, Coverage::Percentage(0.0));
}

#[test]
fn lcov_non_numeric_count_is_rejected() {
    let dir = common::setup_project();
    let info = dir.path().join("lcov.info");
    std::fs::write(&info, "SF:src/A.jl\nDA:1,1\nDA:2,banana\nend_of_record\n").unwrap();

    let err = TracefileSource::open(&info, None).unwrap_err();
    assert!(err.to_string().contains("banana"), "got: {err}");
}
