#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Sidecar parser must not panic on any input.
    let _ = linecov::parsers::cov::parse(data);
});
