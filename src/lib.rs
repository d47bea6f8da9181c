pub mod aggregate;
pub mod cli;
pub mod config;
pub mod detect;
pub mod engine;
pub mod error;
pub mod ingest;
pub mod loader;
pub mod model;
pub mod parsers;
pub mod report;
pub mod resolve;
