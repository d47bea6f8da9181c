pub mod cobertura;
pub mod cov;
pub mod lcov;

use crate::error::Result;
use crate::model::TraceData;

/// Every tracefile parser implements this trait.
pub trait Parser {
    /// Parse the input bytes into path-keyed line records.
    fn parse(&self, input: &[u8]) -> Result<TraceData>;
}
