/// Parser for per-source `.cov` sidecar files.
///
/// An instrumented run writes `name.ext.<pid>.cov` (or `name.ext.cov`) next
/// to each source file. Every line of the sidecar mirrors one physical line
/// of the source:
///
///   <count field, 9 chars, right-aligned> <source text>
///
/// where the count field is `-` for lines that were not instrumented and a
/// decimal execution count otherwise:
///
/// ```text
///           - module Foo
///           3 f(x) = x + 1
///           0 g(x) = x - 1
/// ```
use crate::error::{LinecovError, Result};

/// Width of the leading count field.
pub const COUNT_FIELD_WIDTH: usize = 9;

/// Parse one sidecar into per-line counts (`None` = not instrumented).
pub fn parse(input: &[u8]) -> Result<Vec<Option<u64>>> {
    let text = std::str::from_utf8(input)
        .map_err(|e| LinecovError::Parse(format!("Invalid UTF-8 in .cov data: {e}")))?;

    let mut counts = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let field = match line.char_indices().nth(COUNT_FIELD_WIDTH) {
            Some((end, _)) => &line[..end],
            None => line,
        };
        let field = field.trim();

        let count = match field {
            "" | "-" => None,
            digits => Some(digits.parse::<u64>().map_err(|_| {
                LinecovError::Parse(format!(
                    "Invalid execution count '{}' on line {}",
                    digits,
                    idx + 1
                ))
            })?),
        };
        counts.push(count);
    }
    Ok(counts)
}

/// Fold `other` into `acc` line by line, summing counts.
///
/// An instrumented line in either input is instrumented in the result; the
/// result is as long as the longer input.
pub fn merge_into(acc: &mut Vec<Option<u64>>, other: &[Option<u64>]) {
    if acc.len() < other.len() {
        acc.resize(other.len(), None);
    }
    for (slot, count) in acc.iter_mut().zip(other) {
        *slot = match (*slot, *count) {
            (Some(a), Some(b)) => Some(a.saturating_add(b)),
            (a, b) => a.or(b),
        };
    }
}
