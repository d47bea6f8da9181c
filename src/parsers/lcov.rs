/// Parser for the LCOV `.info` tracefile format.
///
/// Reference: https://ltp.sourceforge.net/coverage/lcov/geninfo.1.php
///
/// Only line records matter for a line report:
///   SF:<path to source file>
///   DA:<line number>,<execution count>[,<checksum>]
///   end_of_record
///
/// Function, branch and summary records (FN, FNDA, BRDA, LF, LH, ...) are
/// skipped.
use crate::error::{LinecovError, Result};
use crate::model::{FileRecord, LineRecord, TraceData};
use crate::parsers::Parser;

pub struct LcovParser;

impl Parser for LcovParser {
    fn parse(&self, input: &[u8]) -> Result<TraceData> {
        parse(input)
    }
}

/// Parse LCOV data from raw bytes.
pub fn parse(input: &[u8]) -> Result<TraceData> {
    let text = std::str::from_utf8(input)
        .map_err(|e| LinecovError::Parse(format!("Invalid UTF-8 in LCOV data: {e}")))?;

    let mut data = TraceData::new();
    let mut current_file: Option<FileRecord> = None;

    for (idx, raw_line) in text.lines().enumerate() {
        let line = raw_line.trim();
        if line.is_empty() {
            continue;
        }

        if line == "end_of_record" {
            if let Some(file) = current_file.take() {
                data.files.push(file);
            }
            continue;
        }

        let (tag, value) = match line.split_once(':') {
            Some(pair) => pair,
            None => continue,
        };

        match tag {
            "SF" => {
                if let Some(file) = current_file.take() {
                    data.files.push(file);
                }
                current_file = Some(FileRecord::new(value.to_string()));
            }
            "DA" => {
                if let Some(file) = current_file.as_mut() {
                    if let Some(record) = parse_da(value, idx + 1)? {
                        file.lines.push(record);
                    }
                }
            }
            _ => {}
        }
    }

    // Input may end without a final end_of_record.
    if let Some(file) = current_file.take() {
        data.files.push(file);
    }

    Ok(data)
}

/// Parse the value of a `DA:` record. Negative counts (e.g. -1) mark
/// non-instrumentable lines and yield `None`.
fn parse_da(value: &str, lineno: usize) -> Result<Option<LineRecord>> {
    let mut parts = value.splitn(3, ',');
    let number = parts.next().unwrap_or_default().trim();
    let count = parts.next().unwrap_or_default().trim();

    let line_number = number.parse::<u32>().map_err(|_| {
        LinecovError::Parse(format!(
            "LCOV line {lineno}: invalid line number {number:?} in DA record"
        ))
    })?;
    let count = count.parse::<i64>().map_err(|_| {
        LinecovError::Parse(format!(
            "LCOV line {lineno}: invalid execution count {count:?} in DA record"
        ))
    })?;

    Ok((count >= 0).then(|| LineRecord {
        line_number,
        hit_count: count as u64,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = b"TN:test\n\
SF:/proj/src/A.jl\n\
FN:1,f\n\
FNDA:2,f\n\
DA:1,5\n\
DA:2,5\n\
DA:3,0\n\
BRDA:2,0,0,5\n\
LF:3\n\
LH:2\n\
end_of_record\n\
SF:/proj/src/B.jl\n\
DA:4,1\n\
end_of_record\n";

    #[test]
    fn test_parse_lcov() {
        let data = parse(SAMPLE).unwrap();
        assert_eq!(data.files.len(), 2);

        let a = &data.files[0];
        assert_eq!(a.path, "/proj/src/A.jl");
        assert_eq!(a.lines.len(), 3);
        assert_eq!(a.lines[0], LineRecord { line_number: 1, hit_count: 5 });
        assert_eq!(a.lines[2], LineRecord { line_number: 3, hit_count: 0 });

        let b = &data.files[1];
        assert_eq!(b.path, "/proj/src/B.jl");
        assert_eq!(b.lines, vec![LineRecord { line_number: 4, hit_count: 1 }]);
    }

    #[test]
    fn test_parse_lcov_no_end_of_record() {
        let data = parse(b"SF:src/x.jl\nDA:1,1\nDA:2,0\n").unwrap();
        assert_eq!(data.files.len(), 1);
        assert_eq!(data.files[0].lines.len(), 2);
    }

    #[test]
    fn test_parse_lcov_negative_counts() {
        let data = parse(b"SF:src/x.jl\nDA:1,5\nDA:2,-1\nDA:3,0\nend_of_record\n").unwrap();
        let lines: Vec<u32> = data.files[0].lines.iter().map(|l| l.line_number).collect();
        assert_eq!(lines, vec![1, 3]);
    }

    #[test]
    fn test_parse_lcov_checksum_column() {
        let data = parse(b"SF:src/x.jl\nDA:7,2,abcdef\nend_of_record\n").unwrap();
        assert_eq!(
            data.files[0].lines,
            vec![LineRecord { line_number: 7, hit_count: 2 }]
        );
    }

    #[test]
    fn test_parse_lcov_bad_count_is_error() {
        let err = parse(b"SF:src/x.jl\nDA:1,1\nDA:2,banana\nend_of_record\n").unwrap_err();
        assert!(matches!(err, LinecovError::Parse(_)));
        assert!(err.to_string().contains("line 3"), "got: {err}");
        assert!(err.to_string().contains("banana"), "got: {err}");
    }

    #[test]
    fn test_parse_lcov_bad_line_number_is_error() {
        assert!(matches!(
            parse(b"SF:src/x.jl\nDA:two,1\nend_of_record\n"),
            Err(LinecovError::Parse(_))
        ));
        assert!(matches!(
            parse(b"SF:src/x.jl\nDA:2\nend_of_record\n"),
            Err(LinecovError::Parse(_))
        ));
    }

    #[test]
    fn test_parse_lcov_empty() {
        let data = parse(b"TN:test\n").unwrap();
        assert!(data.files.is_empty());
    }
}
