/// Auto-detection of tracefile formats.
///
/// Strategy:
///   1. Check the file extension for strong hints
///   2. Peek at the first bytes of the content
///   3. Fall back to the CLI --format override (handled by caller)
use std::path::Path;

use crate::error::LinecovError;

/// Supported tracefile formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Cobertura,
    Lcov,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Cobertura => "cobertura",
            Format::Lcov => "lcov",
        }
    }
}

impl std::str::FromStr for Format {
    type Err = LinecovError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "cobertura" => Ok(Format::Cobertura),
            "lcov" => Ok(Format::Lcov),
            _ => Err(LinecovError::Parse(format!(
                "Unknown format: '{s}'. Supported: cobertura, lcov"
            ))),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detect the tracefile format from its name and content.
pub fn detect_format(path: &Path, content: &[u8]) -> Option<Format> {
    detect_by_extension(path).or_else(|| detect_by_content(content))
}

fn detect_by_extension(path: &Path) -> Option<Format> {
    let ext = path.extension()?.to_str()?.to_lowercase();
    match ext.as_str() {
        "info" | "lcov" => Some(Format::Lcov),
        // .xml could be anything; look at the content.
        _ => None,
    }
}

fn detect_by_content(content: &[u8]) -> Option<Format> {
    let head_len = content.len().min(4096);
    let head = String::from_utf8_lossy(&content[..head_len]);

    // Require tags at line starts so prose mentioning "SF:" is not LCOV.
    let has_sf = head.lines().any(|l| l.starts_with("SF:"));
    let has_da = head.lines().any(|l| l.starts_with("DA:"));
    if has_sf && has_da {
        return Some(Format::Lcov);
    }

    let is_xml = head.contains("<?xml") || head.trim_start().starts_with('<');
    if is_xml && head.contains("<coverage") {
        return Some(Format::Cobertura);
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_lcov_by_extension() {
        assert_eq!(detect_format(Path::new("lcov.info"), b""), Some(Format::Lcov));
        assert_eq!(detect_format(Path::new("cov.lcov"), b""), Some(Format::Lcov));
    }

    #[test]
    fn test_detect_lcov_by_content() {
        let content = b"TN:\nSF:/src/A.jl\nDA:1,5\nend_of_record\n";
        assert_eq!(detect_format(Path::new("coverage.txt"), content), Some(Format::Lcov));
    }

    #[test]
    fn test_detect_cobertura_by_content() {
        let content = b"<?xml version=\"1.0\"?>\n<coverage version=\"1.0\">";
        assert_eq!(
            detect_format(Path::new("coverage.xml"), content),
            Some(Format::Cobertura)
        );
    }

    #[test]
    fn test_detect_unknown() {
        assert_eq!(detect_format(Path::new("random.dat"), b"hello world"), None);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!("LCOV".parse::<Format>().unwrap(), Format::Lcov);
        assert!("jacoco".parse::<Format>().is_err());
    }
}
