/// Parser for Cobertura XML coverage reports.
///
/// Only the parts carrying line hits are read:
///   <coverage>
///     <sources><source>...</source></sources>
///     <packages><package><classes>
///       <class filename="...">
///         <methods><method><lines><line number=".." hits=".."/></lines></method></methods>
///         <lines><line number="..." hits="..."/></lines>
///       </class>
///     </classes></package></packages>
///   </coverage>
///
/// A line can appear under both `<method>` and `<class>`; each line number
/// is kept once per class, with the larger hit count.
use std::collections::HashMap;
use std::str;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::{LinecovError, Result};
use crate::model::{FileRecord, LineRecord, TraceData};
use crate::parsers::Parser;

pub struct CoberturaParser;

impl Parser for CoberturaParser {
    fn parse(&self, input: &[u8]) -> Result<TraceData> {
        parse(input)
    }
}

/// Parse Cobertura XML from raw bytes.
pub fn parse(input: &[u8]) -> Result<TraceData> {
    let mut reader = Reader::from_reader(input);
    reader.trim_text(true);

    let mut data = TraceData::new();
    let mut buf = Vec::new();

    let mut current_file: Option<FileRecord> = None;
    let mut line_index: HashMap<u32, usize> = HashMap::new();

    let mut sources: Vec<String> = Vec::new();
    let mut in_source = false;

    loop {
        let event = reader.read_event_into(&mut buf);
        let is_start = matches!(&event, Ok(Event::Start(_)));
        match event {
            Err(source) => {
                return Err(LinecovError::Xml {
                    source,
                    position: reader.buffer_position(),
                })
            }
            Ok(Event::Eof) => break,
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => match e.name().as_ref() {
                // Self-closing <source/> has no text and no End event.
                b"source" if is_start => in_source = true,
                b"class" => {
                    if let Some(filename) = attr_map(e).remove("filename") {
                        if let Some(file) = current_file.take() {
                            data.files.push(file);
                        }
                        current_file =
                            Some(FileRecord::new(resolve_source_path(&filename, &sources)));
                        line_index.clear();
                    }
                }
                b"line" => {
                    if let Some(file) = current_file.as_mut() {
                        record_line(file, &mut line_index, &attr_map(e))?;
                    }
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                if in_source {
                    if let Ok(text) = e.unescape() {
                        sources.push(text.to_string());
                    }
                    in_source = false;
                }
            }
            Ok(Event::End(ref e)) => match e.name().as_ref() {
                b"source" => in_source = false,
                b"class" => {
                    if let Some(file) = current_file.take() {
                        data.files.push(file);
                    }
                }
                _ => {}
            },
            _ => {}
        }
        buf.clear();
    }

    if let Some(file) = current_file.take() {
        data.files.push(file);
    }

    for file in &mut data.files {
        file.lines.sort_by_key(|l| l.line_number);
    }

    Ok(data)
}

fn record_line(
    file: &mut FileRecord,
    line_index: &mut HashMap<u32, usize>,
    attrs: &HashMap<String, String>,
) -> Result<()> {
    let Some(number) = attrs.get("number") else {
        return Ok(());
    };
    let line_number = number.parse::<u32>().map_err(|_| {
        LinecovError::Parse(format!(
            "Invalid line number {number:?} for {}",
            file.path
        ))
    })?;
    let hit_count = match attrs.get("hits") {
        Some(hits) => hits.parse::<u64>().map_err(|_| {
            LinecovError::Parse(format!(
                "Invalid hits {hits:?} on line {line_number} of {}",
                file.path
            ))
        })?,
        None => 0,
    };

    match line_index.get(&line_number) {
        Some(&idx) => {
            let existing = &mut file.lines[idx];
            existing.hit_count = existing.hit_count.max(hit_count);
        }
        None => {
            line_index.insert(line_number, file.lines.len());
            file.lines.push(LineRecord {
                line_number,
                hit_count,
            });
        }
    }
    Ok(())
}

/// Prefix a relative filename with the first non-empty `<source>` entry.
fn resolve_source_path(filename: &str, sources: &[String]) -> String {
    if filename.starts_with('/') {
        return filename.to_string();
    }
    match sources
        .iter()
        .map(|s| s.trim_end_matches('/'))
        .find(|s| !s.is_empty())
    {
        Some(base) => format!("{base}/{filename}"),
        None => filename.to_string(),
    }
}

fn attr_map(e: &BytesStart) -> HashMap<String, String> {
    e.attributes()
        .filter_map(|a| {
            let attr = a.ok()?;
            let key = str::from_utf8(attr.key.local_name().into_inner())
                .ok()?
                .to_string();
            let value = attr.unescape_value().ok()?.to_string();
            Some((key, value))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<?xml version="1.0" ?>
<coverage version="1.0" line-rate="0.5">
  <sources>
    <source>/home/user/project</source>
  </sources>
  <packages>
    <package name="src">
      <classes>
        <class name="A" filename="src/A.jl" line-rate="0.75">
          <methods>
            <method name="f" signature="">
              <lines>
                <line number="2" hits="0"/>
              </lines>
            </method>
          </methods>
          <lines>
            <line number="1" hits="1"/>
            <line number="2" hits="4"/>
            <line number="3" hits="0"/>
          </lines>
        </class>
        <class name="B" filename="/abs/B.jl" line-rate="1">
          <lines>
            <line number="5" hits="2"/>
          </lines>
        </class>
      </classes>
    </package>
  </packages>
</coverage>
"#;

    #[test]
    fn test_parse_cobertura() {
        let data = CoberturaParser.parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(data.files.len(), 2);

        let a = &data.files[0];
        assert_eq!(a.path, "/home/user/project/src/A.jl");
        // Line 2 appears twice; kept once with the larger count.
        assert_eq!(
            a.lines,
            vec![
                LineRecord { line_number: 1, hit_count: 1 },
                LineRecord { line_number: 2, hit_count: 4 },
                LineRecord { line_number: 3, hit_count: 0 },
            ]
        );

        let b = &data.files[1];
        assert_eq!(b.path, "/abs/B.jl");
        assert_eq!(b.lines.len(), 1);
    }

    #[test]
    fn test_parse_cobertura_skips_empty_source() {
        let xml = r#"<coverage><sources><source/><source>/root/</source></sources>
<packages><package><classes><class filename="x.jl"><lines><line number="1" hits="1"/></lines></class></classes></package></packages></coverage>"#;
        let data = parse(xml.as_bytes()).unwrap();
        assert_eq!(data.files[0].path, "/root/x.jl");
    }

    #[test]
    fn test_parse_cobertura_no_sources() {
        let xml = r#"<coverage><packages><package><classes><class filename="src/f.jl"><lines/></class></classes></package></packages></coverage>"#;
        let data = parse(xml.as_bytes()).unwrap();
        assert_eq!(data.files.len(), 1);
        assert_eq!(data.files[0].path, "src/f.jl");
        assert!(data.files[0].lines.is_empty());
    }

    #[test]
    fn test_parse_cobertura_bad_hits_is_error() {
        let xml = r#"<coverage><packages><package><classes><class filename="x.jl"><lines>
<line number="1" hits="1"/><line number="2" hits="lots"/></lines></class></classes></package></packages></coverage>"#;
        let err = parse(xml.as_bytes()).unwrap_err();
        assert!(matches!(err, LinecovError::Parse(_)));
        assert!(err.to_string().contains("\"lots\""), "got: {err}");
    }

    #[test]
    fn test_parse_cobertura_bad_line_number_is_error() {
        let xml = r#"<coverage><packages><package><classes><class filename="x.jl"><lines>
<line number="two" hits="1"/></lines></class></classes></package></packages></coverage>"#;
        assert!(matches!(parse(xml.as_bytes()), Err(LinecovError::Parse(_))));
    }

    #[test]
    fn test_parse_cobertura_malformed() {
        let xml = "<coverage><packages></coverage>";
        assert!(matches!(parse(xml.as_bytes()), Err(LinecovError::Xml { .. })));
    }
}
