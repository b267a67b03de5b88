//! Artifact manifests in JSON or JSON Lines.

use std::io::{self, Write};

use crate::types::ArtifactRecord;

/// Manifest format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Single JSON array
    Json,
    /// One JSON object per line (newline-delimited JSON)
    JsonLines,
}

impl OutputFormat {
    /// Parse format from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "jsonl" | "jsonlines" | "ndjson" => Some(Self::JsonLines),
            _ => None,
        }
    }
}

/// Writes [`ArtifactRecord`]s as a manifest.
pub struct ManifestWriter<W: Write> {
    writer: W,
    format: OutputFormat,
    pretty: bool,
}

impl<W: Write> ManifestWriter<W> {
    /// Create a manifest writer. `pretty` only affects the JSON format.
    pub fn new(writer: W, format: OutputFormat, pretty: bool) -> Self {
        Self {
            writer,
            format,
            pretty,
        }
    }

    /// Write the whole manifest: an array for JSON, one line per record for JSONL.
    pub fn write_manifest(&mut self, records: &[ArtifactRecord]) -> io::Result<()> {
        match self.format {
            OutputFormat::Json => {
                if self.pretty {
                    serde_json::to_writer_pretty(&mut self.writer, records)
                        .map_err(io::Error::other)?;
                } else {
                    serde_json::to_writer(&mut self.writer, records).map_err(io::Error::other)?;
                }
                writeln!(self.writer)?;
            }
            OutputFormat::JsonLines => {
                for record in records {
                    serde_json::to_writer(&mut self.writer, record).map_err(io::Error::other)?;
                    writeln!(self.writer)?;
                }
            }
        }
        self.writer.flush()
    }

    /// Consume the writer and return the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::MimeType;

    fn record(name: &str) -> ArtifactRecord {
        ArtifactRecord {
            name: name.to_string(),
            download_name: format!("resized-{name}"),
            mime: MimeType::Png,
            width: 2048,
            height: 1536,
            source_width: 4000,
            source_height: 3000,
            bytes: 1234,
            locator: None,
        }
    }

    #[test]
    fn test_manifest_json_array() {
        let mut writer = ManifestWriter::new(Vec::new(), OutputFormat::Json, false);
        writer
            .write_manifest(&[record("a.png"), record("b.png")])
            .unwrap();

        let output = String::from_utf8(writer.into_inner()).unwrap();
        assert!(output.starts_with('['));
        assert!(output.trim().ends_with(']'));
        assert!(output.contains("\"download_name\":\"resized-a.png\""));
        assert!(output.contains("\"mime\":\"image/png\""));
        assert!(!output.contains("locator"));
    }

    #[test]
    fn test_manifest_jsonl_lines() {
        let mut writer = ManifestWriter::new(Vec::new(), OutputFormat::JsonLines, true);
        writer
            .write_manifest(&[record("a.png"), record("b.png")])
            .unwrap();

        let output = String::from_utf8(writer.into_inner()).unwrap();
        let lines: Vec<&str> = output.trim().split('\n').collect();
        assert_eq!(lines.len(), 2);
        let parsed: ArtifactRecord = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(parsed.name, "b.png");
    }

    #[test]
    fn test_format_parse() {
        assert_eq!(OutputFormat::parse("json"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::parse("JSONL"), Some(OutputFormat::JsonLines));
        assert_eq!(OutputFormat::parse("ndjson"), Some(OutputFormat::JsonLines));
        assert_eq!(OutputFormat::parse("yaml"), None);
    }
}
