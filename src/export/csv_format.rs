//! CSV export.
//!
//! A comment-style header block (`# key,value` rows), one blank line, then a
//! plain `Port,Service` table that spreadsheet tools pick up directly.

use super::Metadata;
use crate::error::{ExportError, ExportResult};
use crate::scanner::ScanResults;
use csv::WriterBuilder;
use std::io::Write;

pub fn render_csv(results: &ScanResults, metadata: &Metadata) -> ExportResult<String> {
    let mut out: Vec<u8> = Vec::new();

    {
        // Header rows have one or two fields.
        let mut wtr = WriterBuilder::new().flexible(true).from_writer(&mut out);

        if !metadata.is_empty() {
            wtr.write_record(["# Scan Metadata"])?;
            for (key, value) in metadata {
                wtr.write_record([format!("# {}", key).as_str(), value.as_str()])?;
            }
        }

        let ports = results.target.ports();
        wtr.write_record(["# Target IP", results.target.host()])?;
        wtr.write_record(["# Port Range", ports.to_string().as_str()])?;
        wtr.write_record(["# Total Open Ports", results.open_count().to_string().as_str()])?;
        wtr.flush().map_err(csv::Error::from)?;
    }

    out.write_all(b"\n").map_err(csv::Error::from)?;

    {
        let mut wtr = WriterBuilder::new().from_writer(&mut out);
        wtr.write_record(["Port", "Service"])?;
        for open in &results.open_ports {
            wtr.write_record([open.port.to_string().as_str(), open.service.as_str()])?;
        }
        wtr.flush().map_err(csv::Error::from)?;
    }

    String::from_utf8(out)
        .map_err(|e| ExportError::from(csv::Error::from(std::io::Error::other(e))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::fixtures;

    #[test]
    fn test_layout_without_metadata() {
        let csv = render_csv(&fixtures::results(&[9876, 9877]), &Metadata::new()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(
            lines,
            vec![
                "# Target IP,127.0.0.1",
                "# Port Range,9870-9885",
                "# Total Open Ports,2",
                "",
                "Port,Service",
                "9876,Unknown Service",
                "9877,Unknown Service",
            ]
        );
    }

    #[test]
    fn test_metadata_block_comes_first() {
        let mut metadata = Metadata::new();
        metadata.insert("randomized".into(), "true".into());
        metadata.insert("concurrency".into(), "10".into());

        let csv = render_csv(&fixtures::results(&[22]), &metadata).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "# Scan Metadata");
        assert_eq!(lines[1], "# concurrency,10");
        assert_eq!(lines[2], "# randomized,true");
        assert_eq!(lines[3], "# Target IP,127.0.0.1");
        assert!(lines.contains(&"22,SSH"));
    }

    #[test]
    fn test_quotes_fields_with_commas() {
        let mut metadata = Metadata::new();
        metadata.insert("note".into(), "a,b".into());

        let csv = render_csv(&fixtures::results(&[]), &metadata).unwrap();
        assert!(csv.contains("# note,\"a,b\""));
        assert!(csv.trim_end().ends_with("Port,Service"));
    }
}
