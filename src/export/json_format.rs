//! JSON export.

use super::Metadata;
use crate::error::ExportResult;
use crate::scanner::ScanResults;
use serde_json::{json, Map, Value};

/// `{ "scan_info": {...}, "results": [{port, service}, ...] }`, pretty-printed.
///
/// Metadata entries are merged into `scan_info` last, so a metadata key
/// replaces a base key of the same name.
pub fn render_json(results: &ScanResults, metadata: &Metadata) -> ExportResult<String> {
    let mut scan_info = Map::new();
    scan_info.insert("target_ip".into(), json!(results.target.host()));
    scan_info.insert("start_port".into(), json!(results.target.ports().start().as_u16()));
    scan_info.insert("end_port".into(), json!(results.target.ports().end().as_u16()));
    scan_info.insert("timeout".into(), json!(results.timeout.as_secs_f64()));
    scan_info.insert("total_open_ports".into(), json!(results.open_count()));

    for (key, value) in metadata {
        scan_info.insert(key.clone(), Value::String(value.clone()));
    }

    let rows: Vec<Value> = results
        .open_ports
        .iter()
        .map(|open| json!({ "port": open.port.as_u16(), "service": open.service }))
        .collect();

    let document = json!({
        "scan_info": Value::Object(scan_info),
        "results": rows,
    });

    Ok(serde_json::to_string_pretty(&document)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::fixtures;

    fn parse(results: &ScanResults, metadata: &Metadata) -> Value {
        serde_json::from_str(&render_json(results, metadata).unwrap()).unwrap()
    }

    #[test]
    fn test_scan_info_and_results() {
        let doc = parse(&fixtures::results(&[9876, 9877, 9878]), &Metadata::new());

        let info = &doc["scan_info"];
        assert_eq!(info["target_ip"], "127.0.0.1");
        assert_eq!(info["start_port"], 9870);
        assert_eq!(info["end_port"], 9885);
        assert_eq!(info["timeout"], 0.3);
        assert_eq!(info["total_open_ports"], 3);

        let rows = doc["results"].as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0]["port"], 9876);
        assert_eq!(rows[0]["service"], "Unknown Service");
    }

    #[test]
    fn test_metadata_overrides_base_keys() {
        let mut metadata = Metadata::new();
        metadata.insert("timestamp".into(), "2024-01-01 12:00:00".into());
        metadata.insert("target_ip".into(), "localhost".into());

        let doc = parse(&fixtures::results(&[22]), &metadata);
        assert_eq!(doc["scan_info"]["timestamp"], "2024-01-01 12:00:00");
        assert_eq!(doc["scan_info"]["target_ip"], "localhost");
    }

    #[test]
    fn test_empty_results() {
        let doc = parse(&fixtures::results(&[]), &Metadata::new());
        assert_eq!(doc["scan_info"]["total_open_ports"], 0);
        assert!(doc["results"].as_array().unwrap().is_empty());
    }
}
