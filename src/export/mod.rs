//! File export of scan results.
//!
//! Three formats: JSON for tooling, CSV for spreadsheets, plain text for
//! reports. The format is validated before anything touches the filesystem,
//! so an unsupported format never creates or truncates a file.

mod csv_format;
mod json_format;
mod text_format;

pub use csv_format::render_csv;
pub use json_format::render_json;
pub use text_format::render_text;

use crate::error::{ExportError, ExportResult};
use crate::scanner::ScanResults;
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use tracing::debug;

/// Free-form key/value pairs written alongside the results.
pub type Metadata = BTreeMap<String, String>;

/// Supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Json,
    Csv,
    Text,
}

impl ExportFormat {
    /// Conventional file extension.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Csv => "csv",
            Self::Text => "txt",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for ExportFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            "txt" | "text" => Ok(Self::Text),
            _ => Err(ExportError::UnsupportedFormat(s.to_string())),
        }
    }
}

/// Render results to a string without writing anything.
pub fn render(
    results: &ScanResults,
    format: ExportFormat,
    metadata: &Metadata,
) -> ExportResult<String> {
    match format {
        ExportFormat::Json => render_json(results, metadata),
        ExportFormat::Csv => render_csv(results, metadata),
        ExportFormat::Text => Ok(render_text(results, metadata)),
    }
}

/// Write results to `path` in the named format (`json`, `csv`, `txt`).
///
/// Fails with [`ExportError::UnsupportedFormat`] for any other name, leaving
/// `path` untouched.
pub fn export(
    results: &ScanResults,
    path: impl AsRef<Path>,
    format: &str,
    metadata: &Metadata,
) -> ExportResult<()> {
    let format: ExportFormat = format.parse()?;
    export_as(results, path, format, metadata)
}

/// Write results to `path` in an already parsed format.
pub fn export_as(
    results: &ScanResults,
    path: impl AsRef<Path>,
    format: ExportFormat,
    metadata: &Metadata,
) -> ExportResult<()> {
    let path = path.as_ref();
    let content = render(results, format, metadata)?;

    fs::write(path, content).map_err(|source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    debug!(path = %path.display(), %format, open = results.open_count(), "exported results");
    Ok(())
}

#[cfg(test)]
pub(crate) mod fixtures {
    use crate::scanner::{OpenPort, ScanResults};
    use crate::types::{Port, ScanTarget};
    use std::time::Duration;

    pub fn results(open: &[u16]) -> ScanResults {
        ScanResults {
            target: ScanTarget::new("127.0.0.1", 9870, 9885).unwrap(),
            timeout: Duration::from_millis(300),
            open_ports: open
                .iter()
                .map(|&p| OpenPort::new(Port::new(p).unwrap()))
                .collect(),
            ports_scanned: 16,
            total_ports: 16,
            duration: Duration::from_millis(120),
            cancelled: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!("json".parse::<ExportFormat>().unwrap(), ExportFormat::Json);
        assert_eq!("CSV".parse::<ExportFormat>().unwrap(), ExportFormat::Csv);
        assert_eq!("txt".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert_eq!("text".parse::<ExportFormat>().unwrap(), ExportFormat::Text);
        assert!(matches!(
            "invalid".parse::<ExportFormat>(),
            Err(ExportError::UnsupportedFormat(f)) if f == "invalid"
        ));
    }

    #[test]
    fn test_unsupported_format_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.invalid");

        let err = export(&fixtures::results(&[22]), &path, "invalid", &Metadata::new()).unwrap_err();

        assert!(matches!(err, ExportError::UnsupportedFormat(_)));
        assert!(!path.exists());
    }

    #[test]
    fn test_unsupported_format_keeps_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scan.out");
        fs::write(&path, "previous").unwrap();

        assert!(export(&fixtures::results(&[22]), &path, "xml", &Metadata::new()).is_err());
        assert_eq!(fs::read_to_string(&path).unwrap(), "previous");
    }

    #[test]
    fn test_export_writes_each_format() {
        let dir = tempfile::tempdir().unwrap();
        let results = fixtures::results(&[9876, 9877]);

        for format in [ExportFormat::Json, ExportFormat::Csv, ExportFormat::Text] {
            let path = dir.path().join(format!("scan.{}", format.extension()));
            export_as(&results, &path, format, &Metadata::new()).unwrap();
            let content = fs::read_to_string(&path).unwrap();
            assert!(content.contains("9876"), "{format}: {content}");
        }
    }

    #[test]
    fn test_export_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("scan.json");

        let err = export(&fixtures::results(&[]), &path, "json", &Metadata::new()).unwrap_err();
        assert!(matches!(err, ExportError::Io { .. }));
    }
}
