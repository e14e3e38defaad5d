//! Result export.
//!
//! Writes the finished [`SiteRecord`]s to a single file with the fixed
//! column order `URL, Mapped Keyword, Current Title, Current Description,
//! New SEO Title, New SEO Description, Insights`. Each run overwrites the
//! target; the file is written to a temp sibling first and renamed into place.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{info, instrument};

use seomapper_shared::{Result, SeoMapperError, SiteRecord};

/// File format for the exported table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// Comma-separated values with a header row.
    #[default]
    Csv,
    /// Array of objects keyed by column name.
    Json,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl ExportFormat {
    /// File extension conventionally used for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

/// Write `records` to `path` in `format`, replacing any existing file.
#[instrument(skip_all, fields(path = %path.display(), rows = records.len(), %format))]
pub fn save_results(records: &[SiteRecord], path: &Path, format: ExportFormat) -> Result<()> {
    let temp = temp_path(path);

    let file = std::fs::File::create(&temp).map_err(|e| SeoMapperError::io(&temp, e))?;
    let written = match format {
        ExportFormat::Csv => write_csv(records, file),
        ExportFormat::Json => write_json(records, file),
    };
    if let Err(e) = written {
        let _ = std::fs::remove_file(&temp);
        return Err(e);
    }

    std::fs::rename(&temp, path).map_err(|e| SeoMapperError::io(path, e))?;
    info!("results saved");

    Ok(())
}

/// Serialize `records` as CSV. The header row is written even with no records.
pub fn write_csv<W: Write>(records: &[SiteRecord], writer: W) -> Result<()> {
    let mut csv = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv.write_record(SiteRecord::COLUMNS)
        .map_err(|e| SeoMapperError::Export(e.to_string()))?;
    for record in records {
        csv.serialize(record)
            .map_err(|e| SeoMapperError::Export(format!("{}: {e}", record.url)))?;
    }
    csv.flush()
        .map_err(|e| SeoMapperError::Export(format!("flush failed: {e}")))?;

    Ok(())
}

/// Serialize `records` as a pretty-printed JSON array.
pub fn write_json<W: Write>(records: &[SiteRecord], mut writer: W) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, records)
        .map_err(|e| SeoMapperError::Export(e.to_string()))?;
    writeln!(writer).map_err(|e| SeoMapperError::Export(e.to_string()))?;
    writer
        .flush()
        .map_err(|e| SeoMapperError::Export(format!("flush failed: {e}")))
}

/// `dir/.name.tmp` next to the target so the rename stays on one filesystem.
fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "export".into());
    path.with_file_name(format!(".{name}.tmp"))
}
