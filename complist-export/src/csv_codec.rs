//! CSV encoding of component records.
//!
//! Every file has the header `id,name,created_at,updated_at` followed by one
//! row per record, in input order. Quoting follows the `csv` crate defaults.

use complist_core::ComponentRecord;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ExportError;

/// One CSV row as text, the shape a file reads back as.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CsvRow {
    /// Identifier column.
    pub id: String,
    /// Name column.
    pub name: String,
    /// Creation time column.
    pub created_at: String,
    /// Last update column.
    pub updated_at: String,
}

impl From<&ComponentRecord> for CsvRow {
    fn from(record: &ComponentRecord) -> Self {
        let [id, name, created_at, updated_at] = record.to_fields();
        Self {
            id,
            name,
            created_at,
            updated_at,
        }
    }
}

/// Encodes records as CSV.
///
/// # Errors
///
/// Returns [`ExportError::Csv`] or [`ExportError::Io`] if encoding fails.
pub fn write_csv(records: &[ComponentRecord]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(ComponentRecord::COLUMNS)?;
    for record in records {
        writer.write_record(record.to_fields())?;
    }

    let bytes = writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))?;
    debug!(rows = records.len(), bytes = bytes.len(), "Encoded CSV");
    Ok(bytes)
}

/// Decodes a CSV file written by [`write_csv`].
///
/// # Errors
///
/// Returns [`ExportError::InvalidHeader`] if the header differs from
/// [`ComponentRecord::COLUMNS`], or [`ExportError::Csv`] for malformed rows.
pub fn read_csv(bytes: &[u8]) -> Result<Vec<CsvRow>, ExportError> {
    let mut reader = csv::Reader::from_reader(bytes);

    let headers = reader.headers()?.clone();
    if !headers.iter().eq(ComponentRecord::COLUMNS) {
        return Err(ExportError::InvalidHeader(
            headers.iter().collect::<Vec<_>>().join(","),
        ));
    }

    reader
        .deserialize::<CsvRow>()
        .map(|row| row.map_err(ExportError::from))
        .collect()
}
