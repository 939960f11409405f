//! Zip archive assembly.
//!
//! The archive holds one deflated CSV entry per non-empty category, named by
//! [`Category::file_name`] and ordered by category.

use std::io::{Cursor, Read, Write};
use std::path::Path;

use complist_core::{Category, ComponentRecord};
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::csv_codec::{read_csv, write_csv, CsvRow};
use crate::error::ExportError;

/// Default archive file name.
pub const DEFAULT_ARCHIVE_NAME: &str = "component_lists.zip";

/// One decoded archive entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveFile {
    /// Entry name.
    pub name: String,
    /// Decoded rows.
    pub rows: Vec<CsvRow>,
}

/// Builds the archive. Categories without records get no entry.
///
/// Entries are written in category order whatever the input order.
///
/// # Errors
///
/// Returns an error if CSV encoding or zip assembly fails.
pub fn build_archive<'a, I>(entries: I) -> Result<Vec<u8>, ExportError>
where
    I: IntoIterator<Item = (Category, &'a [ComponentRecord])>,
{
    let mut ordered: Vec<(Category, &[ComponentRecord])> = entries
        .into_iter()
        .filter(|(_, records)| !records.is_empty())
        .collect();
    ordered.sort_by_key(|(category, _)| *category);

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));

    for (category, records) in ordered {
        let name = category.file_name();
        let csv = write_csv(records)?;
        debug!(entry = %name, rows = records.len(), "Adding archive entry");
        zip.start_file(name, options)?;
        zip.write_all(&csv)?;
    }

    let bytes = zip.finish()?.into_inner();
    debug!(bytes = bytes.len(), "Archive assembled");
    Ok(bytes)
}

/// Decodes every entry of an archive, in stored order.
///
/// # Errors
///
/// Returns an error if the archive or one of its CSV files is malformed.
pub fn read_archive(bytes: &[u8]) -> Result<Vec<ArchiveFile>, ExportError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;
    let mut files = Vec::with_capacity(archive.len());

    for index in 0..archive.len() {
        let mut entry = archive.by_index(index)?;
        let name = entry.name().to_string();
        let mut content = Vec::new();
        entry.read_to_end(&mut content)?;
        files.push(ArchiveFile {
            name,
            rows: read_csv(&content)?,
        });
    }

    Ok(files)
}

/// Writes archive bytes to `path`, creating parent directories.
///
/// The file is written next to its destination first and renamed into
/// place.
///
/// # Errors
///
/// Returns [`ExportError::Io`] on filesystem failures.
pub async fn save_archive(path: &Path, bytes: &[u8]) -> Result<(), ExportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let temp_path = path.with_extension("zip.tmp");
    tokio::fs::write(&temp_path, bytes).await?;
    tokio::fs::rename(&temp_path, path).await?;

    info!(path = %path.display(), bytes = bytes.len(), "Archive saved");
    Ok(())
}

/// Reads and decodes an archive file.
///
/// # Errors
///
/// Returns [`ExportError::Io`] if the file cannot be read, or any error from
/// [`read_archive`].
pub async fn load_archive(path: &Path) -> Result<Vec<ArchiveFile>, ExportError> {
    let bytes = tokio::fs::read(path).await?;
    read_archive(&bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn records(n: i64) -> Vec<ComponentRecord> {
        (0..n).map(|i| ComponentRecord::new(i, format!("c{i}"))).collect()
    }

    #[test]
    fn test_omits_empty_categories() {
        let single = records(2);
        let none = Vec::new();
        let automations = records(1);
        let bytes = build_archive([
            (Category::SingleForm, single.as_slice()),
            (Category::MultiForm, none.as_slice()),
            (Category::Automations, automations.as_slice()),
        ])
        .unwrap();

        let files = read_archive(&bytes).unwrap();
        let names: Vec<&str> = files.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["single_form.csv", "automations.csv"]);
        assert_eq!(files[0].rows.len(), 2);
        assert_eq!(files[1].rows.len(), 1);
    }

    #[test]
    fn test_entries_in_category_order() {
        let a = records(1);
        let bytes = build_archive([
            (Category::Automations, a.as_slice()),
            (Category::DataManager, a.as_slice()),
            (Category::SingleForm, a.as_slice()),
        ])
        .unwrap();

        let names: Vec<String> = read_archive(&bytes).unwrap().into_iter().map(|f| f.name).collect();
        assert_eq!(names, vec!["single_form.csv", "data_manager.csv", "automations.csv"]);
    }

    #[test]
    fn test_all_empty_is_valid_archive() {
        let none: Vec<ComponentRecord> = Vec::new();
        let bytes = build_archive([(Category::SingleForm, none.as_slice())]).unwrap();
        assert!(read_archive(&bytes).unwrap().is_empty());
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(read_archive(b"not a zip"), Err(ExportError::Zip(_))));
    }

    #[tokio::test]
    async fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out").join(DEFAULT_ARCHIVE_NAME);
        let single = records(3);

        let bytes = build_archive([(Category::SingleForm, single.as_slice())]).unwrap();
        save_archive(&path, &bytes).await.unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("zip.tmp").exists());
        let files = load_archive(&path).await.unwrap();
        assert_eq!(files[0].rows[2].name, "c2");
    }
}
