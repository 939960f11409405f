// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # complist Export
//!
//! Turns fetched categories into a zip archive of CSV files.
//!
//! This crate provides:
//!
//! - **CSV codec**: `id,name,created_at,updated_at` files, one per category
//! - **Archive**: zip assembly, decoding, and saving to disk
//! - **Report**: per-category counts and failures
//! - **Exporter**: the run orchestrator tying fetch, filter, and export together
//!
//! ## Usage
//!
//! ```ignore
//! use complist_export::Exporter;
//!
//! let exporter = Exporter::new(pipeline);
//! let bundle = exporter.run(&ctx).await?;
//! bundle.save(Path::new("component_lists.zip")).await?;
//!
//! for summary in &bundle.report.categories {
//!     println!("{}: {}", summary.category, summary.exported);
//! }
//! ```

pub mod archive;
pub mod csv_codec;
pub mod error;
pub mod exporter;
pub mod report;

pub use archive::{
    build_archive, load_archive, read_archive, save_archive, ArchiveFile, DEFAULT_ARCHIVE_NAME,
};
pub use csv_codec::{read_csv, write_csv, CsvRow};
pub use error::ExportError;
pub use exporter::{ExportBundle, Exporter};
pub use report::{CategorySummary, ExportReport, FailureKind};
