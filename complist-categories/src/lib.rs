// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # complist Categories
//!
//! Fetchers for the four component categories.
//!
//! Each category module knows its endpoint shape and pagination:
//!
//! | Category | Requests | Pagination |
//! |----------|----------|------------|
//! | Single-form | one | none, truncated to the limit |
//! | Multi-form | one per page | fixed page size until a short page or the limit |
//! | Data-manager | table-group lookup, then one per table group | none per table group |
//! | Automations | one | none, truncated to the limit |
//!
//! Responses from every category go through the same [`parser`], which maps
//! whatever field names the platform uses onto
//! [`ComponentRecord`](complist_core::ComponentRecord).
//!
//! ## Usage
//!
//! ```ignore
//! use complist_categories::CategoryRegistry;
//! use complist_core::Category;
//!
//! let pipeline = CategoryRegistry::build_pipeline(specs);
//! let outcomes = pipeline.execute(&ctx).await;
//! ```

pub mod listing;
pub mod parser;
pub mod registry;

// Category modules (processing order)
pub mod single_form;
pub mod multi_form;
pub mod data_manager;
pub mod automations;

// Re-export key types
pub use parser::{parse_records, RawRecord};
pub use registry::{CategoryDescriptor, CategoryRegistry};

pub use automations::AutomationsFetcher;
pub use data_manager::{DataManagerFetcher, TableGroup};
pub use multi_form::MultiFormFetcher;
pub use single_form::SingleFormFetcher;
