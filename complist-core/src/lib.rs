// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # complist Core
//!
//! Core types and models shared by every `complist` crate.
//!
//! ## Key Types
//!
//! ### Catalog Types
//! - [`Category`] - The four component kinds that can be exported
//! - [`ComponentRecord`] - The normalized four-column output row
//! - [`RecordId`] - Upstream identifier, kept exactly as supplied
//! - [`Timestamp`] - Parsed point in time or verbatim upstream text
//!
//! ### Filtering
//! - [`DateRange`] - Inclusive client-side filter over `updated_at`

pub mod error;
pub mod filter;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export the filter
pub use filter::DateRange;

// Re-export all model types
pub use models::{Category, ComponentRecord, RecordId, Timestamp};
