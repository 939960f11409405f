//! Domain models for complist.
//!
//! ## Submodules
//!
//! - [`category`] - The exported component kinds
//! - [`record`] - Normalized records and their identifiers
//! - [`timestamp`] - Upstream timestamp interpretation

mod category;
mod record;
mod timestamp;

// Re-export everything at the models level
pub use category::Category;
pub use record::{ComponentRecord, RecordId};
pub use timestamp::Timestamp;
