//! Data-manager category.
//!
//! Data-manager records live inside table groups, so fetching is two-step:
//! a lookup lists the company's table groups, then each table group is
//! fetched on its own. A failed lookup and a failed table group are reported
//! as different errors.

mod fetcher;
pub(crate) mod parser;

pub use fetcher::DataManagerFetcher;
pub use parser::{parse_table_groups, TableGroup};
