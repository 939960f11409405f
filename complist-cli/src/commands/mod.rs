//! CLI command implementations.

pub mod categories;
pub mod config;
pub mod export;
pub mod inspect;
