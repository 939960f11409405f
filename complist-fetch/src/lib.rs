// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # complist Fetch
//!
//! HTTP plumbing and the per-category fetch pipeline.
//!
//! - [`client::HttpClient`] - Authenticated JSON requests against the platform
//! - [`context::FetchContext`] - Immutable run configuration handed to fetchers
//! - [`fetcher::CategoryFetcher`] - Trait implemented once per category
//! - [`pipeline::FetchPipeline`] - Runs fetchers in category order, isolating failures
//! - [`envelope`] - Unwraps list responses
//! - [`company`] - Company id discovery
//!
//! ## Example
//!
//! ```ignore
//! use complist_fetch::{FetchContext, FetchPipeline};
//!
//! let ctx = FetchContext::builder()
//!     .base_url("https://gateway.example.com")
//!     .token(token)
//!     .build()?;
//!
//! let mut pipeline = FetchPipeline::new();
//! pipeline.add(Box::new(SingleFormFetcher::new()), spec);
//! let outcomes = pipeline.execute(&ctx).await;
//! ```

pub mod client;
pub mod company;
pub mod context;
pub mod envelope;
pub mod error;
pub mod fetcher;
pub mod pipeline;

// Re-export key types at crate root
pub use client::{HttpClient, HttpMethod, Params};
pub use company::{extract_company_id, resolve_company_id};
pub use context::{CategorySpec, Endpoint, FetchContext, FetchContextBuilder, FetchSettings};
pub use envelope::extract_items;
pub use error::{CategoryFetchError, FetchError};
pub use fetcher::{listing_params, CategoryFetcher};
pub use pipeline::{CategoryOutcome, FetchPipeline, NoProgress, ProgressObserver, RunStage};
