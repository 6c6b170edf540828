//! NHK radio on-demand module.
//!
//! Handles HTTP requests to the on-demand JSON index and the per-program
//! detail documents, and turns the nested responses into flat records.

mod api;
mod client;
mod filter;
mod flatten;
mod record;
mod types;

#[allow(clippy::module_name_repetitions)]
pub use api::{LocalOnDemandApi, OnDemandApi};
#[allow(clippy::module_name_repetitions)]
pub use client::{DEFAULT_INDEX_URL, OnDemandClient, OnDemandClientBuilder};
pub use filter::{SiteCorner, select_entries};
pub use flatten::{flatten, flatten_details, flatten_summary};
pub use record::{FIELD_NAMES, FlatRecord, format_record};
pub use types::{DetailEntry, DetailMain, DetailResponse, FileEntry, IndexEntry, IndexResponse};
