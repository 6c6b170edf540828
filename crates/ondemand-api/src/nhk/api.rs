//! `OnDemandApi` trait definition.
#![allow(clippy::future_not_send)]

use anyhow::Result;
use url::Url;

use super::types::{DetailEntry, IndexEntry};

/// NHK radio on-demand API trait.
///
/// Abstracts the two remote reads for mock substitution in tests.
/// Uses `trait_variant::make` to generate a `Send`-bound async trait.
#[allow(clippy::module_name_repetitions)]
#[trait_variant::make(OnDemandApi: Send)]
pub trait LocalOnDemandApi {
    /// Fetches the index and returns its `data_list`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails, or the
    /// response has no `data_list`.
    async fn list_index(&self) -> Result<Vec<IndexEntry>>;

    /// Fetches one program's detail document and returns `main.detail_list`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP request or JSON parsing fails, or the
    /// response has no `main.detail_list`.
    async fn list_details(&self, detail_url: &Url) -> Result<Vec<DetailEntry>>;
}
