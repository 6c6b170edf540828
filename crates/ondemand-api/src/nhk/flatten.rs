//! Index/detail traversal producing flat records.
#![allow(clippy::future_not_send)]

use anyhow::{Context, Result};
use tracing::instrument;
use url::Url;

use crate::error::OnDemandError;

use super::api::LocalOnDemandApi;
use super::filter::{SiteCorner, select_entries};
use super::record::FlatRecord;
use super::types::{DetailEntry, FileEntry, IndexEntry};

/// Emits records in summary mode (`filter` is `None`) or detail mode.
///
/// Returns the number of records handed to `emit`.
///
/// # Errors
///
/// Returns an error if any fetch fails or `emit` fails. Records emitted
/// before the failure are not retracted.
pub async fn flatten<F>(
    api: &(impl LocalOnDemandApi + Sync),
    filter: Option<&SiteCorner>,
    emit: F,
) -> Result<usize>
where
    F: FnMut(&FlatRecord) -> Result<()>,
{
    match filter {
        Some(key) => flatten_details(api, key, emit).await,
        None => flatten_summary(api, emit).await,
    }
}

/// Emits one record per index entry with detail and file columns empty.
///
/// # Errors
///
/// Returns an error if the index fetch fails or `emit` fails.
#[instrument(skip_all)]
pub async fn flatten_summary<F>(api: &(impl LocalOnDemandApi + Sync), mut emit: F) -> Result<usize>
where
    F: FnMut(&FlatRecord) -> Result<()>,
{
    let entries = api.list_index().await.context("failed to fetch index")?;
    tracing::info!(entries = entries.len(), "summary mode");

    for entry in &entries {
        emit(&FlatRecord::new(Some(entry), None, None))?;
    }
    Ok(entries.len())
}

/// Emits one record per (entry, detail, file) for entries matching `filter`.
///
/// Details are fetched one matched entry at a time. A detail with an
/// empty `file_list` contributes nothing.
///
/// # Errors
///
/// Returns an error if any fetch fails, a matched entry has no usable
/// `detail_json`, a detail has no `file_list`, or `emit` fails. The first
/// failure aborts the run.
#[instrument(skip_all, fields(filter = %filter))]
pub async fn flatten_details<F>(
    api: &(impl LocalOnDemandApi + Sync),
    filter: &SiteCorner,
    mut emit: F,
) -> Result<usize>
where
    F: FnMut(&FlatRecord) -> Result<()>,
{
    let entries = api.list_index().await.context("failed to fetch index")?;
    let selected = select_entries(&entries, filter);
    tracing::info!(
        entries = entries.len(),
        selected = selected.len(),
        "detail mode"
    );
    if selected.is_empty() {
        tracing::warn!("no program matches {filter}");
    }

    let mut emitted: usize = 0;
    for entry in selected {
        let detail_url = detail_url(entry, filter)?;
        let details = api
            .list_details(&detail_url)
            .await
            .with_context(|| format!("failed to fetch details for {filter}"))?;
        tracing::debug!(url = %detail_url, details = details.len(), "detail list");

        for detail in &details {
            for file in detail_files(detail, filter)? {
                emit(&FlatRecord::new(Some(entry), Some(detail), Some(file)))?;
                emitted = emitted.saturating_add(1);
            }
        }
    }
    Ok(emitted)
}

/// Resolves the `detail_json` URL of a matched entry.
fn detail_url(entry: &IndexEntry, filter: &SiteCorner) -> Result<Url> {
    let raw = entry.detail_json.as_deref().ok_or_else(|| {
        OnDemandError::unexpected(format!("program {filter} has no detail_json"))
    })?;
    let url = Url::parse(raw).map_err(|e| {
        OnDemandError::unexpected(format!("program {filter} has invalid detail_json {raw:?}: {e}"))
    })?;
    Ok(url)
}

/// Returns the files of a detail; an absent or `null` list is an error.
fn detail_files<'a>(detail: &'a DetailEntry, filter: &SiteCorner) -> Result<&'a [FileEntry]> {
    let files = detail.file_list.as_deref().ok_or_else(|| {
        let headline_id = detail.headline_id.as_deref().unwrap_or("(none)");
        OnDemandError::unexpected(format!(
            "detail {headline_id} of {filter} has no file_list"
        ))
    })?;
    Ok(files)
}
