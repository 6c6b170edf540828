//! `FlatRecord` - the 13-column output row.

use std::sync::LazyLock;

use regex::Regex;

use super::types::{DetailEntry, FileEntry, IndexEntry};

/// Column names, in output order.
pub const FIELD_NAMES: [&str; 13] = [
    "site_id",
    "corner_id",
    "headline_id",
    "file_id",
    "open_time",
    "close_time",
    "onair_date",
    "program_name",
    "corner_name",
    "headline",
    "headline_sub",
    "file_title",
    "file_name",
];

/// Matches runs of characters that would break the tab-separated layout.
#[allow(clippy::expect_used)]
static CONTROL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\t\r\n]+").expect("failed to compile control char regex"));

/// Removes every tab, CR and LF from `value`.
fn sanitize(value: Option<&str>) -> String {
    value.map_or_else(String::new, |v| CONTROL_RE.replace_all(v, "").into_owned())
}

/// One denormalized (entry, detail, file) row.
///
/// Columns are already sanitized; an absent object or `null` attribute
/// yields an empty column, never a missing one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatRecord {
    columns: [String; 13],
}

impl FlatRecord {
    /// Builds a record from the three levels, any of which may be absent.
    #[must_use]
    pub fn new(
        entry: Option<&IndexEntry>,
        detail: Option<&DetailEntry>,
        file: Option<&FileEntry>,
    ) -> Self {
        Self {
            columns: [
                sanitize(entry.and_then(|x| x.site_id.as_deref())),
                sanitize(entry.and_then(|x| x.corner_id.as_deref())),
                sanitize(detail.and_then(|x| x.headline_id.as_deref())),
                sanitize(file.and_then(|x| x.file_id.as_deref())),
                sanitize(entry.and_then(|x| x.open_time.as_deref())),
                sanitize(entry.and_then(|x| x.close_time.as_deref())),
                sanitize(entry.and_then(|x| x.onair_date.as_deref())),
                sanitize(entry.and_then(|x| x.program_name.as_deref())),
                sanitize(entry.and_then(|x| x.corner_name.as_deref())),
                sanitize(detail.and_then(|x| x.headline.as_deref())),
                sanitize(detail.and_then(|x| x.headline_sub.as_deref())),
                sanitize(file.and_then(|x| x.file_title.as_deref())),
                sanitize(file.and_then(|x| x.file_name.as_deref())),
            ],
        }
    }

    /// Returns the 13 columns in output order.
    #[cfg(test)]
    #[must_use]
    pub(crate) fn fields(&self) -> [&str; 13] {
        self.columns.each_ref().map(String::as_str)
    }

    /// Returns the column named `name` (see [`FIELD_NAMES`]).
    #[cfg(test)]
    #[must_use]
    pub(crate) fn get(&self, name: &str) -> Option<&str> {
        FIELD_NAMES
            .iter()
            .zip(&self.columns)
            .find_map(|(n, v)| (*n == name).then_some(v.as_str()))
    }
}

/// Formats one record as a tab-separated line terminated by `\n`.
#[must_use]
pub fn format_record(record: &FlatRecord) -> String {
    let mut line = record.columns.join("\t");
    line.push('\n');
    line
}
