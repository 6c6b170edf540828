//! `SiteCorner` filter key (`SITEID_CORNERID`).

use std::str::FromStr;

use crate::error::OnDemandError;

use super::types::IndexEntry;

/// Composite filter key selecting index entries by `(site_id, corner_id)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteCorner {
    /// Site ID to match exactly.
    pub site_id: String,
    /// Corner ID to match exactly.
    pub corner_id: String,
}

impl SiteCorner {
    /// Returns true when both IDs of `entry` equal this key.
    #[must_use]
    pub fn matches(&self, entry: &IndexEntry) -> bool {
        entry.site_id.as_deref() == Some(self.site_id.as_str())
            && entry.corner_id.as_deref() == Some(self.corner_id.as_str())
    }
}

impl FromStr for SiteCorner {
    type Err = OnDemandError;

    /// Splits on exactly one underscore; both halves must be non-empty.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || OnDemandError::MalformedFilter {
            value: String::from(s),
        };
        let (site_id, corner_id) = s.split_once('_').ok_or_else(malformed)?;
        if site_id.is_empty() || corner_id.is_empty() || corner_id.contains('_') {
            return Err(malformed());
        }
        Ok(Self {
            site_id: String::from(site_id),
            corner_id: String::from(corner_id),
        })
    }
}

impl std::fmt::Display for SiteCorner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}_{}", self.site_id, self.corner_id)
    }
}

/// Selects the entries matching `filter`, preserving upstream order.
///
/// The key is not unique upstream, so zero, one or many entries may match.
#[must_use]
pub fn select_entries<'a>(entries: &'a [IndexEntry], filter: &SiteCorner) -> Vec<&'a IndexEntry> {
    entries.iter().filter(|e| filter.matches(e)).collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::indexing_slicing)]

    use super::*;
    use crate::error::ErrorKind;

    fn entry(site: &str, corner: &str, name: &str) -> IndexEntry {
        IndexEntry {
            site_id: Some(String::from(site)),
            corner_id: Some(String::from(corner)),
            program_name: Some(String::from(name)),
            ..IndexEntry::default()
        }
    }

    #[test]
    fn test_parse_valid_key() {
        // Arrange & Act
        let key: SiteCorner = "2295_17".parse().unwrap();

        // Assert
        assert_eq!(key.site_id, "2295");
        assert_eq!(key.corner_id, "17");
        assert_eq!(key.to_string(), "2295_17");
    }

    #[test]
    fn test_parse_rejects_missing_underscore() {
        // Arrange & Act
        let err = "229517".parse::<SiteCorner>().unwrap_err();

        // Assert
        assert_eq!(err.kind(), ErrorKind::MalformedFilter);
        assert!(err.to_string().contains("229517"));
    }

    #[test]
    fn test_parse_rejects_two_underscores() {
        // Arrange & Act
        let err = "2295_17_x".parse::<SiteCorner>().unwrap_err();

        // Assert
        assert_eq!(err.kind(), ErrorKind::MalformedFilter);
    }

    #[test]
    fn test_parse_rejects_empty_tokens() {
        // Arrange & Act & Assert
        assert!("_17".parse::<SiteCorner>().is_err());
        assert!("2295_".parse::<SiteCorner>().is_err());
        assert!("_".parse::<SiteCorner>().is_err());
        assert!("".parse::<SiteCorner>().is_err());
    }

    #[test]
    fn test_select_is_exact_on_both_keys() {
        // Arrange
        let entries = vec![entry("2295", "17", "a"), entry("0164", "01", "b")];

        // Act
        let miss = select_entries(&entries, &"2295_18".parse().unwrap());
        let hit = select_entries(&entries, &"2295_17".parse().unwrap());

        // Assert
        assert!(miss.is_empty());
        assert_eq!(hit.len(), 1);
        assert_eq!(hit[0].program_name.as_deref(), Some("a"));
    }

    #[test]
    fn test_select_does_not_prefix_match() {
        // Arrange
        let entries = vec![entry("22950", "17", "a"), entry("2295", "170", "b")];

        // Act
        let hit = select_entries(&entries, &"2295_17".parse().unwrap());

        // Assert
        assert!(hit.is_empty());
    }

    #[test]
    fn test_select_returns_all_duplicates_in_order() {
        // Arrange
        let entries = vec![
            entry("2295", "17", "first"),
            entry("0164", "01", "other"),
            entry("2295", "17", "second"),
        ];

        // Act
        let hit = select_entries(&entries, &"2295_17".parse().unwrap());

        // Assert
        let names: Vec<_> = hit.iter().map(|e| e.program_name.as_deref()).collect();
        assert_eq!(names, [Some("first"), Some("second")]);
    }

    #[test]
    fn test_entry_without_ids_never_matches() {
        // Arrange
        let key: SiteCorner = "2295_17".parse().unwrap();

        // Act & Assert
        assert!(!key.matches(&IndexEntry::default()));
    }
}
