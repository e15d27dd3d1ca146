use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::models::{ContentRating, ContentType, Demographic, Locale, MangaState, MangaTag};

/// Year slot value meaning "not set".
pub const YEAR_UNKNOWN: i32 = 0;

/// Flat, one-slot-per-dimension search parameters used by legacy sources.
///
/// It cannot express more than one locale, an author, or two alternatives
/// for the same slot. Convert from and to [`Query`](super::Query) with
/// [`to_query`](super::to_query) and [`to_filter`](super::to_filter).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyFilter {
    pub query: Option<String>,
    pub tags: BTreeSet<MangaTag>,
    pub tags_exclude: BTreeSet<MangaTag>,
    pub locale: Option<Locale>,
    pub original_locale: Option<Locale>,
    pub states: BTreeSet<MangaState>,
    pub content_rating: BTreeSet<ContentRating>,
    pub types: BTreeSet<ContentType>,
    pub demographics: BTreeSet<Demographic>,
    pub year: i32,
    pub year_from: i32,
    pub year_to: i32,
}

impl LegacyFilter {
    /// Search text, if present and not blank.
    pub fn query_text(&self) -> Option<&str> {
        self.query.as_deref().filter(|q| !q.trim().is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.query_text().is_none() && !self.has_non_search_options()
    }

    /// True when any slot other than the search text is set.
    pub fn has_non_search_options(&self) -> bool {
        !self.tags.is_empty()
            || !self.tags_exclude.is_empty()
            || self.locale.is_some()
            || self.original_locale.is_some()
            || !self.states.is_empty()
            || !self.content_rating.is_empty()
            || !self.types.is_empty()
            || !self.demographics.is_empty()
            || self.year != YEAR_UNKNOWN
            || self.year_from != YEAR_UNKNOWN
            || self.year_to != YEAR_UNKNOWN
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_query_counts_as_empty() {
        let filter = LegacyFilter {
            query: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(filter.is_empty());
        assert_eq!(filter.query_text(), None);
    }

    #[test]
    fn test_non_search_options() {
        let search_only = LegacyFilter {
            query: Some("one piece".to_string()),
            ..Default::default()
        };
        assert!(!search_only.is_empty());
        assert!(!search_only.has_non_search_options());

        let with_year = LegacyFilter {
            year: 2004,
            ..search_only
        };
        assert!(with_year.has_non_search_options());
    }

    #[test]
    fn test_deserialize_partial() {
        let filter: LegacyFilter =
            serde_json::from_str(r#"{"states":["ONGOING"],"locale":"en_US"}"#).unwrap();
        assert_eq!(filter.states, BTreeSet::from([MangaState::Ongoing]));
        assert_eq!(filter.locale.unwrap().as_str(), "en-us");
        assert_eq!(filter.year, YEAR_UNKNOWN);
    }
}
