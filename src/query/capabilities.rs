use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::builder::Query;
use super::criterion::CriterionKind;
use super::field::SearchableField;
use crate::error::{QueryError, Result};

/// What a source can do with one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapabilityEntry {
    pub field: SearchableField,
    pub kinds: BTreeSet<CriterionKind>,
    /// Include/Exclude may carry more than one value
    pub multi_value: bool,
    /// `false` makes the field exclusive: no other criterion may accompany it
    pub other_criteria_allowed: bool,
}

impl CapabilityEntry {
    /// Single-valued, combinable entry for `kinds`.
    pub fn new(field: SearchableField, kinds: impl IntoIterator<Item = CriterionKind>) -> Self {
        Self {
            field,
            kinds: kinds.into_iter().collect(),
            multi_value: false,
            other_criteria_allowed: true,
        }
    }

    pub fn multi_value(mut self) -> Self {
        self.multi_value = true;
        self
    }

    /// Mark the field as exclusive.
    pub fn strict(mut self) -> Self {
        self.other_criteria_allowed = false;
        self
    }

    pub fn supports(&self, kind: CriterionKind) -> bool {
        self.kinds.contains(&kind)
    }
}

/// Per-source declaration of supported `(field, kinds, multiplicity)` entries.
///
/// Declared once when the source is constructed and read-only afterwards.
/// One entry per field; declaring a field twice replaces the earlier entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCapabilities {
    entries: BTreeMap<SearchableField, CapabilityEntry>,
}

impl SearchCapabilities {
    pub fn new(entries: impl IntoIterator<Item = CapabilityEntry>) -> Self {
        entries.into_iter().fold(Self::default(), Self::with)
    }

    pub fn with(mut self, entry: CapabilityEntry) -> Self {
        self.entries.insert(entry.field, entry);
        self
    }

    pub fn entries(&self) -> impl Iterator<Item = &CapabilityEntry> {
        self.entries.values()
    }

    pub fn entry(&self, field: SearchableField) -> Option<&CapabilityEntry> {
        self.entries.get(&field)
    }

    pub fn supports(&self, field: SearchableField, kind: CriterionKind) -> bool {
        self.entry(field).is_some_and(|entry| entry.supports(kind))
    }

    /// Fields that must appear alone in a query.
    pub fn strict_fields(&self) -> BTreeSet<SearchableField> {
        self.entries
            .values()
            .filter(|entry| !entry.other_criteria_allowed)
            .map(|entry| entry.field)
            .collect()
    }

    /// Check `query` against this declaration.
    ///
    /// Has no side effects; the same inputs always give the same answer.
    pub fn validate(&self, query: &Query) -> Result<()> {
        if query.len() > 1 {
            let strict = self.strict_fields();
            if let Some(field) = query.criteria().map(|c| c.field()).find(|f| strict.contains(f)) {
                return Err(QueryError::CombinationNotAllowed(field));
            }
        }

        for criterion in query.criteria() {
            let field = criterion.field();
            let kind = criterion.kind();
            let entry = self
                .entry(field)
                .ok_or(QueryError::UnsupportedField(field))?;
            if !entry.supports(kind) {
                return Err(QueryError::UnsupportedKind { field, kind });
            }
            if !entry.multi_value && kind.is_multi_valued() && criterion.value_count() > 1 {
                return Err(QueryError::MultipleValuesNotAllowed(field));
            }
        }
        Ok(())
    }

    /// Flat flag view for consumers that still read the legacy capability struct.
    pub fn to_filter_capabilities(&self) -> FilterCapabilities {
        use CriterionKind::{Exclude, Include, Match, Range};
        use SearchableField as F;

        let is_search_supported = self.supports(F::TitleName, Match);
        FilterCapabilities {
            is_tags_supported: self.supports(F::Tag, Include),
            is_multiple_tags_supported: self.entry(F::Tag).is_some_and(|e| e.multi_value),
            is_tags_exclusion_supported: self.supports(F::Tag, Exclude),
            is_search_supported,
            is_search_with_filters_supported: is_search_supported
                && self
                    .entry(F::TitleName)
                    .is_some_and(|e| e.other_criteria_allowed),
            is_year_supported: self.supports(F::PublicationYear, Match),
            is_year_range_supported: self.supports(F::PublicationYear, Range),
            is_locale_supported: self.supports(F::Language, Include),
            is_original_locale_supported: self.supports(F::OriginalLanguage, Include),
            is_author_search_supported: self.supports(F::Author, Match),
            is_states_supported: self.supports(F::State, Include),
            is_content_rating_supported: self.supports(F::ContentRating, Include),
            is_content_types_supported: self.supports(F::ContentType, Include),
            is_demographics_supported: self.supports(F::Demographic, Include),
        }
    }
}

/// Legacy flat capability flags.
///
/// Only a compatibility view over [`SearchCapabilities`]: convert with
/// [`SearchCapabilities::to_filter_capabilities`] and `SearchCapabilities::from`,
/// never keep both on a source.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCapabilities {
    pub is_tags_supported: bool,
    pub is_multiple_tags_supported: bool,
    pub is_tags_exclusion_supported: bool,
    pub is_search_supported: bool,
    pub is_search_with_filters_supported: bool,
    pub is_year_supported: bool,
    pub is_year_range_supported: bool,
    pub is_locale_supported: bool,
    pub is_original_locale_supported: bool,
    pub is_author_search_supported: bool,
    pub is_states_supported: bool,
    pub is_content_rating_supported: bool,
    pub is_content_types_supported: bool,
    pub is_demographics_supported: bool,
}

impl From<FilterCapabilities> for SearchCapabilities {
    fn from(flags: FilterCapabilities) -> Self {
        use CriterionKind::{Exclude, Include, Match, Range};
        use SearchableField as F;

        let mut caps = SearchCapabilities::default();

        let mut tag_kinds = Vec::new();
        if flags.is_tags_supported {
            tag_kinds.push(Include);
        }
        if flags.is_tags_exclusion_supported {
            tag_kinds.push(Exclude);
        }
        if !tag_kinds.is_empty() {
            let mut entry = CapabilityEntry::new(F::Tag, tag_kinds);
            entry.multi_value = flags.is_multiple_tags_supported;
            caps = caps.with(entry);
        }

        if flags.is_search_supported {
            let mut entry = CapabilityEntry::new(F::TitleName, [Match]);
            entry.other_criteria_allowed = flags.is_search_with_filters_supported;
            caps = caps.with(entry);
        }

        let mut year_kinds = Vec::new();
        if flags.is_year_supported {
            year_kinds.push(Match);
        }
        if flags.is_year_range_supported {
            year_kinds.push(Range);
        }
        if !year_kinds.is_empty() {
            caps = caps.with(CapabilityEntry::new(F::PublicationYear, year_kinds));
        }

        if flags.is_locale_supported {
            caps = caps.with(CapabilityEntry::new(F::Language, [Include]));
        }
        if flags.is_original_locale_supported {
            caps = caps.with(CapabilityEntry::new(F::OriginalLanguage, [Include]));
        }
        if flags.is_author_search_supported {
            caps = caps.with(CapabilityEntry::new(F::Author, [Match]));
        }

        let multi_sets = [
            (flags.is_states_supported, F::State),
            (flags.is_content_rating_supported, F::ContentRating),
            (flags.is_content_types_supported, F::ContentType),
            (flags.is_demographics_supported, F::Demographic),
        ];
        for (supported, field) in multi_sets {
            if supported {
                caps = caps.with(CapabilityEntry::new(field, [Include]).multi_value());
            }
        }

        caps
    }
}
