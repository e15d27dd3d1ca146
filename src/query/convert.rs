//! Conversion between [`LegacyFilter`] and [`Query`].
//!
//! `to_filter(&to_query(offset, order, &f))` gives back `f` for every filter
//! built from representable slots: a non-blank search text, both or neither
//! year bounds set. The other direction is not an identity: a query
//! can say things the flat filter has no slot for, and `to_filter` rejects
//! those instead of dropping them.

use std::collections::BTreeSet;

use super::builder::Query;
use super::criterion::QueryCriterion;
use super::field::SearchableField;
use super::filter::{LegacyFilter, YEAR_UNKNOWN};
use super::value::QueryValue;
use crate::error::{QueryError, Result};
use crate::models::{Locale, SortOrder};

/// Build the criteria equivalent of a legacy filter. Never fails.
pub fn to_query(offset: usize, order: Option<SortOrder>, filter: &LegacyFilter) -> Query {
    use QueryCriterion as C;
    use SearchableField as F;

    let mut criteria = Vec::new();

    if let Some(text) = filter.query_text() {
        criteria.push(QueryCriterion::from_typed_value(
            F::TitleName,
            QueryValue::Text(text.to_string()),
        ));
    }

    push_set(&mut criteria, F::Tag, C::from_typed_include, &filter.tags);
    push_set(&mut criteria, F::Tag, C::from_typed_exclude, &filter.tags_exclude);
    push_set(&mut criteria, F::Language, C::from_typed_include, filter.locale.as_slice());
    push_set(
        &mut criteria,
        F::OriginalLanguage,
        C::from_typed_include,
        filter.original_locale.as_slice(),
    );
    push_set(&mut criteria, F::State, C::from_typed_include, &filter.states);
    push_set(&mut criteria, F::ContentRating, C::from_typed_include, &filter.content_rating);
    push_set(&mut criteria, F::ContentType, C::from_typed_include, &filter.types);
    push_set(&mut criteria, F::Demographic, C::from_typed_include, &filter.demographics);

    if filter.year_from != YEAR_UNKNOWN && filter.year_to != YEAR_UNKNOWN {
        criteria.push(QueryCriterion::from_typed_range(
            F::PublicationYear,
            QueryValue::Year(filter.year_from),
            QueryValue::Year(filter.year_to),
        ));
    }
    if filter.year != YEAR_UNKNOWN {
        criteria.push(QueryCriterion::from_typed_value(
            F::PublicationYear,
            QueryValue::Year(filter.year),
        ));
    }

    Query::from_unique(criteria, order, offset)
}

/// Route every criterion of `query` into its legacy filter slot.
///
/// Fails on fields the filter has no slot for (`AUTHOR`), on kinds a slot
/// cannot hold (e.g. `Exclude(STATE)`), on more than one value for a
/// single-value slot (the locales), and on year 0, which the filter reads as unset.
pub fn to_filter(query: &Query) -> Result<LegacyFilter> {
    use SearchableField as F;

    let mut filter = LegacyFilter::default();

    for criterion in query.criteria() {
        let field = criterion.field();
        match (field, criterion) {
            (F::TitleName, QueryCriterion::Match(single)) => {
                filter.query = single.value().as_text().map(str::to_string);
            }
            (F::Tag, QueryCriterion::Include(set)) => {
                filter
                    .tags
                    .extend(set.values().iter().filter_map(QueryValue::as_tag).cloned());
            }
            (F::Tag, QueryCriterion::Exclude(set)) => {
                filter.tags_exclude = set
                    .values()
                    .iter()
                    .filter_map(QueryValue::as_tag)
                    .cloned()
                    .collect();
            }
            (F::Language, QueryCriterion::Include(set)) => {
                filter.locale = single_locale(field, set.values())?;
            }
            (F::OriginalLanguage, QueryCriterion::Include(set)) => {
                filter.original_locale = single_locale(field, set.values())?;
            }
            (F::State, QueryCriterion::Include(set)) => {
                filter.states = set.values().iter().filter_map(QueryValue::as_state).collect();
            }
            (F::ContentRating, QueryCriterion::Include(set)) => {
                filter.content_rating = set
                    .values()
                    .iter()
                    .filter_map(QueryValue::as_content_rating)
                    .collect();
            }
            (F::ContentType, QueryCriterion::Include(set)) => {
                filter.types = set
                    .values()
                    .iter()
                    .filter_map(QueryValue::as_content_type)
                    .collect();
            }
            (F::Demographic, QueryCriterion::Include(set)) => {
                filter.demographics = set
                    .values()
                    .iter()
                    .filter_map(QueryValue::as_demographic)
                    .collect();
            }
            (F::PublicationYear, QueryCriterion::Match(single)) => {
                filter.year = legacy_year(field, single.value())?;
            }
            (F::PublicationYear, QueryCriterion::Range(range)) => {
                filter.year_from = legacy_year(field, range.lower())?;
                filter.year_to = legacy_year(field, range.upper())?;
            }
            (F::Author, _) => return Err(QueryError::UnsupportedConversion(field)),
            (field, criterion) => {
                return Err(QueryError::UnsupportedConversionKind {
                    field,
                    kind: criterion.kind(),
                })
            }
        }
    }

    Ok(filter)
}

fn push_set<'a, T>(
    criteria: &mut Vec<QueryCriterion>,
    field: SearchableField,
    make: fn(SearchableField, BTreeSet<QueryValue>) -> QueryCriterion,
    values: impl IntoIterator<Item = &'a T>,
) where
    T: Clone + Into<QueryValue> + 'a,
{
    let values: BTreeSet<QueryValue> = values.into_iter().cloned().map(Into::into).collect();
    if !values.is_empty() {
        criteria.push(make(field, values));
    }
}

/// Year for a legacy slot, where `YEAR_UNKNOWN` already means "no year".
fn legacy_year(field: SearchableField, value: &QueryValue) -> Result<i32> {
    match value.as_year() {
        Some(year) if year != YEAR_UNKNOWN => Ok(year),
        Some(year) => Err(QueryError::YearNotRepresentable { field, year }),
        None => Err(QueryError::TypeMismatch {
            field,
            expected: field.value_type(),
            found: value.value_type(),
        }),
    }
}

fn single_locale(field: SearchableField, values: &BTreeSet<QueryValue>) -> Result<Option<Locale>> {
    if values.len() > 1 {
        return Err(QueryError::SingleValueSlot(field));
    }
    Ok(values.iter().find_map(QueryValue::as_locale).cloned())
}
