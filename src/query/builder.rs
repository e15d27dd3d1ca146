use serde::Serialize;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use super::criterion::{CriterionKind, QueryCriterion};
use super::field::SearchableField;
use crate::error::{QueryError, Result};
use crate::models::SortOrder;

/// An immutable, deduplicated set of criteria plus listing order and offset.
///
/// Holds at most one criterion per `(field, kind)` pair. Built through
/// [`QueryBuilder`]; a new query is built for every search request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Query {
    #[serde(serialize_with = "serialize_criteria")]
    criteria: BTreeMap<(SearchableField, CriterionKind), QueryCriterion>,
    order: Option<SortOrder>,
    offset: usize,
}

impl Query {
    pub fn builder() -> QueryBuilder {
        QueryBuilder::new()
    }

    /// Criteria ordered by field, then kind.
    pub fn criteria(&self) -> impl Iterator<Item = &QueryCriterion> {
        self.criteria.values()
    }

    pub fn len(&self) -> usize {
        self.criteria.len()
    }

    pub fn is_empty(&self) -> bool {
        self.criteria.is_empty()
    }

    pub fn order(&self) -> Option<SortOrder> {
        self.order
    }

    /// Zero-based number of items to skip.
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn find(&self, field: SearchableField, kind: CriterionKind) -> Option<&QueryCriterion> {
        self.criteria.get(&(field, kind))
    }

    pub fn criteria_for(&self, field: SearchableField) -> impl Iterator<Item = &QueryCriterion> {
        self.criteria
            .range((field, CriterionKind::Include)..=(field, CriterionKind::Range))
            .map(|(_, criterion)| criterion)
    }

    pub fn has_field(&self, field: SearchableField) -> bool {
        self.criteria_for(field).next().is_some()
    }

    /// Text of the `Match(TITLE_NAME)` criterion, if any.
    pub fn title(&self) -> Option<&str> {
        match self.find(SearchableField::TitleName, CriterionKind::Match)? {
            QueryCriterion::Match(single) => single.value().as_text(),
            _ => None,
        }
    }

    /// Same criteria and order at another offset.
    pub fn with_offset(&self, offset: usize) -> Query {
        Query {
            offset,
            ..self.clone()
        }
    }

    /// Builder seeded with this query, for deriving a new one.
    pub fn to_builder(&self) -> QueryBuilder {
        QueryBuilder {
            criteria: self.criteria.values().cloned().collect(),
            order: self.order,
            offset: self.offset,
        }
    }
}

impl Query {
    /// Assemble from criteria with pairwise distinct `(field, kind)` keys.
    pub(super) fn from_unique(
        criteria: impl IntoIterator<Item = QueryCriterion>,
        order: Option<SortOrder>,
        offset: usize,
    ) -> Query {
        let criteria = criteria
            .into_iter()
            .map(|c| ((c.field(), c.kind()), c))
            .collect();
        Query {
            criteria,
            order,
            offset,
        }
    }
}

fn serialize_criteria<S>(
    criteria: &BTreeMap<(SearchableField, CriterionKind), QueryCriterion>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.collect_seq(criteria.values())
}

/// Accumulates criteria and produces a [`Query`].
///
/// Merging happens in [`build`](Self::build): Include/Include and Exclude/Exclude
/// on one field are united, Match/Match and Range/Range on one field conflict.
/// Capability checks are not done here.
#[derive(Debug, Clone, Default)]
pub struct QueryBuilder {
    criteria: Vec<QueryCriterion>,
    order: Option<SortOrder>,
    offset: usize,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn criterion(mut self, criterion: QueryCriterion) -> Self {
        self.criteria.push(criterion);
        self
    }

    pub fn criteria(mut self, criteria: impl IntoIterator<Item = QueryCriterion>) -> Self {
        self.criteria.extend(criteria);
        self
    }

    /// In-place variant of [`criterion`](Self::criterion) for loops.
    pub fn add(&mut self, criterion: QueryCriterion) -> &mut Self {
        self.criteria.push(criterion);
        self
    }

    pub fn order(mut self, order: SortOrder) -> Self {
        self.order = Some(order);
        self
    }

    pub fn maybe_order(mut self, order: Option<SortOrder>) -> Self {
        self.order = order;
        self
    }

    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }

    pub fn build(self) -> Result<Query> {
        let mut merged: BTreeMap<(SearchableField, CriterionKind), QueryCriterion> =
            BTreeMap::new();
        for criterion in self.criteria {
            let key = (criterion.field(), criterion.kind());
            match merged.entry(key) {
                Entry::Vacant(slot) => {
                    slot.insert(criterion);
                }
                Entry::Occupied(mut slot) => {
                    let existing = slot.get().clone();
                    slot.insert(merge(existing, criterion)?);
                }
            }
        }
        Ok(Query {
            criteria: merged,
            order: self.order,
            offset: self.offset,
        })
    }
}

fn merge(existing: QueryCriterion, incoming: QueryCriterion) -> Result<QueryCriterion> {
    match (existing, incoming) {
        (QueryCriterion::Include(a), QueryCriterion::Include(b)) => {
            Ok(QueryCriterion::Include(a.union(b)))
        }
        (QueryCriterion::Exclude(a), QueryCriterion::Exclude(b)) => {
            Ok(QueryCriterion::Exclude(a.union(b)))
        }
        (existing, _) => Err(QueryError::Conflict {
            field: existing.field(),
            kind: existing.kind(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Locale, MangaTag};
    use crate::query::QueryValue;

    fn tag(key: &str) -> MangaTag {
        MangaTag::new(key, key.to_uppercase(), "test")
    }

    #[test]
    fn test_include_merges_by_union() {
        let query = Query::builder()
            .criterion(QueryCriterion::include(SearchableField::Tag, [tag("a")]).unwrap())
            .criterion(QueryCriterion::include(SearchableField::Tag, [tag("b")]).unwrap())
            .build()
            .unwrap();

        assert_eq!(query.len(), 1);
        assert_eq!(
            query.find(SearchableField::Tag, CriterionKind::Include),
            Some(&QueryCriterion::include(SearchableField::Tag, [tag("a"), tag("b")]).unwrap())
        );
    }

    #[test]
    fn test_exclude_merges_independently_of_include() {
        let query = Query::builder()
            .criterion(QueryCriterion::include(SearchableField::Tag, [tag("a")]).unwrap())
            .criterion(QueryCriterion::exclude(SearchableField::Tag, [tag("b")]).unwrap())
            .criterion(QueryCriterion::exclude(SearchableField::Tag, [tag("c"), tag("b")]).unwrap())
            .build()
            .unwrap();

        assert_eq!(query.len(), 2);
        let excluded = query.find(SearchableField::Tag, CriterionKind::Exclude).unwrap();
        assert_eq!(excluded.value_count(), 2);
    }

    #[test]
    fn test_match_conflict() {
        let err = Query::builder()
            .criterion(QueryCriterion::matching(SearchableField::TitleName, "x").unwrap())
            .criterion(QueryCriterion::matching(SearchableField::TitleName, "y").unwrap())
            .build()
            .unwrap_err();

        assert_eq!(
            err,
            QueryError::Conflict {
                field: SearchableField::TitleName,
                kind: CriterionKind::Match,
            }
        );
        assert!(err.to_string().contains("TITLE_NAME"));
    }

    #[test]
    fn test_identical_match_still_conflicts() {
        let title = QueryCriterion::matching(SearchableField::TitleName, "x").unwrap();
        let result = Query::builder()
            .criterion(title.clone())
            .criterion(title)
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_range_conflict() {
        let err = Query::builder()
            .criterion(QueryCriterion::range(SearchableField::PublicationYear, 1990, 1999).unwrap())
            .criterion(QueryCriterion::range(SearchableField::PublicationYear, 2000, 2009).unwrap())
            .build()
            .unwrap_err();
        assert!(matches!(err, QueryError::Conflict { kind: CriterionKind::Range, .. }));
    }

    #[test]
    fn test_match_and_range_on_same_field_coexist() {
        let query = Query::builder()
            .criterion(QueryCriterion::matching(SearchableField::PublicationYear, 1995).unwrap())
            .criterion(QueryCriterion::range(SearchableField::PublicationYear, 1990, 1999).unwrap())
            .build()
            .unwrap();
        assert_eq!(query.criteria_for(SearchableField::PublicationYear).count(), 2);
        assert!(!query.has_field(SearchableField::Tag));
    }

    #[test]
    fn test_insertion_order_does_not_matter() {
        let lang = QueryCriterion::include(SearchableField::Language, [Locale::parse("en").unwrap()]).unwrap();
        let title = QueryCriterion::matching(SearchableField::TitleName, "x").unwrap();
        let a = Query::builder().criterion(lang.clone()).criterion(title.clone()).build().unwrap();
        let b = Query::builder().criterion(title).criterion(lang).build().unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_title_offset_and_order() {
        let query = Query::builder()
            .criterion(QueryCriterion::matching(SearchableField::TitleName, "monster").unwrap())
            .order(SortOrder::Relevance)
            .offset(48)
            .build()
            .unwrap();

        assert_eq!(query.title(), Some("monster"));
        assert_eq!(query.order(), Some(SortOrder::Relevance));
        assert_eq!(query.offset(), 48);

        let next = query.with_offset(72);
        assert_eq!(next.offset(), 72);
        assert_eq!(next.title(), Some("monster"));
    }

    #[test]
    fn test_to_builder_extends_query() {
        let query = Query::builder()
            .criterion(QueryCriterion::include(SearchableField::Tag, [tag("a")]).unwrap())
            .build()
            .unwrap();
        let extended = query
            .to_builder()
            .criterion(QueryCriterion::include(SearchableField::Tag, [tag("b")]).unwrap())
            .build()
            .unwrap();
        let values = extended
            .find(SearchableField::Tag, CriterionKind::Include)
            .unwrap()
            .values();
        assert_eq!(values.len(), 2);
        assert!(values.contains(&&QueryValue::Tag(tag("b"))));
    }

    #[test]
    fn test_add_in_loop() {
        let mut builder = QueryBuilder::new();
        for key in ["a", "b", "c"] {
            builder.add(QueryCriterion::include(SearchableField::Tag, [tag(key)]).unwrap());
        }
        let query = builder.build().unwrap();
        assert_eq!(query.len(), 1);
        assert_eq!(query.criteria().next().unwrap().value_count(), 3);
    }

    #[test]
    fn test_serialized_dump() {
        let query = Query::builder()
            .criterion(QueryCriterion::matching(SearchableField::TitleName, "x").unwrap())
            .offset(10)
            .build()
            .unwrap();
        let json = serde_json::to_value(&query).unwrap();
        assert_eq!(json["offset"], 10);
        assert_eq!(json["criteria"][0]["kind"], "MATCH");
        assert_eq!(json["criteria"][0]["field"], "TITLE_NAME");
    }
}
