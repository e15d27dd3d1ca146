use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

use super::field::SearchableField;
use super::value::QueryValue;
use crate::error::{QueryError, Result};

/// The four shapes a criterion can take.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CriterionKind {
    Include,
    Exclude,
    Match,
    Range,
}

impl CriterionKind {
    pub const ALL: [CriterionKind; 4] = [Self::Include, Self::Exclude, Self::Match, Self::Range];

    /// Include and Exclude carry a value set, the other kinds a single value or range.
    pub fn is_multi_valued(self) -> bool {
        matches!(self, Self::Include | Self::Exclude)
    }
}

impl fmt::Display for CriterionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Include => "Include",
            Self::Exclude => "Exclude",
            Self::Match => "Match",
            Self::Range => "Range",
        };
        f.write_str(name)
    }
}

/// Non-empty set of values for one field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValueSet {
    field: SearchableField,
    values: BTreeSet<QueryValue>,
}

impl ValueSet {
    pub fn field(&self) -> SearchableField {
        self.field
    }

    pub fn values(&self) -> &BTreeSet<QueryValue> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub(crate) fn union(mut self, other: ValueSet) -> ValueSet {
        self.values.extend(other.values);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SingleValue {
    field: SearchableField,
    value: QueryValue,
}

impl SingleValue {
    pub fn field(&self) -> SearchableField {
        self.field
    }

    pub fn value(&self) -> &QueryValue {
        &self.value
    }
}

/// Inclusive `[from, to]` bounds of one type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValueRange {
    field: SearchableField,
    from: QueryValue,
    to: QueryValue,
}

impl ValueRange {
    pub fn field(&self) -> SearchableField {
        self.field
    }

    pub fn lower(&self) -> &QueryValue {
        &self.from
    }

    pub fn upper(&self) -> &QueryValue {
        &self.to
    }
}

/// A typed predicate over a single searchable field.
///
/// Values are checked against [`SearchableField::value_type`] when the criterion
/// is built, so a `QueryCriterion` in hand is always well typed. Include and
/// Exclude hold sets, which makes their equality independent of value order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawCriterion", into = "RawCriterion")]
pub enum QueryCriterion {
    /// Item must match at least one of the values.
    Include(ValueSet),
    /// Item must match none of the values.
    Exclude(ValueSet),
    /// Item must equal the value.
    Match(SingleValue),
    /// Item must lie within the bounds.
    Range(ValueRange),
}

impl QueryCriterion {
    pub fn include<I, V>(field: SearchableField, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<QueryValue>,
    {
        value_set(field, CriterionKind::Include, values).map(Self::Include)
    }

    pub fn exclude<I, V>(field: SearchableField, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<QueryValue>,
    {
        value_set(field, CriterionKind::Exclude, values).map(Self::Exclude)
    }

    pub fn matching(field: SearchableField, value: impl Into<QueryValue>) -> Result<Self> {
        let value = value.into();
        check_type(field, &value)?;
        Ok(Self::Match(SingleValue { field, value }))
    }

    pub fn range(
        field: SearchableField,
        from: impl Into<QueryValue>,
        to: impl Into<QueryValue>,
    ) -> Result<Self> {
        let (from, to) = (from.into(), to.into());
        if from.value_type() != to.value_type() {
            return Err(QueryError::RangeTypeMismatch {
                field,
                from: from.value_type(),
                to: to.value_type(),
            });
        }
        check_type(field, &from)?;
        Ok(Self::Range(ValueRange { field, from, to }))
    }

    pub fn field(&self) -> SearchableField {
        match self {
            Self::Include(set) | Self::Exclude(set) => set.field,
            Self::Match(single) => single.field,
            Self::Range(range) => range.field,
        }
    }

    pub fn kind(&self) -> CriterionKind {
        match self {
            Self::Include(_) => CriterionKind::Include,
            Self::Exclude(_) => CriterionKind::Exclude,
            Self::Match(_) => CriterionKind::Match,
            Self::Range(_) => CriterionKind::Range,
        }
    }

    /// Number of values carried; a range counts as one.
    pub fn value_count(&self) -> usize {
        match self {
            Self::Include(set) | Self::Exclude(set) => set.len(),
            Self::Match(_) | Self::Range(_) => 1,
        }
    }

    /// All carried values, range bounds in `from`, `to` order.
    pub fn values(&self) -> Vec<&QueryValue> {
        match self {
            Self::Include(set) | Self::Exclude(set) => set.values.iter().collect(),
            Self::Match(single) => vec![&single.value],
            Self::Range(range) => vec![&range.from, &range.to],
        }
    }
}

impl fmt::Display for QueryCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {} value(s))", self.kind(), self.field(), self.value_count())
    }
}

impl QueryCriterion {
    /// `Include` from values already known to be non-empty and well typed.
    pub(super) fn from_typed_include(field: SearchableField, values: BTreeSet<QueryValue>) -> Self {
        Self::Include(ValueSet::typed(field, values))
    }

    pub(super) fn from_typed_exclude(field: SearchableField, values: BTreeSet<QueryValue>) -> Self {
        Self::Exclude(ValueSet::typed(field, values))
    }

    pub(super) fn from_typed_value(field: SearchableField, value: QueryValue) -> Self {
        debug_assert_eq!(value.value_type(), field.value_type());
        Self::Match(SingleValue { field, value })
    }

    pub(super) fn from_typed_range(field: SearchableField, from: QueryValue, to: QueryValue) -> Self {
        debug_assert_eq!(from.value_type(), field.value_type());
        debug_assert_eq!(to.value_type(), field.value_type());
        Self::Range(ValueRange { field, from, to })
    }
}

impl ValueSet {
    fn typed(field: SearchableField, values: BTreeSet<QueryValue>) -> Self {
        debug_assert!(!values.is_empty());
        debug_assert!(values.iter().all(|v| v.value_type() == field.value_type()));
        Self { field, values }
    }
}

fn check_type(field: SearchableField, value: &QueryValue) -> Result<()> {
    let expected = field.value_type();
    let found = value.value_type();
    if expected == found {
        Ok(())
    } else {
        Err(QueryError::TypeMismatch {
            field,
            expected,
            found,
        })
    }
}

fn value_set<I, V>(field: SearchableField, kind: CriterionKind, values: I) -> Result<ValueSet>
where
    I: IntoIterator<Item = V>,
    V: Into<QueryValue>,
{
    let values = values.into_iter().map(Into::into).collect::<BTreeSet<_>>();
    if values.is_empty() {
        return Err(QueryError::EmptyValues { field, kind });
    }
    for value in &values {
        check_type(field, value)?;
    }
    Ok(ValueSet { field, values })
}

/// Unchecked wire shape; deserialization goes through the checked constructors.
#[derive(Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
enum RawCriterion {
    Include {
        field: SearchableField,
        values: Vec<QueryValue>,
    },
    Exclude {
        field: SearchableField,
        values: Vec<QueryValue>,
    },
    Match {
        field: SearchableField,
        value: QueryValue,
    },
    Range {
        field: SearchableField,
        from: QueryValue,
        to: QueryValue,
    },
}

impl TryFrom<RawCriterion> for QueryCriterion {
    type Error = QueryError;

    fn try_from(raw: RawCriterion) -> Result<Self> {
        match raw {
            RawCriterion::Include { field, values } => Self::include(field, values),
            RawCriterion::Exclude { field, values } => Self::exclude(field, values),
            RawCriterion::Match { field, value } => Self::matching(field, value),
            RawCriterion::Range { field, from, to } => Self::range(field, from, to),
        }
    }
}

impl From<QueryCriterion> for RawCriterion {
    fn from(criterion: QueryCriterion) -> Self {
        match criterion {
            QueryCriterion::Include(set) => RawCriterion::Include {
                field: set.field,
                values: set.values.into_iter().collect(),
            },
            QueryCriterion::Exclude(set) => RawCriterion::Exclude {
                field: set.field,
                values: set.values.into_iter().collect(),
            },
            QueryCriterion::Match(single) => RawCriterion::Match {
                field: single.field,
                value: single.value,
            },
            QueryCriterion::Range(range) => RawCriterion::Range {
                field: range.field,
                from: range.from,
                to: range.to,
            },
        }
    }
}
