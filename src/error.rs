use crate::query::{CriterionKind, SearchableField, ValueType};

/// Errors raised while assembling, validating or converting a search query.
///
/// All of them are deterministic for a given input, so none is worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    #[error("Type mismatch for field {field}: expected {expected}, got {found}")]
    TypeMismatch {
        field: SearchableField,
        expected: ValueType,
        found: ValueType,
    },

    #[error("Range bounds for field {field} have different types: {from} and {to}")]
    RangeTypeMismatch {
        field: SearchableField,
        from: ValueType,
        to: ValueType,
    },

    #[error("{kind} criterion for field {field} requires at least one value")]
    EmptyValues {
        field: SearchableField,
        kind: CriterionKind,
    },

    #[error("Invalid locale: {0:?}")]
    InvalidLocale(String),

    #[error("Year value {0} is out of range")]
    YearOutOfRange(i64),

    #[error("Conflicting {kind} criteria for field {field}")]
    Conflict {
        field: SearchableField,
        kind: CriterionKind,
    },

    #[error("Unsupported field: {0}")]
    UnsupportedField(SearchableField),

    #[error("Unsupported criterion kind {kind} for field {field}")]
    UnsupportedKind {
        field: SearchableField,
        kind: CriterionKind,
    },

    #[error("Multiple values not allowed for field {0}")]
    MultipleValuesNotAllowed(SearchableField),

    #[error("Multiple criteria present but field {0} does not support combination")]
    CombinationNotAllowed(SearchableField),

    #[error("Unsupported field for conversion: {0}")]
    UnsupportedConversion(SearchableField),

    #[error("Unsupported criterion kind {kind} for conversion of field {field}")]
    UnsupportedConversionKind {
        field: SearchableField,
        kind: CriterionKind,
    },

    #[error("Field {0} holds a single value in the legacy filter")]
    SingleValueSlot(SearchableField),

    #[error("Year {year} of field {field} reads as unset in the legacy filter")]
    YearNotRepresentable { field: SearchableField, year: i32 },
}

impl QueryError {
    /// Field the error is about, if any.
    pub fn field(&self) -> Option<SearchableField> {
        match self {
            Self::TypeMismatch { field, .. }
            | Self::RangeTypeMismatch { field, .. }
            | Self::EmptyValues { field, .. }
            | Self::Conflict { field, .. }
            | Self::UnsupportedKind { field, .. }
            | Self::UnsupportedConversionKind { field, .. }
            | Self::YearNotRepresentable { field, .. } => Some(*field),
            Self::UnsupportedField(field)
            | Self::MultipleValuesNotAllowed(field)
            | Self::CombinationNotAllowed(field)
            | Self::UnsupportedConversion(field)
            | Self::SingleValueSlot(field) => Some(*field),
            Self::InvalidLocale(_) | Self::YearOutOfRange(_) => None,
        }
    }

    /// True for failures that mean the source cannot serve the query
    /// (as opposed to a malformed query).
    pub fn is_capability_violation(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedField(_)
                | Self::UnsupportedKind { .. }
                | Self::MultipleValuesNotAllowed(_)
                | Self::CombinationNotAllowed(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, QueryError>;

/// Boxed failure coming from a site adapter (transport, parsing).
pub type SourceError = Box<dyn std::error::Error + Send + Sync>;

/// Errors surfaced by a paged parser's listing call.
#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error("Query rejected: {0}")]
    Query(#[from] QueryError),

    #[error("Source {source_name} failed on page {page}: {error}")]
    Source {
        source_name: String,
        page: usize,
        #[source]
        error: SourceError,
    },
}
