//! Criteria-based search queries.
//!
//! A [`Query`] is a set of typed [`QueryCriterion`] values over a fixed set of
//! [`SearchableField`]s. Sources declare what they understand with
//! [`SearchCapabilities`] and every query is validated against that
//! declaration before a request goes out. Sources written against the flat
//! [`LegacyFilter`] are served through [`to_filter`].
//!
//! ```
//! use rust_manga_parsers::query::{
//!     CapabilityEntry, CriterionKind, Query, QueryCriterion, SearchCapabilities, SearchableField,
//! };
//!
//! let caps = SearchCapabilities::new([
//!     CapabilityEntry::new(SearchableField::TitleName, [CriterionKind::Match]),
//! ]);
//! let query = Query::builder()
//!     .criterion(QueryCriterion::matching(SearchableField::TitleName, "blame!")?)
//!     .build()?;
//! caps.validate(&query)?;
//! # Ok::<(), rust_manga_parsers::QueryError>(())
//! ```

pub mod builder;
pub mod capabilities;
pub mod convert;
pub mod criterion;
pub mod field;
pub mod filter;
pub mod value;

pub use builder::{Query, QueryBuilder};
pub use capabilities::{CapabilityEntry, FilterCapabilities, SearchCapabilities};
pub use convert::{to_filter, to_query};
pub use criterion::{CriterionKind, QueryCriterion, SingleValue, ValueRange, ValueSet};
pub use field::SearchableField;
pub use filter::{LegacyFilter, YEAR_UNKNOWN};
pub use value::{QueryValue, ValueType};
