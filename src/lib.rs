// Shared core for manga source parsers: search criteria, capability checks,
// legacy filter conversion and adaptive pagination.

pub mod config;
pub mod error;
pub mod models;
pub mod paginator;
pub mod parser;
pub mod query;

pub use error::{ParserError, QueryError, SourceError};
pub use paginator::Paginator;
pub use parser::{Legacy, LegacyPageSource, ListPageSource, PagedMangaParser};
