use std::future::Future;

use crate::config::PaginationConfig;
use crate::error::{ParserError, QueryError, SourceError};
use crate::models::{Manga, SortOrder};
use crate::paginator::Paginator;
use crate::query::{to_filter, to_query, FilterCapabilities, LegacyFilter, Query, SearchCapabilities};

/// A site that serves listings page by page and understands criteria queries.
///
/// Implementors only fetch and parse one page; offset handling lives in
/// [`PagedMangaParser`].
pub trait ListPageSource {
    /// Source name used in logs and errors
    fn name(&self) -> &str;

    fn capabilities(&self) -> &SearchCapabilities;

    /// Reject queries this source cannot serve. Runs before any request.
    fn check(&self, query: &Query) -> Result<(), QueryError> {
        self.capabilities().validate(query)
    }

    fn fetch_page(
        &self,
        page: usize,
        query: &Query,
    ) -> impl Future<Output = Result<Vec<Manga>, SourceError>> + Send;
}

/// A site written against the flat [`LegacyFilter`].
///
/// Wrap it in [`Legacy`] to use it wherever a [`ListPageSource`] is expected.
pub trait LegacyPageSource {
    fn name(&self) -> &str;

    fn filter_capabilities(&self) -> FilterCapabilities;

    fn fetch_page(
        &self,
        page: usize,
        order: Option<SortOrder>,
        filter: &LegacyFilter,
    ) -> impl Future<Output = Result<Vec<Manga>, SourceError>> + Send;
}

/// Serves criteria queries through a [`LegacyPageSource`] by converting each
/// query into a [`LegacyFilter`].
pub struct Legacy<S> {
    inner: S,
    capabilities: SearchCapabilities,
}

impl<S: LegacyPageSource> Legacy<S> {
    pub fn new(inner: S) -> Self {
        let capabilities = SearchCapabilities::from(inner.filter_capabilities());
        Self {
            inner,
            capabilities,
        }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }
}

impl<S: LegacyPageSource + Sync> ListPageSource for Legacy<S> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn capabilities(&self) -> &SearchCapabilities {
        &self.capabilities
    }

    fn check(&self, query: &Query) -> Result<(), QueryError> {
        self.capabilities.validate(query)?;
        to_filter(query).map(drop)
    }

    fn fetch_page(
        &self,
        page: usize,
        query: &Query,
    ) -> impl Future<Output = Result<Vec<Manga>, SourceError>> + Send {
        async move {
            let filter = to_filter(query)?;
            self.inner.fetch_page(page, query.order(), &filter).await
        }
    }
}

/// Offset-based listing on top of a page-based source.
///
/// Browsing and searching use separate paginators because sites often page
/// their search results differently from their catalog.
pub struct PagedMangaParser<S> {
    source: S,
    paginator: Paginator,
    search_paginator: Paginator,
}

impl<S: ListPageSource> PagedMangaParser<S> {
    pub fn new(source: S, page_size: usize, search_page_size: usize) -> Self {
        Self {
            source,
            paginator: Paginator::new(page_size),
            search_paginator: Paginator::new(search_page_size),
        }
    }

    pub fn from_config(source: S, config: &PaginationConfig) -> Self {
        Self {
            source,
            paginator: config.paginator(),
            search_paginator: config.search_paginator(),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    pub fn search_paginator(&self) -> &Paginator {
        &self.search_paginator
    }

    /// Items starting at `query.offset()`, one site page at a time.
    pub async fn get_list(&mut self, query: &Query) -> Result<Vec<Manga>, ParserError> {
        if let Err(e) = self.source.check(query) {
            log::warn!(
                "[{}] Rejected query {}: {}",
                self.source.name(),
                serde_json::to_string(query).unwrap_or_default(),
                e
            );
            return Err(e.into());
        }

        let paginator = if query.title().is_some() {
            &mut self.search_paginator
        } else {
            &mut self.paginator
        };
        let offset = query.offset();
        let page = paginator.get_page(offset);
        log::debug!("[{}] Offset {} -> page {}", self.source.name(), offset, page);

        let list = self
            .source
            .fetch_page(page, query)
            .await
            .map_err(|error| ParserError::Source {
                source_name: self.source.name().to_string(),
                page,
                error,
            })?;

        paginator.on_list_received(offset, page, list.len());
        Ok(list)
    }

    /// [`get_list`](Self::get_list) for callers still holding a legacy filter.
    pub async fn get_list_filtered(
        &mut self,
        offset: usize,
        order: Option<SortOrder>,
        filter: &LegacyFilter,
    ) -> Result<Vec<Manga>, ParserError> {
        let query = to_query(offset, order, filter);
        self.get_list(&query).await
    }
}
