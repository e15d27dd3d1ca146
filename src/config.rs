use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::paginator::Paginator;

#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct Config {
    /// Defaults for every source
    #[serde(default)]
    pub pagination: PaginationConfig,

    /// Per-source overrides keyed by source name
    #[serde(default)]
    pub sources: HashMap<String, PaginationConfig>,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct PaginationConfig {
    /// Nominal number of items per listing page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// Items per search results page, if different from `page_size`
    #[serde(default)]
    pub search_page_size: Option<usize>,

    /// Index of the first page (some sites count from 0)
    #[serde(default = "default_first_page")]
    pub first_page: usize,

    /// First page index for search results, if different from `first_page`
    #[serde(default)]
    pub search_first_page: Option<usize>,
}

fn default_page_size() -> usize { 20 }
fn default_first_page() -> usize { 1 }

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            page_size: 20,
            search_page_size: None,
            first_page: 1,
            search_first_page: None,
        }
    }
}

impl PaginationConfig {
    pub fn new(page_size: usize, search_page_size: usize) -> Self {
        Self {
            page_size,
            search_page_size: Some(search_page_size),
            ..Self::default()
        }
    }

    /// Paginator for browsing listings
    pub fn paginator(&self) -> Paginator {
        Paginator::new(self.page_size).with_first_page(self.first_page)
    }

    /// Paginator for search results
    pub fn search_paginator(&self) -> Paginator {
        Paginator::new(self.search_page_size.unwrap_or(self.page_size))
            .with_first_page(self.search_first_page.unwrap_or(self.first_page))
    }
}

impl Config {
    /// Read `parsers.toml` from the working directory, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(Path::new("parsers.toml"))
    }

    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => match Self::from_toml_str(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    log::warn!("Ignoring invalid config {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("Failed to read config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Pagination settings for `source`, or the defaults when it has no override.
    pub fn pagination_for(&self, source: &str) -> &PaginationConfig {
        self.sources.get(source).unwrap_or(&self.pagination)
    }
}
