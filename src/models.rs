use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use crate::error::QueryError;

static LOCALE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-z]{2,3}(-[a-z0-9]{2,8})*$").expect("locale pattern is valid")
});

/// A tag (genre, theme, format) as a site names it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MangaTag {
    /// Site-specific identifier used in request parameters
    pub key: String,
    pub title: String,
    pub source: String,
}

impl MangaTag {
    pub fn new(key: impl Into<String>, title: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            source: source.into(),
        }
    }
}

/// Normalized language tag such as `en`, `pt-br` or `zh-hant`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Locale(String);

impl Locale {
    /// Parse and normalize a language tag. `pt_BR` and `PT-br` both become `pt-br`.
    pub fn parse(tag: &str) -> Result<Self, QueryError> {
        let normalized = tag.trim().replace('_', "-").to_lowercase();
        if LOCALE_RE.is_match(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(QueryError::InvalidLocale(tag.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Primary language subtag, e.g. `pt` for `pt-br`.
    pub fn language(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Locale {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Locale {
    type Error = QueryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Locale> for String {
    fn from(locale: Locale) -> Self {
        locale.0
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MangaState {
    Ongoing,
    Finished,
    Abandoned,
    Paused,
    Upcoming,
    Restricted,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentRating {
    Safe,
    Suggestive,
    Adult,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    Manga,
    Manhwa,
    Manhua,
    Comics,
    Novel,
    OneShot,
    Doujinshi,
    ImageSet,
    ArtistCg,
    GameCg,
    Other,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Demographic {
    Shounen,
    Shoujo,
    Seinen,
    Josei,
    Kodomo,
    None,
}

/// Listing order a source can be asked for.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SortOrder {
    Updated,
    UpdatedAsc,
    Popularity,
    PopularityAsc,
    Rating,
    RatingAsc,
    Newest,
    NewestAsc,
    Alphabetical,
    AlphabeticalDesc,
    Relevance,
}

/// A manga as it appears in a source listing page.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Manga {
    pub id: String,
    pub url: String,
    pub title: String,
    pub alt_titles: Vec<String>,
    pub cover_url: Option<String>,
    pub tags: Vec<MangaTag>,
    pub state: Option<MangaState>,
    pub content_rating: Option<ContentRating>,
    pub source: String,
}

impl Manga {
    pub fn new(id: impl Into<String>, title: impl Into<String>, source: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            url: id.clone(),
            id,
            title: title.into(),
            alt_titles: Vec::new(),
            cover_url: None,
            tags: Vec::new(),
            state: None,
            content_rating: None,
            source: source.into(),
        }
    }
}
