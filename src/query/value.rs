use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::QueryError;
use crate::models::{ContentRating, ContentType, Demographic, Locale, MangaState, MangaTag};

/// Value type contract of a [`SearchableField`](super::SearchableField).
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueType {
    Text,
    Tag,
    Locale,
    State,
    ContentType,
    ContentRating,
    Demographic,
    Year,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Tag => "tag",
            Self::Locale => "locale",
            Self::State => "state",
            Self::ContentType => "content type",
            Self::ContentRating => "content rating",
            Self::Demographic => "demographic",
            Self::Year => "year",
        };
        f.write_str(name)
    }
}

/// One value carried by a criterion.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(tag = "type", content = "value", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QueryValue {
    Text(String),
    Tag(MangaTag),
    Locale(Locale),
    State(MangaState),
    ContentType(ContentType),
    ContentRating(ContentRating),
    Demographic(Demographic),
    Year(i32),
}

impl QueryValue {
    pub fn value_type(&self) -> ValueType {
        match self {
            Self::Text(_) => ValueType::Text,
            Self::Tag(_) => ValueType::Tag,
            Self::Locale(_) => ValueType::Locale,
            Self::State(_) => ValueType::State,
            Self::ContentType(_) => ValueType::ContentType,
            Self::ContentRating(_) => ValueType::ContentRating,
            Self::Demographic(_) => ValueType::Demographic,
            Self::Year(_) => ValueType::Year,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_tag(&self) -> Option<&MangaTag> {
        match self {
            Self::Tag(t) => Some(t),
            _ => None,
        }
    }

    pub fn as_locale(&self) -> Option<&Locale> {
        match self {
            Self::Locale(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_state(&self) -> Option<MangaState> {
        match self {
            Self::State(s) => Some(*s),
            _ => None,
        }
    }

    pub fn as_content_type(&self) -> Option<ContentType> {
        match self {
            Self::ContentType(t) => Some(*t),
            _ => None,
        }
    }

    pub fn as_content_rating(&self) -> Option<ContentRating> {
        match self {
            Self::ContentRating(r) => Some(*r),
            _ => None,
        }
    }

    pub fn as_demographic(&self) -> Option<Demographic> {
        match self {
            Self::Demographic(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_year(&self) -> Option<i32> {
        match self {
            Self::Year(y) => Some(*y),
            _ => None,
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<MangaTag> for QueryValue {
    fn from(value: MangaTag) -> Self {
        Self::Tag(value)
    }
}

impl From<Locale> for QueryValue {
    fn from(value: Locale) -> Self {
        Self::Locale(value)
    }
}

impl From<MangaState> for QueryValue {
    fn from(value: MangaState) -> Self {
        Self::State(value)
    }
}

impl From<ContentType> for QueryValue {
    fn from(value: ContentType) -> Self {
        Self::ContentType(value)
    }
}

impl From<ContentRating> for QueryValue {
    fn from(value: ContentRating) -> Self {
        Self::ContentRating(value)
    }
}

impl From<Demographic> for QueryValue {
    fn from(value: Demographic) -> Self {
        Self::Demographic(value)
    }
}

impl From<i32> for QueryValue {
    fn from(value: i32) -> Self {
        Self::Year(value)
    }
}

impl From<u16> for QueryValue {
    fn from(value: u16) -> Self {
        Self::Year(i32::from(value))
    }
}

impl TryFrom<i64> for QueryValue {
    type Error = QueryError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        i32::try_from(value)
            .map(Self::Year)
            .map_err(|_| QueryError::YearOutOfRange(value))
    }
}

impl TryFrom<u32> for QueryValue {
    type Error = QueryError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::try_from(i64::from(value))
    }
}
