use serde::{Deserialize, Serialize};
use std::fmt;

use super::value::ValueType;

/// Logical search dimensions a query can constrain.
///
/// The set is closed: sources declare which of these they understand through
/// [`SearchCapabilities`](super::SearchCapabilities), they cannot add new ones.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchableField {
    TitleName,
    Tag,
    Author,
    Language,
    OriginalLanguage,
    State,
    ContentType,
    ContentRating,
    Demographic,
    PublicationYear,
}

impl SearchableField {
    pub const ALL: [SearchableField; 10] = [
        Self::TitleName,
        Self::Tag,
        Self::Author,
        Self::Language,
        Self::OriginalLanguage,
        Self::State,
        Self::ContentType,
        Self::ContentRating,
        Self::Demographic,
        Self::PublicationYear,
    ];

    /// Type every value carried for this field must have.
    pub fn value_type(self) -> ValueType {
        match self {
            Self::TitleName | Self::Author => ValueType::Text,
            Self::Tag => ValueType::Tag,
            Self::Language | Self::OriginalLanguage => ValueType::Locale,
            Self::State => ValueType::State,
            Self::ContentType => ValueType::ContentType,
            Self::ContentRating => ValueType::ContentRating,
            Self::Demographic => ValueType::Demographic,
            Self::PublicationYear => ValueType::Year,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::TitleName => "TITLE_NAME",
            Self::Tag => "TAG",
            Self::Author => "AUTHOR",
            Self::Language => "LANGUAGE",
            Self::OriginalLanguage => "ORIGINAL_LANGUAGE",
            Self::State => "STATE",
            Self::ContentType => "CONTENT_TYPE",
            Self::ContentRating => "CONTENT_RATING",
            Self::Demographic => "DEMOGRAPHIC",
            Self::PublicationYear => "PUBLICATION_YEAR",
        }
    }
}

impl fmt::Display for SearchableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_matches_wire_name() {
        for field in SearchableField::ALL {
            let json = serde_json::to_string(&field).unwrap();
            assert_eq!(json, format!("\"{}\"", field));
        }
    }

    #[test]
    fn test_text_fields() {
        assert_eq!(SearchableField::TitleName.value_type(), ValueType::Text);
        assert_eq!(SearchableField::Author.value_type(), ValueType::Text);
        assert_eq!(SearchableField::PublicationYear.value_type(), ValueType::Year);
    }
}
