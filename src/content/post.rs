//! Post models decoded from `posts` documents

use serde::{Deserialize, Deserializer, Serialize};

use super::richtext::RichText;
use crate::helpers::html_escape;
use crate::prismic::Document;

/// Average reading speed used for the reading-time estimate
pub const WORDS_PER_MINUTE: usize = 200;

/// A post as shown on the listing page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostSummary {
    #[serde(default)]
    pub uid: Option<String>,

    #[serde(default)]
    pub first_publication_date: Option<String>,

    pub data: SummaryData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryData {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub subtitle: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub author: String,
}

/// A full post as shown on its own page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostDetail {
    #[serde(default)]
    pub uid: Option<String>,

    #[serde(default)]
    pub first_publication_date: Option<String>,

    pub data: PostData,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostData {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub author: String,
    #[serde(default)]
    pub banner: Banner,
    #[serde(default)]
    pub content: Vec<Section>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Banner {
    pub url: Option<String>,
    pub alt: Option<String>,
}

/// A titled group of rich-text blocks
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub heading: String,
    #[serde(default)]
    pub body: RichText,
}

impl Section {
    /// Words of the heading plus words of the plain-text body
    pub fn word_count(&self) -> usize {
        count_words(&self.heading) + count_words(&self.body.as_text())
    }

    pub fn to_html(&self) -> String {
        format!(
            "<h2>{}</h2>{}",
            html_escape(&self.heading),
            self.body.as_html()
        )
    }
}

impl PostDetail {
    pub fn word_count(&self) -> usize {
        self.data.content.iter().map(Section::word_count).sum()
    }

    /// Estimated reading time in whole minutes, rounded up
    pub fn reading_time(&self) -> usize {
        reading_time(self.word_count())
    }

    /// Every section rendered in order
    pub fn content_html(&self) -> String {
        self.data
            .content
            .iter()
            .map(Section::to_html)
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl TryFrom<&Document> for PostSummary {
    type Error = serde_json::Error;

    fn try_from(doc: &Document) -> Result<Self, Self::Error> {
        doc.decode()
    }
}

impl TryFrom<&Document> for PostDetail {
    type Error = serde_json::Error;

    fn try_from(doc: &Document) -> Result<Self, Self::Error> {
        doc.decode()
    }
}

/// Minutes needed to read `words` words
pub fn reading_time(words: usize) -> usize {
    words.div_ceil(WORDS_PER_MINUTE)
}

/// Count whitespace-separated words
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// Prismic sends `null` for empty text fields
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
