//! Raw documents and search responses as returned by the API

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

/// A content API record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,

    #[serde(default)]
    pub uid: Option<String>,

    #[serde(rename = "type")]
    pub document_type: String,

    /// Prismic timestamp, e.g. `2021-03-15T19:25:28+0000`
    #[serde(default)]
    pub first_publication_date: Option<String>,

    #[serde(default)]
    pub last_publication_date: Option<String>,

    /// Schema-defined payload
    #[serde(default)]
    pub data: serde_json::Value,
}

impl Document {
    /// Decode the whole document into a typed view
    pub fn decode<T: DeserializeOwned>(&self) -> serde_json::Result<T> {
        serde_json::to_value(self).and_then(serde_json::from_value)
    }
}

/// One page of a paginated query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse<T = Document> {
    #[serde(default = "first_page")]
    pub page: u32,

    #[serde(default)]
    pub results_per_page: u32,

    #[serde(default)]
    pub results_size: u32,

    #[serde(default)]
    pub total_results_size: u32,

    #[serde(default)]
    pub total_pages: u32,

    /// Cursor of the following page, absent on the last one
    #[serde(default)]
    pub next_page: Option<String>,

    #[serde(default)]
    pub prev_page: Option<String>,

    pub results: Vec<T>,
}

fn first_page() -> u32 {
    1
}

impl<T> SearchResponse<T> {
    /// Transform every result, keeping the pagination metadata
    pub fn try_map<U, E, F>(self, f: F) -> Result<SearchResponse<U>, E>
    where
        F: FnMut(T) -> Result<U, E>,
    {
        let results = self.results.into_iter().map(f).collect::<Result<Vec<_>, E>>()?;
        Ok(SearchResponse {
            page: self.page,
            results_per_page: self.results_per_page,
            results_size: self.results_size,
            total_results_size: self.total_results_size,
            total_pages: self.total_pages,
            next_page: self.next_page,
            prev_page: self.prev_page,
            results,
        })
    }
}

/// API root, only the part needed to pick a content release
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiInfo {
    #[serde(default)]
    pub refs: Vec<ApiRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiRef {
    #[serde(rename = "ref")]
    pub reference: String,

    #[serde(rename = "isMasterRef", default)]
    pub is_master_ref: bool,
}

impl ApiInfo {
    pub fn master_ref(&self) -> Option<&str> {
        self.refs
            .iter()
            .find(|r| r.is_master_ref)
            .map(|r| r.reference.as_str())
    }
}
