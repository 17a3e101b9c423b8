//! In-memory content repository for tests

use async_trait::async_trait;
use serde_json::json;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::{ContentApi, Document, PrismicError, QueryOptions, Result, SearchResponse};

/// Serves a fixed list of documents, paginated like the real API
#[derive(Default)]
pub struct InMemoryContent {
    documents: Vec<Document>,
    scripted: HashMap<String, SearchResponse>,
    fetches: AtomicUsize,
}

impl InMemoryContent {
    pub fn new(documents: Vec<Document>) -> Self {
        Self {
            documents,
            ..Self::default()
        }
    }

    /// Answer `cursor` with a canned response instead of slicing documents
    pub fn with_page(mut self, cursor: &str, response: SearchResponse) -> Self {
        self.scripted.insert(cursor.to_string(), response);
        self
    }

    /// Number of `fetch_page` calls received
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    fn page(&self, document_type: &str, page: usize, page_size: usize) -> SearchResponse {
        let matching: Vec<&Document> = self
            .documents
            .iter()
            .filter(|d| d.document_type == document_type)
            .collect();
        let total = matching.len();
        let page_size = page_size.max(1);
        let total_pages = total.div_ceil(page_size);
        let start = (page - 1) * page_size;

        let results: Vec<Document> = matching
            .into_iter()
            .skip(start)
            .take(page_size)
            .cloned()
            .collect();

        let next_page = (page < total_pages).then(|| cursor(document_type, page + 1, page_size));
        let prev_page = (page > 1).then(|| cursor(document_type, page - 1, page_size));

        SearchResponse {
            page: page as u32,
            results_per_page: page_size as u32,
            results_size: results.len() as u32,
            total_results_size: total as u32,
            total_pages: total_pages as u32,
            next_page,
            prev_page,
            results,
        }
    }
}

/// Cursor format understood by [`InMemoryContent::fetch_page`]
pub fn cursor(document_type: &str, page: usize, page_size: usize) -> String {
    format!("memory://{}?page={}&pageSize={}", document_type, page, page_size)
}

fn parse_cursor(raw: &str) -> Option<(String, usize, usize)> {
    let rest = raw.strip_prefix("memory://")?;
    let (document_type, query) = rest.split_once('?')?;
    let mut page = None;
    let mut page_size = None;
    for pair in query.split('&') {
        match pair.split_once('=')? {
            ("page", v) => page = v.parse().ok(),
            ("pageSize", v) => page_size = v.parse().ok(),
            _ => {}
        }
    }
    Some((document_type.to_string(), page?, page_size?))
}

#[async_trait]
impl ContentApi for InMemoryContent {
    async fn query(&self, document_type: &str, options: &QueryOptions) -> Result<SearchResponse> {
        let page_size = options
            .page_size
            .map(|n| n as usize)
            .unwrap_or(self.documents.len().max(1));
        Ok(self.page(document_type, 1, page_size))
    }

    async fn get_by_uid(&self, document_type: &str, uid: &str) -> Result<Document> {
        self.documents
            .iter()
            .find(|d| d.document_type == document_type && d.uid.as_deref() == Some(uid))
            .cloned()
            .ok_or_else(|| PrismicError::NotFound {
                document_type: document_type.to_string(),
                uid: uid.to_string(),
            })
    }

    async fn fetch_page(&self, raw: &str) -> Result<SearchResponse> {
        self.fetches.fetch_add(1, Ordering::SeqCst);

        if let Some(response) = self.scripted.get(raw) {
            return Ok(response.clone());
        }

        let (document_type, page, page_size) =
            parse_cursor(raw).ok_or_else(|| PrismicError::InvalidCursor(raw.to_string()))?;
        Ok(self.page(&document_type, page, page_size))
    }
}

/// A `posts` summary document
pub fn summary_doc(uid: &str, date: &str) -> Document {
    Document {
        id: format!("id-{}", uid),
        uid: Some(uid.to_string()),
        document_type: "posts".to_string(),
        first_publication_date: Some(date.to_string()),
        last_publication_date: Some(date.to_string()),
        data: json!({
            "title": format!("Title of {}", uid),
            "subtitle": format!("Subtitle of {}", uid),
            "author": "Danilo Vieira"
        }),
    }
}

/// A full `posts` document with one section of `words` words
pub fn detail_doc(uid: &str, date: &str, words: usize) -> Document {
    let text = vec!["palavra"; words].join(" ");
    let mut doc = summary_doc(uid, date);
    doc.data = json!({
        "title": format!("Title of {}", uid),
        "subtitle": format!("Subtitle of {}", uid),
        "author": "Danilo Vieira",
        "banner": { "url": format!("https://images.prismic.io/blog/{}.png", uid) },
        "content": [
            {
                "heading": "",
                "body": [ { "type": "paragraph", "text": text, "spans": [] } ]
            }
        ]
    });
    doc
}

/// A one-page response with the given documents and cursor
pub fn response(results: Vec<Document>, next_page: Option<&str>) -> SearchResponse {
    SearchResponse {
        page: 1,
        results_per_page: results.len() as u32,
        results_size: results.len() as u32,
        total_results_size: results.len() as u32,
        total_pages: 1,
        next_page: next_page.map(str::to_string),
        prev_page: None,
        results,
    }
}
