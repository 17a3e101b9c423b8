//! Listing state: the posts shown on the home page and the cursor to
//! the next page of results

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::content::{PostSummary, SummaryData};
use crate::helpers::{post_path, DateFormatter};
use crate::prismic::{ContentApi, Document, SearchResponse};

/// One page of summaries and the cursor of the next one
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostPagination {
    pub next_page: Option<String>,
    pub results: Vec<PostSummary>,
}

impl PostPagination {
    /// Project a search response onto summaries, keeping its order
    pub fn from_response(response: SearchResponse<Document>) -> Result<Self> {
        let response = response
            .try_map(|doc| PostSummary::try_from(&doc))
            .context("Failed to decode post summaries")?;
        Ok(Self {
            next_page: response.next_page,
            results: response.results,
        })
    }
}

/// A summary ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListedPost {
    pub uid: Option<String>,
    /// Route of the post page
    pub href: Option<String>,
    /// Formatted for display, e.g. `15 mar 2021`
    pub first_publication_date: String,
    pub data: SummaryData,
}

impl ListedPost {
    pub fn new(summary: PostSummary, formatter: &DateFormatter) -> Self {
        Self {
            href: summary.uid.as_deref().map(post_path),
            first_publication_date: formatter.format(summary.first_publication_date.as_deref()),
            uid: summary.uid,
            data: summary.data,
        }
    }
}

/// A page of formatted summaries, as sent to the "load more" control
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostsPage {
    pub results: Vec<ListedPost>,
    pub next_page: Option<String>,
}

impl PostsPage {
    pub fn new(pagination: PostPagination, formatter: &DateFormatter) -> Self {
        Self {
            results: pagination
                .results
                .into_iter()
                .map(|s| ListedPost::new(s, formatter))
                .collect(),
            next_page: pagination.next_page,
        }
    }
}

/// Append-only list of posts with its pagination cursor
///
/// Once a page arrives without a cursor the listing is exhausted and no
/// further request is issued. `load_more` borrows the listing mutably, so
/// one instance never has two loads in flight.
#[derive(Debug, Clone)]
pub struct PostListing {
    posts: Vec<ListedPost>,
    next_page: Option<String>,
    formatter: DateFormatter,
}

impl PostListing {
    /// Start from the build-time page
    pub fn new(initial: PostPagination, formatter: DateFormatter) -> Self {
        let mut listing = Self {
            posts: Vec::new(),
            next_page: None,
            formatter,
        };
        listing.append(initial);
        listing
    }

    pub fn posts(&self) -> &[ListedPost] {
        &self.posts
    }

    pub fn next_page(&self) -> Option<&str> {
        self.next_page.as_deref()
    }

    /// Whether the "load more" control is shown
    pub fn has_more(&self) -> bool {
        self.next_page.is_some()
    }

    /// Fetch the cursor page and append it; returns the number of posts added
    pub async fn load_more(&mut self, api: &dyn ContentApi) -> Result<usize> {
        let Some(cursor) = self.next_page.clone() else {
            tracing::debug!("Listing exhausted, nothing to load");
            return Ok(0);
        };

        let response = api
            .fetch_page(&cursor)
            .await
            .with_context(|| format!("Failed to load more posts from {}", cursor))?;
        let page = PostPagination::from_response(response)?;

        Ok(self.append(page))
    }

    /// Append a fetched page after the current posts and adopt its cursor
    ///
    /// Posts whose uid is already listed are skipped.
    pub fn append(&mut self, page: PostPagination) -> usize {
        let mut seen: HashSet<String> = self.posts.iter().filter_map(|p| p.uid.clone()).collect();
        let before = self.posts.len();

        for summary in page.results {
            if let Some(uid) = &summary.uid {
                if !seen.insert(uid.clone()) {
                    tracing::debug!("Skipping duplicate post {}", uid);
                    continue;
                }
            }
            self.posts.push(ListedPost::new(summary, &self.formatter));
        }

        self.next_page = page.next_page;
        self.posts.len() - before
    }
}
