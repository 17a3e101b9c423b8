//! Prismic content API client
//!
//! Views talk to the repository through [`ContentApi`]; [`PrismicClient`]
//! is the HTTP implementation built by [`get_prismic_client`].

mod client;
mod document;
mod error;
mod predicate;

#[cfg(test)]
pub(crate) mod testing;

use async_trait::async_trait;

pub use client::{get_prismic_client, PrismicClient};
pub use document::{Document, SearchResponse};
pub use error::{PrismicError, Result};
pub use predicate::{Predicate, QueryOptions};

/// Read access to a content repository
#[async_trait]
pub trait ContentApi: Send + Sync {
    /// One page of documents of the given type
    async fn query(&self, document_type: &str, options: &QueryOptions) -> Result<SearchResponse>;

    /// A single document by uid; `PrismicError::NotFound` if absent
    async fn get_by_uid(&self, document_type: &str, uid: &str) -> Result<Document>;

    /// The page a `next_page` cursor points at
    async fn fetch_page(&self, cursor: &str) -> Result<SearchResponse>;
}
