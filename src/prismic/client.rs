//! HTTP client for the Prismic REST API v2

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tokio::sync::OnceCell;

use super::document::{ApiInfo, Document, SearchResponse};
use super::error::{PrismicError, Result};
use super::predicate::{to_query, Predicate, QueryOptions};
use super::ContentApi;
use crate::config::PrismicConfig;

/// Build a client handle from explicit configuration
///
/// Nothing is shared between handles: each one resolves its own master ref
/// on first use.
pub fn get_prismic_client(config: &PrismicConfig) -> Result<PrismicClient> {
    let endpoint = Url::parse(config.endpoint.trim_end_matches('/'))
        .map_err(|_| PrismicError::InvalidEndpoint(config.endpoint.clone()))?;
    if !matches!(endpoint.scheme(), "http" | "https") {
        return Err(PrismicError::InvalidEndpoint(config.endpoint.clone()));
    }

    let http = Client::builder()
        .timeout(Duration::from_secs(config.timeout_secs))
        .user_agent(concat!("prismic-blog/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|source| PrismicError::Http {
            url: config.endpoint.clone(),
            source,
        })?;

    Ok(PrismicClient {
        http,
        endpoint,
        access_token: config.access_token.clone(),
        master_ref: OnceCell::new(),
    })
}

/// Authenticated handle to one Prismic repository
pub struct PrismicClient {
    http: Client,
    endpoint: Url,
    access_token: Option<String>,
    master_ref: OnceCell<String>,
}

impl PrismicClient {
    /// Search documents matching all predicates
    pub async fn query_predicates(
        &self,
        predicates: &[Predicate],
        options: &QueryOptions,
    ) -> Result<SearchResponse> {
        let master_ref = self.master_ref().await?;

        let mut url = self.search_url()?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("ref", master_ref);
            pairs.append_pair("q", &to_query(predicates));
            for (key, value) in options.to_params() {
                pairs.append_pair(key, &value);
            }
            if let Some(token) = &self.access_token {
                pairs.append_pair("access_token", token);
            }
        }

        self.get_json(url).await
    }

    /// Master ref of the repository, fetched once per handle
    async fn master_ref(&self) -> Result<&str> {
        let reference = self
            .master_ref
            .get_or_try_init(|| async {
                let mut url = self.endpoint.clone();
                if let Some(token) = &self.access_token {
                    url.query_pairs_mut().append_pair("access_token", token);
                }
                let info: ApiInfo = self.get_json(url).await?;
                let reference = info
                    .master_ref()
                    .ok_or_else(|| PrismicError::NoMasterRef(self.endpoint.to_string()))?
                    .to_string();
                tracing::debug!("Resolved master ref {}", reference);
                Ok::<_, PrismicError>(reference)
            })
            .await?;
        Ok(reference.as_str())
    }

    fn search_url(&self) -> Result<Url> {
        let raw = format!("{}/documents/search", self.endpoint.as_str().trim_end_matches('/'));
        Url::parse(&raw).map_err(|_| PrismicError::InvalidEndpoint(raw))
    }

    /// Validate a `next_page` cursor and make sure it carries the token
    fn cursor_url(&self, cursor: &str) -> Result<Url> {
        let mut url =
            Url::parse(cursor).map_err(|_| PrismicError::InvalidCursor(cursor.to_string()))?;

        if url.scheme() != self.endpoint.scheme()
            || url.host_str() != self.endpoint.host_str()
            || url.port_or_known_default() != self.endpoint.port_or_known_default()
        {
            return Err(PrismicError::ForeignCursor(cursor.to_string()));
        }

        if let Some(token) = &self.access_token {
            let has_token = url.query_pairs().any(|(k, _)| k == "access_token");
            if !has_token {
                url.query_pairs_mut().append_pair("access_token", token);
            }
        }

        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        let shown = redact(&url);
        tracing::debug!("GET {}", shown);

        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|source| PrismicError::Http {
                url: shown.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PrismicError::Status {
                url: shown,
                status,
            });
        }

        let body = response.text().await.map_err(|source| PrismicError::Http {
            url: shown.clone(),
            source,
        })?;

        serde_json::from_str(&body).map_err(|e| PrismicError::Decode {
            url: shown,
            message: e.to_string(),
        })
    }
}

#[async_trait]
impl ContentApi for PrismicClient {
    async fn query(&self, document_type: &str, options: &QueryOptions) -> Result<SearchResponse> {
        self.query_predicates(&[Predicate::document_type(document_type)], options)
            .await
    }

    async fn get_by_uid(&self, document_type: &str, uid: &str) -> Result<Document> {
        let predicates = [
            Predicate::document_type(document_type),
            Predicate::uid(document_type, uid),
        ];
        let response = self
            .query_predicates(&predicates, &QueryOptions::page_size(1))
            .await?;

        response
            .results
            .into_iter()
            .next()
            .ok_or_else(|| PrismicError::NotFound {
                document_type: document_type.to_string(),
                uid: uid.to_string(),
            })
    }

    async fn fetch_page(&self, cursor: &str) -> Result<SearchResponse> {
        let url = self.cursor_url(cursor)?;
        self.get_json(url).await
    }
}

/// URL without the access token, for logs and error messages
fn redact(url: &Url) -> String {
    let mut clean = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "access_token")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if pairs.is_empty() {
        clean.set_query(None);
    } else {
        clean.query_pairs_mut().clear().extend_pairs(pairs);
    }
    clean.to_string()
}
