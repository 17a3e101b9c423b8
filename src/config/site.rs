//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Environment variable overriding `prismic.endpoint`
pub const ENDPOINT_ENV: &str = "PRISMIC_API_ENDPOINT";

/// Environment variable overriding `prismic.access_token`
pub const ACCESS_TOKEN_ENV: &str = "PRISMIC_ACCESS_TOKEN";

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub language: String,
    pub timezone: String,

    // Date format (date-fns tokens)
    pub date_format: String,

    // Directory
    pub public_dir: String,

    // Content API
    #[serde(default)]
    pub prismic: PrismicConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "spacetraveling".to_string(),
            language: "pt-BR".to_string(),
            timezone: "UTC".to_string(),

            date_format: "d MMM yyyy".to_string(),

            public_dir: "public".to_string(),

            prismic: PrismicConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {:?}", path))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        Ok(config)
    }

    /// Apply `PRISMIC_*` environment overrides
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup(ENDPOINT_ENV).filter(|v| !v.is_empty()) {
            tracing::debug!("Using Prismic endpoint from {}", ENDPOINT_ENV);
            self.prismic.endpoint = endpoint;
        }
        if let Some(token) = lookup(ACCESS_TOKEN_ENV).filter(|v| !v.is_empty()) {
            self.prismic.access_token = Some(token);
        }
    }
}

/// Prismic repository configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrismicConfig {
    /// API entry point, e.g. `https://my-repo.cdn.prismic.io/api/v2`
    pub endpoint: String,
    pub access_token: Option<String>,
    /// Custom type holding the blog posts
    pub document_type: String,
    /// Posts on the first listing page
    pub page_size: u32,
    /// Number of most recent posts rendered at build time
    pub prerender_count: usize,
    /// Search orderings, e.g. `[document.first_publication_date desc]`;
    /// the API's default order when unset
    pub orderings: Option<String>,
    pub timeout_secs: u64,
}

impl Default for PrismicConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            access_token: None,
            document_type: "posts".to_string(),
            page_size: 2,
            prerender_count: 2,
            orderings: None,
            timeout_secs: 10,
        }
    }
}
