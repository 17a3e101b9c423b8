//! prismic-blog: a server-rendered blog backed by the Prismic content API
//!
//! Posts are queried from a Prismic repository, the listing page and the
//! most recent posts are pre-rendered with Tera templates, and the rest of
//! the posts are rendered on their first request.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod i18n;
pub mod listing;
pub mod pages;
pub mod prismic;
pub mod server;
pub mod templates;

use anyhow::Result;
use std::path::Path;

/// The main blog application
#[derive(Debug, Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: std::path::PathBuf,
    /// Public (output) directory
    pub public_dir: std::path::PathBuf,
}

impl Blog {
    /// Create a new Blog instance from a directory
    ///
    /// Reads `_config.yml` when present, then `.env.local` and `.env`, then
    /// applies the `PRISMIC_*` environment overrides.
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        for env_file in [".env.local", ".env"] {
            let path = base_dir.join(env_file);
            if path.exists() {
                dotenvy::from_path(&path)?;
                tracing::debug!("Loaded environment from {:?}", path);
            }
        }
        config.apply_env();

        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            public_dir,
        })
    }

    /// A fresh content API handle for this site's repository
    pub fn client(&self) -> Result<prismic::PrismicClient> {
        if self.config.prismic.endpoint.is_empty() {
            anyhow::bail!(
                "No Prismic endpoint configured: set prismic.endpoint in _config.yml or {}",
                config::ENDPOINT_ENV
            );
        }
        Ok(prismic::get_prismic_client(&self.config.prismic)?)
    }

    /// Pre-render the site
    pub async fn build(&self) -> Result<()> {
        commands::build::run(self).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
