//! Generator module - pre-renders pages into the public directory

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::helpers::is_safe_uid;
use crate::pages::{home, post, Site};
use crate::prismic::ContentApi;
use crate::templates::ASSETS;
use crate::Blog;

/// What a build produced
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    pub listed_posts: usize,
    pub prerendered: Vec<String>,
}

/// Static page generator
#[derive(Clone)]
pub struct Generator {
    site: Site,
    public_dir: PathBuf,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        Ok(Self {
            site: Site::new(blog.config.clone())?,
            public_dir: blog.public_dir.clone(),
        })
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub fn public_dir(&self) -> &Path {
        &self.public_dir
    }

    /// Render the listing page and every static post path
    pub async fn generate(&self, api: &dyn ContentApi) -> Result<BuildReport> {
        fs::create_dir_all(&self.public_dir)
            .with_context(|| format!("Failed to create {:?}", self.public_dir))?;

        self.write_assets()?;

        let (_, listed_posts) = self.generate_index(api).await?;

        let paths = post::get_static_paths(api, &self.site.config).await?;
        let mut prerendered = Vec::with_capacity(paths.len());
        for uid in paths {
            // A post listed by the query but gone by now is skipped; the
            // route still serves it through the fallback flow
            if self.generate_post(api, &uid).await?.is_some() {
                prerendered.push(uid);
            }
        }

        Ok(BuildReport {
            listed_posts,
            prerendered,
        })
    }

    /// Render `index.html`; returns the markup and the number of listed posts
    pub async fn generate_index(&self, api: &dyn ContentApi) -> Result<(String, usize)> {
        let props = home::get_static_props(api, &self.site.config).await?;
        let listing = home::listing(&self.site, props);
        let html = home::render(&self.site, &listing)?;

        let output_path = self.public_dir.join("index.html");
        write_file(&output_path, &html)?;
        tracing::debug!("Generated: {:?}", output_path);

        Ok((html, listing.posts().len()))
    }

    /// Render a post page and persist it; `None` when the post does not exist
    pub async fn generate_post(&self, api: &dyn ContentApi, uid: &str) -> Result<Option<String>> {
        let Some(detail) = post::get_static_props(api, &self.site.config, uid).await? else {
            return Ok(None);
        };

        let view = post::PostView::build(Some(&detail), false, &self.site.formatter);
        let html = post::render(&self.site, &view, Some(uid))?;

        match self.post_output_path(uid) {
            Some(output_path) => {
                write_file(&output_path, &html)?;
                tracing::debug!("Generated post: {:?}", output_path);
            }
            None => tracing::warn!("Not persisting post with unsafe uid {:?}", uid),
        }

        Ok(Some(html))
    }

    /// The loading shell served for posts not rendered yet
    pub fn render_fallback(&self, uid: &str) -> Result<String> {
        post::render(&self.site, &post::PostView::Fallback, Some(uid))
    }

    /// Where the page of `uid` lives, if the uid is usable as a path
    pub fn post_output_path(&self, uid: &str) -> Option<PathBuf> {
        is_safe_uid(uid).then(|| self.public_dir.join("post").join(uid).join("index.html"))
    }

    fn write_assets(&self) -> Result<()> {
        for (name, content) in ASSETS {
            write_file(&self.public_dir.join(name), content)?;
        }
        Ok(())
    }
}

/// Write `content` to a temp file next to `path`, then rename it into place,
/// so readers never see a partially written page
fn write_file(path: &Path, content: &str) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| anyhow::anyhow!("No parent directory for {:?}", path))?;
    fs::create_dir_all(parent)
        .map_err(|e| anyhow::anyhow!("Failed to create dir {:?}: {}", parent, e))?;

    let mut file = NamedTempFile::new_in(parent)
        .map_err(|e| anyhow::anyhow!("Failed to create temp file in {:?}: {}", parent, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", path, e))?;
    file.persist(path)
        .map_err(|e| anyhow::anyhow!("Failed to write {:?}: {}", path, e.error))?;
    Ok(())
}
