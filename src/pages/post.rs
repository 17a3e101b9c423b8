//! Post page (`/post/{uid}`)

use anyhow::{Context, Result};
use serde::Serialize;

use super::Site;
use crate::config::SiteConfig;
use crate::content::PostDetail;
use crate::helpers::{post_data_path, DateFormatter};
use crate::prismic::{ContentApi, QueryOptions};

/// Uids of the posts rendered at build time: the most recent ones in
/// document order
pub async fn get_static_paths(api: &dyn ContentApi, config: &SiteConfig) -> Result<Vec<String>> {
    let count = config.prismic.prerender_count;
    if count == 0 {
        return Ok(Vec::new());
    }

    let response = api
        .query(
            &config.prismic.document_type,
            &QueryOptions::page_size(count as u32)
                .ordered_by(config.prismic.orderings.as_deref()),
        )
        .await
        .context("Failed to query posts for static paths")?;

    let paths: Vec<String> = response
        .results
        .into_iter()
        .filter_map(|doc| doc.uid)
        .take(count)
        .collect();

    if paths.len() < count {
        tracing::warn!(
            "Expected {} posts to pre-render, found {}",
            count,
            paths.len()
        );
    }

    Ok(paths)
}

/// Load one post; `None` when no post has that uid
pub async fn get_static_props(
    api: &dyn ContentApi,
    config: &SiteConfig,
    uid: &str,
) -> Result<Option<PostDetail>> {
    match api.get_by_uid(&config.prismic.document_type, uid).await {
        Ok(doc) => {
            let post = PostDetail::try_from(&doc)
                .with_context(|| format!("Failed to decode post {}", uid))?;
            Ok(Some(post))
        }
        Err(e) if e.is_not_found() => {
            tracing::debug!("Post {} not found", uid);
            Ok(None)
        }
        Err(e) => Err(e).with_context(|| format!("Failed to load post {}", uid)),
    }
}

/// A post ready for display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PostPage {
    pub title: String,
    pub author: String,
    pub banner_url: String,
    pub banner_alt: String,
    /// Formatted for display, e.g. `15 mar 2021`
    pub first_publication_date: String,
    /// Minutes, rounded up
    pub reading_time: usize,
    pub content_html: String,
}

/// What the post route shows
#[derive(Debug, Clone, PartialEq)]
pub enum PostView {
    /// Data not resolved yet
    Fallback,
    Ready(PostPage),
}

impl PostView {
    /// Derive the view from the post and the router's fallback flag
    pub fn build(post: Option<&PostDetail>, is_fallback: bool, formatter: &DateFormatter) -> Self {
        let post = match post {
            Some(post) if !is_fallback => post,
            _ => return PostView::Fallback,
        };

        PostView::Ready(PostPage {
            title: post.data.title.clone(),
            author: post.data.author.clone(),
            banner_url: post.data.banner.url.clone().unwrap_or_default(),
            banner_alt: post.data.banner.alt.clone().unwrap_or_default(),
            first_publication_date: formatter.format(post.first_publication_date.as_deref()),
            reading_time: post.reading_time(),
            content_html: post.content_html(),
        })
    }
}

/// Render the post route
///
/// `uid` is only used by the fallback shell, which requests the rendered
/// page once it loads.
pub fn render(site: &Site, view: &PostView, uid: Option<&str>) -> Result<String> {
    match view {
        PostView::Fallback => {
            let mut context = site.base_context(&site.config.title);
            context.insert("is_fallback", &true);
            context.insert("loading_label", &site.i18n.get("post.loading"));
            context.insert("data_url", &uid.map(post_data_path));
            site.render("post.html", &context)
        }
        PostView::Ready(page) => {
            let title = format!("{} | {}", page.title, site.config.title);
            let mut context = site.base_context(&title);
            context.insert("is_fallback", &false);
            context.insert("post", page);
            context.insert(
                "reading_time_label",
                &site.i18n.get_count("post.reading_time", page.reading_time),
            );
            site.render("post.html", &context)
        }
    }
}
