//! Listing page (`/`)

use anyhow::{Context as _, Result};
use serde::{Deserialize, Serialize};
use tera::Context;

use super::Site;
use crate::config::SiteConfig;
use crate::helpers::more_posts_path;
use crate::listing::{ListedPost, PostListing, PostPagination, PostsPage};
use crate::prismic::{ContentApi, QueryOptions};

/// Build-time data of the listing page
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeProps {
    pub posts_pagination: PostPagination,
}

/// Query the first page of posts
pub async fn get_static_props(api: &dyn ContentApi, config: &SiteConfig) -> Result<HomeProps> {
    let response = api
        .query(
            &config.prismic.document_type,
            &QueryOptions::page_size(config.prismic.page_size)
                .ordered_by(config.prismic.orderings.as_deref()),
        )
        .await
        .context("Failed to query posts")?;

    let posts_pagination = PostPagination::from_response(response)?;
    tracing::debug!(
        "Loaded {} posts for the listing (more: {})",
        posts_pagination.results.len(),
        posts_pagination.next_page.is_some()
    );

    Ok(HomeProps { posts_pagination })
}

/// Initial listing state for the page
pub fn listing(site: &Site, props: HomeProps) -> PostListing {
    PostListing::new(props.posts_pagination, site.formatter.clone())
}

/// Render the listing page
pub fn render(site: &Site, listing: &PostListing) -> Result<String> {
    let mut context = site.base_context(&site.config.title);
    context.insert("posts", listing.posts());
    context.insert("more_url", &listing.next_page().map(more_posts_path));
    context.insert("load_more_label", &site.i18n.get("listing.load_more"));
    site.render("index.html", &context)
}

/// Render one summary as it appears in the list
pub fn render_summary(site: &Site, post: &ListedPost) -> Result<String> {
    let mut context = Context::new();
    context.insert("post", post);
    site.render("partials/post_summary.html", &context)
}

/// A fetched page plus the markup of each summary, for the "load more" control
#[derive(Debug, Clone, Serialize)]
pub struct MorePosts {
    #[serde(flatten)]
    pub page: PostsPage,
    pub fragments: Vec<String>,
}

/// Fetch the page behind a cursor and render its summaries
pub async fn more_posts(site: &Site, api: &dyn ContentApi, cursor: &str) -> Result<MorePosts> {
    let response = api.fetch_page(cursor).await?;
    let page = PostsPage::new(PostPagination::from_response(response)?, &site.formatter);
    let fragments = page
        .results
        .iter()
        .map(|post| render_summary(site, post))
        .collect::<Result<Vec<_>>>()?;
    Ok(MorePosts { page, fragments })
}
