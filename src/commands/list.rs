//! List posts from the content API

use anyhow::Result;
use std::io::Write;

use crate::listing::PostListing;
use crate::pages::{home, Site};
use crate::prismic::ContentApi;
use crate::Blog;

/// Print the listing; with `all`, keep loading pages until the cursor runs out
pub async fn run(blog: &Blog, all: bool) -> Result<()> {
    let client = blog.client()?;
    let site = Site::new(blog.config.clone())?;
    let listing = load(&site, &client, all).await?;

    let stdout = std::io::stdout();
    print_listing(&mut stdout.lock(), &listing)?;
    Ok(())
}

async fn load(site: &Site, api: &dyn ContentApi, all: bool) -> Result<PostListing> {
    let props = home::get_static_props(api, &site.config).await?;
    let mut listing = home::listing(site, props);

    while all && listing.has_more() {
        let added = listing.load_more(api).await?;
        tracing::debug!("Loaded {} more posts", added);
    }

    Ok(listing)
}

fn print_listing<W: Write>(out: &mut W, listing: &PostListing) -> Result<()> {
    writeln!(out, "Posts ({}):", listing.posts().len())?;
    for post in listing.posts() {
        writeln!(
            out,
            "  {} - {} [{}]",
            post.first_publication_date,
            post.data.title,
            post.uid.as_deref().unwrap_or("-")
        )?;
    }
    if let Some(next) = listing.next_page() {
        writeln!(out, "More posts available: {}", next)?;
    }
    Ok(())
}
