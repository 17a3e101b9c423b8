//! Pre-render the site

use anyhow::Result;

use crate::generator::Generator;
use crate::Blog;

/// Render the listing page and the most recent posts into the public dir
pub async fn run(blog: &Blog) -> Result<()> {
    let start = std::time::Instant::now();

    let client = blog.client()?;
    let generator = Generator::new(blog)?;
    let report = generator.generate(&client).await?;

    tracing::info!(
        "Listed {} posts, pre-rendered {} post pages: {}",
        report.listed_posts,
        report.prerendered.len(),
        report.prerendered.join(", ")
    );

    let duration = start.elapsed();
    tracing::info!("Generated in {:.2}s", duration.as_secs_f64());

    Ok(())
}
