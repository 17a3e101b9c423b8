//! CLI entry point for prismic-blog

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "prismic-blog")]
#[command(version)]
#[command(about = "A server-rendered blog backed by the Prismic content API", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Pre-render the listing and the most recent posts
    #[command(alias = "b")]
    Build,

    /// Pre-render, then serve the site
    #[command(alias = "s")]
    Server {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// List posts as the listing page shows them
    List {
        /// Follow the pagination cursor to the last page
        #[arg(short, long)]
        all: bool,
    },

    /// Clean the public folder
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "prismic_blog=debug,info"
    } else {
        "prismic_blog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Build => {
            let blog = prismic_blog::Blog::new(&base_dir)?;
            tracing::info!("Pre-rendering pages...");
            blog.build().await?;
            println!("Generated successfully!");
        }

        Commands::Server { port, ip } => {
            let blog = prismic_blog::Blog::new(&base_dir)?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            prismic_blog::server::start(&blog, &ip, port).await?;
        }

        Commands::List { all } => {
            let blog = prismic_blog::Blog::new(&base_dir)?;
            prismic_blog::commands::list::run(&blog, all).await?;
        }

        Commands::Clean => {
            let blog = prismic_blog::Blog::new(&base_dir)?;
            tracing::info!("Cleaning public folder...");
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("prismic-blog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
