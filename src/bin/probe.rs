use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use stremio_ua::models::ContentType;
use stremio_ua::{sources, Config, Session, SourceRegistry};

#[derive(Parser)]
#[command(name = "stremio-ua-probe")]
#[command(about = "Run one scraping pipeline and print its JSON answer")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Source key (uakino, eneyida)
    #[arg(long, short, default_value = "uakino")]
    source: String,

    /// Configuration file (TOML)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List the source's catalogs
    Manifest,
    /// Fetch one catalog page
    Catalog {
        /// Content type (movie, series)
        content_type: ContentType,
        /// Catalog id (e.g., "uakino_series_year")
        catalog_id: String,
        /// Items to skip
        #[arg(long)]
        skip: Option<u32>,
    },
    /// Fetch an item's metadata and videos
    Meta {
        content_type: ContentType,
        /// Item id (e.g., "seriesss/drama/123-name")
        id: String,
    },
    /// Resolve streams for a video id
    Stream {
        content_type: ContentType,
        /// Video id (e.g., "seriesss/drama/123-name/1:5")
        video_id: String,
    },
    /// Write the effective configuration as TOML
    WriteConfig {
        /// Destination file
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter("stremio_ua=info,warn")
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::load()?,
    };

    if let Commands::WriteConfig { path } = &cli.command {
        return config.save(path);
    }

    let registry = SourceRegistry::new(&config.sources);
    let site = registry
        .get(&cli.source)
        .ok_or_else(|| anyhow!("Unknown source '{}', expected one of {:?}", cli.source, registry.keys()))?;
    let session = Session::new(Session::build_client(&config.http)?);

    let output = match cli.command {
        Commands::Manifest => serde_json::to_string_pretty(&site.manifest())?,
        Commands::Catalog { content_type, catalog_id, skip } => {
            let response = sources::catalog(site.as_ref(), &session, content_type, &catalog_id, skip).await;
            info!("📚 {} previews", response.metas.len());
            serde_json::to_string_pretty(&response)?
        }
        Commands::Meta { content_type, id } => {
            let response = sources::meta(site.as_ref(), &session, content_type, &id).await;
            serde_json::to_string_pretty(&response)?
        }
        Commands::Stream { content_type, video_id } => {
            let response = sources::streams(site.as_ref(), &session, content_type, &video_id).await;
            info!("🎬 {} streams", response.streams.len());
            serde_json::to_string_pretty(&response)?
        }
        Commands::WriteConfig { .. } => return Ok(()),
    };

    println!("{}", output);
    Ok(())
}
