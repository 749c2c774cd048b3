// src/main.rs
mod utils;
mod site;
mod extractors;
mod markdown;
mod storage;

use clap::Parser;
use std::path::PathBuf;
use utils::AppError;
use site::client;
use extractors::TutorialExtractor;
use storage::StorageManager;

/// Rips a tutorial page into a Markdown README plus its images
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Tutorial id (appended to --base-url) or a complete URL
    target: String,

    /// Directory in which the tutorial folder is created
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// URL that numeric tutorial ids are appended to
    #[arg(long, default_value = client::DEFAULT_BASE_URL)]
    base_url: String,

    /// Archive mirror that serves the images
    #[arg(long, default_value = client::DEFAULT_ARCHIVE_HOST)]
    archive_host: String,

    /// Debug mode - save the raw page and extracted tutorial JSON
    #[arg(short, long)]
    debug: bool,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // 1. Setup Logging (reads RUST_LOG env var)
    utils::logging::setup_logging();

    // 2. Parse CLI Arguments
    let args = Args::parse();
    tracing::debug!("Starting with args: {:?}", args);

    // 3. Fetch and extract
    let url = client::tutorial_url(&args.target, &args.base_url)?;
    let http = client::build_client()?;

    tracing::info!("Downloading tutorial...");
    let page = client::fetch_page(&http, &url).await?;
    let mut tutorial = TutorialExtractor::new().extract(&page, &url);

    if storage::directory_name(&tutorial.title).is_empty() {
        return Err(AppError::Config(format!("No tutorial title found on {}, cannot name output directory", url)));
    }

    // 4. Claim the output directory, an existing one aborts the run
    let storage = StorageManager::new(&args.output_dir);
    let dir = storage.tutorial_dir(&tutorial)?;
    if !storage.prepare_directory(&dir).await? {
        println!("Output path {} already exists, nothing written", dir.display());
        return Ok(());
    }
    tutorial.directory = Some(dir.clone());

    // 5. README
    tracing::info!("Writing markdown file...");
    let markdown = markdown::render(&tutorial);
    storage.write_markdown(&dir, &markdown).await?;

    if args.debug {
        utils::debug::save_debug_snapshot(&dir, &page, &tutorial)?;
    }

    // 6. Images, one at a time
    tutorial.dedup_images();
    tracing::info!("Downloading {} images...", tutorial.images.len());
    for image in &tutorial.images {
        let filepath = storage.image_path(&dir, image);
        client::download_file(&http, &client::archive_url(image, &args.archive_host), &filepath).await?;
    }

    tracing::info!("Finished ripping '{}' into {}", tutorial.title, dir.display());
    Ok(())
}
