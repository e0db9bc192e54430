use std::fs;

use anyhow::{anyhow, Context, Result};
use clap::Parser;
use log::info;

use hadith_scraper_lib::{cli::Args, collections, crawler, exporter, logger, resume_manager};
use hadith_scraper_lib::{RecordStore, Scraper};

fn main() -> Result<()> {
    let args = Args::parse();
    logger::init(logger::level_from_flags(args.verbose, args.quiet));

    let collection = collections::find(&args.collection).ok_or_else(|| {
        anyhow!(
            "Unknown collection: {}. Available: {}",
            args.collection,
            collections::keys().collect::<Vec<_>>().join(", ")
        )
    })?;
    info!("Hadith Scraper - {}", collection.name);

    // 1. Output directory and resume state
    fs::create_dir_all(&args.output_dir)
        .with_context(|| format!("creating output directory {:?}", args.output_dir))?;
    let mut store = RecordStore::load(
        collection,
        resume_manager::checkpoint_path(&args.output_dir, collection),
    );

    // 2. Crawl
    let scraper = Scraper::new(collection).context("building HTTP client")?;
    crawler::crawl(&scraper, &mut store, &args.crawl_config());

    // 3. Export in all formats
    exporter::export_all(&store, &args.output_dir).context("writing exports")?;
    info!("All exports completed!");
    Ok(())
}
