use std::path::PathBuf;
use std::time::Duration;

use clap::builder::PossibleValuesParser;
use clap::Parser;

use crate::collections;
use crate::crawler::CrawlConfig;

/// Scrape hadith collections from sunnah.com.
#[derive(Parser, Debug)]
#[command(name = "hadith_scraper")]
#[command(author, version, about)]
pub struct Args {
    /// Hadith collection to scrape
    #[arg(value_parser = PossibleValuesParser::new(collections::keys()))]
    pub collection: String,

    /// Starting hadith number
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    pub start: u32,

    /// Ending hadith number (default: collection max)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub end: Option<u32>,

    /// Delay between requests in seconds
    #[arg(long, default_value = "0.1", value_parser = parse_delay)]
    pub delay: Duration,

    /// Output directory
    #[arg(long, default_value = "./data")]
    pub output_dir: PathBuf,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    pub fn crawl_config(&self) -> CrawlConfig {
        CrawlConfig {
            start: self.start,
            end: self.end,
            delay: self.delay,
        }
    }
}

fn parse_delay(raw: &str) -> Result<Duration, String> {
    let secs: f64 = raw
        .parse()
        .map_err(|_| format!("'{}' is not a number of seconds", raw))?;
    Duration::try_from_secs_f64(secs).map_err(|_| format!("delay must be a non-negative number of seconds, got {}", raw))
}
