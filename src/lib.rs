pub mod cli;
pub mod collections;
pub mod crawler;
pub mod delay_manager;
pub mod error;
pub mod exporter;
pub mod extractor;
pub mod hadith;
pub mod logger;
pub mod resume_manager;
pub mod scraper;

// Exporting types for convenience
pub use collections::{Collection, HADITH_COLLECTIONS};
pub use crawler::{crawl, CrawlConfig, CrawlSummary};
pub use error::{FetchError, PersistError};
pub use extractor::Extractor;
pub use hadith::Hadith;
pub use resume_manager::RecordStore;
pub use scraper::{HadithSource, Scraper};
