use std::time::Duration;

use log::{error, info, warn};

use crate::delay_manager;
use crate::resume_manager::RecordStore;
use crate::scraper::HadithSource;

pub const CHECKPOINT_EVERY: usize = 10;

pub const DEFAULT_DELAY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq)]
pub struct CrawlConfig {
    pub start: u32,
    // inclusive; None means the collection total
    pub end: Option<u32>,
    pub delay: Duration,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        CrawlConfig { start: 1, end: None, delay: DEFAULT_DELAY }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub total_stored: usize,
}

impl CrawlSummary {
    pub fn processed(&self) -> usize {
        self.succeeded + self.failed
    }
}

pub fn crawl<S: HadithSource>(source: &S, store: &mut RecordStore, config: &CrawlConfig) -> CrawlSummary {
    let collection = store.collection();
    let end = config.end.unwrap_or(collection.total_hadiths);

    info!("Scraping: {}", collection.name);
    info!("Range: {} to {}", config.start, end);
    info!("Delay: {:.2}s between requests", config.delay.as_secs_f64());
    if end < config.start {
        warn!("End {} is before start {}; nothing to scrape.", end, config.start);
    }

    let mut summary = CrawlSummary::default();

    for hadith_number in config.start..=end {
        if store.contains(hadith_number) {
            info!("Skipping {} (already scraped)", hadith_number);
            summary.skipped += 1;
            continue;
        }

        info!("Scraping hadith {}...", hadith_number);
        match source.fetch_hadith(hadith_number) {
            Ok(hadith) => {
                info!("Scraped {}", hadith.reference);
                store.push(hadith);
                summary.succeeded += 1;
            }
            Err(e) => {
                warn!("Failed to scrape hadith {}: {}", hadith_number, e);
                summary.failed += 1;
            }
        }

        if summary.processed() % CHECKPOINT_EVERY == 0 {
            checkpoint(store);
        }

        delay_manager::request_delay(config.delay);
    }

    checkpoint(store);
    summary.total_stored = store.len();

    info!("Scraping complete. Total hadiths: {}", summary.total_stored);
    info!("Successful: {} | Failed: {} | Skipped: {}", summary.succeeded, summary.failed, summary.skipped);
    summary
}

fn checkpoint(store: &RecordStore) {
    match store.save() {
        Ok(()) => info!("Progress: {} hadiths saved", store.len()),
        Err(e) => error!("Could not save progress to {:?}: {}", store.path(), e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::{self, Collection};
    use crate::error::FetchError;
    use crate::hadith::Hadith;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::fs;
    use tempfile::tempdir;

    // Serves every number except those in `missing`, recording each request.
    struct FakeSource {
        missing: HashSet<u32>,
        requested: RefCell<Vec<u32>>,
    }

    impl FakeSource {
        fn new(missing: &[u32]) -> Self {
            FakeSource {
                missing: missing.iter().copied().collect(),
                requested: RefCell::new(Vec::new()),
            }
        }
    }

    impl HadithSource for FakeSource {
        fn fetch_hadith(&self, hadith_number: u32) -> Result<Hadith, FetchError> {
            self.requested.borrow_mut().push(hadith_number);
            if self.missing.contains(&hadith_number) {
                return Err(FetchError::MissingContainer);
            }
            Ok(Hadith {
                english_text: format!("fetched {}", hadith_number),
                ..Hadith::new("nawawi40", "40 Hadith Nawawi", hadith_number)
            })
        }
    }

    fn nawawi() -> &'static Collection {
        collections::find("nawawi40").unwrap()
    }

    fn config(start: u32, end: u32) -> CrawlConfig {
        CrawlConfig { start, end: Some(end), delay: Duration::ZERO }
    }

    #[test]
    fn test_crawl_counts_successes_and_failures() {
        let dir = tempdir().unwrap();
        let mut store = RecordStore::new(nawawi(), dir.path().join("p.json"));
        let source = FakeSource::new(&[3]);

        let summary = crawl(&source, &mut store, &config(1, 5));

        assert_eq!(summary.succeeded, 4);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 0);
        assert_eq!(summary.total_stored, 4);
        assert!(!store.contains(3));
        assert!(dir.path().join("p.json").exists());
    }

    #[test]
    fn test_crawl_skips_loaded_ids_without_altering_them() {
        let dir = tempdir().unwrap();
        let mut store = RecordStore::new(nawawi(), dir.path().join("p.json"));
        let original = Hadith {
            english_text: "stored earlier".to_string(),
            ..Hadith::new("nawawi40", "40 Hadith Nawawi", 2)
        };
        store.push(original.clone());
        let source = FakeSource::new(&[]);

        let summary = crawl(&source, &mut store, &config(1, 3));

        assert_eq!(*source.requested.borrow(), vec![1, 3]);
        assert_eq!(summary.skipped, 1);
        assert_eq!(store.len(), 3);
        let kept: Vec<_> = store.hadiths().iter().filter(|h| h.hadith_number == 2).collect();
        assert_eq!(kept, vec![&original]);
    }

    #[test]
    fn test_crawl_default_end_is_collection_total() {
        let dir = tempdir().unwrap();
        let mut store = RecordStore::new(nawawi(), dir.path().join("p.json"));
        let source = FakeSource::new(&[]);
        let cfg = CrawlConfig { start: 40, end: None, delay: Duration::ZERO };

        crawl(&source, &mut store, &cfg);

        assert_eq!(*source.requested.borrow(), vec![40, 41, 42]);
    }

    #[test]
    fn test_crawl_checkpoints_every_ten_processed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("p.json");
        let mut store = RecordStore::new(nawawi(), &path);

        // Fails on 10 so the tenth processed id is a failure; the checkpoint still fires.
        struct CheckingSource<'a> {
            inner: FakeSource,
            path: &'a std::path::Path,
            seen_checkpoint_at: RefCell<Option<u32>>,
        }
        impl HadithSource for CheckingSource<'_> {
            fn fetch_hadith(&self, n: u32) -> Result<Hadith, FetchError> {
                if self.seen_checkpoint_at.borrow().is_none() && self.path.exists() {
                    *self.seen_checkpoint_at.borrow_mut() = Some(n);
                }
                self.inner.fetch_hadith(n)
            }
        }
        let source = CheckingSource {
            inner: FakeSource::new(&[10]),
            path: &path,
            seen_checkpoint_at: RefCell::new(None),
        };

        crawl(&source, &mut store, &config(1, 12));

        assert_eq!(*source.seen_checkpoint_at.borrow(), Some(11));
        let saved: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(saved["total"], 11);
    }

    #[test]
    fn test_rerun_does_not_duplicate() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("p.json");
        let mut store = RecordStore::new(nawawi(), &path);
        crawl(&FakeSource::new(&[]), &mut store, &config(1, 4));

        let mut resumed = RecordStore::load(nawawi(), &path);
        let source = FakeSource::new(&[]);
        let summary = crawl(&source, &mut resumed, &config(1, 6));

        assert_eq!(*source.requested.borrow(), vec![5, 6]);
        assert_eq!(summary.skipped, 4);
        assert_eq!(resumed.len(), 6);
        assert_eq!(&resumed.hadiths()[..4], store.hadiths());
    }

    #[test]
    fn test_failed_checkpoint_does_not_stop_crawl() {
        let dir = tempdir().unwrap();
        let mut store = RecordStore::new(nawawi(), dir.path().join("missing").join("p.json"));
        let source = FakeSource::new(&[]);

        let summary = crawl(&source, &mut store, &config(1, 12));

        assert_eq!(*source.requested.borrow(), (1..=12).collect::<Vec<_>>());
        assert_eq!(summary.succeeded, 12);
        assert_eq!(summary.total_stored, 12);
        assert!(!dir.path().join("missing").exists());
    }

    #[test]
    fn test_empty_range() {
        let dir = tempdir().unwrap();
        let mut store = RecordStore::new(nawawi(), dir.path().join("p.json"));
        let source = FakeSource::new(&[]);
        let summary = crawl(&source, &mut store, &config(5, 4));
        assert_eq!(summary, CrawlSummary::default());
        assert!(source.requested.borrow().is_empty());
    }
}
