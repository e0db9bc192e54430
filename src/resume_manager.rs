use std::collections::HashSet;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use log::{error, info};
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::collections::Collection;
use crate::error::PersistError;
use crate::hadith::{timestamp_now, Hadith};

#[derive(Serialize)]
struct Checkpoint<'a> {
    collection: &'a str,
    collection_name: &'a str,
    hadiths: &'a [Hadith],
    total: usize,
    last_updated: String,
}

// Only the records matter when resuming
#[derive(Deserialize)]
struct LoadedCheckpoint {
    hadiths: Vec<Hadith>,
}

pub fn checkpoint_path(output_dir: &Path, collection: &Collection) -> PathBuf {
    output_dir.join(format!("{}_progress.json", collection.key))
}

pub struct RecordStore {
    collection: &'static Collection,
    path: PathBuf,
    hadiths: Vec<Hadith>,
    numbers: HashSet<u32>,
}

impl RecordStore {
    pub fn new(collection: &'static Collection, path: impl Into<PathBuf>) -> Self {
        RecordStore {
            collection,
            path: path.into(),
            hadiths: Vec::new(),
            numbers: HashSet::new(),
        }
    }

    pub fn load(collection: &'static Collection, path: impl Into<PathBuf>) -> Self {
        let mut store = Self::new(collection, path);
        if !store.path.exists() {
            info!("No progress file found. Starting fresh.");
            return store;
        }

        let content = match fs::read_to_string(&store.path) {
            Ok(c) => c,
            Err(e) => {
                error!("Could not read progress file {:?}: {}", store.path, e);
                return store;
            }
        };
        match serde_json::from_str::<LoadedCheckpoint>(&content) {
            Ok(checkpoint) => {
                for hadith in checkpoint.hadiths {
                    store.push(hadith);
                }
                info!("Loaded {} previously scraped hadiths", store.len());
            }
            Err(e) => {
                error!("Could not parse progress file {:?}: {}. Starting fresh.", store.path, e);
            }
        }
        store
    }

    pub fn collection(&self) -> &'static Collection {
        self.collection
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn contains(&self, hadith_number: u32) -> bool {
        self.numbers.contains(&hadith_number)
    }

    // false when the number is already stored
    pub fn push(&mut self, hadith: Hadith) -> bool {
        if !self.numbers.insert(hadith.hadith_number) {
            return false;
        }
        self.hadiths.push(hadith);
        true
    }

    pub fn hadiths(&self) -> &[Hadith] {
        &self.hadiths
    }

    pub fn sorted(&self) -> Vec<&Hadith> {
        let mut sorted: Vec<&Hadith> = self.hadiths.iter().collect();
        sorted.sort_by_key(|h| (h.book_number, h.hadith_number));
        sorted
    }

    pub fn len(&self) -> usize {
        self.hadiths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hadiths.is_empty()
    }

    pub fn save(&self) -> Result<(), PersistError> {
        let checkpoint = Checkpoint {
            collection: self.collection.key,
            collection_name: self.collection.name,
            hadiths: &self.hadiths,
            total: self.hadiths.len(),
            last_updated: timestamp_now(),
        };
        let json = serde_json::to_string_pretty(&checkpoint)?;
        write_replacing(&self.path, |file| Ok(file.write_all(json.as_bytes())?))
    }
}

// Written beside `path` and renamed over it, so an interrupted write never
// leaves the previous checkpoint truncated.
fn write_replacing<F>(path: &Path, write: F) -> Result<(), PersistError>
where
    F: FnOnce(&mut File) -> Result<(), PersistError>,
{
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let mut tmp = NamedTempFile::new_in(dir)?;
    write(tmp.as_file_mut())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}
