use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;
use serde::Serialize;

use crate::error::PersistError;
use crate::hadith::{timestamp_now, Hadith};
use crate::resume_manager::RecordStore;

#[derive(Serialize)]
struct FullExport<'a> {
    collection: &'a str,
    collection_name: &'a str,
    total_hadiths: usize,
    export_date: String,
    hadiths: Vec<&'a Hadith>,
}

#[derive(Serialize)]
struct EmbeddingRecord<'a> {
    id: String,
    collection: &'a str,
    collection_name: &'a str,
    reference: &'a str,
    text: &'a str,
    arabic: &'a str,
    metadata: EmbeddingMetadata<'a>,
}

#[derive(Serialize)]
struct EmbeddingMetadata<'a> {
    book_number: u32,
    book_name: &'a str,
    book_topic: &'a str,
    chapter_name: &'a str,
    chapter_topic: &'a str,
    grade: &'a str,
    graded_by: &'a str,
    narrator: &'a str,
    keywords: &'a [String],
    url: &'a str,
}

impl<'a> EmbeddingRecord<'a> {
    fn from_hadith(collection: &'a str, h: &'a Hadith) -> Self {
        EmbeddingRecord {
            id: h.embedding_id(),
            collection,
            collection_name: &h.collection_name,
            reference: &h.reference,
            text: &h.english_text,
            arabic: &h.arabic_text,
            metadata: EmbeddingMetadata {
                book_number: h.book_number,
                book_name: &h.book_name,
                book_topic: &h.book_topic,
                chapter_name: &h.chapter_name,
                chapter_topic: &h.chapter_topic,
                grade: &h.grade,
                graded_by: &h.graded_by,
                narrator: &h.primary_narrator,
                keywords: &h.keywords,
                url: &h.source_url,
            },
        }
    }
}

pub fn pipe_line(h: &Hadith) -> String {
    format!("{:03}|{:04}|{}", h.book_number, h.hadith_number, h.english_text)
}

pub fn export_pipe(store: &RecordStore, output_dir: &Path) -> Result<PathBuf, PersistError> {
    let path = output_dir.join(format!("{}.txt", store.collection().key));
    let mut writer = BufWriter::new(File::create(&path)?);
    for hadith in store.sorted() {
        writeln!(writer, "{}", pipe_line(hadith))?;
    }
    writer.flush()?;
    info!("Exported pipe format: {:?}", path);
    Ok(path)
}

pub fn export_json(store: &RecordStore, output_dir: &Path) -> Result<PathBuf, PersistError> {
    let collection = store.collection();
    let path = output_dir.join(format!("{}-full.json", collection.key));
    let hadiths = store.sorted();
    let export = FullExport {
        collection: collection.key,
        collection_name: collection.name,
        total_hadiths: hadiths.len(),
        export_date: timestamp_now(),
        hadiths,
    };

    let mut writer = BufWriter::new(File::create(&path)?);
    serde_json::to_writer_pretty(&mut writer, &export)?;
    writer.flush()?;
    info!("Exported JSON: {:?}", path);
    Ok(path)
}

pub fn export_for_embedding(store: &RecordStore, output_dir: &Path) -> Result<PathBuf, PersistError> {
    let collection = store.collection();
    let path = output_dir.join(format!("{}-for-embedding.jsonl", collection.key));
    let mut writer = BufWriter::new(File::create(&path)?);
    for hadith in store.sorted() {
        let record = EmbeddingRecord::from_hadith(collection.key, hadith);
        serde_json::to_writer(&mut writer, &record)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    info!("Exported for embedding: {:?}", path);
    Ok(path)
}

pub fn export_all(store: &RecordStore, output_dir: &Path) -> Result<Vec<PathBuf>, PersistError> {
    Ok(vec![
        export_pipe(store, output_dir)?,
        export_json(store, output_dir)?,
        export_for_embedding(store, output_dir)?,
    ])
}
