use chrono::Local;
use serde::{Deserialize, Serialize};

// Field order matches the checkpoint and full JSON exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hadith {
    pub collection: String,
    pub collection_name: String,
    pub hadith_number: u32,
    #[serde(default)]
    pub hadith_number_in_book: Option<u32>,
    #[serde(default)]
    pub reference: String,

    #[serde(default)]
    pub english_text: String,
    #[serde(default)]
    pub arabic_text: String,

    #[serde(default)]
    pub book_number: u32,
    #[serde(default)]
    pub book_name: String,
    #[serde(default)]
    pub chapter_number: u32,
    #[serde(default)]
    pub chapter_name: String,

    #[serde(default)]
    pub grade: String,
    #[serde(default)]
    pub graded_by: String,
    #[serde(default)]
    pub narrator_chain: String,
    #[serde(default)]
    pub primary_narrator: String,

    #[serde(default)]
    pub book_topic: String,
    #[serde(default)]
    pub chapter_topic: String,
    #[serde(default)]
    pub keywords: Vec<String>,

    #[serde(default)]
    pub source_url: String,
    #[serde(default)]
    pub scrape_date: String,
    #[serde(default)]
    pub notes: String,

    #[serde(default)]
    pub related_quran_verses: Vec<String>,
    #[serde(default)]
    pub related_hadiths: Vec<String>,
}

impl Hadith {
    pub fn new(collection: &str, collection_name: &str, hadith_number: u32) -> Self {
        Hadith {
            collection: collection.to_string(),
            collection_name: collection_name.to_string(),
            hadith_number,
            hadith_number_in_book: None,
            reference: String::new(),
            english_text: String::new(),
            arabic_text: String::new(),
            book_number: 0,
            book_name: String::new(),
            chapter_number: 0,
            chapter_name: String::new(),
            grade: String::new(),
            graded_by: String::new(),
            narrator_chain: String::new(),
            primary_narrator: String::new(),
            book_topic: String::new(),
            chapter_topic: String::new(),
            keywords: Vec::new(),
            source_url: String::new(),
            scrape_date: String::new(),
            notes: String::new(),
            related_quran_verses: Vec::new(),
            related_hadiths: Vec::new(),
        }
    }

    pub fn embedding_id(&self) -> String {
        format!("{}:{}", self.collection, self.hadith_number)
    }
}

// e.g. 2025-03-01T14:02:11.123456
pub fn timestamp_now() -> String {
    Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_optional_fields_default_on_load() {
        let json = r#"{"collection":"nawawi40","collection_name":"40 Hadith Nawawi","hadith_number":3}"#;
        let h: Hadith = serde_json::from_str(json).unwrap();
        assert_eq!(h, Hadith::new("nawawi40", "40 Hadith Nawawi", 3));
    }

    #[test]
    fn test_in_book_number_serializes_as_null() {
        let h = Hadith::new("nawawi40", "40 Hadith Nawawi", 3);
        let value = serde_json::to_value(&h).unwrap();
        assert!(value["hadith_number_in_book"].is_null());
        assert_eq!(value["keywords"], serde_json::json!([]));
    }

    #[test]
    fn test_embedding_id() {
        let h = Hadith::new("riyadussalihin", "Riyad as-Salihin", 34);
        assert_eq!(h.embedding_id(), "riyadussalihin:34");
    }

    #[test]
    fn test_timestamp_format() {
        let ts = timestamp_now();
        assert_eq!(ts.len(), "2025-03-01T14:02:11.123456".len());
        assert_eq!(&ts[10..11], "T");
    }
}
