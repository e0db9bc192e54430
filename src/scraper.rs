use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use scraper::{Html, Selector};
use url::Url;

use crate::collections::Collection;
use crate::error::FetchError;
use crate::extractor::Extractor;
use crate::hadith::Hadith;

pub const BASE_URL: &str = "https://sunnah.com";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub trait HadithSource {
    fn fetch_hadith(&self, hadith_number: u32) -> Result<Hadith, FetchError>;
}

pub struct Scraper {
    client: Client,
    extractor: Extractor,
    container_selector: Selector,
    collection: &'static Collection,
    base_url: String,
}

impl Scraper {
    pub fn new(collection: &'static Collection) -> Result<Self, FetchError> {
        Self::with_base_url(collection, BASE_URL)
    }

    pub fn with_base_url(collection: &'static Collection, base_url: &str) -> Result<Self, FetchError> {
        Url::parse(base_url).map_err(|source| FetchError::InvalidBaseUrl {
            url: base_url.to_string(),
            source,
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static("Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36"),
        );
        headers.insert(
            ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml,application/xml;q=0.9"),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-GB,en-US;q=0.9,en;q=0.8"));

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .default_headers(headers)
            .cookie_store(true)
            .build()?;

        Ok(Scraper {
            client,
            extractor: Extractor::new(),
            container_selector: Selector::parse("div.actualHadithContainer")
                .expect("static selector is valid"),
            collection,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn collection(&self) -> &'static Collection {
        self.collection
    }

    pub fn hadith_url(&self, hadith_number: u32) -> String {
        format!("{}/{}:{}", self.base_url, self.collection.key, hadith_number)
    }

    pub fn parse_page(&self, html: &str, hadith_number: u32, url: &str) -> Result<Hadith, FetchError> {
        let document = Html::parse_document(html);
        let container = document
            .select(&self.container_selector)
            .next()
            .ok_or(FetchError::MissingContainer)?;
        Ok(self
            .extractor
            .extract(&document, container, self.collection, hadith_number, url))
    }

    fn visit_page(&self, url: &str) -> Result<String, FetchError> {
        let resp = self.client.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status(status));
        }
        Ok(resp.text()?)
    }
}

impl HadithSource for Scraper {
    fn fetch_hadith(&self, hadith_number: u32) -> Result<Hadith, FetchError> {
        let url = self.hadith_url(hadith_number);
        debug!("GET {}", url);
        let html = self.visit_page(&url)?;
        self.parse_page(&html, hadith_number, &url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections;

    fn scraper() -> Scraper {
        Scraper::new(collections::find("riyadussalihin").unwrap()).unwrap()
    }

    #[test]
    fn test_hadith_url() {
        assert_eq!(scraper().hadith_url(34), "https://sunnah.com/riyadussalihin:34");
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let s = Scraper::with_base_url(collections::find("nawawi40").unwrap(), "http://localhost:8080/").unwrap();
        assert_eq!(s.hadith_url(1), "http://localhost:8080/nawawi40:1");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = Scraper::with_base_url(collections::find("nawawi40").unwrap(), "not a url");
        assert!(matches!(result, Err(FetchError::InvalidBaseUrl { .. })));
    }

    #[test]
    fn test_parse_page_without_container() {
        let result = scraper().parse_page("<html><body><p>Not found</p></body></html>", 9999, "u");
        assert!(matches!(result, Err(FetchError::MissingContainer)));
    }

    #[test]
    fn test_parse_page_with_container() {
        let html = r#"<div class="actualHadithContainer"><div class="text_details">Text</div></div>"#;
        let h = scraper().parse_page(html, 5, "u").unwrap();
        assert_eq!(h.hadith_number, 5);
        assert_eq!(h.english_text, "Text");
        assert_eq!(h.reference, "Riyad as-Salihin 5");
    }
}
