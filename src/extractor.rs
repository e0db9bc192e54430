use std::collections::BTreeSet;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::collections::Collection;
use crate::hadith::{timestamp_now, Hadith};

const KEYWORD_TERMS: &[&str] = &[
    "prayer", "salat", "fasting", "ramadan", "zakah", "charity",
    "hajj", "pilgrimage", "faith", "belief", "prophet", "messenger",
    "quran", "revelation", "heaven", "paradise", "hell", "judgment",
    "angel", "satan", "worship", "repentance", "forgiveness",
    "marriage", "divorce", "inheritance", "jihad", "knowledge",
    "patience", "gratitude", "humility", "sincerity", "intention",
];

const PREFERRED_GRADER: &str = "Albani";

struct Selectors {
    english: Selector,
    arabic: Selector,
    narrator: Selector,
    reference_table: Selector,
    grading_table: Selector,
    row: Selector,
    cell: Selector,
    book_name: Selector,
    book_number: Selector,
    breadcrumb: Selector,
    breadcrumb_item: Selector,
    link: Selector,
    chapter_block: Selector,
    chapter_number: Selector,
    chapter_name: Selector,
}

fn selector(css: &'static str) -> Selector {
    Selector::parse(css).expect("static selector is valid")
}

fn regex(pattern: &'static str) -> Regex {
    Regex::new(pattern).expect("static regex is valid")
}

impl Selectors {
    fn new() -> Self {
        Selectors {
            english: selector("div.text_details"),
            arabic: selector("div.arabic_hadith_full"),
            narrator: selector("div.hadith_narrated"),
            reference_table: selector("table.hadith_reference"),
            grading_table: selector("table.hadith_grading"),
            row: selector("tr"),
            cell: selector("td"),
            book_name: selector("div.book_page_english_name"),
            book_number: selector("div.book_page_number"),
            breadcrumb: selector("ol.breadcrumb"),
            breadcrumb_item: selector("li"),
            link: selector("a"),
            chapter_block: selector("div.chapter"),
            chapter_number: selector(".echapno"),
            chapter_name: selector("div.englishchapter"),
        }
    }
}

#[derive(Debug, Default, PartialEq)]
struct References {
    reference: String,
    book_number: u32,
    hadith_number_in_book: Option<u32>,
}

#[derive(Debug, Default, PartialEq)]
struct Section {
    name: String,
    topic: String,
    number: u32,
}

/// Pulls the fields of a [`Hadith`] out of a sunnah.com page.
///
/// Every field group is recovered through an ordered cascade of markup
/// locations. A group whose whole cascade misses is left at its default;
/// extraction itself never fails.
pub struct Extractor {
    selectors: Selectors,
    whitespace_regex: Regex,
    narrated_regex: Regex,
    book_ref_regex: Regex,
    hadith_ref_regex: Regex,
    digits_regex: Regex,
    href_number_regex: Regex,
    chapter_number_regex: Regex,
    chapter_prefix_regex: Regex,
    topic_prefix_regex: Regex,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    pub fn new() -> Self {
        Extractor {
            selectors: Selectors::new(),
            whitespace_regex: regex(r"\s+"),
            narrated_regex: regex(r"Narrated\s+([^:]+)"),
            book_ref_regex: regex(r"Book\s+(\d+)"),
            hadith_ref_regex: regex(r"Hadith\s+(\d+)"),
            digits_regex: regex(r"(\d+)"),
            href_number_regex: regex(r"/(\d+)/?$"),
            // Chapter numbers are rendered as "(35)"
            chapter_number_regex: regex(r"\((\d+)\)"),
            chapter_prefix_regex: regex(r"(?i)^Chapter:\s*"),
            topic_prefix_regex: regex(r"(?i)^(Book\s+of|Book\s+\d+:|Chapter:|\d+\s*-)\s*"),
        }
    }

    pub fn extract(
        &self,
        document: &Html,
        container: ElementRef<'_>,
        collection: &Collection,
        hadith_number: u32,
        source_url: &str,
    ) -> Hadith {
        let english_text = self.first_text_in(container, &self.selectors.english);
        let arabic_text = self.first_text_in(container, &self.selectors.arabic);
        let narrator_chain = self.first_text_in(container, &self.selectors.narrator);
        let primary_narrator = self.extract_primary_narrator(&narrator_chain);

        let refs = self.extract_references(document);
        let book = self.extract_book(document, refs.book_number);
        let chapter = self.extract_chapter(document);
        let (grade, graded_by) = self.extract_grade(document, collection.default_grade);
        let keywords = self.extract_keywords(&book.name, &chapter.name);

        let reference = if refs.reference.is_empty() {
            format!("{} {}", collection.name, hadith_number)
        } else {
            refs.reference
        };

        Hadith {
            hadith_number_in_book: refs.hadith_number_in_book,
            reference,
            english_text,
            arabic_text,
            book_number: book.number,
            book_name: book.name,
            chapter_number: chapter.number,
            chapter_name: chapter.name,
            grade,
            graded_by,
            narrator_chain,
            primary_narrator,
            book_topic: book.topic,
            chapter_topic: chapter.topic,
            keywords,
            source_url: source_url.to_string(),
            scrape_date: timestamp_now(),
            ..Hadith::new(collection.key, collection.name, hadith_number)
        }
    }

    pub fn clean_text(&self, text: &str) -> String {
        self.whitespace_regex
            .replace_all(text, " ")
            .trim()
            .replace('|', "/")
    }

    pub fn extract_topic(&self, text: &str) -> String {
        let topic = self.topic_prefix_regex.replace(text, "");
        topic.split(',').next().unwrap_or_default().trim().to_string()
    }

    pub fn extract_keywords(&self, book_name: &str, chapter_name: &str) -> Vec<String> {
        let combined = format!("{} {}", book_name, chapter_name).to_lowercase();
        KEYWORD_TERMS
            .iter()
            .filter(|term| combined.contains(*term))
            .map(|term| term.to_string())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    pub fn extract_primary_narrator(&self, narrator_chain: &str) -> String {
        self.narrated_regex
            .captures(narrator_chain)
            .and_then(|cap| cap.get(1))
            .map(|m| m.as_str().trim().to_string())
            .unwrap_or_default()
    }

    fn extract_references(&self, document: &Html) -> References {
        let mut refs = References::default();
        let Some(table) = document.select(&self.selectors.reference_table).next() else {
            return refs;
        };

        for row in table.select(&self.selectors.row) {
            let cells: Vec<_> = row.select(&self.selectors.cell).collect();
            if cells.len() < 2 {
                continue;
            }
            let label = stripped_text(cells[0]);
            let value = stripped_text(cells[1]);
            let label_key = label.trim_end_matches(':').trim().to_lowercase();

            if label_key == "reference" {
                refs.reference = value.replace(':', "").trim().to_string();
            } else if label_key.contains("in-book reference") {
                if let Some(n) = capture_number(&self.book_ref_regex, &value) {
                    refs.book_number = n;
                }
                if let Some(n) = capture_number(&self.hadith_ref_regex, &value) {
                    refs.hadith_number_in_book = Some(n);
                }
            }
        }
        refs
    }

    fn extract_book(&self, document: &Html, mut book_number: u32) -> Section {
        // 1. Dedicated book header
        if let Some(name_div) = document.select(&self.selectors.book_name).next() {
            let name = self.clean_text(&full_text(name_div));
            if book_number == 0 {
                if let Some(num_div) = document.select(&self.selectors.book_number).next() {
                    if let Some(n) = capture_number(&self.digits_regex, &stripped_text(num_div)) {
                        book_number = n;
                    }
                }
            }
            if !name.is_empty() {
                return Section { topic: self.extract_topic(&name), name, number: book_number };
            }
        }

        // 2. Third-from-last breadcrumb entry
        let crumbs = self.breadcrumbs(document);
        if crumbs.len() >= 3 {
            let book_elem = crumbs[crumbs.len() - 3];
            let name = self.clean_text(&full_text(book_elem));
            if book_number == 0 {
                let href_number = book_elem
                    .select(&self.selectors.link)
                    .next()
                    .and_then(|a| a.value().attr("href"))
                    .and_then(|href| capture_number(&self.href_number_regex, href));
                if let Some(n) = href_number {
                    book_number = n;
                }
            }
            return Section { topic: self.extract_topic(&name), name, number: book_number };
        }

        Section { number: book_number, ..Section::default() }
    }

    fn extract_chapter(&self, document: &Html) -> Section {
        let mut chapter = Section::default();

        // 1. Chapter block preceding the hadith
        if let Some(block) = document.select(&self.selectors.chapter_block).next() {
            if let Some(num) = block.select(&self.selectors.chapter_number).next() {
                if let Some(n) = capture_number(&self.chapter_number_regex, &stripped_text(num)) {
                    chapter.number = n;
                }
            }
            if let Some(name_div) = block.select(&self.selectors.chapter_name).next() {
                self.fill_chapter_name(&mut chapter, name_div);
            }
        }

        // 2. Same elements anywhere on the page
        if chapter.name.is_empty() {
            if let Some(num) = document.select(&self.selectors.chapter_number).next() {
                if let Some(n) = capture_number(&self.chapter_number_regex, &stripped_text(num)) {
                    chapter.number = n;
                }
            }
            if let Some(name_div) = document.select(&self.selectors.chapter_name).next() {
                self.fill_chapter_name(&mut chapter, name_div);
            }
        }

        // 3. Second-from-last breadcrumb entry
        if chapter.name.is_empty() {
            let crumbs = self.breadcrumbs(document);
            if crumbs.len() >= 4 {
                let name = self.clean_text(&full_text(crumbs[crumbs.len() - 2]));
                chapter.topic = self.extract_topic(&name);
                chapter.name = name;
            }
        }

        chapter
    }

    fn fill_chapter_name(&self, chapter: &mut Section, name_div: ElementRef<'_>) {
        let name = self.clean_text(&full_text(name_div));
        chapter.topic = self.extract_topic(&name);
        chapter.name = self.chapter_prefix_regex.replace(&name, "").into_owned();
    }

    fn extract_grade(&self, document: &Html, default_grade: &str) -> (String, String) {
        let mut first = None;
        if let Some(table) = document.select(&self.selectors.grading_table).next() {
            for row in table.select(&self.selectors.row) {
                let cells: Vec<_> = row.select(&self.selectors.cell).collect();
                if cells.len() < 2 {
                    continue;
                }
                let scholar = self.clean_text(&full_text(cells[0]));
                let grade = self.clean_text(&full_text(cells[1]));
                if scholar.contains(PREFERRED_GRADER) {
                    return (grade, scholar);
                }
                if first.is_none() {
                    first = Some((grade, scholar));
                }
            }
        }
        first.unwrap_or_else(|| (default_grade.to_string(), String::new()))
    }

    fn breadcrumbs<'a>(&self, document: &'a Html) -> Vec<ElementRef<'a>> {
        document
            .select(&self.selectors.breadcrumb)
            .next()
            .map(|ol| ol.select(&self.selectors.breadcrumb_item).collect())
            .unwrap_or_default()
    }

    fn first_text_in(&self, scope: ElementRef<'_>, selector: &Selector) -> String {
        scope
            .select(selector)
            .next()
            .map(|el| self.clean_text(&full_text(el)))
            .unwrap_or_default()
    }
}

fn full_text(el: ElementRef<'_>) -> String {
    el.text().collect()
}

fn stripped_text(el: ElementRef<'_>) -> String {
    el.text().map(str::trim).collect()
}

fn capture_number(re: &Regex, text: &str) -> Option<u32> {
    re.captures(text)
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
