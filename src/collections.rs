#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Collection {
    pub key: &'static str,
    pub name: &'static str,
    pub total_hadiths: u32,
    pub books: u32,
    pub default_grade: &'static str,
}

pub const HADITH_COLLECTIONS: &[Collection] = &[
    Collection { key: "bukhari", name: "Sahih Bukhari", total_hadiths: 7563, books: 97, default_grade: "Sahih" },
    Collection { key: "muslim", name: "Sahih Muslim", total_hadiths: 7563, books: 56, default_grade: "Sahih" },
    Collection { key: "abudawud", name: "Sunan Abi Dawud", total_hadiths: 5274, books: 43, default_grade: "Various" },
    Collection { key: "tirmidhi", name: "Jami` at-Tirmidhi", total_hadiths: 3956, books: 51, default_grade: "Various" },
    Collection { key: "nasai", name: "Sunan an-Nasa'i", total_hadiths: 5758, books: 51, default_grade: "Various" },
    Collection { key: "ibnmajah", name: "Sunan Ibn Majah", total_hadiths: 4341, books: 37, default_grade: "Various" },
    Collection { key: "malik", name: "Muwatta Malik", total_hadiths: 1594, books: 61, default_grade: "Various" },
    Collection { key: "riyadussalihin", name: "Riyad as-Salihin", total_hadiths: 1896, books: 19, default_grade: "Sahih" },
    Collection { key: "nawawi40", name: "40 Hadith Nawawi", total_hadiths: 42, books: 1, default_grade: "Sahih" },
    Collection { key: "bulugh", name: "Bulugh al-Maram", total_hadiths: 1358, books: 16, default_grade: "Various" },
];

pub fn find(key: &str) -> Option<&'static Collection> {
    HADITH_COLLECTIONS.iter().find(|c| c.key == key)
}

pub fn keys() -> impl Iterator<Item = &'static str> {
    HADITH_COLLECTIONS.iter().map(|c| c.key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_find_known_collection() {
        let c = find("riyadussalihin").unwrap();
        assert_eq!(c.name, "Riyad as-Salihin");
        assert_eq!(c.total_hadiths, 1896);
        assert_eq!(c.default_grade, "Sahih");
    }

    #[test]
    fn test_find_unknown_collection() {
        assert!(find("unknown").is_none());
        assert!(find("").is_none());
    }

    #[test]
    fn test_keys_are_unique() {
        let all: Vec<_> = keys().collect();
        let unique: HashSet<_> = all.iter().collect();
        assert_eq!(all.len(), unique.len());
        assert!(all.contains(&"nawawi40"));
    }
}
