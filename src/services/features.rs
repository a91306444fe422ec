//! Feature extraction from raw content records.
//!
//! Converts one [`ContentRecord`] into the normalized semantic fields the
//! encoder consumes: keyword lists, categorical codes, multi-valued lists
//! and numeric scalars. Extraction always fails open: a missing or
//! malformed field yields an empty list or `None`, never an error.

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::models::{ContentRecord, ContentType};

/// English stop words removed before keyword counting.
///
/// Mirrors the NLTK English list the training corpus was built with.
const ENGLISH_STOP_WORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

static STOP_WORDS: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| ENGLISH_STOP_WORDS.iter().copied().collect());

/// Non-standard language codes mapped to their ISO 639-1 equivalents.
/// `xx` is a placeholder for "unknown" and maps to no language at all.
pub fn normalize_language(code: &str) -> Option<String> {
    match code {
        "cn" => Some("zh".to_string()),
        "mo" => Some("ro".to_string()),
        "sh" => Some("sr".to_string()),
        "xx" => None,
        other => Some(other.to_string()),
    }
}

/// Normalized semantic fields for one record, ready for vocabulary
/// filtering and encoding.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedFeatures {
    pub title_keywords: Vec<String>,
    pub overview_keywords: Vec<String>,
    /// Raw genre names, original casing; validated and lowercased by the
    /// vocabulary filter
    pub genres: Vec<String>,
    /// Lowercased country codes (movies) or names (TV)
    pub countries: Vec<String>,
    pub cast: Vec<i64>,
    pub director: Option<i64>,
    /// First creator's id (or name when the id is absent), TV only
    pub creator: Option<String>,
    /// Normalized original language code
    pub language: Option<String>,
    pub release_year: Option<f64>,
    pub popularity: Option<f64>,
    pub vote_average: Option<f64>,
    pub episodes: Option<f64>,
    pub seasons: Option<f64>,
}

/// Up to 3 most frequent keywords of a text, most frequent first.
///
/// Tokens are lowercased whitespace-delimited words with surrounding
/// punctuation stripped; a word with interior punctuation (`sci-fi`)
/// is discarded whole, never split into fragments. Ties keep
/// first-encounter order (the sort is stable). Empty or absent text
/// yields an empty list.
pub fn extract_keywords(text: Option<&str>) -> Vec<String> {
    let Some(text) = text else {
        return Vec::new();
    };

    let lowered = text.to_lowercase();

    // Frequency counting in a Vec keeps first-encounter order for the
    // stable tie-break; keyword counts are tiny.
    let mut counts: Vec<(&str, usize)> = Vec::new();
    for word in lowered.split_whitespace() {
        let token = word.trim_matches(|c: char| !c.is_alphanumeric());
        if token.is_empty()
            || !token.chars().all(char::is_alphanumeric)
            || STOP_WORDS.contains(token)
        {
            continue;
        }
        match counts.iter_mut().find(|(word, _)| *word == token) {
            Some(entry) => entry.1 += 1,
            None => counts.push((token, 1)),
        }
    }

    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
        .into_iter()
        .take(3)
        .map(|(word, _)| word.to_string())
        .collect()
}

/// Id of the first crew member whose job is exactly "Director"
pub fn find_director_id(record: &ContentRecord) -> Option<i64> {
    record
        .crew
        .iter()
        .find(|member| member.job.as_deref() == Some("Director"))
        .and_then(|member| member.id)
}

/// First creator's id rendered as a string, falling back to the name
fn find_creator(record: &ContentRecord) -> Option<String> {
    record
        .created_by
        .first()
        .and_then(|creator| creator.id.map(|id| id.to_string()).or_else(|| creator.name.clone()))
}

/// First 4 characters of a date string parsed as a year
fn extract_release_year(date: Option<&str>) -> Option<f64> {
    let date = date?;
    let year: String = date.chars().take(4).collect();
    year.parse().ok()
}

/// Extracts normalized semantic fields from one raw record.
///
/// Movies read the release date and ISO country codes; TV shows read
/// the first air date, country names, creators and episode/season
/// counts.
pub fn extract(record: &ContentRecord, content_type: ContentType) -> ExtractedFeatures {
    let (title, date) = match content_type {
        ContentType::Movie => (record.title.as_deref(), record.release_date.as_deref()),
        ContentType::Tv => (record.name.as_deref(), record.first_air_date.as_deref()),
    };

    let countries = record
        .production_countries
        .iter()
        .filter_map(|country| match content_type {
            ContentType::Movie => country.iso_3166_1.as_deref(),
            ContentType::Tv => country.name.as_deref(),
        })
        .map(|value| value.to_lowercase())
        .collect();

    let (creator, episodes, seasons) = match content_type {
        ContentType::Movie => (None, None, None),
        ContentType::Tv => (
            find_creator(record),
            record.number_of_episodes,
            record.number_of_seasons,
        ),
    };

    ExtractedFeatures {
        title_keywords: extract_keywords(title),
        overview_keywords: extract_keywords(record.overview.as_deref()),
        genres: record
            .genres
            .iter()
            .filter_map(|genre| genre.name.as_deref())
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect(),
        countries,
        cast: record.cast.iter().filter_map(|member| member.id).collect(),
        director: find_director_id(record),
        creator,
        language: record
            .original_language
            .as_deref()
            .and_then(normalize_language),
        release_year: extract_release_year(date),
        popularity: record.popularity,
        vote_average: record.vote_average,
        episodes,
        seasons,
    }
}
