//! Vocabulary filtering.
//!
//! Restricts every categorical and multi-valued field to the values the
//! embedding model saw at training time. Unknown values are dropped
//! silently: they are routine steady-state input, not errors, and
//! filtering them here guarantees the encoder never has to invent a
//! column the schema does not know.

use std::collections::HashSet;
use std::sync::LazyLock;

use crate::models::{ContentType, VocabularySet};
use crate::services::features::ExtractedFeatures;

/// Genre labels TMDB defines for movies
const MOVIE_GENRES: &[&str] = &[
    "Action", "Adventure", "Animation", "Comedy", "Crime", "Documentary", "Drama", "Family",
    "Fantasy", "History", "Horror", "Music", "Mystery", "Romance", "Science Fiction", "Thriller",
    "War", "Western", "TV Movie",
];

/// Genre labels TMDB defines for TV shows
const TV_GENRES: &[&str] = &[
    "Action & Adventure", "Animation", "Comedy", "Crime", "Documentary", "Drama", "Family",
    "Kids", "Mystery", "News", "Reality", "Sci-Fi & Fantasy", "Soap", "Talk", "War & Politics",
    "Western",
];

static MOVIE_GENRE_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| MOVIE_GENRES.iter().copied().collect());
static TV_GENRE_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| TV_GENRES.iter().copied().collect());

/// All-or-nothing genre validation against the fixed per-type label set.
///
/// Stricter than the general vocabulary rule: one unrecognized label
/// invalidates the record's entire genre list, not just the offending
/// element. Valid lists pass through unchanged.
pub fn validate_genres(genres: &[String], content_type: ContentType) -> Vec<String> {
    let valid = match content_type {
        ContentType::Movie => &*MOVIE_GENRE_SET,
        ContentType::Tv => &*TV_GENRE_SET,
    };

    if genres.iter().any(|genre| !valid.contains(genre.trim())) {
        return Vec::new();
    }
    genres.to_vec()
}

/// Restricts every field of `features` to its training-time vocabulary.
///
/// Genres additionally go through [`validate_genres`] and are lowercased
/// to match the persisted column naming. Single-valued fields (director,
/// creator, language) collapse to `None` when unknown, which makes the
/// encoder emit all-zero indicators for that group.
pub fn apply(features: &mut ExtractedFeatures, content_type: ContentType, vocab: &VocabularySet) {
    let validated = validate_genres(&features.genres, content_type);
    features.genres = validated
        .iter()
        .map(|genre| genre.to_lowercase())
        .filter(|genre| vocab.genres.contains(genre))
        .collect();

    features
        .countries
        .retain(|country| vocab.production_countries.contains(country));
    features
        .cast
        .retain(|id| vocab.cast.contains(&id.to_string()));
    features
        .title_keywords
        .retain(|word| vocab.title_keywords.contains(word));
    features
        .overview_keywords
        .retain(|word| vocab.overview_keywords.contains(word));

    if let Some(id) = features.director {
        if !vocab.directors.contains(&id.to_string()) {
            features.director = None;
        }
    }
    if let Some(creator) = &features.creator {
        if !vocab.creators.contains(creator) {
            features.creator = None;
        }
    }
    if let Some(language) = &features.language {
        if !vocab.original_languages.contains(language) {
            features.language = None;
        }
    }
}
