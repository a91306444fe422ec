use std::fmt::Display;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Type of content served by the metadata provider
///
/// Movie and TV models are fully independent: each has its own schema,
/// vocabularies and embedding corpus, and the two are never mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Movie,
    Tv,
}

impl ContentType {
    /// Path segment used by the TMDB API and the artifact layout
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::Movie => "movie",
            ContentType::Tv => "tv",
        }
    }
}

impl Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Raw metadata for one movie or TV show, as returned by the TMDB
/// details endpoint and merged with the separately fetched credits.
///
/// Everything except `id` is optional: a missing or oddly shaped field
/// must degrade to a default, never abort the record. Numeric fields
/// are deserialized leniently because TMDB occasionally returns numbers
/// as strings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContentRecord {
    pub id: i64,

    /// Movie title (movies only)
    #[serde(default)]
    pub title: Option<String>,
    /// Show name (TV only)
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub overview: Option<String>,

    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default)]
    pub production_countries: Vec<ProductionCountry>,
    #[serde(default)]
    pub original_language: Option<String>,

    /// Movie release date, `YYYY-MM-DD`
    #[serde(default)]
    pub release_date: Option<String>,
    /// First air date for TV shows, `YYYY-MM-DD`
    #[serde(default)]
    pub first_air_date: Option<String>,

    #[serde(default, deserialize_with = "lenient_f64")]
    pub popularity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub vote_average: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub number_of_episodes: Option<f64>,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub number_of_seasons: Option<f64>,

    /// Show creators (TV only)
    #[serde(default)]
    pub created_by: Vec<Creator>,

    /// Merged in from the credits endpoint
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Genre {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductionCountry {
    #[serde(default)]
    pub iso_3166_1: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Creator {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CastMember {
    #[serde(default)]
    pub id: Option<i64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CrewMember {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub job: Option<String>,
}

/// Response from the TMDB credits endpoint
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Credits {
    #[serde(default)]
    pub cast: Vec<CastMember>,
    #[serde(default)]
    pub crew: Vec<CrewMember>,
}

/// One entry of a caller-supplied watchlist
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct WatchlistItem {
    pub id: i64,
    #[serde(alias = "type")]
    pub content_type: ContentType,
}

/// Aggregated watchlist recommendation result
#[derive(Debug, Clone, Serialize)]
pub struct WatchlistRecommendations {
    /// Up to 20 content ids, deliberately shuffled
    pub recommendations: Vec<i64>,
    /// Watchlist entries that were attempted
    pub total_processed: usize,
    /// Number of ids in `recommendations`
    pub total_recommendations: usize,
}

/// Accepts a JSON number, a numeric string, or anything else (-> None).
fn lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}
