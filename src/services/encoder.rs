//! Encoding and column alignment.
//!
//! Turns vocabulary-filtered features into named numeric columns, then
//! aligns them to the schema's fixed column order. Alignment is the one
//! place missing values are filled: any schema column the encoder did
//! not produce becomes 0, and any produced column the schema does not
//! know is dropped.

use std::collections::HashMap;

use crate::models::{ContentType, FeatureSchema};
use crate::services::features::ExtractedFeatures;

/// Encodes filtered features into named columns.
///
/// Numeric columns apply the persisted training-time transforms:
/// popularity is log-compressed twice before its affine scaler, vote
/// average uses the fixed `/ 10` transform, and the remaining numerics
/// use their fitted scalers directly. Indicator columns are named
/// `{group}_{value}`, matching the persisted schema column names.
pub fn encode(
    features: &ExtractedFeatures,
    content_type: ContentType,
    schema: &FeatureSchema,
) -> HashMap<String, f32> {
    let mut columns = HashMap::new();
    let scalers = &schema.scalers;

    if let Some(popularity) = features.popularity {
        let compressed = (popularity.ln_1p()).ln_1p() as f32;
        columns.insert("popularity".to_string(), scalers.popularity.transform(compressed));
    }
    if let Some(vote_average) = features.vote_average {
        columns.insert("vote_average".to_string(), vote_average as f32 / 10.0);
    }
    if let Some(year) = features.release_year {
        let name = match content_type {
            ContentType::Movie => "release_date",
            ContentType::Tv => "first_air_date",
        };
        columns.insert(name.to_string(), scalers.release_date.transform(year as f32));
    }
    if let (Some(episodes), Some(scaler)) = (features.episodes, scalers.number_of_episodes) {
        columns.insert("number_of_episodes".to_string(), scaler.transform(episodes as f32));
    }
    if let (Some(seasons), Some(scaler)) = (features.seasons, scalers.number_of_seasons) {
        columns.insert("number_of_seasons".to_string(), scaler.transform(seasons as f32));
    }

    // One-hot groups: at most one indicator each
    if let Some(language) = &features.language {
        columns.insert(format!("original_language_{language}"), 1.0);
    }
    if let Some(director) = features.director {
        columns.insert(format!("directors_{director}"), 1.0);
    }
    if let Some(creator) = &features.creator {
        columns.insert(format!("created_by_{creator}"), 1.0);
    }

    // Multi-hot groups
    for genre in &features.genres {
        columns.insert(format!("genres_{genre}"), 1.0);
    }
    for country in &features.countries {
        columns.insert(format!("production_countries_{country}"), 1.0);
    }
    for id in &features.cast {
        columns.insert(format!("cast_{id}"), 1.0);
    }
    for word in &features.title_keywords {
        columns.insert(format!("title_keywords_{word}"), 1.0);
    }
    for word in &features.overview_keywords {
        columns.insert(format!("overview_keywords_{word}"), 1.0);
    }

    columns
}

/// Emits the encoded vector strictly in schema column order.
///
/// Invariant: the output length always equals the schema column count.
pub fn align(columns: &HashMap<String, f32>, schema: &FeatureSchema) -> Vec<f32> {
    schema
        .columns
        .iter()
        .map(|column| columns.get(&column.name).copied().unwrap_or(0.0))
        .collect()
}

/// Full encode-and-align step for one record's filtered features
pub fn encode_record(
    features: &ExtractedFeatures,
    content_type: ContentType,
    schema: &FeatureSchema,
) -> Vec<f32> {
    let columns = encode(features, content_type, schema);
    align(&columns, schema)
}
