//! Similar-content recommendation pipeline.
//!
//! Runs one record through extraction, vocabulary filtering, encoding,
//! alignment, projection and ranking, and aggregates the per-entry
//! results for watchlists.

use std::collections::HashSet;

use rand::seq::SliceRandom;

use crate::{
    error::AppResult,
    models::{ContentRecord, ContentType, WatchlistItem, WatchlistRecommendations},
    services::{
        embedding, encoder, features,
        providers::MetadataProvider,
        registry::{ContentModel, ModelRegistry},
        vocab,
    },
};

/// Maximum ids returned for a single item
pub const MAX_SIMILAR: usize = 5;

/// Maximum ids returned for a watchlist
pub const MAX_WATCHLIST_RECOMMENDATIONS: usize = 20;

/// Runs the full inference pipeline for one already-fetched record.
///
/// Pure and deterministic: the same record against the same model always
/// yields the same encoded vector and the same ranked ids. The record's
/// own id never appears in the output.
pub fn similar_content_ids(
    record: &ContentRecord,
    content_type: ContentType,
    model: &ContentModel,
) -> Vec<i64> {
    let mut extracted = features::extract(record, content_type);
    vocab::apply(&mut extracted, content_type, &model.schema.vocab);

    let vector = encoder::encode_record(&extracted, content_type, &model.schema);
    debug_assert_eq!(vector.len(), model.schema.len());

    let query = model.space.projector.project(&vector);
    embedding::rank_similar(&query, &model.space, Some(record.id), MAX_SIMILAR)
}

/// Fetches one item and returns up to 5 similar content ids,
/// most similar first
pub async fn recommend_similar(
    registry: &ModelRegistry,
    provider: &dyn MetadataProvider,
    content_type: ContentType,
    id: i64,
) -> AppResult<Vec<i64>> {
    let record = provider.fetch_record(content_type, id).await?;
    let recommendations = similar_content_ids(&record, content_type, registry.model(content_type));

    tracing::info!(
        content_type = %content_type,
        content_id = id,
        recommendations = recommendations.len(),
        "Computed similar content"
    );

    Ok(recommendations)
}

/// Aggregated recommendations for a whole watchlist.
///
/// Every entry runs the full pipeline independently against its own
/// content-type model; a fetch or processing failure skips that entry
/// and the batch continues. The merged ids are deduplicated, stripped
/// of everything already on the watchlist, shuffled to diversify the
/// mix across heterogeneous entries, and truncated to 20.
pub async fn recommend_for_watchlist(
    registry: &ModelRegistry,
    provider: &dyn MetadataProvider,
    watchlist: &[WatchlistItem],
) -> AppResult<WatchlistRecommendations> {
    let watchlist_ids: HashSet<i64> = watchlist.iter().map(|item| item.id).collect();

    let mut merged = Vec::new();
    for item in watchlist {
        match provider.fetch_record(item.content_type, item.id).await {
            Ok(record) => {
                let model = registry.model(item.content_type);
                merged.extend(similar_content_ids(&record, item.content_type, model));
            }
            Err(error) => {
                tracing::warn!(
                    content_type = %item.content_type,
                    content_id = item.id,
                    error = %error,
                    "Skipping watchlist entry"
                );
            }
        }
    }

    let mut seen = HashSet::new();
    let mut recommendations: Vec<i64> = merged
        .into_iter()
        .filter(|id| !watchlist_ids.contains(id) && seen.insert(*id))
        .collect();

    recommendations.shuffle(&mut rand::rng());
    recommendations.truncate(MAX_WATCHLIST_RECOMMENDATIONS);

    tracing::info!(
        entries = watchlist.len(),
        recommendations = recommendations.len(),
        "Computed watchlist recommendations"
    );

    Ok(WatchlistRecommendations {
        total_processed: watchlist.len(),
        total_recommendations: recommendations.len(),
        recommendations,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::{
        AffineScaler, CastMember, ColumnKind, ColumnSpec, FeatureSchema, Genre, ScalerSet,
        VocabularySet,
    };
    use crate::services::embedding::{EmbeddingSpace, LinearProjector};
    use crate::services::providers::MockMetadataProvider;

    fn column(name: &str, kind: ColumnKind) -> ColumnSpec {
        ColumnSpec { name: name.to_string(), kind }
    }

    /// Two-column movie model: genres_action and cast_10. Corpus items
    /// 101/102 are action-leaning, 103 is cast-leaning.
    fn test_model() -> ContentModel {
        let schema = FeatureSchema {
            columns: vec![
                column("genres_action", ColumnKind::MultiHot),
                column("cast_10", ColumnKind::MultiHot),
            ],
            scalers: ScalerSet {
                popularity: AffineScaler { mean: 0.0, scale: 1.0 },
                release_date: AffineScaler { mean: 0.0, scale: 1.0 },
                number_of_episodes: None,
                number_of_seasons: None,
            },
            vocab: VocabularySet {
                genres: ["action".to_string()].into_iter().collect(),
                cast: ["10".to_string()].into_iter().collect(),
                ..Default::default()
            },
        };
        let space = EmbeddingSpace {
            projector: LinearProjector {
                mean: vec![0.0, 0.0],
                components: vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            },
            embeddings: vec![vec![1.0, 0.0], vec![0.9, 0.1], vec![0.0, 1.0]],
            ids: vec![101, 102, 103],
        };
        ContentModel { schema, space }
    }

    fn test_registry() -> ModelRegistry {
        ModelRegistry { movie: test_model(), tv: test_model() }
    }

    fn action_record(id: i64) -> ContentRecord {
        ContentRecord {
            id,
            title: Some("Test".to_string()),
            genres: vec![Genre { name: Some("Action".to_string()) }],
            ..Default::default()
        }
    }

    #[test]
    fn test_similar_excludes_own_id() {
        let model = test_model();
        let ranked = similar_content_ids(&action_record(101), ContentType::Movie, &model);
        assert!(!ranked.contains(&101));
        assert_eq!(ranked, vec![102, 103]);
    }

    #[test]
    fn test_similar_at_most_five_unique() {
        let model = test_model();
        let ranked = similar_content_ids(&action_record(999), ContentType::Movie, &model);
        assert!(ranked.len() <= MAX_SIMILAR);
        let unique: HashSet<_> = ranked.iter().collect();
        assert_eq!(unique.len(), ranked.len());
    }

    #[test]
    fn test_pipeline_deterministic() {
        let model = test_model();
        let record = ContentRecord {
            id: 999,
            genres: vec![Genre { name: Some("Action".to_string()) }],
            cast: vec![CastMember { id: Some(10) }],
            ..Default::default()
        };
        let first = similar_content_ids(&record, ContentType::Movie, &model);
        let second = similar_content_ids(&record, ContentType::Movie, &model);
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_recommend_similar_fetches_and_ranks() {
        let registry = test_registry();
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_fetch_record()
            .returning(|_, id| Ok(action_record(id)));

        let ranked = recommend_similar(&registry, &provider, ContentType::Movie, 101)
            .await
            .unwrap();
        assert_eq!(ranked, vec![102, 103]);
    }

    #[tokio::test]
    async fn test_recommend_similar_surfaces_fetch_failure() {
        let registry = test_registry();
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_fetch_record()
            .returning(|_, _| Err(AppError::UpstreamFetch("boom".to_string())));

        let result = recommend_similar(&registry, &provider, ContentType::Movie, 1).await;
        assert!(matches!(result, Err(AppError::UpstreamFetch(_))));
    }

    #[tokio::test]
    async fn test_watchlist_filters_dedups_and_counts() {
        let registry = test_registry();
        let mut provider = MockMetadataProvider::new();
        provider
            .expect_fetch_record()
            .returning(|_, id| Ok(action_record(id)));

        // 102 is on the watchlist, so it must not come back even though
        // both entries recommend it
        let watchlist = vec![
            WatchlistItem { id: 101, content_type: ContentType::Movie },
            WatchlistItem { id: 102, content_type: ContentType::Tv },
        ];
        let result = recommend_for_watchlist(&registry, &provider, &watchlist)
            .await
            .unwrap();

        assert_eq!(result.total_processed, 2);
        assert_eq!(result.total_recommendations, result.recommendations.len());
        assert!(result.recommendations.len() <= MAX_WATCHLIST_RECOMMENDATIONS);

        let unique: HashSet<_> = result.recommendations.iter().collect();
        assert_eq!(unique.len(), result.recommendations.len());
        for item in &watchlist {
            assert!(!result.recommendations.contains(&item.id));
        }
        // 101's run recommends 102 and 103; 102's run recommends 101 and
        // 103. Both 101 and 102 are watchlist members.
        assert_eq!(result.recommendations, vec![103]);
    }

    #[tokio::test]
    async fn test_watchlist_skips_failed_entries() {
        let registry = test_registry();
        let mut provider = MockMetadataProvider::new();
        provider.expect_fetch_record().returning(|_, id| {
            if id == 500 {
                Err(AppError::UpstreamFetch("unreachable".to_string()))
            } else {
                Ok(action_record(id))
            }
        });

        let watchlist = vec![
            WatchlistItem { id: 500, content_type: ContentType::Movie },
            WatchlistItem { id: 999, content_type: ContentType::Movie },
        ];
        let result = recommend_for_watchlist(&registry, &provider, &watchlist)
            .await
            .unwrap();

        // The failed entry is skipped, the good one still contributes
        assert_eq!(result.total_processed, 2);
        let expected: HashSet<i64> = [101, 102, 103].into_iter().collect();
        let actual: HashSet<i64> = result.recommendations.iter().copied().collect();
        assert_eq!(actual, expected);
    }

    #[tokio::test]
    async fn test_watchlist_empty_input_yields_empty_output() {
        let registry = test_registry();
        let provider = MockMetadataProvider::new();
        let result = recommend_for_watchlist(&registry, &provider, &[]).await.unwrap();
        assert_eq!(result.total_processed, 0);
        assert!(result.recommendations.is_empty());
    }
}
