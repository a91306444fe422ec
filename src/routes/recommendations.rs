use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::{
    api::AppState,
    error::{AppError, AppResult},
    models::{ContentType, WatchlistItem, WatchlistRecommendations},
    services::recommendations,
};

#[derive(Debug, Deserialize)]
pub struct SimilarRequest {
    pub id: i64,
    #[serde(alias = "type")]
    pub content_type: ContentType,
}

#[derive(Debug, Serialize)]
pub struct SimilarResponse {
    pub id: i64,
    /// Up to 5 content ids, most similar first
    pub recommendations: Vec<i64>,
}

/// Handler for single-item similar-content recommendations
pub async fn similar(
    State(state): State<AppState>,
    Json(request): Json<SimilarRequest>,
) -> AppResult<Json<SimilarResponse>> {
    let recommendations = recommendations::recommend_similar(
        &state.registry,
        state.provider.as_ref(),
        request.content_type,
        request.id,
    )
    .await?;

    Ok(Json(SimilarResponse { id: request.id, recommendations }))
}

#[derive(Debug, Deserialize)]
pub struct WatchlistRequest {
    #[serde(default)]
    pub watchlist: Vec<WatchlistItem>,
}

/// Handler for watchlist-based recommendations
pub async fn watchlist(
    State(state): State<AppState>,
    Json(request): Json<WatchlistRequest>,
) -> AppResult<Json<WatchlistRecommendations>> {
    if request.watchlist.is_empty() {
        return Err(AppError::InvalidInput(
            "No watchlist items provided".to_string(),
        ));
    }

    let result = recommendations::recommend_for_watchlist(
        &state.registry,
        state.provider.as_ref(),
        &request.watchlist,
    )
    .await?;

    Ok(Json(result))
}
