/// TMDB metadata provider
///
/// Fetches the details and credits representations for a movie or TV
/// show and merges them into one [`ContentRecord`]:
///
/// 1. Details: /3/{movie|tv}/{id} → core metadata
/// 2. Credits: /3/{movie|tv}/{id}/credits → cast + crew, keyed by the same id
use reqwest::Client as HttpClient;

use crate::{
    error::{AppError, AppResult},
    models::{ContentRecord, ContentType, Credits},
    services::providers::MetadataProvider,
};

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    auth_token: String,
    api_url: String,
}

impl TmdbProvider {
    pub fn new(auth_token: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            auth_token,
            api_url,
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> AppResult<T> {
        let response = self
            .http_client
            .get(url)
            .bearer_auth(&self.auth_token)
            .query(&[("language", "en-US")])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::UpstreamFetch(format!(
                "TMDB returned status {} for {}: {}",
                status, url, body
            )));
        }

        Ok(response.json().await?)
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    async fn fetch_record(&self, content_type: ContentType, id: i64) -> AppResult<ContentRecord> {
        let details_url = format!("{}/3/{}/{}", self.api_url, content_type.as_str(), id);
        let mut record: ContentRecord = self.get_json(&details_url).await?;

        let credits_url = format!("{}/3/{}/{}/credits", self.api_url, content_type.as_str(), id);
        let credits: Credits = self.get_json(&credits_url).await?;
        record.cast = credits.cast;
        record.crew = credits.crew;

        tracing::info!(
            content_type = %content_type,
            content_id = id,
            cast = record.cast.len(),
            crew = record.crew.len(),
            provider = "tmdb",
            "Fetched content record"
        );

        Ok(record)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credits_deserialization() {
        let json = r#"{
            "id": 27205,
            "cast": [{"id": 6193, "name": "Leonardo DiCaprio", "order": 0}],
            "crew": [{"id": 525, "job": "Director", "name": "Christopher Nolan"}]
        }"#;

        let credits: Credits = serde_json::from_str(json).unwrap();
        assert_eq!(credits.cast.len(), 1);
        assert_eq!(credits.cast[0].id, Some(6193));
        assert_eq!(credits.crew[0].job.as_deref(), Some("Director"));
    }

    #[test]
    fn test_credits_tolerates_missing_fields() {
        let credits: Credits = serde_json::from_str("{}").unwrap();
        assert!(credits.cast.is_empty());
        assert!(credits.crew.is_empty());
    }

    #[test]
    fn test_provider_name() {
        let provider = TmdbProvider::new("token".to_string(), "http://test.local".to_string());
        assert_eq!(provider.name(), "tmdb");
    }
}
