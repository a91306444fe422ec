/// Content metadata provider abstraction
///
/// The recommendation pipeline treats the upstream metadata source as a
/// black box behind this trait: given a content type and id, return the
/// merged details-plus-credits record. Keeping the seam here lets tests
/// run the full pipeline against canned records.
use crate::{
    error::AppResult,
    models::{ContentRecord, ContentType},
};

pub mod tmdb;

pub use tmdb::TmdbProvider;

/// Trait for content metadata providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Fetch the full metadata record for one content item, including
    /// cast and crew credits
    async fn fetch_record(&self, content_type: ContentType, id: i64) -> AppResult<ContentRecord>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
