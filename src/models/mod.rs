mod content;
mod schema;

pub use content::{
    CastMember, ContentRecord, ContentType, Creator, Credits, CrewMember, Genre,
    ProductionCountry, WatchlistItem, WatchlistRecommendations,
};
pub use schema::{AffineScaler, ColumnKind, ColumnSpec, FeatureSchema, ScalerSet, VocabularySet};
