use std::collections::HashSet;

use serde::Deserialize;

/// How a schema column is produced from a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Numeric value passed through a fitted (or fixed) transform
    ScaledNumeric,
    /// Indicator column from a single-valued categorical group
    OneHot,
    /// Indicator column from a multi-valued group
    MultiHot,
}

/// One column of the training-time feature matrix
#[derive(Debug, Clone)]
pub struct ColumnSpec {
    pub name: String,
    pub kind: ColumnKind,
}

/// Affine standardization fitted offline: `(x - mean) / scale`
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AffineScaler {
    pub mean: f32,
    pub scale: f32,
}

impl AffineScaler {
    pub fn transform(&self, x: f32) -> f32 {
        (x - self.mean) / self.scale
    }
}

/// Fitted scalers for the numeric columns of one content type.
///
/// Episode and season scalers only exist for the TV schema.
#[derive(Debug, Clone, Deserialize)]
pub struct ScalerSet {
    pub popularity: AffineScaler,
    pub release_date: AffineScaler,
    #[serde(default)]
    pub number_of_episodes: Option<AffineScaler>,
    #[serde(default)]
    pub number_of_seasons: Option<AffineScaler>,
}

/// Closed value sets observed at training time, one per encoded group.
///
/// Person ids are stored as strings so that id-valued and name-valued
/// groups (e.g. show creators) share one representation.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VocabularySet {
    pub genres: HashSet<String>,
    pub production_countries: HashSet<String>,
    pub cast: HashSet<String>,
    pub directors: HashSet<String>,
    #[serde(default)]
    pub creators: HashSet<String>,
    pub title_keywords: HashSet<String>,
    pub overview_keywords: HashSet<String>,
    pub original_languages: HashSet<String>,
}

/// Ordered, typed column specification plus fitted scaling and
/// vocabulary parameters for one content type.
///
/// Immutable after load; every encoded vector reproduces exactly this
/// column order.
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    pub columns: Vec<ColumnSpec>,
    pub scalers: ScalerSet,
    pub vocab: VocabularySet,
}

impl FeatureSchema {
    /// Number of columns, i.e. the encoded vector length
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}
