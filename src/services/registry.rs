//! Schema registry: loads the persisted model artifacts.
//!
//! Each content type has a fixed artifact directory produced by the
//! offline training run:
//!
//! - `schema.json`     — ordered column list, scalers, vocabularies
//! - `projector.json`  — linear projector mean + component matrix
//! - `embeddings.json` — corpus embedding matrix
//! - `ids.json`        — corpus content ids, parallel to the matrix
//!
//! Artifacts are loaded once at startup into an immutable registry and
//! shared by reference. Missing or inconsistent artifacts are fatal for
//! the content type; there is no empty-schema fallback.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::models::{ColumnKind, ColumnSpec, ContentType, FeatureSchema, ScalerSet, VocabularySet};
use crate::services::embedding::{EmbeddingSpace, LinearProjector};

/// Failures loading or validating the persisted artifact bundle
#[derive(thiserror::Error, Debug)]
pub enum ArtifactError {
    #[error("failed to read artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse artifact {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("unrecognized schema column '{0}'")]
    UnknownColumn(String),

    #[error("inconsistent {content_type} artifacts: {reason}")]
    Inconsistent {
        content_type: ContentType,
        reason: String,
    },
}

/// On-disk shape of `schema.json`
#[derive(Debug, Deserialize)]
struct SchemaFile {
    columns: Vec<String>,
    scalers: ScalerSet,
    vocabulary: VocabularySet,
}

/// Loaded model for one content type
#[derive(Debug, Clone)]
pub struct ContentModel {
    pub schema: FeatureSchema,
    pub space: EmbeddingSpace,
}

/// Process-wide, immutable registry of the per-content-type models
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    pub movie: ContentModel,
    pub tv: ContentModel,
}

impl ModelRegistry {
    /// Loads both content-type models from `{artifacts_dir}/movie` and
    /// `{artifacts_dir}/tv`
    pub fn load(artifacts_dir: &Path) -> Result<Self, ArtifactError> {
        Ok(Self {
            movie: ContentModel::load(artifacts_dir, ContentType::Movie)?,
            tv: ContentModel::load(artifacts_dir, ContentType::Tv)?,
        })
    }

    pub fn model(&self, content_type: ContentType) -> &ContentModel {
        match content_type {
            ContentType::Movie => &self.movie,
            ContentType::Tv => &self.tv,
        }
    }
}

impl ContentModel {
    /// Loads and cross-validates one content type's artifact bundle
    pub fn load(artifacts_dir: &Path, content_type: ContentType) -> Result<Self, ArtifactError> {
        let dir = artifacts_dir.join(content_type.as_str());

        let schema_file: SchemaFile = read_json(&dir.join("schema.json"))?;
        let projector: LinearProjector = read_json(&dir.join("projector.json"))?;
        let embeddings: Vec<Vec<f32>> = read_json(&dir.join("embeddings.json"))?;
        let ids: Vec<i64> = read_json(&dir.join("ids.json"))?;

        let schema = build_schema(schema_file.columns, schema_file.scalers, schema_file.vocabulary)?;
        let space = EmbeddingSpace { projector, embeddings, ids };
        let model = Self { schema, space };
        model.validate(content_type)?;

        tracing::info!(
            content_type = %content_type,
            columns = model.schema.len(),
            corpus_size = model.space.ids.len(),
            embedding_dim = model.space.projector.output_dim(),
            "Loaded model artifacts"
        );

        Ok(model)
    }

    fn validate(&self, content_type: ContentType) -> Result<(), ArtifactError> {
        let inconsistent = |reason: String| ArtifactError::Inconsistent { content_type, reason };

        if self.schema.is_empty() {
            return Err(inconsistent("schema has no columns".to_string()));
        }

        // Every fitted-scaler column the schema declares must have its
        // scaler persisted; vote_average uses a fixed transform.
        for column in &self.schema.columns {
            if column.kind != ColumnKind::ScaledNumeric {
                continue;
            }
            let missing = match column.name.as_str() {
                "number_of_episodes" => self.schema.scalers.number_of_episodes.is_none(),
                "number_of_seasons" => self.schema.scalers.number_of_seasons.is_none(),
                _ => false,
            };
            if missing {
                return Err(inconsistent(format!("no scaler for column '{}'", column.name)));
            }
        }

        let projector = &self.space.projector;
        if projector.input_dim() != self.schema.len() {
            return Err(inconsistent(format!(
                "projector expects {} columns, schema has {}",
                projector.input_dim(),
                self.schema.len()
            )));
        }
        if let Some(row) = self
            .space
            .projector
            .components
            .iter()
            .find(|row| row.len() != projector.input_dim())
        {
            return Err(inconsistent(format!(
                "projector component row has width {}, expected {}",
                row.len(),
                projector.input_dim()
            )));
        }

        if self.space.embeddings.len() != self.space.ids.len() {
            return Err(inconsistent(format!(
                "{} embeddings but {} corpus ids",
                self.space.embeddings.len(),
                self.space.ids.len()
            )));
        }
        if let Some(row) = self
            .space
            .embeddings
            .iter()
            .find(|row| row.len() != projector.output_dim())
        {
            return Err(inconsistent(format!(
                "corpus embedding has dimension {}, projector emits {}",
                row.len(),
                projector.output_dim()
            )));
        }

        Ok(())
    }
}

/// Builds a typed schema from the persisted ordered column names
pub fn build_schema(
    columns: Vec<String>,
    scalers: ScalerSet,
    vocab: VocabularySet,
) -> Result<FeatureSchema, ArtifactError> {
    let columns = columns
        .into_iter()
        .map(|name| {
            let kind = classify_column(&name)?;
            Ok(ColumnSpec { name, kind })
        })
        .collect::<Result<Vec<_>, ArtifactError>>()?;

    Ok(FeatureSchema { columns, scalers, vocab })
}

/// Maps a persisted column name to its kind by naming convention
fn classify_column(name: &str) -> Result<ColumnKind, ArtifactError> {
    const NUMERIC: &[&str] = &[
        "popularity",
        "vote_average",
        "release_date",
        "first_air_date",
        "number_of_episodes",
        "number_of_seasons",
    ];
    const ONE_HOT_PREFIXES: &[&str] = &["original_language_", "directors_", "created_by_"];
    const MULTI_HOT_PREFIXES: &[&str] = &[
        "genres_",
        "production_countries_",
        "cast_",
        "title_keywords_",
        "overview_keywords_",
    ];

    if NUMERIC.contains(&name) {
        return Ok(ColumnKind::ScaledNumeric);
    }
    if ONE_HOT_PREFIXES.iter().any(|prefix| name.starts_with(prefix)) {
        return Ok(ColumnKind::OneHot);
    }
    if MULTI_HOT_PREFIXES.iter().any(|prefix| name.starts_with(prefix)) {
        return Ok(ColumnKind::MultiHot);
    }
    Err(ArtifactError::UnknownColumn(name.to_string()))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&contents).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_movie_artifacts(dir: &Path, schema: &str, projector: &str, embeddings: &str, ids: &str) {
        let movie_dir = dir.join("movie");
        fs::create_dir_all(&movie_dir).unwrap();
        fs::write(movie_dir.join("schema.json"), schema).unwrap();
        fs::write(movie_dir.join("projector.json"), projector).unwrap();
        fs::write(movie_dir.join("embeddings.json"), embeddings).unwrap();
        fs::write(movie_dir.join("ids.json"), ids).unwrap();
    }

    fn minimal_schema_json() -> &'static str {
        r#"{
            "columns": ["popularity", "vote_average", "genres_action"],
            "scalers": {
                "popularity": {"mean": 0.0, "scale": 1.0},
                "release_date": {"mean": 2000.0, "scale": 20.0}
            },
            "vocabulary": {
                "genres": ["action"],
                "production_countries": [],
                "cast": [],
                "directors": [],
                "title_keywords": [],
                "overview_keywords": [],
                "original_languages": []
            }
        }"#
    }

    #[test]
    fn test_classify_column() {
        assert_eq!(classify_column("popularity").unwrap(), ColumnKind::ScaledNumeric);
        assert_eq!(classify_column("first_air_date").unwrap(), ColumnKind::ScaledNumeric);
        assert_eq!(classify_column("directors_525").unwrap(), ColumnKind::OneHot);
        assert_eq!(classify_column("created_by_66633").unwrap(), ColumnKind::OneHot);
        assert_eq!(classify_column("original_language_en").unwrap(), ColumnKind::OneHot);
        assert_eq!(classify_column("genres_action").unwrap(), ColumnKind::MultiHot);
        assert_eq!(classify_column("overview_keywords_dream").unwrap(), ColumnKind::MultiHot);
        assert!(matches!(
            classify_column("budget"),
            Err(ArtifactError::UnknownColumn(_))
        ));
    }

    #[test]
    fn test_load_valid_bundle() {
        let dir = tempfile::tempdir().unwrap();
        write_movie_artifacts(
            dir.path(),
            minimal_schema_json(),
            r#"{"mean": [0.0, 0.0, 0.0], "components": [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]]}"#,
            r#"[[1.0, 0.0], [0.5, 0.5]]"#,
            r#"[101, 102]"#,
        );

        let model = ContentModel::load(dir.path(), ContentType::Movie).unwrap();
        assert_eq!(model.schema.len(), 3);
        assert_eq!(model.space.ids, vec![101, 102]);
        assert_eq!(model.space.projector.output_dim(), 2);
    }

    #[test]
    fn test_load_missing_artifact_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("movie")).unwrap();

        let result = ContentModel::load(dir.path(), ContentType::Movie);
        assert!(matches!(result, Err(ArtifactError::Io { .. })));
    }

    #[test]
    fn test_load_rejects_projector_width_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        // Projector expects 2 columns, schema declares 3
        write_movie_artifacts(
            dir.path(),
            minimal_schema_json(),
            r#"{"mean": [0.0, 0.0], "components": [[1.0, 0.0]]}"#,
            r#"[[1.0]]"#,
            r#"[101]"#,
        );

        let result = ContentModel::load(dir.path(), ContentType::Movie);
        assert!(matches!(result, Err(ArtifactError::Inconsistent { .. })));
    }

    #[test]
    fn test_load_rejects_id_count_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        write_movie_artifacts(
            dir.path(),
            minimal_schema_json(),
            r#"{"mean": [0.0, 0.0, 0.0], "components": [[1.0, 0.0, 0.0]]}"#,
            r#"[[1.0], [0.5]]"#,
            r#"[101]"#,
        );

        let result = ContentModel::load(dir.path(), ContentType::Movie);
        assert!(matches!(result, Err(ArtifactError::Inconsistent { .. })));
    }

    #[test]
    fn test_load_rejects_embedding_dim_mismatch() {
        let dir = tempfile::tempdir().unwrap();
        write_movie_artifacts(
            dir.path(),
            minimal_schema_json(),
            r#"{"mean": [0.0, 0.0, 0.0], "components": [[1.0, 0.0, 0.0]]}"#,
            r#"[[1.0, 2.0]]"#,
            r#"[101]"#,
        );

        let result = ContentModel::load(dir.path(), ContentType::Movie);
        assert!(matches!(result, Err(ArtifactError::Inconsistent { .. })));
    }

    #[test]
    fn test_build_schema_rejects_unknown_columns() {
        let schema_file: SchemaFile = serde_json::from_str(minimal_schema_json()).unwrap();
        let result = build_schema(
            vec!["popularity".to_string(), "runtime".to_string()],
            schema_file.scalers,
            schema_file.vocabulary,
        );
        assert!(matches!(result, Err(ArtifactError::UnknownColumn(_))));
    }
}
