//! Embedding projection and similarity ranking.
//!
//! The projector is the offline-fitted truncated SVD: mean-centering
//! followed by a fixed linear combination. It is applied verbatim at
//! inference time; the same parameters produced the corpus embeddings,
//! so query and corpus live in one latent space.

use std::collections::HashSet;

use serde::Deserialize;

/// Fitted linear transform from encoded vectors to latent embeddings
#[derive(Debug, Clone, Deserialize)]
pub struct LinearProjector {
    /// Per-column training mean subtracted before projection
    pub mean: Vec<f32>,
    /// Component matrix, one row per latent dimension
    pub components: Vec<Vec<f32>>,
}

impl LinearProjector {
    /// Expected encoded vector length
    pub fn input_dim(&self) -> usize {
        self.mean.len()
    }

    /// Latent embedding length
    pub fn output_dim(&self) -> usize {
        self.components.len()
    }

    /// Projects an encoded vector into the latent space
    pub fn project(&self, vector: &[f32]) -> Vec<f32> {
        self.components
            .iter()
            .map(|row| {
                row.iter()
                    .zip(vector.iter().zip(self.mean.iter()))
                    .map(|(weight, (value, mean))| weight * (value - mean))
                    .sum()
            })
            .collect()
    }
}

/// Precomputed corpus of latent embeddings plus the projector that
/// produced them. Read-only after load.
#[derive(Debug, Clone)]
pub struct EmbeddingSpace {
    pub projector: LinearProjector,
    /// One row per corpus item, same width as `projector.output_dim()`
    pub embeddings: Vec<Vec<f32>>,
    /// Content ids parallel to `embeddings`
    pub ids: Vec<i64>,
}

/// Normalized dot-product similarity; 0 for zero-magnitude inputs
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Ranks the corpus by cosine similarity to `query`, most similar first.
///
/// The sort is stable with ties kept in corpus index order. The excluded
/// id (normally the query item itself) is skipped, each id surfaces at
/// most once (at its highest-similarity occurrence), and the walk stops
/// at `limit` ids or corpus exhaustion. Returns fewer than `limit` ids
/// when the corpus cannot supply them; never pads.
pub fn rank_similar(
    query: &[f32],
    space: &EmbeddingSpace,
    exclude: Option<i64>,
    limit: usize,
) -> Vec<i64> {
    let mut indices: Vec<usize> = (0..space.embeddings.len()).collect();
    let similarities: Vec<f32> = space
        .embeddings
        .iter()
        .map(|row| cosine_similarity(query, row))
        .collect();

    // Stable sort over the IEEE total order: equal scores keep corpus
    // index order, and a non-finite score cannot break the comparator
    indices.sort_by(|&a, &b| similarities[b].total_cmp(&similarities[a]));

    let mut seen = HashSet::new();
    let mut ranked = Vec::with_capacity(limit);
    for index in indices {
        let id = space.ids[index];
        if Some(id) == exclude || !seen.insert(id) {
            continue;
        }
        ranked.push(id);
        if ranked.len() >= limit {
            break;
        }
    }
    ranked
}
