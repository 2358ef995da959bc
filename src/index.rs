use crate::{embeddings::squared_l2_distance, error::ServerError};
use ndarray::Array1;

/// Flat (brute-force) vector index over squared Euclidean distance.
///
/// Insertion happens once at build time; afterwards the index is read-only
/// and shared across requests without locking. Search is exact: every stored
/// vector is scanned for every query.
#[derive(Debug)]
pub struct FlatIndex {
    dimension: usize,
    vectors: Vec<Array1<f32>>,
}

impl FlatIndex {
    /// Builds the index from all vectors at once. Every vector must share the
    /// same dimension; a mismatch means the corpus and the embedding model
    /// have diverged and the process must not start.
    pub fn build(vectors: Vec<Array1<f32>>) -> Result<Self, ServerError> {
        let dimension = vectors.first().map(|v| v.len()).unwrap_or(0);
        for (i, vector) in vectors.iter().enumerate() {
            if vector.len() != dimension {
                return Err(ServerError::Config(format!(
                    "Embedding dimension mismatch at position {}: expected {}, got {}",
                    i,
                    dimension,
                    vector.len()
                )));
            }
        }
        Ok(Self { dimension, vectors })
    }

    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Returns the positions and squared-L2 distances of the `k` vectors
    /// nearest to `query`, ascending by distance. Equal distances keep
    /// insertion order (the sort is stable). `k` larger than the index
    /// returns everything.
    pub fn search(&self, query: &Array1<f32>, k: usize) -> Vec<(usize, f32)> {
        let mut hits: Vec<(usize, f32)> = self
            .vectors
            .iter()
            .enumerate()
            .map(|(i, vector)| (i, squared_l2_distance(query.view(), vector.view())))
            .collect();

        hits.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(k);
        hits
    }
}
