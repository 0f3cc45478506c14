//! Exact (brute-force) L2 index over fixed-dimension vectors.
//!
//! Vectors are stored row-major in one contiguous buffer; row `i` is the `i`-th vector
//! added. Search scans every row and orders by squared Euclidean distance, breaking ties
//! by row number, so results are fully deterministic.

use memory_core::MemoryError;

/// Flat L2 index: positions are assigned in insertion order and never move.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatL2Index {
    dimension: usize,
    count: usize,
    data: Vec<f32>,
}

impl FlatL2Index {
    /// Creates an empty index for vectors of `dimension` floats.
    pub fn new(dimension: usize) -> Self {
        Self::with_capacity(dimension, 0)
    }

    /// Creates an empty index with room for `rows` vectors.
    pub fn with_capacity(dimension: usize, rows: usize) -> Self {
        Self {
            dimension,
            count: 0,
            data: Vec::with_capacity(dimension.saturating_mul(rows)),
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Number of indexed vectors.
    pub fn len(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Appends a vector; its position is the previous `len()`.
    pub fn add(&mut self, vector: &[f32]) -> Result<(), MemoryError> {
        if vector.len() != self.dimension {
            return Err(MemoryError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        self.data.extend_from_slice(vector);
        self.count += 1;
        Ok(())
    }

    /// Returns the vector stored at `position`.
    pub fn row(&self, position: usize) -> Option<&[f32]> {
        if position >= self.count {
            return None;
        }
        let start = position * self.dimension;
        self.data.get(start..start + self.dimension)
    }

    /// Returns up to `k` `(position, squared_distance)` pairs, nearest first.
    ///
    /// A query of the wrong dimension is rejected rather than truncated.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(usize, f32)>, MemoryError> {
        if query.len() != self.dimension {
            return Err(MemoryError::DimensionMismatch {
                expected: self.dimension,
                actual: query.len(),
            });
        }
        let mut scored: Vec<(usize, f32)> = (0..self.count)
            .filter_map(|i| self.row(i).map(|row| (i, squared_l2(query, row))))
            .collect();
        scored.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        scored.truncate(k);
        Ok(scored)
    }
}

/// Squared Euclidean distance between two equal-length vectors.
pub fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}
