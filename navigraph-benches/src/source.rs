//! Seeded synthetic datasets for benchmarking.

use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Errors that may occur during synthetic dataset generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum SyntheticError {
    /// The requested point count was zero.
    #[error("point count must be greater than zero")]
    ZeroPoints,
    /// The requested dimension count was zero.
    #[error("dimension count must be greater than zero")]
    ZeroDimensions,
    /// The requested cluster count was zero or above the point count.
    #[error("cluster count ({clusters}) must be between 1 and the point count ({points})")]
    InvalidClusterCount {
        /// Number of clusters requested.
        clusters: usize,
        /// Number of points requested.
        points: usize,
    },
}

/// Configuration for uniform `[0, 1)` vectors.
#[derive(Clone, Debug)]
pub struct SyntheticConfig {
    /// Number of points to generate.
    pub point_count: usize,
    /// Dimensionality of each vector.
    pub dimensions: usize,
    /// RNG seed for reproducibility.
    pub seed: u64,
}

/// Configuration for points scattered around random centres.
#[derive(Clone, Debug)]
pub struct ClusteredConfig {
    /// Shared shape and seed.
    pub base: SyntheticConfig,
    /// Number of cluster centres.
    pub cluster_count: usize,
    /// Half-width of the cube around each centre that points fall in.
    pub spread: f32,
}

/// Generated vectors kept in row order.
#[derive(Clone, Debug)]
pub struct SyntheticVectors {
    dimensions: usize,
    rows: Vec<Vec<f32>>,
}

impl SyntheticVectors {
    /// Draws uniform `[0, 1)` vectors.
    ///
    /// # Errors
    /// Returns [`SyntheticError`] for zero points or dimensions.
    pub fn generate(config: &SyntheticConfig) -> Result<Self, SyntheticError> {
        validate(config)?;
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let rows = (0..config.point_count)
            .map(|_| uniform_row(&mut rng, config.dimensions))
            .collect();
        Ok(Self {
            dimensions: config.dimensions,
            rows,
        })
    }

    /// Draws points around `cluster_count` uniform centres, assigned round
    /// robin so every cluster gets a similar share.
    ///
    /// # Errors
    /// Returns [`SyntheticError`] for zero points or dimensions, or an
    /// unusable cluster count.
    #[expect(
        clippy::float_arithmetic,
        reason = "offsets are scaled around the cluster centre"
    )]
    pub fn generate_clustered(config: &ClusteredConfig) -> Result<Self, SyntheticError> {
        let base = &config.base;
        validate(base)?;
        if config.cluster_count == 0 || config.cluster_count > base.point_count {
            return Err(SyntheticError::InvalidClusterCount {
                clusters: config.cluster_count,
                points: base.point_count,
            });
        }
        let mut rng = SmallRng::seed_from_u64(base.seed);
        let centres: Vec<Vec<f32>> = (0..config.cluster_count)
            .map(|_| uniform_row(&mut rng, base.dimensions))
            .collect();
        let spread = config.spread.abs();
        let rows = centres
            .iter()
            .cycle()
            .take(base.point_count)
            .map(|centre| {
                centre
                    .iter()
                    .map(|value| value + rng.gen_range(-spread..=spread))
                    .collect()
            })
            .collect();
        Ok(Self {
            dimensions: base.dimensions,
            rows,
        })
    }

    /// Returns the vector dimension.
    #[must_use]
    pub const fn dimensions(&self) -> usize {
        self.dimensions
    }

    /// Returns the number of generated vectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether no vectors were generated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the vectors in generation order.
    #[must_use]
    pub fn rows(&self) -> &[Vec<f32>] {
        &self.rows
    }
}

const fn validate(config: &SyntheticConfig) -> Result<(), SyntheticError> {
    if config.point_count == 0 {
        return Err(SyntheticError::ZeroPoints);
    }
    if config.dimensions == 0 {
        return Err(SyntheticError::ZeroDimensions);
    }
    Ok(())
}

fn uniform_row(rng: &mut SmallRng, dimensions: usize) -> Vec<f32> {
    (0..dimensions).map(|_| rng.r#gen::<f32>()).collect()
}
