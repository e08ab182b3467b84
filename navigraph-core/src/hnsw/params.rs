//! Parameter handling for the HNSW index.

use std::num::NonZeroUsize;

use crate::hnsw::error::HnswError;

const DEFAULT_EF_SEARCH: usize = 64;
const DEFAULT_MAX_LEVEL: usize = 16;
const DEFAULT_SEED: u64 = 0x5EED_CAFE;

/// Tuning knobs for an [`HnswIndex`](crate::HnswIndex).
///
/// `M` bounds upper-layer fan-out and `2 * M` the base layer. Construction
/// explores `ef_construction` candidates per layer; queries use `ef_search`
/// unless the index overrides it.
#[derive(Clone, Debug, PartialEq)]
pub struct HnswParams {
    max_connections: usize,
    ef_construction: usize,
    ef_search: usize,
    level_multiplier: f64,
    max_level: usize,
    rng_seed: u64,
}

fn reject(reason: impl Into<String>) -> HnswError {
    HnswError::InvalidParameters {
        reason: reason.into(),
    }
}

impl HnswParams {
    /// Builds parameters for fan-out `max_connections` (`M`) and construction
    /// beam `ef_construction`.
    ///
    /// `mL` becomes `1 / ln(M)`, or `1.0` when `M` is one.
    ///
    /// # Errors
    /// Returns [`HnswError::InvalidParameters`] when `M` is zero, when `2 * M`
    /// overflows, or when `ef_construction < M`.
    ///
    /// # Examples
    /// ```
    /// use navigraph_core::HnswParams;
    /// let params = HnswParams::new(16, 200).expect("parameters must be valid");
    /// assert_eq!(params.max_connections(), 16);
    /// assert_eq!(params.connection_limit_for_level(0), 32);
    /// ```
    pub fn new(max_connections: usize, ef_construction: usize) -> Result<Self, HnswError> {
        match max_connections {
            0 => return Err(reject("max_connections must be greater than zero")),
            m if m.checked_mul(2).is_none() => {
                return Err(reject(format!("max_connections ({m}) overflows the base layer limit")));
            }
            m if ef_construction < m => {
                return Err(reject(format!(
                    "ef_construction ({ef_construction}) must be >= max_connections ({m})"
                )));
            }
            _ => {}
        }
        Ok(Self {
            max_connections,
            ef_construction,
            ef_search: DEFAULT_EF_SEARCH,
            level_multiplier: default_level_multiplier(max_connections),
            max_level: DEFAULT_MAX_LEVEL,
            rng_seed: DEFAULT_SEED,
        })
    }

    /// Overrides the random level multiplier (`mL`) used when sampling layers.
    ///
    /// Non-finite or non-positive values are ignored.
    #[must_use]
    pub fn with_level_multiplier(mut self, multiplier: f64) -> Self {
        if multiplier.is_finite() && multiplier > 0.0 {
            self.level_multiplier = multiplier;
        }
        self
    }

    /// Caps the maximum layer that will be sampled for new nodes.
    #[must_use]
    pub fn with_max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self
    }

    /// Seeds level sampling; sequential builds with equal seeds are identical.
    #[must_use]
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = seed;
        self
    }

    /// Sets the default beam width used by queries.
    #[must_use]
    pub fn with_ef_search(mut self, ef_search: NonZeroUsize) -> Self {
        self.ef_search = ef_search.get();
        self
    }

    /// Returns the neighbour fan-out (`M`) enforced on upper layers.
    #[must_use]
    pub fn max_connections(&self) -> usize {
        self.max_connections
    }

    /// Returns the construction search breadth (`ef_construction`).
    #[must_use]
    pub fn ef_construction(&self) -> usize {
        self.ef_construction
    }

    /// Returns the default query beam width (`ef_search`).
    #[must_use]
    pub fn ef_search(&self) -> usize {
        self.ef_search
    }

    /// Returns the level multiplier (`mL`).
    #[must_use]
    pub fn level_multiplier(&self) -> f64 {
        self.level_multiplier
    }

    /// Returns the highest layer a node may be assigned.
    #[must_use]
    pub fn max_level(&self) -> usize {
        self.max_level
    }

    /// Returns the seed used for level sampling.
    #[must_use]
    pub fn rng_seed(&self) -> u64 {
        self.rng_seed
    }

    /// Maximum neighbour count at `level`: `2 * M` on the base layer, `M` above.
    #[must_use]
    pub fn connection_limit_for_level(&self, level: usize) -> usize {
        if level == 0 {
            self.max_connections * 2
        } else {
            self.max_connections
        }
    }
}

fn default_level_multiplier(max_connections: usize) -> f64 {
    if max_connections < 2 {
        1.0
    } else {
        (max_connections as f64).ln().recip()
    }
}

impl Default for HnswParams {
    /// `M = 16`, `ef_construction = 200`, `ef_search = 64`.
    fn default() -> Self {
        Self {
            max_connections: 16,
            ef_construction: 200,
            ef_search: DEFAULT_EF_SEARCH,
            level_multiplier: default_level_multiplier(16),
            max_level: DEFAULT_MAX_LEVEL,
            rng_seed: DEFAULT_SEED,
        }
    }
}
