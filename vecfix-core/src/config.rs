//! Fixture configuration and its builder.
//!
//! A [`FixtureConfig`] can only be obtained through
//! [`FixtureConfigBuilder::build`], so every configuration handed to the
//! emitter or verifier has already been validated.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use crate::{
    error::{FixtureError, Result},
    layout::Population,
};

/// Default number of vectors written to each vector file.
pub const DEFAULT_NUM_VECTORS: usize = 1000;
/// Default number of queries written to each query file.
pub const DEFAULT_NUM_QUERIES: usize = 50;
/// Default vector dimensionality.
pub const DEFAULT_DIMENSIONS: usize = 16;
/// Default number of cluster centers.
pub const DEFAULT_CLUSTER_COUNT: usize = 5;
/// Default per-coordinate standard deviation around each center.
pub const DEFAULT_CLUSTER_STD: f64 = 0.08;
/// Default random seed.
pub const DEFAULT_SEED: u64 = 123;
/// Default output directory, relative to the working directory.
pub const DEFAULT_OUT_DIR: &str = "data";

/// Validated parameters for one fixture run.
///
/// # Examples
/// ```
/// use vecfix_core::FixtureConfig;
///
/// let config = FixtureConfig::builder()
///     .with_dimensions(4)
///     .with_cluster_count(3)
///     .build()
///     .expect("configuration is valid");
/// assert_eq!(config.dimensions(), 4);
/// assert_eq!(config.cluster_count(), 3);
/// assert_eq!(config.num_vectors(), 1000);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureConfig {
    num_vectors: usize,
    num_queries: usize,
    dimensions: usize,
    cluster_count: usize,
    cluster_std: f64,
    seed: u64,
    out_dir: PathBuf,
}

impl FixtureConfig {
    /// Starts a builder populated with the default parameters.
    #[must_use]
    pub fn builder() -> FixtureConfigBuilder {
        FixtureConfigBuilder::new()
    }

    /// Number of rows in each vector file.
    #[must_use]
    #[rustfmt::skip]
    pub const fn num_vectors(&self) -> usize { self.num_vectors }

    /// Number of rows in each query file.
    #[must_use]
    #[rustfmt::skip]
    pub const fn num_queries(&self) -> usize { self.num_queries }

    /// Dimensionality of every center and sample.
    #[must_use]
    #[rustfmt::skip]
    pub const fn dimensions(&self) -> usize { self.dimensions }

    /// Number of cluster centers.
    #[must_use]
    #[rustfmt::skip]
    pub const fn cluster_count(&self) -> usize { self.cluster_count }

    /// Standard deviation of every sampled coordinate around its center.
    #[must_use]
    #[rustfmt::skip]
    pub const fn cluster_std(&self) -> f64 { self.cluster_std }

    /// Seed for the run's random generator.
    #[must_use]
    #[rustfmt::skip]
    pub const fn seed(&self) -> u64 { self.seed }

    /// Directory receiving the fixture files.
    #[must_use]
    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Row count for files drawn from `population`.
    #[must_use]
    pub const fn population_size(&self, population: Population) -> usize {
        match population {
            Population::Vectors => self.num_vectors,
            Population::Queries => self.num_queries,
        }
    }
}

/// Renders the one-line run summary, e.g.
/// `dim=16, vectors=1000, queries=50, clusters=5, cluster_std=0.08`.
impl fmt::Display for FixtureConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "dim={}, vectors={}, queries={}, clusters={}, cluster_std={}",
            self.dimensions, self.num_vectors, self.num_queries, self.cluster_count, self.cluster_std,
        )
    }
}

/// Configures and validates [`FixtureConfig`] instances.
///
/// # Examples
/// ```
/// use vecfix_core::{FixtureConfigBuilder, FixtureErrorCode};
///
/// let err = FixtureConfigBuilder::new()
///     .with_dimensions(0)
///     .build()
///     .expect_err("zero dimensions are rejected");
/// assert_eq!(err.code(), FixtureErrorCode::ZeroDimensions);
/// ```
#[derive(Debug, Clone)]
pub struct FixtureConfigBuilder {
    num_vectors: usize,
    num_queries: usize,
    dimensions: usize,
    cluster_count: usize,
    cluster_std: f64,
    seed: u64,
    out_dir: PathBuf,
}

impl Default for FixtureConfigBuilder {
    fn default() -> Self {
        Self {
            num_vectors: DEFAULT_NUM_VECTORS,
            num_queries: DEFAULT_NUM_QUERIES,
            dimensions: DEFAULT_DIMENSIONS,
            cluster_count: DEFAULT_CLUSTER_COUNT,
            cluster_std: DEFAULT_CLUSTER_STD,
            seed: DEFAULT_SEED,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
        }
    }
}

impl FixtureConfigBuilder {
    /// Creates a builder populated with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the number of vectors per vector file.
    #[must_use]
    pub fn with_num_vectors(mut self, count: usize) -> Self {
        self.num_vectors = count;
        self
    }

    /// Overrides the number of queries per query file.
    #[must_use]
    pub fn with_num_queries(mut self, count: usize) -> Self {
        self.num_queries = count;
        self
    }

    /// Overrides the vector dimensionality.
    #[must_use]
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Overrides the number of cluster centers.
    #[must_use]
    pub fn with_cluster_count(mut self, count: usize) -> Self {
        self.cluster_count = count;
        self
    }

    /// Overrides the per-coordinate standard deviation.
    #[must_use]
    pub fn with_cluster_std(mut self, std_dev: f64) -> Self {
        self.cluster_std = std_dev;
        self
    }

    /// Overrides the random seed.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Overrides the output directory.
    #[must_use]
    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    /// Validates the parameters and constructs a [`FixtureConfig`].
    ///
    /// # Errors
    /// Returns a configuration [`FixtureError`] when any count or the
    /// dimensionality is zero, or when `cluster_std` is not a finite positive
    /// number.
    pub fn build(self) -> Result<FixtureConfig> {
        if self.num_vectors == 0 {
            return Err(FixtureError::ZeroVectors);
        }
        if self.num_queries == 0 {
            return Err(FixtureError::ZeroQueries);
        }
        if self.dimensions == 0 {
            return Err(FixtureError::ZeroDimensions);
        }
        if self.cluster_count == 0 {
            return Err(FixtureError::ZeroClusters);
        }
        if !self.cluster_std.is_finite() || self.cluster_std <= 0.0 {
            return Err(FixtureError::InvalidClusterStd {
                value: self.cluster_std,
            });
        }

        Ok(FixtureConfig {
            num_vectors: self.num_vectors,
            num_queries: self.num_queries,
            dimensions: self.dimensions,
            cluster_count: self.cluster_count,
            cluster_std: self.cluster_std,
            seed: self.seed,
            out_dir: self.out_dir,
        })
    }
}
