//! Cluster center generation and isotropic Gaussian sampling.
//!
//! Both halves take the random source as an explicit `&mut R` so callers
//! decide which generator is consumed and in what order.

use rand::{Rng, distributions::Uniform};
use rand_distr::{Distribution, Normal};

use crate::error::{FixtureError, Result};

/// Lower bound of every center coordinate.
pub const CENTER_MIN: f64 = -1.0;
/// Upper bound of every center coordinate.
pub const CENTER_MAX: f64 = 1.0;

/// Returns the cluster assigned to item `index` under round-robin assignment,
/// or `None` when there are no clusters.
///
/// # Examples
/// ```
/// use vecfix_core::assigned_cluster;
///
/// assert_eq!(assigned_cluster(7, 5), Some(2));
/// assert_eq!(assigned_cluster(3, 0), None);
/// ```
#[must_use]
pub const fn assigned_cluster(index: usize, cluster_count: usize) -> Option<usize> {
    index.checked_rem(cluster_count)
}

/// The fixed set of centers shared by every sample of a run.
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterCenters {
    centers: Vec<Vec<f64>>,
    dimensions: usize,
}

impl ClusterCenters {
    /// Draws `count` centers of `dimensions` coordinates, each uniform over
    /// `[-1, 1]`.
    ///
    /// Coordinates are consumed from `rng` center by center, so the same
    /// generator state always yields the same centers.
    ///
    /// # Examples
    /// ```
    /// use rand::{SeedableRng, rngs::StdRng};
    /// use vecfix_core::ClusterCenters;
    ///
    /// let mut rng = StdRng::seed_from_u64(1);
    /// let centers = ClusterCenters::generate(3, 4, &mut rng);
    /// assert_eq!(centers.len(), 3);
    /// assert_eq!(centers.dimensions(), 4);
    /// ```
    pub fn generate<R>(count: usize, dimensions: usize, rng: &mut R) -> Self
    where
        R: Rng + ?Sized,
    {
        let range = Uniform::new_inclusive(CENTER_MIN, CENTER_MAX);
        let centers = (0..count)
            .map(|_| (0..dimensions).map(|_| range.sample(rng)).collect())
            .collect();
        Self {
            centers,
            dimensions,
        }
    }

    /// Wraps precomputed centers, e.g. for tests with hand-placed clusters.
    ///
    /// Returns `None` when the centers do not all share one dimensionality.
    #[must_use]
    pub fn from_vecs(centers: Vec<Vec<f64>>) -> Option<Self> {
        let dimensions = centers.first().map_or(0, Vec::len);
        centers
            .iter()
            .all(|center| center.len() == dimensions)
            .then_some(Self {
                centers,
                dimensions,
            })
    }

    /// Number of centers.
    #[must_use]
    #[rustfmt::skip]
    pub const fn len(&self) -> usize { self.centers.len() }

    /// Returns `true` when no centers were generated.
    #[must_use]
    #[rustfmt::skip]
    pub const fn is_empty(&self) -> bool { self.centers.is_empty() }

    /// Dimensionality of each center.
    #[must_use]
    #[rustfmt::skip]
    pub const fn dimensions(&self) -> usize { self.dimensions }

    /// Returns the center of `cluster`.
    #[must_use]
    pub fn get(&self, cluster: usize) -> Option<&[f64]> {
        self.centers.get(cluster).map(Vec::as_slice)
    }

    /// Resolves the round-robin cluster of item `index` and its center.
    #[must_use]
    pub fn for_item(&self, index: usize) -> Option<(usize, &[f64])> {
        let cluster = assigned_cluster(index, self.centers.len())?;
        self.get(cluster).map(|center| (cluster, center))
    }

    /// Iterates the centers in cluster order.
    pub fn iter(&self) -> impl Iterator<Item = &[f64]> {
        self.centers.iter().map(Vec::as_slice)
    }
}

/// Draws vectors from an isotropic Gaussian around a given center.
#[derive(Debug, Clone, Copy)]
pub struct ClusterSampler {
    noise: Normal<f64>,
    std_dev: f64,
}

impl ClusterSampler {
    /// Builds a sampler with per-coordinate standard deviation `std_dev`.
    ///
    /// # Errors
    /// Returns [`FixtureError::InvalidClusterStd`] when `std_dev` is not a
    /// finite positive number.
    pub fn new(std_dev: f64) -> Result<Self> {
        if !std_dev.is_finite() || std_dev <= 0.0 {
            return Err(FixtureError::InvalidClusterStd { value: std_dev });
        }
        let noise = Normal::new(0.0, std_dev)
            .map_err(|_| FixtureError::InvalidClusterStd { value: std_dev })?;
        Ok(Self { noise, std_dev })
    }

    /// Standard deviation applied to every coordinate.
    #[must_use]
    #[rustfmt::skip]
    pub const fn std_dev(&self) -> f64 { self.std_dev }

    /// Samples one vector with coordinate `j` drawn from
    /// `Normal(center[j], std_dev)`.
    ///
    /// # Examples
    /// ```
    /// use rand::{SeedableRng, rngs::StdRng};
    /// use vecfix_core::ClusterSampler;
    ///
    /// let sampler = ClusterSampler::new(0.08).expect("positive std is valid");
    /// let mut rng = StdRng::seed_from_u64(9);
    /// let sample = sampler.sample(&[0.5, -0.5], &mut rng);
    /// assert_eq!(sample.len(), 2);
    /// ```
    pub fn sample<R>(&self, center: &[f64], rng: &mut R) -> Vec<f64>
    where
        R: Rng + ?Sized,
    {
        center
            .iter()
            .map(|mean| mean + self.noise.sample(rng))
            .collect()
    }
}
