//! Writes the five fixture files.
//!
//! The emitter owns the run's random generator and consumes it in a fixed
//! order: every center coordinate first, then every sampled coordinate in
//! [`FixtureKind::ALL`] order. Equal seeds therefore reproduce equal files.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use csv::{Terminator, WriterBuilder};
use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{Span, debug, field, info, instrument};

use crate::{
    config::FixtureConfig,
    error::{FixtureError, Result},
    layout::FixtureKind,
    sampling::{ClusterCenters, ClusterSampler},
};

/// A fixture file produced by [`FixtureEmitter::emit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFixture {
    /// Which of the five files this is.
    pub kind: FixtureKind,
    /// Where it was written.
    pub path: PathBuf,
    /// Number of data rows, excluding the header.
    pub rows: usize,
}

/// Summary of a completed emission run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmitReport {
    files: Vec<WrittenFixture>,
}

impl EmitReport {
    /// The written files in emission order.
    #[must_use]
    pub fn files(&self) -> &[WrittenFixture] {
        &self.files
    }

    /// Looks up the entry for `kind`.
    #[must_use]
    pub fn get(&self, kind: FixtureKind) -> Option<&WrittenFixture> {
        self.files.iter().find(|file| file.kind == kind)
    }
}

/// Generates cluster centers and writes every fixture file.
///
/// # Examples
/// ```
/// use vecfix_core::{FixtureConfig, FixtureEmitter};
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let dir = tempfile::tempdir()?;
/// let config = FixtureConfig::builder()
///     .with_num_vectors(10)
///     .with_num_queries(2)
///     .with_dimensions(3)
///     .with_out_dir(dir.path())
///     .build()?;
/// let report = FixtureEmitter::seeded(config)?.emit()?;
/// assert_eq!(report.files().len(), 5);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FixtureEmitter<R = StdRng> {
    config: FixtureConfig,
    sampler: ClusterSampler,
    rng: R,
}

impl FixtureEmitter<StdRng> {
    /// Creates an emitter whose generator is seeded from the configuration.
    ///
    /// # Errors
    /// Returns [`FixtureError::InvalidClusterStd`] if the sampler cannot be
    /// built.
    pub fn seeded(config: FixtureConfig) -> Result<Self> {
        let rng = StdRng::seed_from_u64(config.seed());
        Self::with_rng(config, rng)
    }

    /// The centers a seeded run of `config` will draw, computed from a fresh
    /// generator so no emitter's stream is advanced.
    ///
    /// # Examples
    /// ```
    /// use vecfix_core::{FixtureConfig, FixtureEmitter};
    ///
    /// let config = FixtureConfig::builder().with_cluster_count(3).build()?;
    /// let centers = FixtureEmitter::preview_centers(&config);
    /// assert_eq!(centers.len(), 3);
    /// assert_eq!(centers, FixtureEmitter::preview_centers(&config));
    /// # Ok::<(), vecfix_core::FixtureError>(())
    /// ```
    #[must_use]
    pub fn preview_centers(config: &FixtureConfig) -> ClusterCenters {
        let mut rng = StdRng::seed_from_u64(config.seed());
        ClusterCenters::generate(config.cluster_count(), config.dimensions(), &mut rng)
    }
}

impl<R: Rng> FixtureEmitter<R> {
    /// Creates an emitter drawing from a caller-supplied generator.
    ///
    /// # Errors
    /// Returns [`FixtureError::InvalidClusterStd`] if the sampler cannot be
    /// built.
    pub fn with_rng(config: FixtureConfig, rng: R) -> Result<Self> {
        let sampler = ClusterSampler::new(config.cluster_std())?;
        Ok(Self {
            config,
            sampler,
            rng,
        })
    }

    /// The configuration this emitter writes.
    #[must_use]
    pub const fn config(&self) -> &FixtureConfig {
        &self.config
    }

    /// Creates the output directory, draws the centers, and writes the five
    /// files in [`FixtureKind::ALL`] order.
    ///
    /// # Errors
    /// Returns the first I/O or CSV failure. Files written before the
    /// failure are left on disk.
    #[instrument(
        name = "fixture.emit",
        err,
        skip(self),
        fields(out_dir = %self.config.out_dir().display(), seed = self.config.seed()),
    )]
    pub fn emit(mut self) -> Result<EmitReport> {
        let out_dir = self.config.out_dir().to_path_buf();
        fs::create_dir_all(&out_dir).map_err(|source| FixtureError::CreateDir {
            path: out_dir.clone(),
            source,
        })?;

        let centers = self.draw_centers();
        let mut files = Vec::with_capacity(FixtureKind::ALL.len());
        for kind in FixtureKind::ALL {
            let path = out_dir.join(kind.file_name());
            let rows = self.write_file(kind, &centers, &path)?;
            files.push(WrittenFixture { kind, path, rows });
        }

        info!(files = files.len(), config = %self.config, "fixture set written");
        Ok(EmitReport { files })
    }

    fn draw_centers(&mut self) -> ClusterCenters {
        ClusterCenters::generate(
            self.config.cluster_count(),
            self.config.dimensions(),
            &mut self.rng,
        )
    }

    #[instrument(
        name = "fixture.write",
        err,
        skip(self, kind, centers, path),
        fields(kind = %kind, path = %path.display(), rows = field::Empty),
    )]
    fn write_file(&mut self, kind: FixtureKind, centers: &ClusterCenters, path: &Path) -> Result<usize> {
        let file = File::create(path).map_err(|source| FixtureError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let rows = self
            .write_rows(kind, centers, file)
            .map_err(|source| FixtureError::Csv {
                path: path.to_path_buf(),
                source,
            })?;
        Span::current().record("rows", rows);
        debug!(kind = %kind, rows, "fixture file written");
        Ok(rows)
    }

    /// Writes the header and every data row of `kind`, returning the number
    /// of data rows. `centers` must come from [`Self::draw_centers`] so its
    /// dimensionality matches the header.
    fn write_rows<W: Write>(
        &mut self,
        kind: FixtureKind,
        centers: &ClusterCenters,
        sink: W,
    ) -> core::result::Result<usize, csv::Error> {
        let layout = kind.layout();
        let rows = self.config.population_size(kind.population());
        let mut writer = WriterBuilder::new()
            .terminator(Terminator::CRLF)
            .from_writer(sink);

        writer.write_record(layout.header(self.config.dimensions()))?;
        let mut written = 0;
        for index in 0..rows {
            let Some((_, center)) = centers.for_item(index) else {
                break;
            };
            let vector = self.sampler.sample(center, &mut self.rng);
            writer.write_record(layout.record(index, centers.len(), &vector))?;
            written += 1;
        }
        writer.flush()?;
        Ok(written)
    }
}
