use std::path::Path;

use vecfix_core::FixtureConfig;

/// A small configuration writing into `out_dir`.
#[must_use]
pub fn small_config(out_dir: &Path, seed: u64) -> FixtureConfig {
    FixtureConfig::builder()
        .with_num_vectors(20)
        .with_num_queries(4)
        .with_dimensions(3)
        .with_cluster_count(5)
        .with_cluster_std(0.05)
        .with_seed(seed)
        .with_out_dir(out_dir)
        .build()
        .expect("configuration must be valid")
}
