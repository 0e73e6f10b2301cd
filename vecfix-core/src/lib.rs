//! Vecfix core library.
//!
//! Generates deterministic clusters of random vectors and writes them as the
//! five CSV fixture files consumed by vector-search tests, then reads them
//! back to check their column contract.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod config;
mod emitter;
mod error;
mod layout;
mod metadata;
mod sampling;
mod verify;

pub use crate::{
    config::{
        DEFAULT_CLUSTER_COUNT, DEFAULT_CLUSTER_STD, DEFAULT_DIMENSIONS, DEFAULT_NUM_QUERIES,
        DEFAULT_NUM_VECTORS, DEFAULT_OUT_DIR, DEFAULT_SEED, FixtureConfig, FixtureConfigBuilder,
    },
    emitter::{EmitReport, FixtureEmitter, WrittenFixture},
    error::{
        FixtureError, FixtureErrorCode, MetadataError, Result, RowError, VerifyError,
        VerifyErrorCode,
    },
    layout::{
        COORDINATE_PRECISION, FixtureKind, ID_COLUMN, IdStyle, META_COLUMN, Population,
        RowLayout, format_coordinate,
    },
    metadata::{CLUSTER_KEY, Metadata, SOURCE_KEY, SYNTHETIC_SOURCE},
    sampling::{CENTER_MAX, CENTER_MIN, ClusterCenters, ClusterSampler, assigned_cluster},
    verify::{FixtureRow, VerifiedFixture, parse_fixture_row, verify_all, verify_fixture, verify_reader},
};
