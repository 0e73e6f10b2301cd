//! Error types for the vecfix core library.
//!
//! Defines the error enums exposed by the public API, their stable
//! machine-readable codes, and a convenient result alias.

use std::{fmt, io, path::PathBuf};

use thiserror::Error;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!("Retrieve the stable [`", stringify!($CodeTy), "`] for this error.")]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Error produced while configuring or emitting a fixture set.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum FixtureError {
    /// The number of vectors to generate was zero.
    #[error("num_vectors must be at least 1 (got 0)")]
    ZeroVectors,
    /// The number of queries to generate was zero.
    #[error("num_queries must be at least 1 (got 0)")]
    ZeroQueries,
    /// The vector dimensionality was zero.
    #[error("dimensions must be at least 1 (got 0)")]
    ZeroDimensions,
    /// The number of cluster centers was zero.
    #[error("cluster_count must be at least 1 (got 0)")]
    ZeroClusters,
    /// The cluster standard deviation was non-finite or not strictly positive.
    #[error("cluster_std must be finite and greater than zero (got {value})")]
    InvalidClusterStd {
        /// The rejected standard deviation.
        value: f64,
    },
    /// The output directory could not be created.
    #[error("failed to create output directory `{path}`: {source}")]
    CreateDir {
        /// Directory that could not be created.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// A fixture file could not be created or flushed.
    #[error("failed to write `{path}`: {source}")]
    Io {
        /// File that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// Serialising a CSV record failed.
    #[error("failed to write CSV records to `{path}`: {source}")]
    Csv {
        /// File that triggered the failure.
        path: PathBuf,
        /// Underlying CSV writer error.
        #[source]
        source: csv::Error,
    },
}

define_error_codes! {
    /// Stable codes describing [`FixtureError`] variants.
    enum FixtureErrorCode for FixtureError {
        /// The number of vectors to generate was zero.
        ZeroVectors => ZeroVectors => "VECFIX_ZERO_VECTORS",
        /// The number of queries to generate was zero.
        ZeroQueries => ZeroQueries => "VECFIX_ZERO_QUERIES",
        /// The vector dimensionality was zero.
        ZeroDimensions => ZeroDimensions => "VECFIX_ZERO_DIMENSIONS",
        /// The number of cluster centers was zero.
        ZeroClusters => ZeroClusters => "VECFIX_ZERO_CLUSTERS",
        /// The cluster standard deviation was invalid.
        InvalidClusterStd => InvalidClusterStd { .. } => "VECFIX_INVALID_CLUSTER_STD",
        /// The output directory could not be created.
        CreateDir => CreateDir { .. } => "VECFIX_CREATE_DIR",
        /// A fixture file could not be created or flushed.
        Io => Io { .. } => "VECFIX_IO",
        /// Serialising a CSV record failed.
        Csv => Csv { .. } => "VECFIX_CSV",
    }
}

impl FixtureError {
    /// Returns `true` when the error was raised by configuration validation,
    /// before any file was touched.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ZeroVectors
                | Self::ZeroQueries
                | Self::ZeroDimensions
                | Self::ZeroClusters
                | Self::InvalidClusterStd { .. }
        )
    }
}

/// Error produced while decoding a `key=value;key2=value2` metadata string.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum MetadataError {
    /// The input ended with an unpaired escape character.
    #[error("metadata `{input}` ends with a dangling escape")]
    TrailingEscape {
        /// The raw metadata string.
        input: String,
    },
}

/// Error produced while parsing a single fixture row.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum RowError {
    /// The row did not have the number of columns the layout requires.
    #[error("expected {expected} columns but found {actual}")]
    ColumnCount {
        /// Column count required by the layout.
        expected: usize,
        /// Column count present in the row.
        actual: usize,
    },
    /// A coordinate column did not contain a finite float.
    #[error("column {column} is not a finite float: `{value}`")]
    InvalidCoordinate {
        /// One-based column number.
        column: usize,
        /// Raw field contents.
        value: String,
    },
    /// The metadata column could not be decoded.
    #[error(transparent)]
    Metadata(#[from] MetadataError),
}

/// Error produced while verifying a fixture file against its contract.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum VerifyError {
    /// The fixture file could not be opened.
    #[error("failed to open `{path}`: {source}")]
    Open {
        /// File that could not be opened.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The CSV reader failed.
    #[error("failed to read CSV records from `{path}`: {source}")]
    Csv {
        /// File that triggered the failure.
        path: PathBuf,
        /// Underlying CSV reader error.
        #[source]
        source: csv::Error,
    },
    /// The file was empty.
    #[error("`{path}` has no header row")]
    MissingHeader {
        /// Offending file.
        path: PathBuf,
    },
    /// The header row did not match the layout.
    #[error("`{path}` header mismatch: expected [{}], found [{}]", .expected.join(","), .actual.join(","))]
    HeaderMismatch {
        /// Offending file.
        path: PathBuf,
        /// Header required by the layout.
        expected: Vec<String>,
        /// Header present in the file.
        actual: Vec<String>,
    },
    /// The number of data rows did not match the configured population.
    #[error("`{path}` has {actual} data rows but {expected} were expected")]
    RowCount {
        /// Offending file.
        path: PathBuf,
        /// Configured row count.
        expected: usize,
        /// Row count present in the file.
        actual: usize,
    },
    /// A data row could not be parsed.
    #[error("`{path}` line {line}: {source}")]
    Row {
        /// Offending file.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Row-level failure.
        #[source]
        source: RowError,
    },
    /// A row carried the wrong identifier for its position.
    #[error("`{path}` line {line}: expected id `{expected}` but found `{actual}`")]
    IdMismatch {
        /// Offending file.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Identifier implied by the row index.
        expected: String,
        /// Identifier present in the file.
        actual: String,
    },
    /// A row carried metadata inconsistent with its cluster assignment.
    #[error("`{path}` line {line}: expected metadata `{expected}` but found `{actual}`")]
    MetadataMismatch {
        /// Offending file.
        path: PathBuf,
        /// One-based line number.
        line: usize,
        /// Metadata implied by the row index.
        expected: String,
        /// Metadata present in the file.
        actual: String,
    },
}

define_error_codes! {
    /// Stable codes describing [`VerifyError`] variants.
    enum VerifyErrorCode for VerifyError {
        /// The fixture file could not be opened.
        Open => Open { .. } => "VECFIX_VERIFY_OPEN",
        /// The CSV reader failed.
        Csv => Csv { .. } => "VECFIX_VERIFY_CSV",
        /// The file was empty.
        MissingHeader => MissingHeader { .. } => "VECFIX_VERIFY_MISSING_HEADER",
        /// The header row did not match the layout.
        HeaderMismatch => HeaderMismatch { .. } => "VECFIX_VERIFY_HEADER_MISMATCH",
        /// The number of data rows did not match the configuration.
        RowCount => RowCount { .. } => "VECFIX_VERIFY_ROW_COUNT",
        /// A data row could not be parsed.
        Row => Row { .. } => "VECFIX_VERIFY_ROW",
        /// A row carried the wrong identifier.
        IdMismatch => IdMismatch { .. } => "VECFIX_VERIFY_ID_MISMATCH",
        /// A row carried inconsistent metadata.
        MetadataMismatch => MetadataMismatch { .. } => "VECFIX_VERIFY_METADATA_MISMATCH",
    }
}

/// Convenient alias for results returned by the emitter and configuration API.
pub type Result<T> = core::result::Result<T, FixtureError>;
