//! Column layouts of the five fixture files.
//!
//! Every file is written by the same loop; a [`RowLayout`] decides which
//! identifier and metadata columns surround the coordinates.

use std::fmt;

use crate::{metadata::Metadata, sampling::assigned_cluster};

/// Header of the identifier column.
pub const ID_COLUMN: &str = "id";
/// Header of the metadata column.
pub const META_COLUMN: &str = "meta";
/// Digits written after the decimal point of every coordinate.
pub const COORDINATE_PRECISION: usize = 6;

/// How a row's identifier is derived from its index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdStyle {
    /// `item-{index:06}`.
    Item,
    /// The bare decimal index.
    Numeric,
    /// `q-{index:04}`.
    Query,
}

impl IdStyle {
    /// Formats the identifier for row `index`.
    ///
    /// # Examples
    /// ```
    /// use vecfix_core::IdStyle;
    ///
    /// assert_eq!(IdStyle::Item.format(7), "item-000007");
    /// assert_eq!(IdStyle::Numeric.format(7), "7");
    /// assert_eq!(IdStyle::Query.format(7), "q-0007");
    /// ```
    #[must_use]
    pub fn format(self, index: usize) -> String {
        match self {
            Self::Item => format!("item-{index:06}"),
            Self::Numeric => index.to_string(),
            Self::Query => format!("q-{index:04}"),
        }
    }
}

/// Which optional columns surround the coordinates of a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowLayout {
    /// Leading identifier column, if any.
    pub id: Option<IdStyle>,
    /// Whether a trailing metadata column is written.
    pub include_meta: bool,
}

impl RowLayout {
    /// Total number of columns for vectors of `dimensions` coordinates.
    #[must_use]
    pub const fn column_count(self, dimensions: usize) -> usize {
        let id = if self.id.is_some() { 1 } else { 0 };
        let meta = if self.include_meta { 1 } else { 0 };
        dimensions + id + meta
    }

    /// Header row: `[id,] v0..v{dimensions-1} [,meta]`.
    #[must_use]
    pub fn header(self, dimensions: usize) -> Vec<String> {
        let mut header = Vec::with_capacity(self.column_count(dimensions));
        if self.id.is_some() {
            header.push(ID_COLUMN.to_owned());
        }
        header.extend((0..dimensions).map(|axis| format!("v{axis}")));
        if self.include_meta {
            header.push(META_COLUMN.to_owned());
        }
        header
    }

    /// Data row for item `index` when items are spread round-robin over
    /// `cluster_count` clusters. The metadata column names cluster
    /// `index mod cluster_count`.
    ///
    /// # Examples
    /// ```
    /// use vecfix_core::FixtureKind;
    ///
    /// let row = FixtureKind::VectorsWithMeta.layout().record(7, 5, &[0.5, -0.25]);
    /// assert_eq!(
    ///     row,
    ///     ["item-000007", "0.500000", "-0.250000", "cluster=2;source=synthetic"]
    /// );
    /// ```
    #[must_use]
    pub fn record(self, index: usize, cluster_count: usize, vector: &[f64]) -> Vec<String> {
        let mut record = Vec::with_capacity(self.column_count(vector.len()));
        if let Some(style) = self.id {
            record.push(style.format(index));
        }
        record.extend(vector.iter().copied().map(format_coordinate));
        if self.include_meta {
            let meta = assigned_cluster(index, cluster_count)
                .map(Metadata::for_cluster)
                .unwrap_or_default();
            record.push(meta.encode());
        }
        record
    }
}

/// Renders a coordinate with exactly six fractional digits.
#[must_use]
pub fn format_coordinate(value: f64) -> String {
    format!("{value:.precision$}", precision = COORDINATE_PRECISION)
}

/// The item population a fixture file is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Population {
    /// The `num_vectors` indexed items.
    Vectors,
    /// The `num_queries` query items.
    Queries,
}

/// One of the five fixture files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FixtureKind {
    /// `vectors.csv`: string ids.
    Vectors,
    /// `vectors_numeric_id.csv`: decimal ids.
    VectorsNumericId,
    /// `vectors_with_meta.csv`: string ids plus a metadata column.
    VectorsWithMeta,
    /// `queries.csv`: coordinates only.
    Queries,
    /// `queries_with_id.csv`: query ids.
    QueriesWithId,
}

impl FixtureKind {
    /// All kinds in emission order. The random stream is consumed in this
    /// order, so reordering it changes every generated value.
    pub const ALL: [Self; 5] = [
        Self::Vectors,
        Self::VectorsNumericId,
        Self::VectorsWithMeta,
        Self::Queries,
        Self::QueriesWithId,
    ];

    /// Short name, also the file stem.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Vectors => "vectors",
            Self::VectorsNumericId => "vectors_numeric_id",
            Self::VectorsWithMeta => "vectors_with_meta",
            Self::Queries => "queries",
            Self::QueriesWithId => "queries_with_id",
        }
    }

    /// File name inside the output directory.
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Vectors => "vectors.csv",
            Self::VectorsNumericId => "vectors_numeric_id.csv",
            Self::VectorsWithMeta => "vectors_with_meta.csv",
            Self::Queries => "queries.csv",
            Self::QueriesWithId => "queries_with_id.csv",
        }
    }

    /// Column layout of the file.
    #[must_use]
    pub const fn layout(self) -> RowLayout {
        match self {
            Self::Vectors => RowLayout {
                id: Some(IdStyle::Item),
                include_meta: false,
            },
            Self::VectorsNumericId => RowLayout {
                id: Some(IdStyle::Numeric),
                include_meta: false,
            },
            Self::VectorsWithMeta => RowLayout {
                id: Some(IdStyle::Item),
                include_meta: true,
            },
            Self::Queries => RowLayout {
                id: None,
                include_meta: false,
            },
            Self::QueriesWithId => RowLayout {
                id: Some(IdStyle::Query),
                include_meta: false,
            },
        }
    }

    /// Population the file's rows are drawn from.
    #[must_use]
    pub const fn population(self) -> Population {
        match self {
            Self::Vectors | Self::VectorsNumericId | Self::VectorsWithMeta => Population::Vectors,
            Self::Queries | Self::QueriesWithId => Population::Queries,
        }
    }
}

impl fmt::Display for FixtureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
