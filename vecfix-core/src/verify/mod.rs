//! Reads fixture files back and checks them against their column contract.
//!
//! Verification is structural: header, row count, column count, finite
//! coordinates, positional ids, and metadata consistent with round-robin
//! cluster assignment. It does not recompute the random values.

use std::{fs::File, io::Read, path::Path};

use csv::{ReaderBuilder, StringRecord};
use tracing::{Span, debug, field, instrument};

use crate::{
    config::FixtureConfig,
    error::{RowError, VerifyError},
    layout::{FixtureKind, RowLayout},
    metadata::Metadata,
    sampling::assigned_cluster,
};

/// One data row read back from a fixture file.
#[derive(Debug, Clone, PartialEq)]
pub struct FixtureRow {
    /// Identifier column, when the layout has one.
    pub id: Option<String>,
    /// Parsed coordinates.
    pub vector: Vec<f64>,
    /// Decoded metadata column, when the layout has one.
    pub metadata: Option<Metadata>,
}

/// A fixture file that passed verification.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedFixture {
    /// Which of the five files this is.
    pub kind: FixtureKind,
    /// Parsed data rows in file order.
    pub rows: Vec<FixtureRow>,
}

/// Parses one CSV record according to `layout`.
///
/// # Errors
/// Returns [`RowError`] when the column count is wrong, a coordinate is not a
/// finite float, or the metadata column cannot be decoded.
///
/// # Examples
/// ```
/// use csv::StringRecord;
/// use vecfix_core::{FixtureKind, parse_fixture_row};
///
/// let record = StringRecord::from(vec!["q-0003", "0.250000", "-1.000000"]);
/// let row = parse_fixture_row(FixtureKind::QueriesWithId.layout(), 2, &record)
///     .expect("row matches the layout");
/// assert_eq!(row.id.as_deref(), Some("q-0003"));
/// assert_eq!(row.vector, vec![0.25, -1.0]);
/// ```
pub fn parse_fixture_row(
    layout: RowLayout,
    dimensions: usize,
    record: &StringRecord,
) -> Result<FixtureRow, RowError> {
    let expected = layout.column_count(dimensions);
    if record.len() != expected {
        return Err(RowError::ColumnCount {
            expected,
            actual: record.len(),
        });
    }

    let mut fields = record.iter().enumerate();
    let id = match layout.id {
        Some(_) => fields.next().map(|(_, raw)| raw.trim().to_owned()),
        None => None,
    };

    let mut vector = Vec::with_capacity(dimensions);
    for (position, raw) in fields.by_ref().take(dimensions) {
        vector.push(parse_coordinate(position, raw)?);
    }

    let metadata = if layout.include_meta {
        fields
            .next()
            .map(|(_, raw)| Metadata::decode(raw.trim()))
            .transpose()?
    } else {
        None
    };

    Ok(FixtureRow {
        id,
        vector,
        metadata,
    })
}

fn parse_coordinate(position: usize, raw: &str) -> Result<f64, RowError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| RowError::InvalidCoordinate {
            column: position + 1,
            value: raw.to_owned(),
        })
}

/// Verifies `<out_dir>/<kind file>` against `config`.
///
/// # Errors
/// Returns [`VerifyError`] describing the first violation found.
#[instrument(
    name = "fixture.verify",
    err,
    skip(config, kind),
    fields(kind = %kind, rows = field::Empty),
)]
pub fn verify_fixture(
    config: &FixtureConfig,
    kind: FixtureKind,
) -> Result<VerifiedFixture, VerifyError> {
    let path = config.out_dir().join(kind.file_name());
    let file = File::open(&path).map_err(|source| VerifyError::Open {
        path: path.clone(),
        source,
    })?;
    let rows = verify_reader(config, kind, file, &path)?;
    Span::current().record("rows", rows.len());
    debug!(path = %path.display(), rows = rows.len(), "fixture file verified");
    Ok(VerifiedFixture { kind, rows })
}

/// Verifies every fixture file in emission order.
///
/// # Errors
/// Returns the first [`VerifyError`] encountered.
pub fn verify_all(config: &FixtureConfig) -> Result<Vec<VerifiedFixture>, VerifyError> {
    FixtureKind::ALL
        .into_iter()
        .map(|kind| verify_fixture(config, kind))
        .collect()
}

/// Verifies fixture contents read from `source`; `path` is only used to
/// label errors.
///
/// # Errors
/// Returns [`VerifyError`] describing the first violation found.
pub fn verify_reader<R: Read>(
    config: &FixtureConfig,
    kind: FixtureKind,
    source: R,
    path: &Path,
) -> Result<Vec<FixtureRow>, VerifyError> {
    let layout = kind.layout();
    let dimensions = config.dimensions();
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(source);
    let mut records = reader.records();

    let header = records
        .next()
        .ok_or_else(|| VerifyError::MissingHeader {
            path: path.to_path_buf(),
        })?
        .map_err(|source| VerifyError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
    let expected_header = layout.header(dimensions);
    if !header
        .iter()
        .map(str::trim)
        .eq(expected_header.iter().map(String::as_str))
    {
        return Err(VerifyError::HeaderMismatch {
            path: path.to_path_buf(),
            expected: expected_header,
            actual: header.iter().map(ToOwned::to_owned).collect(),
        });
    }

    let expected_rows = config.population_size(kind.population());
    // Grown from rows actually present; the configured count may be huge.
    let mut rows = Vec::new();
    for (index, record) in records.enumerate() {
        let record = record.map_err(|source| VerifyError::Csv {
            path: path.to_path_buf(),
            source,
        })?;
        // Line 1 is the header.
        let line = index + 2;
        let row =
            parse_fixture_row(layout, dimensions, &record).map_err(|source| VerifyError::Row {
                path: path.to_path_buf(),
                line,
                source,
            })?;
        check_identity(config, layout, index, &row, path, line)?;
        rows.push(row);
    }

    if rows.len() != expected_rows {
        return Err(VerifyError::RowCount {
            path: path.to_path_buf(),
            expected: expected_rows,
            actual: rows.len(),
        });
    }
    Ok(rows)
}

fn check_identity(
    config: &FixtureConfig,
    layout: RowLayout,
    index: usize,
    row: &FixtureRow,
    path: &Path,
    line: usize,
) -> Result<(), VerifyError> {
    if let (Some(style), Some(actual)) = (layout.id, row.id.as_deref()) {
        let expected = style.format(index);
        if actual != expected {
            return Err(VerifyError::IdMismatch {
                path: path.to_path_buf(),
                line,
                expected,
                actual: actual.to_owned(),
            });
        }
    }

    if let Some(actual) = &row.metadata {
        let expected = assigned_cluster(index, config.cluster_count())
            .map(Metadata::for_cluster)
            .unwrap_or_default();
        if *actual != expected {
            return Err(VerifyError::MetadataMismatch {
                path: path.to_path_buf(),
                line,
                expected: expected.encode(),
                actual: actual.encode(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests;
