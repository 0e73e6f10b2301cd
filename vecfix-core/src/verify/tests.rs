//! Unit tests for row parsing and in-memory fixture verification.

use std::path::Path;

use csv::StringRecord;
use rstest::{fixture, rstest};

use super::{parse_fixture_row, verify_reader};
use crate::{
    config::FixtureConfig,
    error::{RowError, VerifyError, VerifyErrorCode},
    layout::FixtureKind,
    metadata::Metadata,
};

#[fixture]
fn config() -> FixtureConfig {
    FixtureConfig::builder()
        .with_num_vectors(4)
        .with_num_queries(2)
        .with_dimensions(2)
        .with_cluster_count(3)
        .build()
        .expect("valid configuration")
}

fn verify_text(
    config: &FixtureConfig,
    kind: FixtureKind,
    text: &str,
) -> Result<Vec<super::FixtureRow>, VerifyError> {
    verify_reader(config, kind, text.as_bytes(), Path::new("memory.csv"))
}

const VECTORS_WITH_META: &str = "id,v0,v1,meta\r\n\
    item-000000,0.100000,0.200000,cluster=0;source=synthetic\r\n\
    item-000001,0.300000,0.400000,cluster=1;source=synthetic\r\n\
    item-000002,-0.100000,0.000000,cluster=2;source=synthetic\r\n\
    item-000003,0.500000,-0.500000,cluster=0;source=synthetic\r\n";

#[rstest]
fn well_formed_file_passes(config: FixtureConfig) {
    let rows = verify_text(&config, FixtureKind::VectorsWithMeta, VECTORS_WITH_META)
        .expect("file satisfies the contract");
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[3].id.as_deref(), Some("item-000003"));
    assert_eq!(rows[3].vector, vec![0.5, -0.5]);
    assert_eq!(rows[3].metadata, Some(Metadata::for_cluster(0)));
}

#[rstest]
fn bare_query_file_passes(config: FixtureConfig) {
    let rows = verify_text(&config, FixtureKind::Queries, "v0,v1\n1.0,2.0\n-3,4e-1\n")
        .expect("file satisfies the contract");
    assert!(rows.iter().all(|row| row.id.is_none() && row.metadata.is_none()));
    assert_eq!(rows[1].vector, vec![-3.0, 0.4]);
}

#[rstest]
#[case::empty("", VerifyErrorCode::MissingHeader)]
#[case::wrong_header("id,x0,x1\nq-0000,0,0\nq-0001,0,0\n", VerifyErrorCode::HeaderMismatch)]
#[case::too_few_rows("id,v0,v1\nq-0000,0,0\n", VerifyErrorCode::RowCount)]
#[case::too_many_rows(
    "id,v0,v1\nq-0000,0,0\nq-0001,0,0\nq-0002,0,0\n",
    VerifyErrorCode::RowCount
)]
#[case::wrong_id("id,v0,v1\nq-0000,0,0\nq-0007,0,0\n", VerifyErrorCode::IdMismatch)]
#[case::short_row("id,v0,v1\nq-0000,0,0\nq-0001,0\n", VerifyErrorCode::Row)]
fn query_file_violations_are_classified(
    config: FixtureConfig,
    #[case] text: &str,
    #[case] expected: VerifyErrorCode,
) {
    let err = verify_text(&config, FixtureKind::QueriesWithId, text)
        .expect_err("file violates the contract");
    assert_eq!(err.code(), expected);
}

#[rstest]
fn metadata_must_follow_round_robin_assignment(config: FixtureConfig) {
    let tampered = VECTORS_WITH_META.replace(
        "item-000002,-0.100000,0.000000,cluster=2",
        "item-000002,-0.100000,0.000000,cluster=1",
    );
    let err = verify_text(&config, FixtureKind::VectorsWithMeta, &tampered)
        .expect_err("cluster label is wrong");
    match err {
        VerifyError::MetadataMismatch {
            line,
            expected,
            actual,
            ..
        } => {
            assert_eq!(line, 4);
            assert_eq!(expected, "cluster=2;source=synthetic");
            assert_eq!(actual, "cluster=1;source=synthetic");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[rstest]
fn non_finite_coordinate_reports_line_and_column(config: FixtureConfig) {
    let err = verify_text(&config, FixtureKind::Queries, "v0,v1\n0,0\n0,NaN\n")
        .expect_err("NaN is rejected");
    match err {
        VerifyError::Row {
            line,
            source: RowError::InvalidCoordinate { column, value },
            ..
        } => {
            assert_eq!(line, 3);
            assert_eq!(column, 2);
            assert_eq!(value, "NaN");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[rstest]
#[case::numeric(FixtureKind::VectorsNumericId, &["12", "0.5"], Some("12"))]
#[case::item(FixtureKind::Vectors, &["item-000012", "0.5"], Some("item-000012"))]
#[case::bare(FixtureKind::Queries, &["0.5"], None)]
fn parse_fixture_row_splits_columns(
    #[case] kind: FixtureKind,
    #[case] fields: &[&str],
    #[case] id: Option<&str>,
) {
    let record = StringRecord::from(fields.to_vec());
    let row = parse_fixture_row(kind.layout(), 1, &record).expect("row matches the layout");
    assert_eq!(row.id.as_deref(), id);
    assert_eq!(row.vector, vec![0.5]);
}

#[test]
fn parse_fixture_row_rejects_wrong_width() {
    let record = StringRecord::from(vec!["item-000000", "0.1", "0.2"]);
    let err = parse_fixture_row(FixtureKind::VectorsWithMeta.layout(), 2, &record)
        .expect_err("meta column is missing");
    assert_eq!(
        err,
        RowError::ColumnCount {
            expected: 4,
            actual: 3,
        }
    );
}

#[test]
fn parse_fixture_row_surfaces_metadata_errors() {
    let layout = FixtureKind::VectorsWithMeta.layout();

    let record = StringRecord::from(vec!["item-000000", "0.1", r"cluster=0\\"]);
    let row = parse_fixture_row(layout, 1, &record).expect("escaped backslash decodes");
    assert_eq!(
        row.metadata.as_ref().and_then(|meta| meta.get("cluster")),
        Some(r"0\")
    );

    let record = StringRecord::from(vec!["item-000000", "0.1", r"cluster=0\"]);
    let err = parse_fixture_row(layout, 1, &record).expect_err("dangling escape fails");
    assert!(matches!(err, RowError::Metadata(_)));
}

#[test]
fn huge_population_reports_row_count_instead_of_allocating() {
    let config = FixtureConfig::builder()
        .with_num_vectors(usize::MAX)
        .with_dimensions(2)
        .build()
        .expect("any positive count is valid");
    let err = verify_text(&config, FixtureKind::Vectors, "id,v0,v1\r\n")
        .expect_err("no rows are present");
    match err {
        VerifyError::RowCount {
            expected, actual, ..
        } => {
            assert_eq!(expected, usize::MAX);
            assert_eq!(actual, 0);
        }
        other => panic!("unexpected error: {other}"),
    }
}
