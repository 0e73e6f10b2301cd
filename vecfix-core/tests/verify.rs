//! Tests for reading written fixtures back.

mod common;

use std::fs;

use common::small_config;
use rstest::{fixture, rstest};
use vecfix_core::{
    FixtureEmitter, FixtureKind, RowError, VerifyError, VerifyErrorCode, verify_all,
    verify_fixture,
};
use vecfix_test_support::{
    fixtures::{ScratchDir, rewrite_line},
    tracing::RecordingLayer,
};

#[fixture]
fn emitted() -> ScratchDir {
    let scratch = ScratchDir::new().expect("scratch directory");
    FixtureEmitter::seeded(small_config(&scratch.out_dir(), 123))
        .expect("emitter builds")
        .emit()
        .expect("emission succeeds");
    scratch
}

#[rstest]
fn freshly_written_fixtures_verify(emitted: ScratchDir) {
    let config = small_config(&emitted.out_dir(), 123);
    let verified = verify_all(&config).expect("fixtures verify");
    let kinds: Vec<FixtureKind> = verified.iter().map(|fixture| fixture.kind).collect();
    assert_eq!(kinds, FixtureKind::ALL);
    assert_eq!(verified[2].rows.len(), 20);
    assert_eq!(verified[4].rows.len(), 4);
    assert!(verified.iter().all(|fixture| {
        fixture.rows.iter().all(|row| row.vector.len() == 3)
    }));
}

#[rstest]
fn mismatched_dimensions_fail_on_the_header(emitted: ScratchDir) {
    let config = vecfix_core::FixtureConfig::builder()
        .with_num_vectors(20)
        .with_num_queries(4)
        .with_dimensions(4)
        .with_out_dir(emitted.out_dir())
        .build()
        .expect("configuration is valid");
    let err = verify_fixture(&config, FixtureKind::Vectors).expect_err("header has 3 axes");
    assert_eq!(err.code(), VerifyErrorCode::HeaderMismatch);
}

#[rstest]
fn tampered_id_is_reported_with_its_line(emitted: ScratchDir) {
    let path = emitted.file("vectors.csv");
    rewrite_line(&path, 6, |line| line.replacen("item-000004", "item-000040", 1))
        .expect("line exists");

    let err = verify_fixture(&small_config(&emitted.out_dir(), 123), FixtureKind::Vectors)
        .expect_err("id was tampered with");
    match err {
        VerifyError::IdMismatch {
            path: reported,
            line,
            expected,
            actual,
        } => {
            assert_eq!(reported, path);
            assert_eq!(line, 6);
            assert_eq!(expected, "item-000004");
            assert_eq!(actual, "item-000040");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[rstest]
fn tampered_coordinate_is_reported_with_its_line(emitted: ScratchDir) {
    let path = emitted.file("queries.csv");
    rewrite_line(&path, 3, |line| format!("abc{line}")).expect("line exists");

    let err = verify_fixture(&small_config(&emitted.out_dir(), 123), FixtureKind::Queries)
        .expect_err("coordinate was tampered with");
    assert!(matches!(
        err,
        VerifyError::Row {
            line: 3,
            source: RowError::InvalidCoordinate { column: 1, .. },
            ..
        }
    ));
}

#[rstest]
fn truncated_file_fails_the_row_count(emitted: ScratchDir) {
    let path = emitted.file("queries_with_id.csv");
    let text = fs::read_to_string(&path).expect("readable");
    let truncated: String = text.split_inclusive("\r\n").take(3).collect();
    fs::write(&path, truncated).expect("writable");

    let err = verify_fixture(&small_config(&emitted.out_dir(), 123), FixtureKind::QueriesWithId)
        .expect_err("two rows are missing");
    assert!(matches!(
        err,
        VerifyError::RowCount {
            expected: 4,
            actual: 2,
            ..
        }
    ));
}

#[rstest]
fn missing_file_fails_to_open(emitted: ScratchDir) {
    fs::remove_file(emitted.file("queries.csv")).expect("removable");
    let err = verify_all(&small_config(&emitted.out_dir(), 123)).expect_err("file is missing");
    assert_eq!(err.code(), VerifyErrorCode::Open);
    assert_eq!(err.code().as_str(), "VECFIX_VERIFY_OPEN");
}

#[rstest]
fn verification_records_a_span_per_file(emitted: ScratchDir) {
    let config = small_config(&emitted.out_dir(), 123);
    let (result, layer) = RecordingLayer::capture(|| verify_all(&config));
    result.expect("fixtures verify");

    let spans = layer.spans_named("fixture.verify");
    assert_eq!(spans.len(), FixtureKind::ALL.len());
    assert_eq!(spans[3].field("kind"), Some("queries"));
    assert_eq!(spans[3].field("rows"), Some("4"));
}
