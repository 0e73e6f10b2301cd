use std::{io, path::PathBuf};

use rstest::rstest;
use vecfix_core::{
    FixtureError, FixtureErrorCode, MetadataError, RowError, VerifyError, VerifyErrorCode,
};

fn io_error() -> io::Error {
    io::Error::new(io::ErrorKind::PermissionDenied, "denied")
}

#[rstest]
#[case(FixtureError::ZeroVectors, FixtureErrorCode::ZeroVectors, true)]
#[case(FixtureError::ZeroQueries, FixtureErrorCode::ZeroQueries, true)]
#[case(FixtureError::ZeroDimensions, FixtureErrorCode::ZeroDimensions, true)]
#[case(FixtureError::ZeroClusters, FixtureErrorCode::ZeroClusters, true)]
#[case(
    FixtureError::InvalidClusterStd { value: -1.0 },
    FixtureErrorCode::InvalidClusterStd,
    true,
)]
#[case(
    FixtureError::CreateDir { path: PathBuf::from("data"), source: io_error() },
    FixtureErrorCode::CreateDir,
    false,
)]
#[case(
    FixtureError::Io { path: PathBuf::from("data/queries.csv"), source: io_error() },
    FixtureErrorCode::Io,
    false,
)]
fn returns_expected_fixture_code(
    #[case] error: FixtureError,
    #[case] expected: FixtureErrorCode,
    #[case] config_error: bool,
) {
    assert_eq!(error.code(), expected);
    assert_eq!(error.code().to_string(), expected.as_str());
    assert_eq!(error.is_config_error(), config_error);
}

#[rstest]
#[case(
    VerifyError::Open { path: PathBuf::from("x.csv"), source: io_error() },
    VerifyErrorCode::Open,
)]
#[case(VerifyError::MissingHeader { path: PathBuf::from("x.csv") }, VerifyErrorCode::MissingHeader)]
#[case(
    VerifyError::RowCount { path: PathBuf::from("x.csv"), expected: 2, actual: 1 },
    VerifyErrorCode::RowCount,
)]
#[case(
    VerifyError::Row {
        path: PathBuf::from("x.csv"),
        line: 2,
        source: RowError::ColumnCount { expected: 3, actual: 2 },
    },
    VerifyErrorCode::Row,
)]
fn returns_expected_verify_code(#[case] error: VerifyError, #[case] expected: VerifyErrorCode) {
    assert_eq!(error.code(), expected);
    assert!(expected.as_str().starts_with("VECFIX_VERIFY_"));
}

#[test]
fn messages_name_the_offending_file_and_line() {
    let err = VerifyError::Row {
        path: PathBuf::from("data/vectors.csv"),
        line: 9,
        source: RowError::Metadata(MetadataError::TrailingEscape {
            input: r"cluster=1\".to_owned(),
        }),
    };
    assert_eq!(
        err.to_string(),
        r"`data/vectors.csv` line 9: metadata `cluster=1\` ends with a dangling escape"
    );

    let err = VerifyError::HeaderMismatch {
        path: PathBuf::from("q.csv"),
        expected: vec!["v0".to_owned(), "v1".to_owned()],
        actual: vec!["v0".to_owned()],
    };
    assert_eq!(err.to_string(), "`q.csv` header mismatch: expected [v0,v1], found [v0]");
}

#[test]
fn invalid_std_message_includes_the_value() {
    let err = FixtureError::InvalidClusterStd { value: 0.0 };
    assert_eq!(
        err.to_string(),
        "cluster_std must be finite and greater than zero (got 0)"
    );
}
