//! Integration tests for regolith-types.

use regolith_types::{BodyId, ClusterId, FaceId, RegolithError};

#[test]
fn ids_round_trip_through_index() {
    let body = BodyId::from(3u32);
    let cluster = ClusterId::from(7u32);
    let face = FaceId::from(11u32);

    assert_eq!(body.index(), 3);
    assert_eq!(cluster.index(), 7);
    assert_eq!(face.index(), 11);
}

#[test]
fn ids_are_distinct_types() {
    // BodyId and ClusterId with the same raw value must still compare
    // only against their own kind; this is a compile-time property, so
    // just exercise equality within each kind.
    assert_eq!(BodyId(2), BodyId(2));
    assert_ne!(ClusterId(2), ClusterId(3));
}

#[test]
fn error_messages_carry_context() {
    let err = RegolithError::InvalidMesh("group 1 has a 4-vertex face".into());
    assert!(err.to_string().contains("4-vertex face"));

    let err = RegolithError::SolverCap { iterations: 5000 };
    assert!(err.to_string().contains("5000"));
}

#[test]
fn io_errors_convert() {
    fn read_missing() -> regolith_types::RegolithResult<String> {
        let contents = std::fs::read_to_string("/nonexistent/regolith")?;
        Ok(contents)
    }
    assert!(matches!(read_missing(), Err(RegolithError::Io(_))));
}
