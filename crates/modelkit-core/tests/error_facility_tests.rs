use modelkit_core::errors::{ExError, ExErrorKind, ModelError};
use modelkit_core::model::{RowImage, SessionToken};
use modelkit_core::{ModelType, RecordState, SimpleModel};

#[test]
fn test_invalid_tag_verifiable_by_kind() {
    let err = ModelType::decode("INVALID_TYPE").unwrap_err();

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::Validation);
    assert_eq!(ex_err.code(), "ERR_VALIDATION");
    assert_eq!(ex_err.op(), Some("decode_tag"));
    assert_eq!(
        ex_err.message(),
        "'INVALID_TYPE' is not a valid ModelType"
    );
}

#[test]
fn test_too_long_is_validation() {
    let err = SimpleModel::builder()
        .col_1("x".repeat(150))
        .build()
        .validate()
        .unwrap_err();

    let ex_err: ExError = err.into();

    assert_eq!(ex_err.kind(), ExErrorKind::Validation);
    assert!(ex_err.message().contains("col_1 is 150 characters long"));
}

#[test]
fn test_detached_distinct_from_not_loaded() {
    let token = SessionToken::new();
    let record = SimpleModel::from_row(RowImage::id_only(5), token.link());

    let attached: ExError = record.col_2().unwrap_err().into();
    drop(token);
    let detached: ExError = record.col_2().unwrap_err().into();

    assert_eq!(attached.kind(), ExErrorKind::NotLoaded);
    assert_eq!(detached.kind(), ExErrorKind::DetachedAccess);
    assert_eq!(detached.code(), "ERR_DETACHED_ACCESS");
    assert_eq!(detached.entity_id(), Some("5"));
}

#[test]
fn test_lifecycle_misuse_is_invalid_state() {
    let record = SimpleModel::builder().build();

    let err = record.require(RecordState::Persistent, "update").unwrap_err();
    assert_eq!(err.to_string(), "cannot update a transient SimpleModel");

    let ex_err: ExError = err.into();
    assert_eq!(ex_err.kind(), ExErrorKind::InvalidState);
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::Validation, "ERR_VALIDATION"),
        (ExErrorKind::ConstraintViolation, "ERR_CONSTRAINT_VIOLATION"),
        (ExErrorKind::Configuration, "ERR_CONFIGURATION"),
        (ExErrorKind::DetachedAccess, "ERR_DETACHED_ACCESS"),
        (ExErrorKind::NotLoaded, "ERR_NOT_LOADED"),
        (ExErrorKind::InvalidState, "ERR_INVALID_STATE"),
        (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
        (ExErrorKind::Persistence, "ERR_PERSISTENCE"),
        (ExErrorKind::Io, "ERR_IO"),
        (ExErrorKind::Internal, "ERR_INTERNAL"),
    ];

    for (kind, code) in kinds {
        assert_eq!(kind.code(), code);
        assert_eq!(ExError::new(kind).code(), code);
    }
}

#[test]
fn test_model_errors_are_comparable() {
    let a = ModelError::InvalidTag {
        enum_name: "ModelType",
        tag: "X".to_string(),
    };
    assert_eq!(a.clone(), a);
}
