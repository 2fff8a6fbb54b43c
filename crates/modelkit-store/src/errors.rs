//! Error handling for modelkit-store
//!
//! Wraps modelkit-core ExError with store-specific helpers

use modelkit_core::errors::{ExError, ExErrorKind};
use modelkit_core::SchemaRegistry;
use rusqlite::ErrorCode;

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

/// Create a migration error
pub fn migration_error(migration_id: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Persistence)
        .with_op("migration")
        .with_message(format!("Migration {} failed: {}", migration_id, reason))
}

/// Create a checksum mismatch error
pub fn checksum_mismatch(migration_id: &str, expected: &str, actual: &str) -> ExError {
    ExError::new(ExErrorKind::ConstraintViolation)
        .with_op("migration_checksum")
        .with_message(format!(
            "Checksum mismatch for migration {}: expected {}, got {}",
            migration_id, expected, actual
        ))
}

/// Create a configuration error for a missing or malformed variable
pub fn config_error(var: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Configuration)
        .with_op("load_config")
        .with_message(format!("{}: {}", var, reason))
}

/// Create a not-found error for a record id
pub fn not_found(op: &str, id: i64) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op(op.to_string())
        .with_entity_id(id.to_string())
        .with_message(format!("no simplemodel row with id {}", id))
}

/// Create a database error from rusqlite::Error
///
/// Constraint failures become `ConstraintViolation`; the constraint name is
/// left unset. Use [`from_write_error`] when a schema registry is at hand.
pub fn from_rusqlite(err: rusqlite::Error) -> ExError {
    if is_constraint_violation(&err) {
        return ExError::new(ExErrorKind::ConstraintViolation)
            .with_op("sqlite")
            .with_message(err.to_string());
    }
    ExError::new(ExErrorKind::Persistence)
        .with_op("sqlite")
        .with_message(err.to_string())
}

/// Create a database error for a failed write, naming the violated constraint
///
/// SQLite reports key violations by column (`UNIQUE constraint failed:
/// simplemodel.col_1, simplemodel.col_2`) and CHECK violations by constraint
/// name; both are mapped to the name the schema gives the constraint.
pub fn from_write_error(err: rusqlite::Error, registry: &SchemaRegistry) -> ExError {
    let constraint = match &err {
        rusqlite::Error::SqliteFailure(_, Some(message)) if is_constraint_violation(&err) => {
            resolve_constraint(message, registry)
        }
        _ => None,
    };

    let ex = from_rusqlite(err);
    match constraint {
        Some(name) => ex.with_constraint(name),
        None => ex,
    }
}

/// Create an IO error
pub fn io_error(operation: &str, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(operation.to_string())
        .with_message(err.to_string())
}

fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == ErrorCode::ConstraintViolation
    )
}

fn resolve_constraint(message: &str, registry: &SchemaRegistry) -> Option<String> {
    if let Some(columns) = message.strip_prefix("UNIQUE constraint failed: ") {
        let qualified: Vec<(&str, &str)> = columns
            .split(", ")
            .filter_map(|c| c.split_once('.'))
            .collect();
        let table = qualified.first()?.0;
        let names: Vec<&str> = qualified.iter().map(|(_, column)| *column).collect();
        return registry.resolve_key_constraint(table, &names);
    }

    if let Some(name) = message.strip_prefix("CHECK constraint failed: ") {
        let known = registry
            .tables()
            .iter()
            .flat_map(|t| t.constraint_names())
            .any(|n| n == name);
        return known.then(|| name.to_string());
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelkit_core::model::default_registry;

    fn sqlite_failure(code: ErrorCode, message: &str) -> rusqlite::Error {
        rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code,
                extended_code: 0,
            },
            Some(message.to_string()),
        )
    }

    #[test]
    fn test_unique_failure_resolves_to_constraint_name() {
        let err = sqlite_failure(
            ErrorCode::ConstraintViolation,
            "UNIQUE constraint failed: simplemodel.col_1, simplemodel.col_2",
        );
        let ex = from_write_error(err, &default_registry());
        assert_eq!(ex.kind(), ExErrorKind::ConstraintViolation);
        assert_eq!(ex.constraint(), Some("uq_simplemodel_col_1"));
    }

    #[test]
    fn test_check_failure_keeps_known_name() {
        let err = sqlite_failure(
            ErrorCode::ConstraintViolation,
            "CHECK constraint failed: ck_simplemodel_type",
        );
        let ex = from_write_error(err, &default_registry());
        assert_eq!(ex.constraint(), Some("ck_simplemodel_type"));
    }

    #[test]
    fn test_not_null_failure_has_no_name() {
        let err = sqlite_failure(
            ErrorCode::ConstraintViolation,
            "NOT NULL constraint failed: simplemodel.id",
        );
        let ex = from_write_error(err, &default_registry());
        assert_eq!(ex.kind(), ExErrorKind::ConstraintViolation);
        assert_eq!(ex.constraint(), None);
    }

    #[test]
    fn test_other_failures_are_persistence() {
        let err = sqlite_failure(ErrorCode::DatabaseBusy, "database is locked");
        let ex = from_rusqlite(err);
        assert_eq!(ex.kind(), ExErrorKind::Persistence);
        assert_eq!(ex.code(), "ERR_PERSISTENCE");
    }

    #[test]
    fn test_config_error() {
        let ex = config_error("DB_HOST", "not set");
        assert_eq!(ex.kind(), ExErrorKind::Configuration);
        assert!(ex.message().contains("DB_HOST"));
    }
}
