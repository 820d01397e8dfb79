use rusqlite::ErrorCode;
use strata::errors::{ErrorKind, StrataError};

/// Maps a rusqlite error onto the strata error kinds by SQLite result code.
pub(crate) fn to_strata_error(error: rusqlite::Error) -> StrataError {
    let error_kind = match &error {
        rusqlite::Error::SqliteFailure(failure, _) => kind_of(failure.code),
        rusqlite::Error::SqlInputError { error, .. } => kind_of(error.code),
        rusqlite::Error::MultipleStatement
        | rusqlite::Error::InvalidQuery
        | rusqlite::Error::ExecuteReturnedResults => ErrorKind::ExecutionError,
        rusqlite::Error::InvalidPath(_) => ErrorKind::ConnectionError,
        _ => ErrorKind::BackendError,
    };
    StrataError::new(&format!("SQLite Error: {}", error), error_kind)
}

fn kind_of(code: ErrorCode) -> ErrorKind {
    match code {
        ErrorCode::ConstraintViolation => ErrorKind::ConstraintViolation,
        ErrorCode::CannotOpen => ErrorKind::ConnectionError,
        ErrorCode::DatabaseCorrupt | ErrorCode::NotADatabase => ErrorKind::FileCorrupted,
        ErrorCode::PermissionDenied
        | ErrorCode::ReadOnly
        | ErrorCode::AuthorizationForStatementDenied => ErrorKind::PermissionDenied,
        ErrorCode::DiskFull => ErrorKind::DiskFull,
        ErrorCode::SystemIoFailure => ErrorKind::IOError,
        ErrorCode::Unknown | ErrorCode::ApiMisuse => ErrorKind::ExecutionError,
        _ => ErrorKind::BackendError,
    }
}
