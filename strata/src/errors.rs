use backtrace::Backtrace;
use std::error::Error;
use std::fmt::{Debug, Display, Formatter};
use std::result::Result;

use crate::common::{atomic, Atomic};

/// Error kinds for strata operations
///
/// Migration itself reports success or failure as a plain `bool`. These kinds
/// describe failures of the surrounding lifecycle: opening and closing a
/// database handle, borrowing its connection, and the reason recorded for the
/// last statement a handle failed to execute.
///
/// # Examples
///
/// ```rust,ignore
/// use strata::errors::{StrataError, ErrorKind, StrataResult};
///
/// fn example() -> StrataResult<()> {
///     Err(StrataError::new("Database is closed", ErrorKind::ConnectionClosed))
/// }
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum ErrorKind {
    // Connection Errors
    /// The database connection could not be opened
    ConnectionError,
    /// The database connection has already been closed
    ConnectionClosed,

    // Statement Errors
    /// A statement could not be prepared or run
    ExecutionError,
    /// A statement violated a constraint of the schema
    ConstraintViolation,

    // Validation Errors
    /// Configuration or input failed validation
    ValidationError,
    /// The operation is not valid in the current context
    InvalidOperation,

    // IO and Storage Errors
    /// Generic IO error
    IOError,
    /// The file was not found
    FileNotFound,
    /// Permission denied for file operation
    PermissionDenied,
    /// File data is corrupted or is not a database
    FileCorrupted,
    /// The disk is full
    DiskFull,
    /// Error from the storage backend
    BackendError,

    /// Internal error (usually indicates a bug)
    InternalError,
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorKind::ConnectionError => write!(f, "Connection error"),
            ErrorKind::ConnectionClosed => write!(f, "Connection closed"),
            ErrorKind::ExecutionError => write!(f, "Execution error"),
            ErrorKind::ConstraintViolation => write!(f, "Constraint violation"),
            ErrorKind::ValidationError => write!(f, "Validation error"),
            ErrorKind::InvalidOperation => write!(f, "Invalid operation"),
            ErrorKind::IOError => write!(f, "IO error"),
            ErrorKind::FileNotFound => write!(f, "File not found"),
            ErrorKind::PermissionDenied => write!(f, "Permission denied"),
            ErrorKind::FileCorrupted => write!(f, "File corrupted"),
            ErrorKind::DiskFull => write!(f, "Disk full"),
            ErrorKind::BackendError => write!(f, "Backend error"),
            ErrorKind::InternalError => write!(f, "Internal error"),
        }
    }
}

/// Custom strata error type.
///
/// `StrataError` carries a message, a kind and an optional cause, and
/// captures a backtrace at construction for debugging.
///
/// # Examples
///
/// ```rust,ignore
/// use strata::errors::{StrataError, ErrorKind};
///
/// let cause = StrataError::new("unable to open database file", ErrorKind::ConnectionError);
/// let err = StrataError::new_with_cause("Failed to open /tmp/app.db", ErrorKind::ConnectionError, cause);
/// ```
#[derive(Clone)]
pub struct StrataError {
    message: String,
    error_kind: ErrorKind,
    cause: Option<Box<StrataError>>,
    backtrace: Atomic<Backtrace>,
}

impl StrataError {
    /// Creates a new `StrataError` with the specified message and error kind.
    pub fn new(message: &str, error_kind: ErrorKind) -> Self {
        StrataError {
            message: message.to_string(),
            error_kind,
            cause: None,
            backtrace: atomic(Backtrace::new()),
        }
    }

    /// Creates a new `StrataError` chained to the error that caused it.
    pub fn new_with_cause(message: &str, error_kind: ErrorKind, cause: StrataError) -> Self {
        StrataError {
            message: message.to_string(),
            error_kind,
            cause: Some(Box::new(cause)),
            backtrace: atomic(Backtrace::new()),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn kind(&self) -> &ErrorKind {
        &self.error_kind
    }

    pub fn cause(&self) -> Option<&StrataError> {
        self.cause.as_deref()
    }
}

impl Display for StrataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Debug for StrataError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.cause {
            Some(cause) => write!(f, "{}\nCaused by: {:?}", self.message, cause),
            None => write!(f, "{}\n{:?}", self.message, self.backtrace.read()),
        }
    }
}

impl Error for StrataError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.cause {
            Some(cause) => Some(cause.as_ref()),
            None => None,
        }
    }
}

/// A result type alias for strata operations.
pub type StrataResult<T> = Result<T, StrataError>;

impl From<std::io::Error> for StrataError {
    fn from(err: std::io::Error) -> Self {
        let error_kind = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied,
            _ => ErrorKind::IOError,
        };
        StrataError::new(&format!("IO error: {}", err), error_kind)
    }
}

impl From<String> for StrataError {
    fn from(msg: String) -> Self {
        StrataError::new(&msg, ErrorKind::InternalError)
    }
}

impl From<&str> for StrataError {
    fn from(msg: &str) -> Self {
        StrataError::new(msg, ErrorKind::InternalError)
    }
}
