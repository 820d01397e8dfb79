use crate::builder::SqliteDatabaseBuilder;
use crate::config::SqliteConfig;
use crate::version::sqlite_version;
use crate::wrapper::to_strata_error;
use parking_lot::Mutex;
use rusqlite::{Batch, Connection};
use std::sync::Arc;
use strata::common::{atomic, Atomic, ReadExecutor, WriteExecutor};
use strata::database::Database;
use strata::errors::{ErrorKind, StrataError, StrataResult};

#[derive(Clone)]
/// SQLite-backed database handle.
///
/// An open connection to one SQLite database, identified by its name (the
/// file path, or `":memory:"`) and a connection name. Uses PIMPL with
/// `Arc<SqliteDatabaseInner>`: clones share the same connection, and the
/// connection is closed when the last clone is dropped or when
/// [`close`](SqliteDatabase::close) is called.
///
/// Implements [`Database`], so it can be handed to any
/// [`Migratable`](strata::migration::Migratable). Each `execute` runs exactly
/// one statement; failures are logged, remembered as
/// [`last_error`](SqliteDatabase::last_error) and reported as `false`.
///
/// # Examples
///
/// ```rust,ignore
/// use strata::migration::{Migratable, Revision};
/// use strata_sqlite_adapter::SqliteDatabase;
///
/// let db = SqliteDatabase::with_config()
///     .db_path("/var/lib/app/app.db")
///     .connection_name("migrations")
///     .open()?;
///
/// let revision = Revision::new("CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT)");
/// assert!(revision.migrate(&db));
/// ```
pub struct SqliteDatabase {
    inner: Arc<SqliteDatabaseInner>,
}

impl SqliteDatabase {
    /// Name of the driver this handle requires.
    pub const DRIVER: &'static str = "SQLITE";

    /// Creates a builder for configuring and opening a database.
    #[inline]
    pub fn with_config() -> SqliteDatabaseBuilder {
        SqliteDatabaseBuilder::new()
    }

    /// Opens (creating if needed) the database file at `path` with default settings.
    pub fn open(path: &str) -> StrataResult<SqliteDatabase> {
        Self::with_config().db_path(path).open()
    }

    /// Opens a private in-memory database.
    pub fn open_in_memory() -> StrataResult<SqliteDatabase> {
        Self::with_config().in_memory(true).open()
    }

    pub(crate) fn from_config(config: SqliteConfig) -> StrataResult<SqliteDatabase> {
        config.validate()?;

        let flags = config.open_flags();
        let opened = if config.in_memory() {
            Connection::open_in_memory_with_flags(flags)
        } else {
            Connection::open_with_flags(config.db_path(), flags)
        };
        let connection = opened.map_err(|err| {
            let cause = to_strata_error(err);
            log::error!("Failed to open database {}: {}", config.name(), cause);
            StrataError::new_with_cause(
                &format!("Failed to open database {}", config.name()),
                ErrorKind::ConnectionError,
                cause,
            )
        })?;

        connection
            .busy_timeout(config.busy_timeout())
            .map_err(to_strata_error)?;

        log::debug!(
            "Opened {} database {} (connection {}, SQLite {})",
            Self::DRIVER,
            config.name(),
            config.connection_name(),
            sqlite_version()
        );

        Ok(SqliteDatabase {
            inner: Arc::new(SqliteDatabaseInner::new(config, connection)),
        })
    }

    /// The database name: its file path, or `":memory:"`.
    #[inline]
    pub fn name(&self) -> &str {
        self.inner.config.name()
    }

    #[inline]
    pub fn connection_name(&self) -> &str {
        self.inner.config.connection_name()
    }

    #[inline]
    pub fn config(&self) -> &SqliteConfig {
        &self.inner.config
    }

    /// Why the most recent `execute` failed, or `None` if it succeeded.
    pub fn last_error(&self) -> Option<StrataError> {
        self.inner.last_error.read_with(|err| err.clone())
    }

    pub fn is_closed(&self) -> bool {
        self.inner.connection.lock().is_none()
    }

    /// Closes the connection for every clone of this handle.
    ///
    /// Closing an already closed handle is a no-op. Subsequent `execute` calls
    /// fail.
    pub fn close(&self) -> StrataResult<()> {
        self.inner.close()
    }

    /// Returns `true` when the database holds no schema objects yet.
    pub fn is_fresh(&self) -> StrataResult<bool> {
        let objects: i64 = self.with_connection(|conn| {
            conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| row.get(0))
        })?;
        Ok(objects == 0)
    }

    /// Runs `f` against the open connection.
    ///
    /// Intended for reads that fall outside the migration contract, such as
    /// verifying what a migration left behind.
    ///
    /// The connection stays locked while `f` runs; calling back into this
    /// handle (`execute`, `is_fresh`, `close`) from inside `f` deadlocks.
    pub fn with_connection<T, F>(&self, f: F) -> StrataResult<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let guard = self.inner.connection.lock();
        let connection = guard.as_ref().ok_or_else(|| self.inner.closed_error())?;
        f(connection).map_err(to_strata_error)
    }
}

impl Database for SqliteDatabase {
    fn execute(&self, statement: &str) -> bool {
        match self.inner.execute(statement) {
            Ok(()) => {
                self.inner.last_error.write_with(|err| *err = None);
                true
            }
            Err(err) => {
                log::warn!("Failed to execute statement on {}: {}", self.name(), err);
                self.inner.last_error.write_with(|last| *last = Some(err));
                false
            }
        }
    }
}

impl std::fmt::Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteDatabase")
            .field("name", &self.name())
            .field("connection_name", &self.connection_name())
            .field("closed", &self.is_closed())
            .finish()
    }
}

struct SqliteDatabaseInner {
    config: SqliteConfig,
    connection: Mutex<Option<Connection>>,
    last_error: Atomic<Option<StrataError>>,
}

impl SqliteDatabaseInner {
    fn new(config: SqliteConfig, connection: Connection) -> SqliteDatabaseInner {
        SqliteDatabaseInner {
            config,
            connection: Mutex::new(Some(connection)),
            last_error: atomic(None),
        }
    }

    fn closed_error(&self) -> StrataError {
        StrataError::new(
            &format!("Database {} is closed", self.config.name()),
            ErrorKind::ConnectionClosed,
        )
    }

    /// Prepares a single statement and steps it to completion, so statements
    /// returning rows succeed as well.
    ///
    /// Input holding only whitespace or comments is rejected as empty; input
    /// holding more than one statement is rejected before anything runs.
    fn execute(&self, statement: &str) -> StrataResult<()> {
        let guard = self.connection.lock();
        let connection = guard.as_ref().ok_or_else(|| self.closed_error())?;

        let mut batch = Batch::new(connection, statement);
        let mut prepared = match batch.next().map_err(to_strata_error)? {
            Some(prepared) => prepared,
            None => {
                return Err(StrataError::new(
                    "Statement is empty",
                    ErrorKind::ExecutionError,
                ))
            }
        };
        if batch.next().map_err(to_strata_error)?.is_some() {
            return Err(StrataError::new(
                "Multiple statements are not supported",
                ErrorKind::ExecutionError,
            ));
        }

        let mut rows = prepared.query([]).map_err(to_strata_error)?;
        while rows.next().map_err(to_strata_error)?.is_some() {}
        Ok(())
    }

    fn close(&self) -> StrataResult<()> {
        let mut guard = self.connection.lock();
        match guard.take() {
            None => Ok(()),
            Some(connection) => match connection.close() {
                Ok(()) => {
                    log::debug!("Closed database {}", self.config.name());
                    Ok(())
                }
                Err((connection, err)) => {
                    *guard = Some(connection);
                    Err(StrataError::new_with_cause(
                        &format!("Failed to close database {}", self.config.name()),
                        ErrorKind::BackendError,
                        to_strata_error(err),
                    ))
                }
            },
        }
    }
}

impl Drop for SqliteDatabaseInner {
    fn drop(&mut self) {
        if let Err(err) = self.close() {
            log::error!("Failed to close database during cleanup: {}", err);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata::migration::{Migratable, Revision, RevisionHistory};

    // Setup only one time for the whole test binary.
    #[ctor::ctor]
    fn init() {
        colog::init();
    }

    fn count_people(db: &SqliteDatabase) -> i64 {
        db.with_connection(|conn| {
            conn.query_row("SELECT count(*) FROM people", [], |row| row.get(0))
        })
        .expect("people table should be readable")
    }

    #[test]
    fn test_open_in_memory() {
        let db = SqliteDatabase::open_in_memory().expect("in-memory database");
        assert_eq!(db.name(), ":memory:");
        assert_eq!(db.connection_name(), "default");
        assert!(!db.is_closed());
        assert!(db.is_fresh().unwrap());
    }

    #[test]
    fn test_execute_create_and_insert() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        assert!(db.execute("CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT)"));
        assert!(db.execute("INSERT INTO people(name) VALUES('Eddie Guerrero')"));
        assert_eq!(count_people(&db), 1);
        assert!(db.last_error().is_none());
        assert!(!db.is_fresh().unwrap());
    }

    #[test]
    fn test_execute_select_succeeds() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        assert!(db.execute("SELECT 1"));
    }

    #[test]
    fn test_execute_empty_statement_fails() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        assert!(!db.execute(""));
        assert!(!db.execute("   \n"));
        let err = db.last_error().expect("failure should be recorded");
        assert_eq!(err.kind(), &ErrorKind::ExecutionError);
    }

    #[test]
    fn test_execute_comment_only_statement_is_empty() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        for statement in ["-- nothing here", ";", " ; ;", "/* nothing */"] {
            assert!(!db.execute(statement), "{:?} should fail", statement);
            let err = db.last_error().expect("failure should be recorded");
            assert_eq!(err.kind(), &ErrorKind::ExecutionError);
            assert_eq!(err.message(), "Statement is empty");
        }
    }

    #[test]
    fn test_execute_multiple_statements_fails_without_running_any() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        assert!(!db.execute("CREATE TABLE a (x INTEGER); CREATE TABLE b (x INTEGER)"));
        let err = db.last_error().expect("failure should be recorded");
        assert_eq!(err.kind(), &ErrorKind::ExecutionError);
        assert!(err.message().contains("Multiple statements"));
        assert!(db.is_fresh().unwrap());
    }

    #[test]
    fn test_execute_trailing_semicolon_and_comment_is_single_statement() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        assert!(db.execute("CREATE TABLE people (id INTEGER PRIMARY KEY); -- people"));
        assert!(!db.is_fresh().unwrap());
    }

    #[test]
    fn test_execute_malformed_statement_fails() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        assert!(!db.execute("brian"));
        assert_eq!(
            db.last_error().map(|e| e.kind().clone()),
            Some(ErrorKind::ExecutionError)
        );
    }

    #[test]
    fn test_execute_constraint_violation_fails() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        assert!(db.execute("CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT NOT NULL)"));
        assert!(!db.execute("INSERT INTO people(name) VALUES(NULL)"));
        assert_eq!(
            db.last_error().map(|e| e.kind().clone()),
            Some(ErrorKind::ConstraintViolation)
        );
    }

    #[test]
    fn test_success_clears_last_error() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        assert!(!db.execute("brian"));
        assert!(db.last_error().is_some());
        assert!(db.execute("SELECT 1"));
        assert!(db.last_error().is_none());
    }

    #[test]
    fn test_closed_database_fails_execute() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        db.close().unwrap();
        assert!(db.is_closed());
        assert!(!db.execute("SELECT 1"));
        assert_eq!(
            db.last_error().map(|e| e.kind().clone()),
            Some(ErrorKind::ConnectionClosed)
        );
    }

    #[test]
    fn test_close_is_idempotent() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        assert!(db.close().is_ok());
        assert!(db.close().is_ok());
    }

    #[test]
    fn test_close_is_shared_by_clones() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let clone = db.clone();
        clone.close().unwrap();
        assert!(db.is_closed());
    }

    #[test]
    fn test_with_connection_on_closed_database() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        db.close().unwrap();
        let err = db
            .with_connection(|conn| conn.query_row("SELECT 1", [], |row| row.get::<_, i64>(0)))
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ConnectionClosed);
    }

    #[test]
    fn test_open_without_path_fails_validation() {
        let err = SqliteDatabase::with_config().open().unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ValidationError);
    }

    #[test]
    fn test_open_missing_file_without_create_fails() {
        let path = std::env::temp_dir().join(format!("{}.db", uuid::Uuid::new_v4()));
        let err = SqliteDatabase::with_config()
            .db_path(path.to_str().unwrap())
            .create_if_missing(false)
            .open()
            .unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ConnectionError);
        assert!(err.cause().is_some());
        assert!(!path.exists());
    }

    #[test]
    fn test_history_migrates_through_handle() {
        let db = SqliteDatabase::open_in_memory().unwrap();
        let mut history = RevisionHistory::new();
        history
            .add(Revision::new("CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT)"))
            .add(Revision::new("INSERT INTO people(name) VALUES('Eddie Guerrero')"));
        assert!(history.migrate(&db));
        assert_eq!(count_people(&db), 1);
        assert!(!history.migrate(&db));
        assert_eq!(count_people(&db), 1);
    }

    #[test]
    fn test_debug_output() {
        let db = SqliteDatabase::with_config()
            .in_memory(true)
            .connection_name("migrations")
            .open()
            .unwrap();
        let formatted = format!("{:?}", db);
        assert!(formatted.contains(":memory:"));
        assert!(formatted.contains("migrations"));
    }
}
