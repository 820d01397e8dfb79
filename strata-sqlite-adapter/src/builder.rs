use crate::config::SqliteConfig;
use crate::database::SqliteDatabase;
use std::time::Duration;
use strata::errors::StrataResult;

/// Builder for configuring and opening a [`SqliteDatabase`].
///
/// Obtained from [`SqliteDatabase::with_config`].
///
/// # Examples
///
/// ```rust,ignore
/// use std::time::Duration;
/// use strata_sqlite_adapter::SqliteDatabase;
///
/// let db = SqliteDatabase::with_config()
///     .db_path("/tmp/people.db")
///     .connection_name("migrations")
///     .busy_timeout(Duration::from_secs(1))
///     .open()?;
/// ```
pub struct SqliteDatabaseBuilder {
    config: SqliteConfig,
}

impl SqliteDatabaseBuilder {
    #[inline]
    pub fn new() -> SqliteDatabaseBuilder {
        SqliteDatabaseBuilder {
            config: SqliteConfig::new(),
        }
    }

    /// Sets the path of the database file.
    #[inline]
    pub fn db_path(self, db_path: &str) -> Self {
        self.config.set_db_path(db_path);
        self
    }

    /// Sets the name identifying this connection in logs and diagnostics.
    #[inline]
    pub fn connection_name(self, connection_name: &str) -> Self {
        self.config.set_connection_name(connection_name);
        self
    }

    /// Opens a private in-memory database instead of a file.
    #[inline]
    pub fn in_memory(self, in_memory: bool) -> Self {
        self.config.set_in_memory(in_memory);
        self
    }

    #[inline]
    pub fn read_only(self, read_only: bool) -> Self {
        self.config.set_read_only(read_only);
        self
    }

    /// Whether a missing database file is created on open. Defaults to `true`.
    #[inline]
    pub fn create_if_missing(self, create_if_missing: bool) -> Self {
        self.config.set_create_if_missing(create_if_missing);
        self
    }

    /// How long a statement waits on a locked database before failing.
    #[inline]
    pub fn busy_timeout(self, timeout: Duration) -> Self {
        self.config.set_busy_timeout(timeout);
        self
    }

    /// Validates the configuration and opens the connection.
    pub fn open(self) -> StrataResult<SqliteDatabase> {
        SqliteDatabase::from_config(self.config)
    }
}

impl Default for SqliteDatabaseBuilder {
    fn default() -> Self {
        Self::new()
    }
}
