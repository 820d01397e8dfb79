use rusqlite::OpenFlags;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Duration;
use strata::errors::{ErrorKind, StrataError, StrataResult};

#[derive(Clone)]
/// SQLite connection configuration.
///
/// A cloneable configuration holder using the PIMPL pattern with
/// `Arc<SqliteConfigInner>`. Every parameter is stored in an atomic or a
/// `OnceLock`, so clones share the same settings without locking.
///
/// Usage: populated through [`SqliteDatabaseBuilder`](crate::SqliteDatabaseBuilder)
/// and read back from an open handle via
/// [`SqliteDatabase::config`](crate::SqliteDatabase::config).
pub struct SqliteConfig {
    inner: Arc<SqliteConfigInner>,
}

impl SqliteConfig {
    /// Name given to a connection when none is configured.
    pub const DEFAULT_CONNECTION_NAME: &'static str = "default";

    /// Name reported for in-memory databases.
    pub const IN_MEMORY_NAME: &'static str = ":memory:";

    /// Creates a configuration with default values:
    /// - no database path
    /// - connection name `"default"`
    /// - read-write, creating the file if missing
    /// - 5 second busy timeout
    #[inline]
    pub fn new() -> SqliteConfig {
        SqliteConfig {
            inner: Arc::new(SqliteConfigInner::new()),
        }
    }

    /// Checks that the configuration describes something that can be opened.
    pub fn validate(&self) -> StrataResult<()> {
        if !self.in_memory() && self.db_path().trim().is_empty() {
            return Err(StrataError::new(
                "Database path is not set; configure db_path or in_memory",
                ErrorKind::ValidationError,
            ));
        }
        if self.read_only() && self.in_memory() {
            return Err(StrataError::new(
                "An in-memory database cannot be opened read-only",
                ErrorKind::ValidationError,
            ));
        }
        Ok(())
    }

    /// Translates this configuration to SQLite open flags.
    pub(crate) fn open_flags(&self) -> OpenFlags {
        let mut flags = OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if self.read_only() {
            flags |= OpenFlags::SQLITE_OPEN_READ_ONLY;
        } else {
            flags |= OpenFlags::SQLITE_OPEN_READ_WRITE;
            if self.create_if_missing() {
                flags |= OpenFlags::SQLITE_OPEN_CREATE;
            }
        }
        flags
    }

    /// The database name: its path, or `":memory:"` for in-memory databases.
    #[inline]
    pub fn name(&self) -> &str {
        if self.in_memory() {
            Self::IN_MEMORY_NAME
        } else {
            self.db_path()
        }
    }

    #[inline]
    pub fn db_path(&self) -> &str {
        self.inner.db_path()
    }

    #[inline]
    pub(crate) fn set_db_path(&self, db_path: &str) {
        self.inner.set_db_path(db_path)
    }

    #[inline]
    pub fn connection_name(&self) -> &str {
        self.inner.connection_name()
    }

    #[inline]
    pub(crate) fn set_connection_name(&self, connection_name: &str) {
        self.inner.set_connection_name(connection_name)
    }

    #[inline]
    pub fn in_memory(&self) -> bool {
        self.inner.in_memory.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_in_memory(&self, in_memory: bool) {
        self.inner.in_memory.store(in_memory, Ordering::Relaxed)
    }

    #[inline]
    pub fn read_only(&self) -> bool {
        self.inner.read_only.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_read_only(&self, read_only: bool) {
        self.inner.read_only.store(read_only, Ordering::Relaxed)
    }

    #[inline]
    pub fn create_if_missing(&self) -> bool {
        self.inner.create_if_missing.load(Ordering::Relaxed)
    }

    #[inline]
    pub(crate) fn set_create_if_missing(&self, create_if_missing: bool) {
        self.inner
            .create_if_missing
            .store(create_if_missing, Ordering::Relaxed)
    }

    #[inline]
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.inner.busy_timeout_ms.load(Ordering::Relaxed))
    }

    #[inline]
    pub(crate) fn set_busy_timeout(&self, timeout: Duration) {
        let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self.inner.busy_timeout_ms.store(millis, Ordering::Relaxed)
    }
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for SqliteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteConfig")
            .field("db_path", &self.db_path())
            .field("connection_name", &self.connection_name())
            .field("in_memory", &self.in_memory())
            .field("read_only", &self.read_only())
            .field("create_if_missing", &self.create_if_missing())
            .field("busy_timeout", &self.busy_timeout())
            .finish()
    }
}

/// Settings storage behind [`SqliteConfig`].
///
/// Path and connection name are write-once; the first value set wins.
struct SqliteConfigInner {
    db_path: OnceLock<String>,
    connection_name: OnceLock<String>,
    in_memory: AtomicBool,
    read_only: AtomicBool,
    create_if_missing: AtomicBool,
    busy_timeout_ms: AtomicU64,
}

impl SqliteConfigInner {
    /// Default busy timeout: 5 seconds.
    const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

    fn new() -> SqliteConfigInner {
        SqliteConfigInner {
            db_path: OnceLock::new(),
            connection_name: OnceLock::new(),
            in_memory: AtomicBool::new(false),
            read_only: AtomicBool::new(false),
            create_if_missing: AtomicBool::new(true),
            busy_timeout_ms: AtomicU64::new(Self::DEFAULT_BUSY_TIMEOUT_MS),
        }
    }

    #[inline]
    fn db_path(&self) -> &str {
        self.db_path.get().map(String::as_str).unwrap_or("")
    }

    #[inline]
    fn set_db_path(&self, db_path: &str) {
        self.db_path.get_or_init(|| db_path.to_string());
    }

    #[inline]
    fn connection_name(&self) -> &str {
        self.connection_name
            .get()
            .map(String::as_str)
            .unwrap_or(SqliteConfig::DEFAULT_CONNECTION_NAME)
    }

    #[inline]
    fn set_connection_name(&self, connection_name: &str) {
        self.connection_name
            .get_or_init(|| connection_name.to_string());
    }
}
