use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::{env, fs};
use strata::errors::{ErrorKind, StrataError, StrataResult};
use strata_sqlite_adapter::SqliteDatabase;

pub const CREATE_PEOPLE: &str = "CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT)";
pub const INSERT_EDDIE: &str = "INSERT INTO people(name) VALUES('Eddie Guerrero')";

/// Runs a test between a setup and a teardown step.
///
/// The teardown runs even when the test body fails or panics, so temporary
/// database files are removed. The first failure is re-raised as a panic.
pub fn run_test<T, B, A>(before: B, test: T, after: A)
where
    T: FnOnce(TestContext) -> StrataResult<()>,
    B: FnOnce() -> StrataResult<TestContext>,
    A: FnOnce(TestContext) -> StrataResult<()>,
{

    let ctx = match before() {
        Ok(ctx) => ctx,
        Err(e) => panic!("Before run failed: {:?}", e),
    };

    let test_ctx = ctx.clone();
    let result = std::panic::catch_unwind(AssertUnwindSafe(move || test(test_ctx)));
    let after_result = after(ctx);

    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => panic!("Test failed: {:?}", e),
        Err(panic) => {
            let panic_msg = if let Some(msg) = panic.downcast_ref::<String>() {
                msg.clone()
            } else if let Some(msg) = panic.downcast_ref::<&str>() {
                msg.to_string()
            } else {
                "Unknown panic".to_string()
            };
            panic!("Test execution failed with panic: {}", panic_msg);
        }
    }

    if let Err(e) = after_result {
        panic!("After run failed: {:?}", e);
    }
}

#[derive(Clone)]
pub struct TestContext {
    path: String,
    db: SqliteDatabase,
}

impl TestContext {
    pub fn new(path: String, db: SqliteDatabase) -> Self {
        Self { path, db }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn db(&self) -> SqliteDatabase {
        self.db.clone()
    }
}

/// A unique, not yet existing database path in the system temp directory.
pub fn random_path() -> String {
    let id = uuid::Uuid::new_v4();
    env::temp_dir()
        .join(format!("database.{}", id))
        .to_string_lossy()
        .into_owned()
}

/// True when `path` names an existing regular file.
pub fn file_exists(path: &str) -> bool {
    Path::new(path).is_file()
}

/// True when `path` names an existing file of zero length.
pub fn file_empty(path: &str) -> bool {
    fs::metadata(path)
        .map(|meta| meta.is_file() && meta.len() == 0)
        .unwrap_or(false)
}

/// Opens a fresh database file at a random path.
pub fn create_test_context() -> StrataResult<TestContext> {
    let path = random_path();
    if file_exists(&path) {
        return Err(StrataError::new(
            &format!("Test database {} already exists", path),
            ErrorKind::InvalidOperation,
        ));
    }

    let db = SqliteDatabase::with_config()
        .db_path(&path)
        .connection_name("int-test")
        .open()?;
    Ok(TestContext::new(path, db))
}

/// Closes the database and removes its file along with any journal left behind.
pub fn cleanup(ctx: TestContext) -> StrataResult<()> {
    if let Err(e) = ctx.db().close() {
        log::warn!("Failed to close database {}: {:?}", ctx.path(), e);
    }

    for suffix in ["", "-journal", "-wal", "-shm"] {
        let file = format!("{}{}", ctx.path(), suffix);
        match fs::remove_file(&file) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    Ok(())
}

/// Counts the rows returned by a `SELECT count(*) ...` query.
pub fn count(db: &SqliteDatabase, query: &str) -> StrataResult<i64> {
    db.with_connection(|conn| conn.query_row(query, [], |row| row.get(0)))
}

pub fn table_exists(db: &SqliteDatabase, table: &str) -> StrataResult<bool> {
    let found: i64 = db.with_connection(|conn| {
        conn.query_row(
            "SELECT count(*) FROM sqlite_master WHERE type = 'table' AND name = ?1",
            [table],
            |row| row.get(0),
        )
    })?;
    Ok(found == 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[ctor::ctor]
    fn init() {
        colog::init();
    }

    #[test]
    fn test_random_path_is_unique_and_absent() {
        let first = random_path();
        let second = random_path();
        assert_ne!(first, second);
        assert!(!file_exists(&first));
        assert!(!file_empty(&first));
    }

    #[test]
    fn test_create_and_cleanup_context() {
        let ctx = create_test_context().expect("context");
        let path = ctx.path().to_string();
        assert!(file_exists(&path));
        cleanup(ctx).expect("cleanup");
        assert!(!file_exists(&path));
    }

    #[test]
    fn test_run_test_reports_test_error() {
        let caught = std::panic::catch_unwind(|| {
            run_test(
                create_test_context,
                |_ctx| Err(StrataError::new("boom", ErrorKind::InternalError)),
                cleanup,
            );
        });
        let err = caught.unwrap_err();
        let msg = err.downcast_ref::<String>().cloned().unwrap_or_default();
        assert!(msg.contains("Test failed"), "unexpected message: {}", msg);
    }

    #[test]
    fn test_run_test_cleans_up_after_panic() {
        let seen = std::sync::Mutex::new(String::new());
        let caught = std::panic::catch_unwind(AssertUnwindSafe(|| {
            run_test(
                || {
                    let ctx = create_test_context()?;
                    *seen.lock().unwrap() = ctx.path().to_string();
                    Ok(ctx)
                },
                |_ctx| panic!("Specific error condition"),
                cleanup,
            );
        }));
        let err = caught.unwrap_err();
        let msg = err.downcast_ref::<String>().cloned().unwrap_or_default();
        assert!(msg.contains("Specific error condition"), "unexpected message: {}", msg);

        let path = seen.lock().unwrap().clone();
        assert!(!path.is_empty());
        assert!(!file_exists(&path));
    }
}
