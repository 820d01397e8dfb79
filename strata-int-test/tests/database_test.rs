use strata::database::Database;
use strata::errors::ErrorKind;
use strata_int_test::test_util::{
    cleanup, count, create_test_context, file_empty, file_exists, random_path,
    run_test, table_exists, CREATE_PEOPLE, INSERT_EDDIE,
};
use strata_sqlite_adapter::SqliteDatabase;

#[ctor::ctor]
fn init() {
    colog::init();
}

#[test]
fn test_open_creates_empty_file() {
    let path = random_path();
    assert!(!file_exists(&path));

    let db = SqliteDatabase::open(&path).expect("Failed to open database");
    assert!(file_exists(&path));
    assert!(file_empty(&path));
    assert_eq!(db.name(), path);
    assert_eq!(SqliteDatabase::DRIVER, "SQLITE");

    db.close().expect("Failed to close database");
    std::fs::remove_file(&path).expect("Failed to remove database file");
}

#[test]
fn test_create_table_fills_file() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            assert!(db.is_fresh()?);
            assert!(db.execute(CREATE_PEOPLE));
            assert!(!file_empty(ctx.path()));
            assert!(!db.is_fresh()?);
            assert!(table_exists(&db, "people")?);
            Ok(())
        },
        cleanup,
    );
}

#[test]
fn test_populate_after_create() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            assert!(db.execute(CREATE_PEOPLE));
            assert!(db.execute(INSERT_EDDIE));
            let rows = count(&db, "SELECT count(*) FROM people WHERE name = 'Eddie Guerrero'")?;
            assert_eq!(rows, 1);
            Ok(())
        },
        cleanup,
    );
}

#[test]
fn test_populate_without_table_fails() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            assert!(!db.execute(INSERT_EDDIE));
            let err = db.last_error().expect("failure should be recorded");
            assert_eq!(err.kind(), &ErrorKind::ExecutionError);
            assert!(err.message().contains("people"));
            Ok(())
        },
        cleanup,
    );
}

#[test]
fn test_changes_survive_reopen() {
    let path = random_path();

    let db = SqliteDatabase::open(&path).expect("Failed to open database");
    assert!(db.execute(CREATE_PEOPLE));
    assert!(db.execute(INSERT_EDDIE));
    db.close().expect("Failed to close database");

    let db = SqliteDatabase::with_config()
        .db_path(&path)
        .create_if_missing(false)
        .open()
        .expect("Failed to reopen database");
    assert!(!db.is_fresh().unwrap());
    assert_eq!(count(&db, "SELECT count(*) FROM people").unwrap(), 1);
    db.close().expect("Failed to close database");

    std::fs::remove_file(&path).expect("Failed to remove database file");
}

#[test]
fn test_read_only_rejects_writes() {
    let path = random_path();

    let db = SqliteDatabase::open(&path).expect("Failed to open database");
    assert!(db.execute(CREATE_PEOPLE));
    db.close().expect("Failed to close database");

    let db = SqliteDatabase::with_config()
        .db_path(&path)
        .read_only(true)
        .open()
        .expect("Failed to open read-only database");
    assert!(db.config().read_only());
    assert!(!db.execute(INSERT_EDDIE));
    assert_eq!(
        db.last_error().map(|e| e.kind().clone()),
        Some(ErrorKind::PermissionDenied)
    );
    assert!(db.execute("SELECT name FROM people"));
    db.close().expect("Failed to close database");

    std::fs::remove_file(&path).expect("Failed to remove database file");
}

#[test]
fn test_separate_connections_see_each_other() {
    run_test(
        create_test_context,
        |ctx| {
            let writer = ctx.db();
            let reader = SqliteDatabase::with_config()
                .db_path(ctx.path())
                .connection_name("reader")
                .open()?;
            assert_eq!(reader.connection_name(), "reader");
            assert_eq!(writer.connection_name(), "int-test");

            assert!(writer.execute(CREATE_PEOPLE));
            assert!(writer.execute(INSERT_EDDIE));
            assert_eq!(count(&reader, "SELECT count(*) FROM people")?, 1);
            reader.close()
        },
        cleanup,
    );
}

#[test]
fn test_closed_handle_fails() {
    run_test(
        create_test_context,
        |ctx| {
            let db = ctx.db();
            db.close()?;
            assert!(!db.execute(CREATE_PEOPLE));
            assert_eq!(
                db.last_error().map(|e| e.kind().clone()),
                Some(ErrorKind::ConnectionClosed)
            );
            assert!(db.is_fresh().is_err());
            Ok(())
        },
        cleanup,
    );
}
