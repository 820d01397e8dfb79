/// Version of the SQLite library linked into this adapter.
#[inline]
pub fn sqlite_version() -> &'static str {
    rusqlite::version()
}
