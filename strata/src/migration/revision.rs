use crate::database::Database;
use crate::migration::Migratable;

/// A single schema change expressed as one statement.
///
/// The statement is borrowed, not copied, and is never inspected: building a
/// revision from an empty or malformed statement always succeeds and the
/// failure surfaces only when the revision is migrated.
///
/// Migrating a revision hands its statement to the database verbatim and
/// returns the database's verdict. Migrating it twice runs the statement
/// twice, so a second `CREATE TABLE` is expected to fail.
///
/// # Examples
///
/// ```rust,ignore
/// use strata::migration::{Migratable, Revision};
///
/// let revision = Revision::new("CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT)");
/// assert!(revision.migrate(&db));
/// assert!(!revision.migrate(&db));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Revision<'a> {
    statement: &'a str,
}

impl<'a> Revision<'a> {
    #[inline]
    pub fn new(statement: &'a str) -> Self {
        Revision { statement }
    }

    /// The statement this revision executes.
    #[inline]
    pub fn statement(&self) -> &'a str {
        self.statement
    }
}

impl<'a> From<&'a str> for Revision<'a> {
    #[inline]
    fn from(statement: &'a str) -> Self {
        Revision::new(statement)
    }
}

impl Migratable for Revision<'_> {
    fn migrate(&self, database: &dyn Database) -> bool {
        log::trace!("Executing revision: {}", self.statement);
        database.execute(self.statement)
    }
}
