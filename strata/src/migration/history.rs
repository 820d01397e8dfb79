use crate::database::Database;
use crate::migration::{Migratable, Revision};
use std::fmt::{Debug, Formatter};

/// An ordered collection of migratables applied as one logical migration.
///
/// Children are applied strictly in the order they were added. The history
/// owns them exclusively and drops them when it is dropped. Since a history is
/// itself [`Migratable`], it can be added to another history; the parent then
/// treats it as a single unit.
///
/// # Failure
///
/// `migrate` stops at the first child that returns `false` and returns
/// `false` itself without running the remaining children. Children that were
/// already applied are left in place. An empty history migrates successfully.
///
/// # Examples
///
/// ```rust,ignore
/// use strata::migration::{Migratable, Revision, RevisionHistory};
///
/// let mut people = RevisionHistory::new();
/// people
///     .add(Revision::new("CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT)"))
///     .add(Revision::new("ALTER TABLE people ADD COLUMN born TEXT"));
///
/// let mut schema = RevisionHistory::new();
/// schema.add(people);
/// assert!(schema.migrate(&db));
/// ```
#[derive(Default)]
pub struct RevisionHistory<'a> {
    revisions: Vec<Box<dyn Migratable + 'a>>,
}

impl<'a> RevisionHistory<'a> {
    /// Creates an empty history.
    #[inline]
    pub fn new() -> Self {
        RevisionHistory {
            revisions: Vec::new(),
        }
    }

    /// Appends a revision, or a nested history, to the end of this history.
    ///
    /// The history takes ownership of `revision`. No duplicate detection is
    /// performed.
    pub fn add<M: Migratable + 'a>(&mut self, revision: M) -> &mut Self {
        self.revisions.push(Box::new(revision));
        self
    }

    /// Number of direct children; nested histories count as one.
    #[inline]
    pub fn len(&self) -> usize {
        self.revisions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.revisions.is_empty()
    }
}

impl Migratable for RevisionHistory<'_> {
    fn migrate(&self, database: &dyn Database) -> bool {
        let total = self.revisions.len();
        for (index, revision) in self.revisions.iter().enumerate() {
            log::trace!("Applying revision {} of {}", index + 1, total);
            if !revision.migrate(database) {
                return false;
            }
        }
        true
    }
}

impl<'a> FromIterator<Revision<'a>> for RevisionHistory<'a> {
    fn from_iter<I: IntoIterator<Item = Revision<'a>>>(iter: I) -> Self {
        let mut history = RevisionHistory::new();
        history.extend(iter);
        history
    }
}

impl<'a> Extend<Revision<'a>> for RevisionHistory<'a> {
    fn extend<I: IntoIterator<Item = Revision<'a>>>(&mut self, iter: I) {
        for revision in iter {
            self.add(revision);
        }
    }
}

impl Debug for RevisionHistory<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RevisionHistory")
            .field("revisions", &self.revisions.len())
            .finish()
    }
}
