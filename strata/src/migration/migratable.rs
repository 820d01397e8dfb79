use crate::database::Database;

/// A unit of schema change that can be applied to a database.
///
/// Implemented by [`Revision`](super::Revision) (a single statement) and by
/// [`RevisionHistory`](super::RevisionHistory) (an ordered composite), so
/// histories can be nested to any depth.
///
/// `migrate` returns `true` when this unit, and for composites every child,
/// applied successfully. There is no error value: the database collaborator
/// keeps the reason for a failure if it wants one. A successful migration
/// changes the persistent store only, never the migratable itself, so the same
/// value can be migrated again (without any idempotence guarantee).
pub trait Migratable {
    /// Applies this unit to `database`.
    fn migrate(&self, database: &dyn Database) -> bool;
}

impl<M: Migratable + ?Sized> Migratable for Box<M> {
    #[inline]
    fn migrate(&self, database: &dyn Database) -> bool {
        (**self).migrate(database)
    }
}
