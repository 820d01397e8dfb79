//! The database collaborator consumed by migrations.
//!
//! A [`Database`] is an already-open connection owned by the caller. Migrations
//! only borrow it for the duration of a single [`Migratable::migrate`] call and
//! never open, close or retain it.
//!
//! [`Migratable::migrate`]: crate::migration::Migratable::migrate

use std::sync::Arc;

/// An open database connection able to run one statement at a time.
///
/// # Contract
///
/// - `execute` runs exactly one statement against the open connection and
///   returns `true` only if it completed without error.
/// - Multi-statement strings are not supported; implementations may reject them.
/// - Failures (malformed statements, constraint violations, a closed
///   connection) are reported as `false`. Implementations may record or log
///   the reason, but it never crosses this boundary.
///
/// # Examples
///
/// ```rust,ignore
/// use strata::database::Database;
///
/// struct Noop;
///
/// impl Database for Noop {
///     fn execute(&self, statement: &str) -> bool {
///         !statement.trim().is_empty()
///     }
/// }
/// ```
pub trait Database {
    /// Runs a single statement, returning whether it completed without error.
    fn execute(&self, statement: &str) -> bool;
}

impl<D: Database + ?Sized> Database for &D {
    #[inline]
    fn execute(&self, statement: &str) -> bool {
        (**self).execute(statement)
    }
}

impl<D: Database + ?Sized> Database for Box<D> {
    #[inline]
    fn execute(&self, statement: &str) -> bool {
        (**self).execute(statement)
    }
}

impl<D: Database + ?Sized> Database for Arc<D> {
    #[inline]
    fn execute(&self, statement: &str) -> bool {
        (**self).execute(statement)
    }
}
