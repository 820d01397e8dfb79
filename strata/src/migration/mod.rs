//! Schema revisions and their ordered histories.
//!
//! A schema is migrated through a whole/part hierarchy:
//!
//! - [`Revision`] is the leaf: a single statement that changes the schema.
//! - [`RevisionHistory`] is the composite: an ordered list of revisions (or
//!   other histories) applied one after another.
//!
//! Both implement [`Migratable`], so a single revision and an entire history
//! are migrated the same way.
//!
//! # Creating Migrations
//!
//! ```rust,ignore
//! use strata::migration::{Migratable, Revision, RevisionHistory};
//!
//! let mut history = RevisionHistory::new();
//! history
//!     .add(Revision::new("CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT)"))
//!     .add(Revision::new("INSERT INTO people(name) VALUES('Eddie Guerrero')"));
//!
//! if !history.migrate(&db) {
//!     // some prefix of the history may have been applied
//! }
//! ```
//!
//! # Failure
//!
//! A history stops at the first child that fails and reports `false`.
//! Children applied before the failure are not undone.

mod history;
mod migratable;
mod revision;

pub use history::RevisionHistory;
pub use migratable::Migratable;
pub use revision::Revision;
