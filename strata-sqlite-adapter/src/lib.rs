//! SQLite database handle for strata.
//!
//! [`SqliteDatabase`] implements [`strata::database::Database`] on top of
//! `rusqlite`, so revisions and revision histories can be migrated against an
//! SQLite file or an in-memory database.
//!
//! ```rust,ignore
//! use strata::migration::{Migratable, Revision, RevisionHistory};
//! use strata_sqlite_adapter::SqliteDatabase;
//!
//! let db = SqliteDatabase::open("people.db")?;
//! if db.is_fresh()? {
//!     let mut history = RevisionHistory::new();
//!     history.add(Revision::new("CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT)"));
//!     history.migrate(&db);
//! }
//! ```

mod builder;
mod config;
mod database;
mod version;
mod wrapper;

pub use builder::*;
pub use config::*;
pub use database::*;
pub use version::sqlite_version;
