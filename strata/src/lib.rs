//! # Strata - Composable Schema Revisions
//!
//! Strata applies an ordered set of database-structure revisions against an
//! open database handle. Each revision is a single statement; revisions are
//! grouped into histories, and histories can be nested, so one revision or an
//! entire revision history is migrated through the same operation.
//!
//! ## Key Features
//!
//! - **Composable**: [`Revision`](migration::Revision) and
//!   [`RevisionHistory`](migration::RevisionHistory) share the
//!   [`Migratable`](migration::Migratable) capability
//! - **Ordered**: children of a history are applied in insertion order
//! - **Short-circuit**: a history stops at the first failing child
//! - **Storage agnostic**: the database is any [`Database`](database::Database)
//!   implementation; see the `strata_sqlite_adapter` crate for SQLite
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use strata::migration::{Migratable, Revision, RevisionHistory};
//! use strata_sqlite_adapter::SqliteDatabase;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let db = SqliteDatabase::open("app.db")?;
//!
//! let mut history = RevisionHistory::new();
//! history
//!     .add(Revision::new("CREATE TABLE people (id INTEGER PRIMARY KEY, name TEXT)"))
//!     .add(Revision::new("INSERT INTO people(name) VALUES('Eddie Guerrero')"));
//!
//! if !history.migrate(&db) {
//!     eprintln!("migration failed: {:?}", db.last_error());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - [`common`] - Shared synchronization helpers
//! - [`database`] - The database collaborator contract
//! - [`errors`] - Error types and result definitions
//! - [`migration`] - Revisions, revision histories and the `Migratable` trait

pub mod common;
pub mod database;
pub mod errors;
pub mod migration;
