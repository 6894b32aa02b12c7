//! SQLite backend for mirror triggers.
//!
//! Wraps [`rusqlite::Transaction`] in [`SqliteTransaction`], which
//! implements [`mirror_core::Transaction`], and provides the SQLite flavour
//! of the catalog queries. SQLite accepts the backtick identifier quoting the
//! renderer emits, and attached databases play the role of schemas.

mod catalog;
mod transaction;

pub use catalog::SqliteCatalog;
pub use transaction::SqliteTransaction;
