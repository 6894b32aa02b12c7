//! The `Transaction` trait — the only way this crate touches a database.
//!
//! Implemented by backends (e.g. `mirror-sqlite`). The caller owns the
//! transaction: this crate never begins, commits or rolls back.

/// An open transaction able to run statements and simple queries.
pub trait Transaction {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Execute a statement that returns no rows (DDL, DML).
  fn execute(&self, statement: &str) -> Result<(), Self::Error>;

  /// Run a query and return the first column of every row as text, in row
  /// order.
  fn query_column(&self, query: &str) -> Result<Vec<String>, Self::Error>;
}
