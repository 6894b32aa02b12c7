//! [`SqliteTransaction`] — a [`rusqlite::Transaction`] seen as a
//! [`mirror_core::Transaction`].

use mirror_core::Transaction;

/// Borrows an open rusqlite transaction for trigger DDL.
///
/// The caller keeps ownership of the underlying transaction and decides
/// whether to commit or roll it back.
#[derive(Debug, Clone, Copy)]
pub struct SqliteTransaction<'a, 'c> {
  tx: &'a rusqlite::Transaction<'c>,
}

impl<'a, 'c> SqliteTransaction<'a, 'c> {
  pub fn new(tx: &'a rusqlite::Transaction<'c>) -> Self { Self { tx } }
}

impl Transaction for SqliteTransaction<'_, '_> {
  type Error = rusqlite::Error;

  fn execute(&self, statement: &str) -> Result<(), Self::Error> {
    // Trigger bodies contain `;`, so run through the batch API rather than
    // a single prepared statement.
    self.tx.execute_batch(statement)
  }

  fn query_column(&self, query: &str) -> Result<Vec<String>, Self::Error> {
    tracing::trace!(%query, "catalog query");
    let mut stmt = self.tx.prepare(query)?;
    let rows = stmt
      .query_map([], |r| r.get::<_, String>(0))?
      .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
  }
}
