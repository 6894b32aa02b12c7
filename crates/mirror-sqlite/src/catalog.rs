//! SQLite catalog queries, via the `pragma_*` table-valued functions.

use mirror_core::Catalog;

/// SQLite's current schema is always `main`; other schemas are attached
/// databases.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteCatalog;

impl Catalog for SqliteCatalog {
  fn current_schema_query(&self) -> String {
    "SELECT name FROM pragma_database_list WHERE seq = 0".to_owned()
  }

  fn columns_query(&self, schema: &str, table: &str) -> String {
    format!(
      "SELECT name FROM pragma_table_info({}, {}) ORDER BY cid",
      literal(table),
      literal(schema)
    )
  }
}

/// Single-quoted SQL string literal.
fn literal(s: &str) -> String { format!("'{}'", s.replace('\'', "''")) }
