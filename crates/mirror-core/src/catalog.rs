//! Catalog introspection queries.
//!
//! Different engines expose "which schema am I in" and "what columns does
//! this table have" through different SQL. A [`Catalog`] only produces that
//! SQL; the queries run through the caller's
//! [`Transaction`](crate::Transaction) like everything else.

use crate::render::quote_ident;

pub trait Catalog {
  /// A query whose first row, first column, is the current schema name.
  fn current_schema_query(&self) -> String;

  /// A query returning one row per column of `schema.table`, column name
  /// first, in table order.
  fn columns_query(&self, schema: &str, table: &str) -> String;
}

/// MySQL/MariaDB catalog queries.
#[derive(Debug, Clone, Copy, Default)]
pub struct MysqlCatalog;

impl Catalog for MysqlCatalog {
  fn current_schema_query(&self) -> String { "SELECT DATABASE()".to_owned() }

  fn columns_query(&self, schema: &str, table: &str) -> String {
    format!(
      "SHOW COLUMNS FROM {}.{}",
      quote_ident(schema),
      quote_ident(table)
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn mysql_queries() {
    let catalog = MysqlCatalog;
    assert_eq!(catalog.current_schema_query(), "SELECT DATABASE()");
    assert_eq!(
      catalog.columns_query("shop", "orders_view"),
      "SHOW COLUMNS FROM `shop`.`orders_view`"
    );
  }
}
