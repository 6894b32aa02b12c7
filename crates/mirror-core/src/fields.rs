//! Where a trigger's column list comes from.
//!
//! [`StaticFields`] trusts the list stored in the spec. [`CatalogFields`]
//! asks the database for the target table's current columns, so the trigger
//! follows schema changes at the cost of a query per install.

use crate::{Catalog, Error, Result, Transaction, TriggerSpec};

pub trait FieldSource<T: Transaction + ?Sized> {
  /// Resolve the ordered column list for `spec`. Must not be empty.
  fn fields(&self, tx: &T, spec: &TriggerSpec) -> Result<Vec<String>>;
}

/// The caller-supplied [`TriggerSpec::fields`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticFields;

impl<T: Transaction + ?Sized> FieldSource<T> for StaticFields {
  fn fields(&self, _tx: &T, spec: &TriggerSpec) -> Result<Vec<String>> {
    Ok(spec.fields().to_vec())
  }
}

/// The target table's live columns, in catalog order.
#[derive(Debug, Clone, Default)]
pub struct CatalogFields<C> {
  catalog: C,
}

impl<C: Catalog> CatalogFields<C> {
  pub fn new(catalog: C) -> Self { Self { catalog } }
}

impl<T, C> FieldSource<T> for CatalogFields<C>
where
  T: Transaction + ?Sized,
  C: Catalog,
{
  fn fields(&self, tx: &T, spec: &TriggerSpec) -> Result<Vec<String>> {
    let query = self
      .catalog
      .columns_query(spec.schema(), spec.target_table());

    let columns = tx
      .query_column(&query)
      .map_err(|e| Error::introspection(query.as_str(), e))?;

    if columns.is_empty() {
      return Err(Error::NoColumns {
        table: spec.target_table().to_owned(),
      });
    }

    Ok(columns)
  }
}
