//! [`TriggerSpec`] — the immutable description of one mirror trigger.

use crate::{
  Catalog, Result, Transaction, TriggerKind, ValidationError, lifecycle,
};

/// Describes a row-level trigger that mirrors `source_table` into
/// `target_table`.
///
/// A spec is a value object: it holds no database state, and nothing mutates
/// it after construction. Whether the trigger actually exists is only known
/// to the database catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerSpec {
  schema:       String,
  name:         String,
  kind:         TriggerKind,
  source_table: String,
  target_table: String,
  /// Propagated columns, in render order. The first one doubles as the key
  /// column for [`TriggerKind::Delete`].
  fields:       Vec<String>,
}

impl TriggerSpec {
  /// Validate and assemble a spec.
  ///
  /// Fails with [`ValidationError::EmptyValue`] if any identifier is empty,
  /// `fields` is empty, or any field name is empty.
  pub fn new<I, S>(
    schema: impl Into<String>,
    name: impl Into<String>,
    source_table: impl Into<String>,
    target_table: impl Into<String>,
    kind: TriggerKind,
    fields: I,
  ) -> Result<Self>
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let spec = Self {
      schema: schema.into(),
      name: name.into(),
      kind,
      source_table: source_table.into(),
      target_table: target_table.into(),
      fields: fields.into_iter().map(Into::into).collect(),
    };

    let any_empty = [
      &spec.schema,
      &spec.name,
      &spec.source_table,
      &spec.target_table,
    ]
    .into_iter()
    .any(|s| s.is_empty());

    if any_empty
      || spec.fields.is_empty()
      || spec.fields.iter().any(|f| f.is_empty())
    {
      return Err(ValidationError::EmptyValue.into());
    }

    Ok(spec)
  }

  /// Like [`TriggerSpec::new`], with the schema taken from the database's
  /// current schema.
  pub fn in_current_schema<T, C, I, S>(
    tx: Option<&T>,
    catalog: &C,
    name: impl Into<String>,
    source_table: impl Into<String>,
    target_table: impl Into<String>,
    kind: TriggerKind,
    fields: I,
  ) -> Result<Self>
  where
    T: Transaction + ?Sized,
    C: Catalog + ?Sized,
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    let schema = lifecycle::current_schema(tx, catalog)?;
    Self::new(schema, name, source_table, target_table, kind, fields)
  }

  pub fn schema(&self) -> &str { &self.schema }

  pub fn name(&self) -> &str { &self.name }

  pub fn kind(&self) -> TriggerKind { self.kind }

  pub fn source_table(&self) -> &str { &self.source_table }

  pub fn target_table(&self) -> &str { &self.target_table }

  pub fn fields(&self) -> &[String] { &self.fields }

  /// The column a delete trigger matches on: the first field.
  pub fn key_field(&self) -> &str {
    // Construction rejects an empty field list.
    &self.fields[0]
  }
}
