//! Installing and removing triggers.
//!
//! Every operation runs inside the caller's transaction and issues its
//! statements in order, stopping at the first failure. Nothing here begins,
//! commits or rolls back; atomicity of drop-then-create is whatever the
//! caller's transaction (and the engine's DDL semantics) provide.

use crate::{
  Catalog, Error, FieldSource, Result, StaticFields, Transaction, TriggerKind,
  TriggerSpec, render,
};

impl TriggerSpec {
  /// Install the trigger using the spec's own field list.
  ///
  /// With `drop_if_exists`, any trigger of the same name is dropped first;
  /// if that drop fails, nothing else is attempted.
  pub fn create<T>(&self, tx: Option<&T>, drop_if_exists: bool) -> Result<()>
  where
    T: Transaction + ?Sized,
  {
    self.create_with(tx, drop_if_exists, &StaticFields)
  }

  /// Install the trigger with columns resolved by `source`.
  ///
  /// Delete triggers carry no column list and never consult `source`.
  pub fn create_with<T, F>(
    &self,
    tx: Option<&T>,
    drop_if_exists: bool,
    source: &F,
  ) -> Result<()>
  where
    T: Transaction + ?Sized,
    F: FieldSource<T> + ?Sized,
  {
    let tx = tx.ok_or(Error::MissingTransaction)?;

    if drop_if_exists {
      self.drop(Some(tx))?;
    }

    let statement = self.render_with(Some(tx), source)?;
    execute(tx, &statement)
  }

  /// The `CREATE TRIGGER` statement [`TriggerSpec::create_with`] would run,
  /// without executing it.
  ///
  /// Only catalog queries issued by `source` touch the transaction. An
  /// empty column list for an insert or update trigger is
  /// [`Error::NoColumns`].
  pub fn render_with<T, F>(
    &self,
    tx: Option<&T>,
    source: &F,
  ) -> Result<String>
  where
    T: Transaction + ?Sized,
    F: FieldSource<T> + ?Sized,
  {
    let tx = tx.ok_or(Error::MissingTransaction)?;

    match self.kind() {
      TriggerKind::Delete => Ok(render::create_statement(self)),
      TriggerKind::Insert | TriggerKind::Update => {
        let fields = source.fields(tx, self)?;
        if fields.is_empty() {
          return Err(Error::NoColumns {
            table: self.target_table().to_owned(),
          });
        }
        Ok(render::create_statement_for(self, &fields))
      }
    }
  }

  /// Remove the trigger. Succeeds whether or not it exists.
  pub fn drop<T>(&self, tx: Option<&T>) -> Result<()>
  where
    T: Transaction + ?Sized,
  {
    let tx = tx.ok_or(Error::MissingTransaction)?;
    let statement = render::drop_statement(self.schema(), self.name());
    execute(tx, &statement)
  }
}

/// Ask the database which schema the transaction is operating in.
pub fn current_schema<T, C>(tx: Option<&T>, catalog: &C) -> Result<String>
where
  T: Transaction + ?Sized,
  C: Catalog + ?Sized,
{
  let tx = tx.ok_or(Error::MissingTransaction)?;
  let query = catalog.current_schema_query();

  let rows = tx
    .query_column(&query)
    .map_err(|e| Error::introspection(query.as_str(), e))?;

  match rows.into_iter().next() {
    Some(schema) if !schema.is_empty() => Ok(schema),
    _ => Err(Error::introspection(query, "no current schema selected")),
  }
}

fn execute<T>(tx: &T, statement: &str) -> Result<()>
where
  T: Transaction + ?Sized,
{
  tracing::debug!(%statement, "executing trigger ddl");
  tx.execute(statement)
    .map_err(|e| Error::execution(statement, e))
}
