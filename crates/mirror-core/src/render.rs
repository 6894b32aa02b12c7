//! DDL rendering.
//!
//! Pure string building: no I/O, no failure modes. Each [`TriggerKind`] maps
//! to exactly one render function.
//!
//! Identifiers are wrapped in backticks and otherwise passed through
//! verbatim. A backtick inside an identifier is not escaped, so identifiers
//! must come from a trusted source.

use crate::{TriggerKind, TriggerSpec};

/// Wrap an identifier in backticks.
pub fn quote_ident(ident: &str) -> String { format!("`{ident}`") }

/// Render the `CREATE TRIGGER` statement for `spec` using its own field list.
pub fn create_statement(spec: &TriggerSpec) -> String {
  create_statement_for(spec, spec.fields())
}

/// Render the `CREATE TRIGGER` statement for `spec` with an explicit column
/// list (e.g. one read from the live catalog). `fields` is used as given and
/// must not be empty for insert and update triggers;
/// [`TriggerSpec::render_with`] enforces that.
///
/// Delete triggers have no column list; they always key on the first of the
/// spec's own fields.
pub fn create_statement_for(spec: &TriggerSpec, fields: &[String]) -> String {
  match spec.kind() {
    TriggerKind::Insert => render_insert(spec, fields),
    TriggerKind::Update => render_update(spec, fields),
    TriggerKind::Delete => render_delete(spec, spec.key_field()),
  }
}

/// Render the idempotent `DROP TRIGGER IF EXISTS` statement.
pub fn drop_statement(schema: &str, name: &str) -> String {
  format!(
    "DROP TRIGGER IF EXISTS {}.{}",
    quote_ident(schema),
    quote_ident(name)
  )
}

// ─── Per-kind renderers ──────────────────────────────────────────────────────

fn render_insert(spec: &TriggerSpec, fields: &[String]) -> String {
  render_replace(spec, TriggerKind::Insert, fields)
}

fn render_update(spec: &TriggerSpec, fields: &[String]) -> String {
  render_replace(spec, TriggerKind::Update, fields)
}

fn render_delete(spec: &TriggerSpec, key: &str) -> String {
  let target = quote_ident(spec.target_table());
  let key = quote_ident(key);

  // A DELETE matching no rows succeeds, so missing target rows are ignored.
  format!(
    "{} BEGIN DELETE FROM {target} WHERE {target}.{key} = OLD.{key}; END",
    header(spec, TriggerKind::Delete)
  )
}

/// `REPLACE INTO target (cols) VALUES (NEW.cols)`.
fn render_replace(
  spec: &TriggerSpec,
  event: TriggerKind,
  fields: &[String],
) -> String {
  // Both lists come out of the same pass so they can never disagree on
  // order or length.
  let (columns, values): (Vec<String>, Vec<String>) = fields
    .iter()
    .map(|f| {
      let quoted = quote_ident(f);
      let value = format!("NEW.{quoted}");
      (quoted, value)
    })
    .unzip();

  format!(
    "{} BEGIN REPLACE INTO {} ({}) VALUES ({}); END",
    header(spec, event),
    quote_ident(spec.target_table()),
    columns.join(", "),
    values.join(", "),
  )
}

/// `CREATE TRIGGER schema.name AFTER <event> ON source FOR EACH ROW`.
fn header(spec: &TriggerSpec, event: TriggerKind) -> String {
  format!(
    "CREATE TRIGGER {}.{} AFTER {} ON {} FOR EACH ROW",
    quote_ident(spec.schema()),
    quote_ident(spec.name()),
    event.as_sql(),
    quote_ident(spec.source_table()),
  )
}
