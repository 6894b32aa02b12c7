//! Mirror plans: which tables to mirror, loaded from TOML and the
//! environment.

use std::{
  collections::HashSet,
  path::{Path, PathBuf},
};

use anyhow::Context as _;
use mirror_core::{
  CatalogFields, FieldSource, StaticFields, Transaction, TriggerKind,
  TriggerSpec, lifecycle,
};
use mirror_sqlite::SqliteCatalog;
use serde::Deserialize;

// ─── Config file ──────────────────────────────────────────────────────────────

/// Top-level shape of the plan file.
#[derive(Debug, Clone, Deserialize)]
pub struct PlanConfig {
  /// SQLite database the triggers are installed into. May instead come from
  /// `MIRROR_DATABASE` or `--database`.
  #[serde(default)]
  pub database: Option<PathBuf>,
  #[serde(default)]
  pub mirrors:  Vec<MirrorConfig>,
}

/// One source table mirrored into one target table.
#[derive(Debug, Clone, Deserialize)]
pub struct MirrorConfig {
  pub source: String,
  pub target: String,
  /// Defaults to the connection's current schema.
  #[serde(default)]
  pub schema: Option<String>,
  /// Row key used by the delete trigger; always rendered first.
  #[serde(default = "default_key")]
  pub key:    String,
  /// Columns to copy. Empty means "whatever the target table has right now".
  #[serde(default)]
  pub fields: Vec<String>,
  #[serde(default = "all_kinds")]
  pub kinds:  Vec<TriggerKind>,
  /// Trigger names are `{prefix}_{source}_{target}_{kind}`.
  #[serde(default = "default_prefix")]
  pub prefix: String,
}

fn default_key() -> String { "id".to_owned() }

fn default_prefix() -> String { "mirror".to_owned() }

fn all_kinds() -> Vec<TriggerKind> { TriggerKind::ALL.to_vec() }

impl PlanConfig {
  /// Read the plan from `path` if it exists, then apply `MIRROR_*`
  /// environment overrides.
  pub fn load(path: &Path) -> anyhow::Result<Self> {
    let settings = config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("MIRROR"))
      .build()
      .with_context(|| format!("failed to read plan {}", path.display()))?;

    settings
      .try_deserialize()
      .context("failed to deserialise PlanConfig")
  }

  /// The database to open: `flag` if given, else the plan's `database`.
  pub fn database_path(
    &self,
    flag: Option<PathBuf>,
  ) -> anyhow::Result<PathBuf> {
    flag.or_else(|| self.database.clone()).context(
      "no database configured; set `database` in the plan, MIRROR_DATABASE, \
       or --database",
    )
  }

  /// Expand every mirror into its triggers, rejecting plans in which two
  /// triggers would share a schema-qualified name.
  pub fn resolve<T>(&self, tx: &T) -> anyhow::Result<Vec<PlannedTrigger>>
  where
    T: Transaction,
  {
    let mut planned = Vec::new();
    for mirror in &self.mirrors {
      let triggers = mirror.resolve(tx).with_context(|| {
        format!("invalid mirror {} -> {}", mirror.source, mirror.target)
      })?;
      planned.extend(triggers);
    }

    let mut seen = HashSet::new();
    for trigger in &planned {
      let (schema, name) = (trigger.spec.schema(), trigger.spec.name());
      if !seen.insert((schema, name)) {
        anyhow::bail!(
          "trigger {schema}.{name} is planned more than once; give one of \
           the mirrors a distinct `prefix`"
        );
      }
    }
    Ok(planned)
  }
}

impl MirrorConfig {
  pub fn trigger_name(&self, kind: TriggerKind) -> String {
    format!("{}_{}_{}_{}", self.prefix, self.source, self.target, kind)
  }

  /// Whether columns are read from the catalog at install time.
  pub fn live_fields(&self) -> bool { self.fields.is_empty() }

  /// Trigger field list: the key, then the configured fields without it.
  fn spec_fields(&self) -> Vec<String> {
    std::iter::once(self.key.clone())
      .chain(self.fields.iter().filter(|f| **f != self.key).cloned())
      .collect()
  }

  /// Expand into one trigger per configured kind, installed into `schema`.
  pub fn specs(
    &self,
    schema: &str,
  ) -> mirror_core::Result<Vec<PlannedTrigger>> {
    self
      .kinds
      .iter()
      .map(|&kind| -> mirror_core::Result<PlannedTrigger> {
        let spec = TriggerSpec::new(
          schema,
          self.trigger_name(kind),
          &self.source,
          &self.target,
          kind,
          self.spec_fields(),
        )?;
        Ok(PlannedTrigger {
          spec,
          live_fields: self.live_fields(),
        })
      })
      .collect()
  }

  /// Like [`MirrorConfig::specs`], resolving a missing schema through the
  /// catalog.
  pub fn resolve<T>(&self, tx: &T) -> mirror_core::Result<Vec<PlannedTrigger>>
  where
    T: Transaction,
  {
    let schema = match &self.schema {
      Some(schema) => schema.clone(),
      None => lifecycle::current_schema(Some(tx), &SqliteCatalog)?,
    };
    self.specs(&schema)
  }
}

// ─── Planned triggers ─────────────────────────────────────────────────────────

/// A validated trigger plus the field source it should be installed with.
#[derive(Debug, Clone)]
pub struct PlannedTrigger {
  pub spec:        TriggerSpec,
  pub live_fields: bool,
}

impl PlannedTrigger {
  fn field_source<T: Transaction>(&self) -> Box<dyn FieldSource<T>> {
    if self.live_fields {
      Box::new(CatalogFields::new(SqliteCatalog))
    } else {
      Box::new(StaticFields)
    }
  }

  pub fn install<T>(&self, tx: &T, replace: bool) -> mirror_core::Result<()>
  where
    T: Transaction,
  {
    let source = self.field_source::<T>();
    self.spec.create_with(Some(tx), replace, source.as_ref())
  }

  pub fn remove<T>(&self, tx: &T) -> mirror_core::Result<()>
  where
    T: Transaction,
  {
    self.spec.drop(Some(tx))
  }

  /// The `CREATE TRIGGER` statement `install` would run.
  pub fn statement<T>(&self, tx: &T) -> mirror_core::Result<String>
  where
    T: Transaction,
  {
    let source = self.field_source::<T>();
    self.spec.render_with(Some(tx), source.as_ref())
  }
}

#[cfg(test)]
mod tests {
  use mirror_sqlite::SqliteTransaction;

  use super::*;

  fn parse(toml: &str) -> PlanConfig {
    config::Config::builder()
      .add_source(config::File::from_str(toml, config::FileFormat::Toml))
      .build()
      .unwrap()
      .try_deserialize()
      .unwrap()
  }

  const PLAN: &str = r#"
    database = "shop.db"

    [[mirrors]]
    source = "orders"
    target = "orders_view"
    schema = "shop"
    fields = ["total", "id"]

    [[mirrors]]
    source = "customers"
    target = "customers_copy"
    key    = "customer_id"
    kinds  = ["insert", "delete"]
    prefix = "sync"
  "#;

  #[test]
  fn parses_plan_with_defaults() {
    let plan = parse(PLAN);
    assert_eq!(plan.database, Some(PathBuf::from("shop.db")));
    assert_eq!(plan.mirrors.len(), 2);

    let orders = &plan.mirrors[0];
    assert_eq!(orders.schema.as_deref(), Some("shop"));
    assert_eq!(orders.key, "id");
    assert_eq!(orders.prefix, "mirror");
    assert_eq!(orders.kinds, TriggerKind::ALL.to_vec());
    assert!(!orders.live_fields());

    let customers = &plan.mirrors[1];
    assert_eq!(customers.schema, None);
    assert_eq!(customers.kinds, vec![TriggerKind::Insert, TriggerKind::Delete]);
    assert!(customers.live_fields());
  }

  #[test]
  fn unknown_kind_is_rejected() {
    let result = config::Config::builder()
      .add_source(config::File::from_str(
        "database = \"x.db\"\n[[mirrors]]\nsource = \"a\"\ntarget = \"b\"\n\
         kinds = [\"truncate\"]",
        config::FileFormat::Toml,
      ))
      .build()
      .unwrap()
      .try_deserialize::<PlanConfig>();
    assert!(result.is_err());
  }

  #[test]
  fn expands_one_trigger_per_kind() {
    let plan = parse(PLAN);
    let planned = plan.mirrors[0].specs("shop").unwrap();

    let names: Vec<&str> = planned.iter().map(|p| p.spec.name()).collect();
    assert_eq!(names, vec![
      "mirror_orders_orders_view_insert",
      "mirror_orders_orders_view_update",
      "mirror_orders_orders_view_delete",
    ]);
    // The key moves to the front; the rest keep their configured order.
    assert_eq!(planned[0].spec.fields(), ["id", "total"]);
    assert!(planned.iter().all(|p| !p.live_fields));
  }

  #[test]
  fn live_field_mirrors_carry_only_the_key() {
    let plan = parse(PLAN);
    let planned = plan.mirrors[1].specs("main").unwrap();

    assert_eq!(planned.len(), 2);
    assert_eq!(planned[0].spec.name(), "sync_customers_customers_copy_insert");
    assert_eq!(planned[1].spec.name(), "sync_customers_customers_copy_delete");
    assert_eq!(planned[1].spec.fields(), ["customer_id"]);
    assert!(planned.iter().all(|p| p.live_fields));
  }

  #[test]
  fn empty_table_names_fail_validation() {
    let mut mirror = parse(PLAN).mirrors.remove(0);
    mirror.target.clear();
    assert!(mirror.specs("shop").is_err());
  }

  // ─── Database location ───────────────────────────────────────────────────

  #[test]
  fn database_may_be_left_out_of_the_plan() {
    let plan = parse(
      r#"
      [[mirrors]]
      source = "orders"
      target = "orders_view"
      "#,
    );
    assert_eq!(plan.database, None);
    assert!(plan.database_path(None).is_err());
    assert_eq!(
      plan.database_path(Some("cli.db".into())).unwrap(),
      PathBuf::from("cli.db")
    );
  }

  #[test]
  fn database_flag_overrides_the_plan() {
    let plan = parse(PLAN);
    assert_eq!(plan.database_path(None).unwrap(), PathBuf::from("shop.db"));
    assert_eq!(
      plan.database_path(Some("other.db".into())).unwrap(),
      PathBuf::from("other.db")
    );
  }

  #[test]
  fn missing_plan_file_loads_as_empty() {
    let plan = PlanConfig::load(Path::new("no-such-dir/mirror.toml")).unwrap();
    assert!(plan.mirrors.is_empty());
  }

  // ─── Against SQLite ──────────────────────────────────────────────────────

  fn database() -> rusqlite::Connection {
    let conn = rusqlite::Connection::open_in_memory().unwrap();
    conn
      .execute_batch(
        "CREATE TABLE orders (id INTEGER PRIMARY KEY, total INTEGER, note TEXT);
         CREATE TABLE orders_view (id INTEGER PRIMARY KEY, total INTEGER);
         CREATE TABLE orders_notes (id INTEGER PRIMARY KEY, note TEXT);",
      )
      .unwrap();
    conn
  }

  fn orders_mirror() -> MirrorConfig {
    parse(
      r#"
      [[mirrors]]
      source = "orders"
      target = "orders_view"
      "#,
    )
    .mirrors
    .remove(0)
  }

  fn view_total(conn: &rusqlite::Connection, id: i64) -> Option<i64> {
    conn
      .query_row("SELECT total FROM orders_view WHERE id = ?1", [id], |r| {
        r.get(0)
      })
      .ok()
  }

  #[test]
  fn install_and_remove_whole_mirror() {
    let mut conn = database();
    let mirror = orders_mirror();

    let raw = conn.transaction().unwrap();
    let tx = SqliteTransaction::new(&raw);
    let planned = mirror.resolve(&tx).unwrap();
    assert!(planned.iter().all(|p| p.spec.schema() == "main"));
    for trigger in &planned {
      trigger.install(&tx, true).unwrap();
    }
    raw.commit().unwrap();

    conn
      .execute_batch(
        "INSERT INTO orders (id, total, note) VALUES (1, 10, 'a');
         INSERT INTO orders (id, total, note) VALUES (2, 20, 'b');
         UPDATE orders SET total = 15 WHERE id = 1;
         DELETE FROM orders WHERE id = 2;",
      )
      .unwrap();
    assert_eq!(view_total(&conn, 1), Some(15));
    assert_eq!(view_total(&conn, 2), None);

    let raw = conn.transaction().unwrap();
    let tx = SqliteTransaction::new(&raw);
    for trigger in &planned {
      trigger.remove(&tx).unwrap();
    }
    raw.commit().unwrap();

    conn
      .execute("UPDATE orders SET total = 99 WHERE id = 1", [])
      .unwrap();
    assert_eq!(view_total(&conn, 1), Some(15));
  }

  #[test]
  fn statement_uses_live_columns() {
    let mut conn = database();
    let raw = conn.transaction().unwrap();
    let tx = SqliteTransaction::new(&raw);
    let planned = orders_mirror().resolve(&tx).unwrap();

    let insert = planned[0].statement(&tx).unwrap();
    assert!(insert.contains(
      "REPLACE INTO `orders_view` (`id`, `total`) VALUES (NEW.`id`, \
       NEW.`total`)"
    ));

    let delete = planned[2].statement(&tx).unwrap();
    assert!(delete.ends_with("`orders_view`.`id` = OLD.`id`; END"));
  }

  const TWO_TARGETS: &str = r#"
    [[mirrors]]
    source = "orders"
    target = "orders_view"

    [[mirrors]]
    source = "orders"
    target = "orders_notes"
  "#;

  #[test]
  fn mirrors_of_one_source_keep_every_target_in_step() {
    let mut conn = database();
    let plan = parse(TWO_TARGETS);

    let raw = conn.transaction().unwrap();
    let tx = SqliteTransaction::new(&raw);
    let planned = plan.resolve(&tx).unwrap();
    assert_eq!(planned.len(), 6);
    for trigger in &planned {
      trigger.install(&tx, true).unwrap();
    }
    raw.commit().unwrap();

    conn
      .execute("INSERT INTO orders (id, total, note) VALUES (5, 50, 'x')", [])
      .unwrap();
    assert_eq!(view_total(&conn, 5), Some(50));
    let note: String = conn
      .query_row("SELECT note FROM orders_notes WHERE id = 5", [], |r| {
        r.get(0)
      })
      .unwrap();
    assert_eq!(note, "x");
  }

  #[test]
  fn duplicate_trigger_names_are_rejected() {
    let mut conn = database();
    let mut plan = parse(TWO_TARGETS);
    plan.mirrors[1].target = "orders_view".to_owned();

    let raw = conn.transaction().unwrap();
    let err = plan.resolve(&SqliteTransaction::new(&raw)).unwrap_err();
    assert!(err.to_string().contains("planned more than once"), "{err}");
  }
}
