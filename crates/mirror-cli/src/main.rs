//! `mirror` — install and remove table-mirroring triggers in a SQLite
//! database.
//!
//! # Usage
//!
//! ```
//! mirror --config mirror.toml install
//! mirror --config mirror.toml render
//! MIRROR_DATABASE=/tmp/other.db mirror remove
//! ```
//!
//! Every command runs in a single transaction: either all triggers of the
//! plan change, or none do.

mod plan;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mirror_sqlite::SqliteTransaction;
use plan::{PlanConfig, PlannedTrigger};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "mirror", about = "Manage table-mirroring triggers")]
struct Args {
  /// Path to the TOML plan file. A missing file is an empty plan.
  #[arg(short, long, value_name = "FILE", default_value = "mirror.toml")]
  config: PathBuf,

  /// Database file; overrides `database` from the plan.
  #[arg(long, value_name = "PATH")]
  database: Option<PathBuf>,

  #[command(subcommand)]
  command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Create every trigger in the plan, replacing existing ones.
  Install {
    /// Fail instead of replacing a trigger that already exists.
    #[arg(long)]
    keep_existing: bool,
  },
  /// Drop every trigger in the plan.
  Remove,
  /// Print the DDL `install` would run, without changing anything.
  Render,
}

// ─── Entry point ──────────────────────────────────────────────────────────────

fn main() -> Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let args = Args::parse();
  let plan = PlanConfig::load(&args.config)?;
  let database = plan.database_path(args.database)?;

  let mut conn = rusqlite::Connection::open(&database).with_context(|| {
    format!("failed to open database {}", database.display())
  })?;
  let raw = conn.transaction().context("failed to begin transaction")?;
  let tx = SqliteTransaction::new(&raw);

  let planned = plan.resolve(&tx)?;

  match args.command {
    Command::Install { keep_existing } => {
      install(&tx, &planned, !keep_existing)?
    }
    Command::Remove => remove(&tx, &planned)?,
    Command::Render => {
      render(&tx, &planned)?;
      // Rolled back on drop.
      return Ok(());
    }
  }

  raw.commit().context("failed to commit")?;
  Ok(())
}

fn install(
  tx: &SqliteTransaction<'_, '_>,
  planned: &[PlannedTrigger],
  replace: bool,
) -> Result<()> {
  for trigger in planned {
    trigger
      .install(tx, replace)
      .with_context(|| format!("failed to install {}", trigger.spec.name()))?;
    tracing::info!(
      trigger = trigger.spec.name(),
      schema = trigger.spec.schema(),
      source = trigger.spec.source_table(),
      target = trigger.spec.target_table(),
      "installed"
    );
  }
  Ok(())
}

fn remove(
  tx: &SqliteTransaction<'_, '_>,
  planned: &[PlannedTrigger],
) -> Result<()> {
  for trigger in planned {
    trigger
      .remove(tx)
      .with_context(|| format!("failed to remove {}", trigger.spec.name()))?;
    tracing::info!(trigger = trigger.spec.name(), "removed");
  }
  Ok(())
}

fn render(
  tx: &SqliteTransaction<'_, '_>,
  planned: &[PlannedTrigger],
) -> Result<()> {
  for trigger in planned {
    let statement = trigger
      .statement(tx)
      .with_context(|| format!("failed to render {}", trigger.spec.name()))?;
    println!("{statement};");
  }
  Ok(())
}
