//! Core types and trait definitions for mirror triggers.
//!
//! A mirror trigger keeps a derived table in step with a source table by
//! replaying row events (`INSERT`, `UPDATE`, `DELETE`) inside the database.
//! This crate describes such triggers, renders their DDL and installs or
//! removes them through a caller-owned [`Transaction`].
//!
//! This crate is deliberately free of database drivers. Backends (e.g.
//! `mirror-sqlite`) implement [`Transaction`] and [`Catalog`] for a concrete
//! engine.

pub mod catalog;
pub mod error;
pub mod fields;
pub mod kind;
pub mod lifecycle;
pub mod render;
pub mod spec;
pub mod transaction;

pub use catalog::{Catalog, MysqlCatalog};
pub use error::{Error, Result, ValidationError};
pub use fields::{CatalogFields, FieldSource, StaticFields};
pub use kind::TriggerKind;
pub use spec::TriggerSpec;
pub use transaction::Transaction;
