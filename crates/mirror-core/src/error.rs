//! Error types for `mirror-core`.

use thiserror::Error;

/// Boxed error coming out of a [`Transaction`](crate::Transaction)
/// implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// A trigger description was rejected before reaching the database.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
  #[error("no empty value allowed")]
  EmptyValue,

  #[error("unsupported trigger type: {0}")]
  UnsupportedKind(String),
}

#[derive(Debug, Error)]
pub enum Error {
  #[error(transparent)]
  Validation(#[from] ValidationError),

  #[error("a valid transaction is needed")]
  MissingTransaction,

  /// A catalog query (current schema, column listing) failed.
  #[error("introspection query failed: {query}: {source}")]
  Introspection {
    query:  String,
    #[source]
    source: BoxError,
  },

  /// The catalog answered, but listed no columns for the table.
  #[error("no columns found for table `{table}`")]
  NoColumns { table: String },

  #[error("statement failed: {statement}: {source}")]
  Execution {
    statement: String,
    #[source]
    source:    BoxError,
  },
}

impl Error {
  pub(crate) fn execution(
    statement: impl Into<String>,
    source: impl Into<BoxError>,
  ) -> Self {
    Self::Execution {
      statement: statement.into(),
      source:    source.into(),
    }
  }

  pub(crate) fn introspection(
    query: impl Into<String>,
    source: impl Into<BoxError>,
  ) -> Self {
    Self::Introspection {
      query:  query.into(),
      source: source.into(),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
