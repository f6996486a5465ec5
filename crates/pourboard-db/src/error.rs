//! Error types for the item store.
//!
//! All errors are propagated via [`DbError`], which wraps the underlying
//! [`sqlx`] errors and adds the domain failures both backends report.

/// Errors that can occur in the item store.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A `PostgreSQL` operation failed.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// A `PostgreSQL` migration failed.
    #[error("PostgreSQL migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Another item already carries this name.
    #[error("an item named {0:?} already exists")]
    DuplicateName(String),

    /// The store cannot be reached.
    #[error("store unavailable")]
    Unavailable,

    /// A configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl DbError {
    /// Convert a `sqlx` error from a write that touches `name`, turning a
    /// unique-index violation into [`DbError::DuplicateName`].
    pub(crate) fn from_name_write(err: sqlx::Error, name: &str) -> Self {
        match &err {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                Self::DuplicateName(name.to_owned())
            }
            _ => Self::Postgres(err),
        }
    }
}
