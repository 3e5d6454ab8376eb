//! Error types for the persistence layer

use thiserror::Error;

/// Result type alias for database operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during database operations
#[derive(Debug, Error)]
pub enum Error {
    #[error("SQLite error: {0}")]
    Sqlite(rusqlite::Error),

    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("duplicate {entity}: {value}")]
    Duplicate { entity: &'static str, value: String },

    #[error("foreign key violation inserting {entity}")]
    ForeignKey { entity: &'static str },

    #[error("{entity} {id} is already closed")]
    AlreadyClosed { entity: &'static str, id: i64 },

    #[error("{entity} is still referenced by other records")]
    InUse { entity: &'static str },

    #[error("invalid stored value in column {column}: {value}")]
    InvalidColumn { column: &'static str, value: String },
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Sqlite(err)
    }
}

impl Error {
    /// Classify an insert failure for `entity`, turning unique and foreign-key
    /// constraint violations into their dedicated variants.
    pub(crate) fn from_insert(err: rusqlite::Error, entity: &'static str, value: &str) -> Self {
        if let rusqlite::Error::SqliteFailure(code, _) = &err {
            match code.extended_code {
                rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE => {
                    return Error::Duplicate {
                        entity,
                        value: value.to_string(),
                    };
                }
                rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                    return Error::ForeignKey { entity };
                }
                _ => {}
            }
        }
        Error::Sqlite(err)
    }

    /// Classify a delete failure for `entity`: a row that other tables still
    /// reference surfaces as `InUse` instead of a bare SQLite error.
    pub(crate) fn from_delete(err: rusqlite::Error, entity: &'static str) -> Self {
        if let rusqlite::Error::SqliteFailure(code, _) = &err {
            if code.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_FOREIGNKEY {
                return Error::InUse { entity };
            }
        }
        Error::Sqlite(err)
    }
}
