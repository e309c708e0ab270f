//! pgstate Database
//!
//! PostgreSQL side of the pgstate reconciliation engine.
//!
//! This crate provides:
//! - Connection pool management and dialect detection at connect time
//! - The shared [`ConnectionContext`] injected into every resource
//! - SQL statement builders for role DDL and catalog reads
//! - The transactional [`RoleReconciler`]

pub mod context;
pub mod models;
pub mod pool;
pub mod roles;
pub mod statements;

pub use context::ConnectionContext;
pub use pool::{DatabaseConfig, DatabasePool, PoolStats};
pub use roles::RoleReconciler;

use pgstate_core::{ParseError, RoleError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("Database connection error: {0}")]
    Connection(#[source] sqlx::Error),

    #[error("Unable to start a new transaction: {0}")]
    Begin(#[source] sqlx::Error),

    #[error("Unable to determine database version/type with `{statement}`: {source}")]
    VersionQuery {
        statement: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Unable to parse results of `SELECT VERSION();`: {0}")]
    Version(#[from] ParseError),

    #[error("Invalid role: {0}")]
    InvalidRole(#[from] RoleError),

    #[error("Error executing query '{statement}': {source}")]
    RoleCreation {
        statement: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Error executing query '{statement}': {source}")]
    RoleUpdate {
        statement: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Error executing query '{statement}': {source}")]
    RoleDeletion {
        statement: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("Error retrieving role OID with query `{statement}`: {source}")]
    OidLookup {
        statement: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("SQL query to read role encountered an unexpected error, query=`{statement}`: {source}")]
    Read {
        statement: String,
        #[source]
        source: sqlx::Error,
    },

    /// The transaction may or may not have been applied.
    #[error("Error committing transaction, outcome unknown until the next read: {0}")]
    Commit(#[source] sqlx::Error),

    #[error("{primary}; additionally unable to rollback transaction: {source}")]
    Rollback {
        primary: Box<DbError>,
        #[source]
        source: sqlx::Error,
    },
}

impl DbError {
    /// A statement sent to the database failed (after any rollback).
    pub fn is_statement_error(&self) -> bool {
        match self {
            DbError::VersionQuery { .. }
            | DbError::RoleCreation { .. }
            | DbError::RoleUpdate { .. }
            | DbError::RoleDeletion { .. }
            | DbError::OidLookup { .. }
            | DbError::Read { .. } => true,
            DbError::Rollback { primary, .. } => primary.is_statement_error(),
            _ => false,
        }
    }

    /// The failing SQL text, when the error came from a statement
    pub fn statement(&self) -> Option<&str> {
        match self {
            DbError::VersionQuery { statement, .. }
            | DbError::RoleCreation { statement, .. }
            | DbError::RoleUpdate { statement, .. }
            | DbError::RoleDeletion { statement, .. }
            | DbError::OidLookup { statement, .. }
            | DbError::Read { statement, .. } => Some(statement),
            DbError::Rollback { primary, .. } => primary.statement(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, DbError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statement_error_classification() {
        let err = DbError::RoleCreation {
            statement: "CREATE ROLE \"a\" WITH LOGIN;".to_string(),
            source: sqlx::Error::RowNotFound,
        };
        assert!(err.is_statement_error());
        assert_eq!(err.statement(), Some("CREATE ROLE \"a\" WITH LOGIN;"));
        assert!(err.to_string().contains("CREATE ROLE \"a\" WITH LOGIN;"));

        let commit = DbError::Commit(sqlx::Error::PoolClosed);
        assert!(!commit.is_statement_error());
        assert_eq!(commit.statement(), None);
    }

    #[test]
    fn test_rollback_keeps_primary_cause() {
        let primary = DbError::RoleDeletion {
            statement: "DROP ROLE \"gone\";".to_string(),
            source: sqlx::Error::RowNotFound,
        };
        let err = DbError::Rollback {
            primary: Box::new(primary),
            source: sqlx::Error::PoolClosed,
        };

        let message = err.to_string();
        assert!(message.contains("DROP ROLE \"gone\";"), "{message}");
        assert!(message.contains("rollback"), "{message}");
        assert!(err.is_statement_error());
        assert_eq!(err.statement(), Some("DROP ROLE \"gone\";"));
    }

    #[test]
    fn test_connection_error_keeps_source() {
        use std::error::Error as _;

        let err = DbError::Connection(sqlx::Error::PoolTimedOut);
        assert!(err.source().is_some());
        assert!(err.statement().is_none());
    }

    #[test]
    fn test_version_error_from_parse() {
        let err: DbError = ParseError::UnrecognizedFormat("MySQL 8.0.1".to_string()).into();
        assert!(err.to_string().contains("MySQL 8.0.1"));
        assert!(!err.is_statement_error());
    }
}
