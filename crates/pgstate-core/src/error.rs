//! Error types for pgstate core

use thiserror::Error;

/// Failure to identify the database from its version string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("output of `SELECT VERSION();`: '{0}', didn't match expected patterns")]
    UnrecognizedFormat(String),
}

/// Invalid role desired state
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoleError {
    #[error("Role name cannot be empty")]
    EmptyName,

    #[error("Role name too long: {0} bytes (max 63)")]
    NameTooLong(usize),

    #[error("Invalid connection limit {0}: must be at least -1")]
    InvalidConnectionLimit(i32),
}
