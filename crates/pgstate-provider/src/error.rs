//! Error types for the provider layer

use pgstate_core::RoleError;
use pgstate_db::DbError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Invalid provider configuration: {0}")]
    Config(String),

    #[error("Unable to load provider configuration: {0}")]
    ConfigLoad(#[from] config::ConfigError),

    #[error("Provider has not been configured")]
    NotConfigured,

    #[error("Unknown resource type: {0}")]
    UnknownResourceType(String),

    #[error("Missing attribute `{0}`")]
    MissingAttribute(&'static str),

    #[error("Invalid value for attribute `{attribute}`: {reason}")]
    InvalidAttribute {
        attribute: &'static str,
        reason: String,
    },

    #[error("Attribute `{0}` cannot be changed in place, the resource must be replaced")]
    RequiresReplace(&'static str),

    #[error("Invalid role: {0}")]
    Role(#[from] RoleError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Db(#[from] DbError),
}

pub type Result<T> = std::result::Result<T, ProviderError>;
