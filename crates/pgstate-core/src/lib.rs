//! pgstate Core
//!
//! Core domain types for the pgstate reconciliation engine.
//! This crate has no database access: it defines the data structures
//! and pure functions shared by the reconciler and the provider layer.

pub mod error;
pub mod options;
pub mod quote;
pub mod role;
pub mod version;

pub use error::{ParseError, RoleError};
pub use options::{compile_options, RoleOption};
pub use quote::quote_identifier;
pub use role::{ResourceKey, RoleActualState, RoleAttributes, RoleDesiredState, RoleDrift};
pub use version::{parse_postgres_version, parse_version, Engine, EngineVersion};
