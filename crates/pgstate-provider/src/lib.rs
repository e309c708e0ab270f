//! pgstate provider
//!
//! Declarative management of PostgreSQL and CockroachDB roles. A
//! [`Provider`] is configured once with connection settings, then hands out
//! [`Resource`] implementations that create, read, update, delete and
//! import resources expressed as JSON state.

pub mod config;
pub mod error;
pub mod provider;
pub mod registry;
pub mod resource;
pub mod role;
pub mod schema;

pub use config::{Password, ProviderConfig};
pub use error::{ProviderError, Result};
pub use provider::{Provider, ProviderMetadata, PROVIDER_TYPE_NAME};
pub use registry::{ResourceFactory, ResourceRegistry};
pub use resource::Resource;
pub use role::{drift, role_schema, RoleResource, ROLE_RESOURCE_TYPE};
pub use schema::{Attribute, AttributeChange, AttributeMode, AttributeType, PlanAction, PlanResult, Schema};
