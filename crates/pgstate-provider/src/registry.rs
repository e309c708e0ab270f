//! Resource type registry

use pgstate_db::ConnectionContext;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{ProviderError, Result};
use crate::resource::Resource;
use crate::role::{role_schema, RoleResource, ROLE_RESOURCE_TYPE};
use crate::schema::{PlanResult, Schema};

/// Builds a resource bound to the shared connection context
pub type ResourceFactory = fn(Arc<ConnectionContext>) -> Box<dyn Resource>;

#[derive(Clone, Copy)]
struct Registration {
    schema: fn() -> Schema,
    factory: ResourceFactory,
}

/// Maps resource type names to constructors
#[derive(Clone, Default)]
pub struct ResourceRegistry {
    entries: BTreeMap<&'static str, Registration>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with every built-in resource kind
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(ROLE_RESOURCE_TYPE, role_schema, RoleResource::boxed);
        registry
    }

    pub fn register(&mut self, type_name: &'static str, schema: fn() -> Schema, factory: ResourceFactory) {
        self.entries.insert(type_name, Registration { schema, factory });
    }

    pub fn type_names(&self) -> Vec<&'static str> {
        self.entries.keys().copied().collect()
    }

    pub fn schema(&self, type_name: &str) -> Result<Schema> {
        Ok((self.lookup(type_name)?.schema)())
    }

    /// Plan without a database connection
    pub fn plan(&self, type_name: &str, prior: Option<&Value>, proposed: Value) -> Result<PlanResult> {
        self.schema(type_name)?.plan(prior, proposed)
    }

    pub fn instantiate(&self, type_name: &str, ctx: Arc<ConnectionContext>) -> Result<Box<dyn Resource>> {
        Ok((self.lookup(type_name)?.factory)(ctx))
    }

    fn lookup(&self, type_name: &str) -> Result<&Registration> {
        self.entries
            .get(type_name)
            .ok_or_else(|| ProviderError::UnknownResourceType(type_name.to_string()))
    }
}
