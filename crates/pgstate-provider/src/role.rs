//! `postgresql_role` resource

use pgstate_core::{RoleActualState, RoleDesiredState, RoleDrift};
use pgstate_db::{ConnectionContext, RoleReconciler};
use serde_json::Value;
use std::sync::Arc;
use tracing::warn;

use crate::error::{ProviderError, Result};
use crate::resource::Resource;
use crate::schema::{Attribute, AttributeType, Schema};

pub const ROLE_RESOURCE_TYPE: &str = "postgresql_role";

/// Declared attributes of a role
pub fn role_schema() -> Schema {
    Schema::new("Postgresql Role")
        .with_attribute(
            Attribute::computed("oid", AttributeType::Int64)
                .describe("The object ID of the Postgresql role."),
        )
        // Renaming a role affects everything that depends on it, so a new
        // name means a new role.
        .with_attribute(
            Attribute::required("name", AttributeType::String)
                .describe("The name of the Postgresql role.")
                .requires_replace(),
        )
        .with_attribute(
            Attribute::optional("bypass_row_level_security", AttributeType::Bool)
                .describe("Determines whether a role bypasses every row-level security (RLS) policy.")
                .with_default(false),
        )
        .with_attribute(
            Attribute::optional("can_login", AttributeType::Bool)
                .describe("Determines whether a role is allowed to log in.")
                .with_default(false),
        )
        .with_attribute(
            Attribute::optional("connection_limit", AttributeType::Int32)
                .describe("Specifies how many concurrent connections the role can make. -1 (the default) means no limit.")
                .with_default(-1)
                .at_least(-1),
        )
        .with_attribute(
            Attribute::optional("create_role", AttributeType::Bool)
                .describe("Determines whether the role will be permitted to create, alter, drop, comment on, and change the security label for other roles.")
                .with_default(false),
        )
        .with_attribute(
            Attribute::optional("inherit", AttributeType::Bool)
                .describe("Determines whether the role inherits privileges from other roles that it's a member of.")
                .with_default(true),
        )
        .with_attribute(
            Attribute::optional("replication", AttributeType::Bool)
                .describe("Determines whether the role will have permissions to initiate replication.")
                .with_default(false),
        )
        .with_attribute(
            Attribute::optional("superuser", AttributeType::Bool)
                .describe("Determines whether the role is a superuser, which can override all access restrictions within the database.")
                .with_default(false),
        )
}

/// Decode planned JSON into a desired state, applying schema defaults
pub fn decode_desired(planned: Value) -> Result<RoleDesiredState> {
    let schema = role_schema();
    let mut planned = planned;
    schema.apply_defaults(&mut planned)?;
    schema.validate(&planned)?;

    let desired: RoleDesiredState = serde_json::from_value(planned)?;
    desired.validate()?;
    Ok(desired)
}

/// Compare refreshed state with desired configuration
pub fn drift(current: &Value, desired: Value) -> Result<RoleDrift> {
    let actual: RoleActualState = serde_json::from_value(current.clone())?;
    Ok(actual.drift_from(&decode_desired(desired)?))
}

fn state_oid(state: &Value) -> Option<i64> {
    state.get("oid").and_then(Value::as_i64)
}

fn state_name(state: &Value) -> Result<&str> {
    state
        .get("name")
        .and_then(Value::as_str)
        .ok_or(ProviderError::MissingAttribute("name"))
}

fn encode(actual: &RoleActualState) -> Result<Value> {
    Ok(serde_json::to_value(actual)?)
}

pub struct RoleResource {
    reconciler: RoleReconciler,
}

impl RoleResource {
    pub fn new(ctx: Arc<ConnectionContext>) -> Self {
        Self {
            reconciler: RoleReconciler::new(ctx),
        }
    }

    /// Registry constructor
    pub fn boxed(ctx: Arc<ConnectionContext>) -> Box<dyn Resource> {
        Box::new(Self::new(ctx))
    }
}

#[async_trait::async_trait]
impl Resource for RoleResource {
    fn type_name(&self) -> &'static str {
        ROLE_RESOURCE_TYPE
    }

    fn schema(&self) -> Schema {
        role_schema()
    }

    async fn create(&self, planned: Value) -> Result<Value> {
        let desired = decode_desired(planned)?;
        let actual = self.reconciler.create(&desired).await?;
        encode(&actual)
    }

    async fn read(&self, current: Value) -> Result<Option<Value>> {
        // Imported state carries only the name.
        let found = match state_oid(&current) {
            Some(oid) => self.reconciler.read(oid).await?,
            None => self.reconciler.resolve(state_name(&current)?).await?,
        };

        match found {
            Some(actual) => Ok(Some(encode(&actual)?)),
            None => {
                let name = current.get("name").and_then(Value::as_str).unwrap_or("<unknown>");
                warn!("The Postgres role couldn't be found, removing from state. role: {}", name);
                Ok(None)
            }
        }
    }

    async fn update(&self, prior: Value, planned: Value) -> Result<Value> {
        let oid = state_oid(&prior).ok_or(ProviderError::MissingAttribute("oid"))?;
        let prior_name = state_name(&prior)?.to_string();

        let desired = decode_desired(planned)?;
        if desired.name != prior_name {
            return Err(ProviderError::RequiresReplace("name"));
        }

        let actual = self.reconciler.update(oid, &desired).await?;
        encode(&actual)
    }

    async fn delete(&self, current: Value) -> Result<()> {
        let name = state_name(&current)?;
        self.reconciler.delete(name).await?;
        Ok(())
    }

    fn import(&self, token: &str) -> Result<Value> {
        Ok(serde_json::to_value(self.reconciler.import(token))?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_applies_defaults() {
        let desired = decode_desired(json!({"name": "role1", "can_login": true, "connection_limit": 10})).unwrap();
        assert_eq!(desired.name, "role1");
        assert!(desired.attributes.can_login);
        assert!(desired.attributes.inherit);
        assert!(!desired.attributes.superuser);
        assert_eq!(desired.attributes.connection_limit, 10);
    }

    #[test]
    fn test_decode_ignores_computed_oid() {
        let desired = decode_desired(json!({"oid": 16384, "name": "role1", "superuser": null})).unwrap();
        assert_eq!(desired.name, "role1");
        assert!(!desired.attributes.superuser);
    }

    #[test]
    fn test_decode_rejects_invalid() {
        assert!(matches!(
            decode_desired(json!({"can_login": true})),
            Err(ProviderError::MissingAttribute("name"))
        ));
        assert!(matches!(
            decode_desired(json!({"name": "role1", "connection_limit": -2})),
            Err(ProviderError::InvalidAttribute { attribute: "connection_limit", .. })
        ));
        assert!(matches!(
            decode_desired(json!({"name": ""})),
            Err(ProviderError::Role(_))
        ));
    }

    #[test]
    fn test_drift_against_desired() {
        let current = json!({
            "oid": 16384, "name": "role1", "bypass_row_level_security": false,
            "can_login": true, "connection_limit": 10, "create_role": false,
            "inherit": true, "replication": false, "superuser": true
        });

        let in_sync = drift(&current, json!({"name": "role1", "can_login": true, "connection_limit": 10, "superuser": true})).unwrap();
        assert!(in_sync.is_empty());

        let drifted = drift(&current, json!({"name": "role1", "can_login": true})).unwrap();
        assert_eq!(drifted.changed, vec!["connection_limit", "superuser"]);
        assert!(!drifted.requires_replace);

        let renamed = drift(&current, json!({"name": "role2", "can_login": true, "connection_limit": 10, "superuser": true})).unwrap();
        assert!(renamed.requires_replace);
        assert!(renamed.changed.is_empty());
    }

    #[test]
    fn test_drift_needs_full_state() {
        // An imported key has no attributes to compare yet.
        assert!(drift(&json!({"name": "role1"}), json!({"name": "role1"})).is_err());
    }

    #[test]
    fn test_schema_declarations() {
        let schema = role_schema();
        assert!(schema.attribute("name").unwrap().requires_replace);
        assert_eq!(schema.attribute("inherit").unwrap().default, Some(json!(true)));
        assert_eq!(schema.attribute("connection_limit").unwrap().min, Some(-1));
        assert_eq!(schema.attributes.len(), 9);
    }

    #[test]
    fn test_plan_rename_is_replace() {
        let prior = json!({
            "oid": 16384, "name": "role1", "bypass_row_level_security": false,
            "can_login": true, "connection_limit": 10, "create_role": false,
            "inherit": true, "replication": false, "superuser": false
        });

        let same = role_schema()
            .plan(Some(&prior), json!({"name": "role1", "can_login": true, "connection_limit": 10}))
            .unwrap();
        assert!(same.changes.is_empty());
        assert_eq!(same.planned_state["oid"], 16384);

        let renamed = role_schema()
            .plan(Some(&prior), json!({"name": "role2", "can_login": true, "connection_limit": 10}))
            .unwrap();
        assert!(renamed.requires_replace());
    }
}
