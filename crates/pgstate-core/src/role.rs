//! Role resource types
//!
//! A role is identified by its name for DDL and by its oid for reads.
//! The oid is assigned by the database and never supplied by the caller.

use serde::{Deserialize, Serialize};

use crate::error::RoleError;

/// PostgreSQL truncates identifiers longer than this (NAMEDATALEN - 1)
pub const MAX_ROLE_NAME_BYTES: usize = 63;

/// The tracked role attributes, shared by desired and actual state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleAttributes {
    /// Bypass every row-level security policy
    pub bypass_row_level_security: bool,

    /// Allowed to log in
    pub can_login: bool,

    /// Concurrent connection limit, -1 for unlimited
    pub connection_limit: i32,

    /// May create, alter and drop other roles
    pub create_role: bool,

    /// Inherits privileges of roles it is a member of
    pub inherit: bool,

    /// May initiate streaming replication
    pub replication: bool,

    /// Overrides all access restrictions
    pub superuser: bool,
}

impl Default for RoleAttributes {
    fn default() -> Self {
        Self {
            bypass_row_level_security: false,
            can_login: false,
            connection_limit: -1,
            create_role: false,
            inherit: true,
            replication: false,
            superuser: false,
        }
    }
}

impl RoleAttributes {
    pub fn validate(&self) -> Result<(), RoleError> {
        if self.connection_limit < -1 {
            return Err(RoleError::InvalidConnectionLimit(self.connection_limit));
        }
        Ok(())
    }

    /// Names of attributes whose values differ between `self` and `other`
    pub fn changed_fields(&self, other: &RoleAttributes) -> Vec<&'static str> {
        let mut changed = Vec::new();
        if self.bypass_row_level_security != other.bypass_row_level_security {
            changed.push("bypass_row_level_security");
        }
        if self.can_login != other.can_login {
            changed.push("can_login");
        }
        if self.connection_limit != other.connection_limit {
            changed.push("connection_limit");
        }
        if self.create_role != other.create_role {
            changed.push("create_role");
        }
        if self.inherit != other.inherit {
            changed.push("inherit");
        }
        if self.replication != other.replication {
            changed.push("replication");
        }
        if self.superuser != other.superuser {
            changed.push("superuser");
        }
        changed
    }
}

/// Orchestrator-supplied target state for one role
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleDesiredState {
    pub name: String,

    #[serde(flatten)]
    pub attributes: RoleAttributes,
}

impl RoleDesiredState {
    /// Desired state with default attributes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: RoleAttributes::default(),
        }
    }

    pub fn with_attributes(mut self, attributes: RoleAttributes) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn validate(&self) -> Result<(), RoleError> {
        if self.name.is_empty() {
            return Err(RoleError::EmptyName);
        }
        if self.name.len() > MAX_ROLE_NAME_BYTES {
            return Err(RoleError::NameTooLong(self.name.len()));
        }
        self.attributes.validate()
    }
}

/// Role state as read back from the database
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleActualState {
    pub oid: i64,

    pub name: String,

    #[serde(flatten)]
    pub attributes: RoleAttributes,
}

impl RoleActualState {
    /// Actual state for a role just created or altered from `desired`
    pub fn applied(oid: i64, desired: &RoleDesiredState) -> Self {
        Self {
            oid,
            name: desired.name.clone(),
            attributes: desired.attributes.clone(),
        }
    }

    /// Compare against a desired state
    pub fn drift_from(&self, desired: &RoleDesiredState) -> RoleDrift {
        RoleDrift {
            changed: desired.attributes.changed_fields(&self.attributes),
            requires_replace: self.name != desired.name,
        }
    }
}

/// Differences between desired and actual state discovered on read
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RoleDrift {
    /// Attributes that can be converged with `ALTER ROLE`
    pub changed: Vec<&'static str>,

    /// The name differs: converging needs drop and re-create
    pub requires_replace: bool,
}

impl RoleDrift {
    pub fn is_empty(&self) -> bool {
        self.changed.is_empty() && !self.requires_replace
    }
}

/// Identity of an imported role, resolved by a later read
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceKey {
    pub name: String,
}

impl ResourceKey {
    /// The import token is the role name.
    pub fn from_import_token(token: impl Into<String>) -> Self {
        Self { name: token.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_json() {
        let desired: RoleDesiredState = serde_json::from_str(r#"{"name": "role1"}"#).unwrap();
        assert_eq!(desired.name, "role1");
        assert_eq!(desired.attributes, RoleAttributes::default());
        assert!(desired.attributes.inherit);
        assert_eq!(desired.attributes.connection_limit, -1);
    }

    #[test]
    fn test_flattened_json() {
        let desired: RoleDesiredState = serde_json::from_str(
            r#"{"name": "role1", "can_login": true, "connection_limit": 10}"#,
        )
        .unwrap();
        assert!(desired.attributes.can_login);
        assert_eq!(desired.attributes.connection_limit, 10);

        let actual = RoleActualState::applied(16384, &desired);
        let json = serde_json::to_value(&actual).unwrap();
        assert_eq!(json["oid"], 16384);
        assert_eq!(json["name"], "role1");
        assert_eq!(json["can_login"], true);
        assert_eq!(json["inherit"], true);
    }

    #[test]
    fn test_validation() {
        assert!(RoleDesiredState::new("app").validate().is_ok());
        assert_eq!(RoleDesiredState::new("").validate(), Err(RoleError::EmptyName));
        assert_eq!(
            RoleDesiredState::new("x".repeat(64)).validate(),
            Err(RoleError::NameTooLong(64))
        );

        let unlimited = RoleAttributes {
            connection_limit: -1,
            ..Default::default()
        };
        assert!(unlimited.validate().is_ok());

        let invalid = RoleAttributes {
            connection_limit: -2,
            ..Default::default()
        };
        assert_eq!(
            RoleDesiredState::new("app").with_attributes(invalid).validate(),
            Err(RoleError::InvalidConnectionLimit(-2))
        );
    }

    #[test]
    fn test_drift() {
        let desired = RoleDesiredState::new("app");
        let mut actual = RoleActualState::applied(42, &desired);
        assert!(actual.drift_from(&desired).is_empty());

        actual.attributes.superuser = true;
        actual.attributes.connection_limit = 5;
        let drift = actual.drift_from(&desired);
        assert_eq!(drift.changed, vec!["connection_limit", "superuser"]);
        assert!(!drift.requires_replace);

        actual.name = "renamed".to_string();
        assert!(actual.drift_from(&desired).requires_replace);
    }

    #[test]
    fn test_import_token() {
        let key = ResourceKey::from_import_token("reporting");
        assert_eq!(key.name, "reporting");
    }
}
