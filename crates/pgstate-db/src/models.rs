//! Catalog row models

use pgstate_core::{RoleActualState, RoleAttributes};
use sqlx::FromRow;

/// A `pg_roles` row as selected by
/// [`SELECT_ROLE_BY_OID`](crate::statements::SELECT_ROLE_BY_OID)
#[derive(Debug, Clone, FromRow)]
pub struct RoleRow {
    pub rolbypassrls: bool,
    pub rolcanlogin: bool,
    pub rolconnlimit: i32,
    pub rolcreaterole: bool,
    pub rolinherit: bool,
    pub rolname: String,
    pub rolreplication: bool,
    pub rolsuper: bool,
}

impl RoleRow {
    pub fn into_actual(self, oid: i64) -> RoleActualState {
        RoleActualState {
            oid,
            name: self.rolname,
            attributes: RoleAttributes {
                bypass_row_level_security: self.rolbypassrls,
                can_login: self.rolcanlogin,
                connection_limit: self.rolconnlimit,
                create_role: self.rolcreaterole,
                inherit: self.rolinherit,
                replication: self.rolreplication,
                superuser: self.rolsuper,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_into_actual() {
        let row = RoleRow {
            rolbypassrls: false,
            rolcanlogin: true,
            rolconnlimit: 10,
            rolcreaterole: false,
            rolinherit: true,
            rolname: "role1".to_string(),
            rolreplication: false,
            rolsuper: false,
        };

        let actual = row.into_actual(16390);
        assert_eq!(actual.oid, 16390);
        assert_eq!(actual.name, "role1");
        assert!(actual.attributes.can_login);
        assert_eq!(actual.attributes.connection_limit, 10);
        assert!(actual.attributes.inherit);
    }
}
