//! Role option clause compilation
//!
//! Turns [`RoleAttributes`] into the option list of `CREATE ROLE ... WITH`
//! and `ALTER ROLE ... WITH`. Every attribute is always emitted, in a fixed
//! order, so the same attributes always produce byte-identical SQL.

use crate::role::RoleAttributes;

/// A single role option keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleOption {
    /// BYPASSRLS / NOBYPASSRLS
    BypassRls(bool),
    /// LOGIN / NOLOGIN
    Login(bool),
    /// CONNECTION LIMIT n
    ConnectionLimit(i32),
    /// CREATEROLE / NOCREATEROLE
    CreateRole(bool),
    /// INHERIT / NOINHERIT
    Inherit(bool),
    /// REPLICATION / NOREPLICATION
    Replication(bool),
    /// SUPERUSER / NOSUPERUSER
    SuperUser(bool),
}

impl RoleOption {
    pub fn as_sql(&self) -> String {
        match *self {
            RoleOption::BypassRls(on) => keyword(on, "BYPASSRLS"),
            RoleOption::Login(on) => keyword(on, "LOGIN"),
            RoleOption::ConnectionLimit(limit) => format!("CONNECTION LIMIT {}", limit),
            RoleOption::CreateRole(on) => keyword(on, "CREATEROLE"),
            RoleOption::Inherit(on) => keyword(on, "INHERIT"),
            RoleOption::Replication(on) => keyword(on, "REPLICATION"),
            RoleOption::SuperUser(on) => keyword(on, "SUPERUSER"),
        }
    }

    /// All options for `attributes`, in clause order
    pub fn all(attributes: &RoleAttributes) -> [RoleOption; 7] {
        [
            RoleOption::BypassRls(attributes.bypass_row_level_security),
            RoleOption::Login(attributes.can_login),
            RoleOption::ConnectionLimit(attributes.connection_limit),
            RoleOption::CreateRole(attributes.create_role),
            RoleOption::Inherit(attributes.inherit),
            RoleOption::Replication(attributes.replication),
            RoleOption::SuperUser(attributes.superuser),
        ]
    }
}

fn keyword(on: bool, positive: &str) -> String {
    if on {
        positive.to_string()
    } else {
        format!("NO{}", positive)
    }
}

/// Compile the option clause for a role. The role name is not included.
pub fn compile_options(attributes: &RoleAttributes) -> String {
    RoleOption::all(attributes)
        .iter()
        .map(RoleOption::as_sql)
        .collect::<Vec<_>>()
        .join(" ")
}
