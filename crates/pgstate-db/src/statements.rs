//! SQL text for role reconciliation
//!
//! Role names are interpolated only as quoted identifiers; catalog lookups
//! take their values as bind parameters.

use pgstate_core::{compile_options, quote_identifier, RoleDesiredState};

/// Look up a role's oid by name. `$1` is the role name.
pub const SELECT_ROLE_OID: &str = "SELECT oid FROM pg_roles WHERE rolname = $1";

/// Read every tracked attribute of a role. `$1` is the oid.
pub const SELECT_ROLE_BY_OID: &str = "SELECT rolbypassrls, rolcanlogin, rolconnlimit, rolcreaterole, rolinherit, rolname, rolreplication, rolsuper FROM pg_roles WHERE oid = $1;";

pub fn create_role(desired: &RoleDesiredState) -> String {
    format!(
        "CREATE ROLE {} WITH {};",
        quote_identifier(&desired.name),
        compile_options(&desired.attributes)
    )
}

pub fn alter_role(desired: &RoleDesiredState) -> String {
    format!(
        "ALTER ROLE {} WITH {};",
        quote_identifier(&desired.name),
        compile_options(&desired.attributes)
    )
}

pub fn drop_role(name: &str) -> String {
    format!("DROP ROLE {};", quote_identifier(name))
}
