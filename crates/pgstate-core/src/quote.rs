//! SQL identifier quoting for names that cannot be bound as parameters.
//!
//! DDL statements such as `CREATE ROLE` do not accept bind parameters for the
//! role name, so names are always emitted as quoted identifiers.

/// Quote a SQL identifier.
///
/// The result is always wrapped in double quotes and embedded double quotes
/// are doubled, so any input yields exactly one identifier.
///
/// ```
/// use pgstate_core::quote_identifier;
///
/// assert_eq!(quote_identifier("app"), r#""app""#);
/// assert_eq!(quote_identifier(r#"x"; DROP ROLE admin; --"#), r#""x""; DROP ROLE admin; --""#);
/// ```
pub fn quote_identifier(name: &str) -> String {
    let mut quoted = String::with_capacity(name.len() + 2);
    quoted.push('"');
    for c in name.chars() {
        if c == '"' {
            quoted.push('"');
        }
        quoted.push(c);
    }
    quoted.push('"');
    quoted
}
