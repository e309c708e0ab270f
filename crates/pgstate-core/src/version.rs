//! Database dialect detection
//!
//! Identifies the database product and version from the free-text output of
//! `SELECT VERSION();`. The format is vendor-controlled, so an unrecognized
//! string is an error rather than a guess.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// The query whose output [`parse_version`] understands
pub const VERSION_QUERY: &str = "SELECT VERSION();";

/// Recognized database products
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Engine {
    #[serde(rename = "PostgreSQL")]
    PostgreSql,

    #[serde(rename = "CockroachDB CCL")]
    CockroachDbCcl,
}

impl Engine {
    /// Product identifier exactly as it appears in the version string
    pub fn as_str(&self) -> &'static str {
        match self {
            Engine::PostgreSql => "PostgreSQL",
            Engine::CockroachDbCcl => "CockroachDB CCL",
        }
    }
}

impl std::fmt::Display for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Detected database product and dotted version number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineVersion {
    pub engine: Engine,
    pub version: String,
}

impl std::fmt::Display for EngineVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.engine, self.version)
    }
}

// Order matters: CockroachDB reports PostgreSQL compatibility in some builds,
// so its signature must be tried before the upstream one.
static PATTERNS: Lazy<Vec<(Engine, Regex)>> = Lazy::new(|| {
    vec![
        (
            Engine::CockroachDbCcl,
            Regex::new(r"(CockroachDB CCL) v(\d+(?:\.\d+)*)(?:[\s,]|$)").expect("valid pattern"),
        ),
        (
            Engine::PostgreSql,
            Regex::new(r"(PostgreSQL) (\d+(?:\.\d+)*)(?:[\s,]|$)").expect("valid pattern"),
        ),
    ]
});

/// Parse the output of `SELECT VERSION();` into an [`EngineVersion`].
///
/// The first matching dialect pattern wins. Anything after the numeric
/// version (build metadata, platform, compiler) is ignored.
pub fn parse_version(raw: &str) -> Result<EngineVersion, ParseError> {
    PATTERNS
        .iter()
        .find_map(|(engine, regex)| {
            regex.captures(raw).map(|caps| EngineVersion {
                engine: *engine,
                version: caps[2].to_string(),
            })
        })
        .ok_or_else(|| ParseError::UnrecognizedFormat(raw.to_string()))
}

/// Parse only upstream PostgreSQL version strings, returning the version.
pub fn parse_postgres_version(raw: &str) -> Result<String, ParseError> {
    match parse_version(raw)? {
        EngineVersion {
            engine: Engine::PostgreSql,
            version,
        } => Ok(version),
        _ => Err(ParseError::UnrecognizedFormat(raw.to_string())),
    }
}
