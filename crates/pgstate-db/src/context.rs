//! Process-wide connection context
//!
//! Built once when the provider is configured, then shared read-only by
//! every resource instance. A database whose version string cannot be
//! identified is never operated on.

use pgstate_core::version::VERSION_QUERY;
use pgstate_core::{parse_version, EngineVersion};
use std::sync::Arc;
use tracing::info;

use crate::pool::{DatabaseConfig, DatabasePool};
use crate::{DbError, Result};

/// Pooled connection handle plus the detected dialect
pub struct ConnectionContext {
    pool: DatabasePool,
    version: EngineVersion,
}

impl ConnectionContext {
    /// Connect, detect the dialect, and bundle both.
    pub async fn establish(config: &DatabaseConfig) -> Result<Arc<Self>> {
        let pool = DatabasePool::new(config).await?;
        let version = detect_version(&pool).await?;

        info!(
            engine = %version.engine,
            version = %version.version,
            "Detected database dialect"
        );

        Ok(Arc::new(Self { pool, version }))
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    pub fn version(&self) -> &EngineVersion {
        &self.version
    }
}

/// Run `SELECT VERSION();` and parse the result
pub async fn detect_version(pool: &DatabasePool) -> Result<EngineVersion> {
    let raw = sqlx::query_scalar::<_, String>(VERSION_QUERY)
        .fetch_one(pool.pool())
        .await
        .map_err(|source| DbError::VersionQuery {
            statement: VERSION_QUERY.to_string(),
            source,
        })?;

    tracing::debug!(raw = %raw, "Database version string");

    Ok(parse_version(&raw)?)
}
