//! Test utilities for database-backed integration tests
//!
//! Tests connect to the database named by `PGSTATE_TEST_DATABASE_URL` and are
//! skipped when it is unset. The connecting user needs CREATEROLE.

use pgstate_db::{ConnectionContext, DatabaseConfig, RoleReconciler};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

pub const DATABASE_URL_VAR: &str = "PGSTATE_TEST_DATABASE_URL";

/// Connect to the test database, or `None` when none is configured
pub async fn test_context() -> Option<Arc<ConnectionContext>> {
    let url = match std::env::var(DATABASE_URL_VAR) {
        Ok(url) if !url.is_empty() => url,
        _ => {
            eprintln!("{} not set, skipping database test", DATABASE_URL_VAR);
            return None;
        }
    };

    let config = DatabaseConfig::from_url(&url)
        .expect("valid test database url")
        .with_max_connections(2);

    Some(
        ConnectionContext::establish(&config)
            .await
            .expect("connect to test database"),
    )
}

pub async fn test_reconciler() -> Option<RoleReconciler> {
    test_context().await.map(RoleReconciler::new)
}

/// A role name no other test in this run uses
pub fn unique_role_name(prefix: &str) -> String {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("pgstate_{}_{}_{}", prefix, std::process::id(), n)
}

/// Best-effort cleanup for roles a test created
pub async fn drop_if_exists(reconciler: &RoleReconciler, name: &str) {
    let sql = format!("DROP ROLE IF EXISTS {};", pgstate_core::quote_identifier(name));
    let _ = sqlx::query(&sql)
        .execute(reconciler.context().pool().pool())
        .await;
}
