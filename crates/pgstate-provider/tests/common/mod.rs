//! Shared setup for provider tests against a live database
//!
//! Skipped unless `PGSTATE_TEST_DATABASE_URL` is set.

use pgstate_db::DatabaseConfig;
use pgstate_provider::Provider;
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};

pub const DATABASE_URL_VAR: &str = "PGSTATE_TEST_DATABASE_URL";

/// A configured provider, or `None` when no test database is available
pub async fn configured_provider() -> Option<Provider> {
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

    let mut provider = Provider::new("test");
    provider
        .configure_with(&config)
        .await
        .expect("configure provider");
    Some(provider)
}

pub fn unique_role_name(prefix: &str) -> String {
    static COUNTER: AtomicUsize = AtomicUsize::new(0);
    let n = COUNTER.fetch_add(1, Ordering::SeqCst);
    format!("pgstate_res_{}_{}_{}", prefix, std::process::id(), n)
}

/// Best-effort removal of a role a test created
pub async fn cleanup(provider: &Provider, name: &str) {
    if let Ok(resource) = provider.resource("postgresql_role") {
        let _ = resource.delete(json!({ "name": name })).await;
    }
}
