//! Role commands - drive the `postgresql_role` resource from JSON files

use anyhow::{bail, Result};
use pgstate_provider::{drift, Provider, ResourceRegistry, ROLE_RESOURCE_TYPE};
use serde_json::Value;
use std::path::Path;
use tracing::{info, warn};

use super::{configured_provider, print_json, read_json};

/// Show the plan for moving `state` to `desired`. No connection is made.
pub fn plan(desired: &Path, state: Option<&Path>) -> Result<()> {
    let proposed = read_json(desired)?;
    let prior = state.map(read_json).transpose()?;

    let plan = ResourceRegistry::with_defaults().plan(ROLE_RESOURCE_TYPE, prior.as_ref(), proposed)?;
    print_json(&serde_json::to_value(&plan)?)
}

pub async fn create(config_path: Option<&Path>, desired: &Path) -> Result<()> {
    let provider = configured_provider(config_path).await?;
    let resource = provider.resource(ROLE_RESOURCE_TYPE)?;

    let planned = resource.plan(None, read_json(desired)?)?.planned_state;
    let state = resource.create(planned).await?;
    finish(&provider).await;
    print_json(&state)
}

/// Refresh state. Prints `null` when the role no longer exists. With a
/// desired file, drift is reported on stderr.
pub async fn read(config_path: Option<&Path>, state: &Path, desired: Option<&Path>) -> Result<()> {
    let desired = desired.map(read_json).transpose()?;
    let provider = configured_provider(config_path).await?;
    let resource = provider.resource(ROLE_RESOURCE_TYPE)?;

    let refreshed = resource.read(read_json(state)?).await?;
    finish(&provider).await;

    if let (Some(current), Some(desired)) = (&refreshed, desired) {
        report_drift(current, desired)?;
    }
    print_json(&refreshed.unwrap_or(Value::Null))
}

fn report_drift(current: &Value, desired: Value) -> Result<()> {
    let found = drift(current, desired)?;
    if found.is_empty() {
        info!("Role matches desired state");
        return Ok(());
    }
    if found.requires_replace {
        warn!("Role name differs from desired state; the role must be replaced");
    }
    for attribute in &found.changed {
        warn!("Role attribute drifted from desired state: {}", attribute);
    }
    Ok(())
}

pub async fn update(config_path: Option<&Path>, state: &Path, desired: &Path) -> Result<()> {
    let prior = read_json(state)?;
    let plan = ResourceRegistry::with_defaults().plan(ROLE_RESOURCE_TYPE, Some(&prior), read_json(desired)?)?;
    if plan.requires_replace() {
        bail!("the role name changed; delete and create the role instead");
    }
    if plan.changes.is_empty() {
        info!("No changes");
        return print_json(&prior);
    }

    let provider = configured_provider(config_path).await?;
    let resource = provider.resource(ROLE_RESOURCE_TYPE)?;
    let state = resource.update(prior, plan.planned_state).await?;
    finish(&provider).await;
    print_json(&state)
}

pub async fn delete(config_path: Option<&Path>, state: &Path) -> Result<()> {
    let provider = configured_provider(config_path).await?;
    let resource = provider.resource(ROLE_RESOURCE_TYPE)?;

    resource.delete(read_json(state)?).await?;
    finish(&provider).await;
    print_json(&Value::Null)
}

/// Import an existing role by name and print its full state
pub async fn import(config_path: Option<&Path>, name: &str) -> Result<()> {
    let provider = configured_provider(config_path).await?;
    let resource = provider.resource(ROLE_RESOURCE_TYPE)?;

    let key = resource.import(name)?;
    let state = resource.read(key).await?;
    finish(&provider).await;

    match state {
        Some(state) => print_json(&state),
        None => {
            warn!("Role {} does not exist", name);
            bail!("cannot import role {}: not found", name)
        }
    }
}

async fn finish(provider: &Provider) {
    if let Some(ctx) = provider.context() {
        ctx.pool().close().await;
    }
}
