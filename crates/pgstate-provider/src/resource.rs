//! The capability set every resource kind implements

use serde_json::Value;

use crate::error::Result;
use crate::schema::{PlanResult, Schema};

/// A managed resource kind.
///
/// State crosses this boundary as JSON objects shaped by [`Resource::schema`].
#[async_trait::async_trait]
pub trait Resource: Send + Sync {
    /// Registered type name, e.g. `postgresql_role`
    fn type_name(&self) -> &'static str;

    fn schema(&self) -> Schema;

    /// Compute the changes needed to move from `prior` to `proposed`
    fn plan(&self, prior: Option<&Value>, proposed: Value) -> Result<PlanResult> {
        self.schema().plan(prior, proposed)
    }

    /// Create the resource and return its state
    async fn create(&self, planned: Value) -> Result<Value>;

    /// Refresh state. `None` means the resource is gone and should be
    /// dropped from tracked state.
    async fn read(&self, current: Value) -> Result<Option<Value>>;

    /// Apply in-place changes and return the new state
    async fn update(&self, prior: Value, planned: Value) -> Result<Value>;

    async fn delete(&self, current: Value) -> Result<()>;

    /// Turn an import token into a partial state for a subsequent read.
    /// No external calls are made.
    fn import(&self, token: &str) -> Result<Value>;
}
