//! Provider entry point: configuration and resource dispatch

use pgstate_db::{ConnectionContext, DatabaseConfig};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

use crate::config::ProviderConfig;
use crate::error::{ProviderError, Result};
use crate::registry::ResourceRegistry;
use crate::resource::Resource;
use crate::schema::{Attribute, AttributeType, Schema};

pub const PROVIDER_TYPE_NAME: &str = "postgresql";

#[derive(Debug, Clone, Serialize)]
pub struct ProviderMetadata {
    pub type_name: &'static str,
    pub version: String,
    pub resources: Vec<&'static str>,
}

pub struct Provider {
    version: String,
    registry: ResourceRegistry,
    context: Option<Arc<ConnectionContext>>,
}

impl Provider {
    /// `version` is the release version, or e.g. "dev" for local builds
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            registry: ResourceRegistry::with_defaults(),
            context: None,
        }
    }

    pub fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            type_name: PROVIDER_TYPE_NAME,
            version: self.version.clone(),
            resources: self.registry.type_names(),
        }
    }

    /// Provider configuration attributes
    pub fn schema() -> Schema {
        Schema::new("PostgreSQL provider")
            .with_attribute(
                Attribute::required("hostname", AttributeType::String)
                    .describe("The host name of the Postgres server."),
            )
            .with_attribute(
                Attribute::required("port", AttributeType::Int32)
                    .describe("The TCP port on which Postgres is listening for connections.")
                    .between(1, 65535),
            )
            .with_attribute(
                Attribute::optional("database_name", AttributeType::String)
                    .describe("The name of the database to connect to.")
                    .with_default("postgres"),
            )
            .with_attribute(
                Attribute::required("username", AttributeType::String)
                    .describe("The user used for connecting to Postgres."),
            )
            .with_attribute(
                Attribute::optional("password", AttributeType::String)
                    .describe("The password to use for authentication.")
                    .sensitive(),
            )
            .with_attribute(
                Attribute::optional("max_connections", AttributeType::Int32)
                    .describe("Maximum number of connections to establish to the database. Zero means the pool default.")
                    .at_least(0),
            )
    }

    /// Connect and detect the database dialect. Failure is fatal.
    pub async fn configure(&mut self, config: &ProviderConfig) -> Result<Arc<ConnectionContext>> {
        info!(
            "Configuring DB Connection Pool for {}:{}/{}",
            config.hostname,
            config.port,
            config.database_name()
        );
        self.configure_with(&config.database_config()?).await
    }

    pub async fn configure_with(&mut self, config: &DatabaseConfig) -> Result<Arc<ConnectionContext>> {
        let context = ConnectionContext::establish(config).await?;
        self.context = Some(context.clone());
        Ok(context)
    }

    pub fn context(&self) -> Option<&Arc<ConnectionContext>> {
        self.context.as_ref()
    }

    /// Instantiate a resource bound to the configured connection
    pub fn resource(&self, type_name: &str) -> Result<Box<dyn Resource>> {
        let context = self.context.clone().ok_or(ProviderError::NotConfigured)?;
        self.registry.instantiate(type_name, context)
    }
}
