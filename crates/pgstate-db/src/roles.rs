//! Role reconciliation
//!
//! Every mutating operation runs in its own transaction on one pooled
//! connection. A failed statement is rolled back explicitly before the error
//! is returned; if that rollback fails too, both causes are reported.
//!
//! A failed commit leaves the outcome unknown: the role may exist even though
//! [`DbError::Commit`] was returned. Callers converge by reading again.

use pgstate_core::{ResourceKey, RoleActualState, RoleDesiredState};
use sqlx::postgres::types::Oid;
use sqlx::{Postgres, Transaction};
use std::sync::Arc;
use tracing::{debug, error, info};

use crate::context::ConnectionContext;
use crate::models::RoleRow;
use crate::statements::{self, SELECT_ROLE_BY_OID, SELECT_ROLE_OID};
use crate::{DbError, Result};

/// Applies desired role state to the database
#[derive(Clone)]
pub struct RoleReconciler {
    ctx: Arc<ConnectionContext>,
}

impl RoleReconciler {
    pub fn new(ctx: Arc<ConnectionContext>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &ConnectionContext {
        &self.ctx
    }

    /// `CREATE ROLE`, then read back the assigned oid in the same transaction.
    pub async fn create(&self, desired: &RoleDesiredState) -> Result<RoleActualState> {
        desired.validate()?;

        let mut tx = self.begin().await?;

        let sql = statements::create_role(desired);
        info!("{}", sql);

        let result = sqlx::query(&sql).persistent(false).execute(&mut *tx).await;
        if let Err(source) = result {
            let err = DbError::RoleCreation {
                statement: sql,
                source,
            };
            return Err(rollback(tx, err).await);
        }

        let lookup = sqlx::query_scalar::<_, Oid>(SELECT_ROLE_OID)
            .bind(&desired.name)
            .fetch_one(&mut *tx)
            .await;
        let oid = match lookup {
            Ok(oid) => oid,
            Err(source) => {
                let err = DbError::OidLookup {
                    statement: SELECT_ROLE_OID.to_string(),
                    source,
                };
                return Err(rollback(tx, err).await);
            }
        };

        commit(tx).await?;

        debug!("Successfully created role: {} (oid {})", desired.name, oid.0);

        Ok(RoleActualState::applied(i64::from(oid.0), desired))
    }

    /// Read a role by oid. `Ok(None)` means the role no longer exists.
    pub async fn read(&self, oid: i64) -> Result<Option<RoleActualState>> {
        let Ok(catalog_oid) = u32::try_from(oid) else {
            debug!("oid {} is outside the oid range, treating as not found", oid);
            return Ok(None);
        };

        let row = sqlx::query_as::<_, RoleRow>(SELECT_ROLE_BY_OID)
            .bind(Oid(catalog_oid))
            .fetch_optional(self.ctx.pool().pool())
            .await
            .map_err(|source| DbError::Read {
                statement: SELECT_ROLE_BY_OID.to_string(),
                source,
            })?;

        Ok(row.map(|row| row.into_actual(oid)))
    }

    /// `ALTER ROLE` to the desired attributes. The oid and name are unchanged.
    pub async fn update(&self, oid: i64, desired: &RoleDesiredState) -> Result<RoleActualState> {
        desired.validate()?;

        let mut tx = self.begin().await?;

        let sql = statements::alter_role(desired);
        info!("{}", sql);

        let result = sqlx::query(&sql).persistent(false).execute(&mut *tx).await;
        if let Err(source) = result {
            let err = DbError::RoleUpdate {
                statement: sql,
                source,
            };
            return Err(rollback(tx, err).await);
        }

        commit(tx).await?;

        debug!("Successfully altered role: {}", desired.name);

        Ok(RoleActualState::applied(oid, desired))
    }

    /// `DROP ROLE`. A role that is already gone is reported as an error.
    pub async fn delete(&self, name: &str) -> Result<()> {
        let mut tx = self.begin().await?;

        let sql = statements::drop_role(name);
        info!("{}", sql);

        let result = sqlx::query(&sql).persistent(false).execute(&mut *tx).await;
        if let Err(source) = result {
            let err = DbError::RoleDeletion {
                statement: sql,
                source,
            };
            return Err(rollback(tx, err).await);
        }

        commit(tx).await?;

        debug!("Successfully dropped role: {}", name);

        Ok(())
    }

    /// The import token is taken as the role name. No database access.
    pub fn import(&self, token: &str) -> ResourceKey {
        ResourceKey::from_import_token(token)
    }

    /// Find a role by name and read it, completing an import.
    pub async fn resolve(&self, name: &str) -> Result<Option<RoleActualState>> {
        let oid = sqlx::query_scalar::<_, Oid>(SELECT_ROLE_OID)
            .bind(name)
            .fetch_optional(self.ctx.pool().pool())
            .await
            .map_err(|source| DbError::OidLookup {
                statement: SELECT_ROLE_OID.to_string(),
                source,
            })?;

        match oid {
            Some(oid) => self.read(i64::from(oid.0)).await,
            None => Ok(None),
        }
    }

    async fn begin(&self) -> Result<Transaction<'static, Postgres>> {
        self.ctx.pool().pool().begin().await.map_err(DbError::Begin)
    }
}

async fn commit(tx: Transaction<'static, Postgres>) -> Result<()> {
    tx.commit().await.map_err(DbError::Commit)
}

async fn rollback(tx: Transaction<'static, Postgres>, primary: DbError) -> DbError {
    match tx.rollback().await {
        Ok(()) => primary,
        Err(source) => {
            error!("Unable to rollback transaction: {}", source);
            DbError::Rollback {
                primary: Box::new(primary),
                source,
            }
        }
    }
}
