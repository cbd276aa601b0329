// ============================================================================
// Salon Infrastructure - PostgreSQL Replace-Write Store
// File: crates/salon-infrastructure/src/database/postgres/replace_store.rs
// ============================================================================

use async_trait::async_trait;
use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::Query;
use sqlx::types::Json;
use sqlx::{PgPool, Postgres, Row as _, Transaction};
use tracing::{error, warn};

use salon_core::domain::TenantId;
use salon_core::error::DomainError;
use salon_core::replace_write::{ChildSpec, Field, ParentSpec, ReplaceStore, ReplaceTx, Row, SqlValue};

use super::sql;

type PgQuery<'q> = Query<'q, Postgres, PgArguments>;

const FOREIGN_KEY_VIOLATION: &str = "23503";

pub(crate) fn database_error(action: &str, e: sqlx::Error) -> DomainError {
    let code = e.as_database_error().and_then(|db| db.code()).map(|code| code.into_owned());
    if let Some(rejected) = constraint_error(code.as_deref(), action) {
        warn!("Rejected {}: {}", action, e);
        return rejected;
    }
    error!("Database error {}: {}", action, e);
    DomainError::DatabaseError(e.to_string())
}

/// A reference to a row the salon does not have is the caller's mistake, not a storage failure.
fn constraint_error(code: Option<&str>, action: &str) -> Option<DomainError> {
    match code {
        Some(FOREIGN_KEY_VIOLATION) => Some(DomainError::ValidationError(format!(
            "{} refers to a record that does not exist",
            action
        ))),
        _ => None,
    }
}

fn bind_value<'q>(query: PgQuery<'q>, value: &SqlValue) -> PgQuery<'q> {
    match value {
        SqlValue::BigInt(v) => query.bind(*v),
        SqlValue::Text(v) => query.bind(v.clone()),
        SqlValue::Date(v) => query.bind(*v),
        SqlValue::Time(v) => query.bind(*v),
        SqlValue::Timestamp(v) => query.bind(*v),
    }
}

fn bind_fields<'q>(query: PgQuery<'q>, fields: &[Field]) -> PgQuery<'q> {
    fields.iter().fold(query, |q, field| bind_value(q, &field.value))
}

pub(crate) fn json_row(row: &PgRow) -> Result<Row, DomainError> {
    row.try_get::<Json<Row>, _>(0)
        .map(|Json(object)| object)
        .map_err(|e| DomainError::RowDecodeError(e.to_string()))
}

/// [`ReplaceStore`] over a PostgreSQL pool; one pooled connection per transaction.
#[derive(Clone)]
pub struct PgReplaceStore {
    pool: PgPool,
}

impl PgReplaceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

pub struct PgReplaceTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl ReplaceStore for PgReplaceStore {
    type Tx = PgReplaceTx;

    async fn begin(&self) -> Result<Self::Tx, DomainError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| database_error("opening transaction", e))?;
        Ok(PgReplaceTx { tx })
    }

    async fn fetch_parent(&self, parent: &ParentSpec, id: i64, tenant: TenantId) -> Result<Option<Row>, DomainError> {
        let statement = sql::select_parent(parent);
        let row = sqlx::query(&statement)
            .bind(id)
            .bind(tenant.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("fetching parent", e))?;

        row.as_ref().map(json_row).transpose()
    }

    async fn list_parents(&self, parent: &ParentSpec, tenant: TenantId) -> Result<Vec<Row>, DomainError> {
        let statement = sql::list_parents(parent);
        let rows = sqlx::query(&statement)
            .bind(tenant.get())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| database_error("listing parents", e))?;

        rows.iter().map(json_row).collect()
    }

    async fn fetch_children(
        &self,
        child: &ChildSpec,
        parent_ids: &[i64],
        tenant: TenantId,
    ) -> Result<Vec<Row>, DomainError> {
        let statement = sql::select_children(child);
        let rows = sqlx::query(&statement)
            .bind(parent_ids.to_vec())
            .bind(tenant.get())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| database_error("fetching children", e))?;

        rows.iter().map(json_row).collect()
    }
}

#[async_trait]
impl ReplaceTx for PgReplaceTx {
    async fn insert_parent(&mut self, parent: &ParentSpec, tenant: TenantId, fields: &[Field]) -> Result<Row, DomainError> {
        let statement = sql::insert_parent(parent, fields);
        let query = bind_fields(sqlx::query(&statement).bind(tenant.get()), fields);
        let row = query
            .fetch_one(&mut *self.tx)
            .await
            .map_err(|e| database_error("inserting parent", e))?;

        json_row(&row)
    }

    async fn update_parent(
        &mut self,
        parent: &ParentSpec,
        id: i64,
        tenant: TenantId,
        fields: &[Field],
    ) -> Result<Option<Row>, DomainError> {
        let statement = sql::update_parent(parent, fields);
        let query = bind_fields(sqlx::query(&statement), fields).bind(id).bind(tenant.get());
        let row = query
            .fetch_optional(&mut *self.tx)
            .await
            .map_err(|e| database_error("updating parent", e))?;

        row.as_ref().map(json_row).transpose()
    }

    async fn delete_children(&mut self, child: &ChildSpec, parent_id: i64, tenant: TenantId) -> Result<u64, DomainError> {
        let statement = sql::delete_children(child);
        let result = sqlx::query(&statement)
            .bind(parent_id)
            .bind(tenant.get())
            .execute(&mut *self.tx)
            .await
            .map_err(|e| database_error("deleting children", e))?;

        Ok(result.rows_affected())
    }

    async fn delete_children_of_parent(
        &mut self,
        parent: &ParentSpec,
        child: &ChildSpec,
        parent_id: i64,
        tenant: TenantId,
    ) -> Result<u64, DomainError> {
        let statement = sql::delete_children_of_parent(parent, child);
        let result = sqlx::query(&statement)
            .bind(parent_id)
            .bind(tenant.get())
            .execute(&mut *self.tx)
            .await
            .map_err(|e| database_error("deleting children of parent", e))?;

        Ok(result.rows_affected())
    }

    async fn insert_child(
        &mut self,
        child: &ChildSpec,
        parent_id: i64,
        tenant: TenantId,
        fields: &[Field],
    ) -> Result<(), DomainError> {
        let statement = sql::insert_child(child, fields);
        let query = bind_fields(sqlx::query(&statement).bind(parent_id).bind(tenant.get()), fields);
        query
            .execute(&mut *self.tx)
            .await
            .map_err(|e| database_error("inserting child", e))?;

        Ok(())
    }

    async fn delete_parent(&mut self, parent: &ParentSpec, id: i64, tenant: TenantId) -> Result<bool, DomainError> {
        let statement = sql::delete_parent(parent);
        let result = sqlx::query(&statement)
            .bind(id)
            .bind(tenant.get())
            .execute(&mut *self.tx)
            .await
            .map_err(|e| database_error("deleting parent", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn commit(self) -> Result<(), DomainError> {
        self.tx
            .commit()
            .await
            .map_err(|e| database_error("committing transaction", e))
    }

    async fn rollback(self) -> Result<(), DomainError> {
        self.tx
            .rollback()
            .await
            .map_err(|e| database_error("rolling back transaction", e))
    }
}
