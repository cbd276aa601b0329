// ============================================================================
// Salon Infrastructure - PostgreSQL Service Transaction Repository
// File: crates/salon-infrastructure/src/database/postgres/service_transaction_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use std::sync::Arc;

use salon_core::domain::{
    AppointmentStatus, ServiceTransaction, ServiceTransactionDetail, ServiceTransactionDraft, TenantId,
    SERVICE_TRANSACTION_AGGREGATE,
};
use salon_core::error::DomainError;
use salon_core::replace_write::{decode_row, ReplaceWriter};
use salon_core::repositories::ServiceTransactionRepository;

use super::replace_store::{database_error, json_row, PgReplaceStore};

const UPDATE_APPOINTMENT: &str = r#"
    UPDATE service_transactions AS t
    SET status = COALESCE($1, t.status), cancel_reason = COALESCE($2, t.cancel_reason)
    WHERE t.id = $3 AND t.salon_id = $4
    RETURNING to_jsonb(t)
"#;

const RESCHEDULE: &str = r#"
    UPDATE service_transactions AS t
    SET service_timestamp = $1
    WHERE t.id = $2 AND t.salon_id = $3
    RETURNING to_jsonb(t)
"#;

pub struct PgServiceTransactionRepository {
    pool: PgPool,
    writer: ReplaceWriter<PgReplaceStore>,
}

impl PgServiceTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        let store = Arc::new(PgReplaceStore::new(pool.clone()));
        Self {
            pool,
            writer: ReplaceWriter::new(store, &SERVICE_TRANSACTION_AGGREGATE),
        }
    }
}

#[async_trait]
impl ServiceTransactionRepository for PgServiceTransactionRepository {
    async fn list(&self, tenant: TenantId) -> Result<Vec<ServiceTransactionDetail>, DomainError> {
        let records = self.writer.list(tenant).await?;
        records.iter().map(ServiceTransactionDetail::from_record).collect()
    }

    async fn find_by_id(&self, id: i64, tenant: TenantId) -> Result<Option<ServiceTransactionDetail>, DomainError> {
        let record = self.writer.fetch(id, tenant).await?;
        record.as_ref().map(ServiceTransactionDetail::from_record).transpose()
    }

    async fn create(&self, tenant: TenantId, draft: &ServiceTransactionDraft) -> Result<ServiceTransaction, DomainError> {
        let row = self
            .writer
            .create(tenant, draft.insert_fields(), draft.child_rows())
            .await?;
        decode_row(row)
    }

    async fn update(
        &self,
        id: i64,
        tenant: TenantId,
        draft: &ServiceTransactionDraft,
    ) -> Result<Option<ServiceTransaction>, DomainError> {
        let row = self
            .writer
            .update(id, tenant, draft.update_fields(), draft.child_rows())
            .await?;
        row.map(decode_row).transpose()
    }

    async fn delete(&self, id: i64, tenant: TenantId) -> Result<bool, DomainError> {
        self.writer.delete(id, tenant).await
    }

    async fn update_appointment(
        &self,
        id: i64,
        tenant: TenantId,
        status: Option<AppointmentStatus>,
        cancel_reason: Option<String>,
    ) -> Result<Option<ServiceTransaction>, DomainError> {
        if status.is_none() && cancel_reason.is_none() {
            return Err(DomainError::NothingToUpdate);
        }

        let row = sqlx::query(UPDATE_APPOINTMENT)
            .bind(status.map(|s| s.as_str()))
            .bind(cancel_reason)
            .bind(id)
            .bind(tenant.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("updating appointment", e))?;

        row.as_ref().map(json_row).transpose()?.map(decode_row).transpose()
    }

    async fn reschedule(
        &self,
        id: i64,
        tenant: TenantId,
        service_timestamp: DateTime<Utc>,
    ) -> Result<Option<ServiceTransaction>, DomainError> {
        let row = sqlx::query(RESCHEDULE)
            .bind(service_timestamp)
            .bind(id)
            .bind(tenant.get())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| database_error("rescheduling service transaction", e))?;

        row.as_ref().map(json_row).transpose()?.map(decode_row).transpose()
    }
}
