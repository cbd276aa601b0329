// ============================================================================
// Salon Infrastructure - PostgreSQL Service Definition Repository
// File: crates/salon-infrastructure/src/database/postgres/service_definition_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use std::sync::Arc;
use tracing::debug;

use salon_core::domain::{
    ServiceDefinition, ServiceDefinitionDetail, ServiceDefinitionDraft, ServiceMaterialSummary, ServiceRole,
    TenantId, SERVICE_DEFINITION_AGGREGATE,
};
use salon_core::error::DomainError;
use salon_core::replace_write::{decode_row, ReplaceWriter};
use salon_core::repositories::ServiceDefinitionRepository;

use super::replace_store::{database_error, PgReplaceStore};

pub struct PgServiceDefinitionRepository {
    pool: PgPool,
    writer: ReplaceWriter<PgReplaceStore>,
}

impl PgServiceDefinitionRepository {
    pub fn new(pool: PgPool) -> Self {
        let store = Arc::new(PgReplaceStore::new(pool.clone()));
        Self {
            pool,
            writer: ReplaceWriter::new(store, &SERVICE_DEFINITION_AGGREGATE),
        }
    }
}

// Internal row types for SQLx mapping
#[derive(Debug, FromRow)]
struct ServiceRoleRow {
    pub id: i64,
    pub service_definition_id: i64,
    pub salon_id: i64,
    pub role_name: String,
    pub earned_amount: i64,
}

impl TryFrom<ServiceRoleRow> for ServiceRole {
    type Error = DomainError;

    fn try_from(row: ServiceRoleRow) -> Result<Self, Self::Error> {
        Ok(ServiceRole {
            id: row.id,
            service_definition_id: row.service_definition_id,
            salon_id: TenantId::new(row.salon_id)?,
            role_name: row.role_name,
            earned_amount: row.earned_amount,
        })
    }
}

#[derive(Debug, FromRow)]
struct MaterialSummaryRow {
    pub id: i64,
    pub service_definition_id: i64,
    pub material_name: String,
    pub material_cost: i64,
    pub service_name: Option<String>,
}

impl From<MaterialSummaryRow> for ServiceMaterialSummary {
    fn from(row: MaterialSummaryRow) -> Self {
        ServiceMaterialSummary {
            id: row.id,
            service_definition_id: row.service_definition_id,
            material_name: row.material_name,
            material_cost: row.material_cost,
            service_name: row.service_name,
        }
    }
}

#[async_trait]
impl ServiceDefinitionRepository for PgServiceDefinitionRepository {
    async fn list(&self, tenant: TenantId) -> Result<Vec<ServiceDefinitionDetail>, DomainError> {
        let records = self.writer.list(tenant).await?;
        records.iter().map(ServiceDefinitionDetail::from_record).collect()
    }

    async fn find_by_id(&self, id: i64, tenant: TenantId) -> Result<Option<ServiceDefinitionDetail>, DomainError> {
        let record = self.writer.fetch(id, tenant).await?;
        record.as_ref().map(ServiceDefinitionDetail::from_record).transpose()
    }

    async fn create(&self, tenant: TenantId, draft: &ServiceDefinitionDraft) -> Result<ServiceDefinition, DomainError> {
        let row = self
            .writer
            .create(tenant, draft.parent_fields(), draft.child_rows())
            .await?;
        decode_row(row)
    }

    async fn update(
        &self,
        id: i64,
        tenant: TenantId,
        draft: &ServiceDefinitionDraft,
    ) -> Result<Option<ServiceDefinition>, DomainError> {
        let row = self
            .writer
            .update(id, tenant, draft.parent_fields(), draft.child_rows())
            .await?;
        row.map(decode_row).transpose()
    }

    async fn delete(&self, id: i64, tenant: TenantId) -> Result<bool, DomainError> {
        self.writer.delete(id, tenant).await
    }

    async fn list_roles(&self, tenant: TenantId) -> Result<Vec<ServiceRole>, DomainError> {
        let rows: Vec<ServiceRoleRow> = sqlx::query_as(
            r#"
            SELECT sr.id, sr.service_definition_id, sr.salon_id, sr.role_name, sr.earned_amount
            FROM service_roles sr
            JOIN service_definitions sd ON sd.id = sr.service_definition_id
            WHERE sd.salon_id = $1 AND sr.salon_id = $1
            ORDER BY sr.service_definition_id ASC, sr.id ASC
            "#,
        )
        .bind(tenant.get())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("listing service roles", e))?;

        debug!("Listed {} service roles for salon {}", rows.len(), tenant);
        rows.into_iter().map(ServiceRole::try_from).collect()
    }

    async fn list_materials(&self, tenant: TenantId) -> Result<Vec<ServiceMaterialSummary>, DomainError> {
        let rows: Vec<MaterialSummaryRow> = sqlx::query_as(
            r#"
            SELECT sm.id, sm.service_definition_id, sm.material_name, sm.material_cost, sd.service_name
            FROM service_materials sm
            JOIN service_definitions sd ON sd.id = sm.service_definition_id
            WHERE sd.salon_id = $1 AND sm.salon_id = $1
            ORDER BY sm.service_definition_id ASC, sm.id ASC
            "#,
        )
        .bind(tenant.get())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| database_error("listing service materials", e))?;

        debug!("Listed {} service materials for salon {}", rows.len(), tenant);
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
