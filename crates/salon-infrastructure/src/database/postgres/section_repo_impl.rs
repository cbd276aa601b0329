// ============================================================================
// Salon Infrastructure - PostgreSQL Section Repository
// File: crates/salon-infrastructure/src/database/postgres/section_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use sqlx::PgPool;
use std::sync::Arc;

use salon_core::domain::{Section, SectionDraft, TenantId, SECTION_AGGREGATE};
use salon_core::error::DomainError;
use salon_core::replace_write::{decode_row, ReplaceWriter};
use salon_core::repositories::SectionRepository;

use super::replace_store::PgReplaceStore;

pub struct PgSectionRepository {
    writer: ReplaceWriter<PgReplaceStore>,
}

impl PgSectionRepository {
    pub fn new(pool: PgPool) -> Self {
        let store = Arc::new(PgReplaceStore::new(pool));
        Self {
            writer: ReplaceWriter::new(store, &SECTION_AGGREGATE),
        }
    }
}

#[async_trait]
impl SectionRepository for PgSectionRepository {
    async fn list(&self, tenant: TenantId) -> Result<Vec<Section>, DomainError> {
        let records = self.writer.list(tenant).await?;
        records.iter().map(|record| record.decode_parent::<Section>()).collect()
    }

    async fn find_by_id(&self, id: i64, tenant: TenantId) -> Result<Option<Section>, DomainError> {
        let record = self.writer.fetch(id, tenant).await?;
        record.map(|record| record.decode_parent::<Section>()).transpose()
    }

    async fn create(&self, tenant: TenantId, draft: &SectionDraft) -> Result<Section, DomainError> {
        let row = self.writer.create(tenant, draft.fields(), Vec::new()).await?;
        decode_row(row)
    }

    async fn update(&self, id: i64, tenant: TenantId, draft: &SectionDraft) -> Result<Option<Section>, DomainError> {
        let row = self.writer.update(id, tenant, draft.fields(), Vec::new()).await?;
        row.map(decode_row).transpose()
    }

    async fn delete(&self, id: i64, tenant: TenantId) -> Result<bool, DomainError> {
        self.writer.delete(id, tenant).await
    }
}
