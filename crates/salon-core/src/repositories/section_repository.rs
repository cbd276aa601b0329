//! Section repository trait (port)

use async_trait::async_trait;
use crate::domain::{Section, SectionDraft, TenantId};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SectionRepository: Send + Sync {
    async fn list(&self, tenant: TenantId) -> Result<Vec<Section>, DomainError>;
    async fn find_by_id(&self, id: i64, tenant: TenantId) -> Result<Option<Section>, DomainError>;
    async fn create(&self, tenant: TenantId, draft: &SectionDraft) -> Result<Section, DomainError>;
    async fn update(&self, id: i64, tenant: TenantId, draft: &SectionDraft) -> Result<Option<Section>, DomainError>;
    /// Definitions filed under the section keep existing with no section.
    async fn delete(&self, id: i64, tenant: TenantId) -> Result<bool, DomainError>;
}
