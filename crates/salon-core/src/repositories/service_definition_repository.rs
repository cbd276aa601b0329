//! Service definition repository trait (port)

use async_trait::async_trait;
use crate::domain::{
    ServiceDefinition, ServiceDefinitionDetail, ServiceDefinitionDraft, ServiceMaterialSummary, ServiceRole,
    TenantId,
};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceDefinitionRepository: Send + Sync {
    async fn list(&self, tenant: TenantId) -> Result<Vec<ServiceDefinitionDetail>, DomainError>;
    async fn find_by_id(&self, id: i64, tenant: TenantId) -> Result<Option<ServiceDefinitionDetail>, DomainError>;
    async fn create(&self, tenant: TenantId, draft: &ServiceDefinitionDraft) -> Result<ServiceDefinition, DomainError>;
    /// `None` when no definition `(id, tenant)` exists.
    async fn update(
        &self,
        id: i64,
        tenant: TenantId,
        draft: &ServiceDefinitionDraft,
    ) -> Result<Option<ServiceDefinition>, DomainError>;
    async fn delete(&self, id: i64, tenant: TenantId) -> Result<bool, DomainError>;
    async fn list_roles(&self, tenant: TenantId) -> Result<Vec<ServiceRole>, DomainError>;
    async fn list_materials(&self, tenant: TenantId) -> Result<Vec<ServiceMaterialSummary>, DomainError>;
}
