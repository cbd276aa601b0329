// ============================================================================
// Salon Core - Service Catalog Service
// File: crates/salon-core/src/services/service_catalog_service.rs
// ============================================================================
//! Service definitions with their roles and materials

use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::domain::{
    ServiceDefinition, ServiceDefinitionDetail, ServiceDefinitionDraft, ServiceMaterialSummary, ServiceRole,
};
use crate::error::DomainError;
use crate::repositories::ServiceDefinitionRepository;
use crate::services::TenantResolver;

pub struct ServiceCatalogService<R: ServiceDefinitionRepository> {
    repo: Arc<R>,
    tenants: TenantResolver,
}

impl<R: ServiceDefinitionRepository> ServiceCatalogService<R> {
    pub fn new(repo: Arc<R>, tenants: TenantResolver) -> Self {
        Self { repo, tenants }
    }

    pub async fn list(&self, salon_id: Option<i64>) -> Result<Vec<ServiceDefinitionDetail>, DomainError> {
        let tenant = self.tenants.resolve(salon_id)?;
        self.repo.list(tenant).await
    }

    pub async fn get(&self, id: i64, salon_id: Option<i64>) -> Result<Option<ServiceDefinitionDetail>, DomainError> {
        let tenant = self.tenants.resolve(salon_id)?;
        self.repo.find_by_id(id, tenant).await
    }

    pub async fn create(
        &self,
        salon_id: Option<i64>,
        draft: ServiceDefinitionDraft,
    ) -> Result<ServiceDefinition, DomainError> {
        let tenant = self.tenants.resolve(salon_id)?;
        let draft = draft.normalized();
        draft.validate()?;

        let definition = self.repo.create(tenant, &draft).await?;
        info!(
            "Service definition created: {} ({}) with {} roles, {} materials",
            definition.service_name,
            definition.id,
            draft.roles.len(),
            draft.materials.len()
        );
        Ok(definition)
    }

    /// Replace the definition and both child sets; `None` when not found for the salon.
    pub async fn update(
        &self,
        id: i64,
        salon_id: Option<i64>,
        draft: ServiceDefinitionDraft,
    ) -> Result<Option<ServiceDefinition>, DomainError> {
        let tenant = self.tenants.resolve(salon_id)?;
        let draft = draft.normalized();
        draft.validate()?;

        let updated = self.repo.update(id, tenant, &draft).await?;
        match &updated {
            Some(definition) => info!("Service definition updated: {}", definition.id),
            None => warn!("Service definition {} not found for salon {}", id, tenant),
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: i64, salon_id: Option<i64>) -> Result<bool, DomainError> {
        let tenant = self.tenants.resolve(salon_id)?;
        let deleted = self.repo.delete(id, tenant).await?;
        if deleted {
            info!("Service definition deleted: {}", id);
        }
        Ok(deleted)
    }

    pub async fn list_roles(&self, salon_id: Option<i64>) -> Result<Vec<ServiceRole>, DomainError> {
        let tenant = self.tenants.resolve(salon_id)?;
        self.repo.list_roles(tenant).await
    }

    pub async fn list_materials(&self, salon_id: Option<i64>) -> Result<Vec<ServiceMaterialSummary>, DomainError> {
        let tenant = self.tenants.resolve(salon_id)?;
        self.repo.list_materials(tenant).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{RoleDraft, TenantId};
    use crate::repositories::MockServiceDefinitionRepository;
    use fake::faker::lorem::en::Word;
    use fake::Fake;

    fn definition(id: i64, tenant: TenantId, draft: &ServiceDefinitionDraft) -> ServiceDefinition {
        ServiceDefinition {
            id,
            salon_id: tenant,
            service_name: draft.service_name.clone(),
            service_amount: draft.service_amount.unwrap_or(0),
            salon_amount: draft.salon_amount.unwrap_or(0),
            section_id: draft.section_id,
            description: draft.description.clone(),
            image_url: draft.image_url.clone(),
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_trims_and_scopes_to_tenant() {
        let name: String = Word().fake();
        let expected = name.clone();

        let mut repo = MockServiceDefinitionRepository::new();
        repo.expect_create()
            .withf(move |tenant, draft| tenant.get() == 5 && draft.service_name == expected)
            .times(1)
            .returning(|tenant, draft| Ok(definition(1, tenant, draft)));

        let service = ServiceCatalogService::new(Arc::new(repo), TenantResolver::strict());
        let draft = ServiceDefinitionDraft {
            service_name: format!("  {}  ", name),
            roles: vec![RoleDraft {
                role_name: "Stylist".into(),
                earned_amount: None,
            }],
            ..Default::default()
        };

        let created = service.create(Some(5), draft).await.unwrap();
        assert_eq!(created.service_name, name);
        assert_eq!(created.salon_id.get(), 5);
    }

    #[tokio::test]
    async fn test_missing_tenant_never_reaches_repository() {
        let mut repo = MockServiceDefinitionRepository::new();
        repo.expect_create().never();
        repo.expect_delete().never();

        let service = ServiceCatalogService::new(Arc::new(repo), TenantResolver::strict());
        let draft = ServiceDefinitionDraft {
            service_name: "Haircut".into(),
            ..Default::default()
        };

        assert!(matches!(service.create(None, draft).await, Err(DomainError::MissingTenant)));
        assert!(matches!(service.delete(1, Some(0)).await, Err(DomainError::MissingTenant)));
    }

    #[tokio::test]
    async fn test_invalid_draft_is_rejected() {
        let mut repo = MockServiceDefinitionRepository::new();
        repo.expect_update().never();

        let service = ServiceCatalogService::new(Arc::new(repo), TenantResolver::strict());
        let result = service.update(1, Some(5), ServiceDefinitionDraft::default()).await;

        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_update_not_found_is_none() {
        let mut repo = MockServiceDefinitionRepository::new();
        repo.expect_update().times(1).returning(|_, _, _| Ok(None));

        let service = ServiceCatalogService::new(Arc::new(repo), TenantResolver::strict());
        let draft = ServiceDefinitionDraft {
            service_name: "Haircut".into(),
            ..Default::default()
        };

        assert!(service.update(99, Some(5), draft).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_listing_uses_fallback_tenant() {
        let mut repo = MockServiceDefinitionRepository::new();
        repo.expect_list_materials()
            .withf(|tenant| tenant.get() == 2)
            .times(1)
            .returning(|_| Ok(Vec::new()));

        let resolver = TenantResolver::new(Some(TenantId::new(2).unwrap()));
        let service = ServiceCatalogService::new(Arc::new(repo), resolver);

        assert!(service.list_materials(None).await.unwrap().is_empty());
    }
}
