// ============================================================================
// Salon Core - Section Service
// File: crates/salon-core/src/services/section_service.rs
// ============================================================================
//! Sections grouping a salon's service definitions

use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::domain::{Section, SectionDraft};
use crate::error::DomainError;
use crate::repositories::SectionRepository;
use crate::services::TenantResolver;

pub struct SectionService<R: SectionRepository> {
    repo: Arc<R>,
    tenants: TenantResolver,
}

impl<R: SectionRepository> SectionService<R> {
    pub fn new(repo: Arc<R>, tenants: TenantResolver) -> Self {
        Self { repo, tenants }
    }

    /// Sections of the salon in creation order.
    pub async fn list(&self, salon_id: Option<i64>) -> Result<Vec<Section>, DomainError> {
        let tenant = self.tenants.resolve(salon_id)?;
        self.repo.list(tenant).await
    }

    pub async fn get(&self, id: i64, salon_id: Option<i64>) -> Result<Option<Section>, DomainError> {
        let tenant = self.tenants.resolve(salon_id)?;
        self.repo.find_by_id(id, tenant).await
    }

    pub async fn create(&self, salon_id: Option<i64>, draft: SectionDraft) -> Result<Section, DomainError> {
        let tenant = self.tenants.resolve(salon_id)?;
        let draft = draft.normalized();
        draft.validate()?;

        let section = self.repo.create(tenant, &draft).await?;
        info!("Section created: {} ({}) for salon {}", section.section_name, section.id, tenant);
        Ok(section)
    }

    pub async fn update(
        &self,
        id: i64,
        salon_id: Option<i64>,
        draft: SectionDraft,
    ) -> Result<Option<Section>, DomainError> {
        let tenant = self.tenants.resolve(salon_id)?;
        let draft = draft.normalized();
        draft.validate()?;

        let updated = self.repo.update(id, tenant, &draft).await?;
        match &updated {
            Some(section) => info!("Section updated: {}", section.id),
            None => warn!("Section {} not found for salon {}", id, tenant),
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: i64, salon_id: Option<i64>) -> Result<bool, DomainError> {
        let tenant = self.tenants.resolve(salon_id)?;
        let deleted = self.repo.delete(id, tenant).await?;
        if deleted {
            info!("Section deleted: {}", id);
        } else {
            warn!("Section {} not found for salon {}", id, tenant);
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TenantId;
    use crate::repositories::MockSectionRepository;
    use fake::faker::lorem::en::Word;
    use fake::Fake;

    fn section(id: i64, tenant: TenantId, draft: &SectionDraft) -> Section {
        Section {
            id,
            salon_id: tenant,
            section_name: draft.section_name.clone(),
            created_at: None,
        }
    }

    #[tokio::test]
    async fn test_create_trims_name_and_scopes_to_tenant() {
        let name: String = Word().fake();
        let expected = name.clone();

        let mut repo = MockSectionRepository::new();
        repo.expect_create()
            .withf(move |tenant, draft| tenant.get() == 5 && draft.section_name == expected)
            .times(1)
            .returning(|tenant, draft| Ok(section(1, tenant, draft)));

        let service = SectionService::new(Arc::new(repo), TenantResolver::strict());
        let created = service
            .create(
                Some(5),
                SectionDraft {
                    section_name: format!(" {} ", name),
                },
            )
            .await
            .unwrap();

        assert_eq!(created.section_name, name);
        assert_eq!(created.salon_id.get(), 5);
    }

    #[tokio::test]
    async fn test_blank_name_never_reaches_repository() {
        let mut repo = MockSectionRepository::new();
        repo.expect_create().never();
        repo.expect_update().never();

        let service = SectionService::new(Arc::new(repo), TenantResolver::strict());
        let blank = SectionDraft {
            section_name: "  ".into(),
        };

        assert!(matches!(
            service.create(Some(5), blank.clone()).await,
            Err(DomainError::ValidationError(_))
        ));
        assert!(matches!(
            service.update(1, Some(5), blank).await,
            Err(DomainError::ValidationError(_))
        ));
    }

    #[tokio::test]
    async fn test_missing_tenant_is_rejected() {
        let mut repo = MockSectionRepository::new();
        repo.expect_list().never();
        repo.expect_delete().never();

        let service = SectionService::new(Arc::new(repo), TenantResolver::strict());

        assert!(matches!(service.list(None).await, Err(DomainError::MissingTenant)));
        assert!(matches!(service.delete(1, Some(0)).await, Err(DomainError::MissingTenant)));
    }

    #[tokio::test]
    async fn test_other_salons_section_is_not_found() {
        let mut repo = MockSectionRepository::new();
        repo.expect_find_by_id()
            .withf(|id, tenant| *id == 3 && tenant.get() == 6)
            .times(1)
            .returning(|_, _| Ok(None));
        repo.expect_delete().times(1).returning(|_, _| Ok(false));

        let service = SectionService::new(Arc::new(repo), TenantResolver::strict());

        assert!(service.get(3, Some(6)).await.unwrap().is_none());
        assert!(!service.delete(3, Some(6)).await.unwrap());
    }
}
