// ============================================================================
// Salon Core - Appointment Service
// File: crates/salon-core/src/services/appointment_service.rs
// ============================================================================
//! Service transactions: booking, status changes and rescheduling

use chrono::{DateTime, Utc};
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

use crate::domain::{AppointmentStatus, ServiceTransaction, ServiceTransactionDetail, ServiceTransactionDraft};
use crate::error::DomainError;
use crate::repositories::ServiceTransactionRepository;
use crate::services::TenantResolver;

pub struct AppointmentService<R: ServiceTransactionRepository> {
    repo: Arc<R>,
    tenants: TenantResolver,
}

impl<R: ServiceTransactionRepository> AppointmentService<R> {
    pub fn new(repo: Arc<R>, tenants: TenantResolver) -> Self {
        Self { repo, tenants }
    }

    pub async fn list(&self, salon_id: Option<i64>) -> Result<Vec<ServiceTransactionDetail>, DomainError> {
        let tenant = self.tenants.resolve(salon_id)?;
        self.repo.list(tenant).await
    }

    pub async fn get(&self, id: i64, salon_id: Option<i64>) -> Result<Option<ServiceTransactionDetail>, DomainError> {
        let tenant = self.tenants.resolve(salon_id)?;
        self.repo.find_by_id(id, tenant).await
    }

    pub async fn create(
        &self,
        salon_id: Option<i64>,
        draft: ServiceTransactionDraft,
    ) -> Result<ServiceTransaction, DomainError> {
        let tenant = self.tenants.resolve(salon_id)?;
        draft.validate()?;

        let transaction = self.repo.create(tenant, &draft).await?;
        info!(
            "Service transaction created: {} for definition {} with {} performers",
            transaction.id,
            transaction.service_definition_id,
            draft.performers.len()
        );
        Ok(transaction)
    }

    /// Replace the transaction and its performers; `None` when not found for the salon.
    pub async fn update(
        &self,
        id: i64,
        salon_id: Option<i64>,
        draft: ServiceTransactionDraft,
    ) -> Result<Option<ServiceTransaction>, DomainError> {
        let tenant = self.tenants.resolve(salon_id)?;
        draft.validate()?;

        let updated = self.repo.update(id, tenant, &draft).await?;
        if updated.is_none() {
            warn!("Service transaction {} not found for salon {}", id, tenant);
        }
        Ok(updated)
    }

    pub async fn delete(&self, id: i64, salon_id: Option<i64>) -> Result<bool, DomainError> {
        let tenant = self.tenants.resolve(salon_id)?;
        let deleted = self.repo.delete(id, tenant).await?;
        if deleted {
            info!("Service transaction deleted: {}", id);
        }
        Ok(deleted)
    }

    /// Partial update of status and cancel reason. A blank reason counts as absent.
    pub async fn update_appointment(
        &self,
        id: i64,
        salon_id: Option<i64>,
        status: Option<AppointmentStatus>,
        cancel_reason: Option<String>,
    ) -> Result<Option<ServiceTransaction>, DomainError> {
        let cancel_reason = cancel_reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        if status.is_none() && cancel_reason.is_none() {
            return Err(DomainError::NothingToUpdate);
        }
        let tenant = self.tenants.resolve(salon_id)?;

        let updated = self.repo.update_appointment(id, tenant, status, cancel_reason).await?;
        match &updated {
            Some(transaction) => info!("Appointment {} is now {}", id, transaction.status.as_str()),
            None => warn!("Appointment {} not found for salon {}", id, tenant),
        }
        Ok(updated)
    }

    pub async fn set_status(
        &self,
        id: i64,
        salon_id: Option<i64>,
        status: AppointmentStatus,
    ) -> Result<Option<ServiceTransaction>, DomainError> {
        self.update_appointment(id, salon_id, Some(status), None).await
    }

    pub async fn cancel(
        &self,
        id: i64,
        salon_id: Option<i64>,
        reason: Option<String>,
    ) -> Result<Option<ServiceTransaction>, DomainError> {
        self.update_appointment(id, salon_id, Some(AppointmentStatus::Cancelled), reason).await
    }

    pub async fn reschedule(
        &self,
        id: i64,
        salon_id: Option<i64>,
        service_timestamp: DateTime<Utc>,
    ) -> Result<Option<ServiceTransaction>, DomainError> {
        let tenant = self.tenants.resolve(salon_id)?;
        let updated = self.repo.reschedule(id, tenant, service_timestamp).await?;
        match &updated {
            Some(_) => info!("Service transaction {} moved to {}", id, service_timestamp),
            None => warn!("Service transaction {} not found for salon {}", id, tenant),
        }
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PerformerDraft, TenantId};
    use crate::repositories::MockServiceTransactionRepository;
    use fake::Fake;

    fn transaction(id: i64, tenant: TenantId, status: AppointmentStatus, reason: Option<String>) -> ServiceTransaction {
        ServiceTransaction {
            id,
            salon_id: tenant,
            service_definition_id: 4,
            created_by: None,
            appointment_date: None,
            appointment_time: None,
            customer_id: None,
            customer_note: None,
            status,
            cancel_reason: reason,
            service_timestamp: Utc::now(),
        }
    }

    fn service(repo: MockServiceTransactionRepository) -> AppointmentService<MockServiceTransactionRepository> {
        AppointmentService::new(Arc::new(repo), TenantResolver::strict())
    }

    #[tokio::test]
    async fn test_cancel_sets_status_and_reason() {
        let mut repo = MockServiceTransactionRepository::new();
        repo.expect_update_appointment()
            .withf(|id, tenant, status, reason| {
                *id == 7
                    && tenant.get() == 5
                    && *status == Some(AppointmentStatus::Cancelled)
                    && reason.as_deref() == Some("Client called")
            })
            .times(1)
            .returning(|id, tenant, status, reason| {
                Ok(Some(transaction(id, tenant, status.unwrap_or_default(), reason)))
            });

        let cancelled = service(repo)
            .cancel(7, Some(5), Some(" Client called ".into()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(cancelled.status, AppointmentStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_empty_appointment_update_is_rejected() {
        let mut repo = MockServiceTransactionRepository::new();
        repo.expect_update_appointment().never();

        let result = service(repo).update_appointment(7, Some(5), None, Some("   ".into())).await;
        assert!(matches!(result, Err(DomainError::NothingToUpdate)));
    }

    #[tokio::test]
    async fn test_create_validates_performers() {
        let mut repo = MockServiceTransactionRepository::new();
        repo.expect_create().never();

        let draft = ServiceTransactionDraft {
            service_definition_id: 4,
            performers: vec![PerformerDraft {
                role_id: 0,
                employee_id: None,
            }],
            ..Default::default()
        };

        let result = service(repo).create(Some(5), draft).await;
        assert!(matches!(result, Err(DomainError::ValidationError(_))));
    }

    #[tokio::test]
    async fn test_create_passes_tenant() {
        let employee_id: i64 = (1..500).fake();

        let mut repo = MockServiceTransactionRepository::new();
        repo.expect_create()
            .withf(move |tenant, draft| tenant.get() == 5 && draft.performers[0].employee_id == Some(employee_id))
            .times(1)
            .returning(|tenant, draft| Ok(transaction(1, tenant, draft.status, None)));

        let draft = ServiceTransactionDraft {
            service_definition_id: 4,
            performers: vec![PerformerDraft {
                role_id: 2,
                employee_id: Some(employee_id),
            }],
            ..Default::default()
        };

        let created = service(repo).create(Some(5), draft).await.unwrap();
        assert_eq!(created.status, AppointmentStatus::Pending);
    }

    #[tokio::test]
    async fn test_reschedule_not_found() {
        let mut repo = MockServiceTransactionRepository::new();
        repo.expect_reschedule().times(1).returning(|_, _, _| Ok(None));

        let moved = service(repo).reschedule(3, Some(6), Utc::now()).await.unwrap();
        assert!(moved.is_none());
    }
}
