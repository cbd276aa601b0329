//! Service transaction repository trait (port)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use crate::domain::{
    AppointmentStatus, ServiceTransaction, ServiceTransactionDetail, ServiceTransactionDraft, TenantId,
};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceTransactionRepository: Send + Sync {
    async fn list(&self, tenant: TenantId) -> Result<Vec<ServiceTransactionDetail>, DomainError>;
    async fn find_by_id(&self, id: i64, tenant: TenantId) -> Result<Option<ServiceTransactionDetail>, DomainError>;
    async fn create(&self, tenant: TenantId, draft: &ServiceTransactionDraft) -> Result<ServiceTransaction, DomainError>;
    async fn update(
        &self,
        id: i64,
        tenant: TenantId,
        draft: &ServiceTransactionDraft,
    ) -> Result<Option<ServiceTransaction>, DomainError>;
    async fn delete(&self, id: i64, tenant: TenantId) -> Result<bool, DomainError>;

    /// Set status and/or cancel reason, keeping the stored value of an absent argument.
    async fn update_appointment(
        &self,
        id: i64,
        tenant: TenantId,
        status: Option<AppointmentStatus>,
        cancel_reason: Option<String>,
    ) -> Result<Option<ServiceTransaction>, DomainError>;

    async fn reschedule(
        &self,
        id: i64,
        tenant: TenantId,
        service_timestamp: DateTime<Utc>,
    ) -> Result<Option<ServiceTransaction>, DomainError>;
}
