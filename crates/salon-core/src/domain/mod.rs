//! # Salon Core - Domain Module
//! 
//! Domain entities for salon service bookkeeping.

pub mod tenant;
pub mod section;
pub mod service_definition;
pub mod service_transaction;

// Re-export all entities and enums
pub use tenant::TenantId;
pub use section::{Section, SectionDraft, SECTION_AGGREGATE};
pub use service_definition::{
    MaterialDraft, RoleDraft, ServiceDefinition, ServiceDefinitionDetail, ServiceDefinitionDraft,
    ServiceMaterial, ServiceMaterialSummary, ServiceRole, SERVICE_DEFINITION_AGGREGATE,
};
pub use service_transaction::{
    AppointmentStatus, PerformerDraft, ServicePerformer, ServiceTransaction, ServiceTransactionDetail,
    ServiceTransactionDraft, SERVICE_TRANSACTION_AGGREGATE,
};
