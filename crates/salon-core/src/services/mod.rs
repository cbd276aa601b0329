//! Domain services (business logic)

pub mod tenant_context;
pub mod section_service;
pub mod service_catalog_service;
pub mod appointment_service;

pub use tenant_context::TenantResolver;
pub use section_service::SectionService;
pub use service_catalog_service::ServiceCatalogService;
pub use appointment_service::AppointmentService;
