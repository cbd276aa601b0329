//! Repository traits (ports)

pub mod section_repository;
pub mod service_definition_repository;
pub mod service_transaction_repository;

pub use section_repository::SectionRepository;
pub use service_definition_repository::ServiceDefinitionRepository;
pub use service_transaction_repository::ServiceTransactionRepository;

#[cfg(test)]
pub use section_repository::MockSectionRepository;
#[cfg(test)]
pub use service_definition_repository::MockServiceDefinitionRepository;
#[cfg(test)]
pub use service_transaction_repository::MockServiceTransactionRepository;
