//! PostgreSQL implementations

pub mod sql;
pub mod replace_store;
pub mod section_repo_impl;
pub mod service_definition_repo_impl;
pub mod service_transaction_repo_impl;

pub use replace_store::PgReplaceStore;
pub use section_repo_impl::PgSectionRepository;
pub use service_definition_repo_impl::PgServiceDefinitionRepository;
pub use service_transaction_repo_impl::PgServiceTransactionRepository;
