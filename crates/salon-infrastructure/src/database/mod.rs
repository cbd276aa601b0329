//! Database module (PostgreSQL adapters)

pub mod connection;
pub mod migrations;
pub mod postgres;

pub use connection::create_pool;
pub use migrations::run_migrations;
pub use postgres::{PgReplaceStore, PgSectionRepository, PgServiceDefinitionRepository, PgServiceTransactionRepository};
