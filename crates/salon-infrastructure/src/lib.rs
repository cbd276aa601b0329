//! # Salon Infrastructure
//! 
//! Database and cache implementations (adapters).

pub mod database;
pub mod cache;

pub use database::{
    create_pool, run_migrations, PgReplaceStore, PgSectionRepository, PgServiceDefinitionRepository, PgServiceTransactionRepository,
};
pub use cache::{cache_key, RedisCache};
