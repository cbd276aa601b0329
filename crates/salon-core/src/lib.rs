//! # Salon Core
//! 
//! Domain entities, the transactional replace-write protocol, repository
//! ports and services for salon service bookkeeping.

pub mod domain;
pub mod replace_write;
pub mod services;
pub mod repositories;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::DomainError;
