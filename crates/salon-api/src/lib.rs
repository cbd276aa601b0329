//! # Salon API
//! 
//! Translation of service outcomes into HTTP status codes and the JSON
//! response envelope. Route wiring lives with the embedding application.

pub mod error;
pub mod response;

pub use error::ApiError;
pub use response::{created, deleted, found, ok, ApiResponse, ApiResult};
