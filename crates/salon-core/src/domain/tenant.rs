//! Tenant ("salon") identity

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Identifier partitioning every row by salon.
///
/// Always positive: `0` and negative ids are treated as a missing tenant
/// context and cannot be constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct TenantId(i64);

impl TenantId {
    pub fn new(raw: i64) -> Result<Self, DomainError> {
        if raw <= 0 {
            return Err(DomainError::MissingTenant);
        }
        Ok(Self(raw))
    }

    pub fn get(self) -> i64 {
        self.0
    }
}

impl TryFrom<i64> for TenantId {
    type Error = DomainError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        TenantId::new(raw)
    }
}

impl TryFrom<Option<i64>> for TenantId {
    type Error = DomainError;

    fn try_from(raw: Option<i64>) -> Result<Self, Self::Error> {
        raw.ok_or(DomainError::MissingTenant).and_then(TenantId::new)
    }
}

impl From<TenantId> for i64 {
    fn from(tenant: TenantId) -> Self {
        tenant.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
