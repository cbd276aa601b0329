//! Store ports used by the replace-write protocol

use async_trait::async_trait;

use super::spec::{ChildSpec, ParentSpec};
use super::value::{Field, Row};
use crate::domain::TenantId;
use crate::error::DomainError;

/// Access to a relational store that can open transactions.
#[async_trait]
pub trait ReplaceStore: Send + Sync {
    type Tx: ReplaceTx;

    /// Open a transaction bound to a single connection.
    async fn begin(&self) -> Result<Self::Tx, DomainError>;

    async fn fetch_parent(&self, parent: &ParentSpec, id: i64, tenant: TenantId) -> Result<Option<Row>, DomainError>;

    /// Every parent of the tenant, highest id first.
    async fn list_parents(&self, parent: &ParentSpec, tenant: TenantId) -> Result<Vec<Row>, DomainError>;

    /// Child rows of the given parents, ordered by parent then child id.
    async fn fetch_children(
        &self,
        child: &ChildSpec,
        parent_ids: &[i64],
        tenant: TenantId,
    ) -> Result<Vec<Row>, DomainError>;
}

/// Statements executed inside one open transaction.
#[async_trait]
pub trait ReplaceTx: Send {
    /// Insert the parent stamped with `tenant` and return the stored row.
    async fn insert_parent(&mut self, parent: &ParentSpec, tenant: TenantId, fields: &[Field]) -> Result<Row, DomainError>;

    /// Update the parent matching `(id, tenant)`; `None` when no row matched.
    async fn update_parent(
        &mut self,
        parent: &ParentSpec,
        id: i64,
        tenant: TenantId,
        fields: &[Field],
    ) -> Result<Option<Row>, DomainError>;

    /// Delete child rows matching `(parent_id, tenant)` on the child table itself.
    async fn delete_children(&mut self, child: &ChildSpec, parent_id: i64, tenant: TenantId) -> Result<u64, DomainError>;

    /// Delete child rows by joining to the parent matching `(parent_id, tenant)`.
    async fn delete_children_of_parent(
        &mut self,
        parent: &ParentSpec,
        child: &ChildSpec,
        parent_id: i64,
        tenant: TenantId,
    ) -> Result<u64, DomainError>;

    async fn insert_child(
        &mut self,
        child: &ChildSpec,
        parent_id: i64,
        tenant: TenantId,
        fields: &[Field],
    ) -> Result<(), DomainError>;

    /// Delete the parent matching `(id, tenant)`; `true` when a row was removed.
    async fn delete_parent(&mut self, parent: &ParentSpec, id: i64, tenant: TenantId) -> Result<bool, DomainError>;

    async fn commit(self) -> Result<(), DomainError>;

    async fn rollback(self) -> Result<(), DomainError>;
}
