// ============================================================================
// Salon Core - Replace-Write Engine
// File: crates/salon-core/src/replace_write/writer.rs
// ============================================================================
//! Create, replace and delete an aggregate inside one transaction.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use super::spec::AggregateSpec;
use super::store::{ReplaceStore, ReplaceTx};
use super::value::{row_i64, AggregateRecord, ChildRows, Field, Row, SqlValue};
use crate::domain::TenantId;
use crate::error::DomainError;

/// Child rows resolved against the aggregate, one entry per child set in declaration order.
type ChildSets = Vec<Vec<Vec<Field>>>;

/// Transactional replace-write of one aggregate kind.
///
/// Every statement of a call runs in the same transaction. A failing
/// statement rolls the transaction back before the error is returned, so an
/// `Err` never leaves a partial parent/children state behind.
pub struct ReplaceWriter<S: ReplaceStore> {
    store: Arc<S>,
    spec: &'static AggregateSpec,
}

impl<S: ReplaceStore> Clone for ReplaceWriter<S> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            spec: self.spec,
        }
    }
}

impl<S: ReplaceStore> ReplaceWriter<S> {
    pub fn new(store: Arc<S>, spec: &'static AggregateSpec) -> Self {
        Self { store, spec }
    }

    pub fn spec(&self) -> &'static AggregateSpec {
        self.spec
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Insert the parent and all child rows; returns the parent row only.
    pub async fn create(
        &self,
        tenant: TenantId,
        fields: Vec<Field>,
        children: Vec<ChildRows>,
    ) -> Result<Row, DomainError> {
        let fields = self.parent_fields(fields)?;
        let children = self.child_sets(children)?;
        debug!(aggregate = self.spec.name, %tenant, "Creating aggregate");

        let mut tx = self.store.begin().await?;
        let result = self.create_in(&mut tx, tenant, &fields, &children).await;
        let row = self.finish(tx, result).await?;

        info!(
            aggregate = self.spec.name,
            %tenant,
            id = row_i64(&row, self.spec.parent.id_column),
            "Aggregate created"
        );
        Ok(row)
    }

    /// Update the parent and replace every child set.
    ///
    /// A child set missing from `children` is replaced by nothing. `Ok(None)`
    /// means no parent `(id, tenant)` exists; nothing was changed.
    pub async fn update(
        &self,
        id: i64,
        tenant: TenantId,
        fields: Vec<Field>,
        children: Vec<ChildRows>,
    ) -> Result<Option<Row>, DomainError> {
        let fields = self.parent_fields(fields)?;
        let children = self.child_sets(children)?;
        debug!(aggregate = self.spec.name, id, %tenant, "Replacing aggregate");

        let mut tx = self.store.begin().await?;
        let updated = match tx.update_parent(&self.spec.parent, id, tenant, &fields).await {
            Ok(updated) => updated,
            Err(e) => {
                self.abort(tx).await;
                return Err(e);
            }
        };

        let Some(row) = updated else {
            self.abort(tx).await;
            warn!(aggregate = self.spec.name, id, %tenant, "Update target not found for tenant");
            return Ok(None);
        };

        let result = self.replace_children(&mut tx, id, tenant, &children).await;
        self.finish(tx, result).await?;

        info!(aggregate = self.spec.name, id, %tenant, "Aggregate replaced");
        Ok(Some(row))
    }

    /// Delete the children and then the parent; `false` when nothing matched `(id, tenant)`.
    pub async fn delete(&self, id: i64, tenant: TenantId) -> Result<bool, DomainError> {
        let mut tx = self.store.begin().await?;
        let result = self.delete_in(&mut tx, id, tenant).await;
        let deleted = self.finish(tx, result).await?;

        if deleted {
            info!(aggregate = self.spec.name, id, %tenant, "Aggregate deleted");
        } else {
            warn!(aggregate = self.spec.name, id, %tenant, "Delete target not found for tenant");
        }
        Ok(deleted)
    }

    /// Parent with every child set attached.
    pub async fn fetch(&self, id: i64, tenant: TenantId) -> Result<Option<AggregateRecord>, DomainError> {
        let Some(parent) = self.store.fetch_parent(&self.spec.parent, id, tenant).await? else {
            return Ok(None);
        };
        let mut records = self.attach_children(vec![parent], tenant).await?;
        Ok(records.pop())
    }

    /// All aggregates of the tenant in the parent's list order.
    pub async fn list(&self, tenant: TenantId) -> Result<Vec<AggregateRecord>, DomainError> {
        let parents = self.store.list_parents(&self.spec.parent, tenant).await?;
        debug!(aggregate = self.spec.name, %tenant, count = parents.len(), "Listed aggregates");
        self.attach_children(parents, tenant).await
    }

    async fn create_in(
        &self,
        tx: &mut S::Tx,
        tenant: TenantId,
        fields: &[Field],
        children: &ChildSets,
    ) -> Result<Row, DomainError> {
        let parent = tx.insert_parent(&self.spec.parent, tenant, fields).await?;
        let id = row_i64(&parent, self.spec.parent.id_column).ok_or_else(|| {
            DomainError::RowDecodeError(format!(
                "{} row returned without {}",
                self.spec.parent.table, self.spec.parent.id_column
            ))
        })?;
        self.insert_children(tx, id, tenant, children).await?;
        Ok(parent)
    }

    async fn replace_children(
        &self,
        tx: &mut S::Tx,
        parent_id: i64,
        tenant: TenantId,
        children: &ChildSets,
    ) -> Result<(), DomainError> {
        for child in self.spec.children {
            let removed = tx.delete_children(child, parent_id, tenant).await?;
            debug!(table = child.table, parent_id, removed, "Cleared child set");
        }
        self.insert_children(tx, parent_id, tenant, children).await
    }

    async fn insert_children(
        &self,
        tx: &mut S::Tx,
        parent_id: i64,
        tenant: TenantId,
        children: &ChildSets,
    ) -> Result<(), DomainError> {
        for (child, rows) in self.spec.children.iter().zip(children) {
            for row in rows {
                tx.insert_child(child, parent_id, tenant, row).await?;
            }
        }
        Ok(())
    }

    async fn delete_in(&self, tx: &mut S::Tx, id: i64, tenant: TenantId) -> Result<bool, DomainError> {
        for child in self.spec.children {
            tx.delete_children_of_parent(&self.spec.parent, child, id, tenant).await?;
        }
        tx.delete_parent(&self.spec.parent, id, tenant).await
    }

    async fn attach_children(&self, parents: Vec<Row>, tenant: TenantId) -> Result<Vec<AggregateRecord>, DomainError> {
        let id_column = self.spec.parent.id_column;
        let mut records: Vec<AggregateRecord> = parents
            .into_iter()
            .map(|parent| AggregateRecord {
                parent,
                children: self.spec.children.iter().map(|c| (c.name, Vec::new())).collect::<BTreeMap<_, _>>(),
            })
            .collect();

        let index: HashMap<i64, usize> = records
            .iter()
            .enumerate()
            .filter_map(|(i, record)| row_i64(&record.parent, id_column).map(|id| (id, i)))
            .collect();
        if index.is_empty() {
            return Ok(records);
        }
        let ids: Vec<i64> = index.keys().copied().collect();

        for child in self.spec.children {
            let rows = self.store.fetch_children(child, &ids, tenant).await?;
            for row in rows {
                let Some(&position) = row_i64(&row, child.parent_column).and_then(|pid| index.get(&pid)) else {
                    continue;
                };
                records[position].children.entry(child.name).or_default().push(row);
            }
        }
        Ok(records)
    }

    async fn finish<T>(&self, tx: S::Tx, result: Result<T, DomainError>) -> Result<T, DomainError> {
        match result {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(e) => {
                error!(aggregate = self.spec.name, "Rolling back: {}", e);
                self.abort(tx).await;
                Err(e)
            }
        }
    }

    async fn abort(&self, tx: S::Tx) {
        if let Err(e) = tx.rollback().await {
            error!(aggregate = self.spec.name, "Rollback failed: {}", e);
        }
    }

    fn parent_fields(&self, fields: Vec<Field>) -> Result<Vec<Field>, DomainError> {
        let parent = &self.spec.parent;
        reject_managed(parent.table, &fields, &[parent.id_column, parent.tenant_column])?;
        with_zero_defaults(fields, parent.zero_default)
    }

    fn child_sets(&self, children: Vec<ChildRows>) -> Result<ChildSets, DomainError> {
        let mut sets: ChildSets = vec![Vec::new(); self.spec.children.len()];
        for set in children {
            let index = self.spec.child_index(set.child).ok_or_else(|| DomainError::UnknownChildSet {
                aggregate: self.spec.name,
                child: set.child.to_string(),
            })?;
            let child = &self.spec.children[index];
            for row in set.rows {
                reject_managed(child.table, &row, &[child.id_column, child.parent_column, child.tenant_column])?;
                sets[index].push(with_zero_defaults(row, child.zero_default)?);
            }
        }
        Ok(sets)
    }
}

fn reject_managed(table: &str, fields: &[Field], managed: &[&str]) -> Result<(), DomainError> {
    match fields.iter().find(|f| managed.contains(&f.column)) {
        Some(field) => Err(DomainError::ValidationError(format!(
            "column {} of {} is set by the store",
            field.column, table
        ))),
        None => Ok(()),
    }
}

fn with_zero_defaults(mut fields: Vec<Field>, columns: &[&'static str]) -> Result<Vec<Field>, DomainError> {
    for column in columns {
        match fields.iter_mut().find(|f| f.column == *column) {
            Some(field) => {
                let value = std::mem::replace(&mut field.value, SqlValue::BigInt(None));
                field.value = value.or_zero(column)?;
            }
            None => fields.push(Field::new(*column, 0i64)),
        }
    }
    Ok(fields)
}
