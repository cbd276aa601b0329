//! In-process store adapter
//!
//! Tables live in memory. A transaction reads and writes a private copy of
//! the committed tables and records every change it makes; commit replays the
//! recorded changes onto the current committed tables, so rows committed by
//! an overlapping transaction survive (last commit wins only on the rows both
//! touched). Rollback drops the copy. Ids come from shared sequences and are
//! never reused, rolled back or not. `required` columns behave like
//! `NOT NULL` constraints.

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use serde_json::Value as JsonValue;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use super::spec::{ChildSpec, ListOrder, ParentSpec};
use super::store::{ReplaceStore, ReplaceTx};
use super::value::{row_i64, Field, Row};
use crate::domain::TenantId;
use crate::error::DomainError;

type Tables = HashMap<&'static str, Vec<Row>>;

/// Column equality filter selecting the rows a change applies to.
type Key = Vec<(&'static str, i64)>;

#[derive(Debug, Default)]
struct Shared {
    tables: Tables,
    sequences: HashMap<&'static str, i64>,
}

impl Shared {
    fn next_id(&mut self, table: &'static str) -> i64 {
        let seq = self.sequences.entry(table).or_insert(0);
        *seq += 1;
        *seq
    }
}

#[derive(Debug, Clone)]
enum Change {
    Insert { table: &'static str, row: Row },
    Replace { table: &'static str, key: Key, row: Row },
    Delete { table: &'static str, key: Key },
}

impl Change {
    fn apply(&self, tables: &mut Tables) {
        match self {
            Change::Insert { table, row } => tables.entry(*table).or_default().push(row.clone()),
            Change::Replace { table, key, row } => {
                // A row deleted by a transaction committed in between stays deleted.
                if let Some(existing) = tables
                    .entry(*table)
                    .or_default()
                    .iter_mut()
                    .find(|existing| key_matches(existing, key))
                {
                    *existing = row.clone();
                }
            }
            Change::Delete { table, key } => tables.entry(*table).or_default().retain(|row| !key_matches(row, key)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    shared: Arc<Mutex<Shared>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed rows of a table in insertion order.
    pub fn rows(&self, table: &str) -> Vec<Row> {
        self.shared.lock().tables.get(table).cloned().unwrap_or_default()
    }

    pub fn row_count(&self, table: &str) -> usize {
        self.shared.lock().tables.get(table).map_or(0, Vec::len)
    }
}

pub struct MemoryTx {
    shared: Arc<Mutex<Shared>>,
    working: Tables,
    changes: Vec<Change>,
}

impl MemoryTx {
    fn record(&mut self, change: Change) {
        change.apply(&mut self.working);
        self.changes.push(change);
    }

    fn next_id(&self, table: &'static str) -> i64 {
        self.shared.lock().next_id(table)
    }

    fn find(&self, table: &'static str, key: &Key) -> Option<&Row> {
        self.working.get(table)?.iter().find(|row| key_matches(row, key))
    }

    fn count(&self, table: &'static str, key: &Key) -> u64 {
        self.working
            .get(table)
            .map_or(0, |rows| rows.iter().filter(|row| key_matches(row, key)).count() as u64)
    }
}

fn row_matches(row: &Row, column: &str, value: i64) -> bool {
    row_i64(row, column) == Some(value)
}

fn key_matches(row: &Row, key: &Key) -> bool {
    key.iter().all(|(column, value)| row_matches(row, column, *value))
}

fn parent_key(parent: &ParentSpec, id: i64, tenant: TenantId) -> Key {
    vec![(parent.id_column, id), (parent.tenant_column, tenant.get())]
}

fn assign(row: &mut Row, fields: &[Field]) {
    for field in fields {
        row.insert(field.column.to_string(), field.value.to_json());
    }
}

fn check_required(table: &'static str, row: &Row, required: &'static [&'static str]) -> Result<(), DomainError> {
    for &column in required {
        if row.get(column).map_or(true, JsonValue::is_null) {
            return Err(DomainError::NullConstraint { table, column });
        }
    }
    Ok(())
}

/// Nulls first, numbers numerically, text (RFC 3339 timestamps included) lexically.
fn compare_values(a: Option<&JsonValue>, b: Option<&JsonValue>) -> Ordering {
    match (a, b) {
        (Some(JsonValue::Number(x)), Some(JsonValue::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Some(JsonValue::String(x)), Some(JsonValue::String(y))) => x.cmp(y),
        (None | Some(JsonValue::Null), None | Some(JsonValue::Null)) => Ordering::Equal,
        (None | Some(JsonValue::Null), _) => Ordering::Less,
        (_, None | Some(JsonValue::Null)) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

fn sort_parents(rows: &mut [Row], parent: &ParentSpec) {
    let column = parent.list_order.column();
    rows.sort_by(|a, b| {
        let ordering = compare_values(a.get(column), b.get(column))
            .then_with(|| row_i64(a, parent.id_column).cmp(&row_i64(b, parent.id_column)));
        match parent.list_order {
            ListOrder::Asc(_) => ordering,
            ListOrder::Desc(_) => ordering.reverse(),
        }
    });
}

#[async_trait]
impl ReplaceStore for MemoryStore {
    type Tx = MemoryTx;

    async fn begin(&self) -> Result<Self::Tx, DomainError> {
        Ok(MemoryTx {
            shared: self.shared.clone(),
            working: self.shared.lock().tables.clone(),
            changes: Vec::new(),
        })
    }

    async fn fetch_parent(&self, parent: &ParentSpec, id: i64, tenant: TenantId) -> Result<Option<Row>, DomainError> {
        let shared = self.shared.lock();
        let key = parent_key(parent, id, tenant);
        Ok(shared
            .tables
            .get(parent.table)
            .and_then(|rows| rows.iter().find(|row| key_matches(row, &key)).cloned()))
    }

    async fn list_parents(&self, parent: &ParentSpec, tenant: TenantId) -> Result<Vec<Row>, DomainError> {
        let shared = self.shared.lock();
        let mut rows: Vec<Row> = shared
            .tables
            .get(parent.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| row_matches(row, parent.tenant_column, tenant.get()))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        sort_parents(&mut rows, parent);
        Ok(rows)
    }

    async fn fetch_children(
        &self,
        child: &ChildSpec,
        parent_ids: &[i64],
        tenant: TenantId,
    ) -> Result<Vec<Row>, DomainError> {
        let shared = self.shared.lock();
        let mut rows: Vec<Row> = shared
            .tables
            .get(child.table)
            .map(|rows| {
                rows.iter()
                    .filter(|row| row_matches(row, child.tenant_column, tenant.get()))
                    .filter(|row| {
                        row_i64(row, child.parent_column).map_or(false, |pid| parent_ids.contains(&pid))
                    })
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        rows.sort_by_key(|row| (row_i64(row, child.parent_column), row_i64(row, child.id_column)));
        Ok(rows)
    }
}

#[async_trait]
impl ReplaceTx for MemoryTx {
    async fn insert_parent(&mut self, parent: &ParentSpec, tenant: TenantId, fields: &[Field]) -> Result<Row, DomainError> {
        let id = self.next_id(parent.table);
        let mut row = Row::new();
        row.insert(parent.id_column.to_string(), JsonValue::from(id));
        row.insert(parent.tenant_column.to_string(), JsonValue::from(tenant.get()));
        let now = Utc::now().to_rfc3339();
        for column in parent.now_default {
            row.insert(column.to_string(), JsonValue::String(now.clone()));
        }
        assign(&mut row, fields);
        check_required(parent.table, &row, parent.required)?;

        self.record(Change::Insert { table: parent.table, row: row.clone() });
        Ok(row)
    }

    async fn update_parent(
        &mut self,
        parent: &ParentSpec,
        id: i64,
        tenant: TenantId,
        fields: &[Field],
    ) -> Result<Option<Row>, DomainError> {
        let key = parent_key(parent, id, tenant);
        let Some(existing) = self.find(parent.table, &key) else {
            return Ok(None);
        };

        let mut updated = existing.clone();
        assign(&mut updated, fields);
        check_required(parent.table, &updated, parent.required)?;
        self.record(Change::Replace { table: parent.table, key, row: updated.clone() });
        Ok(Some(updated))
    }

    async fn delete_children(&mut self, child: &ChildSpec, parent_id: i64, tenant: TenantId) -> Result<u64, DomainError> {
        let key = vec![(child.parent_column, parent_id), (child.tenant_column, tenant.get())];
        let removed = self.count(child.table, &key);
        self.record(Change::Delete { table: child.table, key });
        Ok(removed)
    }

    async fn delete_children_of_parent(
        &mut self,
        parent: &ParentSpec,
        child: &ChildSpec,
        parent_id: i64,
        tenant: TenantId,
    ) -> Result<u64, DomainError> {
        if self.find(parent.table, &parent_key(parent, parent_id, tenant)).is_none() {
            return Ok(0);
        }

        let key = vec![(child.parent_column, parent_id)];
        let removed = self.count(child.table, &key);
        self.record(Change::Delete { table: child.table, key });
        Ok(removed)
    }

    async fn insert_child(
        &mut self,
        child: &ChildSpec,
        parent_id: i64,
        tenant: TenantId,
        fields: &[Field],
    ) -> Result<(), DomainError> {
        let mut row = Row::new();
        assign(&mut row, fields);
        check_required(child.table, &row, child.required)?;

        let id = self.next_id(child.table);
        row.insert(child.id_column.to_string(), JsonValue::from(id));
        row.insert(child.parent_column.to_string(), JsonValue::from(parent_id));
        row.insert(child.tenant_column.to_string(), JsonValue::from(tenant.get()));
        self.record(Change::Insert { table: child.table, row });
        Ok(())
    }

    async fn delete_parent(&mut self, parent: &ParentSpec, id: i64, tenant: TenantId) -> Result<bool, DomainError> {
        let key = parent_key(parent, id, tenant);
        if self.find(parent.table, &key).is_none() {
            return Ok(false);
        }
        self.record(Change::Delete { table: parent.table, key });
        Ok(true)
    }

    async fn commit(self) -> Result<(), DomainError> {
        let mut shared = self.shared.lock();
        for change in &self.changes {
            change.apply(&mut shared.tables);
        }
        Ok(())
    }

    async fn rollback(self) -> Result<(), DomainError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOTES: ParentSpec = ParentSpec {
        table: "notes",
        id_column: "id",
        tenant_column: "salon_id",
        required: &["title"],
        zero_default: &[],
        now_default: &["created_at"],
        list_order: ListOrder::Desc("id"),
    };

    fn tenant(raw: i64) -> TenantId {
        TenantId::new(raw).unwrap()
    }

    #[tokio::test]
    async fn test_rollback_discards_working_copy() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        tx.insert_parent(&NOTES, tenant(1), &[Field::new("title", "draft")]).await.unwrap();
        tx.rollback().await.unwrap();

        assert_eq!(store.row_count("notes"), 0);
    }

    #[tokio::test]
    async fn test_commit_publishes_rows_with_defaults() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let row = tx.insert_parent(&NOTES, tenant(1), &[Field::new("title", "kept")]).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(row_i64(&row, "id"), Some(1));
        assert!(row.get("created_at").map_or(false, JsonValue::is_string));
        assert_eq!(store.rows("notes"), vec![row]);
    }

    #[tokio::test]
    async fn test_required_column_behaves_like_not_null() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        let result = tx.insert_parent(&NOTES, tenant(1), &[Field::new("title", None::<String>)]).await;

        assert!(matches!(
            result,
            Err(DomainError::NullConstraint { table: "notes", column: "title" })
        ));
    }

    #[tokio::test]
    async fn test_reads_are_tenant_scoped() {
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        tx.insert_parent(&NOTES, tenant(1), &[Field::new("title", "one")]).await.unwrap();
        tx.insert_parent(&NOTES, tenant(2), &[Field::new("title", "two")]).await.unwrap();
        tx.commit().await.unwrap();

        assert!(store.fetch_parent(&NOTES, 1, tenant(2)).await.unwrap().is_none());
        assert!(store.fetch_parent(&NOTES, 1, tenant(1)).await.unwrap().is_some());
        assert_eq!(store.list_parents(&NOTES, tenant(2)).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_overlapping_transactions_keep_both_rows() {
        let store = MemoryStore::new();
        let mut first = store.begin().await.unwrap();
        let mut second = store.begin().await.unwrap();

        let a = first.insert_parent(&NOTES, tenant(1), &[Field::new("title", "A")]).await.unwrap();
        let b = second.insert_parent(&NOTES, tenant(1), &[Field::new("title", "B")]).await.unwrap();
        assert_ne!(row_i64(&a, "id"), row_i64(&b, "id"));

        first.commit().await.unwrap();
        second.commit().await.unwrap();

        let titles: Vec<JsonValue> = store.rows("notes").iter().filter_map(|row| row.get("title").cloned()).collect();
        assert_eq!(titles, vec![JsonValue::from("A"), JsonValue::from("B")]);
    }

    #[tokio::test]
    async fn test_later_commit_wins_on_the_same_row() {
        let store = MemoryStore::new();
        let mut seed = store.begin().await.unwrap();
        seed.insert_parent(&NOTES, tenant(1), &[Field::new("title", "seed")]).await.unwrap();
        seed.commit().await.unwrap();

        let mut first = store.begin().await.unwrap();
        let mut second = store.begin().await.unwrap();
        first.update_parent(&NOTES, 1, tenant(1), &[Field::new("title", "first")]).await.unwrap();
        second.update_parent(&NOTES, 1, tenant(1), &[Field::new("title", "second")]).await.unwrap();
        second.commit().await.unwrap();
        first.commit().await.unwrap();

        let rows = store.rows("notes");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get("title"), Some(&JsonValue::from("first")));
    }

    #[tokio::test]
    async fn test_rolled_back_ids_are_not_reused() {
        let store = MemoryStore::new();
        let mut discarded = store.begin().await.unwrap();
        discarded.insert_parent(&NOTES, tenant(1), &[Field::new("title", "gone")]).await.unwrap();
        discarded.rollback().await.unwrap();

        let mut tx = store.begin().await.unwrap();
        let row = tx.insert_parent(&NOTES, tenant(1), &[Field::new("title", "kept")]).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(row_i64(&row, "id"), Some(2));
    }

    #[tokio::test]
    async fn test_listing_follows_declared_order() {
        const BY_RANK: ParentSpec = ParentSpec {
            list_order: ListOrder::Asc("rank"),
            ..NOTES
        };
        let store = MemoryStore::new();
        let mut tx = store.begin().await.unwrap();
        for (title, rank) in [("b", 2i64), ("a", 1), ("c", 3)] {
            tx.insert_parent(&BY_RANK, tenant(1), &[Field::new("title", title), Field::new("rank", rank)])
                .await
                .unwrap();
        }
        tx.commit().await.unwrap();

        let titles: Vec<JsonValue> = store
            .list_parents(&BY_RANK, tenant(1))
            .await
            .unwrap()
            .iter()
            .filter_map(|row| row.get("title").cloned())
            .collect();
        assert_eq!(titles, vec![JsonValue::from("a"), JsonValue::from("b"), JsonValue::from("c")]);
    }
}
