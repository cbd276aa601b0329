//! SQL text generated from an aggregate's table layout
//!
//! Rows are returned as `to_jsonb(alias)` so one decoder serves every table.
//! Placeholder order is documented per builder and must match the binds.

use salon_core::replace_write::{ChildSpec, Field, ParentSpec};

fn columns(fields: &[Field]) -> impl Iterator<Item = &'static str> + '_ {
    fields.iter().map(|f| f.column)
}

fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|i| format!("${}", i))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Binds: tenant, then `fields`.
pub fn insert_parent(parent: &ParentSpec, fields: &[Field]) -> String {
    let cols: Vec<&str> = std::iter::once(parent.tenant_column).chain(columns(fields)).collect();
    format!(
        "INSERT INTO {} AS t ({}) VALUES ({}) RETURNING to_jsonb(t)",
        parent.table,
        cols.join(", "),
        placeholders(1, cols.len())
    )
}

/// Binds: `fields`, then id, then tenant.
pub fn update_parent(parent: &ParentSpec, fields: &[Field]) -> String {
    let assignments = if fields.is_empty() {
        format!("{0} = t.{0}", parent.id_column)
    } else {
        columns(fields)
            .enumerate()
            .map(|(i, col)| format!("{} = ${}", col, i + 1))
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "UPDATE {} AS t SET {} WHERE t.{} = ${} AND t.{} = ${} RETURNING to_jsonb(t)",
        parent.table,
        assignments,
        parent.id_column,
        fields.len() + 1,
        parent.tenant_column,
        fields.len() + 2
    )
}

/// Binds: parent id, tenant.
pub fn delete_children(child: &ChildSpec) -> String {
    format!(
        "DELETE FROM {} WHERE {} = $1 AND {} = $2",
        child.table, child.parent_column, child.tenant_column
    )
}

/// Binds: parent id, tenant. Scoped through the parent row rather than the child's own tenant column.
pub fn delete_children_of_parent(parent: &ParentSpec, child: &ChildSpec) -> String {
    format!(
        "DELETE FROM {} AS c USING {} AS p WHERE c.{} = p.{} AND p.{} = $1 AND p.{} = $2",
        child.table, parent.table, child.parent_column, parent.id_column, parent.id_column, parent.tenant_column
    )
}

/// Binds: parent id, tenant, then `fields`.
pub fn insert_child(child: &ChildSpec, fields: &[Field]) -> String {
    let cols: Vec<&str> = [child.parent_column, child.tenant_column]
        .into_iter()
        .chain(columns(fields))
        .collect();
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        child.table,
        cols.join(", "),
        placeholders(1, cols.len())
    )
}

/// Binds: id, tenant.
pub fn delete_parent(parent: &ParentSpec) -> String {
    format!(
        "DELETE FROM {} WHERE {} = $1 AND {} = $2",
        parent.table, parent.id_column, parent.tenant_column
    )
}

/// Binds: id, tenant.
pub fn select_parent(parent: &ParentSpec) -> String {
    format!(
        "SELECT to_jsonb(t) FROM {} AS t WHERE t.{} = $1 AND t.{} = $2",
        parent.table, parent.id_column, parent.tenant_column
    )
}

fn order_by(parent: &ParentSpec) -> String {
    let direction = if parent.list_order.is_descending() { "DESC" } else { "ASC" };
    let column = parent.list_order.column();
    if column == parent.id_column {
        format!("t.{} {}", column, direction)
    } else {
        format!("t.{} {}, t.{} {}", column, direction, parent.id_column, direction)
    }
}

/// Binds: tenant.
pub fn list_parents(parent: &ParentSpec) -> String {
    format!(
        "SELECT to_jsonb(t) FROM {} AS t WHERE t.{} = $1 ORDER BY {}",
        parent.table,
        parent.tenant_column,
        order_by(parent)
    )
}

/// Binds: parent id array, tenant.
pub fn select_children(child: &ChildSpec) -> String {
    format!(
        "SELECT to_jsonb(c) FROM {} AS c WHERE c.{} = ANY($1) AND c.{} = $2 ORDER BY c.{}, c.{}",
        child.table, child.parent_column, child.tenant_column, child.parent_column, child.id_column
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use salon_core::{SECTION_AGGREGATE, SERVICE_DEFINITION_AGGREGATE, SERVICE_TRANSACTION_AGGREGATE};

    fn roles() -> &'static ChildSpec {
        SERVICE_DEFINITION_AGGREGATE.child("roles").unwrap()
    }

    #[test]
    fn test_insert_parent_stamps_tenant_first() {
        let fields = [Field::new("service_name", "Haircut"), Field::new("service_amount", 20000i64)];
        assert_eq!(
            insert_parent(&SERVICE_DEFINITION_AGGREGATE.parent, &fields),
            "INSERT INTO service_definitions AS t (salon_id, service_name, service_amount) \
             VALUES ($1, $2, $3) RETURNING to_jsonb(t)"
        );
    }

    #[test]
    fn test_update_parent_filters_by_id_and_tenant() {
        let fields = [Field::new("service_name", "Haircut")];
        assert_eq!(
            update_parent(&SERVICE_DEFINITION_AGGREGATE.parent, &fields),
            "UPDATE service_definitions AS t SET service_name = $1 \
             WHERE t.id = $2 AND t.salon_id = $3 RETURNING to_jsonb(t)"
        );
        assert!(update_parent(&SERVICE_DEFINITION_AGGREGATE.parent, &[]).contains("SET id = t.id WHERE t.id = $1"));
    }

    #[test]
    fn test_child_statements_are_tenant_scoped() {
        assert_eq!(
            delete_children(roles()),
            "DELETE FROM service_roles WHERE service_definition_id = $1 AND salon_id = $2"
        );
        assert_eq!(
            delete_children_of_parent(&SERVICE_DEFINITION_AGGREGATE.parent, roles()),
            "DELETE FROM service_roles AS c USING service_definitions AS p \
             WHERE c.service_definition_id = p.id AND p.id = $1 AND p.salon_id = $2"
        );
        assert_eq!(
            insert_child(roles(), &[Field::new("role_name", "Stylist"), Field::new("earned_amount", 0i64)]),
            "INSERT INTO service_roles (service_definition_id, salon_id, role_name, earned_amount) \
             VALUES ($1, $2, $3, $4)"
        );
    }

    #[test]
    fn test_reads() {
        assert_eq!(
            list_parents(&SERVICE_DEFINITION_AGGREGATE.parent),
            "SELECT to_jsonb(t) FROM service_definitions AS t WHERE t.salon_id = $1 ORDER BY t.id DESC"
        );
        assert!(select_children(roles()).contains("c.service_definition_id = ANY($1) AND c.salon_id = $2"));
        assert!(select_parent(&SERVICE_DEFINITION_AGGREGATE.parent).ends_with("WHERE t.id = $1 AND t.salon_id = $2"));
    }

    #[test]
    fn test_listing_follows_declared_order() {
        assert!(list_parents(&SERVICE_TRANSACTION_AGGREGATE.parent)
            .ends_with("ORDER BY t.service_timestamp DESC, t.id DESC"));
        assert_eq!(
            list_parents(&SECTION_AGGREGATE.parent),
            "SELECT to_jsonb(t) FROM service_sections AS t WHERE t.salon_id = $1 ORDER BY t.id ASC"
        );
    }
}
