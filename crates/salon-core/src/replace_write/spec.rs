//! Table layout of a parent/child aggregate

/// Sort column of a parent listing. Ties fall back to the id column in the same direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListOrder {
    Asc(&'static str),
    Desc(&'static str),
}

impl ListOrder {
    pub fn column(&self) -> &'static str {
        match self {
            ListOrder::Asc(column) | ListOrder::Desc(column) => column,
        }
    }

    pub fn is_descending(&self) -> bool {
        matches!(self, ListOrder::Desc(_))
    }
}

/// Parent table of an aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentSpec {
    pub table: &'static str,
    pub id_column: &'static str,
    pub tenant_column: &'static str,
    /// Columns declared `NOT NULL` besides the keys.
    pub required: &'static [&'static str],
    /// Amount columns stored as `0` when the supplied value is null.
    pub zero_default: &'static [&'static str],
    /// Columns the schema fills with the current time on insert.
    pub now_default: &'static [&'static str],
    pub list_order: ListOrder,
}

/// A dependent child table referencing the parent by foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChildSpec {
    /// Name of the child set as callers refer to it (`roles`, `performers`, ...).
    pub name: &'static str,
    pub table: &'static str,
    pub id_column: &'static str,
    pub parent_column: &'static str,
    pub tenant_column: &'static str,
    /// Columns declared `NOT NULL` besides the keys.
    pub required: &'static [&'static str],
    pub zero_default: &'static [&'static str],
}

/// A parent table together with every child set it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateSpec {
    pub name: &'static str,
    pub parent: ParentSpec,
    pub children: &'static [ChildSpec],
}

impl AggregateSpec {
    pub fn child(&self, name: &str) -> Option<&'static ChildSpec> {
        let children: &'static [ChildSpec] = self.children;
        children.iter().find(|c| c.name == name)
    }

    pub fn child_index(&self, name: &str) -> Option<usize> {
        self.children.iter().position(|c| c.name == name)
    }
}

impl ParentSpec {
    pub fn is_required(&self, column: &str) -> bool {
        self.required.contains(&column)
    }
}

impl ChildSpec {
    pub fn is_required(&self, column: &str) -> bool {
        self.required.contains(&column)
    }
}
