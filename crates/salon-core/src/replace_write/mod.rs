//! Transactional replace-write protocol
//!
//! One parent row plus any number of dependent child sets are written as a
//! single unit inside one database transaction, always scoped to a tenant.
//! Updates fully replace every child set of the aggregate. Entities plug in
//! through a `const` [`AggregateSpec`] instead of their own transaction code.

pub mod spec;
pub mod value;
pub mod store;
pub mod writer;
pub mod memory;

pub use spec::{AggregateSpec, ChildSpec, ListOrder, ParentSpec};
pub use value::{decode_row, AggregateRecord, ChildRows, Field, Row, SqlValue};
pub use store::{ReplaceStore, ReplaceTx};
pub use writer::ReplaceWriter;
pub use memory::MemoryStore;
