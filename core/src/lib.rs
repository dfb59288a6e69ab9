//! Core of the `qrm` result materializer.
//!
//! Turns a flat, join-duplicated result set into nested, deduplicated
//! destination values. Column aliases carry the shape: `from.entity.id` is
//! the `id` of the `entity` reached through the root's `from` field.

mod assemble;
pub mod cache;
pub mod config;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod identity;
pub mod path;
pub mod profiling;
pub mod query;
pub mod schema;
pub mod source;
pub mod tracing;
pub mod value;

#[cfg(test)]
mod testing;

// Re-export key types and traits
pub use config::{Config, UnmappedColumns};
pub use context::{Cancelled, CancellationToken, Context, Deadline};
pub use descriptor::{
    Cardinality, Child, Destination, FieldDescriptor, FieldKind, ManySlot, OptionalSlot, Record,
    RecordDescriptor, Target,
};
pub use error::{CoercionError, QrmError, Result, ScanError, SchemaError};
pub use query::{Materializer, prepare, query, query_context};
pub use schema::Schema;
pub use source::{MemoryRows, RowSource};
pub use value::{FromValue, ScalarKind, Value};

/// Alias-path helpers for statement builders.
pub use path as alias;
