//! # qrm
//!
//! Materializes flat, join-duplicated SQL results into nested, deduplicated
//! Rust values. The join shape travels in the column aliases: every segment
//! but the last selects a nested field, the last one a scalar.
//!
//! ## Quick Start
//!
//! ```rust
//! use qrm::{Destination, MemoryRows, Value};
//!
//! #[derive(Debug, Default, Destination)]
//! struct Author {
//!     #[qrm(primary_key)]
//!     id: i64,
//!     name: String,
//!     posts: Vec<Post>,
//! }
//!
//! #[derive(Debug, Default, Destination)]
//! struct Post {
//!     #[qrm(primary_key)]
//!     id: i64,
//!     title: String,
//! }
//!
//! # fn main() -> qrm::Result<()> {
//! // SELECT a.id AS "author.id", a.name AS "author.name",
//! //        p.id AS "posts.id", p.title AS "posts.title"
//! // FROM authors a LEFT JOIN posts p ON p.author_id = a.id
//! let rows = MemoryRows::new(["author.id", "author.name", "posts.id", "posts.title"])
//!     .row([Value::from(1), Value::from("ada"), Value::from(10), Value::from("intro")])
//!     .row([Value::from(1), Value::from("ada"), Value::from(11), Value::from("engines")])
//!     .row([Value::from(2), Value::from("grace"), Value::Null, Value::Null]);
//!
//! let mut authors: Vec<Author> = Vec::new();
//! qrm::query(rows, &mut authors)?;
//!
//! assert_eq!(authors.len(), 2);
//! assert_eq!(authors[0].posts.len(), 2);
//! assert!(authors[1].posts.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! ## Row Sources
//!
//! | Source        | Type                          | Feature Flag |
//! |---------------|-------------------------------|--------------|
//! | In memory     | [`MemoryRows`]                | -            |
//! | SQLite        | [`rusqlite::SqliteRows`]      | `rusqlite`   |

#![cfg_attr(docsrs, feature(doc_cfg))]

// =============================================================================
// Root-level exports
// =============================================================================

pub use qrm_core::*;

/// Derive macro for destination types
pub use qrm_macros::Destination;

/// Error types
pub mod error {
    pub use qrm_core::error::{CoercionError, QrmError, ScanError, SchemaError};
}

/// SQLite support through `rusqlite`.
///
/// ```no_run
/// # use qrm::Destination;
/// # #[derive(Default, Destination)]
/// # struct Operation { #[qrm(primary_key)] id: i64 }
/// # fn main() -> qrm::Result<()> {
/// let conn = rusqlite::Connection::open_in_memory()?;
/// let mut operations: Vec<Operation> = Vec::new();
/// qrm::rusqlite::query(&conn, r#"SELECT 1 AS "operation.id""#, [], &mut operations)?;
/// # Ok(())
/// # }
/// ```
#[cfg(feature = "rusqlite")]
pub mod rusqlite {
    pub use qrm_core::source::rusqlite::{SqliteRows, query, query_context};
}
