use thiserror::Error;

use crate::context::Cancelled;
use crate::value::ScalarKind;

#[derive(Debug, Error)]
pub enum QrmError {
    /// The column aliases cannot be mapped onto the destination type.
    /// Raised before any row is scanned.
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// The row source failed to fetch or decode a row
    #[error("Scan error at row {row}: {source}")]
    Scan {
        row: usize,
        #[source]
        source: ScanError,
    },

    /// A column value is not representable in its destination field
    #[error("Coercion error in column `{column}` at row {row}: {source}")]
    Coercion {
        column: String,
        row: usize,
        #[source]
        source: CoercionError,
    },

    /// A hand-written `Record` impl disagrees with its own descriptor
    #[error("`{record}` has no nested entry #{index} at row {row}")]
    Record {
        record: &'static str,
        index: usize,
        row: usize,
    },

    /// The caller's context was cancelled between rows
    #[error(transparent)]
    Cancelled(#[from] Cancelled),

    /// The driver rejected the statement before any row was fetched
    #[cfg(feature = "rusqlite")]
    #[error("Rusqlite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),
}

/// Mapping defects between column aliases and the destination descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("Malformed column alias `{0}`")]
    MalformedAlias(String),

    #[error("Column `{column}`: `{record}` has no nested field matching `{step}`")]
    UnknownStep {
        column: String,
        record: &'static str,
        step: String,
    },

    #[error("Column `{column}`: `{step}` matches several nested fields of `{record}`")]
    AmbiguousStep {
        column: String,
        record: &'static str,
        step: String,
    },

    #[error("Column `{column}`: `{record}` has no scalar field `{field}`")]
    UnknownField {
        column: String,
        record: &'static str,
        field: String,
    },

    #[error("Columns `{previous}` and `{column}` both bind `{path}.{field}`")]
    DuplicateColumn {
        column: String,
        previous: String,
        path: String,
        field: &'static str,
    },

    #[error("`{path}` ({record}) has a to-many child but no primary key column was selected")]
    MissingPrimaryKey { path: String, record: &'static str },

    #[error("`{path}` ({record}) is selected without its primary key column `{field}`")]
    PartialPrimaryKey {
        path: String,
        record: &'static str,
        field: &'static str,
    },

    #[error("`{record}` does not expose field #{field}")]
    FieldAccess { record: &'static str, field: usize },
}

/// Failures surfaced by a [`RowSource`](crate::source::RowSource).
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("Row has {found} values, cursor reported {expected} columns")]
    ColumnCount { expected: usize, found: usize },

    #[error("No current row to scan")]
    NoRow,

    #[error("Driver error: {0}")]
    Driver(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Rusqlite specific errors
    #[cfg(feature = "rusqlite")]
    #[error("Rusqlite error: {0}")]
    Rusqlite(#[from] rusqlite::Error),
}

/// A scalar value that cannot be written into its destination field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoercionError {
    #[error("{found} {value} out of range for {kind}")]
    Overflow {
        kind: ScalarKind,
        found: &'static str,
        value: String,
    },

    #[error("cannot convert {found} to {kind}")]
    Mismatch {
        kind: ScalarKind,
        found: &'static str,
    },

    #[error("cannot parse {value:?} as {kind}: {reason}")]
    Parse {
        kind: ScalarKind,
        value: String,
        reason: String,
    },

    #[error("no scalar field #{0}")]
    UnknownField(usize),
}

impl CoercionError {
    pub(crate) fn mismatch(kind: ScalarKind, found: &'static str) -> Self {
        Self::Mismatch { kind, found }
    }

    pub(crate) fn overflow(kind: ScalarKind, found: &'static str, value: impl ToString) -> Self {
        Self::Overflow {
            kind,
            found,
            value: value.to_string(),
        }
    }

    pub(crate) fn parse(kind: ScalarKind, value: &str, reason: impl ToString) -> Self {
        Self::Parse {
            kind,
            value: value.to_owned(),
            reason: reason.to_string(),
        }
    }
}

/// Result type for materialization
pub type Result<T> = std::result::Result<T, QrmError>;
