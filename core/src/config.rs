//! Materializer configuration.

/// What to do with a column whose alias does not resolve against the
/// destination type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum UnmappedColumns {
    /// Fail with a schema error before any row is scanned.
    #[default]
    Error,
    /// Leave the column unbound.
    Ignore,
}

/// Options for a [`Materializer`](crate::query::Materializer).
///
/// Part of the schema cache key: the same destination and alias list built
/// under different options are cached separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    pub unmapped_columns: UnmappedColumns,
}

impl Config {
    pub const fn new() -> Self {
        Self {
            unmapped_columns: UnmappedColumns::Error,
        }
    }

    pub const fn unmapped_columns(mut self, policy: UnmappedColumns) -> Self {
        self.unmapped_columns = policy;
        self
    }

    /// Shorthand for `unmapped_columns(UnmappedColumns::Ignore)`.
    pub const fn ignore_unmapped(self) -> Self {
        self.unmapped_columns(UnmappedColumns::Ignore)
    }
}
