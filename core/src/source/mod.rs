//! Row sources: forward-only cursors over a query result.

mod memory;
#[cfg(feature = "rusqlite")]
pub mod rusqlite;

pub use memory::MemoryRows;

use crate::error::ScanError;
use crate::value::Value;

/// A forward-only result cursor.
///
/// The materializer calls [`advance`](RowSource::advance) once per row and,
/// when it returns `true`, [`scan`](RowSource::scan) exactly once with one
/// slot per column. Releasing the cursor is the source's `Drop`.
pub trait RowSource {
    /// Column labels, in result order. Stable for the cursor's lifetime.
    fn columns(&self) -> &[String];

    /// Moves to the next row. `Ok(false)` once the result is drained.
    fn advance(&mut self) -> Result<bool, ScanError>;

    /// Writes the current row's values into `slots`.
    fn scan(&mut self, slots: &mut [Value]) -> Result<(), ScanError>;
}

impl<S: RowSource + ?Sized> RowSource for &mut S {
    fn columns(&self) -> &[String] {
        (**self).columns()
    }

    fn advance(&mut self) -> Result<bool, ScanError> {
        (**self).advance()
    }

    fn scan(&mut self, slots: &mut [Value]) -> Result<(), ScanError> {
        (**self).scan(slots)
    }
}

impl<S: RowSource + ?Sized> RowSource for Box<S> {
    fn columns(&self) -> &[String] {
        (**self).columns()
    }

    fn advance(&mut self) -> Result<bool, ScanError> {
        (**self).advance()
    }

    fn scan(&mut self, slots: &mut [Value]) -> Result<(), ScanError> {
        (**self).scan(slots)
    }
}
