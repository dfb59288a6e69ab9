use std::collections::VecDeque;

use crate::error::ScanError;
use crate::value::Value;

use super::RowSource;

/// Rows held in memory, for tests and for results fetched by other means.
///
/// ```
/// use qrm_core::{MemoryRows, Value};
///
/// let rows = MemoryRows::new(["author.id", "author.name"])
///     .row([Value::from(1), Value::from("ada")])
///     .row([Value::from(2), Value::Null]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemoryRows {
    columns: Vec<String>,
    rows: VecDeque<Vec<Value>>,
    current: Option<Vec<Value>>,
    fetched: usize,
    fail_after: Option<usize>,
}

impl MemoryRows {
    pub fn new<I, S>(columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            columns: columns.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn row<I: IntoIterator<Item = Value>>(mut self, values: I) -> Self {
        self.rows.push_back(values.into_iter().collect());
        self
    }

    /// Makes `advance` fail with a driver error once `rows` rows were fetched.
    pub fn fail_after(mut self, rows: usize) -> Self {
        self.fail_after = Some(rows);
        self
    }

    /// Rows not fetched yet.
    pub fn remaining(&self) -> usize {
        self.rows.len()
    }
}

impl RowSource for MemoryRows {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn advance(&mut self) -> Result<bool, ScanError> {
        if self.fail_after == Some(self.fetched) {
            self.current = None;
            return Err(ScanError::Driver(
                format!("cursor failed after {} rows", self.fetched).into(),
            ));
        }
        self.current = self.rows.pop_front();
        if self.current.is_some() {
            self.fetched += 1;
        }
        Ok(self.current.is_some())
    }

    fn scan(&mut self, slots: &mut [Value]) -> Result<(), ScanError> {
        let row = self.current.take().ok_or(ScanError::NoRow)?;
        if row.len() != slots.len() {
            return Err(ScanError::ColumnCount {
                expected: slots.len(),
                found: row.len(),
            });
        }
        for (slot, value) in slots.iter_mut().zip(row) {
            *slot = value;
        }
        Ok(())
    }
}
