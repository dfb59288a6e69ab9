//! [`RowSource`] over `rusqlite` result rows, plus prepare-and-materialize
//! helpers.

use ::rusqlite::types::ValueRef;
use ::rusqlite::{Connection, Params, Row, Rows};

use crate::context::Context;
use crate::descriptor::Target;
use crate::error::{Result, ScanError};
use crate::value::Value;

use super::RowSource;

/// Adapts `rusqlite::Rows`. Column labels are read from the statement, so
/// `SELECT a.id AS "from.id"` yields the alias `from.id`.
pub struct SqliteRows<'stmt> {
    rows: Rows<'stmt>,
    columns: Vec<String>,
    current: Option<Vec<Value>>,
}

impl<'stmt> SqliteRows<'stmt> {
    pub fn new(rows: Rows<'stmt>) -> Self {
        let columns = rows
            .as_ref()
            .map(|stmt| {
                stmt.column_names()
                    .into_iter()
                    .map(str::to_owned)
                    .collect()
            })
            .unwrap_or_default();
        Self {
            rows,
            columns,
            current: None,
        }
    }
}

fn decode(value: ValueRef<'_>) -> std::result::Result<Value, ScanError> {
    Ok(match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::Integer(i),
        ValueRef::Real(r) => Value::Real(r),
        ValueRef::Text(text) => {
            let text = core::str::from_utf8(text).map_err(|e| ScanError::Driver(Box::new(e)))?;
            Value::Text(text.to_owned())
        }
        ValueRef::Blob(blob) => Value::Blob(blob.to_vec()),
    })
}

fn decode_row(row: &Row<'_>, width: usize) -> std::result::Result<Vec<Value>, ScanError> {
    (0..width)
        .map(|index| decode(row.get_ref(index)?))
        .collect()
}

impl RowSource for SqliteRows<'_> {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn advance(&mut self) -> std::result::Result<bool, ScanError> {
        let width = self.columns.len();
        self.current = match self.rows.next()? {
            Some(row) => Some(decode_row(row, width)?),
            None => None,
        };
        Ok(self.current.is_some())
    }

    fn scan(&mut self, slots: &mut [Value]) -> std::result::Result<(), ScanError> {
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

/// Prepares `sql`, runs it with `params` and materializes the result into
/// `target`. Returns the number of root entities created.
///
/// ```no_run
/// # use qrm_core::Destination;
/// # fn run<T: Destination>(conn: &rusqlite::Connection) -> qrm_core::Result<()> {
/// let mut authors: Vec<T> = Vec::new();
/// qrm_core::source::rusqlite::query(
///     conn,
///     r#"SELECT a.id AS "author.id", p.id AS "posts.id"
///        FROM authors a LEFT JOIN posts p ON p.author_id = a.id"#,
///     [],
///     &mut authors,
/// )?;
/// # Ok(())
/// # }
/// ```
pub fn query<T, P>(conn: &Connection, sql: &str, params: P, target: &mut T) -> Result<usize>
where
    T: Target + ?Sized,
    P: Params,
{
    query_context(&(), conn, sql, params, target)
}

/// [`query`] with a cancellation [`Context`] polled between rows.
pub fn query_context<C, T, P>(
    ctx: &C,
    conn: &Connection,
    sql: &str,
    params: P,
    target: &mut T,
) -> Result<usize>
where
    C: Context + ?Sized,
    T: Target + ?Sized,
    P: Params,
{
    crate::qrm_profile_function!();
    ctx.check()?;
    let mut stmt = conn.prepare(sql)?;
    let rows = SqliteRows::new(stmt.query(params)?);
    crate::query::query_context(ctx, rows, target)
}
