//! Public entry points: drain a [`RowSource`] into a [`Target`].

use crate::assemble::Assembler;
use crate::cache;
use crate::config::Config;
use crate::context::Context;
use crate::descriptor::{Destination, Target};
use crate::error::{QrmError, Result};
use crate::source::RowSource;
use crate::value::Value;

/// Materializes every row of `source` into `target` with the default
/// [`Config`]. Returns the number of root entities created by this call.
///
/// # Errors
///
/// - [`QrmError::Schema`] if the column aliases do not map onto
///   `T::Item`; nothing is scanned and `target` is untouched.
/// - [`QrmError::Scan`] or [`QrmError::Coercion`] at the failing row; rows
///   before it stay applied.
pub fn query<S, T>(source: S, target: &mut T) -> Result<usize>
where
    S: RowSource,
    T: Target + ?Sized,
{
    Materializer::default().query_context(&(), source, target)
}

/// [`query`] that polls `ctx` before every fetch and before applying each
/// fetched row. A cancelled run returns [`QrmError::Cancelled`] and keeps
/// what was already applied.
pub fn query_context<C, S, T>(ctx: &C, source: S, target: &mut T) -> Result<usize>
where
    C: Context + ?Sized,
    S: RowSource,
    T: Target + ?Sized,
{
    Materializer::default().query_context(ctx, source, target)
}

/// A configured materializer.
///
/// ```
/// use qrm_core::{Config, Materializer};
///
/// let lenient = Materializer::new(Config::new().ignore_unmapped());
/// assert!(lenient.config().unmapped_columns == qrm_core::UnmappedColumns::Ignore);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Materializer {
    config: Config,
}

impl Materializer {
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn query<S, T>(&self, source: S, target: &mut T) -> Result<usize>
    where
        S: RowSource,
        T: Target + ?Sized,
    {
        self.query_context(&(), source, target)
    }

    pub fn query_context<C, S, T>(&self, ctx: &C, mut source: S, target: &mut T) -> Result<usize>
    where
        C: Context + ?Sized,
        S: RowSource,
        T: Target + ?Sized,
    {
        crate::qrm_profile_function!();
        let schema = cache::schema_for::<T::Item>(source.columns(), &self.config)?;
        let mut slots = vec![Value::Null; schema.columns().len()];
        let mut assembler = Assembler::new(&schema);

        let mut row = 0;
        loop {
            check(ctx, row)?;
            match source.advance() {
                Ok(true) => {}
                Ok(false) => break,
                Err(error) => return Err(QrmError::Scan { row, source: error }),
            }
            check(ctx, row)?;
            source
                .scan(&mut slots)
                .map_err(|error| QrmError::Scan { row, source: error })?;
            assembler.apply_row(target, &mut slots, row)?;
            row += 1;
        }

        let stats = assembler.stats();
        crate::qrm_trace_run!(stats.rows, stats.roots, stats.skipped);
        Ok(stats.roots)
    }
}

#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
fn check<C: Context + ?Sized>(ctx: &C, row: usize) -> Result<()> {
    ctx.check().map_err(|cancelled| {
        crate::qrm_trace_cancel!(cancelled, row);
        QrmError::Cancelled(cancelled)
    })
}

/// Builds (or fetches) the cached schema for `T` without running a query,
/// surfacing mapping errors up front.
pub fn prepare<T: Destination>(
    columns: &[String],
    config: &Config,
) -> Result<std::sync::Arc<crate::schema::Schema>> {
    Ok(cache::schema_for::<T>(columns, config)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::{Cancelled, CancellationToken};
    use crate::error::ScanError;
    use crate::source::MemoryRows;
    use crate::testing::{Author, Operation};

    fn author_rows() -> MemoryRows {
        MemoryRows::new(["author.id", "author.name", "posts.id", "posts.title"])
            .row([1.into(), "ada".into(), 10.into(), "intro".into()])
            .row([1.into(), "ada".into(), 11.into(), "engines".into()])
            .row([2.into(), "grace".into(), Value::Null, Value::Null])
    }

    #[test]
    fn returns_roots_created_by_the_call() {
        let mut authors: Vec<Author> = Vec::new();
        assert_eq!(query(author_rows(), &mut authors).unwrap(), 2);
        assert_eq!(authors[0].posts.len(), 2);

        // Appending into a non-empty target counts only new roots
        let more = MemoryRows::new(["author.id"]).row([3.into()]);
        assert_eq!(query(more, &mut authors).unwrap(), 1);
        assert_eq!(authors.len(), 3);
    }

    #[test]
    fn schema_errors_leave_target_untouched() {
        let mut authors: Vec<Author> = Vec::new();
        let rows = MemoryRows::new(["author.id", "author.email"]).row([1.into(), "x".into()]);
        let err = query(rows, &mut authors).unwrap_err();
        assert!(matches!(err, QrmError::Schema(_)));
        assert!(authors.is_empty());
    }

    #[test]
    fn scan_failure_keeps_applied_rows() {
        let mut authors: Vec<Author> = Vec::new();
        let err = query(author_rows().fail_after(2), &mut authors).unwrap_err();
        assert!(matches!(
            err,
            QrmError::Scan {
                row: 2,
                source: ScanError::Driver(_)
            }
        ));
        assert_eq!(authors.len(), 1);
        assert_eq!(authors[0].posts.len(), 2);
    }

    #[test]
    fn cancelled_context_stops_before_the_next_row() {
        let token = CancellationToken::new();
        token.cancel();
        let mut authors: Vec<Author> = Vec::new();
        let mut rows = author_rows();
        let err = query_context(&token, &mut rows, &mut authors).unwrap_err();
        assert!(matches!(err, QrmError::Cancelled(Cancelled::Requested)));
        assert!(authors.is_empty());
        assert_eq!(rows.remaining(), 3);
    }

    #[test]
    fn unmapped_columns_can_be_ignored() {
        let rows = MemoryRows::new(["operation.id", "operation.note"])
            .row([7.into(), "ignored".into()]);
        let mut operations: Vec<Operation> = Vec::new();
        let materializer = Materializer::new(Config::new().ignore_unmapped());
        assert_eq!(materializer.query(rows, &mut operations).unwrap(), 1);
        assert_eq!(operations[0].id, 7);
    }

    #[test]
    fn prepare_reports_mapping_errors() {
        let columns = vec!["author.id".to_owned(), "posts.missing".to_owned()];
        assert!(matches!(
            prepare::<Author>(&columns, &Config::default()),
            Err(QrmError::Schema(_))
        ));
    }
}
