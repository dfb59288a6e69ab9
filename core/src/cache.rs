//! Process-wide schema cache.
//!
//! Keyed by destination type, the ordered column alias list and the
//! [`Config`]. Each key owns a `OnceLock` cell: concurrent misses for the same
//! key agree on one cell, exactly one of them builds, and all of them observe
//! the same `Arc<Schema>` (or the same error). Entries are never evicted.

use std::any::TypeId;
use std::sync::{Arc, LazyLock, OnceLock, PoisonError, RwLock};

use hashbrown::{Equivalent, HashMap};

use crate::config::Config;
use crate::descriptor::Destination;
use crate::error::SchemaError;
use crate::schema::Schema;

type Built = Result<Arc<Schema>, SchemaError>;
type Cell = Arc<OnceLock<Built>>;

#[derive(Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    type_id: TypeId,
    columns: Box<[String]>,
    config: Config,
}

/// Borrowed lookup key; hashes like [`CacheKey`].
#[derive(Hash)]
struct CacheKeyRef<'a> {
    type_id: TypeId,
    columns: &'a [String],
    config: &'a Config,
}

impl Equivalent<CacheKey> for CacheKeyRef<'_> {
    fn equivalent(&self, key: &CacheKey) -> bool {
        self.type_id == key.type_id && *self.columns == *key.columns && *self.config == key.config
    }
}

static CACHE: LazyLock<RwLock<HashMap<CacheKey, Cell>>> = LazyLock::new(Default::default);

fn cell(lookup: CacheKeyRef<'_>) -> Cell {
    if let Some(cell) = CACHE
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .get(&lookup)
    {
        return Arc::clone(cell);
    }

    let mut cache = CACHE.write().unwrap_or_else(PoisonError::into_inner);
    if let Some(cell) = cache.get(&lookup) {
        return Arc::clone(cell);
    }
    let cell = Cell::default();
    cache.insert(
        CacheKey {
            type_id: lookup.type_id,
            columns: lookup.columns.into(),
            config: *lookup.config,
        },
        Arc::clone(&cell),
    );
    cell
}

/// Returns the schema for `T` under `columns`, building it on first use.
pub fn schema_for<T: Destination>(columns: &[String], config: &Config) -> Built {
    let record = T::descriptor();
    let cell = cell(CacheKeyRef {
        type_id: TypeId::of::<T>(),
        columns,
        config,
    });

    if let Some(built) = cell.get() {
        crate::qrm_trace_schema!("hit", record.name, columns.len());
        return built.clone();
    }

    cell.get_or_init(|| {
        crate::qrm_trace_schema!("miss", record.name, columns.len());
        let built = Schema::build(record, columns, config).map(Arc::new);
        #[cfg(feature = "tracing")]
        if let Err(error) = &built {
            tracing::debug!(record = record.name, %error, "qrm.schema.failed");
        }
        built
    })
    .clone()
}

/// Number of cached (type, alias list, config) entries.
pub fn len() -> usize {
    CACHE.read().unwrap_or_else(PoisonError::into_inner).len()
}
