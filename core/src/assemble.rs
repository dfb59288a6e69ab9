//! Graph assembly: folds one scanned row at a time into the caller's target.
//!
//! For every row the schema tree is walked from the root. Each node's
//! [`Identity`] is read from the row first; an absent node prunes its
//! subtree, a known key reuses the registered instance, and anything else
//! allocates a new instance in the parent's container. Scalars are then moved
//! out of the row into the instance, so every column is consumed at most once.

use core::mem;

use crate::descriptor::{Child, Record, Target};
use crate::error::QrmError;
use crate::identity::{EntityRegistry, Identity, InstanceId};
use crate::schema::{NodeId, ROOT, Schema};
use crate::value::Value;

/// Per-run counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Rows handed to the assembler.
    pub rows: usize,
    /// Root entities created by this run.
    pub roots: usize,
    /// Rows whose root was absent or outside a single-root target.
    pub skipped: usize,
}

pub(crate) struct Assembler<'s> {
    schema: &'s Schema,
    registry: EntityRegistry,
    stats: RunStats,
    has_root: bool,
}

fn missing_entry(record: &'static str, index: usize, row: usize) -> QrmError {
    QrmError::Record { record, index, row }
}

impl<'s> Assembler<'s> {
    pub(crate) fn new(schema: &'s Schema) -> Self {
        Self {
            schema,
            registry: EntityRegistry::new(),
            stats: RunStats::default(),
            has_root: false,
        }
    }

    pub(crate) fn stats(&self) -> RunStats {
        self.stats
    }

    /// Applies one row. `row` is drained of every bound value that was used.
    pub(crate) fn apply_row<T: Target + ?Sized>(
        &mut self,
        target: &mut T,
        row: &mut [Value],
        row_index: usize,
    ) -> Result<(), QrmError> {
        crate::qrm_profile_scope!("qrm", "apply_row");
        self.stats.rows += 1;

        let schema = self.schema;
        let root = schema.root();
        let (id, index) = match Identity::of(root, row) {
            Identity::Absent => {
                crate::qrm_trace_skip!("root_absent", root.path(), row_index);
                self.stats.skipped += 1;
                return Ok(());
            }
            Identity::Key(key) => match self.registry.get_many(ROOT, InstanceId::ROOT, &key) {
                Some(slot) => (slot.id, slot.index),
                None => {
                    if T::SINGLE && self.has_root {
                        crate::qrm_trace_skip!("extra_root", root.path(), row_index);
                        self.stats.skipped += 1;
                        return Ok(());
                    }
                    let index = self.push_root(target);
                    let slot = self.registry.insert_many(ROOT, InstanceId::ROOT, key, index);
                    (slot.id, slot.index)
                }
            },
            Identity::Unkeyed => {
                if T::SINGLE && self.has_root {
                    crate::qrm_trace_skip!("extra_root", root.path(), row_index);
                    self.stats.skipped += 1;
                    return Ok(());
                }
                let index = self.push_root(target);
                (self.registry.allocate(), index)
            }
        };

        let record = target
            .root_mut(index)
            .ok_or_else(|| missing_entry(root.record().name, index, row_index))?;
        self.fill(ROOT, id, record, row, row_index)
    }

    fn push_root<T: Target + ?Sized>(&mut self, target: &mut T) -> usize {
        self.has_root = true;
        self.stats.roots += 1;
        target.push_root()
    }

    fn fill(
        &mut self,
        node_id: NodeId,
        instance: InstanceId,
        record: &mut dyn Record,
        row: &mut [Value],
        row_index: usize,
    ) -> Result<(), QrmError> {
        let schema = self.schema;
        let node = schema.node(node_id);

        for binding in node.bindings() {
            let value = mem::take(&mut row[binding.column]);
            record
                .set_field(binding.field, value)
                .map_err(|source| QrmError::Coercion {
                    column: schema.column(binding.column).to_owned(),
                    row: row_index,
                    source,
                })?;
        }

        for &child_id in node.children() {
            let child = schema.node(child_id);
            let identity = Identity::of(child, row);
            if identity == Identity::Absent {
                continue;
            }

            let container = record
                .child_mut(child.field())
                .ok_or_else(|| missing_entry(node.record().name, child.field(), row_index))?;

            match container {
                Child::Many(entries) => {
                    let (id, index) = match identity {
                        Identity::Key(key) => {
                            match self.registry.get_many(child_id, instance, &key) {
                                Some(slot) => (slot.id, slot.index),
                                None => {
                                    let index = entries.push_default();
                                    let slot =
                                        self.registry.insert_many(child_id, instance, key, index);
                                    (slot.id, slot.index)
                                }
                            }
                        }
                        _ => (self.registry.allocate(), entries.push_default()),
                    };
                    let entry = entries
                        .entry_mut(index)
                        .ok_or_else(|| missing_entry(child.record().name, index, row_index))?;
                    self.fill(child_id, id, entry, row, row_index)?;
                }
                Child::One(entry) => {
                    if let Some(id) = self.claim_one(child_id, instance, identity, row_index) {
                        self.fill(child_id, id, entry, row, row_index)?;
                    }
                }
                Child::Optional(slot) => {
                    if let Some(id) = self.claim_one(child_id, instance, identity, row_index) {
                        self.fill(child_id, id, slot.get_or_insert_default(), row, row_index)?;
                    }
                }
            }
        }
        Ok(())
    }

    /// First key wins: a to-one slot already holding a different key keeps it
    /// and the row's values for that subtree are dropped. Unkeyed slots are
    /// claimed once and then overwritten by every later row.
    #[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
    fn claim_one(
        &mut self,
        node: NodeId,
        parent: InstanceId,
        identity: Identity,
        row_index: usize,
    ) -> Option<InstanceId> {
        let key = match identity {
            Identity::Absent => return None,
            Identity::Key(key) => Some(key),
            Identity::Unkeyed => None,
        };

        match self.registry.get_one(node, parent) {
            None => Some(self.registry.insert_one(node, parent, key)),
            Some(slot) if slot.key == key => Some(slot.id),
            Some(_) => {
                crate::qrm_trace_skip!(
                    "to_one_key_conflict",
                    self.schema.node(node).path(),
                    row_index
                );
                None
            }
        }
    }
}
