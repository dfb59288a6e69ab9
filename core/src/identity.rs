//! Entity identity and the run-scoped registry of constructed instances.
//!
//! An instance is identified by the schema node it belongs to, the instance
//! it hangs under, and its [`EntityKey`]. Including the parent keeps the
//! relational meaning of a join: the same tag under two posts is two
//! entries, one in each post's container.

use compact_str::CompactString;
use hashbrown::{Equivalent, HashMap};
use smallvec::SmallVec;

use crate::schema::{NodeId, SchemaNode};
use crate::value::Value;

/// One primary-key value. Equality is value and kind.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyPart {
    Integer(i64),
    /// Compared bitwise
    Real(u64),
    Text(CompactString),
    Blob(Box<[u8]>),
    Bool(bool),
}

impl KeyPart {
    /// `None` for NULL.
    pub fn from_value(value: &Value) -> Option<Self> {
        Some(match value {
            Value::Null => return None,
            Value::Integer(i) => KeyPart::Integer(*i),
            Value::Real(r) => KeyPart::Real(r.to_bits()),
            Value::Text(s) => KeyPart::Text(CompactString::from(s.as_str())),
            Value::Blob(b) => KeyPart::Blob(b.as_slice().into()),
            Value::Bool(b) => KeyPart::Bool(*b),
        })
    }
}

/// Ordered primary-key tuple of one node at one row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EntityKey(SmallVec<[KeyPart; 2]>);

impl EntityKey {
    pub fn parts(&self) -> &[KeyPart] {
        &self.0
    }
}

impl FromIterator<KeyPart> for EntityKey {
    fn from_iter<I: IntoIterator<Item = KeyPart>>(iter: I) -> Self {
        EntityKey(iter.into_iter().collect())
    }
}

/// What a row says about one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// Outer-join miss: the node and its subtree are skipped for the row.
    Absent,
    Key(EntityKey),
    /// No primary key is bound; the node cannot be deduplicated.
    Unkeyed,
}

impl Identity {
    pub fn of(node: &SchemaNode, row: &[Value]) -> Self {
        if node.is_keyed() {
            let key: Option<EntityKey> = node
                .key_columns()
                .iter()
                .map(|&column| KeyPart::from_value(&row[column]))
                .collect();
            return key.map_or(Identity::Absent, Identity::Key);
        }

        let bindings = node.bindings();
        if !bindings.is_empty() && bindings.iter().all(|b| row[b.column].is_null()) {
            Identity::Absent
        } else {
            Identity::Unkeyed
        }
    }
}

/// Run-scoped instance id. `InstanceId::ROOT` is the parent of root entities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InstanceId(usize);

impl InstanceId {
    pub const ROOT: InstanceId = InstanceId(0);
}

/// Position of a registered instance inside its container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub id: InstanceId,
    pub index: usize,
}

/// The instance occupying a to-one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneSlot {
    pub id: InstanceId,
    pub key: Option<EntityKey>,
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct ManyKey {
    node: NodeId,
    parent: InstanceId,
    key: EntityKey,
}

/// Borrowed form of [`ManyKey`]; hashes identically.
#[derive(Hash)]
struct ManyKeyRef<'a> {
    node: NodeId,
    parent: InstanceId,
    key: &'a EntityKey,
}

impl Equivalent<ManyKey> for ManyKeyRef<'_> {
    fn equivalent(&self, other: &ManyKey) -> bool {
        self.node == other.node && self.parent == other.parent && *self.key == other.key
    }
}

#[derive(Debug, Default)]
pub struct EntityRegistry {
    many: HashMap<ManyKey, Slot>,
    one: HashMap<(NodeId, InstanceId), OneSlot>,
    allocated: usize,
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh id for an instance that is not registered by key.
    pub fn allocate(&mut self) -> InstanceId {
        self.allocated += 1;
        InstanceId(self.allocated)
    }

    pub fn get_many(&self, node: NodeId, parent: InstanceId, key: &EntityKey) -> Option<Slot> {
        self.many
            .get(&ManyKeyRef { node, parent, key })
            .copied()
    }

    /// Registers an instance appended at `index` of a root or to-many container.
    pub fn insert_many(
        &mut self,
        node: NodeId,
        parent: InstanceId,
        key: EntityKey,
        index: usize,
    ) -> Slot {
        let slot = Slot {
            id: self.allocate(),
            index,
        };
        self.many.insert(ManyKey { node, parent, key }, slot);
        slot
    }

    pub fn get_one(&self, node: NodeId, parent: InstanceId) -> Option<&OneSlot> {
        self.one.get(&(node, parent))
    }

    pub fn insert_one(
        &mut self,
        node: NodeId,
        parent: InstanceId,
        key: Option<EntityKey>,
    ) -> InstanceId {
        let id = self.allocate();
        self.one.insert((node, parent), OneSlot { id, key });
        id
    }

    /// Number of instances created in this run.
    pub fn len(&self) -> usize {
        self.allocated
    }

    pub fn is_empty(&self) -> bool {
        self.allocated == 0
    }
}
