//! Field-descriptor capability implemented per destination type.
//!
//! `#[derive(Destination)]` produces two things for a struct:
//!
//! - a static [`RecordDescriptor`] listing every field with its declared
//!   scalar kind or nested record, cardinality and primary-key flag;
//! - an object-safe [`Record`] visitor that writes a scalar by field index and
//!   hands out the nested container behind a field index.
//!
//! The schema builder only reads descriptors; the assembler only talks to
//! `dyn Record`, so no type information is needed once the schema exists.

use crate::error::CoercionError;
use crate::value::{ScalarKind, Value};

/// Reflective description of one destination record type.
#[derive(Debug)]
pub struct RecordDescriptor {
    /// Snake-case type name, matched against alias segments.
    pub name: &'static str,
    /// Explicit name override (`#[qrm(alias = "...")]` on the struct).
    pub alias: Option<&'static str>,
    pub fields: &'static [FieldDescriptor],
}

#[derive(Debug)]
pub struct FieldDescriptor {
    pub name: &'static str,
    /// Explicit name override (`#[qrm(alias = "...")]` on the field).
    pub alias: Option<&'static str>,
    pub primary_key: bool,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    Scalar {
        kind: ScalarKind,
        nullable: bool,
    },
    Nested {
        cardinality: Cardinality,
        record: fn() -> &'static RecordDescriptor,
    },
}

/// Shape of a nested field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    /// `T` — always present, zero-initialized until a row fills it.
    One,
    /// `Option<T>` — `None` until a row carries the entity.
    Optional,
    /// `Vec<T>` — grows in first-seen order.
    Many,
}

impl Cardinality {
    pub fn is_many(self) -> bool {
        matches!(self, Cardinality::Many)
    }
}

/// Case-insensitive comparison that ignores `_`, so `OrderItem`,
/// `order_item` and `ORDERITEM` are the same name.
pub fn names_match(a: &str, b: &str) -> bool {
    let mut left = a.chars().filter(|c| *c != '_');
    let mut right = b.chars().filter(|c| *c != '_');
    loop {
        match (left.next(), right.next()) {
            (None, None) => return true,
            (Some(l), Some(r)) if l.eq_ignore_ascii_case(&r) => {}
            _ => return false,
        }
    }
}

impl RecordDescriptor {
    pub fn field(&self, index: usize) -> Option<&'static FieldDescriptor> {
        self.fields.get(index)
    }

    /// Whether an alias segment names this record type.
    pub fn matches(&self, segment: &str) -> bool {
        match self.alias {
            Some(alias) => names_match(alias, segment),
            None => names_match(self.name, segment),
        }
    }

    pub fn scalar_field(&self, segment: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|field| !field.is_nested() && field.matches(segment))
    }

    /// Nested fields whose own name (or alias) matches `segment`.
    pub fn nested_by_name(&self, segment: &str) -> Option<usize> {
        self.fields
            .iter()
            .position(|field| field.is_nested() && field.matches(segment))
    }

    /// Nested fields whose target record type matches `segment`.
    pub fn nested_by_type<'a>(&'a self, segment: &'a str) -> impl Iterator<Item = usize> + 'a {
        self.fields
            .iter()
            .enumerate()
            .filter_map(move |(index, field)| match field.kind {
                FieldKind::Nested { record, .. } if record().matches(segment) => Some(index),
                _ => None,
            })
    }

    pub fn has_primary_key(&self) -> bool {
        self.fields.iter().any(|field| field.primary_key)
    }
}

impl FieldDescriptor {
    pub fn is_nested(&self) -> bool {
        matches!(self.kind, FieldKind::Nested { .. })
    }

    pub fn matches(&self, segment: &str) -> bool {
        names_match(self.alias.unwrap_or(self.name), segment)
    }

    pub fn scalar_kind(&self) -> Option<ScalarKind> {
        match self.kind {
            FieldKind::Scalar { kind, .. } => Some(kind),
            FieldKind::Nested { .. } => None,
        }
    }
}

/// Object-safe access to one destination instance.
pub trait Record {
    /// Coerces `value` into the scalar field at `field`.
    fn set_field(&mut self, field: usize, value: Value) -> Result<(), CoercionError>;

    /// The nested container behind the field at `field`, if it is nested.
    fn child_mut(&mut self, field: usize) -> Option<Child<'_>>;
}

/// A destination record type with a static descriptor.
///
/// Implement with `#[derive(Destination)]`.
#[diagnostic::on_unimplemented(
    message = "`{Self}` cannot be materialized from query rows",
    label = "this type does not implement Destination",
    note = "derive #[derive(Destination)] on the struct"
)]
pub trait Destination: Record + Default + 'static {
    fn descriptor() -> &'static RecordDescriptor;
}

/// Mutable view of a nested field.
pub enum Child<'a> {
    One(&'a mut dyn Record),
    Optional(&'a mut dyn OptionalSlot),
    Many(&'a mut dyn ManySlot),
}

/// `Option<T>` nested field.
pub trait OptionalSlot {
    fn is_set(&self) -> bool;
    fn get_or_insert_default(&mut self) -> &mut dyn Record;
}

impl<T: Destination> OptionalSlot for Option<T> {
    fn is_set(&self) -> bool {
        self.is_some()
    }

    fn get_or_insert_default(&mut self) -> &mut dyn Record {
        self.get_or_insert_with(T::default)
    }
}

/// `Vec<T>` nested field.
pub trait ManySlot {
    fn entry_count(&self) -> usize;

    /// Appends a zero-initialized instance and returns its index.
    fn push_default(&mut self) -> usize;

    fn entry_mut(&mut self, index: usize) -> Option<&mut dyn Record>;
}

impl<T: Destination> ManySlot for Vec<T> {
    fn entry_count(&self) -> usize {
        self.len()
    }

    fn push_default(&mut self) -> usize {
        self.push(T::default());
        self.len() - 1
    }

    fn entry_mut(&mut self, index: usize) -> Option<&mut dyn Record> {
        self.as_mut_slice()
            .get_mut(index)
            .map(|item| item as &mut dyn Record)
    }
}

/// Root container handed to [`query`](crate::query::query).
///
/// `Vec<T>` collects every root entity; `Option<T>` keeps the first one and
/// skips rows that belong to any other root.
pub trait Target {
    type Item: Destination;

    /// Whether the container holds at most one root.
    const SINGLE: bool;

    /// Appends (or installs) a zero-initialized root and returns its index.
    fn push_root(&mut self) -> usize;

    fn root_mut(&mut self, index: usize) -> Option<&mut dyn Record>;
}

impl<T: Destination> Target for Vec<T> {
    type Item = T;
    const SINGLE: bool = false;

    fn push_root(&mut self) -> usize {
        self.push_default()
    }

    fn root_mut(&mut self, index: usize) -> Option<&mut dyn Record> {
        self.entry_mut(index)
    }
}

impl<T: Destination> Target for Option<T> {
    type Item = T;
    const SINGLE: bool = true;

    fn push_root(&mut self) -> usize {
        *self = Some(T::default());
        0
    }

    fn root_mut(&mut self, index: usize) -> Option<&mut dyn Record> {
        match self {
            Some(item) if index == 0 => Some(item as &mut dyn Record),
            _ => None,
        }
    }
}
