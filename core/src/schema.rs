//! Destination schema: the tree of nodes reached by a query's column aliases
//! and the binding of every column to a scalar field on one node.
//!
//! Built once per (destination type, alias list, config) and cached, see
//! [`crate::cache`]. Every mapping defect is reported here, before the first
//! row is scanned.

use smallvec::SmallVec;

use crate::config::{Config, UnmappedColumns};
use crate::descriptor::{Cardinality, FieldDescriptor, FieldKind, RecordDescriptor};
use crate::error::SchemaError;
use crate::path::AliasPath;
use crate::value::ScalarKind;

pub type NodeId = usize;

/// The root node always has id 0.
pub const ROOT: NodeId = 0;

/// A column bound to a scalar field of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Binding {
    pub column: usize,
    pub field: usize,
    pub kind: ScalarKind,
}

/// One destination record type at one path.
#[derive(Debug)]
pub struct SchemaNode {
    path: String,
    record: &'static RecordDescriptor,
    parent: Option<NodeId>,
    field: usize,
    cardinality: Cardinality,
    children: SmallVec<[NodeId; 4]>,
    bindings: SmallVec<[Binding; 8]>,
    key_columns: SmallVec<[usize; 2]>,
}

impl SchemaNode {
    fn new(
        path: String,
        record: &'static RecordDescriptor,
        parent: Option<NodeId>,
        field: usize,
        cardinality: Cardinality,
    ) -> Self {
        Self {
            path,
            record,
            parent,
            field,
            cardinality,
            children: SmallVec::new(),
            bindings: SmallVec::new(),
            key_columns: SmallVec::new(),
        }
    }

    /// Dotted path from the root, using field names.
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn record(&self) -> &'static RecordDescriptor {
        self.record
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Index of this node's field in the parent's descriptor.
    pub fn field(&self) -> usize {
        self.field
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn bindings(&self) -> &[Binding] {
        &self.bindings
    }

    /// Columns holding this node's primary-key values, in column order.
    pub fn key_columns(&self) -> &[usize] {
        &self.key_columns
    }

    pub fn is_keyed(&self) -> bool {
        !self.key_columns.is_empty()
    }
}

#[derive(Debug)]
pub struct Schema {
    columns: Box<[String]>,
    nodes: Vec<SchemaNode>,
    column_bindings: Box<[Option<(NodeId, usize)>]>,
}

impl Schema {
    pub fn build(
        root: &'static RecordDescriptor,
        columns: &[String],
        config: &Config,
    ) -> Result<Self, SchemaError> {
        crate::qrm_profile_scope!("qrm", "schema_build");

        let mut builder = SchemaBuilder::new(root, columns.len());
        for (index, column) in columns.iter().enumerate() {
            let resolved = AliasPath::parse(column).and_then(|alias| resolve(root, &alias));
            match resolved {
                Ok((steps, field)) => builder.bind(index, columns, &steps, field)?,
                Err(error)
                    if config.unmapped_columns == UnmappedColumns::Ignore
                        && is_unmapped(&error) => {}
                Err(error) => return Err(error),
            }
        }

        let schema = builder.finish(columns)?;
        Ok(schema)
    }

    pub fn root(&self) -> &SchemaNode {
        &self.nodes[ROOT]
    }

    pub fn node(&self, id: NodeId) -> &SchemaNode {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> &[SchemaNode] {
        &self.nodes
    }

    /// Finds a node by its dotted field path (`"operation.from.owner"`).
    pub fn find(&self, path: &str) -> Option<&SchemaNode> {
        self.nodes.iter().find(|node| node.path == path)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn column(&self, index: usize) -> &str {
        &self.columns[index]
    }

    /// The node and scalar field a column is bound to; `None` for ignored
    /// columns.
    pub fn binding(&self, column: usize) -> Option<(&SchemaNode, &'static FieldDescriptor)> {
        let (node, field) = (*self.column_bindings.get(column)?)?;
        let node = &self.nodes[node];
        Some((node, &node.record.fields[field]))
    }
}

fn is_unmapped(error: &SchemaError) -> bool {
    matches!(
        error,
        SchemaError::MalformedAlias(_)
            | SchemaError::UnknownStep { .. }
            | SchemaError::UnknownField { .. }
    )
}

fn nested_target(field: &FieldDescriptor) -> Option<&'static RecordDescriptor> {
    match field.kind {
        FieldKind::Nested { record, .. } => Some(record()),
        FieldKind::Scalar { .. } => None,
    }
}

/// Walks the descriptors along `alias` without touching the node tree,
/// returning the nested field index per step and the scalar field index.
fn resolve(
    root: &'static RecordDescriptor,
    alias: &AliasPath<'_>,
) -> Result<(SmallVec<[usize; 4]>, usize), SchemaError> {
    let column = alias.as_str();
    let mut steps = alias.steps();
    // The first step may name the root record itself
    if let Some((first, rest)) = steps.split_first()
        && root.matches(first)
    {
        steps = rest;
    }

    let mut record = root;
    let mut fields = SmallVec::new();
    for step in steps {
        let field = nested_field(record, step, column)?;
        record = nested_target(&record.fields[field]).ok_or_else(|| SchemaError::UnknownStep {
            column: column.to_owned(),
            record: record.name,
            step: (*step).to_owned(),
        })?;
        fields.push(field);
    }

    let field = record
        .scalar_field(alias.field())
        .ok_or_else(|| SchemaError::UnknownField {
            column: column.to_owned(),
            record: record.name,
            field: alias.field().to_owned(),
        })?;
    Ok((fields, field))
}

/// Field name or alias first, then a unique match on the nested type name.
fn nested_field(
    record: &'static RecordDescriptor,
    step: &str,
    column: &str,
) -> Result<usize, SchemaError> {
    if let Some(field) = record.nested_by_name(step) {
        return Ok(field);
    }

    let mut candidates = record.nested_by_type(step);
    match (candidates.next(), candidates.next()) {
        (Some(field), None) => Ok(field),
        (Some(_), Some(_)) => Err(SchemaError::AmbiguousStep {
            column: column.to_owned(),
            record: record.name,
            step: step.to_owned(),
        }),
        (None, _) => Err(SchemaError::UnknownStep {
            column: column.to_owned(),
            record: record.name,
            step: step.to_owned(),
        }),
    }
}

struct SchemaBuilder {
    nodes: Vec<SchemaNode>,
    column_bindings: Vec<Option<(NodeId, usize)>>,
}

impl SchemaBuilder {
    fn new(root: &'static RecordDescriptor, columns: usize) -> Self {
        let path = root.alias.unwrap_or(root.name).to_owned();
        Self {
            nodes: vec![SchemaNode::new(path, root, None, 0, Cardinality::Many)],
            column_bindings: vec![None; columns],
        }
    }

    /// Returns the node for `steps`, creating missing nodes along the way.
    fn intern(&mut self, steps: &[usize]) -> NodeId {
        let mut node = ROOT;
        for &field in steps {
            let existing = self.nodes[node]
                .children
                .iter()
                .copied()
                .find(|&child| self.nodes[child].field == field);
            node = match existing {
                Some(child) => child,
                None => self.push_child(node, field),
            };
        }
        node
    }

    fn push_child(&mut self, parent: NodeId, field: usize) -> NodeId {
        let descriptor = &self.nodes[parent].record.fields[field];
        let FieldKind::Nested {
            cardinality,
            record,
        } = descriptor.kind
        else {
            unreachable!("resolve only yields nested fields as steps");
        };

        let id = self.nodes.len();
        let path = format!("{}.{}", self.nodes[parent].path, descriptor.name);
        self.nodes
            .push(SchemaNode::new(path, record(), Some(parent), field, cardinality));
        self.nodes[parent].children.push(id);
        id
    }

    fn bind(
        &mut self,
        column: usize,
        columns: &[String],
        steps: &[usize],
        field: usize,
    ) -> Result<(), SchemaError> {
        let node_id = self.intern(steps);
        let node = &mut self.nodes[node_id];
        let record = node.record;
        let descriptor = &record.fields[field];

        if let Some(previous) = node.bindings.iter().find(|b| b.field == field) {
            return Err(SchemaError::DuplicateColumn {
                column: columns[column].clone(),
                previous: columns[previous.column].clone(),
                path: node.path.clone(),
                field: descriptor.name,
            });
        }

        let Some(kind) = descriptor.scalar_kind() else {
            return Err(SchemaError::FieldAccess {
                record: record.name,
                field,
            });
        };

        node.bindings.push(Binding {
            column,
            field,
            kind,
        });
        if descriptor.primary_key {
            node.key_columns.push(column);
        }
        self.column_bindings[column] = Some((node_id, field));
        Ok(())
    }

    fn finish(self, columns: &[String]) -> Result<Schema, SchemaError> {
        for node in &self.nodes {
            let has_many_child = node
                .children
                .iter()
                .any(|&child| self.nodes[child].cardinality.is_many());
            if has_many_child && !node.is_keyed() {
                return Err(SchemaError::MissingPrimaryKey {
                    path: node.path.clone(),
                    record: node.record.name,
                });
            }

            // A node that binds anything binds its whole declared key
            let unbound_key = node.record.fields.iter().enumerate().find(|(index, field)| {
                field.primary_key && !node.bindings.iter().any(|b| b.field == *index)
            });
            if let Some((_, field)) = unbound_key
                && !node.bindings.is_empty()
            {
                return Err(SchemaError::PartialPrimaryKey {
                    path: node.path.clone(),
                    record: node.record.name,
                    field: field.name,
                });
            }
        }

        Ok(Schema {
            columns: columns.into(),
            nodes: self.nodes,
            column_bindings: self.column_bindings.into_boxed_slice(),
        })
    }
}
