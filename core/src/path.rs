//! Column alias paths: `segment(.segment)*`.
//!
//! Every segment but the last selects a nested destination field; the last
//! one names a scalar field. The statement builder emits these aliases
//! (`SELECT account.id AS "from.id"`), and they are the only channel that
//! carries the join shape to the materializer.

use core::fmt;

use smallvec::SmallVec;

use crate::error::SchemaError;

pub const SEPARATOR: char = '.';

/// A parsed column alias.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AliasPath<'a> {
    raw: &'a str,
    segments: SmallVec<[&'a str; 4]>,
}

impl<'a> AliasPath<'a> {
    pub fn parse(alias: &'a str) -> Result<Self, SchemaError> {
        let segments: SmallVec<[&'a str; 4]> = alias.split(SEPARATOR).collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(SchemaError::MalformedAlias(alias.to_owned()));
        }
        Ok(Self {
            raw: alias,
            segments,
        })
    }

    pub fn as_str(&self) -> &'a str {
        self.raw
    }

    /// Nesting steps, every segment but the last.
    pub fn steps(&self) -> &[&'a str] {
        &self.segments[..self.segments.len() - 1]
    }

    /// The scalar field segment.
    pub fn field(&self) -> &'a str {
        self.segments[self.segments.len() - 1]
    }

    pub fn depth(&self) -> usize {
        self.segments.len() - 1
    }
}

impl fmt::Display for AliasPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.raw)
    }
}

/// Joins nesting steps and a field into a column alias, for statement
/// builders emitting `AS "from.entity.id"`.
pub fn path<S: AsRef<str>>(steps: &[S], field: &str) -> String {
    let mut alias = String::with_capacity(
        steps.iter().map(|s| s.as_ref().len() + 1).sum::<usize>() + field.len(),
    );
    for step in steps {
        alias.push_str(step.as_ref());
        alias.push(SEPARATOR);
    }
    alias.push_str(field);
    alias
}
