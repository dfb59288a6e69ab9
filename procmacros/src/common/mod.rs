//! Utilities shared by the derive implementations.

mod helpers;
pub(crate) mod type_utils;

pub(crate) use helpers::extract_named_fields;
