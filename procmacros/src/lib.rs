#![recursion_limit = "128"]

extern crate proc_macro;

mod common;
mod destination;
mod paths;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Derives `Destination` (and `Record`) for a struct, making it a target of
/// the result materializer.
///
/// Field types decide how a field is filled:
/// - Scalars (integers, floats, `bool`, `String`, `Vec<u8>`, chrono and uuid
///   types, and their `Option`s) are read from a single column.
/// - `Vec<T>` is a to-many relation, `Option<T>` an optional to-one and any
///   other struct a to-one. `T` must derive `Destination` too.
///
/// # Attributes
///
/// On the struct:
/// - `#[qrm(alias = "op")]` names the first alias segment for this record.
/// - `#[qrm(crate = "qrm_core")]` changes the path the generated code uses.
///
/// On fields:
/// - `#[qrm(primary_key)]` (or `primary`) marks an identity column.
/// - `#[qrm(alias = "from")]` matches a different alias segment.
/// - `#[qrm(nested)]` / `#[qrm(scalar)]` override the type-based guess.
/// - `#[qrm(skip)]` leaves the field at its default.
///
/// # Example
///
/// ```ignore
/// #[derive(Debug, Default, Destination)]
/// struct Author {
///     #[qrm(primary_key)]
///     id: i64,
///     name: String,
///     posts: Vec<Post>,
/// }
///
/// #[derive(Debug, Default, Destination)]
/// struct Post {
///     #[qrm(primary_key)]
///     id: i64,
///     title: String,
/// }
///
/// // SELECT a.id AS "author.id", a.name AS "author.name",
/// //        p.id AS "author.posts.id", p.title AS "author.posts.title" ...
/// ```
#[proc_macro_derive(Destination, attributes(qrm))]
pub fn derive_destination(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match destination::generate_destination_impl(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}
