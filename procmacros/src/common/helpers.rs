//! Shared helper functions for procedural macro code generation.

use syn::{Data, DeriveInput, Error, Field, Fields, Result};

/// Extract the named fields of a struct.
///
/// # Errors
///
/// Returns an error if:
/// - The input is a tuple or unit struct (fields are matched by name)
/// - The input is not a struct (enum or union)
pub(crate) fn extract_named_fields<'a>(
    input: &'a DeriveInput,
    derive: &str,
) -> Result<&'a syn::punctuated::Punctuated<Field, syn::token::Comma>> {
    let struct_name = &input.ident;
    match &input.data {
        Data::Struct(data_struct) => match &data_struct.fields {
            Fields::Named(fields) => Ok(&fields.named),
            Fields::Unnamed(_) => Err(Error::new_spanned(
                struct_name,
                format!("{derive} cannot be derived for tuple structs: fields are matched by name"),
            )),
            Fields::Unit => Err(Error::new_spanned(
                struct_name,
                format!("{derive} cannot be derived for unit structs"),
            )),
        },
        _ => Err(Error::new_spanned(
            struct_name,
            format!("{derive} can only be derived for structs"),
        )),
    }
}
