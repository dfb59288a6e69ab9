//! Shared helpers for inspecting `syn::Type` without stringification.

use syn::{GenericArgument, Path, PathArguments, Type};

fn last_path_ident(path: &Path) -> Option<&syn::Ident> {
    path.segments.last().map(|seg| &seg.ident)
}

fn type_path(ty: &Type) -> Option<&Path> {
    if let Type::Path(type_path) = ty {
        Some(&type_path.path)
    } else {
        None
    }
}

/// First type argument of `Wrapper<T>` when the last path segment is `wrapper`.
fn generic_inner<'a>(ty: &'a Type, wrapper: &str) -> Option<&'a Type> {
    let path = type_path(ty)?;
    let segment = path.segments.last()?;
    if segment.ident != wrapper {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    args.args.iter().find_map(|arg| {
        if let GenericArgument::Type(inner) = arg {
            Some(inner)
        } else {
            None
        }
    })
}

pub(crate) fn option_inner_type(ty: &Type) -> Option<&Type> {
    generic_inner(ty, "Option")
}

pub(crate) fn vec_inner_type(ty: &Type) -> Option<&Type> {
    generic_inner(ty, "Vec")
}

fn type_is(ty: &Type, ident: &str) -> bool {
    type_path(ty)
        .and_then(last_path_ident)
        .is_some_and(|id| id == ident)
}

pub(crate) fn type_is_vec_u8(ty: &Type) -> bool {
    vec_inner_type(ty).is_some_and(|inner| type_is(inner, "u8"))
}

/// Types with a built-in `FromValue` impl.
const SCALAR_IDENTS: &[&str] = &[
    "i8",
    "i16",
    "i32",
    "i64",
    "isize",
    "u8",
    "u16",
    "u32",
    "u64",
    "usize",
    "f32",
    "f64",
    "bool",
    "String",
    "CompactString",
    "NaiveDate",
    "NaiveTime",
    "NaiveDateTime",
    "DateTime",
    "Uuid",
    "Value",
];

/// Whether `ty` is a scalar the materializer coerces into directly.
///
/// Anything that is not a plain path (arrays, tuples, references) is treated
/// as scalar too, so the missing `FromValue` impl is what gets reported.
pub(crate) fn type_is_known_scalar(ty: &Type) -> bool {
    if type_is_vec_u8(ty) {
        return true;
    }
    match type_path(ty).and_then(last_path_ident) {
        Some(ident) => SCALAR_IDENTS.iter().any(|name| ident == name),
        None => !matches!(ty, Type::Path(_)),
    }
}
