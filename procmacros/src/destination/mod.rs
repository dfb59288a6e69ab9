//! `#[derive(Destination)]`: the static field descriptor plus the `Record`
//! visitor used by the materializer.

mod attributes;

use heck::ToSnakeCase;
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::ext::IdentExt;
use syn::{DeriveInput, Error, Result, Type};

use crate::common::extract_named_fields;
use crate::common::type_utils::{
    option_inner_type, type_is_known_scalar, type_is_vec_u8, vec_inner_type,
};
use crate::paths::Paths;
use attributes::{FieldAttrs, RecordAttrs};

/// How a field is filled from rows.
enum Shape<'a> {
    Scalar,
    One(&'a Type),
    Optional(&'a Type),
    Many(&'a Type),
}

impl Shape<'_> {
    fn variant(&self) -> Option<syn::Ident> {
        let name = match self {
            Shape::Scalar => return None,
            Shape::One(_) => "One",
            Shape::Optional(_) => "Optional",
            Shape::Many(_) => "Many",
        };
        Some(format_ident!("{}", name))
    }

    fn record_type(&self) -> Option<&Type> {
        match self {
            Shape::Scalar => None,
            Shape::One(ty) | Shape::Optional(ty) | Shape::Many(ty) => Some(ty),
        }
    }
}

/// `Vec<u8>` and known scalar types are scalars, `Vec<T>` is to-many,
/// `Option<T>` optional to-one and any other path to-one. `#[qrm(nested)]`
/// and `#[qrm(scalar)]` override the guess.
fn classify<'a>(ty: &'a Type, attrs: &FieldAttrs) -> Shape<'a> {
    if attrs.scalar {
        return Shape::Scalar;
    }
    if let Some(inner) = vec_inner_type(ty) {
        if !attrs.nested && type_is_vec_u8(ty) {
            return Shape::Scalar;
        }
        return Shape::Many(inner);
    }
    if let Some(inner) = option_inner_type(ty) {
        if !attrs.nested && type_is_known_scalar(inner) {
            return Shape::Scalar;
        }
        return Shape::Optional(inner);
    }
    if !attrs.nested && type_is_known_scalar(ty) {
        return Shape::Scalar;
    }
    Shape::One(ty)
}

fn option_lit(lit: Option<String>) -> TokenStream {
    match lit {
        Some(value) => quote!(::core::option::Option::Some(#value)),
        None => quote!(::core::option::Option::None),
    }
}

pub(crate) fn generate_destination_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "Destination cannot be derived for generic structs: the descriptor is a static",
        ));
    }

    let record_attrs = RecordAttrs::parse(&input.attrs)?;
    let fields = extract_named_fields(&input, "Destination")?;
    let paths = Paths::new(record_attrs.crate_path.as_ref());

    let record = paths.record();
    let destination = paths.destination();
    let record_descriptor = paths.record_descriptor();
    let field_descriptor = paths.field_descriptor();
    let field_kind = paths.field_kind();
    let cardinality = paths.cardinality();
    let child = paths.child();
    let from_value = paths.from_value();
    let value = paths.value();
    let coercion_error = paths.coercion_error();

    let mut descriptors = Vec::new();
    let mut setters = Vec::new();
    let mut children = Vec::new();
    let mut index = 0usize;

    for field in fields {
        let attrs = FieldAttrs::parse(field)?;
        if attrs.skip {
            continue;
        }
        let Some(ident) = field.ident.as_ref() else {
            return Err(Error::new_spanned(field, "expected a named field"));
        };
        let ty = &field.ty;
        let name = ident.unraw().to_string();
        let alias = option_lit(attrs.alias.as_ref().map(|lit| lit.value()));
        let primary_key = attrs.primary_key;
        let shape = classify(ty, &attrs);

        match (shape.variant(), shape.record_type()) {
            (Some(variant), Some(target)) => {
                if primary_key {
                    return Err(Error::new_spanned(
                        field,
                        "primary_key applies to scalar fields, not nested records",
                    ));
                }
                descriptors.push(quote! {
                    #field_descriptor {
                        name: #name,
                        alias: #alias,
                        primary_key: false,
                        kind: #field_kind::Nested {
                            cardinality: #cardinality::#variant,
                            record: <#target as #destination>::descriptor,
                        },
                    }
                });
                children.push(quote! {
                    #index => ::core::option::Option::Some(#child::#variant(&mut self.#ident)),
                });
            }
            _ => {
                descriptors.push(quote! {
                    #field_descriptor {
                        name: #name,
                        alias: #alias,
                        primary_key: #primary_key,
                        kind: #field_kind::Scalar {
                            kind: <#ty as #from_value>::KIND,
                            nullable: <#ty as #from_value>::NULLABLE,
                        },
                    }
                });
                setters.push(quote! {
                    #index => {
                        self.#ident = <#ty as #from_value>::from_value(value)?;
                        ::core::result::Result::Ok(())
                    }
                });
            }
        }
        index += 1;
    }

    let record_name = struct_name.to_string().to_snake_case();
    let record_alias = option_lit(record_attrs.alias.as_ref().map(|lit| lit.value()));

    Ok(quote! {
        impl #record for #struct_name {
            #[allow(unused_variables, unreachable_code)]
            fn set_field(
                &mut self,
                field: usize,
                value: #value,
            ) -> ::core::result::Result<(), #coercion_error> {
                match field {
                    #(#setters)*
                    _ => ::core::result::Result::Err(#coercion_error::UnknownField(field)),
                }
            }

            fn child_mut(&mut self, field: usize) -> ::core::option::Option<#child<'_>> {
                match field {
                    #(#children)*
                    _ => ::core::option::Option::None,
                }
            }
        }

        impl #destination for #struct_name {
            fn descriptor() -> &'static #record_descriptor {
                static DESCRIPTOR: #record_descriptor = #record_descriptor {
                    name: #record_name,
                    alias: #record_alias,
                    fields: &[#(#descriptors),*],
                };
                &DESCRIPTOR
            }
        }
    })
}
