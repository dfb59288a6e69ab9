//! Centralized path definitions for generated code.
//!
//! Generated impls refer to `::qrm` by default. Crates that depend on
//! `qrm-core` directly (or the core crate's own tests) pass
//! `#[qrm(crate = "...")]` to point the paths elsewhere.

use proc_macro2::TokenStream;
use quote::quote;

#[derive(Clone)]
pub(crate) struct Paths {
    root: TokenStream,
}

impl Paths {
    pub(crate) fn new(crate_path: Option<&syn::Path>) -> Self {
        let root = match crate_path {
            Some(path) => quote!(#path),
            None => quote!(::qrm),
        };
        Self { root }
    }

    pub(crate) fn record(&self) -> TokenStream {
        let root = &self.root;
        quote!(#root::Record)
    }

    pub(crate) fn destination(&self) -> TokenStream {
        let root = &self.root;
        quote!(#root::Destination)
    }

    pub(crate) fn record_descriptor(&self) -> TokenStream {
        let root = &self.root;
        quote!(#root::RecordDescriptor)
    }

    pub(crate) fn field_descriptor(&self) -> TokenStream {
        let root = &self.root;
        quote!(#root::FieldDescriptor)
    }

    pub(crate) fn field_kind(&self) -> TokenStream {
        let root = &self.root;
        quote!(#root::FieldKind)
    }

    pub(crate) fn cardinality(&self) -> TokenStream {
        let root = &self.root;
        quote!(#root::Cardinality)
    }

    pub(crate) fn child(&self) -> TokenStream {
        let root = &self.root;
        quote!(#root::Child)
    }

    pub(crate) fn from_value(&self) -> TokenStream {
        let root = &self.root;
        quote!(#root::FromValue)
    }

    pub(crate) fn value(&self) -> TokenStream {
        let root = &self.root;
        quote!(#root::Value)
    }

    pub(crate) fn coercion_error(&self) -> TokenStream {
        let root = &self.root;
        quote!(#root::CoercionError)
    }
}
