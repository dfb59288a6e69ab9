//! `#[qrm(...)]` attribute parsing.

use syn::{Attribute, Field, LitStr, Result};

/// Struct-level options: `#[qrm(alias = "op", crate = "qrm_core")]`.
#[derive(Default)]
pub(crate) struct RecordAttrs {
    pub(crate) alias: Option<LitStr>,
    pub(crate) crate_path: Option<syn::Path>,
}

/// Field-level options: `#[qrm(primary_key, alias = "from")]`.
#[derive(Default)]
pub(crate) struct FieldAttrs {
    pub(crate) primary_key: bool,
    pub(crate) alias: Option<LitStr>,
    pub(crate) nested: bool,
    pub(crate) scalar: bool,
    pub(crate) skip: bool,
}

fn qrm_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|attr| attr.path().is_ident("qrm"))
}

/// Aliases are single path segments; the dot is the nesting separator.
fn parse_alias(lit: LitStr) -> Result<LitStr> {
    let value = lit.value();
    if value.is_empty() || value.contains('.') {
        return Err(syn::Error::new(
            lit.span(),
            "alias must be a single non-empty segment without '.'",
        ));
    }
    Ok(lit)
}

impl RecordAttrs {
    pub(crate) fn parse(attrs: &[Attribute]) -> Result<Self> {
        let mut out = Self::default();
        for attr in qrm_attrs(attrs) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("alias") {
                    out.alias = Some(parse_alias(meta.value()?.parse()?)?);
                    Ok(())
                } else if meta.path.is_ident("crate") {
                    let lit: LitStr = meta.value()?.parse()?;
                    out.crate_path = Some(lit.parse()?);
                    Ok(())
                } else {
                    Err(meta.error("unknown struct attribute; expected `alias` or `crate`"))
                }
            })?;
        }
        Ok(out)
    }
}

impl FieldAttrs {
    pub(crate) fn parse(field: &Field) -> Result<Self> {
        let mut out = Self::default();
        for attr in qrm_attrs(&field.attrs) {
            attr.parse_nested_meta(|meta| {
                let Some(ident) = meta.path.get_ident() else {
                    return Err(meta.error("expected identifier"));
                };
                match ident.to_string().as_str() {
                    "primary_key" | "primary" => out.primary_key = true,
                    "alias" => out.alias = Some(parse_alias(meta.value()?.parse()?)?),
                    "nested" => out.nested = true,
                    "scalar" => out.scalar = true,
                    "skip" => out.skip = true,
                    _ => {
                        return Err(meta.error(
                            "unknown field attribute; expected one of: primary_key, alias, nested, scalar, skip",
                        ));
                    }
                }
                Ok(())
            })?;
        }

        if out.nested && out.scalar {
            return Err(syn::Error::new_spanned(
                field,
                "a field cannot be both `nested` and `scalar`",
            ));
        }
        Ok(out)
    }
}
