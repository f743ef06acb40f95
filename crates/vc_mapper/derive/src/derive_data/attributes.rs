//! Parsing of `#[reflect(...)]` and `#[tag(...)]` attributes.

use proc_macro2::Span;
use syn::ext::IdentExt;
use syn::meta::ParseNestedMeta;
use syn::spanned::Spanned;
use syn::{Attribute, LitStr};

use crate::{REFLECT_ATTRIBUTE_NAME, TAG_ATTRIBUTE_NAME};

// -----------------------------------------------------------------------------
// TypeAttributes

/// Attributes placed on the type itself.
#[derive(Default, Debug)]
pub(crate) struct TypeAttributes {
    /// `#[reflect(type_path = "...")]`
    pub type_path: Option<LitStr>,
    /// `#[reflect(auto_register)]`, keep the span for error reporting.
    #[cfg_attr(not(feature = "auto_register"), allow(dead_code))]
    pub auto_register: Option<Span>,
}

impl TypeAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        for attr in attrs {
            if !attr.path().is_ident(REFLECT_ATTRIBUTE_NAME) {
                continue;
            }
            attr.parse_nested_meta(|meta| this.parse_meta(meta))?;
        }

        Ok(this)
    }

    fn parse_meta(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("type_path") {
            if self.type_path.is_some() {
                return Err(meta.error("duplicate `type_path` attribute"));
            }
            let lit: LitStr = meta.value()?.parse()?;
            if lit.value().is_empty() {
                return Err(syn::Error::new(lit.span(), "`type_path` can not be empty"));
            }
            self.type_path = Some(lit);
            Ok(())
        } else if meta.path.is_ident("auto_register") {
            self.auto_register = Some(meta.path.span());
            Ok(())
        } else {
            Err(meta.error("unsupported type attribute, expected `type_path` or `auto_register`"))
        }
    }
}

// -----------------------------------------------------------------------------
// FieldAttributes

/// Attributes placed on a named field.
#[derive(Default, Debug)]
pub(crate) struct FieldAttributes {
    /// `#[reflect(skip)]`
    pub skip: bool,
    /// `#[reflect(embedded)]`
    pub embedded: bool,
    /// `#[tag(key = "value", ...)]`, in declaration order.
    pub tags: Vec<(String, LitStr)>,
}

impl FieldAttributes {
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut this = Self::default();

        for attr in attrs {
            if attr.path().is_ident(REFLECT_ATTRIBUTE_NAME) {
                attr.parse_nested_meta(|meta| this.parse_reflect_meta(meta))?;
            } else if attr.path().is_ident(TAG_ATTRIBUTE_NAME) {
                attr.parse_nested_meta(|meta| this.parse_tag_meta(meta))?;
            }
        }

        Ok(this)
    }

    fn parse_reflect_meta(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        if meta.path.is_ident("skip") {
            self.skip = true;
            Ok(())
        } else if meta.path.is_ident("embedded") {
            self.embedded = true;
            Ok(())
        } else {
            Err(meta.error("unsupported field attribute, expected `skip` or `embedded`"))
        }
    }

    // `#[tag(type = "x")]` is accepted, nested meta paths may be keywords.
    fn parse_tag_meta(&mut self, meta: ParseNestedMeta) -> syn::Result<()> {
        let Some(ident) = meta.path.get_ident() else {
            return Err(meta.error("tag key must be a single identifier"));
        };
        let key = ident.unraw().to_string();

        if self.tags.iter().any(|(exist, _)| *exist == key) {
            return Err(meta.error(format!("duplicate tag key `{key}`")));
        }

        let value: LitStr = meta.value()?.parse()?;
        self.tags.push((key, value));
        Ok(())
    }
}
