use proc_macro2::TokenStream;
use quote::quote;
use syn::spanned::Spanned;
use syn::{Data, DeriveInput, Field, Fields, Generics, Ident, ImplGenerics, Path, Type};
use syn::{TypeGenerics, Visibility};

use super::{FieldAttributes, TypeAttributes};

// -----------------------------------------------------------------------------
// StructField

/// A named field of the derived struct.
pub(crate) struct StructField<'a> {
    pub data: &'a Field,
    pub attrs: FieldAttributes,
    /// Index among the active (non-skipped) fields.
    pub reflection_index: Option<usize>,
}

impl StructField<'_> {
    #[inline]
    pub fn ident(&self) -> &Ident {
        self.data
            .ident
            .as_ref()
            .expect("Struct should not have unnamed fields.")
    }

    #[inline]
    pub fn ty(&self) -> &Type {
        &self.data.ty
    }

    #[inline]
    pub fn exported(&self) -> bool {
        matches!(self.data.vis, Visibility::Public(_))
    }
}

// -----------------------------------------------------------------------------
// ReflectStruct

/// The parsed input of `#[derive(Reflect)]`.
pub(crate) struct ReflectStruct<'a> {
    vc_mapper_path: Path,
    attrs: TypeAttributes,
    ident: &'a Ident,
    generics: &'a Generics,
    fields: Vec<StructField<'a>>,
}

impl<'a> ReflectStruct<'a> {
    pub fn from_input(input: &'a DeriveInput) -> syn::Result<Self> {
        let attrs = TypeAttributes::parse_attrs(&input.attrs)?;

        let named: Vec<&Field> = match &input.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => named.named.iter().collect(),
                Fields::Unit => Vec::new(),
                Fields::Unnamed(_) => {
                    return Err(syn::Error::new(
                        input.ident.span(),
                        "`Reflect` can only be derived for structs with named fields",
                    ));
                }
            },
            _ => {
                return Err(syn::Error::new(
                    input.ident.span(),
                    "`Reflect` can only be derived for structs",
                ));
            }
        };

        if let Some(lifetime) = input.generics.lifetimes().next() {
            return Err(syn::Error::new(
                lifetime.span(),
                "`Reflect` can not be derived for types with lifetime parameters",
            ));
        }

        let mut reflection_index = 0_usize;
        let mut fields = Vec::with_capacity(named.len());
        for field in named {
            let field_attrs = FieldAttributes::parse_attrs(&field.attrs)?;
            if field_attrs.skip && field_attrs.embedded {
                return Err(syn::Error::new(
                    field.span(),
                    "a skipped field can not be embedded",
                ));
            }

            let index = if field_attrs.skip {
                None
            } else {
                reflection_index += 1;
                Some(reflection_index - 1)
            };

            fields.push(StructField {
                data: field,
                attrs: field_attrs,
                reflection_index: index,
            });
        }

        Ok(Self {
            vc_mapper_path: crate::path::vc_mapper(),
            attrs,
            ident: &input.ident,
            generics: &input.generics,
            fields,
        })
    }

    #[inline]
    pub fn vc_mapper_path(&self) -> &Path {
        &self.vc_mapper_path
    }

    #[inline]
    pub fn attrs(&self) -> &TypeAttributes {
        &self.attrs
    }

    #[inline]
    pub fn ident(&self) -> &Ident {
        self.ident
    }

    #[inline]
    pub fn generics(&self) -> &Generics {
        self.generics
    }

    /// Fields visible to reflection, in declaration order.
    pub fn active_fields(&self) -> impl Iterator<Item = &StructField<'a>> {
        self.fields
            .iter()
            .filter(|field| field.reflection_index.is_some())
    }

    /// Whether the implementations need generic type cells.
    #[inline]
    pub fn impl_with_generic(&self) -> bool {
        !self.generics.params.is_empty()
    }

    /// Return `impl_generics`, `ty_generics` and the full `where` clause.
    ///
    /// For generic types the following bounds are appended:
    ///
    /// - `Self: Any + Send + Sync + Default + Clone`
    /// - `TypePath` for every type parameter.
    /// - `Reflect + Typed` for every active field type.
    ///
    /// Non-generic types keep their own where clause, missing
    /// implementations are reported on the generated code.
    pub fn split_generics(&self) -> (ImplGenerics<'_>, TypeGenerics<'_>, TokenStream) {
        let (impl_generics, ty_generics, where_clause) = self.generics.split_for_impl();

        let mut predicates = where_clause
            .map(|clause| {
                let predicates = clause.predicates.iter();
                quote! { #(#predicates,)* }
            })
            .unwrap_or_default();

        if self.generics.type_params().next().is_some() {
            let path = &self.vc_mapper_path;
            let reflect_ = crate::path::reflect_(path);
            let type_path_ = crate::path::type_path_(path);
            let typed_ = crate::path::typed_(path);

            predicates.extend(quote! {
                Self: ::core::any::Any
                    + ::core::marker::Send
                    + ::core::marker::Sync
                    + ::core::default::Default
                    + ::core::clone::Clone,
            });

            for param in self.generics.type_params() {
                let ident = &param.ident;
                predicates.extend(quote! { #ident: #type_path_, });
            }

            let mut field_types: Vec<&Type> = Vec::new();
            for field in self.active_fields() {
                if !field_types.contains(&field.ty()) {
                    field_types.push(field.ty());
                }
            }
            for ty in field_types {
                predicates.extend(quote! { #ty: #reflect_ + #typed_, });
            }
        }

        let where_clause = if predicates.is_empty() {
            crate::utils::empty()
        } else {
            quote! { where #predicates }
        };

        (impl_generics, ty_generics, where_clause)
    }
}
