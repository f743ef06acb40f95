//! Paths of the runtime items used by the generated code.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// Get the correct access path to the `vc_mapper` crate.
///
/// 1. For crates that depend on `vc_mapper`, `::vc_mapper` is returned.
/// 2. For crates that depend on `vc_data`, `::vc_data::mapper` is returned.
/// 3. For other situations, `::vc_mapper` is returned, but this may be incorrect.
///
/// The manifest is read from disk, so the path is passed around instead of
/// being resolved again.
pub(crate) fn vc_mapper() -> syn::Path {
    vc_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("vc_mapper"))
}

// -----------------------------------------------------------------------------
// Items

#[inline(always)]
pub(crate) fn macro_exports_(vc_mapper_path: &syn::Path) -> TokenStream {
    quote! { #vc_mapper_path::__macro_exports }
}

#[cfg(feature = "auto_register")]
#[inline(always)]
pub(crate) fn auto_register_(vc_mapper_path: &syn::Path) -> TokenStream {
    quote! { #vc_mapper_path::__macro_exports::auto_register }
}

#[inline(always)]
pub(crate) fn reflect_(vc_mapper_path: &syn::Path) -> TokenStream {
    quote! { #vc_mapper_path::Reflect }
}

#[inline(always)]
pub(crate) fn type_path_(vc_mapper_path: &syn::Path) -> TokenStream {
    quote! { #vc_mapper_path::info::TypePath }
}

#[inline(always)]
pub(crate) fn typed_(vc_mapper_path: &syn::Path) -> TokenStream {
    quote! { #vc_mapper_path::info::Typed }
}

#[inline(always)]
pub(crate) fn type_info_(vc_mapper_path: &syn::Path) -> TokenStream {
    quote! { #vc_mapper_path::info::TypeInfo }
}

#[inline(always)]
pub(crate) fn struct_info_(vc_mapper_path: &syn::Path) -> TokenStream {
    quote! { #vc_mapper_path::info::StructInfo }
}

#[inline(always)]
pub(crate) fn named_field_(vc_mapper_path: &syn::Path) -> TokenStream {
    quote! { #vc_mapper_path::info::NamedField }
}

#[inline(always)]
pub(crate) fn non_generic_type_info_cell_(vc_mapper_path: &syn::Path) -> TokenStream {
    quote! { #vc_mapper_path::impls::NonGenericTypeInfoCell }
}

#[inline(always)]
pub(crate) fn generic_type_info_cell_(vc_mapper_path: &syn::Path) -> TokenStream {
    quote! { #vc_mapper_path::impls::GenericTypeInfoCell }
}

#[inline(always)]
pub(crate) fn generic_type_path_cell_(vc_mapper_path: &syn::Path) -> TokenStream {
    quote! { #vc_mapper_path::impls::GenericTypePathCell }
}

#[inline(always)]
pub(crate) fn struct_(vc_mapper_path: &syn::Path) -> TokenStream {
    quote! { #vc_mapper_path::ops::Struct }
}

#[inline(always)]
pub(crate) fn struct_eq_(vc_mapper_path: &syn::Path) -> TokenStream {
    quote! { #vc_mapper_path::ops::struct_eq }
}

#[inline(always)]
pub(crate) fn struct_debug_(vc_mapper_path: &syn::Path) -> TokenStream {
    quote! { #vc_mapper_path::ops::struct_debug }
}
