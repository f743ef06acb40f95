use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::{ReflectStruct, StructField};

/// Generate `NamedField` construction for a single active field.
///
/// ```ignore
/// _path_::info::NamedField::new::<FieldTy>("name")
///     .with_tags(&[("json", "name,omitempty")])
///     .with_embedded(true)
///     .with_exported(false)
/// ```
fn named_field_tokens(vc_mapper_path: &syn::Path, field: &StructField) -> TokenStream {
    let named_field_ = crate::path::named_field_(vc_mapper_path);

    let ty = field.ty();
    let name = field.ident().to_string();

    let with_tags = if field.attrs.tags.is_empty() {
        crate::utils::empty()
    } else {
        let tags = field
            .attrs
            .tags
            .iter()
            .map(|(key, value)| quote! { (#key, #value) });
        quote! { .with_tags(&[ #(#tags),* ]) }
    };

    let with_embedded = if field.attrs.embedded {
        quote! { .with_embedded(true) }
    } else {
        crate::utils::empty()
    };

    let with_exported = if field.exported() {
        crate::utils::empty()
    } else {
        quote! { .with_exported(false) }
    };

    quote! {
        #named_field_::new::<#ty>(#name)
            #with_tags
            #with_embedded
            #with_exported
    }
}

/// Generate implementation codes for `Typed`
pub(crate) fn impl_trait_typed(info: &ReflectStruct) -> TokenStream {
    let vc_mapper_path = info.vc_mapper_path();
    let typed_ = crate::path::typed_(vc_mapper_path);
    let type_info_ = crate::path::type_info_(vc_mapper_path);
    let struct_info_ = crate::path::struct_info_(vc_mapper_path);

    let fields = info
        .active_fields()
        .map(|field| named_field_tokens(vc_mapper_path, field));

    let info_tokens = quote! {
        #type_info_::Struct(#struct_info_::new::<Self>(&[ #(#fields),* ]))
    };

    let body = if info.impl_with_generic() {
        let cell_ = crate::path::generic_type_info_cell_(vc_mapper_path);
        quote! {
            static CELL: #cell_ = #cell_::new();
            CELL.get_or_insert::<Self>(|| #info_tokens)
        }
    } else {
        let cell_ = crate::path::non_generic_type_info_cell_(vc_mapper_path);
        quote! {
            static CELL: #cell_ = #cell_::new();
            CELL.get_or_init(|| #info_tokens)
        }
    };

    let ident = info.ident();
    let (impl_generics, ty_generics, where_clause) = info.split_generics();

    quote! {
        impl #impl_generics #typed_ for #ident #ty_generics #where_clause {
            fn type_info() -> &'static #type_info_ {
                #body
            }
        }
    }
}
