use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectStruct;

/// Generate implementation codes for `Struct`
pub(crate) fn impl_trait_struct(info: &ReflectStruct) -> TokenStream {
    let vc_mapper_path = info.vc_mapper_path();
    let struct_ = crate::path::struct_(vc_mapper_path);
    let reflect_ = crate::path::reflect_(vc_mapper_path);

    let mut field_indices = Vec::new();
    let mut field_idents = Vec::new();
    for field in info.active_fields() {
        field_indices.extend(field.reflection_index);
        field_idents.push(field.ident());
    }
    let field_count = field_idents.len();

    let ident = info.ident();
    let (impl_generics, ty_generics, where_clause) = info.split_generics();

    quote! {
        impl #impl_generics #struct_ for #ident #ty_generics #where_clause {
            fn field_at(&self, index: usize) -> ::core::option::Option<&dyn #reflect_> {
                match index {
                    #(#field_indices => ::core::option::Option::Some(&self.#field_idents),)*
                    _ => ::core::option::Option::None,
                }
            }

            fn field_at_mut(&mut self, index: usize) -> ::core::option::Option<&mut dyn #reflect_> {
                match index {
                    #(#field_indices => ::core::option::Option::Some(&mut self.#field_idents),)*
                    _ => ::core::option::Option::None,
                }
            }

            #[inline]
            fn field_len(&self) -> usize {
                #field_count
            }
        }
    }
}
