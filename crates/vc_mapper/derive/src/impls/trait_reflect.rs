use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectStruct;

/// Generate implementation codes for `Reflect`
pub(crate) fn impl_trait_reflect(info: &ReflectStruct) -> TokenStream {
    let vc_mapper_path = info.vc_mapper_path();
    let reflect_ = crate::path::reflect_(vc_mapper_path);
    let macro_exports_ = crate::path::macro_exports_(vc_mapper_path);
    let struct_eq_ = crate::path::struct_eq_(vc_mapper_path);
    let struct_debug_ = crate::path::struct_debug_(vc_mapper_path);

    let ident = info.ident();
    let (impl_generics, ty_generics, where_clause) = info.split_generics();

    quote! {
        impl #impl_generics #reflect_ for #ident #ty_generics #where_clause {
            #vc_mapper_path::impl_reflect_cast_fn!(Struct);

            #[inline]
            fn reflect_clone(&self) -> #macro_exports_::Box<dyn #reflect_> {
                #macro_exports_::Box::new(::core::clone::Clone::clone(self))
            }

            #[inline]
            fn reflect_eq(&self, other: &dyn #reflect_) -> bool {
                #struct_eq_(self, other)
            }

            #[inline]
            fn reflect_debug(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                #struct_debug_(self, f)
            }
        }
    }
}
