// -----------------------------------------------------------------------------
// Modules

mod auto_register;
mod trait_reflect;
mod trait_struct;
mod trait_type_path;
mod trait_typed;

// -----------------------------------------------------------------------------
// Internal API

use auto_register::get_auto_register_impl;
use trait_reflect::impl_trait_reflect;
use trait_struct::impl_trait_struct;
use trait_type_path::impl_trait_type_path;
use trait_typed::impl_trait_typed;

use proc_macro2::TokenStream;
use quote::quote;

use crate::derive_data::ReflectStruct;

/// Implement full reflect for struct type.
pub(crate) fn impl_struct(info: &ReflectStruct) -> TokenStream {
    // trait: TypePath
    let type_path_trait_tokens = impl_trait_type_path(info);

    // trait: Typed
    let typed_trait_tokens = impl_trait_typed(info);

    // trait: Struct
    let struct_trait_tokens = impl_trait_struct(info);

    // trait: Reflect
    let reflect_trait_tokens = impl_trait_reflect(info);

    // feature: auto_register
    let auto_register_tokens = get_auto_register_impl(info);

    quote! {
        #type_path_trait_tokens

        #typed_trait_tokens

        #struct_trait_tokens

        #reflect_trait_tokens

        #auto_register_tokens
    }
}
