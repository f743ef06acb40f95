use crate::derive_data::ReflectStruct;

/// Generate `auto_register` implementation
#[cfg(feature = "auto_register")]
pub(crate) fn get_auto_register_impl(info: &ReflectStruct) -> proc_macro2::TokenStream {
    use quote::quote_spanned;

    if let Some(span) = info.attrs().auto_register {
        // Invalid for generic types.
        if info.impl_with_generic() {
            return crate::utils::empty();
        }

        let auto_register_ = crate::path::auto_register_(info.vc_mapper_path());
        let ident = info.ident();

        quote_spanned! { span =>
            #auto_register_::inventory::submit!{
                #auto_register_::__AutoRegisterFunc(
                    <#ident as #auto_register_::__RegisterType>::__register
                )
            }
        }
    } else {
        crate::utils::empty()
    }
}

/// Generate `auto_register` implementation
#[cfg(not(feature = "auto_register"))]
pub(crate) fn get_auto_register_impl(_: &ReflectStruct) -> proc_macro2::TokenStream {
    crate::utils::empty()
}
