use proc_macro2::TokenStream;
use quote::{ToTokens, quote};
use syn::GenericParam;

use crate::derive_data::ReflectStruct;

fn static_path_cell(vc_mapper_path: &syn::Path, generator: TokenStream) -> TokenStream {
    let path_cell_ = crate::path::generic_type_path_cell_(vc_mapper_path);

    quote! {
        static CELL: #path_cell_ = #path_cell_::new();
        CELL.get_or_insert::<Self>(|| {
            #generator
        })
    }
}

/// Build `format!("{}::Name<{}, {}>", module_path!(), <T as TypePath>::fn_name(), N)`.
///
/// `prefix` is the formatted text before `<`, `prefix_args` its arguments.
fn format_generic(
    info: &ReflectStruct,
    prefix: &str,
    prefix_args: TokenStream,
    fn_name: TokenStream,
) -> TokenStream {
    let vc_mapper_path = info.vc_mapper_path();
    let macro_exports_ = crate::path::macro_exports_(vc_mapper_path);
    let type_path_ = crate::path::type_path_(vc_mapper_path);

    let args = info
        .generics()
        .params
        .iter()
        .filter_map(|param| match param {
            GenericParam::Type(param) => {
                let ident = &param.ident;
                Some(quote! { <#ident as #type_path_>::#fn_name() })
            }
            GenericParam::Const(param) => Some(param.ident.to_token_stream()),
            GenericParam::Lifetime(_) => None,
        })
        .collect::<Vec<_>>();

    let holders = vec!["{}"; args.len()].join(", ");
    let format_str = format!("{prefix}<{holders}>");

    quote! {
        #macro_exports_::format!(#format_str, #prefix_args #(#args),*)
    }
}

/// Generate implementation codes for `TypePath`
pub(crate) fn impl_trait_type_path(info: &ReflectStruct) -> TokenStream {
    let vc_mapper_path = info.vc_mapper_path();
    let trait_type_path_ = crate::path::type_path_(vc_mapper_path);

    let ident = info.ident();
    let ident_str = ident.to_string();
    let custom_path = info.attrs().type_path.as_ref();

    let (type_path, type_name, inline_flag) = if info.impl_with_generic() {
        let type_path = match custom_path {
            Some(lit) => {
                let prefix = lit.value().replace('{', "{{").replace('}', "}}");
                format_generic(info, &prefix, crate::utils::empty(), quote!(type_path))
            }
            None => format_generic(
                info,
                &format!("{{}}::{ident_str}"),
                quote! { ::core::module_path!(), },
                quote!(type_path),
            ),
        };
        let type_name = format_generic(info, &ident_str, crate::utils::empty(), quote!(type_name));

        (
            static_path_cell(vc_mapper_path, type_path),
            static_path_cell(vc_mapper_path, type_name),
            crate::utils::empty(),
        )
    } else {
        let type_path = match custom_path {
            Some(lit) => lit.to_token_stream(),
            None => quote! {
                ::core::concat!(::core::module_path!(), "::", #ident_str)
            },
        };

        (type_path, quote! { #ident_str }, quote! { #[inline] })
    };

    let (impl_generics, ty_generics, where_clause) = info.split_generics();

    quote! {
        impl #impl_generics #trait_type_path_ for #ident #ty_generics #where_clause {
            #inline_flag
            fn type_path() -> &'static str {
                #type_path
            }

            #inline_flag
            fn type_name() -> &'static str {
                #type_name
            }
        }
    }
}
