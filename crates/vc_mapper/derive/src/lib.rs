//! See [`Reflect`] derive macro.
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static REFLECT_ATTRIBUTE_NAME: &str = "reflect";
static TAG_ATTRIBUTE_NAME: &str = "tag";

// -----------------------------------------------------------------------------
// Modules

mod derive_data;
mod impls;
mod path;
mod utils;

// -----------------------------------------------------------------------------
// Macros

/// # Record Reflection Derivation
///
/// `#[derive(Reflect)]` implements the following traits for a struct with
/// named fields:
///
/// - `TypePath`
/// - `Typed`
/// - `Reflect`
/// - `Struct`
///
/// The type must also implement `Default` and `Clone`, the default value is
/// used as the zero value of the record.
///
/// ## Type Attributes
///
/// - `#[reflect(type_path = "my_crate::foo::Bar")]`: override the type path,
///   which defaults to `module_path!()` joined with the type ident.
/// - `#[reflect(auto_register)]`: submit the type to the registry collected by
///   `TypeRegistry::auto_register`, ignored for generic types.
///
/// ## Field Attributes
///
/// - `#[reflect(embedded)]`: mark the field as an embedded record, its fields
///   are promoted to the owner unless a tag renames it.
/// - `#[reflect(skip)]`: hide the field from reflection.
/// - `#[tag(json = "name,omitempty", default = "1")]`: key/value tag pairs,
///   read by mappers through their tag key.
///
/// Only `pub` fields are exported.
///
/// ## Example
///
/// ```rust, ignore
/// #[derive(Reflect, Default, Clone)]
/// #[reflect(auto_register)]
/// struct Account {
///     #[reflect(embedded)]
///     pub base: Base,
///     #[tag(json = "login", default = "guest")]
///     pub name: String,
///     #[reflect(skip)]
///     pub cache: Vec<u8>,
/// }
///
/// // support generics
/// #[derive(Reflect, Default, Clone)]
/// struct Page<T> {
///     pub items: Vec<T>,
/// }
/// ```
#[proc_macro_derive(Reflect, attributes(reflect, tag))]
pub fn derive_reflect(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match derive_data::ReflectStruct::from_input(&ast) {
        Ok(info) => impls::impl_struct(&info).into(),
        Err(err) => err.into_compile_error().into(),
    }
}
