#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Extern Self

// Usually, we need to use `crate` in the crate itself and use `vc_mapper` in doc testing.
// But `macro_utils::Manifest` can only choose one, so we must have an
// `extern self` to ensure `vc_mapper` can be used as an alias for `crate`.
extern crate self as vc_mapper;

// -----------------------------------------------------------------------------
// no_std support

// The caches are guarded by `std::sync::RwLock`.
extern crate std;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod reflection;

pub mod access;
pub mod codec;
pub mod coerce;
pub mod defaults;
pub mod impls;
pub mod info;
pub mod mapper;
pub mod ops;
pub mod registry;
pub mod utils;

// -----------------------------------------------------------------------------
// Top-Level exports

pub mod __macro_exports;

pub use reflection::Reflect;
pub use vc_mapper_derive as derive;

pub use coerce::{assign_dynamic, text_to_value, value_to_text};
pub use defaults::{alloc_default, set_default};
pub use mapper::copy_struct;
