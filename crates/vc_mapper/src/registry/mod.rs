//! Name to type information lookup, used to rebuild records from their
//! encoded type path.

mod type_registry;

pub use type_registry::TypeRegistry;
