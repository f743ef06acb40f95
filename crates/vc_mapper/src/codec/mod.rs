//! A generic codec between records and self-describing [`Node`] trees.
//!
//! A record is encoded as a map keyed by the canonical names of its fields,
//! plus a marker entry holding its type path:
//!
//! ```text
//! { "_struct_name": "my_crate::User", "name": "ann", "home": { "_struct_name": ... } }
//! ```
//!
//! [`Node`] implements `Serialize` and `Deserialize`, so the tree can be
//! written with any serde format. [`Reflector`] decodes marked maps back
//! into the registered record types.

// -----------------------------------------------------------------------------
// Modules

mod error;
mod node;
mod reflector;

// -----------------------------------------------------------------------------
// Exports

pub use error::CodecError;
pub use node::Node;
pub use reflector::{Reflector, STRUCT_NAME_KEY};
