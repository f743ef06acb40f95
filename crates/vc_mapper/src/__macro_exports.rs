//! Items used by `#[derive(Reflect)]` and the exported macros.
#![doc(hidden)]

pub use alloc::boxed::Box;
pub use alloc::format;
pub use alloc::string::String;

#[cfg(feature = "auto_register")]
pub mod auto_register {
    use crate::info::Typed;
    use crate::registry::TypeRegistry;

    pub use inventory;

    /// A registration function submitted by `#[reflect(auto_register)]`.
    pub struct __AutoRegisterFunc(pub fn(&mut TypeRegistry));

    inventory::collect!(__AutoRegisterFunc);

    pub trait __RegisterType {
        fn __register(registry: &mut TypeRegistry);
    }

    impl<T: Typed> __RegisterType for T {
        #[inline]
        fn __register(registry: &mut TypeRegistry) {
            registry.register::<T>();
        }
    }

    pub fn __register_types(registry: &mut TypeRegistry) {
        for func in inventory::iter::<__AutoRegisterFunc> {
            (func.0)(registry);
        }
    }
}
