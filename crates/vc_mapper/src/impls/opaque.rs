/// Implement reflection for a type whose content is invisible to reflection.
///
/// The type must implement `Clone`, `PartialEq`, `Debug` and `Default`.
/// The coercer and the codec reject opaque values.
///
/// ```
/// use vc_mapper::impl_reflect_opaque;
/// use vc_mapper::info::{ReflectKind, Typed};
///
/// #[derive(Clone, PartialEq, Debug, Default)]
/// struct Handle(u32);
///
/// impl_reflect_opaque!(Handle, "demo::Handle");
///
/// assert_eq!(Handle::type_info().kind(), ReflectKind::Opaque);
/// assert_eq!(Handle::type_info().type_name(), "Handle");
/// ```
#[macro_export]
macro_rules! impl_reflect_opaque {
    ($ty:ty, $path:literal) => {
        impl $crate::info::TypePath for $ty {
            #[inline]
            fn type_path() -> &'static str {
                $path
            }

            #[inline]
            fn type_name() -> &'static str {
                match $path.rsplit_once("::") {
                    ::core::option::Option::Some((_, name)) => name,
                    ::core::option::Option::None => $path,
                }
            }
        }

        impl $crate::info::Typed for $ty {
            fn type_info() -> &'static $crate::info::TypeInfo {
                static CELL: $crate::impls::NonGenericTypeInfoCell =
                    $crate::impls::NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| {
                    $crate::info::TypeInfo::Opaque($crate::info::OpaqueInfo::new::<Self>())
                })
            }
        }

        impl $crate::Reflect for $ty {
            $crate::impl_reflect_cast_fn!(Opaque);

            #[inline]
            fn reflect_clone(&self) -> $crate::__macro_exports::Box<dyn $crate::Reflect> {
                $crate::__macro_exports::Box::new(::core::clone::Clone::clone(self))
            }

            #[inline]
            fn reflect_eq(&self, other: &dyn $crate::Reflect) -> bool {
                other
                    .downcast_ref::<Self>()
                    .is_some_and(|other| ::core::cmp::PartialEq::eq(self, other))
            }

            #[inline]
            fn reflect_debug(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                ::core::fmt::Debug::fmt(self, f)
            }
        }
    };
}

crate::impl_reflect_opaque!((), "()");
crate::impl_reflect_opaque!(::core::time::Duration, "core::time::Duration");
