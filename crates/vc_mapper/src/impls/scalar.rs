use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use crate::Reflect;
use crate::impls::NonGenericTypeInfoCell;
use crate::info::{ScalarInfo, ScalarKind, TypeInfo, TypePath, Typed};
use crate::ops::{Scalar, ScalarRef, ScalarValue};

// -----------------------------------------------------------------------------
// Common

macro_rules! impl_scalar_base {
    ($ty:ty, $path:expr, $name:expr, $kind:expr) => {
        impl TypePath for $ty {
            #[inline]
            fn type_path() -> &'static str {
                $path
            }

            #[inline]
            fn type_name() -> &'static str {
                $name
            }
        }

        impl Typed for $ty {
            fn type_info() -> &'static TypeInfo {
                static CELL: NonGenericTypeInfoCell = NonGenericTypeInfoCell::new();
                CELL.get_or_init(|| TypeInfo::Scalar(ScalarInfo::new::<Self>($kind)))
            }
        }

        impl Reflect for $ty {
            crate::impl_reflect_cast_fn!(Scalar);

            #[inline]
            fn reflect_clone(&self) -> Box<dyn Reflect> {
                Box::new(Clone::clone(self))
            }

            #[inline]
            fn reflect_eq(&self, other: &dyn Reflect) -> bool {
                other.downcast_ref::<Self>().is_some_and(|other| self == other)
            }

            #[inline]
            fn reflect_debug(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Debug::fmt(self, f)
            }
        }
    };
}

// -----------------------------------------------------------------------------
// Numbers

macro_rules! impl_reflect_number {
    ($($ty:ident => $variant:ident($wide:ty), $kind:ident;)*) => {$(
        impl_scalar_base!($ty, stringify!($ty), stringify!($ty), ScalarKind::$kind(<$ty>::BITS));

        impl Scalar for $ty {
            #[inline]
            fn scalar_kind(&self) -> ScalarKind {
                ScalarKind::$kind(<$ty>::BITS)
            }

            #[inline]
            fn scalar_ref(&self) -> ScalarRef<'_> {
                ScalarRef::$variant(*self as $wide)
            }

            fn store(&mut self, value: ScalarValue) -> Result<(), ScalarValue> {
                match value {
                    ScalarValue::$variant(wide) => match <$ty>::try_from(wide) {
                        Ok(value) => {
                            *self = value;
                            Ok(())
                        }
                        Err(_) => Err(ScalarValue::$variant(wide)),
                    },
                    other => Err(other),
                }
            }
        }
    )*};
}

impl_reflect_number! {
    i8 => Int(i64), Int;
    i16 => Int(i64), Int;
    i32 => Int(i64), Int;
    i64 => Int(i64), Int;
    isize => Int(i64), Int;
    u8 => Uint(u64), Uint;
    u16 => Uint(u64), Uint;
    u32 => Uint(u64), Uint;
    u64 => Uint(u64), Uint;
    usize => Uint(u64), Uint;
}

macro_rules! impl_reflect_float {
    ($($ty:ident => $variant:ident, $bits:literal;)*) => {$(
        impl_scalar_base!($ty, stringify!($ty), stringify!($ty), ScalarKind::Float($bits));

        impl Scalar for $ty {
            #[inline]
            fn scalar_kind(&self) -> ScalarKind {
                ScalarKind::Float($bits)
            }

            #[inline]
            fn scalar_ref(&self) -> ScalarRef<'_> {
                ScalarRef::$variant(*self)
            }

            fn store(&mut self, value: ScalarValue) -> Result<(), ScalarValue> {
                match value {
                    ScalarValue::$variant(value) => {
                        *self = value;
                        Ok(())
                    }
                    other => Err(other),
                }
            }
        }
    )*};
}

impl_reflect_float! {
    f32 => F32, 32;
    f64 => F64, 64;
}

// -----------------------------------------------------------------------------
// bool & String

impl_scalar_base!(bool, "bool", "bool", ScalarKind::Bool);

impl Scalar for bool {
    #[inline]
    fn scalar_kind(&self) -> ScalarKind {
        ScalarKind::Bool
    }

    #[inline]
    fn scalar_ref(&self) -> ScalarRef<'_> {
        ScalarRef::Bool(*self)
    }

    fn store(&mut self, value: ScalarValue) -> Result<(), ScalarValue> {
        match value {
            ScalarValue::Bool(value) => {
                *self = value;
                Ok(())
            }
            other => Err(other),
        }
    }
}

impl_scalar_base!(String, "alloc::string::String", "String", ScalarKind::Str);

impl Scalar for String {
    #[inline]
    fn scalar_kind(&self) -> ScalarKind {
        ScalarKind::Str
    }

    #[inline]
    fn scalar_ref(&self) -> ScalarRef<'_> {
        ScalarRef::Str(self.as_str())
    }

    fn store(&mut self, value: ScalarValue) -> Result<(), ScalarValue> {
        match value {
            ScalarValue::Str(value) => {
                *self = value;
                Ok(())
            }
            other => Err(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::string::String;

    use crate::Reflect;
    use crate::info::{ScalarKind, Typed};
    use crate::ops::{ReflectMut, ScalarRef, ScalarValue};

    #[test]
    fn scalar_kind_carries_width() {
        let info = i16::type_info().as_scalar().unwrap();
        assert_eq!(info.kind(), ScalarKind::Int(16));
        let info = usize::type_info().as_scalar().unwrap();
        assert_eq!(info.kind(), ScalarKind::Uint(usize::BITS));
        assert_eq!(f32::type_info().type_path(), "f32");
        assert_eq!(String::type_info().type_name(), "String");
    }

    #[test]
    fn store_checks_range() {
        let mut value = 0_i8;
        let ReflectMut::Scalar(scalar) = value.reflect_mut() else {
            panic!("i8 is a scalar");
        };
        assert_eq!(scalar.store(ScalarValue::Int(300)), Err(ScalarValue::Int(300)));
        assert!(scalar.store(ScalarValue::Uint(1)).is_err());
        assert!(scalar.store(ScalarValue::Int(-128)).is_ok());
        assert_eq!(scalar.scalar_ref(), ScalarRef::Int(-128));
        assert_eq!(value, -128);
    }

    #[test]
    fn set_and_take() {
        let mut value = String::from("a");
        assert!(value.set(Box::new(String::from("b"))).is_ok());
        assert_eq!(value, "b");
        assert!(value.set(Box::new(1_u8)).is_err());

        let boxed: Box<dyn Reflect> = Box::new(7_u32);
        assert!(boxed.reflect_eq(&7_u32));
        assert!(!boxed.reflect_eq(&7_u64));
        assert_eq!(boxed.take::<u32>().ok(), Some(7));
    }
}
