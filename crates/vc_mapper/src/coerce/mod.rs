//! Conversion between text, dynamic values and typed fields.
//!
//! - [`text_to_value`]: parse text into a scalar field.
//! - [`value_to_text`]: format a scalar field as text.
//! - [`assign_dynamic`]: assign a value of another type into a field,
//!   converting lists and maps element-wise and scalars through text.

// -----------------------------------------------------------------------------
// Modules

mod error;
mod parse;

// -----------------------------------------------------------------------------
// Exports

pub use error::CoerceError;

pub(crate) use parse::{ParseError, float_to_int, float_to_uint};
pub(crate) use parse::{parse_bool, parse_int, parse_uint};

use alloc::format;
use alloc::string::{String, ToString};
use core::fmt::{Display, LowerExp};

use crate::Reflect;
use crate::access::alloc_indirect;
use crate::info::TypeInfo;
use crate::ops::{ReflectMut, ReflectRef, ScalarRef};

// -----------------------------------------------------------------------------
// Text

/// Parse `text` into `target`.
///
/// An empty text sets an `Option` target to `None`, other `None` links are
/// allocated. Integers accept base prefixes and float texts that are exact
/// integers, e.g. `"10.000"`.
///
/// The target is only modified when the parsing succeeded.
///
/// # Example
///
/// ```
/// use vc_mapper::coerce::text_to_value;
///
/// let mut value = 0_i32;
/// text_to_value("0x10", &mut value).unwrap();
/// assert_eq!(value, 16);
///
/// assert!(text_to_value("10.5", &mut value).is_err());
/// assert_eq!(value, 16);
///
/// let mut option = Some(1_u8);
/// text_to_value("", &mut option).unwrap();
/// assert_eq!(option, None);
/// ```
pub fn text_to_value(text: &str, target: &mut dyn Reflect) -> Result<(), CoerceError> {
    if text.is_empty()
        && let ReflectMut::Option(option) = target.reflect_mut()
    {
        option.clear();
        return Ok(());
    }

    let info = target.reflect_type_info().deref();
    let type_path = info.type_path();
    let TypeInfo::Scalar(scalar) = info else {
        return Err(CoerceError::UnsupportedKind { type_path });
    };
    let value =
        parse::parse_scalar(text, scalar.kind()).map_err(|err| err.into_coerce(text, type_path))?;

    let ReflectMut::Scalar(target) = alloc_indirect(target).reflect_mut() else {
        return Err(CoerceError::UnsupportedKind { type_path });
    };
    target.store(value).map_err(|_| CoerceError::OutOfRange {
        text: text.to_string(),
        type_path,
    })
}

/// Format a scalar value as text.
///
/// `None` and an empty [`Dynamic`](crate::ops::Dynamic) give `""`,
/// floats use the shortest text that parses back to the same value, in
/// exponent form below `1e-4` and from `1e6` on.
///
/// ```
/// use vc_mapper::coerce::value_to_text;
///
/// assert_eq!(value_to_text(&-12_i8).unwrap(), "-12");
/// assert_eq!(value_to_text(&0.1_f32).unwrap(), "0.1");
/// assert_eq!(value_to_text(&1e300_f64).unwrap(), "1e+300");
/// assert_eq!(value_to_text(&Some(true)).unwrap(), "true");
/// assert_eq!(value_to_text(&Option::<u8>::None).unwrap(), "");
/// assert!(value_to_text(&vec![1_u8]).is_err());
/// ```
pub fn value_to_text(value: &dyn Reflect) -> Result<String, CoerceError> {
    match value.reflect_ref() {
        ReflectRef::Option(option) => match option.get() {
            Some(value) => value_to_text(value),
            None => Ok(String::new()),
        },
        ReflectRef::Dynamic(dynamic) => match dynamic.get() {
            Some(value) => value_to_text(value),
            None => Ok(String::new()),
        },
        ReflectRef::Scalar(scalar) => Ok(match scalar.scalar_ref() {
            ScalarRef::Bool(value) => value.to_string(),
            ScalarRef::Int(value) => value.to_string(),
            ScalarRef::Uint(value) => value.to_string(),
            ScalarRef::F32(value) => float_text(value),
            ScalarRef::F64(value) => float_text(value),
            ScalarRef::Str(value) => value.to_string(),
        }),
        _ => Err(CoerceError::UnsupportedKind {
            type_path: value.reflect_type_path(),
        }),
    }
}

fn float_text<T: Display + LowerExp>(value: T) -> String {
    let exp_form = format!("{value:e}");
    let Some((mantissa, exp)) = exp_form.split_once('e') else {
        // inf and NaN
        return value.to_string();
    };
    let Ok(exp) = exp.parse::<i32>() else {
        return value.to_string();
    };

    if (-4..6).contains(&exp) {
        value.to_string()
    } else {
        let sign = if exp < 0 { '-' } else { '+' };
        format!("{mantissa}e{sign}{:02}", exp.unsigned_abs())
    }
}

// -----------------------------------------------------------------------------
// Dynamic

/// Strip `Option` and [`Dynamic`](crate::ops::Dynamic) layers of a source value.
fn deref_source(value: &dyn Reflect) -> Option<&dyn Reflect> {
    match value.reflect_ref() {
        ReflectRef::Option(option) => deref_source(option.get()?),
        ReflectRef::Dynamic(dynamic) => deref_source(dynamic.get()?),
        _ => Some(value),
    }
}

#[cold]
fn mismatch(target: &TypeInfo, source: &dyn Reflect) -> CoerceError {
    CoerceError::TypeMismatch {
        expected: target.type_path(),
        actual: source.reflect_type_path(),
    }
}

/// Assign `source` into `target`, converting between types.
///
/// - A `None` or empty source does nothing.
/// - `None` links of the target are allocated once the value is converted.
/// - A [`Dynamic`](crate::ops::Dynamic) target holds a clone of the source.
/// - Same types are assigned by clone, other structs are rejected.
/// - Lists and maps are rebuilt element-wise, with the same rules.
/// - Scalars are converted through text, e.g. `i64` to `u8` or `String` to `f32`.
///
/// The target is only replaced when the whole value is converted.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
/// use vc_mapper::coerce::assign_dynamic;
/// use vc_mapper::ops::Dynamic;
///
/// let source = vec![Dynamic::new(1_i64), Dynamic::new(String::from("2"))];
/// let mut target: Vec<u8> = Vec::new();
/// assign_dynamic(&mut target, &source).unwrap();
/// assert_eq!(target, [1, 2]);
///
/// let source = BTreeMap::from([(String::from("1"), 1.5_f64)]);
/// let mut target: BTreeMap<u32, f32> = BTreeMap::new();
/// assign_dynamic(&mut target, &source).unwrap();
/// assert_eq!(target.get(&1), Some(&1.5));
/// ```
pub fn assign_dynamic(target: &mut dyn Reflect, source: &dyn Reflect) -> Result<(), CoerceError> {
    let Some(source) = deref_source(source) else {
        return Ok(());
    };
    let info = target.reflect_type_info().deref();
    let mut built = info.zero();
    convert_into(&mut *built, info, source)?;

    alloc_indirect(target)
        .set(built)
        .map_err(|_| mismatch(info, source))
}

/// Convert `source` into `built`, a fresh zero value of `info`.
fn convert_into(
    built: &mut dyn Reflect,
    info: &'static TypeInfo,
    source: &dyn Reflect,
) -> Result<(), CoerceError> {
    if built.ty_id() == source.ty_id() {
        return built
            .set(source.reflect_clone())
            .map_err(|_| mismatch(info, source));
    }

    match info {
        TypeInfo::Dynamic(_) => {
            if let ReflectMut::Dynamic(dynamic) = built.reflect_mut() {
                dynamic.replace(source.reflect_clone());
            }
            Ok(())
        }
        TypeInfo::List(_) => {
            let ReflectRef::List(items) = source.reflect_ref() else {
                return Err(mismatch(info, source));
            };
            if let ReflectMut::List(list) = built.reflect_mut() {
                for item in items.iter() {
                    assign_dynamic(list.push_zero(), item)?;
                }
            }
            Ok(())
        }
        TypeInfo::Map(map_info) => {
            let ReflectRef::Map(entries) = source.reflect_ref() else {
                return Err(mismatch(info, source));
            };
            if let ReflectMut::Map(map) = built.reflect_mut() {
                for (key, value) in entries.iter() {
                    let mut new_key = map_info.key_info().zero();
                    assign_dynamic(&mut *new_key, key)?;
                    let mut new_value = map_info.value_info().zero();
                    assign_dynamic(&mut *new_value, value)?;
                    map.insert_boxed(new_key, new_value)
                        .map_err(|_| mismatch(info, source))?;
                }
            }
            Ok(())
        }
        TypeInfo::Scalar(_) => {
            let text = value_to_text(source)?;
            text_to_value(&text, built)
        }
        TypeInfo::Struct(_) => Err(mismatch(info, source)),
        TypeInfo::Option(_) | TypeInfo::Opaque(_) => Err(CoerceError::UnsupportedKind {
            type_path: info.type_path(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use alloc::boxed::Box;
    use alloc::collections::BTreeMap;
    use alloc::string::{String, ToString};
    use alloc::vec;
    use alloc::vec::Vec;

    use super::*;
    use crate::derive::Reflect;
    use crate::ops::Dynamic;

    #[derive(Reflect, Default, Clone, Debug, PartialEq)]
    struct Point {
        pub x: i32,
        pub y: i32,
    }

    #[derive(Reflect, Default, Clone, Debug, PartialEq)]
    struct Other {
        pub x: i32,
    }

    macro_rules! assert_text_round_trip {
        ($($ty:ty),*) => {$(
            for value in [<$ty>::MIN, <$ty>::MAX, 0 as $ty] {
                let text = value_to_text(&value).unwrap();
                let mut target = <$ty>::default();
                text_to_value(&text, &mut target).unwrap();
                assert_eq!(target, value, "{}", text);
            }
        )*};
    }

    #[test]
    fn scalar_text_round_trip() {
        assert_text_round_trip!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);
        assert_text_round_trip!(f32, f64);

        for value in [-1.25_f64, 1e300, 0.1, -0.0] {
            let mut target = 0.0_f64;
            text_to_value(&value_to_text(&value).unwrap(), &mut target).unwrap();
            assert_eq!(target.to_bits(), value.to_bits());
        }
        for value in [true, false] {
            let mut target = !value;
            text_to_value(&value_to_text(&value).unwrap(), &mut target).unwrap();
            assert_eq!(target, value);
        }
    }

    #[test]
    fn float_text_exponent() {
        assert_eq!(value_to_text(&1e300_f64).unwrap(), "1e+300");
        assert_eq!(value_to_text(&1.5e-7_f64).unwrap(), "1.5e-07");
        assert_eq!(value_to_text(&-2.5e20_f64).unwrap(), "-2.5e+20");
        assert_eq!(value_to_text(&1e6_f32).unwrap(), "1e+06");
        assert_eq!(value_to_text(&123456.0_f64).unwrap(), "123456");
        assert_eq!(value_to_text(&0.0001_f64).unwrap(), "0.0001");
        assert_eq!(value_to_text(&100.0_f64).unwrap(), "100");
        assert_eq!(value_to_text(&-0.0_f64).unwrap(), "-0");
        assert_eq!(value_to_text(&f64::INFINITY).unwrap(), "inf");

        for value in [1e300_f64, 1.5e-7, f64::MIN_POSITIVE, f64::MAX] {
            let mut target = 0.0_f64;
            text_to_value(&value_to_text(&value).unwrap(), &mut target).unwrap();
            assert_eq!(target, value);
        }
    }

    #[test]
    fn integer_from_float_text() {
        let mut value = 0_i64;
        text_to_value("10.000", &mut value).unwrap();
        assert_eq!(value, 10);

        let err = text_to_value("10.5", &mut value).unwrap_err();
        assert!(matches!(err, CoerceError::NotAnInteger { .. }));
        assert_eq!(value, 10);

        let mut small = 0_u8;
        let err = text_to_value("256", &mut small).unwrap_err();
        assert_eq!(
            err,
            CoerceError::OutOfRange {
                text: "256".to_string(),
                type_path: "u8",
            }
        );
    }

    #[test]
    fn option_target() {
        let mut value: Option<Box<u16>> = None;
        assert!(text_to_value("x", &mut value).is_err());
        assert_eq!(value, None);

        text_to_value("7", &mut value).unwrap();
        assert_eq!(value.as_deref(), Some(&7));

        text_to_value("", &mut value).unwrap();
        assert_eq!(value, None);

        let mut text = String::from("old");
        text_to_value("", &mut text).unwrap();
        assert_eq!(text, "");
    }

    #[test]
    fn unsupported_kinds() {
        let mut point = Point::default();
        assert!(matches!(
            text_to_value("1", &mut point),
            Err(CoerceError::UnsupportedKind { .. })
        ));
        assert!(value_to_text(&point).is_err());
        assert_eq!(value_to_text(&Dynamic::nil()).unwrap(), "");
        assert_eq!(value_to_text(&Dynamic::new(3_u8)).unwrap(), "3");
    }

    #[test]
    fn assign_same_type_and_mismatch() {
        let mut point = Point::default();
        assign_dynamic(&mut point, &Point { x: 1, y: 2 }).unwrap();
        assert_eq!(point, Point { x: 1, y: 2 });

        let err = assign_dynamic(&mut point, &Other { x: 3 }).unwrap_err();
        assert!(matches!(err, CoerceError::TypeMismatch { .. }));
        assert_eq!(point, Point { x: 1, y: 2 });

        let mut target: Option<Box<Point>> = None;
        assign_dynamic(&mut target, &Dynamic::new(Point { x: 5, y: 6 })).unwrap();
        assert_eq!(target.as_deref(), Some(&Point { x: 5, y: 6 }));
    }

    #[test]
    fn failed_assign_keeps_none() {
        let mut value: Option<u8> = None;
        assert!(assign_dynamic(&mut value, &String::from("abc")).is_err());
        assert_eq!(value, None);

        let mut list: Option<Box<Vec<u8>>> = None;
        let source = vec![Dynamic::new(1_i64), Dynamic::new(String::from("x"))];
        assert!(assign_dynamic(&mut list, &source).is_err());
        assert_eq!(list, None);

        assign_dynamic(&mut value, &String::from("12")).unwrap();
        assert_eq!(value, Some(12));
    }

    #[test]
    fn assign_nil_is_noop() {
        let mut value = 3_i32;
        assign_dynamic(&mut value, &Dynamic::nil()).unwrap();
        assign_dynamic(&mut value, &Option::<i32>::None).unwrap();
        assert_eq!(value, 3);
    }

    #[test]
    fn assign_into_dynamic() {
        let mut value = Dynamic::nil();
        assign_dynamic(&mut value, &Some(8_u16)).unwrap();
        assert_eq!(value.downcast_ref::<u16>(), Some(&8));
    }

    #[test]
    fn assign_collections() {
        let source: Vec<Dynamic> = vec![Dynamic::new(1.0_f64), Dynamic::new(String::from("2"))];
        let mut target: Vec<Option<i8>> = vec![Some(9)];
        assign_dynamic(&mut target, &source).unwrap();
        assert_eq!(target, [Some(1), Some(2)]);

        // A failed element leaves the target untouched.
        let source = vec![Dynamic::new(1_i64), Dynamic::new(1000_i64)];
        let mut target: Vec<u8> = vec![4];
        assert!(assign_dynamic(&mut target, &source).is_err());
        assert_eq!(target, [4]);

        let source = BTreeMap::from([
            (String::from("a"), Dynamic::new(vec![Dynamic::new(1_i64)])),
            (String::from("b"), Dynamic::nil()),
        ]);
        let mut target: BTreeMap<String, Vec<u64>> = BTreeMap::new();
        assign_dynamic(&mut target, &source).unwrap();
        assert_eq!(target.get("a"), Some(&vec![1]));
        assert_eq!(target.get("b"), Some(&Vec::new()));

        let mut list: Vec<u8> = Vec::new();
        assert!(matches!(
            assign_dynamic(&mut list, &5_i32),
            Err(CoerceError::TypeMismatch { .. })
        ));
    }
}
