use alloc::string::ToString;

use crate::coerce::CoerceError;
use crate::info::ScalarKind;
use crate::ops::ScalarValue;

// -----------------------------------------------------------------------------
// Constants

/// The integer range that a `f64` represents exactly.
const MIN_INT53: i64 = -2251799813685248;
const MAX_INT53: i64 = 2251799813685247;
const MAX_UINT53: u64 = 4503599627370495;

// -----------------------------------------------------------------------------
// ParseError

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParseError {
    InvalidSyntax,
    OutOfRange,
    NotAnInteger,
}

impl ParseError {
    #[cold]
    pub(crate) fn into_coerce(self, text: &str, type_path: &'static str) -> CoerceError {
        let text = text.to_string();
        match self {
            Self::InvalidSyntax => CoerceError::InvalidSyntax { text, type_path },
            Self::OutOfRange => CoerceError::OutOfRange { text, type_path },
            Self::NotAnInteger => CoerceError::NotAnInteger { text, type_path },
        }
    }
}

// -----------------------------------------------------------------------------
// Scalars

/// Parse `text` into a value of the given scalar kind.
pub(crate) fn parse_scalar(text: &str, kind: ScalarKind) -> Result<ScalarValue, ParseError> {
    match kind {
        ScalarKind::Bool => parse_bool(text)
            .map(ScalarValue::Bool)
            .ok_or(ParseError::InvalidSyntax),
        ScalarKind::Int(bits) => parse_int(text, bits).map(ScalarValue::Int),
        ScalarKind::Uint(bits) => parse_uint(text, bits).map(ScalarValue::Uint),
        ScalarKind::Float(32) => parse_f32(text).map(ScalarValue::F32),
        ScalarKind::Float(_) => parse_f64(text).map(ScalarValue::F64),
        ScalarKind::Str => Ok(ScalarValue::Str(text.to_string())),
    }
}

/// Accepts `1, t, T, TRUE, true, True, 0, f, F, FALSE, false, False`.
pub(crate) fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

/// Parse a signed integer that fits in `bits`.
///
/// Integer literals may carry a base prefix, a float text is accepted if it
/// represents an integer exactly, e.g. `"10.000"`.
pub(crate) fn parse_int(text: &str, bits: u32) -> Result<i64, ParseError> {
    let value = match parse_int_literal(text) {
        Ok(value) => value,
        Err(error) => match text.parse::<f64>() {
            Ok(float) => float_to_int(float)?,
            Err(_) => return Err(error),
        },
    };
    if bits < 64 {
        let max = (1_i64 << (bits - 1)) - 1;
        if !(-max - 1..=max).contains(&value) {
            return Err(ParseError::OutOfRange);
        }
    }
    Ok(value)
}

/// Parse an unsigned integer that fits in `bits`, see [`parse_int`].
pub(crate) fn parse_uint(text: &str, bits: u32) -> Result<u64, ParseError> {
    let value = match parse_uint_literal(text) {
        Ok(value) => value,
        Err(error) => match text.parse::<f64>() {
            Ok(float) => float_to_uint(float)?,
            Err(_) => return Err(error),
        },
    };
    if bits < 64 && value > (1_u64 << bits) - 1 {
        return Err(ParseError::OutOfRange);
    }
    Ok(value)
}

fn parse_f32(text: &str) -> Result<f32, ParseError> {
    let value = text.parse::<f32>().map_err(|_| ParseError::InvalidSyntax)?;
    if value.is_infinite() && !is_infinite_literal(text) {
        return Err(ParseError::OutOfRange);
    }
    Ok(value)
}

fn parse_f64(text: &str) -> Result<f64, ParseError> {
    let value = text.parse::<f64>().map_err(|_| ParseError::InvalidSyntax)?;
    if value.is_infinite() && !is_infinite_literal(text) {
        return Err(ParseError::OutOfRange);
    }
    Ok(value)
}

fn is_infinite_literal(text: &str) -> bool {
    let (_, digits) = split_sign(text);
    digits.eq_ignore_ascii_case("inf") || digits.eq_ignore_ascii_case("infinity")
}

// -----------------------------------------------------------------------------
// Float fallback

pub(crate) fn float_to_int(value: f64) -> Result<i64, ParseError> {
    if value.is_infinite() {
        return Err(ParseError::OutOfRange);
    }
    if value.fract() != 0.0 || value.is_nan() {
        return Err(ParseError::NotAnInteger);
    }
    if value < MIN_INT53 as f64 || value > MAX_INT53 as f64 {
        return Err(ParseError::OutOfRange);
    }
    Ok(value as i64)
}

pub(crate) fn float_to_uint(value: f64) -> Result<u64, ParseError> {
    if value.is_infinite() {
        return Err(ParseError::OutOfRange);
    }
    if value.fract() != 0.0 || value.is_nan() {
        return Err(ParseError::NotAnInteger);
    }
    if value < 0.0 || value > MAX_UINT53 as f64 {
        return Err(ParseError::OutOfRange);
    }
    Ok(value as u64)
}

// -----------------------------------------------------------------------------
// Integer literals

fn split_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (false, rest)
    } else {
        (false, text)
    }
}

fn parse_int_literal(text: &str) -> Result<i64, ParseError> {
    let (negative, digits) = split_sign(text);
    let magnitude = parse_magnitude(digits)?;
    if negative {
        0_i64
            .checked_sub_unsigned(magnitude)
            .ok_or(ParseError::OutOfRange)
    } else {
        i64::try_from(magnitude).map_err(|_| ParseError::OutOfRange)
    }
}

fn parse_uint_literal(text: &str) -> Result<u64, ParseError> {
    let (negative, digits) = split_sign(text);
    let magnitude = parse_magnitude(digits)?;
    if negative && magnitude != 0 {
        return Err(ParseError::OutOfRange);
    }
    Ok(magnitude)
}

/// Parse an unsigned literal with base detection.
///
/// `0b`, `0o`, `0x` and a leading `0` select the base,
/// `_` may separate digits.
fn parse_magnitude(text: &str) -> Result<u64, ParseError> {
    let bytes = text.as_bytes();
    if bytes.is_empty() {
        return Err(ParseError::InvalidSyntax);
    }

    let (radix, digits) = if bytes[0] != b'0' {
        (10, text)
    } else if bytes.len() >= 3 {
        match bytes[1].to_ascii_lowercase() {
            b'b' => (2, &text[2..]),
            b'o' => (8, &text[2..]),
            b'x' => (16, &text[2..]),
            _ => (8, &text[1..]),
        }
    } else {
        (8, &text[1..])
    };

    let mut value: u64 = 0;
    let mut underscores = false;
    for c in digits.chars() {
        if c == '_' {
            underscores = true;
            continue;
        }
        let digit = c.to_digit(radix).ok_or(ParseError::InvalidSyntax)?;
        value = value
            .checked_mul(u64::from(radix))
            .and_then(|value| value.checked_add(u64::from(digit)))
            .ok_or(ParseError::OutOfRange)?;
    }

    if underscores && !underscore_ok(text) {
        return Err(ParseError::InvalidSyntax);
    }
    Ok(value)
}

/// Underscores may only appear between digits,
/// or between a base prefix and a digit.
fn underscore_ok(text: &str) -> bool {
    #[derive(PartialEq, Eq)]
    enum Saw {
        Start,
        Digit,
        Underscore,
        Other,
    }

    let bytes = text.as_bytes();
    let mut saw = Saw::Start;
    let mut index = 0;
    let mut hex = false;
    if bytes.len() >= 2 && bytes[0] == b'0' {
        let prefix = bytes[1].to_ascii_lowercase();
        if matches!(prefix, b'b' | b'o' | b'x') {
            index = 2;
            saw = Saw::Digit;
            hex = prefix == b'x';
        }
    }

    for &byte in &bytes[index..] {
        if byte.is_ascii_digit() || (hex && byte.is_ascii_hexdigit()) {
            saw = Saw::Digit;
            continue;
        }
        if byte == b'_' {
            if saw != Saw::Digit {
                return false;
            }
            saw = Saw::Underscore;
            continue;
        }
        if saw == Saw::Underscore {
            return false;
        }
        saw = Saw::Other;
    }
    saw != Saw::Underscore
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_prefixes() {
        assert_eq!(parse_int("0x1F", 64), Ok(31));
        assert_eq!(parse_int("-0b101", 64), Ok(-5));
        assert_eq!(parse_int("0o17", 64), Ok(15));
        assert_eq!(parse_int("017", 64), Ok(15));
        assert_eq!(parse_int("0", 64), Ok(0));
        assert_eq!(parse_int("+42", 64), Ok(42));
        assert_eq!(parse_int("0x", 64), Err(ParseError::InvalidSyntax));
        assert_eq!(parse_int("0b2", 64), Err(ParseError::InvalidSyntax));
        // Not an octal literal, but a valid float text.
        assert_eq!(parse_int("089", 64), Ok(89));
    }

    #[test]
    fn underscores() {
        assert_eq!(parse_int("1_000", 64), Ok(1000));
        assert_eq!(parse_int("0x_ff", 64), Ok(255));
        assert_eq!(parse_int("1__0", 64), Err(ParseError::InvalidSyntax));
        assert_eq!(parse_int("10_", 64), Err(ParseError::InvalidSyntax));
        assert_eq!(parse_uint("_1", 64), Err(ParseError::InvalidSyntax));
    }

    #[test]
    fn float_fallback() {
        assert_eq!(parse_int("10.000", 64), Ok(10));
        assert_eq!(parse_int("-3e2", 64), Ok(-300));
        assert_eq!(parse_int("10.5", 64), Err(ParseError::NotAnInteger));
        assert_eq!(parse_int("1e16", 64), Err(ParseError::OutOfRange));
        assert_eq!(parse_int("-2251799813685248.0", 64), Ok(MIN_INT53));
        assert_eq!(parse_uint("4503599627370495.0", 64), Ok(MAX_UINT53));
        assert_eq!(parse_uint("-1.0", 64), Err(ParseError::OutOfRange));
        assert_eq!(parse_int("abc", 64), Err(ParseError::InvalidSyntax));
    }

    #[test]
    fn width_limits() {
        assert_eq!(parse_int("127", 8), Ok(127));
        assert_eq!(parse_int("-128", 8), Ok(-128));
        assert_eq!(parse_int("128", 8), Err(ParseError::OutOfRange));
        assert_eq!(parse_int("300.0", 8), Err(ParseError::OutOfRange));
        assert_eq!(parse_uint("255", 8), Ok(255));
        assert_eq!(parse_uint("256", 8), Err(ParseError::OutOfRange));
        assert_eq!(parse_uint("-1", 64), Err(ParseError::OutOfRange));
        assert_eq!(parse_uint("-0", 64), Ok(0));
        assert_eq!(parse_int("9223372036854775807", 64), Ok(i64::MAX));
        assert_eq!(parse_int("-9223372036854775808", 64), Ok(i64::MIN));
        assert_eq!(parse_uint("18446744073709551615", 64), Ok(u64::MAX));
        assert_eq!(
            parse_uint("18446744073709551616", 64),
            Err(ParseError::OutOfRange)
        );
    }

    #[test]
    fn floats_and_bools() {
        assert_eq!(parse_scalar("1.5", ScalarKind::Float(32)), Ok(ScalarValue::F32(1.5)));
        assert_eq!(
            parse_scalar("1e40", ScalarKind::Float(32)),
            Err(ParseError::OutOfRange)
        );
        assert_eq!(
            parse_scalar("-inf", ScalarKind::Float(64)),
            Ok(ScalarValue::F64(f64::NEG_INFINITY))
        );
        assert_eq!(parse_scalar("T", ScalarKind::Bool), Ok(ScalarValue::Bool(true)));
        assert_eq!(parse_scalar("no", ScalarKind::Bool), Err(ParseError::InvalidSyntax));
    }
}
