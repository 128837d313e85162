//! Numeric literal conversion
//!
//! The lexer has already validated the shape of every lexeme passed here, so
//! the integer converters only fail when the value does not fit into an `i64`.
//! Parsing and formatting of floats go through `core`, which never looks at
//! the host locale.

/// Accumulates unsigned digits of the given radix, `None` on overflow or a stray digit
fn accumulate_digits(digits: &str, radix: u32) -> Option<u64> {
    if digits.is_empty() {
        return None;
    }
    digits.chars().try_fold(0u64, |acc, ch| {
        let digit = ch.to_digit(radix)?;
        acc.checked_mul(u64::from(radix))?
            .checked_add(u64::from(digit))
    })
}

fn to_signed(magnitude: u64, negative: bool) -> Option<i64> {
    if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    }
}

/// Converts an optionally signed decimal integer
pub fn decimal_to_int(text: &str) -> Option<i64> {
    let (negative, digits) = split_sign(text);
    to_signed(accumulate_digits(digits, 10)?, negative)
}

/// Converts an octal integer written with a leading `0`
pub fn octal_to_int(text: &str) -> Option<i64> {
    let digits = text.strip_prefix('0')?;
    if digits.is_empty() {
        return Some(0);
    }
    to_signed(accumulate_digits(digits, 8)?, false)
}

/// Converts a binary integer written with a `0b`/`0B` prefix
pub fn binary_to_int(text: &str) -> Option<i64> {
    let digits = text
        .strip_prefix("0b")
        .or_else(|| text.strip_prefix("0B"))?;
    to_signed(accumulate_digits(digits, 2)?, false)
}

/// Converts a hexadecimal integer written with a `0x`/`0X` prefix
pub fn hex_to_int(text: &str) -> Option<i64> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))?;
    to_signed(accumulate_digits(digits, 16)?, false)
}

fn split_sign(text: &str) -> (bool, &str) {
    if let Some(rest) = text.strip_prefix('-') {
        (true, rest)
    } else if let Some(rest) = text.strip_prefix('+') {
        (false, rest)
    } else {
        (false, text)
    }
}

/// Converts a float literal in any of the accepted shapes
///
/// Accepted forms are `12e3`, `12.` / `12.e3` and `.5` / `1.5` / `1.5e-3`, each
/// with an optional sign on the mantissa and on the exponent. The result is the
/// nearest `f64`, including subnormals; exponents past the `f64` range give
/// infinity or zero. `None` when `text` is not one of these shapes.
pub fn to_float(text: &str) -> Option<f64> {
    text.parse().ok()
}

/// Formats a float so that it reads back as a float literal
///
/// Magnitudes between `1e-5` and `1e16` use plain positional notation with at
/// least one fractional digit; everything else uses an exponent. Non-finite
/// values come out as `inf`, `-inf` and `NaN`.
pub fn float_to_text(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let magnitude = value.abs();
    if magnitude != 0.0 && !(1e-5..1e16).contains(&magnitude) {
        return format!("{value:e}");
    }
    let mut text = value.to_string();
    if !text.contains(['.', 'e', 'E']) {
        text.push_str(".0");
    }
    text
}
