//! Typing of plain scalars.

use crate::value::{Number, Value};

/// Infers the typed value of a plain (unquoted) scalar.
pub(crate) fn infer(plain: &str) -> Value {
    match plain {
        "" | "~" | "null" | "Null" | "NULL" => return Value::Null,
        "true" | "True" | "TRUE" => return Value::Bool(true),
        "false" | "False" | "FALSE" => return Value::Bool(false),
        ".inf" | ".Inf" | ".INF" | "+.inf" | "+.Inf" | "+.INF" => {
            return Value::Number(Number::Float(f64::INFINITY))
        }
        "-.inf" | "-.Inf" | "-.INF" => return Value::Number(Number::Float(f64::NEG_INFINITY)),
        ".nan" | ".NaN" | ".NAN" => return Value::Number(Number::Float(f64::NAN)),
        _ => {}
    }

    if let Some(n) = parse_int(plain) {
        return Value::Number(n);
    }
    if is_float_literal(plain) {
        if let Ok(f) = plain.trim_start_matches('+').parse::<f64>() {
            return Value::Number(Number::Float(f));
        }
    }
    Value::String(plain.to_string())
}

/// Parses decimal, `0x` and `0o` integers. Decimal literals that overflow
/// `i64` fall through to float parsing.
fn parse_int(s: &str) -> Option<Number> {
    if let Some(hex) = s.strip_prefix("0x") {
        return i64::from_str_radix(hex, 16).ok().map(Number::Int);
    }
    if let Some(oct) = s.strip_prefix("0o") {
        return i64::from_str_radix(oct, 8).ok().map(Number::Int);
    }
    let digits = s.strip_prefix(['-', '+']).unwrap_or(s);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.trim_start_matches('+').parse::<i64>().ok().map(Number::Int)
}

/// `[-+]? ( \.[0-9]+ | [0-9]+ ( \.[0-9]* )? ) ( [eE] [-+]? [0-9]+ )?`
fn is_float_literal(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    if matches!(bytes.first(), Some(b'-') | Some(b'+')) {
        i += 1;
    }
    let int_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;
    let mut frac_digits = 0;
    if i < bytes.len() && bytes[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        frac_digits = i - frac_start;
    }
    if int_digits == 0 && frac_digits == 0 {
        return false;
    }
    if i < bytes.len() && (bytes[i] == b'e' || bytes[i] == b'E') {
        i += 1;
        if matches!(bytes.get(i), Some(b'-') | Some(b'+')) {
            i += 1;
        }
        let exp_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }
    i == bytes.len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_null_and_bool() {
        for s in ["", "~", "null", "Null", "NULL"] {
            assert_eq!(infer(s), Value::Null, "{s:?}");
        }
        assert_eq!(infer("true"), Value::Bool(true));
        assert_eq!(infer("FALSE"), Value::Bool(false));
        assert_eq!(infer("yes"), Value::String("yes".to_string()));
    }

    #[test]
    fn test_infer_numbers() {
        assert_eq!(infer("42"), Value::Number(Number::Int(42)));
        assert_eq!(infer("-7"), Value::Number(Number::Int(-7)));
        assert_eq!(infer("+3"), Value::Number(Number::Int(3)));
        assert_eq!(infer("0x1f"), Value::Number(Number::Int(31)));
        assert_eq!(infer("0o17"), Value::Number(Number::Int(15)));
        assert_eq!(infer("1.5"), Value::Number(Number::Float(1.5)));
        assert_eq!(infer(".5"), Value::Number(Number::Float(0.5)));
        assert_eq!(infer("1e3"), Value::Number(Number::Float(1000.0)));
        assert_eq!(infer("-2.5E-1"), Value::Number(Number::Float(-0.25)));
        assert_eq!(
            infer("99999999999999999999"),
            Value::Number(Number::Float(1e20))
        );
        assert!(matches!(infer(".nan"), Value::Number(Number::Float(f)) if f.is_nan()));
    }

    #[test]
    fn test_infer_strings() {
        for s in ["2023-05-10", "1.2.3", "e5", "1e", "-", ".", "0xZZ", "hello world"] {
            assert_eq!(infer(s), Value::String(s.to_string()), "{s:?}");
        }
    }
}
