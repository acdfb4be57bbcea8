//! Lenient numeric parsing for sensor states.
//!
//! Sensor states are free-form strings such as `"87.6"`, `"87 %"` or
//! `"unavailable"`. The longest numeric prefix is parsed; anything without one
//! is absent.

/// Parse the longest leading decimal literal, ignoring leading whitespace.
pub fn parse_float_prefix(input: &str) -> Option<f64> {
    let s = input.trim_start();
    let bytes = s.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }

    if s[end..].starts_with("Infinity") {
        return Some(if bytes[0] == b'-' {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }

    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    s[..end].parse().ok()
}

/// Round half-way cases towards positive infinity (`-67.5` becomes `-67`).
pub fn round_half_up(value: f64) -> f64 {
    let floor = value.floor();
    if value - floor >= 0.5 {
        floor + 1.0
    } else {
        floor
    }
}

/// Parse a sensor state into a rounded integer.
///
/// Non-finite values and values outside the `i64` range are absent.
pub fn parse_rounded(input: &str) -> Option<i64> {
    parse_float_prefix(input)
        .filter(|value| value.is_finite())
        .map(round_half_up)
        .filter(|value| (i64::MIN as f64..i64::MAX as f64).contains(value))
        .map(|value| value as i64)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_numbers() {
        assert_eq!(parse_float_prefix("87.6"), Some(87.6));
        assert_eq!(parse_float_prefix("-61"), Some(-61.0));
        assert_eq!(parse_float_prefix("+3"), Some(3.0));
        assert_eq!(parse_float_prefix(".5"), Some(0.5));
        assert_eq!(parse_float_prefix("5."), Some(5.0));
        assert_eq!(parse_float_prefix("1e3"), Some(1000.0));
    }

    #[test]
    fn test_parse_numeric_prefix() {
        assert_eq!(parse_float_prefix("  42 %"), Some(42.0));
        assert_eq!(parse_float_prefix("87.6%"), Some(87.6));
        assert_eq!(parse_float_prefix("12e"), Some(12.0));
        assert_eq!(parse_float_prefix("12e+"), Some(12.0));
        assert_eq!(parse_float_prefix("1.2.3"), Some(1.2));
    }

    #[test]
    fn test_parse_no_number() {
        assert_eq!(parse_float_prefix("not-a-number"), None);
        assert_eq!(parse_float_prefix("unavailable"), None);
        assert_eq!(parse_float_prefix(""), None);
        assert_eq!(parse_float_prefix("-"), None);
        assert_eq!(parse_float_prefix("."), None);
        assert_eq!(parse_float_prefix("NaN"), None);
    }

    #[test]
    fn test_parse_infinity() {
        assert_eq!(parse_float_prefix("Infinity"), Some(f64::INFINITY));
        assert_eq!(parse_float_prefix("-Infinity"), Some(f64::NEG_INFINITY));
        assert_eq!(parse_rounded("Infinity"), None);
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(parse_rounded("87.6"), Some(88));
        assert_eq!(parse_rounded("87.5"), Some(88));
        assert_eq!(parse_rounded("87.4"), Some(87));
        assert_eq!(parse_rounded("-67.5"), Some(-67));
        assert_eq!(parse_rounded("-67.6"), Some(-68));
        assert_eq!(parse_rounded("0"), Some(0));
    }

    #[test]
    fn test_round_half_up_float_edges() {
        assert_eq!(round_half_up(0.49999999999999994), 0.0);
        assert_eq!(round_half_up(-0.5), 0.0);
        assert_eq!(round_half_up(4503599627370497.0), 4503599627370497.0);
        assert_eq!(parse_rounded("4503599627370497"), Some(4503599627370497));
    }

    #[test]
    fn test_out_of_range_is_absent() {
        assert_eq!(parse_rounded("1e300"), None);
        assert_eq!(parse_rounded("-1e300"), None);
        assert_eq!(parse_rounded("9223372036854775808"), None);
    }
}
