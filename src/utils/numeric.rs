//! Integer and float helpers shared by the timing model and the text codec
//!
//! The text emitter relies on [`format_g`] to reproduce C-style `%g`
//! formatting, so tempo/offset/scroll values round-trip through text
//! without picking up single-precision noise (e.g. `133.300003`).

fn gcd_i64(mut a: i64, mut b: i64) -> i64 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/// Greatest common divisor, always non-negative (saturates at `i32::MAX` for `i32::MIN`)
pub fn gcd(a: i32, b: i32) -> i32 {
    let divisor = gcd_i64((a as i64).abs(), (b as i64).abs());
    i32::try_from(divisor).unwrap_or(i32::MAX)
}

/// Least common multiple, always non-negative (0 if either input is 0), saturating at `i32::MAX`
pub fn lcm(a: i32, b: i32) -> i32 {
    if a == 0 || b == 0 {
        return 0;
    }
    let (a, b) = ((a as i64).abs(), (b as i64).abs());
    i32::try_from(a / gcd_i64(a, b) * b).unwrap_or(i32::MAX)
}

/// Format a float the way C's `printf("%g")` does (6 significant digits,
/// trailing zeros trimmed, scientific notation outside `1e-4..1e6`)
pub fn format_g(value: f64) -> String {
    const PRECISION: i32 = 6;

    if value.is_nan() {
        return "nan".to_string();
    }
    if value.is_infinite() {
        return if value < 0.0 { "-inf".to_string() } else { "inf".to_string() };
    }
    if value == 0.0 {
        return "0".to_string();
    }

    // Let the formatter do the rounding, then read the decimal exponent back
    let scientific = format!("{:.*e}", (PRECISION - 1) as usize, value);
    let (mantissa, exponent) = match scientific.split_once('e') {
        Some(parts) => parts,
        None => return scientific,
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if exponent < -4 || exponent >= PRECISION {
        let mantissa = trim_fraction_zeros(mantissa);
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}e{}{:02}", mantissa, sign, exponent.abs())
    } else {
        let decimals = (PRECISION - 1 - exponent).max(0) as usize;
        trim_fraction_zeros(&format!("{:.*}", decimals, value)).to_string()
    }
}

/// Format a single-precision value through [`format_g`]
pub fn format_g32(value: f32) -> String {
    format_g(value as f64)
}

fn trim_fraction_zeros(s: &str) -> &str {
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s
    }
}

/// Approximate float equality used when deciding whether to emit optional properties
pub fn approximately_same(a: f32, b: f32) -> bool {
    (a - b).abs() < 0.0001
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gcd_handles_signs_and_zero() {
        assert_eq!(gcd(12, 18), 6);
        assert_eq!(gcd(-12, 18), 6);
        assert_eq!(gcd(0, 7), 7);
        assert_eq!(gcd(0, 0), 0);
        assert_eq!(gcd(i32::MIN + 1, 1), 1);
        assert_eq!(gcd(i32::MIN, 0), i32::MAX);
    }

    #[test]
    fn test_lcm() {
        assert_eq!(lcm(4, 6), 12);
        assert_eq!(lcm(8, 4), 8);
        assert_eq!(lcm(0, 4), 0);
        assert_eq!(lcm(-3, 4), 12);
        assert_eq!(lcm(i32::MAX, i32::MAX - 1), i32::MAX);
        assert_eq!(lcm(65536, 65537), i32::MAX);
    }

    #[test]
    fn test_format_g_matches_printf() {
        assert_eq!(format_g(120.0), "120");
        assert_eq!(format_g(120.5), "120.5");
        assert_eq!(format_g(-1.25), "-1.25");
        assert_eq!(format_g(0.0), "0");
        assert_eq!(format_g(0.0001), "0.0001");
        assert_eq!(format_g(0.00001), "1e-05");
        assert_eq!(format_g(1234567.0), "1.23457e+06");
        assert_eq!(format_g(1.0 / 3.0), "0.333333");
    }

    #[test]
    fn test_format_g32_hides_single_precision_noise() {
        assert_eq!(format_g32(133.3), "133.3");
        assert_eq!(format_g32(0.017), "0.017");
    }
}
