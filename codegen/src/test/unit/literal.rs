use test_case::test_case;

use crate::opencl::literal::{escaped_string, hexfloat};

#[test_case(1.0, "0x1p+0")]
#[test_case(-1.0, "-0x1p+0")]
#[test_case(0.0, "0x0p+0")]
#[test_case(-0.0, "-0x0p+0")]
#[test_case(0.5, "0x1p-1")]
#[test_case(3.0, "0x1.8p+1")]
#[test_case(std::f64::consts::FRAC_1_SQRT_2, "0x1.6a09e667f3bcdp-1")]
#[test_case(f64::MIN_POSITIVE / 2.0, "0x0.8p-1022")]
#[test_case(f64::INFINITY, "INFINITY")]
fn test_hexfloat(value: f64, expected: &str) {
    assert_eq!(hexfloat(value), expected);
}

#[test]
fn test_hexfloat_is_exact() {
    for v in [0.1f64, 1.0 / 3.0, -123.456, 6.02214076e23, 1e-300] {
        let s = hexfloat(v);
        let (mantissa, exponent) = s.trim_start_matches('-').trim_start_matches("0x").split_once('p').expect("exponent");
        let (lead, frac) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        let mut m = lead.parse::<u64>().expect("lead digit") as f64;
        let mut scale = 1.0 / 16.0;
        for d in frac.chars() {
            m += d.to_digit(16).expect("hex digit") as f64 * scale;
            scale /= 16.0;
        }
        let e: i32 = exponent.parse().expect("decimal exponent");
        let back = m * 2f64.powi(e) * if v < 0.0 { -1.0 } else { 1.0 };
        assert_eq!(back, v, "{s}");
    }
}

#[test]
fn test_escapes() {
    assert_eq!(escaped_string("%d\n"), "%d\\n");
    assert_eq!(escaped_string("tab\there"), "tab\\there");
    assert_eq!(escaped_string("back\\slash"), "back\\\\slash");
    assert_eq!(escaped_string("plain"), "plain");
}
