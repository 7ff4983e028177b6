use fftgen_ir::prelude::*;
use proptest::prelude::*;

use crate::opencl::expr_to_string;
use crate::opencl::literal::hexfloat;

/// Bit pattern spelled by a finite `hexfloat` result.
fn hexfloat_bits(text: &str) -> u64 {
    let (sign, body) = match text.strip_prefix('-') {
        Some(rest) => (1u64 << 63, rest),
        None => (0, text),
    };
    let body = body.strip_prefix("0x").unwrap();
    let (mantissa, exponent) = body.split_once('p').unwrap();
    let exponent: i64 = exponent.parse().unwrap();
    let (lead, digits) = mantissa.split_once('.').unwrap_or((mantissa, ""));
    let fraction = u64::from_str_radix(&format!("{digits:0<13}"), 16).unwrap();
    match lead {
        "0" => sign | fraction,
        _ => sign | (((exponent + 1023) as u64) << 52) | fraction,
    }
}

#[derive(Debug, Clone, Copy)]
enum Prefix {
    Minus,
    Not,
}

fn sign_chain() -> impl Strategy<Value = (Vec<Prefix>, i64)> {
    (prop::collection::vec(prop_oneof![Just(Prefix::Minus), Just(Prefix::Not)], 1..6), -3i64..3)
}

proptest! {
    #[test]
    fn hexfloat_is_exact(bits in any::<u64>()) {
        let value = f64::from_bits(bits);
        prop_assume!(value.is_finite());
        let text = hexfloat(value);
        prop_assert_eq!(hexfloat_bits(&text), bits, "{}", text);
    }

    #[test]
    fn prefix_chains_never_form_decrements((chain, leaf) in sign_chain()) {
        let mut e = Expr::from(leaf);
        for prefix in chain.iter().rev() {
            e = match prefix {
                Prefix::Minus => -e,
                Prefix::Not => !e,
            };
        }
        let text = expr_to_string(&e);
        prop_assert!(!text.contains("--"), "{}", text);
        let minus = chain.iter().filter(|p| matches!(p, Prefix::Minus)).count() + usize::from(leaf < 0);
        prop_assert_eq!(text.matches('-').count(), minus, "{}", text);
    }
}
