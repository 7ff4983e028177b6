use proptest::prelude::*;

use fftgen_dtype::BuiltinType;
use fftgen_ir::BinaryOp;

use crate::value::Scalar;

proptest! {
    #[test]
    fn integer_conversion_matches_casts(v in any::<i64>()) {
        prop_assert_eq!(Scalar::Int(v).convert(BuiltinType::Char), Some(Scalar::Int(v as i8 as i64)));
        prop_assert_eq!(Scalar::Int(v).convert(BuiltinType::Short), Some(Scalar::Int(v as i16 as i64)));
        prop_assert_eq!(Scalar::Int(v).convert(BuiltinType::Int), Some(Scalar::Int(v as i32 as i64)));
        prop_assert_eq!(Scalar::Int(v).convert(BuiltinType::Uint), Some(Scalar::UInt(v as u32 as u64)));
        prop_assert_eq!(Scalar::Int(v).convert(BuiltinType::Ulong), Some(Scalar::UInt(v as u64)));
    }

    #[test]
    fn float_conversion_rounds_once(v in any::<f64>().prop_filter("finite", |v| v.is_finite())) {
        let once = Scalar::Float(v).convert(BuiltinType::Float);
        prop_assert_eq!(once, Some(Scalar::Float(v as f32 as f64)));
        prop_assert_eq!(once.and_then(|s| s.convert(BuiltinType::Float)), once);
    }

    #[test]
    fn unsigned_wins_over_signed(a in any::<i32>(), b in any::<u32>()) {
        let sum = Scalar::arith(BinaryOp::Add, Scalar::Int(a as i64), Scalar::UInt(b as u64)).unwrap();
        prop_assert_eq!(sum, Scalar::UInt((a as i64 as u64).wrapping_add(b as u64)));
    }

    #[test]
    fn division_truncates_toward_zero(a in any::<i32>(), b in any::<i32>().prop_filter("nonzero", |b| *b != 0)) {
        let (a, b) = (a as i64, b as i64);
        prop_assert_eq!(Scalar::arith(BinaryOp::Divide, Scalar::Int(a), Scalar::Int(b)).unwrap(), Scalar::Int(a / b));
        prop_assert_eq!(Scalar::arith(BinaryOp::Modulo, Scalar::Int(a), Scalar::Int(b)).unwrap(), Scalar::Int(a % b));
    }
}
