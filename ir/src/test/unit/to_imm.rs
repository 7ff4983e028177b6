use crate::prelude::*;
use crate::types::Imm;

#[test]
fn test_literals() {
    assert_eq!(Expr::from(42).imm(), Some(Imm::Int(42)));
    assert_eq!(Expr::from(42u32).imm(), Some(Imm::UInt(42)));
    assert_eq!(Expr::from(42.0).imm(), Some(Imm::Float(42.0)));
}

#[test]
fn test_non_literals() {
    let a = Expr::from(42);
    let b = Expr::from(42.0);
    assert_eq!((&a + &b).imm(), None);
    assert_eq!(Expr::var("n").imm(), None);
    assert_eq!(Expr::string("42").imm(), None);
}

#[test]
fn test_as_i64() {
    assert_eq!(Imm::UInt(7).as_i64(), Some(7));
    assert_eq!(Imm::UInt(u64::MAX).as_i64(), None);
    assert_eq!(Imm::Float(1.0).as_i64(), None);
}
