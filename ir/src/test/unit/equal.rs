use crate::prelude::*;
use crate::visitor::is_equal;

#[test]
fn test_identity_and_structure() {
    let a = Expr::var("a");
    let b = Expr::var("b");

    assert!(is_equal(&a, &a));
    assert!(is_equal(&(&a * &b), &(&a * &b)));
    assert!(!is_equal(&(&a + &b), &(&a * &b)));
    assert!(!is_equal(&(&b + &a), &(&a + &b)));
}

#[test]
fn test_same_name_is_not_same_variable() {
    let b = Expr::var("b");
    let b2 = Expr::var("b");
    assert!(!is_equal(&b, &b2));
}

#[test]
fn test_builtin_calls() {
    let a = Expr::var("a");
    let b = Expr::var("b");
    assert!(is_equal(&(&a * get_global_id(&a + &b)), &(&a * get_global_id(&a + &b))));
    assert!(!is_equal(&(&a * get_global_id(&a + &b)), &(&a * get_global_id(&a - &b))));
}

#[test]
fn test_ternary() {
    let a = Expr::var("a");
    let b = Expr::var("b");
    let lhs = ternary(&a + &b, &b, &a);
    assert!(is_equal(&lhs, &ternary(&a + &b, &b, &a)));
    assert!(!is_equal(&lhs, &ternary(&a + &b, &b + &a, &a)));
}

#[test]
fn test_literal_width_matters() {
    assert!(is_equal(&Expr::int(5, 32), &Expr::from(5)));
    assert!(!is_equal(&Expr::int(5, 32), &Expr::int(5, 64)));
    assert!(!is_equal(&Expr::int(5, 32), &Expr::uint(5, 32)));
    assert!(is_equal(&Expr::from(2.5f32), &Expr::float(2.5, 32)));
    assert!(!is_equal(&Expr::from(2.5f32), &Expr::from(2.5f64)));
}

#[test]
fn test_cast_compares_types() {
    let p = Expr::var("p");
    assert!(is_equal(&cast(DataType::generic(BuiltinType::Int), &p), &cast(DataType::generic(BuiltinType::Int), &p)));
    assert!(!is_equal(&cast(DataType::global(BuiltinType::Int), &p), &cast(DataType::private(BuiltinType::Int), &p)));
}

#[test]
fn test_swizzles() {
    let a = Expr::var("a");
    assert!(a.s(&[0, 1]).same_as(&a.s(&[0, 1])));
    assert!(!a.s(&[0, 1]).same_as(&a.s(&[1, 0])));
    assert!(!a.lo().same_as(&a.hi()));
}
