//! Type declarator printing.

use enumset::EnumSet;
use fftgen_ir::prelude::*;

use crate::opencl::{expr_to_string, stmt_to_string, type_to_string};

fn global_float() -> DataType {
    DataType::global(BuiltinType::Float)
}

#[test]
fn test_scalars_and_vectors() {
    assert_eq!(type_to_string(&DataType::generic(BuiltinType::Float)), "float");
    assert_eq!(type_to_string(&DataType::vector(BuiltinType::Float, 4).in_space(AddrSpace::Local)), "local float4");
    assert_eq!(type_to_string(&DataType::vector(BuiltinType::Int, 2).qualified(TypeQualifier::Const)), "const int2");
    assert_eq!(type_to_string(&DataType::scalar(BuiltinType::SizeT)), "size_t");
}

#[test]
fn test_pointers() {
    assert_eq!(type_to_string(&DataType::pointer_to(global_float())), "global float*");
    assert_eq!(type_to_string(&DataType::pointer_to(DataType::pointer_to(global_float()))), "global float**");
    assert_eq!(
        type_to_string(&DataType::pointer_in(DataType::pointer_to(global_float()), AddrSpace::Global, EnumSet::empty())),
        "global float**global"
    );
}

#[test]
fn test_arrays() {
    let float = DataType::generic(BuiltinType::Float);
    let int = DataType::generic(BuiltinType::Int);
    assert_eq!(type_to_string(&DataType::array_of(global_float(), 10)), "global float[10]");
    assert_eq!(type_to_string(&DataType::array_of(DataType::pointer_to(global_float()), 10)), "global float*[10]");
    assert_eq!(
        type_to_string(&DataType::array_of(DataType::array_of(DataType::pointer_to(float.clone()), 10), 12)),
        "float*[12][10]"
    );
    assert_eq!(
        type_to_string(&DataType::array_of(DataType::pointer_to(DataType::array_of(float, 10)), 12)),
        "float(*[12])[10]"
    );
    assert_eq!(
        type_to_string(&DataType::pointer_to(DataType::array_of(DataType::array_of(int.clone(), 10), 12))),
        "int(*)[12][10]"
    );
    let inner = DataType::pointer_in(DataType::array_of(DataType::array_of(int, 10), 12), AddrSpace::Global, EnumSet::empty());
    assert_eq!(
        type_to_string(&DataType::pointer_in(inner, AddrSpace::Local, EnumSet::empty())),
        "int(*global*local)[12][10]"
    );
}

#[test]
fn test_nested_declarator_with_name() {
    let ty = DataType::pointer_to(DataType::pointer_to(DataType::array_of(DataType::pointer_to(global_float()), 10)));
    assert_eq!(type_to_string(&ty), "global float*(**)[10]");
    assert_eq!(stmt_to_string(&Stmt::declaration(ty, Var::new("a"))), "global float*(** a)[10];\n");
}

#[test]
fn test_cast_to_array() {
    let ty = DataType::array_of(DataType::generic(BuiltinType::Float), 10);
    assert_eq!(expr_to_string(&cast(ty, Expr::var("a"))), "(float[10]) a");
}

#[test]
fn test_qualifiers() {
    assert_eq!(type_to_string(&DataType::global(BuiltinType::AtomicFloat)), "global atomic_float");
    assert_eq!(
        type_to_string(&DataType::global(BuiltinType::AtomicFloat).qualified(TypeQualifier::Const | TypeQualifier::Volatile)),
        "global const volatile atomic_float"
    );
    let pointee = DataType::global(BuiltinType::AtomicInt).qualified(TypeQualifier::Volatile);
    assert_eq!(
        type_to_string(&DataType::pointer_in(pointee, AddrSpace::Global, TypeQualifier::Restrict.into())),
        "global volatile atomic_int*global restrict"
    );
}
