//! Intermediate representation of kernel-language programs.
//!
//! Kernels are assembled with builders, transformed by a handful of tree passes and finally
//! printed by `fftgen-codegen`.
//!
//! # Module Organization
//!
//! - [`types`] - Operators, precedence, swizzle selectors and literal values
//! - [`expr`] - Expression nodes, variables and constructors
//! - [`ops`] - Operator overloading and builtin-function wrappers
//! - [`builtin`] - Builtin function table with arity and extension membership
//! - [`attr`] - Declaration, loop and function attributes
//! - [`stmt`] - Statements and blocks
//! - [`func`] - Prototypes, functions and programs
//! - [`builder`] - Fluent builders producing statements, functions and programs
//! - [`visitor`] - Equality, simplification, renaming and extension discovery
//! - [`error`] - Error types and result handling

pub mod attr;
pub mod builder;
pub mod builtin;
pub mod error;
pub mod expr;
pub mod func;
pub mod ops;
pub mod prelude;
pub mod stmt;
pub mod types;
pub mod visitor;


pub use attr::Attribute;
pub use builder::{
    BlockBuilder, DeclarationBuilder, ForLoopBuilder, FunctionBuilder, IfSelectionBuilder, ProgramBuilder,
    kernel_builder,
};
pub use builtin::{BuiltinFunction, Extension};
pub use error::{Error, Result};
pub use expr::constructors::{
    address_of, call, cast, choose_bits_signed, choose_bits_unsigned, comma, dereference, init_vector, ternary,
    try_init_vector,
};
pub use expr::{Expr, ExprNode, Var};
pub use func::{Declaration, Program, Prototype};
pub use stmt::{Block, Stmt};
pub use types::{Associativity, BinaryOp, Imm, Precedence, Swizzle, UnaryOp};

// Re-export external types for convenience
pub use fftgen_dtype::{
    AddrSpace, BuiltinType, DataType, Endianness, FunctionQualifier, MemFenceFlag, MemoryOrder, MemoryScope,
    TypeQualifier,
};
