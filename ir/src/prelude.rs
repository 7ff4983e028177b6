//! Common imports for building kernels.
//!
//! ```rust,ignore
//! use fftgen_ir::prelude::*;
//! ```

// Nodes
pub use crate::{Block, Declaration, Expr, Program, Prototype, Stmt, Var};

// Builders
pub use crate::{
    BlockBuilder, DeclarationBuilder, ForLoopBuilder, FunctionBuilder, IfSelectionBuilder, ProgramBuilder,
    kernel_builder,
};

// Constructors and builtins
pub use crate::ops::builtin::*;
pub use crate::{Attribute, BuiltinFunction, Extension};
pub use crate::{address_of, call, cast, comma, dereference, init_vector, ternary, try_init_vector};

// Types
pub use fftgen_dtype::{
    AddrSpace, BuiltinType, DataType, Endianness, FunctionQualifier, MemFenceFlag, TypeQualifier,
};
