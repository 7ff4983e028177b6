//! Fluent builders for statements, functions and programs.
//!
//! Builders are the only supported way to introduce variable bindings: every `declare*` call
//! creates the declaration statement and hands back the variable as an expression.
//!
//! ```rust
//! use fftgen_ir::prelude::*;
//!
//! let mut bb = BlockBuilder::new();
//! let x = bb.declare_assign(DataType::generic(BuiltinType::Int), "x", 5);
//! bb.add(x.assign(&x + 1));
//! let block = bb.get_product();
//! assert_eq!(block.len(), 2);
//! ```

mod block;
mod control;
mod function;
mod program;

pub use block::BlockBuilder;
pub use control::{ForLoopBuilder, IfSelectionBuilder};
pub use function::{FunctionBuilder, kernel_builder};
pub use program::ProgramBuilder;

use fftgen_dtype::DataType;

use crate::Expr;
use crate::attr::Attribute;
use crate::expr::Var;
use crate::stmt::Stmt;

/// Shared `declare*` vocabulary of block and program builders.
pub trait DeclarationBuilder {
    /// Appends a declaration statement produced by one of the provided methods.
    fn push_declaration(&mut self, stmt: Stmt);

    /// Declares a fresh variable named `prefix`.
    fn declare(&mut self, ty: DataType, prefix: &str) -> Expr {
        self.declare_with(ty, prefix, Vec::new(), None)
    }

    /// Declares a fresh variable named `prefix` initialised with `rhs`.
    fn declare_assign(&mut self, ty: DataType, prefix: &str, rhs: impl Into<Expr>) -> Expr {
        self.declare_with(ty, prefix, Vec::new(), Some(rhs.into()))
    }

    /// Declares a caller-created variable.
    fn declare_var(&mut self, ty: DataType, var: &Var) {
        self.push_declaration(Stmt::Declaration { ty, var: var.clone(), attributes: Vec::new() });
    }

    /// Declares a caller-created variable initialised with `rhs`.
    fn declare_assign_var(&mut self, ty: DataType, var: &Var, rhs: impl Into<Expr>) {
        self.push_declaration(Stmt::DeclarationAssignment {
            ty,
            var: var.clone(),
            rhs: rhs.into(),
            attributes: Vec::new(),
        });
    }

    /// General form with attributes and an optional initialiser.
    fn declare_with(&mut self, ty: DataType, prefix: &str, attributes: Vec<Attribute>, rhs: Option<Expr>) -> Expr {
        let var = Var::new(prefix);
        let stmt = match rhs {
            Some(rhs) => Stmt::DeclarationAssignment { ty, var: var.clone(), rhs, attributes },
            None => Stmt::Declaration { ty, var: var.clone(), attributes },
        };
        self.push_declaration(stmt);
        Expr::from(var)
    }
}
