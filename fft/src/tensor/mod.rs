//! Symbolic tensor indexing for generated kernels.
//!
//! A [`TensorView`] maps multi-indices made of kernel expressions onto an [`Accessor`], which
//! turns a linear offset into a load or store expression. Views over global buffers, shared
//! local memory and private arrays all look the same to the generators.

pub mod accessor;
pub mod view;

pub use accessor::Accessor;
pub use view::{Entry, TensorView, all, at, span};

use fftgen_ir::{Expr, Imm};

/// `a * b`, folded when both are unsigned literals and dropped when one of them is one.
pub(crate) fn mul(a: &Expr, b: &Expr) -> Expr {
    match (a.imm(), b.imm()) {
        (Some(Imm::UInt(x)), Some(Imm::UInt(y))) => Expr::from(x * y),
        (Some(Imm::UInt(1)), _) => b.clone(),
        (_, Some(Imm::UInt(1))) => a.clone(),
        _ => a * b,
    }
}

/// `a + b`, folded when both are unsigned literals and dropped when one of them is zero.
pub(crate) fn add(a: &Expr, b: &Expr) -> Expr {
    match (a.imm(), b.imm()) {
        (Some(Imm::UInt(x)), Some(Imm::UInt(y))) => Expr::from(x + y),
        (Some(Imm::UInt(0)), _) => b.clone(),
        (_, Some(Imm::UInt(0))) => a.clone(),
        _ => a + b,
    }
}

/// `a - b`, folded when both are unsigned literals.
pub(crate) fn sub(a: &Expr, b: &Expr) -> Expr {
    match (a.imm(), b.imm()) {
        (Some(Imm::UInt(x)), Some(Imm::UInt(y))) if x >= y => Expr::from(x - y),
        (_, Some(Imm::UInt(0))) => a.clone(),
        _ => a - b,
    }
}
