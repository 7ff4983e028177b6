//! Unsafe algebraic simplification.
//!
//! Removes additive and multiplicative identities assuming exact arithmetic: `0 * x` becomes `0`
//! even for floating `x` that could be NaN. Expressions are rewritten bottom-up; statements and
//! blocks are updated in place.

use smallvec::SmallVec;

use crate::builtin::BuiltinFunction;
use crate::func::{Declaration, Program};
use crate::stmt::{Block, Stmt};
use crate::types::{BinaryOp, UnaryOp};
use crate::{Expr, ExprNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberKind {
    Zero,
    One,
    Other,
}

fn classify(e: &Expr) -> NumberKind {
    let (zero, one) = match e.node() {
        ExprNode::Int { value, .. } => (*value == 0, *value == 1),
        ExprNode::UInt { value, .. } => (*value == 0, *value == 1),
        ExprNode::Float { value, .. } => (*value == 0.0, *value == 1.0),
        _ => return NumberKind::Other,
    };
    if zero {
        NumberKind::Zero
    } else if one {
        NumberKind::One
    } else {
        NumberKind::Other
    }
}

/// Simplified copy of `e`; returns `e` itself when no rule applies.
pub fn unsafe_simplify(e: Expr) -> Expr {
    simplify_expr(&e).unwrap_or(e)
}

/// Replacement for `e`, or `None` when neither `e` nor any sub-expression changed.
pub fn simplify_expr(e: &Expr) -> Option<Expr> {
    match e.node() {
        ExprNode::Var(_)
        | ExprNode::Int { .. }
        | ExprNode::UInt { .. }
        | ExprNode::Float { .. }
        | ExprNode::MemFence(_)
        | ExprNode::MemoryScope(_)
        | ExprNode::MemoryOrder(_)
        | ExprNode::Str(_) => None,
        ExprNode::Unary { op, term } => simplify_expr(term).map(|t| Expr::unary(*op, t)),
        ExprNode::Binary { op, lhs, rhs } => {
            let new_lhs = simplify_expr(lhs);
            let new_rhs = simplify_expr(rhs);
            let changed = new_lhs.is_some() || new_rhs.is_some();
            let lhs = new_lhs.unwrap_or_else(|| lhs.clone());
            let rhs = new_rhs.unwrap_or_else(|| rhs.clone());
            match apply_identities(*op, &lhs, &rhs) {
                Some(r) => Some(r),
                None if changed => Some(Expr::binary(*op, lhs, rhs)),
                None => None,
            }
        }
        ExprNode::Ternary { condition, then, otherwise } => {
            let (c, t, o) = (simplify_expr(condition), simplify_expr(then), simplify_expr(otherwise));
            if c.is_none() && t.is_none() && o.is_none() {
                return None;
            }
            Some(crate::expr::constructors::ternary(
                c.unwrap_or_else(|| condition.clone()),
                t.unwrap_or_else(|| then.clone()),
                o.unwrap_or_else(|| otherwise.clone()),
            ))
        }
        ExprNode::Access { field, address } => {
            let (f, a) = (simplify_expr(field), simplify_expr(address));
            if f.is_none() && a.is_none() {
                return None;
            }
            let field = f.unwrap_or_else(|| field.clone());
            Some(field.at(a.unwrap_or_else(|| address.clone())))
        }
        ExprNode::CallBuiltin { function, args } => {
            let (args, changed) = simplify_args(args);
            if *function == BuiltinFunction::IntelSubGroupShuffleXor
                && let Some(first) = args.first()
                && classify(first) == NumberKind::Zero
            {
                return Some(first.clone());
            }
            changed.then(|| Expr::new(ExprNode::CallBuiltin { function: *function, args }))
        }
        ExprNode::Call { name, args } => {
            let (args, changed) = simplify_args(args);
            changed.then(|| Expr::new(ExprNode::Call { name: name.clone(), args }))
        }
        ExprNode::Cast { ty, term } => {
            simplify_expr(term).map(|t| Expr::new(ExprNode::Cast { ty: ty.clone(), term: t }))
        }
        ExprNode::Swizzle { selector, term } => {
            simplify_expr(term).map(|t| Expr::new(ExprNode::Swizzle { selector: selector.clone(), term: t }))
        }
    }
}

fn simplify_args(args: &[Expr]) -> (SmallVec<[Expr; 4]>, bool) {
    let mut changed = false;
    let args = args
        .iter()
        .map(|a| match simplify_expr(a) {
            Some(r) => {
                changed = true;
                r
            }
            None => a.clone(),
        })
        .collect();
    (args, changed)
}

fn apply_identities(op: BinaryOp, lhs: &Expr, rhs: &Expr) -> Option<Expr> {
    use BinaryOp::*;

    let (l, r) = (classify(lhs), classify(rhs));
    if l == NumberKind::Zero {
        match op {
            Add | BitwiseOr | BitwiseXor => return Some(rhs.clone()),
            Subtract => return Some(Expr::unary(UnaryOp::Minus, rhs.clone())),
            Multiply | Divide | Modulo | BitwiseAnd | LeftShift | RightShift => return Some(lhs.clone()),
            _ => {}
        }
    }
    if r == NumberKind::Zero {
        match op {
            Add | BitwiseOr | BitwiseXor | Subtract | LeftShift | RightShift => return Some(lhs.clone()),
            Multiply | BitwiseAnd => return Some(rhs.clone()),
            _ => {}
        }
    }
    if l == NumberKind::One && op == Multiply {
        return Some(rhs.clone());
    }
    if r == NumberKind::One {
        match op {
            Multiply | Divide => return Some(lhs.clone()),
            Modulo => return Some(Expr::int(0, 32)),
            _ => {}
        }
    }
    None
}

fn simplify_in_place(e: &mut Expr) {
    if let Some(r) = simplify_expr(e) {
        *e = r;
    }
}

pub fn unsafe_simplify_stmt(s: &mut Stmt) {
    match s {
        Stmt::Declaration { .. } => {}
        Stmt::DeclarationAssignment { rhs, .. } => simplify_in_place(rhs),
        Stmt::Expression(e) => simplify_in_place(e),
        Stmt::Block(b) => unsafe_simplify_block(b),
        Stmt::ForLoop { start, condition, step, body, .. } => {
            unsafe_simplify_stmt(start);
            simplify_in_place(condition);
            simplify_in_place(step);
            unsafe_simplify_block(body);
        }
        Stmt::IfSelection { condition, then, otherwise } => {
            simplify_in_place(condition);
            unsafe_simplify_block(then);
            if let Some(o) = otherwise {
                unsafe_simplify_stmt(o);
            }
        }
    }
}

pub fn unsafe_simplify_block(b: &mut Block) {
    b.stmts.iter_mut().for_each(unsafe_simplify_stmt);
}

pub fn unsafe_simplify_declaration(d: &mut Declaration) {
    match d {
        Declaration::Prototype(_) => {}
        Declaration::Function { body, .. } => unsafe_simplify_block(body),
        Declaration::Global(s) => unsafe_simplify_stmt(s),
    }
}

pub fn unsafe_simplify_program(p: &mut Program) {
    p.declarations.iter_mut().for_each(unsafe_simplify_declaration);
}
