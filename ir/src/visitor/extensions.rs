//! Required-extension discovery.

use enumset::EnumSet;

use crate::builtin::Extension;
use crate::func::{Declaration, Program};
use crate::stmt::{Block, Stmt};
use crate::{Expr, ExprNode};

#[derive(Debug, Default)]
struct RequiredExtensions {
    needed: EnumSet<Extension>,
}

impl RequiredExtensions {
    fn expr(&mut self, e: &Expr) {
        match e.node() {
            ExprNode::Var(_)
            | ExprNode::Int { .. }
            | ExprNode::UInt { .. }
            | ExprNode::Float { .. }
            | ExprNode::MemFence(_)
            | ExprNode::MemoryScope(_)
            | ExprNode::MemoryOrder(_)
            | ExprNode::Str(_) => {}
            ExprNode::Unary { term, .. } | ExprNode::Cast { term, .. } | ExprNode::Swizzle { term, .. } => {
                self.expr(term)
            }
            ExprNode::Binary { lhs, rhs, .. } => {
                self.expr(lhs);
                self.expr(rhs);
            }
            ExprNode::Ternary { condition, then, otherwise } => {
                self.expr(condition);
                self.expr(then);
                self.expr(otherwise);
            }
            ExprNode::Access { field, address } => {
                self.expr(field);
                self.expr(address);
            }
            ExprNode::CallBuiltin { function, args } => {
                self.needed.insert(function.extension());
                args.iter().for_each(|a| self.expr(a));
            }
            ExprNode::Call { args, .. } => args.iter().for_each(|a| self.expr(a)),
        }
    }

    fn stmt(&mut self, s: &Stmt) {
        match s {
            Stmt::Declaration { .. } => {}
            Stmt::DeclarationAssignment { rhs, .. } => self.expr(rhs),
            Stmt::Expression(e) => self.expr(e),
            Stmt::Block(b) => self.block(b),
            Stmt::ForLoop { start, condition, step, body, .. } => {
                self.stmt(start);
                self.expr(condition);
                self.expr(step);
                self.block(body);
            }
            Stmt::IfSelection { condition, then, otherwise } => {
                self.expr(condition);
                self.block(then);
                if let Some(o) = otherwise {
                    self.stmt(o);
                }
            }
        }
    }

    fn block(&mut self, b: &Block) {
        b.stmts.iter().for_each(|s| self.stmt(s));
    }

    fn declaration(&mut self, d: &Declaration) {
        match d {
            Declaration::Prototype(_) => {}
            Declaration::Function { body, .. } => self.block(body),
            Declaration::Global(s) => self.stmt(s),
        }
    }

    /// Non-builtin extensions in ascending order.
    fn finish(self) -> Vec<Extension> {
        (self.needed - Extension::Builtin).iter().collect()
    }
}

/// Extensions a program needs beyond the always-available builtins, in ascending order.
pub fn get_required_extensions(program: &Program) -> Vec<Extension> {
    let mut pass = RequiredExtensions::default();
    program.declarations.iter().for_each(|d| pass.declaration(d));
    pass.finish()
}

/// Same as [`get_required_extensions`] for a single function.
pub fn required_extensions_in(declaration: &Declaration) -> Vec<Extension> {
    let mut pass = RequiredExtensions::default();
    pass.declaration(declaration);
    pass.finish()
}
