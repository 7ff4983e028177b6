//! Stateful OpenCL C printer.
//!
//! State is limited to indentation and three layout flags: whether statements end inline (inside
//! a `for` header), whether a closing brace ends the line, and whether a prototype opens a
//! definition.

use std::fmt::Write;

use fftgen_dtype::{DataType, qualifiers_to_string};
use fftgen_ir::{
    Associativity, Attribute, BinaryOp, Block, Declaration, Expr, ExprNode, Program, Prototype, Stmt, Swizzle, Var,
};
use itertools::Itertools;

use super::literal::{escaped_string, hexfloat};
use super::types::declarator;

const INDENT: usize = 4;
const LANE_NAMES: [char; 4] = ['x', 'y', 'z', 'w'];

#[derive(Debug)]
pub struct Printer {
    out: String,
    level: usize,
    inline: bool,
    block_endl: bool,
    definition: bool,
}

impl Default for Printer {
    fn default() -> Self {
        Self { out: String::new(), level: 0, inline: false, block_endl: true, definition: false }
    }
}

impl Printer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn finish(self) -> String {
        self.out
    }

    fn indent(&mut self) {
        self.out.extend(std::iter::repeat_n(' ', INDENT * self.level));
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    pub fn expr(&mut self, e: &Expr) {
        match e.node() {
            ExprNode::Var(v) => self.var(v),
            ExprNode::Int { value, bits } => {
                let _ = write!(self.out, "{value}");
                self.int_suffix(*bits);
            }
            ExprNode::UInt { value, bits } => {
                let _ = write!(self.out, "{value}");
                self.int_suffix(*bits);
                self.out.push('u');
            }
            ExprNode::Float { value, bits } => {
                self.out.push_str(&hexfloat(*value));
                if *bits == 32 && value.is_finite() {
                    self.out.push('f');
                }
            }
            ExprNode::MemFence(flag) => self.out.push_str(flag.as_str()),
            ExprNode::MemoryScope(scope) => self.out.push_str(scope.as_str()),
            ExprNode::MemoryOrder(order) => self.out.push_str(order.as_str()),
            ExprNode::Str(s) => {
                let _ = write!(self.out, "\"{}\"", escaped_string(s));
            }
            ExprNode::Unary { op, term } => match op.precedence().assoc {
                Associativity::LeftToRight => {
                    self.operand(e, term, true);
                    self.out.push_str(op.as_str());
                }
                Associativity::RightToLeft => {
                    self.out.push_str(op.as_str());
                    let start = self.out.len();
                    self.operand(e, term, false);
                    // `-(-a)` must not print as the decrement `--a`.
                    if let Some(sign @ ('-' | '+')) = op.as_str().chars().last()
                        && self.out[start..].starts_with(sign)
                    {
                        self.out.insert(start, '(');
                        self.out.push(')');
                    }
                }
            },
            ExprNode::Binary { op, lhs, rhs } => {
                self.operand(e, lhs, true);
                if *op != BinaryOp::Comma {
                    self.out.push(' ');
                }
                self.out.push_str(op.as_str());
                self.out.push(' ');
                self.operand(e, rhs, false);
            }
            ExprNode::Ternary { condition, then, otherwise } => {
                self.operand(e, condition, true);
                self.out.push_str(" ? ");
                self.operand(e, then, false);
                self.out.push_str(" : ");
                self.operand(e, otherwise, false);
            }
            ExprNode::Access { field, address } => {
                self.operand(e, field, true);
                self.out.push('[');
                self.expr(address);
                self.out.push(']');
            }
            ExprNode::CallBuiltin { function, args } => self.call(function.name(), args),
            ExprNode::Call { name, args } => self.call(name, args),
            ExprNode::Cast { ty, term } => {
                let (prefix, suffix) = declarator(ty);
                let _ = write!(self.out, "({prefix}{suffix}) ");
                self.operand(e, term, false);
            }
            ExprNode::Swizzle { selector, term } => {
                self.operand(e, term, true);
                self.out.push('.');
                self.swizzle(selector);
            }
        }
    }

    fn var(&mut self, v: &Var) {
        self.out.push_str(&v.name());
    }

    fn int_suffix(&mut self, bits: u8) {
        if bits > 32 {
            self.out.push_str("ll");
        }
    }

    /// Prints `child` of `parent`, parenthesized when precedence or associativity demand it.
    fn operand(&mut self, parent: &Expr, child: &Expr, is_left: bool) {
        if parent.precedence().needs_parentheses(child.precedence(), is_left) {
            self.out.push('(');
            self.expr(child);
            self.out.push(')');
        } else {
            self.expr(child);
        }
    }

    fn call(&mut self, name: &str, args: &[Expr]) {
        self.out.push_str(name);
        self.out.push('(');
        for (i, arg) in args.iter().enumerate() {
            if i > 0 {
                self.out.push_str(", ");
            }
            self.expr(arg);
        }
        self.out.push(')');
    }

    fn swizzle(&mut self, selector: &Swizzle) {
        match selector {
            Swizzle::Lanes(lanes) => {
                let Some(&max) = lanes.iter().max() else { return };
                if lanes.len() <= LANE_NAMES.len() && (max as usize) < LANE_NAMES.len() {
                    self.out.extend(lanes.iter().map(|&l| LANE_NAMES[l as usize]));
                } else {
                    self.out.push('s');
                    for lane in lanes {
                        let _ = write!(self.out, "{lane:x}");
                    }
                }
            }
            Swizzle::Lo => self.out.push_str("lo"),
            Swizzle::Hi => self.out.push_str("hi"),
            Swizzle::Even => self.out.push_str("even"),
            Swizzle::Odd => self.out.push_str("odd"),
        }
    }

    fn attribute(&mut self, a: &Attribute) {
        let _ = write!(self.out, "__attribute__(({a}))");
    }

    // =========================================================================
    // Statements
    // =========================================================================

    pub fn stmt(&mut self, s: &Stmt) {
        match s {
            Stmt::Declaration { ty, var, attributes } => {
                self.declarator(ty, var, attributes);
                self.end_statement();
            }
            Stmt::DeclarationAssignment { ty, var, rhs, attributes } => {
                self.declarator(ty, var, attributes);
                self.out.push_str(" = ");
                self.expr(rhs);
                self.end_statement();
            }
            Stmt::Expression(e) => {
                self.expr(e);
                self.end_statement();
            }
            Stmt::Block(b) => self.block(b),
            Stmt::ForLoop { start, condition, step, body, attributes } => {
                for a in attributes {
                    self.attribute(a);
                    self.out.push('\n');
                    self.indent();
                }
                self.inline = true;
                self.out.push_str("for (");
                self.stmt(start);
                self.expr(condition);
                self.out.push_str("; ");
                self.expr(step);
                self.out.push_str(") ");
                self.inline = false;
                self.block(body);
            }
            Stmt::IfSelection { condition, then, otherwise } => {
                self.out.push_str("if (");
                self.expr(condition);
                self.out.push_str(") ");
                match otherwise {
                    Some(otherwise) => {
                        let endl = std::mem::replace(&mut self.block_endl, false);
                        self.block(then);
                        self.block_endl = endl;
                        self.out.push_str(" else ");
                        self.stmt(otherwise);
                    }
                    None => self.block(then),
                }
            }
        }
    }

    pub fn block(&mut self, b: &Block) {
        self.out.push_str("{\n");
        self.level += 1;
        let endl = std::mem::replace(&mut self.block_endl, true);
        for s in &b.stmts {
            self.indent();
            self.stmt(s);
        }
        self.block_endl = endl;
        self.level -= 1;
        self.indent();
        self.out.push('}');
        if self.block_endl {
            self.out.push('\n');
        }
    }

    fn declarator(&mut self, ty: &DataType, var: &Var, attributes: &[Attribute]) {
        let (prefix, suffix) = declarator(ty);
        self.out.push_str(&prefix);
        self.out.push(' ');
        self.var(var);
        self.out.push_str(&suffix);
        for a in attributes {
            self.out.push(' ');
            self.attribute(a);
        }
    }

    fn end_statement(&mut self) {
        self.out.push(';');
        self.out.push(if self.inline { ' ' } else { '\n' });
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    pub fn prototype(&mut self, p: &Prototype) {
        if !p.qualifiers.is_empty() {
            self.out.push_str(&qualifiers_to_string(p.qualifiers));
            self.out.push('\n');
        }
        for a in &p.attributes {
            self.attribute(a);
            self.out.push('\n');
            self.indent();
        }
        let _ = write!(self.out, "void {}(", p.name);
        let args = p
            .args
            .iter()
            .map(|(ty, var)| {
                let (prefix, suffix) = declarator(ty);
                format!("{prefix} {}{suffix}", var.name())
            })
            .join(", ");
        self.out.push_str(&args);
        self.out.push(')');
        if self.definition {
            self.out.push(' ');
        } else {
            self.out.push_str(";\n");
        }
    }

    pub fn declaration(&mut self, d: &Declaration) {
        match d {
            Declaration::Prototype(p) => self.prototype(p),
            Declaration::Function { prototype, body } => {
                self.definition = true;
                self.prototype(prototype);
                self.definition = false;
                self.block(body);
            }
            Declaration::Global(s) => self.stmt(s),
        }
    }

    pub fn program(&mut self, program: &Program) {
        for d in &program.declarations {
            self.declaration(d);
        }
    }
}
