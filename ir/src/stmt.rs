//! Statements and blocks.
//!
//! Statements are owned trees: a block owns its statements, a loop owns its body. Only
//! expressions are shared.

use fftgen_dtype::DataType;

use crate::Expr;
use crate::attr::Attribute;
use crate::expr::Var;

/// Braced statement list; the only construct that opens a variable scope.
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }

    pub fn is_empty(&self) -> bool {
        self.stmts.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stmts.len()
    }
}

#[derive(Debug, Clone)]
pub enum Stmt {
    /// `ty var attrs;`
    Declaration { ty: DataType, var: Var, attributes: Vec<Attribute> },
    /// `ty var attrs = rhs;`
    DeclarationAssignment { ty: DataType, var: Var, rhs: Expr, attributes: Vec<Attribute> },
    /// `expr;`
    Expression(Expr),
    Block(Block),
    /// `for (start condition; step) body`; `start` is a declaration or expression statement.
    ForLoop { start: Box<Stmt>, condition: Expr, step: Expr, body: Block, attributes: Vec<Attribute> },
    /// `if (condition) then else otherwise`; `otherwise` is a block or a chained `if`.
    IfSelection { condition: Expr, then: Block, otherwise: Option<Box<Stmt>> },
}

impl Stmt {
    pub fn declaration(ty: DataType, var: Var) -> Self {
        Self::Declaration { ty, var, attributes: Vec::new() }
    }

    pub fn declaration_assignment(ty: DataType, var: Var, rhs: impl Into<Expr>) -> Self {
        Self::DeclarationAssignment { ty, var, rhs: rhs.into(), attributes: Vec::new() }
    }

    /// Variable introduced by this statement, if it is a declaration.
    pub fn declared_var(&self) -> Option<&Var> {
        match self {
            Self::Declaration { var, .. } | Self::DeclarationAssignment { var, .. } => Some(var),
            _ => None,
        }
    }
}

impl From<Expr> for Stmt {
    fn from(value: Expr) -> Self {
        Self::Expression(value)
    }
}

impl From<Block> for Stmt {
    fn from(value: Block) -> Self {
        Self::Block(value)
    }
}
