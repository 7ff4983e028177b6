use fftgen_dtype::DataType;

use super::control::{ForLoopBuilder, IfSelectionBuilder};
use super::DeclarationBuilder;
use crate::Expr;
use crate::expr::Var;
use crate::stmt::{Block, Stmt};

/// Accumulates statements of one block.
#[derive(Debug, Default)]
pub struct BlockBuilder {
    block: Block,
}

impl BlockBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue appending to an existing block.
    pub fn from_block(block: Block) -> Self {
        Self { block }
    }

    pub fn get_product(self) -> Block {
        self.block
    }

    pub fn add(&mut self, stmt: impl Into<Stmt>) {
        self.block.stmts.push(stmt.into());
    }

    /// `a = b;`
    pub fn assign(&mut self, a: impl Into<Expr>, b: impl Into<Expr>) {
        let a = a.into();
        self.add(a.assign(b));
    }

    pub fn body(&mut self, f: impl FnOnce(&mut Self)) -> &mut Self {
        f(self);
        self
    }

    /// Appends a nested `{ ... }` block.
    pub fn scope(&mut self, f: impl FnOnce(&mut BlockBuilder)) {
        let mut inner = BlockBuilder::new();
        f(&mut inner);
        self.add(Stmt::Block(inner.get_product()));
    }

    /// `for (start condition; step) { ... }`
    pub fn for_loop(
        &mut self,
        start: impl Into<Stmt>,
        condition: impl Into<Expr>,
        step: impl Into<Expr>,
        f: impl FnOnce(&mut BlockBuilder),
    ) {
        self.add(ForLoopBuilder::new(start, condition, step).body(f).get_product());
    }

    /// `for (ty i = begin; i < end; ++i) { ... }` with the loop variable passed to `f`.
    pub fn for_range(
        &mut self,
        ty: DataType,
        prefix: &str,
        begin: impl Into<Expr>,
        end: impl Into<Expr>,
        f: impl FnOnce(&mut BlockBuilder, &Expr),
    ) {
        let var = Var::new(prefix);
        let i = Expr::from(&var);
        let start = Stmt::declaration_assignment(ty, var, begin);
        let condition = i.lt(end);
        let step = i.pre_inc();
        self.add(ForLoopBuilder::new(start, condition, step).body(|bb| f(bb, &i)).get_product());
    }

    /// `if (condition) { ... }`
    pub fn if_selection(&mut self, condition: impl Into<Expr>, then: impl FnOnce(&mut BlockBuilder)) {
        self.add(IfSelectionBuilder::new(condition).then(then).get_product());
    }

    /// `if (condition) { ... } else { ... }`
    pub fn if_else(
        &mut self,
        condition: impl Into<Expr>,
        then: impl FnOnce(&mut BlockBuilder),
        otherwise: impl FnOnce(&mut BlockBuilder),
    ) {
        self.add(IfSelectionBuilder::new(condition).then(then).otherwise(otherwise).get_product());
    }
}

impl DeclarationBuilder for BlockBuilder {
    fn push_declaration(&mut self, stmt: Stmt) {
        self.add(stmt);
    }
}
