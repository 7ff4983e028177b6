//! Loop and branch builders.

use super::BlockBuilder;
use crate::Expr;
use crate::attr::Attribute;
use crate::stmt::{Block, Stmt};

#[derive(Debug)]
pub struct ForLoopBuilder {
    start: Stmt,
    condition: Expr,
    step: Expr,
    body: Block,
    attributes: Vec<Attribute>,
}

impl ForLoopBuilder {
    pub fn new(start: impl Into<Stmt>, condition: impl Into<Expr>, step: impl Into<Expr>) -> Self {
        Self {
            start: start.into(),
            condition: condition.into(),
            step: step.into(),
            body: Block::default(),
            attributes: Vec::new(),
        }
    }

    pub fn attribute(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    pub fn body(mut self, f: impl FnOnce(&mut BlockBuilder)) -> Self {
        let mut bb = BlockBuilder::new();
        f(&mut bb);
        self.body = bb.get_product();
        self
    }

    pub fn get_product(self) -> Stmt {
        Stmt::ForLoop {
            start: Box::new(self.start),
            condition: self.condition,
            step: self.step,
            body: self.body,
            attributes: self.attributes,
        }
    }
}

#[derive(Debug)]
pub struct IfSelectionBuilder {
    condition: Expr,
    then: Block,
    otherwise: Option<Box<Stmt>>,
}

impl IfSelectionBuilder {
    pub fn new(condition: impl Into<Expr>) -> Self {
        Self { condition: condition.into(), then: Block::default(), otherwise: None }
    }

    pub fn then(mut self, f: impl FnOnce(&mut BlockBuilder)) -> Self {
        let mut bb = BlockBuilder::new();
        f(&mut bb);
        self.then = bb.get_product();
        self
    }

    pub fn otherwise(mut self, f: impl FnOnce(&mut BlockBuilder)) -> Self {
        let mut bb = BlockBuilder::new();
        f(&mut bb);
        self.otherwise = Some(Box::new(Stmt::Block(bb.get_product())));
        self
    }

    /// Else branch given as a ready statement, typically another `if` for `else if` chains.
    pub fn otherwise_stmt(mut self, stmt: Stmt) -> Self {
        self.otherwise = Some(Box::new(stmt));
        self
    }

    pub fn get_product(self) -> Stmt {
        Stmt::IfSelection { condition: self.condition, then: self.then, otherwise: self.otherwise }
    }
}
