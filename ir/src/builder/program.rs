use super::DeclarationBuilder;
use crate::func::{Declaration, Program};
use crate::stmt::Stmt;

/// Collects program-scope variables and functions in order.
#[derive(Debug, Default)]
pub struct ProgramBuilder {
    program: Program,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, declaration: Declaration) {
        self.program.declarations.push(declaration);
    }

    pub fn get_product(self) -> Program {
        self.program
    }
}

impl DeclarationBuilder for ProgramBuilder {
    fn push_declaration(&mut self, stmt: Stmt) {
        self.program.declarations.push(Declaration::Global(stmt));
    }
}
