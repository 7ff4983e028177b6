use fftgen_dtype::{DataType, FunctionQualifier};

use super::BlockBuilder;
use crate::Expr;
use crate::attr::Attribute;
use crate::expr::Var;
use crate::func::{Declaration, Prototype};
use crate::stmt::Block;

/// Builds a function definition, or only a prototype when `body` is never called.
#[derive(Debug)]
pub struct FunctionBuilder {
    prototype: Prototype,
    body: Option<Block>,
}

impl FunctionBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self { prototype: Prototype::new(name), body: None }
    }

    /// Adds a parameter named `prefix` and returns it for use in the body.
    pub fn argument(&mut self, ty: DataType, prefix: &str) -> Expr {
        let var = Var::new(prefix);
        self.prototype.args.push((ty, var.clone()));
        Expr::from(var)
    }

    pub fn argument_var(&mut self, ty: DataType, var: &Var) {
        self.prototype.args.push((ty, var.clone()));
    }

    pub fn qualifier(&mut self, qualifier: FunctionQualifier) -> &mut Self {
        self.prototype.qualifiers.insert(qualifier);
        self
    }

    pub fn attribute(&mut self, attribute: Attribute) -> &mut Self {
        self.prototype.attributes.push(attribute);
        self
    }

    pub fn body(&mut self, f: impl FnOnce(&mut BlockBuilder)) -> &mut Self {
        let mut bb = BlockBuilder::new();
        f(&mut bb);
        self.body = Some(bb.get_product());
        self
    }

    pub fn get_product(self) -> Declaration {
        match self.body {
            Some(body) => Declaration::Function { prototype: self.prototype, body },
            None => Declaration::Prototype(self.prototype),
        }
    }
}

/// Function builder with the `kernel` qualifier set.
pub fn kernel_builder(name: impl Into<String>) -> FunctionBuilder {
    let mut fb = FunctionBuilder::new(name);
    fb.qualifier(FunctionQualifier::Kernel);
    fb
}
