//! Function-level declarations and programs.

use enumset::EnumSet;
use fftgen_dtype::{DataType, FunctionQualifier};

use crate::attr::Attribute;
use crate::expr::Var;
use crate::stmt::{Block, Stmt};

/// Function signature. All functions return `void`.
#[derive(Debug, Clone)]
pub struct Prototype {
    pub name: String,
    pub args: Vec<(DataType, Var)>,
    pub qualifiers: EnumSet<FunctionQualifier>,
    pub attributes: Vec<Attribute>,
}

impl Prototype {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), args: Vec::new(), qualifiers: EnumSet::new(), attributes: Vec::new() }
    }

    pub fn is_kernel(&self) -> bool {
        self.qualifiers.contains(FunctionQualifier::Kernel)
    }
}

/// Top-level program item.
#[derive(Debug, Clone)]
pub enum Declaration {
    /// Forward declaration `proto;`.
    Prototype(Prototype),
    Function { prototype: Prototype, body: Block },
    /// Program-scope variable, e.g. a `constant` table.
    Global(Stmt),
}

impl Declaration {
    pub fn prototype(&self) -> Option<&Prototype> {
        match self {
            Self::Prototype(p) | Self::Function { prototype: p, .. } => Some(p),
            Self::Global(_) => None,
        }
    }
}

/// Ordered list of top-level declarations.
#[derive(Debug, Clone, Default)]
pub struct Program {
    pub declarations: Vec<Declaration>,
}

impl Program {
    /// Function definitions carrying the `kernel` qualifier, in declaration order.
    pub fn kernels(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations
            .iter()
            .filter(|d| matches!(d, Declaration::Function { prototype, .. } if prototype.is_kernel()))
    }

    /// Function definition by name.
    pub fn function(&self, name: &str) -> Option<(&Prototype, &Block)> {
        self.declarations.iter().find_map(|d| match d {
            Declaration::Function { prototype, body } if prototype.name == name => Some((prototype, body)),
            _ => None,
        })
    }
}
