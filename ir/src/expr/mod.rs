//! Expression nodes and variables.
//!
//! Expressions are immutable reference-counted trees. Sub-expressions may be shared between
//! parents (a repeated offset expression, a declared variable used many times); passes that
//! rewrite expressions build new parents and keep unchanged children shared.
//!
//! Variables carry an identity independent of their display name. Two variables named `x`
//! are different variables; only the name-uniquification pass changes names.

pub mod constructors;

use std::cell::RefCell;
use std::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use fftgen_dtype::{DataType, MemFenceFlag, MemoryOrder, MemoryScope};
use smallvec::SmallVec;

use crate::builtin::BuiltinFunction;
use crate::types::{BinaryOp, Imm, Precedence, Swizzle, UnaryOp};

static NEXT_VAR_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Debug)]
struct VarNode {
    id: u64,
    name: RefCell<String>,
}

/// Named variable with stable identity.
///
/// Cloning a `Var` yields another handle to the same variable.
#[derive(Debug, Clone)]
pub struct Var(Rc<VarNode>);

impl Var {
    pub fn new(name: impl Into<String>) -> Self {
        let id = NEXT_VAR_ID.fetch_add(1, Ordering::Relaxed);
        Self(Rc::new(VarNode { id, name: RefCell::new(name.into()) }))
    }

    /// Unique identity of this variable.
    pub fn id(&self) -> u64 {
        self.0.id
    }

    pub fn name(&self) -> String {
        self.0.name.borrow().clone()
    }

    pub fn set_name(&self, name: impl Into<String>) {
        *self.0.name.borrow_mut() = name.into();
    }

    pub fn is_same(&self, other: &Var) -> bool {
        self.0.id == other.0.id
    }
}

impl PartialEq for Var {
    fn eq(&self, other: &Self) -> bool {
        self.is_same(other)
    }
}

impl Eq for Var {}

impl Hash for Var {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.id.hash(state);
    }
}

/// Expression node kinds.
#[derive(Debug)]
pub enum ExprNode {
    Var(Var),
    Int { value: i64, bits: u8 },
    UInt { value: u64, bits: u8 },
    Float { value: f64, bits: u8 },
    MemFence(MemFenceFlag),
    MemoryScope(MemoryScope),
    MemoryOrder(MemoryOrder),
    Str(String),
    Unary { op: UnaryOp, term: Expr },
    Binary { op: BinaryOp, lhs: Expr, rhs: Expr },
    /// `condition ? then : otherwise`
    Ternary { condition: Expr, then: Expr, otherwise: Expr },
    /// `field[address]`
    Access { field: Expr, address: Expr },
    CallBuiltin { function: BuiltinFunction, args: SmallVec<[Expr; 4]> },
    /// Call to a function defined outside the builtin set (user callbacks, helpers).
    Call { name: String, args: SmallVec<[Expr; 4]> },
    Cast { ty: DataType, term: Expr },
    Swizzle { selector: Swizzle, term: Expr },
}

impl ExprNode {
    pub fn precedence(&self) -> Precedence {
        match self {
            Self::Var(_)
            | Self::Int { .. }
            | Self::UInt { .. }
            | Self::Float { .. }
            | Self::MemFence(_)
            | Self::MemoryScope(_)
            | Self::MemoryOrder(_)
            | Self::Str(_) => Precedence::ltr(0),
            Self::Unary { op, .. } => op.precedence(),
            Self::Binary { op, .. } => op.precedence(),
            Self::Ternary { .. } => Precedence::rtl(13),
            Self::Access { .. } | Self::CallBuiltin { .. } | Self::Call { .. } | Self::Swizzle { .. } => {
                Precedence::ltr(1)
            }
            Self::Cast { .. } => Precedence::rtl(2),
        }
    }
}

/// Shared handle to an expression tree.
#[derive(Clone)]
pub struct Expr(Rc<ExprNode>);

impl Expr {
    pub fn new(node: ExprNode) -> Self {
        Self(Rc::new(node))
    }

    pub fn node(&self) -> &ExprNode {
        &self.0
    }

    /// Handle identity (same allocation), not structural equality.
    pub fn ptr_eq(&self, other: &Expr) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn precedence(&self) -> Precedence {
        self.0.precedence()
    }

    pub fn as_var(&self) -> Option<&Var> {
        match self.node() {
            ExprNode::Var(v) => Some(v),
            _ => None,
        }
    }

    /// Literal value when this is an integer or floating immediate.
    pub fn imm(&self) -> Option<Imm> {
        crate::visitor::to_imm::get_imm(self)
    }
}

impl std::fmt::Debug for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
