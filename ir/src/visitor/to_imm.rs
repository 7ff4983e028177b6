use crate::types::Imm;
use crate::{Expr, ExprNode};

/// Literal value of an integer or floating immediate, `None` for anything else.
pub fn get_imm(e: &Expr) -> Option<Imm> {
    match e.node() {
        ExprNode::Int { value, .. } => Some(Imm::Int(*value)),
        ExprNode::UInt { value, .. } => Some(Imm::UInt(*value)),
        ExprNode::Float { value, .. } => Some(Imm::Float(*value)),
        _ => None,
    }
}
