//! Load and store expressions for a linear offset.

use fftgen_ir::prelude::*;

use crate::precision::Precision;

/// Storage behind a [`TensorView`](super::TensorView).
#[derive(Debug, Clone)]
pub enum Accessor {
    /// Reads as zero and swallows stores.
    Zero(Precision),

    /// Pointer or array indexed directly, optionally restricted to one vector lane.
    Array { base: Expr, ty: DataType, component: Option<u8> },

    /// Global buffer whose loads and stores may be routed through user functions.
    Callback {
        base: Expr,
        ty: DataType,
        load: Option<String>,
        store: Option<String>,
        user_data: Expr,
        offset: Expr,
    },
}

impl Accessor {
    pub fn array(base: impl Into<Expr>, ty: DataType) -> Self {
        Accessor::Array { base: base.into(), ty, component: None }
    }

    pub fn callback(
        base: impl Into<Expr>,
        ty: DataType,
        load: Option<String>,
        store: Option<String>,
        user_data: impl Into<Expr>,
    ) -> Self {
        Accessor::Callback { base: base.into(), ty, load, store, user_data: user_data.into(), offset: Expr::from(0u32) }
    }

    /// Restricts an array accessor to lane `component`; other accessors are unchanged.
    pub fn with_component(self, component: Option<u8>) -> Self {
        match self {
            Accessor::Array { base, ty, .. } => Accessor::Array { base, ty, component },
            other => other,
        }
    }

    pub fn load(&self, offset: &Expr) -> Expr {
        match self {
            Accessor::Zero(precision) => precision.zero(),
            Accessor::Array { base, component, .. } => {
                let e = base.at(offset);
                match component {
                    Some(c) => e.s(&[*c]),
                    None => e,
                }
            }
            Accessor::Callback { base, load, user_data, offset: base_offset, .. } => {
                let offset = super::add(base_offset, offset);
                match load {
                    Some(name) => call(name.as_str(), [base.clone(), offset, user_data.clone()]),
                    None => base.at(offset),
                }
            }
        }
    }

    /// Store statement, `None` when the accessor discards writes.
    pub fn store(&self, value: Expr, offset: &Expr) -> Option<Expr> {
        match self {
            Accessor::Zero(_) => None,
            Accessor::Array { .. } => Some(self.load(offset).assign(value)),
            Accessor::Callback { base, store, user_data, offset: base_offset, .. } => {
                let offset = super::add(base_offset, offset);
                Some(match store {
                    Some(name) => call(name.as_str(), [base.clone(), offset, value, user_data.clone()]),
                    None => base.at(offset).assign(value),
                })
            }
        }
    }

    /// Accessor shifted by `offset`; the shifted base is declared in `bb`.
    pub fn subview(&self, bb: &mut BlockBuilder, offset: &Expr) -> Accessor {
        match self {
            Accessor::Zero(precision) => Accessor::Zero(*precision),
            Accessor::Array { base, ty, component } => {
                let sub = bb.declare_assign(DataType::pointer_to(ty.clone()), "sub", super::add(base, offset));
                Accessor::Array { base: sub, ty: ty.clone(), component: *component }
            }
            Accessor::Callback { base, ty, load, store, user_data, offset: base_offset } => {
                let shifted = bb.declare_assign(
                    DataType::generic(BuiltinType::SizeT),
                    "offset",
                    super::add(base_offset, offset),
                );
                Accessor::Callback {
                    base: base.clone(),
                    ty: ty.clone(),
                    load: load.clone(),
                    store: store.clone(),
                    user_data: user_data.clone(),
                    offset: shifted,
                }
            }
        }
    }
}
