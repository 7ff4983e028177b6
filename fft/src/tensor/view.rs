//! Column-major views with symbolic shape and stride.

use fftgen_ir::prelude::*;
use smallvec::SmallVec;

use super::accessor::Accessor;
use super::{add, mul, sub};

type Modes = SmallVec<[Expr; 6]>;

/// One mode of a [`TensorView::subview`] request.
#[derive(Debug, Clone)]
pub enum Entry {
    /// Fixes the mode to one index; the mode disappears from the subview.
    Index(Expr),
    /// Keeps the mode, starting at `begin` (default 0) with `size` entries (default: the rest).
    Slice { begin: Option<Expr>, size: Option<Expr> },
}

/// Fixes a mode to `index`.
pub fn at(index: impl Into<Expr>) -> Entry {
    Entry::Index(index.into())
}

/// Keeps a mode entirely.
pub fn all() -> Entry {
    Entry::Slice { begin: None, size: None }
}

/// Keeps `size` entries of a mode starting at `begin`.
pub fn span(begin: impl Into<Expr>, size: impl Into<Expr>) -> Entry {
    Entry::Slice { begin: Some(begin.into()), size: Some(size.into()) }
}

/// Multi-dimensional view on an [`Accessor`].
#[derive(Debug, Clone)]
pub struct TensorView {
    accessor: Accessor,
    shape: Modes,
    stride: Modes,
}

impl TensorView {
    /// Packed column-major view.
    pub fn new<E: Into<Expr>>(accessor: Accessor, shape: impl IntoIterator<Item = E>) -> Self {
        let shape: Modes = shape.into_iter().map(Into::into).collect();
        let mut stride = Modes::with_capacity(shape.len());
        let mut s = Expr::from(1u32);
        for extent in &shape {
            stride.push(s.clone());
            s = mul(&s, extent);
        }
        Self { accessor, shape, stride }
    }

    pub fn with_stride<E: Into<Expr>, F: Into<Expr>>(
        accessor: Accessor,
        shape: impl IntoIterator<Item = E>,
        stride: impl IntoIterator<Item = F>,
    ) -> Self {
        let shape: Modes = shape.into_iter().map(Into::into).collect();
        let stride: Modes = stride.into_iter().map(Into::into).collect();
        debug_assert_eq!(shape.len(), stride.len());
        Self { accessor, shape, stride }
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn shape(&self, mode: usize) -> &Expr {
        &self.shape[mode]
    }

    pub fn stride(&self, mode: usize) -> &Expr {
        &self.stride[mode]
    }

    pub fn accessor(&self) -> &Accessor {
        &self.accessor
    }

    /// Same view restricted to one vector lane of an array accessor.
    pub fn component(mut self, component: Option<u8>) -> Self {
        self.accessor = self.accessor.with_component(component);
        self
    }

    /// Linear offset of `index`.
    pub fn offset(&self, index: &[Expr]) -> Expr {
        debug_assert_eq!(index.len(), self.rank(), "index rank mismatch");
        index
            .iter()
            .zip(&self.stride)
            .fold(Expr::from(0u32), |acc, (i, s)| add(&acc, &mul(i, s)))
    }

    pub fn load(&self, index: &[Expr]) -> Expr {
        self.accessor.load(&self.offset(index))
    }

    /// Store statement, `None` for accessors that discard writes.
    pub fn store(&self, value: impl Into<Expr>, index: &[Expr]) -> Option<Expr> {
        self.accessor.store(value.into(), &self.offset(index))
    }

    /// View on a region; index entries drop their mode, slices keep it.
    ///
    /// The region offset is folded into a new base declared in `bb`.
    pub fn subview(&self, bb: &mut BlockBuilder, entries: &[Entry]) -> TensorView {
        debug_assert_eq!(entries.len(), self.rank(), "subview rank mismatch");
        let mut offset = Expr::from(0u32);
        let mut shape = Modes::new();
        let mut stride = Modes::new();
        for (mode, entry) in entries.iter().enumerate() {
            match entry {
                Entry::Index(i) => offset = add(&offset, &mul(i, &self.stride[mode])),
                Entry::Slice { begin, size } => {
                    if let Some(b) = begin {
                        offset = add(&offset, &mul(b, &self.stride[mode]));
                    }
                    let extent = match (begin, size) {
                        (_, Some(size)) => size.clone(),
                        (Some(b), None) => sub(&self.shape[mode], b),
                        (None, None) => self.shape[mode].clone(),
                    };
                    shape.push(extent);
                    stride.push(self.stride[mode].clone());
                }
            }
        }
        TensorView { accessor: self.accessor.subview(bb, &offset), shape, stride }
    }

    /// Splits `mode` into several column-major modes whose extents multiply to the old one.
    pub fn reshaped_mode(&self, mode: usize, mode_shape: &[Expr]) -> TensorView {
        let mut shape = Modes::new();
        let mut stride = Modes::new();
        shape.extend(self.shape[..mode].iter().cloned());
        stride.extend(self.stride[..mode].iter().cloned());
        let mut s = self.stride[mode].clone();
        for extent in mode_shape {
            shape.push(extent.clone());
            stride.push(s.clone());
            s = mul(&s, extent);
        }
        shape.extend(self.shape[mode + 1..].iter().cloned());
        stride.extend(self.stride[mode + 1..].iter().cloned());
        TensorView { accessor: self.accessor.clone(), shape, stride }
    }
}
