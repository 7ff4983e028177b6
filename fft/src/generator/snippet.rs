//! Copy loops shared by the generator families.

use fftgen_ir::prelude::*;

use crate::precision::Precision;
use crate::tensor::TensorView;

fn uint() -> DataType {
    DataType::generic(BuiltinType::Uint)
}

/// `dst[i] = src[i]` for `i < n`.
pub fn copy_n_block(bb: &mut BlockBuilder, src: &TensorView, dst: &TensorView, n: usize) {
    copy_n_block_with_permutation(bb, src, dst, n, |i| i, |i| i);
}

/// `dst[dst_perm(i)] = src[src_perm(i)]` for `i < n`, fully unrolled.
pub fn copy_n_block_with_permutation(
    bb: &mut BlockBuilder,
    src: &TensorView,
    dst: &TensorView,
    n: usize,
    src_perm: impl Fn(usize) -> usize,
    dst_perm: impl Fn(usize) -> usize,
) {
    for i in 0..n {
        let value = src.load(&[src_perm(i).into()]);
        if let Some(store) = dst.store(value, &[dst_perm(i).into()]) {
            bb.add(store);
        }
    }
}

/// Copies an `mb x n x kb` block between two 3-D views with the work-group's 2-D grid.
///
/// Work-item `(m, k)` of an `Mb x Kb` group handles the linear block indices
/// `m + k mb + j mb kb` for `j < n`, so consecutive work-items touch consecutive batch entries
/// on both sides. A run-time `mb` that equals the local size takes the constant path.
pub fn copy_mbnkb_block_on_2d_grid(
    bb: &mut BlockBuilder,
    src: &TensorView,
    dst: &TensorView,
    mb: &Expr,
    n: usize,
    kb: &Expr,
) {
    let make_copy = |bb: &mut BlockBuilder, mb: &Expr| {
        let m_local = bb.declare_assign(uint(), "m_local", get_local_id(0u32));
        let k_local = bb.declare_assign(uint(), "k_local", get_local_id(1u32));
        bb.if_selection(m_local.lt(mb).logical_and(k_local.lt(kb)), |bb| {
            let base_idx = bb.declare_assign(uint(), "base_idx", &m_local + &k_local * mb);
            let m_in = bb.declare_assign(uint(), "m_in", &base_idx % mb);
            for n_local in 0..n {
                let idx = bb.declare_assign(uint(), "idx", &base_idx + n_local * (mb * kb));
                let n_in = &idx / mb % n;
                let k_in = &idx / (mb * n);
                let index = [m_in.clone(), n_in, k_in];
                if let Some(store) = dst.store(src.load(&index), &index) {
                    bb.add(store);
                }
            }
        });
    };

    if mb.imm().is_some() {
        make_copy(bb, mb);
    } else {
        let local_size = get_local_size(0u32);
        bb.if_else(mb.eq_(&local_size), |bb| make_copy(bb, &local_size), |bb| make_copy(bb, mb));
    }
}

/// Zeroes batch slot `k_slot` of a `Mb x n x Kb` shared buffer when it lies inside the block
/// (`k_slot < kb`).
///
/// The double real kernels pack batch pairs; for odd `K` the last pair has no odd member and its
/// slot would otherwise keep stale data from the previous load.
pub fn set_k_maybe_not_written_to_zero(
    bb: &mut BlockBuilder,
    precision: Precision,
    view: &TensorView,
    n: usize,
    kb: &Expr,
    kb_max: usize,
    k_slot: &Expr,
) {
    bb.if_selection(k_slot.lt(kb), |bb| {
        let m_local = bb.declare_assign(uint(), "m_local", get_local_id(0u32));
        let k_local = bb.declare_assign(uint(), "k_local", get_local_id(1u32));
        let i = Var::new("i");
        let ie = Expr::from(&i);
        let start = Stmt::declaration_assignment(uint(), i, &k_local);
        bb.for_loop(start, ie.lt(n), ie.assign_add(kb_max), |bb| {
            if let Some(store) = view.store(precision.zero(), &[m_local.clone(), ie.clone(), k_slot.clone()]) {
                bb.add(store);
            }
        });
    });
}
