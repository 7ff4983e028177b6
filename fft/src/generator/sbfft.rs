//! Small-batch kernels.
//!
//! Global data is staged through shared local memory so that both the global accesses and the
//! register loads are contiguous: a work-group first copies an `mb x N x kb` block into local
//! memory, then every work-item pulls its own transform into a private array, runs the whole
//! FFT in registers and writes back the same way.

use fftgen_ir::prelude::*;
use fftgen_ir::visitor::{make_names_unique, unsafe_simplify_program};
use snafu::ResultExt;
use tracing::debug;

use super::mixed_radix::{ComplexMul, inplace};
use super::snippet::{
    copy_mbnkb_block_on_2d_grid, copy_n_block, copy_n_block_with_permutation, set_k_maybe_not_written_to_zero,
};
use super::{GenerateOptions, Layout, Variant, clamp_below, complex, conj, global_accessors, size_t, times_i, uint};
use crate::algorithm::SmallBatchConfiguration;
use crate::error::{IrSnafu, Result};
use crate::factor::trial_division;
use crate::math::Complex;
use crate::precision::Precision;
use crate::root_of_unity::power_of_w;
use crate::scrambler::Unscrambler;
use crate::tensor::{Accessor, TensorView, all, at, span};

/// Run-time block extents shared by the load and store phases.
struct Block {
    precision: Precision,
    layout: Layout,
    n: usize,
    kb_max: usize,
    mb: Expr,
    kb: Expr,
    /// Batch entries of the odd half, only for the double variants.
    kb_odd: Option<Expr>,
}

/// Global view, its staging buffer and this work-item's slice of it.
struct Staging {
    global: TensorView,
    slm: TensorView,
    slm_1d: TensorView,
}

/// Emits the kernel for `cfg`.
#[tracing::instrument(skip_all, fields(identifier = %cfg))]
pub fn generate(cfg: &SmallBatchConfiguration, options: &GenerateOptions) -> Result<Program> {
    let layout = cfg.layout();
    let p = cfg.precision;
    let in_ty = p.with_components(layout.in_components, AddrSpace::Global);
    let out_ty = p.with_components(layout.out_components, AddrSpace::Global);
    let slm_in_ty = p.with_components(layout.in_components, AddrSpace::Local);
    let slm_out_ty = p.with_components(layout.out_components, AddrSpace::Local);
    let type2 = p.complex(AddrSpace::Generic);

    let name = options.name.clone().unwrap_or_else(|| cfg.identifier());
    let mut fb = kernel_builder(name);
    let in_ = fb.argument(DataType::pointer_to(in_ty.clone()), "in");
    let out = fb.argument(DataType::pointer_to(out_ty.clone()), "out");
    let k_total = fb.argument(DataType::generic(BuiltinType::Ulong), "K");
    let user_data = cfg
        .has_callbacks()
        .then(|| fb.argument(DataType::pointer_to(DataType::global(BuiltinType::Void)), "user_data"));
    fb.attribute(Attribute::ReqdWorkGroupSize([cfg.mb as u32, cfg.kb as u32, 1]));
    fb.attribute(Attribute::IntelReqdSubGroupSize(cfg.sgs as u32));

    let (in_acc, out_acc) = global_accessors(
        &in_,
        &in_ty,
        &out,
        &out_ty,
        cfg.load_function.as_deref(),
        cfg.store_function.as_deref(),
        user_data.as_ref(),
    );

    fb.body(|bb| {
        let mb: Expr = if cfg.m < cfg.mb {
            cfg.m.into()
        } else if cfg.m % cfg.mb == 0 {
            cfg.mb.into()
        } else {
            let mb = bb.declare_assign(uint(), "mb", cfg.m - get_group_id(0u32) * cfg.mb);
            bb.assign(&mb, clamp_below(&mb, cfg.mb));
            mb
        };
        let k_first = bb.declare_assign(size_t(), "k_first", get_group_id(1u32) * (layout.k_stride * cfg.kb));
        let kb = bb.declare_assign(uint(), "kb", (&k_total - &k_first - 1u32) / layout.k_stride + 1u32);
        let kb_odd = (layout.k_stride == 2).then(|| bb.declare_assign(uint(), "kb_odd", &kb - &k_total % 2u32));
        bb.assign(&kb, clamp_below(&kb, cfg.kb));
        if let Some(kb_odd) = &kb_odd {
            bb.assign(kb_odd, clamp_below(kb_odd, cfg.kb));
        }
        let block = Block { precision: p, layout, n: cfg.n, kb_max: cfg.kb, mb, kb, kb_odd };

        let batch_block =
            || [span(get_group_id(0u32) * cfg.mb, block.mb.clone()), all(), span(k_first.clone(), block.kb.clone())];

        let in_view =
            TensorView::with_stride(in_acc, [Expr::from(cfg.m), layout.n_in.into(), k_total.clone()], cfg.istride);
        let entries = batch_block();
        let in_view = in_view.subview(bb, &entries);

        let x1 = bb.declare(DataType::array_of(p.complex(AddrSpace::Local), cfg.kb * layout.n_slm * cfg.mb), "X1");
        let load = staging(bb, &x1, slm_in_ty, in_view, cfg.mb, layout.n_in, cfg.kb, "X1_in");

        let x = bb.declare(DataType::array_of(type2.clone(), layout.n_fft), "x");
        let x_view = TensorView::new(Accessor::array(&x, type2.clone()), [layout.n_fft]);

        match layout.variant {
            Variant::C2c => load_c2c(bb, &block, &load, &x_view),
            Variant::R2cHalf => load_r2c_half(bb, &block, &load, &x_view),
            Variant::R2cDouble => load_r2c_double(bb, &block, &load, &x_view),
            Variant::C2rHalf => load_c2r_half(bb, &block, &load, &x_view),
            Variant::C2rDouble => load_c2r_double(bb, &block, &load, &x_view),
        }

        let factors = trial_division(layout.n_fft);
        inplace(bb, options.butterfly, p, cfg.direction.sign(), &factors, &x, None);
        let unscramble = Unscrambler::new(&factors);

        bb.add(barrier(MemFenceFlag::Local));

        let out_view =
            TensorView::with_stride(out_acc, [Expr::from(cfg.m), layout.n_out.into(), k_total.clone()], cfg.ostride);
        let entries = batch_block();
        let out_view = out_view.subview(bb, &entries);
        let store = staging(bb, &x1, slm_out_ty, out_view, cfg.mb, layout.n_out, cfg.kb, "X1_out");

        let perm = |i: usize| unscramble.apply(i);
        match layout.variant {
            Variant::C2c => store_c2c(bb, &block, &store, &x_view, perm),
            Variant::R2cHalf => store_r2c_half(bb, &block, &store, &x_view, perm),
            Variant::R2cDouble => store_r2c_double(bb, &block, &store, &x_view, perm),
            Variant::C2rHalf => store_c2r_half(bb, &block, &store, &x_view, perm),
            Variant::C2rDouble => store_c2r_double(bb, &block, &store, &x_view, perm),
        }
    });

    let mut pb = ProgramBuilder::new();
    pb.add(fb.get_product());
    let mut program = pb.get_product();
    make_names_unique(&program).context(IrSnafu)?;
    if options.simplify {
        unsafe_simplify_program(&mut program);
    }
    debug!(variant = %layout.variant, n_fft = layout.n_fft, "generated small-batch kernel");
    Ok(program)
}

/// Reinterprets the shared buffer with element type `slm_ty` and views it as `Mb x n x Kb`.
#[allow(clippy::too_many_arguments)]
fn staging(
    bb: &mut BlockBuilder,
    x1: &Expr,
    slm_ty: DataType,
    global: TensorView,
    mb: usize,
    n: usize,
    kb: usize,
    prefix: &str,
) -> Staging {
    let ptr_ty = DataType::pointer_to(slm_ty.clone());
    let base = bb.declare_assign(ptr_ty.clone(), prefix, cast(ptr_ty, x1));
    let slm = TensorView::new(Accessor::array(&base, slm_ty), [mb, n, kb]);
    let slm_1d = slm.subview(bb, &[at(get_local_id(0u32)), span(0u32, n), at(get_local_id(1u32))]);
    Staging { global, slm, slm_1d }
}

// =============================================================================
// Block copies
// =============================================================================

fn copy_in(bb: &mut BlockBuilder, block: &Block, s: &Staging) {
    copy_mbnkb_block_on_2d_grid(bb, &s.global, &s.slm, &block.mb, block.layout.n_in, &block.kb);
}

fn copy_out(bb: &mut BlockBuilder, block: &Block, s: &Staging) {
    copy_mbnkb_block_on_2d_grid(bb, &s.slm, &s.global, &block.mb, block.layout.n_out, &block.kb);
}

/// Every second batch entry of the global view, starting at `k_offset`.
fn interleaved(bb: &mut BlockBuilder, block: &Block, global: &TensorView, k_offset: usize) -> TensorView {
    global
        .reshaped_mode(2, &[block.layout.k_stride.into(), block.kb.clone()])
        .subview(bb, &[all(), all(), at(k_offset), all()])
}

fn kb_for(block: &Block, k_offset: usize) -> &Expr {
    match (&block.kb_odd, k_offset) {
        (Some(kb_odd), 1) => kb_odd,
        _ => &block.kb,
    }
}

fn double_load(bb: &mut BlockBuilder, block: &Block, s: &Staging, k_offset: usize) {
    let src = interleaved(bb, block, &s.global, k_offset);
    copy_mbnkb_block_on_2d_grid(bb, &src, &s.slm, &block.mb, block.layout.n_in, kb_for(block, k_offset));
}

fn double_store(bb: &mut BlockBuilder, block: &Block, s: &Staging, k_offset: usize) {
    let dst = interleaved(bb, block, &s.global, k_offset);
    copy_mbnkb_block_on_2d_grid(bb, &s.slm, &dst, &block.mb, block.layout.n_out, kb_for(block, k_offset));
}

/// Clears the odd slot the last odd half leaves untouched when `K` is odd.
fn zero_missing_odd_slot(bb: &mut BlockBuilder, block: &Block, s: &Staging) {
    if let Some(kb_odd) = &block.kb_odd {
        set_k_maybe_not_written_to_zero(bb, block.precision, &s.slm, block.layout.n_in, &block.kb, block.kb_max, kb_odd);
    }
}

fn local_barrier(bb: &mut BlockBuilder) {
    bb.add(barrier(MemFenceFlag::Local));
}

// =============================================================================
// c2c
// =============================================================================

fn load_c2c(bb: &mut BlockBuilder, block: &Block, s: &Staging, x: &TensorView) {
    copy_in(bb, block, s);
    local_barrier(bb);
    copy_n_block(bb, &s.slm_1d, x, block.layout.n_fft);
}

fn store_c2c(bb: &mut BlockBuilder, block: &Block, s: &Staging, x: &TensorView, perm: impl Fn(usize) -> usize) {
    copy_n_block_with_permutation(bb, x, &s.slm_1d, block.layout.n_fft, perm, |i| i);
    local_barrier(bb);
    copy_out(bb, block, s);
}

// =============================================================================
// Even real lengths: half-length FFT
// =============================================================================

fn load_r2c_half(bb: &mut BlockBuilder, block: &Block, s: &Staging, x: &TensorView) {
    copy_in(bb, block, s);
    local_barrier(bb);
    let n_fft = block.layout.n_fft;
    let pairs = s.slm_1d.reshaped_mode(0, &[2u32.into(), n_fft.into()]);
    for c in 0..2u8 {
        let src = pairs.subview(bb, &[at(c as u32), all()]);
        copy_n_block(bb, &src, &x.clone().component(Some(c)), n_fft);
    }
}

/// Untangles the half-length spectrum `y` of the packed even/odd samples into `X_0..X_{N/2}`.
fn store_r2c_half(bb: &mut BlockBuilder, block: &Block, s: &Staging, y: &TensorView, perm: impl Fn(usize) -> usize) {
    let p = block.precision;
    let n = block.n;
    let cmul = ComplexMul::new(p);
    let type2 = p.complex(AddrSpace::Generic);
    let two = p.constant(2.0);
    for i in 0..=n / 4 {
        let i_other = n / 2 - i;
        let y1 = bb.declare_assign(type2.clone(), "yi", y.load(&[perm(i % (n / 2)).into()]));
        let y2 = bb.declare_assign(type2.clone(), "yN_i", y.load(&[perm(i_other % (n / 2)).into()]));
        bb.assign(&y2, conj(p, &y2));
        let a = bb.declare_assign(type2.clone(), "a", (&y2 + &y1) / &two);
        let b = bb.declare_assign(type2.clone(), "b", (&y2 - &y1) / &two);
        bb.assign(&b, times_i(p, &b));
        bb.assign(&b, cmul.by_constant(&b, power_of_w(-(i as i64), n as i64)));
        if let Some(store) = s.slm_1d.store(&a + &b, &[i.into()]) {
            bb.add(store);
        }
        if i != i_other {
            let other = complex(p, a.s(&[0]) - b.s(&[0]), b.s(&[1]) - a.s(&[1]));
            if let Some(store) = s.slm_1d.store(other, &[i_other.into()]) {
                bb.add(store);
            }
        }
    }
    local_barrier(bb);
    copy_out(bb, block, s);
}

/// Folds `X_0..X_{N/2}` into the half-length spectrum whose inverse yields the packed samples.
fn load_c2r_half(bb: &mut BlockBuilder, block: &Block, s: &Staging, x: &TensorView) {
    copy_in(bb, block, s);
    local_barrier(bb);

    let p = block.precision;
    let n = block.n;
    let cmul = ComplexMul::new(p);
    let type2 = p.complex(AddrSpace::Generic);
    for i in 0..=n / 4 {
        let i_other = n / 2 - i;
        let i_store = i % (n / 2);
        let i_other_store = i_other % (n / 2);
        let x1 = bb.declare_assign(type2.clone(), "xi", s.slm_1d.load(&[i.into()]));
        if i == 0 {
            bb.assign(x1.s(&[1]), p.zero());
        }
        let x2 = bb.declare_assign(type2.clone(), "xN_i", s.slm_1d.load(&[i_other.into()]));
        bb.assign(&x2, conj(p, &x2));
        let a = bb.declare_assign(type2.clone(), "a", &x1 + &x2);
        let b = bb.declare_assign(type2.clone(), "b", &x1 - &x2);
        let tw = power_of_w(i as i64, n as i64) * Complex::new(0.0, 1.0);
        bb.assign(&b, cmul.by_constant(&b, tw));
        if let Some(store) = x.store(&a + &b, &[i_store.into()]) {
            bb.add(store);
        }
        if i_store != i_other_store {
            let other = complex(p, a.s(&[0]) - b.s(&[0]), b.s(&[1]) - a.s(&[1]));
            if let Some(store) = x.store(other, &[i_other_store.into()]) {
                bb.add(store);
            }
        }
    }
}

fn store_c2r_half(bb: &mut BlockBuilder, block: &Block, s: &Staging, x: &TensorView, perm: impl Fn(usize) -> usize) {
    let n_fft = block.layout.n_fft;
    let pairs = s.slm_1d.reshaped_mode(0, &[2u32.into(), n_fft.into()]);
    for c in 0..2u8 {
        let dst = pairs.subview(bb, &[at(c as u32), all()]);
        copy_n_block_with_permutation(bb, &x.clone().component(Some(c)), &dst, n_fft, &perm, |i| i);
    }
    local_barrier(bb);
    copy_out(bb, block, s);
}

// =============================================================================
// Odd real lengths: two transforms per FFT
// =============================================================================

fn load_r2c_double(bb: &mut BlockBuilder, block: &Block, s: &Staging, x: &TensorView) {
    let n_in = block.layout.n_in;
    double_load(bb, block, s, 0);
    local_barrier(bb);
    copy_n_block(bb, &s.slm_1d, &x.clone().component(Some(0)), n_in);
    local_barrier(bb);
    zero_missing_odd_slot(bb, block, s);
    local_barrier(bb);
    double_load(bb, block, s, 1);
    local_barrier(bb);
    copy_n_block(bb, &s.slm_1d, &x.clone().component(Some(1)), n_in);
}

fn store_r2c_double(bb: &mut BlockBuilder, block: &Block, s: &Staging, y: &TensorView, perm: impl Fn(usize) -> usize) {
    r2c_double_postprocess(bb, block, y, &s.slm_1d, 0, &perm);
    local_barrier(bb);
    double_store(bb, block, s, 0);
    local_barrier(bb);
    r2c_double_postprocess(bb, block, y, &s.slm_1d, 1, &perm);
    local_barrier(bb);
    double_store(bb, block, s, 1);
}

/// Extracts the spectrum of the real (`component == 0`) or imaginary (`component == 1`) input
/// lane from the combined spectrum `y`.
fn r2c_double_postprocess(
    bb: &mut BlockBuilder,
    block: &Block,
    y: &TensorView,
    out: &TensorView,
    component: u8,
    perm: &impl Fn(usize) -> usize,
) {
    let p = block.precision;
    let n = block.n;
    let type2 = p.complex(AddrSpace::Generic);
    let two = p.constant(2.0);
    for i in 0..=n / 2 {
        let i_other = (n - i) % n;
        let y1 = bb.declare_assign(type2.clone(), "yi", y.load(&[perm(i).into()]));
        let y2 = bb.declare_assign(type2.clone(), "yN_i", y.load(&[perm(i_other).into()]));
        bb.assign(&y2, conj(p, &y2));
        if component == 0 {
            bb.assign(&y1, (&y2 + &y1) / &two);
        } else {
            bb.assign(&y1, (&y2 - &y1) / &two);
            bb.assign(&y1, times_i(p, &y1));
        }
        if let Some(store) = out.store(&y1, &[i.into()]) {
            bb.add(store);
        }
        bb.add(sub_group_barrier(MemFenceFlag::Local));
    }
}

fn load_c2r_double(bb: &mut BlockBuilder, block: &Block, s: &Staging, x: &TensorView) {
    double_load(bb, block, s, 0);
    local_barrier(bb);
    c2r_double_preprocess(bb, block, &s.slm_1d, x, 0);
    local_barrier(bb);
    zero_missing_odd_slot(bb, block, s);
    local_barrier(bb);
    double_load(bb, block, s, 1);
    local_barrier(bb);
    c2r_double_preprocess(bb, block, &s.slm_1d, x, 1);
}

/// Builds `x = X_a + i X_b` from the half-spectra of two real signals, extending both by
/// Hermitian symmetry.
fn c2r_double_preprocess(bb: &mut BlockBuilder, block: &Block, src: &TensorView, x: &TensorView, component: u8) {
    let p = block.precision;
    let n = block.n;
    let type2 = p.complex(AddrSpace::Generic);
    for i in 0..=n / 2 {
        let i_other = (n - i) % n;
        let xi = src.load(&[i.into()]);
        let x_i = x.load(&[i.into()]);
        let x_other = x.load(&[i_other.into()]);
        if component == 0 {
            // imaginary part of the zero-frequency term must vanish
            if i == 0 {
                bb.assign(x_i.s(&[0]), xi.s(&[0]));
                bb.assign(x_i.s(&[1]), p.zero());
            } else {
                bb.assign(&x_i, &xi);
            }
            if i != i_other {
                bb.assign(&x_other, &xi);
            }
        } else {
            let bi = bb.declare_assign(type2.clone(), "bi", &xi);
            bb.assign(&bi, times_i(p, &bi));
            if i == 0 {
                bb.add(x_i.s(&[1]).assign_add(bi.s(&[1])));
            } else {
                bb.add(x_i.assign_add(&bi));
            }
            if i != i_other {
                bb.add(x_other.assign_sub(&bi));
                bb.assign(&x_other, conj(p, &x_other));
            }
        }
    }
}

fn store_c2r_double(bb: &mut BlockBuilder, block: &Block, s: &Staging, x: &TensorView, perm: impl Fn(usize) -> usize) {
    let n_out = block.layout.n_out;
    for c in 0..2u8 {
        copy_n_block_with_permutation(bb, &x.clone().component(Some(c)), &s.slm_1d, n_out, &perm, |i| i);
        local_barrier(bb);
        double_store(bb, block, s, c as usize);
        if c == 0 {
            local_barrier(bb);
        }
    }
}
