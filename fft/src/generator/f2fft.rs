//! Two-factor kernels.
//!
//! The `Nb` work-items of one transform cooperate on a column of shared local memory. Every
//! stage handles one factor `N_f`: each work-item pulls `N_f` strided entries into registers, runs
//! a small FFT with the inter-stage twiddles fused into its last butterfly and writes the result
//! back in place. Stages are separated by work-group barriers. The twiddle table is a kernel
//! argument computed on the host, see [`crate::twiddle`].

use fftgen_ir::prelude::*;
use fftgen_ir::visitor::{make_names_unique, unsafe_simplify_program};
use snafu::ResultExt;
use tracing::debug;

use super::mixed_radix::{ComplexMul, inplace};
use super::snippet::{copy_n_block, copy_n_block_with_permutation};
use super::{GenerateOptions, Layout, Variant, complex, conj, global_accessors, short, size_t, times_i};
use crate::algorithm::Factor2SlmConfiguration;
use crate::error::{FactorizationTooShortSnafu, IrSnafu, Result};
use crate::factor::trial_division;
use crate::precision::Precision;
use crate::scrambler::Unscrambler;
use crate::tensor::{Accessor, TensorView, all, at};
use crate::twiddle::two_n_offset;

/// Values shared by all phases of one kernel body.
struct Kernel<'a> {
    cfg: &'a Factor2SlmConfiguration,
    options: &'a GenerateOptions,
    precision: Precision,
    layout: Layout,
    mm: Expr,
    kk: Expr,
    n_local: Expr,
    k_total: Expr,
    twiddle: Expr,
    /// This work-item's column of shared local memory.
    x1: TensorView,
    tw2n_offset: usize,
}

impl Kernel<'_> {
    fn factors(&self) -> &[usize] {
        &self.cfg.factorization
    }

    /// `mm < M && k < K`
    fn in_range(&self, k: &Expr) -> Expr {
        self.mm.lt(self.cfg.m).logical_and(k.lt(&self.k_total))
    }

    fn type2(&self) -> DataType {
        self.precision.complex(AddrSpace::Generic)
    }

    /// `twiddle[tw2N_offset + i]`, the half-length untangling factor `i * w_N^(dir * i)`.
    fn twiddle_2n(&self, i: &Expr) -> Expr {
        self.twiddle.at(i + self.tw2n_offset)
    }
}

/// Emits the kernel for `cfg`.
#[tracing::instrument(skip_all, fields(identifier = %cfg))]
pub fn generate(cfg: &Factor2SlmConfiguration, options: &GenerateOptions) -> Result<Program> {
    snafu::ensure!(
        cfg.factorization.len() >= 2,
        FactorizationTooShortSnafu { n: cfg.n, factors: cfg.factorization.clone() }
    );
    let layout = cfg.layout();
    let p = cfg.precision;
    let in_ty = p.with_components(layout.in_components, AddrSpace::Global);
    let out_ty = p.with_components(layout.out_components, AddrSpace::Global);

    let name = options.name.clone().unwrap_or_else(|| cfg.identifier());
    let mut fb = kernel_builder(name);
    let in_ = fb.argument(DataType::pointer_to(in_ty.clone()), "in");
    let out = fb.argument(DataType::pointer_to(out_ty.clone()), "out");
    let twiddle = fb.argument(DataType::pointer_to(p.complex(AddrSpace::Constant)), "twiddle");
    let k_total = fb.argument(DataType::generic(BuiltinType::Ulong), "K");
    let user_data = cfg
        .has_callbacks()
        .then(|| fb.argument(DataType::pointer_to(DataType::global(BuiltinType::Void)), "user_data"));
    fb.attribute(Attribute::ReqdWorkGroupSize([cfg.mb as u32, cfg.nb as u32, cfg.kb as u32]));
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
        let x1 = bb.declare(DataType::array_of(p.complex(AddrSpace::Local), cfg.kb * layout.n_slm * cfg.mb), "X1");
        let kk = bb.declare_assign(size_t(), "kk", get_global_id(2u32));
        let mm = bb.declare_assign(size_t(), "mm", get_global_id(0u32));
        let n_local = bb.declare_assign(size_t(), "n_local", get_local_id(1u32));
        let x1_view = TensorView::new(Accessor::array(&x1, p.complex(AddrSpace::Local)), [cfg.mb, layout.n_slm, cfg.kb])
            .subview(bb, &[at(get_local_id(0u32)), all(), at(get_local_id(2u32))]);

        let kernel = Kernel {
            cfg,
            options,
            precision: p,
            layout,
            mm,
            kk,
            n_local,
            k_total: k_total.clone(),
            twiddle: twiddle.clone(),
            x1: x1_view,
            tw2n_offset: two_n_offset(&cfg.factorization),
        };

        let in_view =
            TensorView::with_stride(in_acc, [Expr::from(cfg.m), layout.n_in.into(), k_total.clone()], cfg.istride);
        let out_view =
            TensorView::with_stride(out_acc, [Expr::from(cfg.m), layout.n_out.into(), k_total.clone()], cfg.ostride);

        match layout.variant {
            Variant::C2rHalf => preprocess_c2r_half(bb, &kernel, &in_view),
            Variant::C2rDouble => preprocess_c2r_double(bb, &kernel, &in_view),
            _ => {}
        }

        stages(bb, &kernel, &in_view);

        match layout.variant {
            Variant::C2c => postprocess_c2c(bb, &kernel, &out_view),
            Variant::R2cHalf => postprocess_r2c_half(bb, &kernel, &out_view),
            Variant::R2cDouble => postprocess_r2c_double(bb, &kernel, &out_view),
            Variant::C2rHalf => postprocess_c2r_half(bb, &kernel, &out_view),
            Variant::C2rDouble => postprocess_c2r_double(bb, &kernel, &out_view),
        }
    });

    let mut pb = ProgramBuilder::new();
    pb.add(fb.get_product());
    let mut program = pb.get_product();
    make_names_unique(&program).context(IrSnafu)?;
    if options.simplify {
        unsafe_simplify_program(&mut program);
    }
    debug!(variant = %layout.variant, factors = ?cfg.factorization, "generated two-factor kernel");
    Ok(program)
}

// =============================================================================
// Loops
// =============================================================================

/// Distributes `0..extent` over the `nb` work-items of a transform.
///
/// A plain scope suffices when every work-item owns exactly one index.
fn parallel_loop(
    bb: &mut BlockBuilder,
    n_local: &Expr,
    nb: usize,
    extent: usize,
    prefix: &str,
    body: impl FnOnce(&mut BlockBuilder, &Expr),
) {
    if extent == nb {
        bb.scope(|bb| body(bb, n_local));
        return;
    }
    let var = Var::new(prefix);
    let i = Expr::from(&var);
    let start = Stmt::declaration_assignment(short(), var, n_local);
    bb.for_loop(start, i.lt(extent), i.assign_add(nb), |bb| body(bb, &i));
}

/// `for (short i = n_local; i <= last; i += nb)`
fn strided_loop_inclusive(
    bb: &mut BlockBuilder,
    kernel: &Kernel<'_>,
    prefix: &str,
    last: usize,
    body: impl FnOnce(&mut BlockBuilder, &Expr),
) {
    let var = Var::new(prefix);
    let i = Expr::from(&var);
    let start = Stmt::declaration_assignment(short(), var, &kernel.n_local);
    bb.for_loop(start, i.le(last), i.assign_add(kernel.cfg.nb), |bb| body(bb, &i));
}

fn add_store(bb: &mut BlockBuilder, store: Option<Expr>) {
    if let Some(store) = store {
        bb.add(store);
    }
}

fn local_barrier(bb: &mut BlockBuilder) {
    bb.add(barrier(MemFenceFlag::Local));
}

// =============================================================================
// Stages
// =============================================================================

fn stages(bb: &mut BlockBuilder, kernel: &Kernel<'_>, in_view: &TensorView) {
    let factors = kernel.factors();
    let last = factors.len() - 1;
    let mut j1 = factors.iter().product::<usize>();
    let mut j2 = 1;
    let mut tw_offset = 0;
    for f in (0..=last).rev() {
        let nf = factors[f];
        j1 /= nf;
        let (big_j1, big_j2) = (j1, j2);
        parallel_loop(bb, &kernel.n_local, kernel.cfg.nb, j1 * j2, "j1j2", |bb, j1j2| {
            let (j1, j2) = split_index(bb, j1j2, big_j1, big_j2);
            let stage = Stage { f, nf, big_j1, big_j2, tw_offset };
            compute_stage(bb, kernel, &stage, &j1, &j2, in_view);
        });
        j2 *= nf;
        tw_offset += j1 * nf;
        local_barrier(bb);
    }
}

/// `j1j2 = j1 + j2 * J1`, with trivial modes left constant.
fn split_index(bb: &mut BlockBuilder, j1j2: &Expr, big_j1: usize, big_j2: usize) -> (Expr, Expr) {
    if big_j2 == 1 {
        (j1j2.clone(), Expr::from(0u32))
    } else if big_j1 == 1 {
        (Expr::from(0u32), j1j2.clone())
    } else {
        let j1 = bb.declare_assign(short(), "j1", j1j2 % big_j1);
        let j2 = bb.declare_assign(short(), "j2", j1j2 / big_j1);
        (j1, j2)
    }
}

struct Stage {
    f: usize,
    nf: usize,
    big_j1: usize,
    big_j2: usize,
    tw_offset: usize,
}

fn compute_stage(bb: &mut BlockBuilder, kernel: &Kernel<'_>, stage: &Stage, j1: &Expr, j2: &Expr, in_view: &TensorView) {
    let type2 = kernel.type2();
    let nf = stage.nf;
    let x = bb.declare(DataType::array_of(type2.clone(), nf), "x");
    let x_view = TensorView::new(Accessor::array(&x, type2), [nf]);
    let column = kernel.x1.reshaped_mode(0, &[stage.big_j1.into(), nf.into(), stage.big_j2.into()]);

    if stage.f == kernel.factors().len() - 1 {
        load(bb, kernel, in_view, &x_view, j1);
    } else {
        let src = column.subview(bb, &[at(j1), all(), at(j2)]);
        copy_n_block(bb, &src, &x_view, nf);
    }

    let tw_j1 = (stage.f > 0).then(|| {
        bb.declare_assign(
            DataType::pointer_to(kernel.precision.complex(AddrSpace::Constant)),
            "tw_j1",
            &kernel.twiddle + stage.tw_offset + j1 * nf,
        )
    });
    let factors = trial_division(nf);
    inplace(
        bb,
        kernel.options.butterfly,
        kernel.precision,
        kernel.cfg.direction.sign(),
        &factors,
        &x,
        tw_j1.as_ref(),
    );

    let unscramble = Unscrambler::new(&factors);
    let dst = column.subview(bb, &[at(j1), all(), at(j2)]);
    copy_n_block_with_permutation(bb, &x_view, &dst, nf, |i| unscramble.apply(i), |i| i);
}

// =============================================================================
// First stage loads
// =============================================================================

fn load(bb: &mut BlockBuilder, kernel: &Kernel<'_>, in_view: &TensorView, x: &TensorView, j1: &Expr) {
    let kk = &kernel.kk;
    match kernel.layout.variant {
        Variant::C2c => global_load(bb, kernel, kk, in_view, x, j1),
        Variant::R2cHalf => {
            let pairs = in_view.reshaped_mode(1, &[2u32.into(), kernel.layout.n_fft.into()]);
            for c in 0..2u8 {
                let src = pairs.subview(bb, &[all(), at(c as u32), all(), all()]);
                global_load(bb, kernel, kk, &src, &x.clone().component(Some(c)), j1);
            }
        }
        Variant::R2cDouble => {
            let (_, last) = first_stage_split(kernel.factors());
            global_load(bb, kernel, &(kk * 2u32), in_view, &x.clone().component(Some(0)), j1);
            let zero = TensorView::new(Accessor::Zero(kernel.precision), [last]);
            copy_n_block(bb, &zero, &x.clone().component(Some(1)), last);
            global_load(bb, kernel, &(kk * 2u32 + 1u32), in_view, &x.clone().component(Some(1)), j1);
        }
        Variant::C2rHalf | Variant::C2rDouble => {
            let (big_j1, nf) = first_stage_split(kernel.factors());
            let src = kernel.x1.reshaped_mode(0, &[big_j1.into(), nf.into()]).subview(bb, &[at(j1), all()]);
            copy_n_block(bb, &src, x, nf);
        }
    }
}

/// `(J1, N_f)` of the first stage: the last factor and the product of all others.
fn first_stage_split(factors: &[usize]) -> (usize, usize) {
    let (last, rest) = factors.split_last().map_or((1, &[][..]), |(l, r)| (*l, r));
    (rest.iter().product(), last)
}

/// Reads the `N_f` entries `j1 + J1 * i` of batch entry `k` into `x`.
fn global_load(bb: &mut BlockBuilder, kernel: &Kernel<'_>, k: &Expr, view: &TensorView, x: &TensorView, j1: &Expr) {
    let (big_j1, nf) = first_stage_split(kernel.factors());
    bb.if_selection(kernel.in_range(k), |bb| {
        let src = view
            .reshaped_mode(1, &[big_j1.into(), nf.into()])
            .subview(bb, &[at(&kernel.mm), at(j1), all(), at(k)]);
        copy_n_block(bb, &src, x, nf);
    });
}

// =============================================================================
// Output
// =============================================================================

/// Column of shared memory holding output frequencies `j2 + J2 * i`, `i < N_0`.
fn output_column(bb: &mut BlockBuilder, kernel: &Kernel<'_>, j2: &Expr) -> TensorView {
    let factors = kernel.factors();
    let nf = factors[0];
    let big_j2 = factors[1..].iter().product::<usize>();
    let unscramble = Unscrambler::new(&factors[1..]).in_0_to_n(true);
    kernel
        .x1
        .reshaped_mode(0, &[nf.into(), big_j2.into()])
        .subview(bb, &[all(), at(unscramble.apply(j2.clone()))])
}

fn output_split(factors: &[usize]) -> (usize, usize) {
    (factors[0], factors[1..].iter().product())
}

fn postprocess_c2c(bb: &mut BlockBuilder, kernel: &Kernel<'_>, out_view: &TensorView) {
    let (nf, big_j2) = output_split(kernel.factors());
    parallel_loop(bb, &kernel.n_local, kernel.cfg.nb, big_j2, "j2", |bb, j2| {
        let column = output_column(bb, kernel, j2);
        bb.if_selection(kernel.in_range(&kernel.kk), |bb| {
            let dst = out_view
                .reshaped_mode(1, &[big_j2.into(), nf.into()])
                .subview(bb, &[at(&kernel.mm), at(j2), all(), at(&kernel.kk)]);
            copy_n_block(bb, &column, &dst, nf);
        });
    });
}

/// Spectrum entry `i` of the packed transform, read through the output permutation.
fn spectrum(kernel: &Kernel<'_>, i: &Expr) -> Expr {
    let unscramble = Unscrambler::new(kernel.factors()).in_0_to_n(true);
    kernel.x1.load(&[unscramble.apply(i.clone())])
}

fn postprocess_r2c_half(bb: &mut BlockBuilder, kernel: &Kernel<'_>, out_view: &TensorView) {
    let p = kernel.precision;
    let n = kernel.cfg.n;
    let type2 = kernel.type2();
    let cmul = ComplexMul::new(p);
    let two = p.constant(2.0);
    bb.if_selection(kernel.in_range(&kernel.kk), |bb| {
        let y = out_view.subview(bb, &[at(&kernel.mm), all(), at(&kernel.kk)]);
        strided_loop_inclusive(bb, kernel, "j1", n / 4, |bb, i| {
            let i_other = bb.declare_assign(short(), "i_other", n / 2 - i);
            let i_load = bb.declare_assign(short(), "i_load", i % (n / 2));
            let i_other_load = bb.declare_assign(short(), "i_other_load", &i_other % (n / 2));
            let y1 = bb.declare_assign(type2.clone(), "yi", spectrum(kernel, &i_load));
            let y2 = bb.declare_assign(type2.clone(), "yN_i", spectrum(kernel, &i_other_load));
            bb.assign(&y2, conj(p, &y2));
            let a = bb.declare_assign(type2.clone(), "a", (&y2 + &y1) / &two);
            let b = bb.declare_assign(type2.clone(), "b", (&y2 - &y1) / &two);
            bb.assign(&b, cmul.by_expr(&b, &kernel.twiddle_2n(i)));
            add_store(bb, y.store(&a + &b, &[i.clone()]));
            bb.if_selection(i.ne_(&i_other), |bb| {
                let other = complex(p, a.s(&[0]) - b.s(&[0]), b.s(&[1]) - a.s(&[1]));
                add_store(bb, y.store(other, &[i_other.clone()]));
            });
        });
    });
}

fn postprocess_r2c_double(bb: &mut BlockBuilder, kernel: &Kernel<'_>, out_view: &TensorView) {
    let k_even = &kernel.kk * 2u32;
    let k_odd = &k_even + 1u32;
    let n = kernel.cfg.n;
    bb.if_else(
        kernel.in_range(&k_odd),
        |bb| {
            let ya = out_view.subview(bb, &[at(&kernel.mm), all(), at(&k_even)]);
            let yb = out_view.subview(bb, &[at(&kernel.mm), all(), at(&k_odd)]);
            r2c_double_store(bb, kernel, &ya, &yb);
        },
        |bb| {
            bb.if_selection(kernel.in_range(&k_even), |bb| {
                let ya = out_view.subview(bb, &[at(&kernel.mm), all(), at(&k_even)]);
                let yb = TensorView::new(Accessor::Zero(kernel.precision), [n]);
                r2c_double_store(bb, kernel, &ya, &yb);
            });
        },
    );
}

/// Separates the spectra of the real (`ya`) and imaginary (`yb`) input lanes.
fn r2c_double_store(bb: &mut BlockBuilder, kernel: &Kernel<'_>, ya: &TensorView, yb: &TensorView) {
    let p = kernel.precision;
    let n = kernel.cfg.n;
    let type2 = kernel.type2();
    let two = p.constant(2.0);
    let discard_b = matches!(yb.accessor(), Accessor::Zero(_));
    strided_loop_inclusive(bb, kernel, "j1", n / 2, |bb, i| {
        let i_other = bb.declare_assign(short(), "i_other", (n - i) % n);
        let y1 = bb.declare_assign(type2.clone(), "yi", spectrum(kernel, i));
        let y2 = bb.declare_assign(type2.clone(), "yN_i", spectrum(kernel, &i_other));
        bb.assign(&y2, conj(p, &y2));
        let tmp = bb.declare_assign(type2.clone(), "tmp", (&y2 + &y1) / &two);
        add_store(bb, ya.store(&tmp, &[i.clone()]));
        if !discard_b {
            bb.assign(&tmp, (&y2 - &y1) / &two);
            bb.assign(&tmp, times_i(p, &tmp));
            add_store(bb, yb.store(&tmp, &[i.clone()]));
        }
    });
}

// =============================================================================
// c2r
// =============================================================================

/// Folds `X_0..X_{N/2}` into the half-length spectrum in shared memory.
fn preprocess_c2r_half(bb: &mut BlockBuilder, kernel: &Kernel<'_>, in_view: &TensorView) {
    let p = kernel.precision;
    let n = kernel.cfg.n;
    let type2 = kernel.type2();
    let cmul = ComplexMul::new(p);
    bb.if_selection(kernel.in_range(&kernel.kk), |bb| {
        let x = in_view.subview(bb, &[at(&kernel.mm), all(), at(&kernel.kk)]);
        strided_loop_inclusive(bb, kernel, "j1", n / 4, |bb, i| {
            let i_other = bb.declare_assign(short(), "i_other", n / 2 - i);
            let x1 = bb.declare_assign(type2.clone(), "xi", x.load(&[i.clone()]));
            bb.assign(x1.s(&[1]), select(x1.s(&[1]), p.zero(), cast(p.select_type(), i.eq_(0u32))));
            let x2 = bb.declare_assign(type2.clone(), "xN_i", x.load(&[i_other.clone()]));
            bb.assign(&x2, conj(p, &x2));
            let a = bb.declare_assign(type2.clone(), "a", &x1 + &x2);
            let b = bb.declare_assign(type2.clone(), "b", &x1 - &x2);
            bb.assign(&b, cmul.by_expr(&b, &kernel.twiddle_2n(i)));
            add_store(bb, kernel.x1.store(&a + &b, &[i.clone()]));
            bb.if_selection(i.ne_(0u32), |bb| {
                let other = complex(p, a.s(&[0]) - b.s(&[0]), b.s(&[1]) - a.s(&[1]));
                add_store(bb, kernel.x1.store(other, &[i_other.clone()]));
            });
        });
    });
    local_barrier(bb);
}

/// Combines the half-spectra of two batch entries into `X_a + i X_b` in shared memory.
fn preprocess_c2r_double(bb: &mut BlockBuilder, kernel: &Kernel<'_>, in_view: &TensorView) {
    let k_even = &kernel.kk * 2u32;
    let k_odd = &k_even + 1u32;
    let n_in = kernel.layout.n_in;
    bb.if_else(
        kernel.in_range(&k_odd),
        |bb| {
            let xa = in_view.subview(bb, &[at(&kernel.mm), all(), at(&k_even)]);
            let xb = in_view.subview(bb, &[at(&kernel.mm), all(), at(&k_odd)]);
            c2r_double_load(bb, kernel, &xa, &xb);
        },
        |bb| {
            bb.if_selection(kernel.in_range(&k_even), |bb| {
                let xa = in_view.subview(bb, &[at(&kernel.mm), all(), at(&k_even)]);
                let xb = TensorView::new(Accessor::Zero(kernel.precision), [n_in]);
                c2r_double_load(bb, kernel, &xa, &xb);
            });
        },
    );
    local_barrier(bb);
}

fn c2r_double_load(bb: &mut BlockBuilder, kernel: &Kernel<'_>, xa: &TensorView, xb: &TensorView) {
    let p = kernel.precision;
    let n = kernel.cfg.n;
    let type2 = kernel.type2();
    strided_loop_inclusive(bb, kernel, "i", n / 2, |bb, i| {
        let ai = bb.declare_assign(type2.clone(), "ai", xa.load(&[i.clone()]));
        let bi = bb.declare_assign(type2.clone(), "bi", xb.load(&[i.clone()]));
        let is_zero = cast(p.select_type(), i.eq_(0u32));
        bb.assign(ai.s(&[1]), select(ai.s(&[1]), p.zero(), is_zero.clone()));
        bb.assign(bi.s(&[1]), select(bi.s(&[1]), p.zero(), is_zero));
        bb.assign(&bi, times_i(p, &bi));
        add_store(bb, kernel.x1.store(&ai + &bi, &[i.clone()]));
        let i_other = n - i;
        bb.if_selection(i_other.lt(n), |bb| {
            let tmp = bb.declare_assign(type2.clone(), "tmp", &ai - &bi);
            add_store(bb, kernel.x1.store(conj(p, &tmp), &[i_other.clone()]));
        });
    });
}

/// Writes the packed even/odd samples back as two real lanes.
fn postprocess_c2r_half(bb: &mut BlockBuilder, kernel: &Kernel<'_>, out_view: &TensorView) {
    let (nf, big_j2) = output_split(kernel.factors());
    let n_fft = kernel.layout.n_fft;
    parallel_loop(bb, &kernel.n_local, kernel.cfg.nb, big_j2, "j2", |bb, j2| {
        let column = output_column(bb, kernel, j2);
        bb.if_selection(kernel.in_range(&kernel.kk), |bb| {
            let dst = out_view
                .reshaped_mode(1, &[2u32.into(), n_fft.into()])
                .reshaped_mode(2, &[big_j2.into(), nf.into()])
                .subview(bb, &[at(&kernel.mm), all(), at(j2), all(), at(&kernel.kk)]);
            for j1 in 0..nf {
                let value = column.load(&[j1.into()]);
                for c in 0..2u8 {
                    add_store(bb, dst.store(value.s(&[c]), &[u32::from(c).into(), j1.into()]));
                }
            }
        });
    });
}

/// Writes the real and imaginary lanes to two consecutive batch entries.
fn postprocess_c2r_double(bb: &mut BlockBuilder, kernel: &Kernel<'_>, out_view: &TensorView) {
    let (nf, big_j2) = output_split(kernel.factors());
    parallel_loop(bb, &kernel.n_local, kernel.cfg.nb, big_j2, "j2", |bb, j2| {
        let column = output_column(bb, kernel, j2);
        for c in 0..2u8 {
            let k = &kernel.kk * 2u32 + u32::from(c);
            bb.if_selection(kernel.in_range(&k), |bb| {
                let dst = out_view
                    .reshaped_mode(1, &[big_j2.into(), nf.into()])
                    .subview(bb, &[at(&kernel.mm), at(j2), all(), at(&k)]);
                for j1 in 0..nf {
                    add_store(bb, dst.store(column.load(&[j1.into()]).s(&[c]), &[j1.into()]));
                }
            });
        }
    });
}
