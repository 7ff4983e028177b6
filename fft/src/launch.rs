//! Launch contract of generated kernels: work sizes, argument order and host-side buffers.

use smallvec::SmallVec;

use crate::algorithm::{Factor2SlmConfiguration, KernelConfiguration, SmallBatchConfiguration};
use crate::math::Complex;
use crate::twiddle::create_twiddle;

/// One kernel argument, in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum KernelArg {
    /// Input buffer.
    In,
    /// Output buffer; the same buffer as `In` for in-place transforms.
    Out,
    /// Constant twiddle table of two-factor kernels.
    Twiddle,
    /// Batch extent `K` as `ulong`.
    K,
    /// Opaque pointer forwarded to the callbacks.
    UserData,
}

/// Work sizes and arguments for one launch.
#[derive(Debug, Clone, PartialEq)]
pub struct LaunchConfig {
    pub global_size: [usize; 3],
    pub local_size: [usize; 3],
    pub args: SmallVec<[KernelArg; 5]>,
    /// Batch extent passed as the `K` argument.
    pub k: usize,
    /// Contents of the `Twiddle` argument.
    pub twiddle: Option<Vec<Complex>>,
}

impl LaunchConfig {
    /// Launch of `config` over `k` batch entries.
    pub fn new(config: &KernelConfiguration, k: usize) -> Self {
        match config {
            KernelConfiguration::SmallBatch(cfg) => small_batch(cfg, k),
            KernelConfiguration::Factor2Slm(cfg) => factor2_slm(cfg, k),
        }
    }

    pub fn work_group_count(&self) -> [usize; 3] {
        std::array::from_fn(|d| self.global_size[d] / self.local_size[d])
    }
}

fn args(twiddle: bool, callbacks: bool) -> SmallVec<[KernelArg; 5]> {
    let mut args = SmallVec::from_slice(&[KernelArg::In, KernelArg::Out]);
    if twiddle {
        args.push(KernelArg::Twiddle);
    }
    args.push(KernelArg::K);
    if callbacks {
        args.push(KernelArg::UserData);
    }
    args
}

fn small_batch(cfg: &SmallBatchConfiguration, k: usize) -> LaunchConfig {
    let layout = cfg.layout();
    let mg = cfg.m.div_ceil(cfg.mb);
    let k_fft = k.div_ceil(layout.k_stride);
    let kg = k_fft.div_ceil(cfg.kb);
    LaunchConfig {
        global_size: [mg * cfg.mb, kg * cfg.kb, 1],
        local_size: [cfg.mb, cfg.kb, 1],
        args: args(false, cfg.has_callbacks()),
        k,
        twiddle: None,
    }
}

fn factor2_slm(cfg: &Factor2SlmConfiguration, k: usize) -> LaunchConfig {
    let layout = cfg.layout();
    let mg = cfg.m.div_ceil(cfg.mb);
    let k_fft = k.div_ceil(layout.k_stride);
    let kg = k_fft.div_ceil(cfg.kb);
    let twiddle = create_twiddle(cfg.direction, &cfg.factorization, layout.variant.is_half());
    LaunchConfig {
        global_size: [mg * cfg.mb, cfg.nb, kg * cfg.kb],
        local_size: [cfg.mb, cfg.nb, cfg.kb],
        args: args(true, cfg.has_callbacks()),
        k,
        twiddle: Some(twiddle),
    }
}
