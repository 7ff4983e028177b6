//! Two-factor configuration: the transform is spread over a work-group and staged through
//! shared local memory, one factor per stage.

use std::fmt;

use fftgen_device::DeviceInfo;
use itertools::Itertools;
use tracing::debug;

use crate::configuration::{Configuration, Direction, TransformKind};
use crate::error::{FactorizationTooShortSnafu, InsufficientLocalMemorySnafu, Result};
use crate::factor::{factor, trial_division};
use crate::generator::{Layout, direction_tag};
use crate::math::min_power_of_2_greater_equal;
use crate::precision::Precision;

/// Block sizes and launch contract of a two-factor kernel.
///
/// A work-group of `Mb x Nb x Kb` work-items computes `Mb * Kb` transforms; the `Nb` work-items
/// of one transform share the stages.
///
/// The classic `N1 x N2` split is the two-stage case of `factorization`. Lengths whose factors
/// would not fit the register file at two stages get more, each staged through local memory;
/// [`Factor2SlmConfiguration::split`] returns `(N1, N2)` when there are exactly two.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Factor2SlmConfiguration {
    pub direction: Direction,
    pub m: usize,
    pub mb: usize,
    pub n: usize,
    /// Factors of the computed FFT length, at least two.
    pub factorization: Vec<usize>,
    pub nb: usize,
    pub kb: usize,
    pub sgs: usize,
    pub precision: Precision,
    pub kind: TransformKind,
    pub istride: [usize; 3],
    pub ostride: [usize; 3],
    pub external_buffer: bool,
    pub inplace_unsupported: bool,
    pub load_function: Option<String>,
    pub store_function: Option<String>,
}

impl Factor2SlmConfiguration {
    pub fn layout(&self) -> Layout {
        Layout::factor2(self.kind, self.n)
    }

    pub fn has_callbacks(&self) -> bool {
        self.load_function.is_some() || self.store_function.is_some()
    }

    /// `(N1, N2)` of a two-stage factorization.
    pub fn split(&self) -> Option<(usize, usize)> {
        match self.factorization[..] {
            [n1, n2] => Some((n1, n2)),
            _ => None,
        }
    }

    /// Canonical kernel name, also used as cache key.
    pub fn identifier(&self) -> String {
        self.to_string()
    }
}

/// `f2fft_m1_M1_Mb1_N1024_F32x32_Nb32_Kb1_sgs16_f32_c2c_is1_1_1024_os1_1_1024_eb0_in0`
impl fmt::Display for Factor2SlmConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "f2fft_{}_M{}_Mb{}_N{}_F{}_Nb{}_Kb{}_sgs{}_f{}_{}_is",
            direction_tag(self.direction),
            self.m,
            self.mb,
            self.n,
            self.factorization.iter().join("x"),
            self.nb,
            self.kb,
            self.sgs,
            self.precision.bits(),
            self.kind
        )?;
        for s in &self.istride {
            write!(f, "{s}_")?;
        }
        f.write_str("os")?;
        for s in &self.ostride {
            write!(f, "{s}_")?;
        }
        write!(f, "eb{}_in{}", u8::from(self.external_buffer), u8::from(self.inplace_unsupported))?;
        if let Some(load) = &self.load_function {
            write!(f, "_{load}")?;
        }
        if let Some(store) = &self.store_function {
            write!(f, "_{store}")?;
        }
        Ok(())
    }
}

/// Splits `n` into as few near-equal factors as keep the largest factor within half of the
/// register file, but at least two. Unit factors are dropped, so a prime `n` yields `[n]`.
pub fn stage_factorization(n: usize, real_bytes: usize, sgs: usize, register_space: usize) -> Vec<usize> {
    let max_stages = trial_division(n).len().max(2);
    let fits = |factors: &[usize]| {
        let largest = factors.iter().copied().max().unwrap_or(1);
        2 * real_bytes * largest * sgs < register_space / 2
    };
    let mut factors = Vec::new();
    for stages in 2..=max_stages {
        factors = factor(n, stages);
        factors.retain(|&f| f > 1);
        if fits(&factors) {
            break;
        }
    }
    factors
}

/// Chooses the stage factorization and block sizes for a 1-D configuration.
#[tracing::instrument(skip_all, fields(n = cfg.n(), m = cfg.m(), k = cfg.k()))]
pub fn configure_factor2_slm(cfg: &Configuration, info: &DeviceInfo) -> Result<Factor2SlmConfiguration> {
    let m = cfg.m();
    let n = cfg.n();
    let k = cfg.k();
    let real_bytes = cfg.precision.bytes();
    let layout = Layout::factor2(cfg.kind, n);

    let sgs = info.min_subgroup_size();
    let work_group_size_limit = info.max_subgroup_size();

    let factorization = stage_factorization(layout.n_fft, real_bytes, sgs, info.register_space());
    snafu::ensure!(factorization.len() >= 2, FactorizationTooShortSnafu { n, factors: factorization.clone() });

    let largest = factorization.iter().copied().max().unwrap_or(1);
    let nb = (layout.n_fft / largest).clamp(1, info.max_work_group_size.max(1));

    let column_bytes = 2 * layout.n_slm * real_bytes;
    let max_compute_mb = (info.max_work_group_size / nb).max(1);
    let max_slm_mb = info.local_memory_size / column_bytes;
    let external_buffer = max_slm_mb == 0;
    snafu::ensure!(
        !external_buffer,
        InsufficientLocalMemorySnafu { required: column_bytes, available: info.local_memory_size }
    );
    let max_mb = max_compute_mb.min(max_slm_mb).min(work_group_size_limit);
    let mb = max_mb.min(min_power_of_2_greater_equal(m));

    let max_compute_kb = (info.max_work_group_size / (mb * nb)).max(1);
    let max_slm_kb = info.local_memory_size / (mb * column_bytes);
    let max_kb = max_compute_kb.min(max_slm_kb).max(1);
    let min_kb = (sgs - 1) / (mb * nb) + 1;
    let kb = k.min(min_kb.min(max_kb));

    let f2 = Factor2SlmConfiguration {
        direction: cfg.direction,
        m,
        mb,
        n,
        factorization,
        nb,
        kb,
        sgs,
        precision: cfg.precision,
        kind: cfg.kind,
        istride: [cfg.istride[0], cfg.istride[1], cfg.istride[2]],
        ostride: [cfg.ostride[0], cfg.ostride[1], cfg.ostride[2]],
        external_buffer,
        inplace_unsupported: cfg.kind.is_real() && mb < m,
        load_function: cfg.callbacks.as_ref().and_then(|c| c.load_function.clone()),
        store_function: cfg.callbacks.as_ref().and_then(|c| c.store_function.clone()),
    };
    debug!(mb = f2.mb, nb = f2.nb, kb = f2.kb, identifier = %f2, "two-factor configuration");
    Ok(f2)
}
