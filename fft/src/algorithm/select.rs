//! Device-aware choice between the two kernel families.

use fftgen_device::DeviceInfo;
use tracing::debug;

use super::factor2_slm::{Factor2SlmConfiguration, configure_factor2_slm, stage_factorization};
use super::small_batch::{SmallBatchConfiguration, configure_small_batch};
use crate::config::GeneratorConfig;
use crate::configuration::Configuration;
use crate::error::{InvalidShapeSnafu, Result};
use crate::generator::Layout;

/// Kernel family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(strum::Display, strum::EnumString, strum::IntoStaticStr, strum::EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KernelFamily {
    /// Whole transform in registers.
    #[strum(serialize = "sbfft")]
    SmallBatch,
    /// Transform spread over a work-group, staged through shared local memory.
    #[strum(serialize = "f2fft")]
    Factor2Slm,
}

/// Configuration of one concrete kernel.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum KernelConfiguration {
    SmallBatch(SmallBatchConfiguration),
    Factor2Slm(Factor2SlmConfiguration),
}

impl KernelConfiguration {
    pub fn family(&self) -> KernelFamily {
        match self {
            KernelConfiguration::SmallBatch(_) => KernelFamily::SmallBatch,
            KernelConfiguration::Factor2Slm(_) => KernelFamily::Factor2Slm,
        }
    }

    pub fn identifier(&self) -> String {
        match self {
            KernelConfiguration::SmallBatch(c) => c.identifier(),
            KernelConfiguration::Factor2Slm(c) => c.identifier(),
        }
    }

    pub fn inplace_unsupported(&self) -> bool {
        match self {
            KernelConfiguration::SmallBatch(c) => c.inplace_unsupported,
            KernelConfiguration::Factor2Slm(c) => c.inplace_unsupported,
        }
    }

    pub fn has_callbacks(&self) -> bool {
        match self {
            KernelConfiguration::SmallBatch(c) => c.has_callbacks(),
            KernelConfiguration::Factor2Slm(c) => c.has_callbacks(),
        }
    }

    pub fn layout(&self) -> Layout {
        match self {
            KernelConfiguration::SmallBatch(c) => c.layout(),
            KernelConfiguration::Factor2Slm(c) => c.layout(),
        }
    }
}

/// Rejects empty extents and mismatched directions.
pub fn validate(cfg: &Configuration) -> Result<()> {
    cfg.check_direction()?;
    if let Some(d) = cfg.tensor_shape().iter().position(|&extent| extent == 0) {
        return InvalidShapeSnafu { reason: format!("mode {d} has extent zero") }.fail();
    }
    Ok(())
}

/// Family for a 1-D configuration.
///
/// Small-batch is chosen while `2 * sizeof(real) * N * min_sgs` stays below half of the register
/// file. Lengths whose FFT cannot be split into two factors always use small-batch unless forced.
pub fn select_family(cfg: &Configuration, info: &DeviceInfo, policy: &GeneratorConfig) -> KernelFamily {
    if let Some(family) = policy.force_family {
        return family;
    }
    let real_bytes = cfg.precision.bytes();
    let sgs = info.min_subgroup_size();
    let required = 2 * real_bytes * cfg.n() * sgs;
    if required < info.register_space() / 2 {
        return KernelFamily::SmallBatch;
    }
    let n_fft = Layout::factor2(cfg.kind, cfg.n()).n_fft;
    if stage_factorization(n_fft, real_bytes, sgs, info.register_space()).len() < 2 {
        return KernelFamily::SmallBatch;
    }
    KernelFamily::Factor2Slm
}

/// Selects the family for a 1-D configuration and chooses its block sizes.
#[tracing::instrument(skip_all, fields(n = cfg.n(), kind = %cfg.kind))]
pub fn configure(cfg: &Configuration, info: &DeviceInfo, policy: &GeneratorConfig) -> Result<KernelConfiguration> {
    validate(cfg)?;
    let family = select_family(cfg, info, policy);
    debug!(%family, "selected kernel family");
    Ok(match family {
        KernelFamily::SmallBatch => KernelConfiguration::SmallBatch(configure_small_batch(cfg, info, policy)?),
        KernelFamily::Factor2Slm => KernelConfiguration::Factor2Slm(configure_factor2_slm(cfg, info)?),
    })
}
