//! Small-batch configuration: one whole transform per work-item.

use std::fmt;

use fftgen_device::DeviceInfo;
use tracing::debug;

use crate::config::GeneratorConfig;
use crate::configuration::{Configuration, Direction, TransformKind};
use crate::error::{InsufficientLocalMemorySnafu, Result};
use crate::generator::{Layout, direction_tag};
use crate::math::{max_power_of_2_less_equal, min_power_of_2_greater_equal};
use crate::precision::Precision;

/// Block sizes and launch contract of a small-batch kernel.
///
/// A work-group of `Mb x Kb` work-items handles `Mb` consecutive `M` entries of `Kb` (or `2 Kb`
/// for odd real lengths) consecutive `K` entries.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SmallBatchConfiguration {
    pub direction: Direction,
    pub m: usize,
    pub mb: usize,
    pub n: usize,
    pub kb: usize,
    pub sgs: usize,
    pub precision: Precision,
    pub kind: TransformKind,
    pub istride: [usize; 3],
    pub ostride: [usize; 3],
    pub inplace_unsupported: bool,
    pub load_function: Option<String>,
    pub store_function: Option<String>,
}

impl SmallBatchConfiguration {
    pub fn layout(&self) -> Layout {
        Layout::small_batch(self.kind, self.n)
    }

    pub fn has_callbacks(&self) -> bool {
        self.load_function.is_some() || self.store_function.is_some()
    }

    /// Canonical kernel name, also used as cache key.
    pub fn identifier(&self) -> String {
        self.to_string()
    }
}

/// `sbfft_m1_M1_Mb1_N16_Kb16_sgs16_f32_c2c_is1_1_16_os1_1_16_in0`
impl fmt::Display for SmallBatchConfiguration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sbfft_{}_M{}_Mb{}_N{}_Kb{}_sgs{}_f{}_{}_is",
            direction_tag(self.direction),
            self.m,
            self.mb,
            self.n,
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
        write!(f, "in{}", u8::from(self.inplace_unsupported))?;
        if let Some(load) = &self.load_function {
            write!(f, "_{load}")?;
        }
        if let Some(store) = &self.store_function {
            write!(f, "_{store}")?;
        }
        Ok(())
    }
}

/// Chooses block sizes for a 1-D configuration.
///
/// The sub-group size grows beyond the minimum only for `M == 1`, where the batch block cannot
/// fill a wider sub-group anyway and the register file is large enough.
#[tracing::instrument(skip_all, fields(n = cfg.n(), m = cfg.m(), k = cfg.k()))]
pub fn configure_small_batch(
    cfg: &Configuration,
    info: &DeviceInfo,
    policy: &GeneratorConfig,
) -> Result<SmallBatchConfiguration> {
    let m = cfg.m();
    let n = cfg.n();
    let k = cfg.k();
    let real_bytes = cfg.precision.bytes();
    let n_slm = Layout::small_batch(cfg.kind, n).n_slm;

    let mut sgs = info.min_subgroup_size();
    if m == 1 {
        let register_space = info.register_space_max();
        for &candidate in &info.subgroup_sizes {
            let required = 2 * real_bytes * n * candidate;
            if sgs < candidate && required < register_space / 2 {
                sgs = candidate;
            }
        }
    }

    let max_work_group_size = policy.max_work_group_size_cap.min(info.max_work_group_size);
    let mb = min_power_of_2_greater_equal(m).min(info.max_subgroup_size());

    let column_bytes = mb * n_slm * 2 * real_bytes;
    let max_slm_kb = info.local_memory_size / column_bytes;
    snafu::ensure!(
        max_slm_kb > 0,
        InsufficientLocalMemorySnafu { required: column_bytes, available: info.local_memory_size }
    );
    let max_compute_kb = (max_work_group_size / mb).max(1);
    let kb = k.min(max_power_of_2_less_equal(max_compute_kb.min(max_slm_kb)));

    let sb = SmallBatchConfiguration {
        direction: cfg.direction,
        m,
        mb,
        n,
        kb,
        sgs,
        precision: cfg.precision,
        kind: cfg.kind,
        istride: [cfg.istride[0], cfg.istride[1], cfg.istride[2]],
        ostride: [cfg.ostride[0], cfg.ostride[1], cfg.ostride[2]],
        inplace_unsupported: cfg.kind.is_real() && mb < m,
        load_function: cfg.callbacks.as_ref().and_then(|c| c.load_function.clone()),
        store_function: cfg.callbacks.as_ref().and_then(|c| c.store_function.clone()),
    };
    debug!(mb = sb.mb, kb = sb.kb, sgs = sb.sgs, identifier = %sb, "small-batch configuration");
    Ok(sb)
}
