//! Generator policy knobs.
//!
//! These never change the result of a transform, only which kernel computes it.

use bon::bon;

use crate::algorithm::KernelFamily;
use crate::generator::mixed_radix::Butterfly;

/// Work-group size cap applied by the small-batch selector on top of the device limit.
pub const DEFAULT_WORK_GROUP_SIZE_CAP: usize = 128;

/// Policy for configuration selection and code generation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeneratorConfig {
    /// Upper bound for the small-batch work-group size.
    pub max_work_group_size_cap: usize,
    /// Family to use regardless of the register-space estimate.
    pub force_family: Option<KernelFamily>,
    /// Butterfly override; small-batch defaults to basic, two-factor to pair-optimized.
    pub butterfly: Option<Butterfly>,
    /// Run unsafe simplification on the generated kernel.
    pub simplify: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self { max_work_group_size_cap: DEFAULT_WORK_GROUP_SIZE_CAP, force_family: None, butterfly: None, simplify: true }
    }
}

#[bon]
impl GeneratorConfig {
    #[builder]
    pub fn builder(
        #[builder(default = DEFAULT_WORK_GROUP_SIZE_CAP)] max_work_group_size_cap: usize,
        force_family: Option<KernelFamily>,
        butterfly: Option<Butterfly>,
        #[builder(default = true)] simplify: bool,
    ) -> Self {
        Self { max_work_group_size_cap, force_family, butterfly, simplify }
    }

    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// * `FFTGEN_WG_CAP` - Small-batch work-group size cap (default: 128)
    /// * `FFTGEN_FAMILY` - Force `sbfft` or `f2fft`
    /// * `FFTGEN_BUTTERFLY` - Force `basic` or `pair`
    /// * `FFTGEN_NO_SIMPLIFY` - Skip unsafe simplification if set
    pub fn from_env() -> Self {
        let max_work_group_size_cap =
            std::env::var("FFTGEN_WG_CAP").ok().and_then(|s| s.parse().ok()).unwrap_or(DEFAULT_WORK_GROUP_SIZE_CAP);
        let force_family = std::env::var("FFTGEN_FAMILY").ok().and_then(|s| s.parse().ok());
        let butterfly = std::env::var("FFTGEN_BUTTERFLY").ok().and_then(|s| s.parse().ok());
        let simplify = std::env::var("FFTGEN_NO_SIMPLIFY").is_err();

        Self { max_work_group_size_cap, force_family, butterfly, simplify }
    }

    /// Butterfly for `family`, honouring the override.
    pub fn butterfly_for(&self, family: KernelFamily) -> Butterfly {
        self.butterfly.unwrap_or(match family {
            KernelFamily::SmallBatch => Butterfly::Basic,
            KernelFamily::Factor2Slm => Butterfly::PairOptimized,
        })
    }
}
