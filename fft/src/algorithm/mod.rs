//! Configuration selection.
//!
//! # Module Organization
//!
//! - [`small_batch`] - Block sizes of register-resident kernels
//! - [`factor2_slm`] - Stage factorization and block sizes of shared-local-memory kernels
//! - [`select`] - Family decision from the register-space estimate
//! - [`nd`] - Splitting 2-D and 3-D transforms into 1-D stages

pub mod factor2_slm;
pub mod nd;
pub mod select;
pub mod small_batch;

pub use factor2_slm::{Factor2SlmConfiguration, configure_factor2_slm};
pub use nd::{Stages, plan_stages};
pub use select::{KernelConfiguration, KernelFamily, configure, select_family, validate};
pub use small_batch::{SmallBatchConfiguration, configure_small_batch};
