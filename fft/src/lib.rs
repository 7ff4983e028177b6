//! Mixed-radix FFT kernel synthesis.
//!
//! A logical [`Configuration`] is matched against a [`DeviceInfo`](fftgen_device::DeviceInfo),
//! turned into a concrete kernel configuration of one of two families and emitted as kernel IR:
//!
//! - **small-batch** (`sbfft`): every work-item keeps a whole transform in registers;
//! - **two-factor** (`f2fft`): a work-group shares each transform through local memory and
//!   processes one factor of the length per stage.
//!
//! Real transforms run a half-length complex FFT for even lengths and pack two batch entries into
//! one complex FFT for odd lengths.
//!
//! # Module Organization
//!
//! - [`configuration`] - Logical transform description and its descriptor text form
//! - [`descriptor`] - Parser for the compact descriptor grammar
//! - [`algorithm`] - Family selection, block sizes and n-dimensional planning
//! - [`generator`] - Kernel generators and the register-level FFT network
//! - [`tensor`] - Symbolic tensor views used by the generators
//! - [`twiddle`] - Host twiddle tables of two-factor kernels
//! - [`launch`] - Work sizes and argument order
//! - [`build`] - Generate, render, check extensions and compile with caching
//! - [`config`] - Generator policy
//! - [`factor`], [`scrambler`], [`root_of_unity`], [`math`] - Number-theoretic helpers
//! - [`precision`] - Floating-point precision and derived kernel types
//! - [`error`] - Error types and result handling

pub mod algorithm;
pub mod build;
pub mod config;
pub mod configuration;
pub mod descriptor;
pub mod error;
pub mod factor;
pub mod generator;
pub mod launch;
pub mod math;
pub mod precision;
pub mod root_of_unity;
pub mod scrambler;
pub mod tensor;
pub mod twiddle;


pub use algorithm::{
    Factor2SlmConfiguration, KernelConfiguration, KernelFamily, SmallBatchConfiguration, configure, plan_stages,
};
pub use build::{BuiltKernel, GeneratedKernel, build_kernel, build_plan, generate_program, get_or_generate};
pub use config::GeneratorConfig;
pub use configuration::{Configuration, Direction, TransformKind, UserModule};
pub use descriptor::parse_fft_descriptor;
pub use error::{Error, Result};
pub use generator::mixed_radix::Butterfly;
pub use launch::{KernelArg, LaunchConfig};
pub use math::Complex;
pub use precision::Precision;
