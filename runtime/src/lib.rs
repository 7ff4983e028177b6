//! Host execution of generated FFT kernels.
//!
//! Runs kernel IR directly on the host: no device, compiler or binary cache is involved. The
//! interpreter follows the OpenCL execution model closely enough to check generated kernels
//! numerically: work-items with private state, work-groups sharing local memory, barriers and
//! Intel sub-group shuffles.
//!
//! # Module Organization
//!
//! - [`value`] - Scalar, vector and pointer values with the usual arithmetic conversions
//! - [`memory`] - Host buffers and typed pointers into them
//! - [`interpreter`] - Kernel launches over an ND-range
//! - [`plan`] - All stages of a transform configuration on host buffers
//! - [`error`] - Runtime errors

pub mod error;
pub mod interpreter;
pub mod memory;
pub mod plan;
pub mod value;


pub use error::{Error, Result};
pub use interpreter::{HostFunction, Interpreter, NdRange};
pub use memory::{BufferId, Memory, Pointer};
pub use plan::{HostPlan, Stage};
pub use value::{Scalar, Value};
