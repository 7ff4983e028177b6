//! Source generation for kernel IR.
//!
//! Turns programs, functions, statements, expressions and types built with `fftgen-ir` into
//! OpenCL C text.
//!
//! # Architecture
//!
//! - **Traits**: backend-agnostic interface ([`Renderer`])
//! - **OpenCL**: the OpenCL C printer ([`opencl`])
//!
//! # Usage
//!
//! ```ignore
//! use fftgen_codegen::{Renderer, opencl::OpenClRenderer};
//!
//! let rendered = OpenClRenderer::new().render(&program)?;
//! println!("{}", rendered.source);
//! ```

pub mod error;
pub mod opencl;
pub mod traits;
pub mod types;

#[cfg(test)]
pub mod test;

pub use error::*;
pub use traits::*;
pub use types::*;
