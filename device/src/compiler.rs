//! Backend compiler boundary.

use fftgen_codegen::RenderedProgram;

use crate::error::Result;

/// Turns rendered kernel source into something the backend can launch.
///
/// Implementations live with the compute-API glue (OpenCL, Level Zero, SYCL). The generator
/// only needs the device identity for cache keys and a way to compile.
pub trait Compiler: Send + Sync {
    /// Loadable module produced by the backend, e.g. a program handle or a native binary.
    type Module: Clone;

    /// Stable identity of the target device; two devices with equal ids share cached modules.
    fn device_id(&self) -> u64;

    /// Compile a complete program. `program.extension_pragmas()` lists the extensions to enable.
    fn compile(&self, program: &RenderedProgram) -> Result<Self::Module>;
}
