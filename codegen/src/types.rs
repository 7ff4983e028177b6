//! Rendered output types.

use fftgen_ir::Extension;

/// Program source together with what a compiler needs to know about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedProgram {
    /// Complete translation unit.
    pub source: String,

    /// Names of the kernel entry points in declaration order.
    pub kernels: Vec<String>,

    /// Non-builtin extensions the source relies on, ascending.
    pub extensions: Vec<Extension>,
}

impl RenderedProgram {
    /// `#pragma OPENCL EXTENSION <ext> : enable` lines for every required extension.
    pub fn extension_pragmas(&self) -> String {
        self.extensions.iter().map(|e| format!("#pragma OPENCL EXTENSION {e} : enable\n")).collect()
    }
}
