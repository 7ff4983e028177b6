//! Core traits for code generation.

use fftgen_ir::Program;

use crate::{RenderedProgram, Result};

/// Backend-agnostic program rendering.
pub trait Renderer {
    /// Render a finished program into source text.
    ///
    /// Implementations may rename variables in place so that every printed identifier is
    /// unambiguous.
    fn render(&self, program: &Program) -> Result<RenderedProgram>;

    /// Backend name, e.g. `"opencl"`.
    fn backend_name(&self) -> &str;
}
