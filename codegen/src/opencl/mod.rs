//! OpenCL C printer.
//!
//! Every IR node family has a `*_to_string` entry point; [`OpenClRenderer`] prints whole programs
//! after giving variables unique names.

pub mod literal;
pub mod printer;
pub mod types;

use fftgen_dtype::DataType;
use fftgen_ir::visitor::{get_required_extensions, make_names_unique};
use fftgen_ir::{Declaration, Expr, Program, Stmt};
use snafu::{ResultExt, ensure};
use tracing::debug;

use self::printer::Printer;
use crate::error::{IrSnafu, NoKernelSnafu};
use crate::{RenderedProgram, Renderer, Result};

pub fn expr_to_string(e: &Expr) -> String {
    let mut p = Printer::new();
    p.expr(e);
    p.finish()
}

pub fn type_to_string(ty: &DataType) -> String {
    let (prefix, suffix) = types::declarator(ty);
    prefix + &suffix
}

pub fn stmt_to_string(s: &Stmt) -> String {
    let mut p = Printer::new();
    p.stmt(s);
    p.finish()
}

pub fn declaration_to_string(d: &Declaration) -> String {
    let mut p = Printer::new();
    p.declaration(d);
    p.finish()
}

pub fn program_to_string(program: &Program) -> String {
    let mut p = Printer::new();
    p.program(program);
    p.finish()
}

/// OpenCL C renderer.
#[derive(Debug, Default, Clone, Copy)]
pub struct OpenClRenderer;

impl OpenClRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for OpenClRenderer {
    fn render(&self, program: &Program) -> Result<RenderedProgram> {
        make_names_unique(program).context(IrSnafu)?;

        let kernels: Vec<String> = program
            .kernels()
            .filter_map(|d| d.prototype().map(|p| p.name.clone()))
            .collect();
        ensure!(!kernels.is_empty(), NoKernelSnafu);

        let source = program_to_string(program);
        let extensions = get_required_extensions(program);
        debug!(kernels = ?kernels, source_len = source.len(), extensions = ?extensions, "opencl: rendered program");
        Ok(RenderedProgram { source, kernels, extensions })
    }

    fn backend_name(&self) -> &str {
        "opencl"
    }
}
