//! Error types for code generation.

use snafu::Snafu;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors that can occur while rendering a program.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Variable names could not be made unique.
    #[snafu(display("IR error: {source}"))]
    Ir {
        #[snafu(source)]
        source: fftgen_ir::Error,
    },

    /// Program without any kernel definition.
    #[snafu(display("program defines no kernel"))]
    NoKernel,
}
